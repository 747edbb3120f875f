//! Persisted runtime settings
//!
//! One file at the platform config directory holding the saved output
//! root. Written atomically; `SENTINEL_CONFIG_HOME` overrides the
//! location, which is also what the tests lean on.

use std::io;
use std::path::{Path, PathBuf};

const SETTINGS_KEY: &str = "output_root";
const ENV_CONFIG_HOME: &str = "SENTINEL_CONFIG_HOME";

/// Location of the settings file for this user.
pub fn settings_path() -> PathBuf {
    config_home().join("sentinel").join("settings.ini")
}

/// Read the saved output root, if one was ever persisted.
pub fn load_saved_output_root() -> io::Result<Option<String>> {
    read_output_root(&settings_path())
}

/// Persist the output root for future runs.
pub fn save_output_root(output_root: &str) -> sentinel_fs::Result<()> {
    let body = format!("# Sentinel runtime settings\n{SETTINGS_KEY}={output_root}\n");
    sentinel_fs::io::write_atomic(&settings_path(), body.as_bytes())
}

fn config_home() -> PathBuf {
    if let Some(custom) = std::env::var_os(ENV_CONFIG_HOME).filter(|v| !v.is_empty()) {
        return PathBuf::from(custom);
    }
    dirs::config_dir()
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

fn read_output_root(path: &Path) -> io::Result<Option<String>> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };
    Ok(parse_output_root(&contents))
}

fn parse_output_root(contents: &str) -> Option<String> {
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        if key.trim() == SETTINGS_KEY {
            let value = value.trim();
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }
    None
}
