//! Runtime context: the output root and every path derived from it
//!
//! Built once after argument parsing and passed by reference; the only
//! event that produces a different context is an explicit set-destination.
//! Resolution order for the output root: `--output-root` flag, then the
//! `SENTINEL_ROOT` environment variable, then the saved setting, then the
//! directory the executable lives in.

use std::path::{Path, PathBuf};

use sentinel_core::{BaselineStore, IgnoreSet};
use sentinel_fs::clock;
use sentinel_fs::path::normalize;

use crate::settings;

/// Directory under the output root that holds everything Sentinel writes.
pub const OUTPUT_DIR_NAME: &str = "sentinel-logs";
/// Activity log files are named `<prefix><run_id>.log`.
pub const LOG_PREFIX: &str = "sentinel_activity_";

const ENV_OUTPUT_ROOT: &str = "SENTINEL_ROOT";

#[derive(Debug, Clone)]
pub struct RuntimeContext {
    pub output_root: PathBuf,
    pub root_dir: PathBuf,
    pub data_dir: PathBuf,
    pub log_dir: PathBuf,
    pub report_cli_dir: PathBuf,
    pub report_html_dir: PathBuf,
    pub report_json_dir: PathBuf,
    pub report_csv_dir: PathBuf,
    pub baseline_path: PathBuf,
    pub seal_path: PathBuf,
    pub ignore_path: PathBuf,
    pub log_file: PathBuf,
    pub run_id: String,
}

impl RuntimeContext {
    /// Resolve the context for this invocation.
    pub fn resolve(flag: Option<&Path>) -> Self {
        let root = flag
            .map(Path::to_path_buf)
            .or_else(|| {
                std::env::var_os(ENV_OUTPUT_ROOT)
                    .filter(|value| !value.is_empty())
                    .map(PathBuf::from)
            })
            .or_else(|| {
                settings::load_saved_output_root()
                    .ok()
                    .flatten()
                    .map(PathBuf::from)
            })
            .unwrap_or_else(default_output_root);
        Self::with_output_root(&root)
    }

    /// Build a context for an explicit output root.
    pub fn with_output_root(root: &Path) -> Self {
        let output_root = PathBuf::from(normalize(root));
        let root_dir = output_root.join(OUTPUT_DIR_NAME);
        let data_dir = root_dir.join("data");
        let log_dir = root_dir.join("logs");
        let report_dir = root_dir.join("reports");
        let run_id = clock::run_id();
        let log_file = log_dir.join(format!("{LOG_PREFIX}{run_id}.log"));

        Self {
            baseline_path: data_dir.join(".sentinel-baseline"),
            seal_path: data_dir.join(".sentinel-baseline.seal"),
            ignore_path: output_root.join(".sentinelignore"),
            report_cli_dir: report_dir.join("cli"),
            report_html_dir: report_dir.join("html"),
            report_json_dir: report_dir.join("json"),
            report_csv_dir: report_dir.join("csv"),
            output_root,
            root_dir,
            data_dir,
            log_dir,
            log_file,
            run_id,
        }
    }

    /// Create the full output directory tree. Best effort: a read-only
    /// destination surfaces later as a doctor failure, not a crash here.
    pub fn ensure_dirs(&self) {
        for dir in [
            &self.data_dir,
            &self.log_dir,
            &self.report_cli_dir,
            &self.report_html_dir,
            &self.report_json_dir,
            &self.report_csv_dir,
        ] {
            let _ = std::fs::create_dir_all(dir);
        }
    }

    pub fn store(&self) -> BaselineStore {
        BaselineStore::new(&self.baseline_path, &self.seal_path)
    }

    /// Load ignore rules: the output root's ignore file first, falling
    /// back to one in the current directory.
    pub fn ignore(&self) -> IgnoreSet {
        IgnoreSet::load(&self.ignore_path, Path::new(".sentinelignore"))
    }

    pub fn report_dirs(&self) -> [(&'static str, &Path); 4] {
        [
            ("cli", self.report_cli_dir.as_path()),
            ("html", self.report_html_dir.as_path()),
            ("json", self.report_json_dir.as_path()),
            ("csv", self.report_csv_dir.as_path()),
        ]
    }

    /// Fixed output locations reported alongside scan results, with
    /// report slots filled in as renderers complete.
    pub fn default_outputs(&self) -> OutputPaths {
        OutputPaths {
            cli_report: "N/A".to_string(),
            html_report: "N/A".to_string(),
            json_report: "N/A".to_string(),
            csv_report: "N/A".to_string(),
            log_file: display(&self.log_file),
            baseline: display(&self.baseline_path),
            seal: display(&self.seal_path),
        }
    }
}

/// Where each artifact of an operation ended up. `"N/A"` marks a report
/// that was not requested; an empty string marks one that failed.
#[derive(Debug, Clone)]
pub struct OutputPaths {
    pub cli_report: String,
    pub html_report: String,
    pub json_report: String,
    pub csv_report: String,
    pub log_file: String,
    pub baseline: String,
    pub seal: String,
}

pub fn display(path: &Path) -> String {
    sentinel_fs::path::to_display(path)
}

fn default_output_root() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}
