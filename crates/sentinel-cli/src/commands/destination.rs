//! Output destination management

use std::path::Path;

use serde_json::json;

use crate::commands::scan::print_json;
use crate::console;
use crate::context::{display, RuntimeContext};
use crate::exit::ExitCode;
use crate::settings;

/// Apply a new output root for this process and persist it for future
/// runs. The caller's context is stale afterwards; this builds its own.
pub fn run_set(path: &Path, as_json: bool, quiet: bool) -> ExitCode {
    if let Err(err) = std::fs::create_dir_all(path) {
        let message = format!("failed to create destination directory: {err}");
        if as_json {
            print_json(&json!({
                "command": "set-destination",
                "ok": false,
                "error": message,
            }));
        } else {
            console::error(&format!("Failed to set destination: {message}"));
        }
        return ExitCode::Usage;
    }

    let ctx = RuntimeContext::with_output_root(path);
    ctx.ensure_dirs();

    if let Err(err) = settings::save_output_root(&display(&ctx.output_root)) {
        let message = err.to_string();
        if as_json {
            print_json(&json!({
                "command": "set-destination",
                "ok": false,
                "error": message,
            }));
        } else {
            console::error(&format!("Destination applied but failed to persist: {message}"));
        }
        return ExitCode::OperationFailed;
    }

    if as_json {
        print_json(&json!({
            "command": "set-destination",
            "ok": true,
            "output_root": display(&ctx.output_root),
            "settings_file": display(&settings::settings_path()),
        }));
    } else if !quiet {
        console::success("Destination saved.");
        console::info(&format!("Output root: {}", display(&ctx.output_root)));
        console::info(&format!(
            "Settings file: {}",
            display(&settings::settings_path())
        ));
    }
    ExitCode::Ok
}

pub fn run_show(ctx: &RuntimeContext, as_json: bool, quiet: bool) -> ExitCode {
    let (saved, load_warning) = match settings::load_saved_output_root() {
        Ok(saved) => (saved, None),
        Err(err) => (None, Some(format!("failed to read settings file: {err}"))),
    };

    if as_json {
        let mut value = json!({
            "command": "show-destination",
            "active_output_root": display(&ctx.output_root),
            "settings_file": display(&settings::settings_path()),
            "saved_output_root": saved,
        });
        if let Some(warning) = &load_warning {
            value["warning"] = json!(warning);
        }
        print_json(&value);
        return ExitCode::Ok;
    }

    if !quiet {
        println!("Destination Settings");
        println!("  active output root : {}", display(&ctx.output_root));
        println!("  settings file      : {}", display(&settings::settings_path()));
        println!(
            "  saved output root  : {}",
            saved.as_deref().unwrap_or("(not set)")
        );
    }
    if let Some(warning) = load_warning {
        console::warning(&format!("Settings warning: {warning}"));
    }
    ExitCode::Ok
}
