//! Baseline inspection and exchange commands

use std::path::Path;

use serde_json::json;

use sentinel_core::FileEntry;
use sentinel_fs::path::normalize;

use crate::commands::scan::{load_baseline, print_json};
use crate::console;
use crate::context::RuntimeContext;
use crate::exit::ExitCode;

pub fn run_list(ctx: &RuntimeContext, limit: usize, as_json: bool) -> ExitCode {
    let baseline = match load_baseline(ctx) {
        Ok(baseline) => baseline,
        Err(code) => {
            if as_json {
                print_json(&json!({
                    "command": "list-baseline",
                    "exit_code": code.code(),
                }));
            }
            return code;
        }
    };

    // Map iteration is already path-ordered.
    let entries: Vec<&FileEntry> = baseline.entries.values().collect();

    if as_json {
        let items: Vec<_> = entries
            .iter()
            .take(limit)
            .map(|entry| {
                json!({
                    "path": entry.path,
                    "size": entry.size,
                    "mtime": entry.mtime,
                })
            })
            .collect();
        print_json(&json!({
            "root": baseline.root,
            "total": entries.len(),
            "items": items,
        }));
        return ExitCode::Ok;
    }

    println!("Baseline Root: {}", baseline.root);
    println!("Tracked Files: {}", entries.len());
    println!("Showing up to: {limit}\n");
    for (index, entry) in entries.iter().take(limit).enumerate() {
        println!("{:>4}  {}  ({} bytes)", index + 1, entry.path, entry.size);
    }
    ExitCode::Ok
}

pub fn run_show(ctx: &RuntimeContext, query: &str, as_json: bool) -> ExitCode {
    let baseline = match load_baseline(ctx) {
        Ok(baseline) => baseline,
        Err(code) => {
            if as_json {
                print_json(&json!({
                    "command": "show-baseline",
                    "query": query,
                    "exit_code": code.code(),
                }));
            }
            return code;
        }
    };

    let normalized = normalize(Path::new(query));
    let entry = match baseline.entries.get(&normalized) {
        Some(entry) => entry,
        None => {
            // Fall back to substring search over tracked paths.
            let matches: Vec<&FileEntry> = baseline
                .entries
                .values()
                .filter(|entry| entry.path.contains(query))
                .collect();

            match matches.as_slice() {
                [] => {
                    if as_json {
                        print_json(&json!({
                            "command": "show-baseline",
                            "query": query,
                            "exit_code": ExitCode::OperationFailed.code(),
                            "error": "entry_not_found",
                        }));
                    } else {
                        console::error(&format!("No baseline entry found for: {query}"));
                    }
                    return ExitCode::OperationFailed;
                }
                [only] => *only,
                many => {
                    let shown: Vec<&str> =
                        many.iter().take(10).map(|e| e.path.as_str()).collect();
                    if as_json {
                        print_json(&json!({
                            "command": "show-baseline",
                            "query": query,
                            "exit_code": ExitCode::Usage.code(),
                            "error": "multiple_matches",
                            "matches": shown,
                        }));
                    } else {
                        console::warning(
                            "Multiple entries matched. Provide a more specific path.",
                        );
                        for path in shown {
                            println!(" - {path}");
                        }
                    }
                    return ExitCode::Usage;
                }
            }
        }
    };

    if as_json {
        print_json(&json!({
            "path": entry.path,
            "hash": entry.hash,
            "size": entry.size,
            "mtime": entry.mtime,
        }));
    } else {
        println!("Path : {}", entry.path);
        println!("Hash : {}", entry.hash);
        println!("Size : {} bytes", entry.size);
        println!("MTime: {}", entry.mtime);
    }
    ExitCode::Ok
}

pub fn run_export(ctx: &RuntimeContext, destination: &Path, overwrite: bool) -> ExitCode {
    let store = ctx.store();
    if !store.document_exists() {
        console::error(&format!(
            "Baseline file not found: {}",
            ctx.baseline_path.display()
        ));
        return ExitCode::BaselineMissing;
    }
    if destination.exists() && !overwrite {
        console::error("Destination already exists. Use --overwrite to replace it.");
        return ExitCode::Usage;
    }

    if let Err(err) = store.export(destination) {
        console::error(&format!("Failed to export baseline: {err}"));
        return ExitCode::OperationFailed;
    }
    console::success(&format!("Baseline exported to: {}", destination.display()));
    ExitCode::Ok
}

pub fn run_import(ctx: &RuntimeContext, source: &Path, force: bool) -> ExitCode {
    if !source.exists() {
        console::error(&format!(
            "Source baseline file not found: {}",
            source.display()
        ));
        return ExitCode::Usage;
    }

    let store = ctx.store();
    if store.document_exists() && !force {
        console::error("Baseline already exists. Use --force to replace it.");
        return ExitCode::Usage;
    }

    match store.import(source) {
        Ok(loaded) => {
            console::success("Baseline imported successfully.");
            if !loaded.root.is_empty() {
                console::info(&format!("Imported baseline target: {}", loaded.root));
            }
            ExitCode::Ok
        }
        Err(err) => {
            console::error(&format!("Imported baseline is invalid: {err}"));
            ExitCode::OperationFailed
        }
    }
}
