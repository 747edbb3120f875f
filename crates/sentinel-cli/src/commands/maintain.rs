//! Operational health checks and report-directory maintenance

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use colored::Colorize;
use serde_json::json;

use sentinel_fs::checksum;
use sentinel_fs::clock;

use crate::advice::{build_doctor_advice, print_advice};
use crate::cli::{OutputFlags, ReportType};
use crate::commands::scan::print_json;
use crate::console;
use crate::context::{display, RuntimeContext, LOG_PREFIX};
use crate::exit::ExitCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CheckLevel {
    Pass,
    Warn,
    Fail,
}

impl CheckLevel {
    fn label(self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Warn => "warn",
            Self::Fail => "fail",
        }
    }
}

struct Check {
    name: &'static str,
    level: CheckLevel,
    detail: String,
}

fn push(checks: &mut Vec<Check>, name: &'static str, level: CheckLevel, detail: impl Into<String>) {
    checks.push(Check {
        name,
        level,
        detail: detail.into(),
    });
}

fn exists_check(path: &Path) -> CheckLevel {
    if path.exists() {
        CheckLevel::Pass
    } else {
        CheckLevel::Fail
    }
}

/// Render a check list as JSON or a colored table, then derive the exit
/// code: any failure makes the command itself fail.
fn report_checks(
    title: &str,
    command: &str,
    checks: &[Check],
    flags: &OutputFlags,
    doctor_advice: bool,
) -> ExitCode {
    let pass = checks.iter().filter(|c| c.level == CheckLevel::Pass).count();
    let warn = checks.iter().filter(|c| c.level == CheckLevel::Warn).count();
    let fail = checks.iter().filter(|c| c.level == CheckLevel::Fail).count();

    if flags.json {
        let items: Vec<_> = checks
            .iter()
            .map(|check| {
                json!({
                    "name": check.name,
                    "level": check.level.label(),
                    "detail": check.detail,
                })
            })
            .collect();
        print_json(&json!({
            "command": command,
            "pass": pass,
            "warn": warn,
            "fail": fail,
            "checks": items,
        }));
    } else {
        if !flags.quiet {
            println!("{}", title.cyan());
            for check in checks {
                let label = match check.level {
                    CheckLevel::Pass => "[PASS]".green(),
                    CheckLevel::Warn => "[WARN]".yellow(),
                    CheckLevel::Fail => "[FAIL]".red(),
                };
                println!("{label} {:<24} {}", check.name, check.detail);
            }
        }
        println!("\nSummary: {pass} pass, {warn} warn, {fail} fail");
        if !flags.quiet && !flags.no_advice {
            if doctor_advice {
                print_advice(&build_doctor_advice(pass, warn, fail));
            } else {
                let advice: Vec<String> = if fail == 0 && warn == 0 {
                    vec![
                        "Security guard checks passed.".into(),
                        "Baseline seal and output paths look healthy.".into(),
                    ]
                } else if fail == 0 {
                    vec![
                        "Guard checks reported warnings.".into(),
                        "Resolve warnings to improve hardening.".into(),
                    ]
                } else {
                    vec![
                        "Guard checks reported failures.".into(),
                        "Resolve failures before trusting scan outcomes.".into(),
                    ]
                };
                print_advice(&advice);
            }
        }
    }

    if fail > 0 {
        ExitCode::OperationFailed
    } else {
        ExitCode::Ok
    }
}

fn baseline_check(ctx: &RuntimeContext, checks: &mut Vec<Check>) {
    match ctx.store().load() {
        Ok(loaded) => match loaded.warning {
            Some(warning) => push(checks, "baseline", CheckLevel::Warn, warning),
            None => push(
                checks,
                "baseline",
                CheckLevel::Pass,
                if loaded.root.is_empty() {
                    "baseline found".to_string()
                } else {
                    loaded.root
                },
            ),
        },
        Err(err) if err.is_baseline_missing() => {
            push(checks, "baseline", CheckLevel::Warn, "baseline missing; run init");
        }
        Err(err) => push(checks, "baseline", CheckLevel::Fail, err.to_string()),
    }
}

fn ignore_check(ctx: &RuntimeContext, checks: &mut Vec<Check>, name: &'static str) {
    if ctx.ignore_path.exists() || Path::new(".sentinelignore").exists() {
        push(checks, name, CheckLevel::Pass, "ignore rules detected");
    } else {
        push(checks, name, CheckLevel::Warn, "no ignore file found");
    }
}

fn hash_engine_check(ctx: &RuntimeContext, checks: &mut Vec<Check>, stem: &str) {
    let probe = ctx
        .data_dir
        .join(format!(".{stem}_hash_{}.tmp", clock::run_id()));
    let wrote = fs::write(&probe, b"sentinel-integrity").is_ok();
    let digest = wrote.then(|| checksum::sha256_file(&probe)).flatten();
    let _ = fs::remove_file(&probe);

    match digest {
        Some(value) if value == checksum::sha256_hex(b"sentinel-integrity") => {
            push(checks, "hash_engine", CheckLevel::Pass, "sha256 operational");
        }
        _ => push(checks, "hash_engine", CheckLevel::Fail, "sha256 self-test failed"),
    }
}

pub fn run_doctor(ctx: &RuntimeContext, fix: bool, flags: &OutputFlags) -> ExitCode {
    if fix {
        ctx.ensure_dirs();
    }

    let mut checks = Vec::new();
    push(&mut checks, "data_dir", exists_check(&ctx.data_dir), display(&ctx.data_dir));
    push(&mut checks, "log_dir", exists_check(&ctx.log_dir), display(&ctx.log_dir));
    push(
        &mut checks,
        "reports_cli_dir",
        exists_check(&ctx.report_cli_dir),
        display(&ctx.report_cli_dir),
    );
    push(
        &mut checks,
        "reports_html_dir",
        exists_check(&ctx.report_html_dir),
        display(&ctx.report_html_dir),
    );
    push(
        &mut checks,
        "reports_json_dir",
        exists_check(&ctx.report_json_dir),
        display(&ctx.report_json_dir),
    );
    push(
        &mut checks,
        "reports_csv_dir",
        exists_check(&ctx.report_csv_dir),
        display(&ctx.report_csv_dir),
    );

    let log_writable = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&ctx.log_file)
        .is_ok();
    push(
        &mut checks,
        "log_writable",
        if log_writable { CheckLevel::Pass } else { CheckLevel::Fail },
        display(&ctx.log_file),
    );

    let mut reports_writable = true;
    for (_, dir) in ctx.report_dirs() {
        let probe = dir.join(format!(".doctor_{}.tmp", clock::run_id()));
        if fs::write(&probe, b"ok").is_err() {
            reports_writable = false;
            break;
        }
        let _ = fs::remove_file(&probe);
    }
    push(
        &mut checks,
        "reports_writable",
        if reports_writable { CheckLevel::Pass } else { CheckLevel::Fail },
        "report directories write test",
    );

    baseline_check(ctx, &mut checks);
    ignore_check(ctx, &mut checks, "ignore_file");
    hash_engine_check(ctx, &mut checks, "doctor");

    report_checks("Sentinel Doctor Report", "doctor", &checks, flags, true)
}

pub fn run_guard(ctx: &RuntimeContext, fix: bool, flags: &OutputFlags) -> ExitCode {
    if fix {
        ctx.ensure_dirs();
    }

    let mut checks = Vec::new();
    push(
        &mut checks,
        "output_root",
        exists_check(&ctx.root_dir),
        display(&ctx.root_dir),
    );

    #[cfg(unix)]
    if ctx.root_dir.exists() {
        let loose = others_writable(&ctx.root_dir);
        push(
            &mut checks,
            "output_root_permissions",
            if loose { CheckLevel::Warn } else { CheckLevel::Pass },
            if loose {
                "output root is writable by other users"
            } else {
                "output root permissions are restricted"
            },
        );
    }
    #[cfg(not(unix))]
    push(
        &mut checks,
        "output_root_permissions",
        CheckLevel::Pass,
        "permission check not required on this platform",
    );

    baseline_check(ctx, &mut checks);

    let log_name = ctx
        .log_file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let log_name_ok = log_name.starts_with(LOG_PREFIX) && log_name.ends_with(".log");
    push(
        &mut checks,
        "log_naming",
        if log_name_ok { CheckLevel::Pass } else { CheckLevel::Warn },
        if log_name_ok {
            log_name
        } else {
            "log file naming pattern is not timestamped".to_string()
        },
    );

    ignore_check(ctx, &mut checks, "ignore_rules");
    hash_engine_check(ctx, &mut checks, "guard");

    report_checks("Sentinel Guard Report", "guard", &checks, flags, false)
}

#[cfg(unix)]
fn others_writable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    fs::metadata(path)
        .map(|meta| meta.permissions().mode() & 0o002 != 0)
        .unwrap_or(false)
}

pub fn run_purge_reports(
    ctx: &RuntimeContext,
    days: Option<u32>,
    all: bool,
    dry_run: bool,
) -> ExitCode {
    let days = days.unwrap_or(30);
    let cutoff = SystemTime::now()
        .checked_sub(Duration::from_secs(u64::from(days) * 24 * 60 * 60));

    let mut matched: u64 = 0;
    let mut removed: u64 = 0;

    for (_, dir) in ctx.report_dirs() {
        let Ok(entries) = fs::read_dir(dir) else {
            continue;
        };
        for entry in entries.flatten() {
            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            if !file_type.is_file() {
                continue;
            }

            let should_remove = all
                || match (cutoff, entry.metadata().ok().and_then(|m| m.modified().ok())) {
                    (Some(cutoff), Some(modified)) => modified < cutoff,
                    _ => false,
                };
            if !should_remove {
                continue;
            }

            matched += 1;
            if !dry_run && fs::remove_file(entry.path()).is_ok() {
                removed += 1;
            }
        }
    }

    if dry_run {
        console::info(&format!("Dry run complete. Candidate files: {matched}"));
    } else {
        console::success(&format!("Report cleanup complete. Removed files: {removed}"));
    }
    ExitCode::Ok
}

struct ReportItem {
    kind: &'static str,
    path: String,
    size: u64,
    modified: i64,
}

pub fn run_report_index(
    ctx: &RuntimeContext,
    kind: ReportType,
    limit: usize,
    as_json: bool,
) -> ExitCode {
    let mut items = Vec::new();
    for (dir_kind, dir) in ctx.report_dirs() {
        let wanted = match kind {
            ReportType::All => true,
            ReportType::Cli => dir_kind == "cli",
            ReportType::Html => dir_kind == "html",
            ReportType::Json => dir_kind == "json",
            ReportType::Csv => dir_kind == "csv",
        };
        if !wanted {
            continue;
        }

        let Ok(entries) = fs::read_dir(dir) else {
            continue;
        };
        for entry in entries.flatten() {
            let Ok(metadata) = entry.metadata() else {
                continue;
            };
            if !metadata.is_file() {
                continue;
            }
            let modified = metadata
                .modified()
                .ok()
                .and_then(|t| t.duration_since(SystemTime::UNIX_EPOCH).ok())
                .map(|d| d.as_secs() as i64)
                .unwrap_or(0);
            items.push(ReportItem {
                kind: dir_kind,
                path: display(&entry.path()),
                size: metadata.len(),
                modified,
            });
        }
    }

    items.sort_by(|left, right| {
        right
            .modified
            .cmp(&left.modified)
            .then_with(|| left.path.cmp(&right.path))
    });
    items.truncate(limit);

    let type_label = kind.to_string();

    if as_json {
        let rendered: Vec<_> = items
            .iter()
            .map(|item| {
                json!({
                    "type": item.kind,
                    "path": item.path,
                    "size": item.size,
                    "modified": clock::format_epoch(item.modified).unwrap_or_default(),
                })
            })
            .collect();
        print_json(&json!({
            "type": type_label,
            "count": items.len(),
            "items": rendered,
        }));
        return ExitCode::Ok;
    }

    println!("Recent Reports ({type_label})");
    println!("Type   Size(bytes)   Modified             Path");
    println!("-----  -----------   -------------------  ----");
    for item in &items {
        println!(
            "{:<5}  {:>11}   {:<19}  {}",
            item.kind,
            item.size,
            clock::format_epoch(item.modified).unwrap_or_else(|| "-".into()),
            item.path
        );
    }
    if items.is_empty() {
        println!("(no reports found)");
    }
    ExitCode::Ok
}

pub fn run_tail_log(ctx: &RuntimeContext, lines: usize) -> ExitCode {
    let log_path = latest_log_file(ctx);
    let contents = match fs::read_to_string(&log_path) {
        Ok(contents) => contents,
        Err(_) => {
            console::error(&format!("Log file not found: {}", log_path.display()));
            return ExitCode::OperationFailed;
        }
    };

    let all: Vec<&str> = contents.lines().collect();
    let start = all.len().saturating_sub(lines);
    for line in &all[start..] {
        println!("{line}");
    }
    ExitCode::Ok
}

/// Most recently written activity log, preferring non-empty files so a
/// freshly created log for this run does not shadow real history.
fn latest_log_file(ctx: &RuntimeContext) -> PathBuf {
    let Ok(entries) = fs::read_dir(&ctx.log_dir) else {
        return ctx.log_file.clone();
    };

    let mut latest_any: Option<(SystemTime, PathBuf)> = None;
    let mut latest_non_empty: Option<(SystemTime, PathBuf)> = None;

    for entry in entries.flatten() {
        let name = entry.file_name().to_string_lossy().into_owned();
        if !name.starts_with(LOG_PREFIX) || !name.ends_with(".log") {
            continue;
        }
        let Ok(metadata) = entry.metadata() else {
            continue;
        };
        if !metadata.is_file() {
            continue;
        }
        let Ok(modified) = metadata.modified() else {
            continue;
        };

        let candidate = (modified, entry.path());
        if latest_any.as_ref().is_none_or(|(t, _)| modified > *t) {
            latest_any = Some(candidate.clone());
        }
        if metadata.len() > 0 && latest_non_empty.as_ref().is_none_or(|(t, _)| modified > *t) {
            latest_non_empty = Some(candidate);
        }
    }

    latest_non_empty
        .or(latest_any)
        .map(|(_, path)| path)
        .unwrap_or_else(|| ctx.log_file.clone())
}
