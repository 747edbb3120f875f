//! Orchestration of the scan-family operations
//!
//! init / scan / update / status / verify / watch all share the same
//! skeleton: validate the target, load and verify the baseline, build a
//! snapshot, compare, optionally render reports, and derive the exit
//! code. Report rendering fans out onto scoped threads and can fail
//! without affecting the operation's outcome.

use std::path::Path;

use serde_json::json;

use sentinel_core::reports;
use sentinel_core::{compare, LoadedBaseline, ScanResult};
use sentinel_fs::path::normalize;

use crate::advice::{build_init_advice, build_scan_advice, build_watch_advice, print_advice};
use crate::cli::{OutputFlags, ReportFormat, ScanFlags};
use crate::console;
use crate::context::{display, OutputPaths, RuntimeContext};
use crate::exit::ExitCode;
use crate::summary::print_summary;

/// Which scan-family operation is running. Watch reuses the same
/// comparison core but owns its own loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    Scan,
    Update,
    Status,
    Verify,
}

impl ScanMode {
    pub fn command_name(self) -> &'static str {
        match self {
            Self::Scan => "scan",
            Self::Update => "update",
            Self::Status => "status",
            Self::Verify => "verify",
        }
    }
}

/// Which report formats an operation should write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportSelection {
    pub cli: bool,
    pub html: bool,
    pub json: bool,
    pub csv: bool,
}

impl Default for ReportSelection {
    fn default() -> Self {
        Self {
            cli: true,
            html: true,
            json: true,
            csv: true,
        }
    }
}

impl ReportSelection {
    pub const NONE: Self = Self {
        cli: false,
        html: false,
        json: false,
        csv: false,
    };

    /// Fold an explicit `--report-formats` list. `all` and `none` reset
    /// the whole selection; individual formats accumulate.
    pub fn from_formats(formats: &[ReportFormat]) -> Self {
        let mut selection = Self::NONE;
        for format in formats {
            match format {
                ReportFormat::All => selection = Self::default(),
                ReportFormat::None => selection = Self::NONE,
                ReportFormat::Cli => selection.cli = true,
                ReportFormat::Html => selection.html = true,
                ReportFormat::Json => selection.json = true,
                ReportFormat::Csv => selection.csv = true,
            }
        }
        selection
    }

    pub fn any(self) -> bool {
        self.cli || self.html || self.json || self.csv
    }
}

/// Everything one comparison produced, for summaries and JSON output.
pub struct ScanOutcome {
    pub target: String,
    pub result: ScanResult,
    pub outputs: OutputPaths,
}

/// Load and seal-verify the baseline, mapping failures onto the exit
/// contract and printing the operator-facing explanation.
pub fn load_baseline(ctx: &RuntimeContext) -> Result<LoadedBaseline, ExitCode> {
    match ctx.store().load() {
        Ok(loaded) => {
            if let Some(warning) = &loaded.warning {
                console::warning(warning);
            }
            Ok(loaded)
        }
        Err(err) => {
            console::error(&err.to_string());
            let code = ExitCode::from_baseline_error(&err);
            if code == ExitCode::BaselineMissing {
                console::error("Baseline not found. Run init <path> first.");
            } else {
                console::error("Run init --force or update after confirming trusted state.");
            }
            Err(code)
        }
    }
}

/// Validate a requested target directory and return its normalized form.
fn validate_target(path: &Path) -> Result<String, ExitCode> {
    if !path.is_dir() {
        console::error(&format!(
            "Target directory does not exist: {}",
            path.display()
        ));
        return Err(ExitCode::Usage);
    }
    Ok(normalize(path))
}

/// Check the baseline's recorded root against the requested target.
fn check_root(baseline: &LoadedBaseline, target: &str) -> Result<(), ExitCode> {
    if !baseline.root.is_empty() && baseline.root != target {
        console::error("Baseline target mismatch.");
        console::error(&format!("Baseline target: {}", baseline.root));
        console::error(&format!("Requested target: {target}"));
        return Err(ExitCode::TargetMismatch);
    }
    Ok(())
}

/// Load the baseline, snapshot the target, and classify drift.
fn compare_target(
    ctx: &RuntimeContext,
    target: &str,
    consider_mtime: bool,
) -> Result<ScanOutcome, ExitCode> {
    let baseline = load_baseline(ctx)?;
    check_root(&baseline, target)?;

    let ignore = ctx.ignore();
    let (current, snapshot_stats) = sentinel_core::build_snapshot(Path::new(target), &ignore);
    let mut result = compare(&baseline.entries, &current, consider_mtime);
    result.stats.duration = snapshot_stats.duration;

    Ok(ScanOutcome {
        target: target.to_string(),
        result,
        outputs: ctx.default_outputs(),
    })
}

pub fn run_init(ctx: &RuntimeContext, path: &Path, force: bool, flags: &OutputFlags) -> ExitCode {
    let target = match validate_target(path) {
        Ok(target) => target,
        Err(code) => return code,
    };

    let store = ctx.store();
    if store.document_exists() && !force {
        console::error("Baseline already exists. Use --force to replace it.");
        return ExitCode::OperationFailed;
    }

    let ignore = ctx.ignore();
    let (snapshot, stats) = sentinel_core::build_snapshot(Path::new(&target), &ignore);
    if let Err(err) = store.save(&snapshot, &target) {
        console::error(&err.to_string());
        return ExitCode::OperationFailed;
    }

    if flags.json {
        print_json(&json!({
            "command": "init",
            "target": target,
            "files_scanned": stats.scanned,
            "baseline": display(&ctx.baseline_path),
        }));
    } else {
        console::success(&format!(
            "Baseline initialized with {} files.",
            stats.scanned
        ));
        if flags.quiet {
            console::info(&format!("INIT summary: scanned={}", stats.scanned));
        } else {
            print_summary(&target, &stats, &ctx.default_outputs(), true);
        }
        if !flags.quiet && !flags.no_advice {
            print_advice(&build_init_advice(stats.scanned));
        }
    }

    ExitCode::Ok
}

pub fn run_scan_mode(
    ctx: &RuntimeContext,
    path: &Path,
    mode: ScanMode,
    requested_reports: bool,
    scan: &ScanFlags,
    flags: &OutputFlags,
) -> ExitCode {
    let target = match validate_target(path) {
        Ok(target) => target,
        Err(code) => return code,
    };

    let selection = scan
        .report_formats
        .as_deref()
        .map(ReportSelection::from_formats)
        .unwrap_or_default();
    let explicit_selection = scan.report_formats.is_some();

    let mut outcome = match compare_target(ctx, &target, !scan.hash_only) {
        Ok(outcome) => outcome,
        Err(code) => {
            if flags.json {
                print_json(&json!({
                    "command": mode.command_name(),
                    "target": target,
                    "exit_code": code.code(),
                    "error": error_label(code),
                }));
            }
            return code;
        }
    };

    if !flags.json && !flags.quiet {
        log_changes(&outcome.result);
    }

    let mut write_reports =
        matches!(mode, ScanMode::Scan | ScanMode::Update) || requested_reports;
    if mode == ScanMode::Status || scan.no_reports {
        write_reports = false;
    }
    if explicit_selection {
        write_reports = selection.any();
    }

    if write_reports {
        let scan_id = ctx.run_id.clone();
        outcome.outputs =
            generate_reports(ctx, &outcome.result, &scan_id, selection, !flags.json);
    }

    if mode == ScanMode::Update {
        if let Err(err) = ctx.store().save(&outcome.result.current, &target) {
            console::error(&err.to_string());
            console::error("Scan completed, but the baseline update failed.");
            return ExitCode::OperationFailed;
        }
        if !flags.json {
            console::info("Baseline refreshed.");
        }
    }

    let changes = outcome.result.has_changes();
    let code = if changes
        && (matches!(mode, ScanMode::Status | ScanMode::Verify) || scan.strict)
    {
        ExitCode::ChangesDetected
    } else {
        ExitCode::Ok
    };

    if flags.json {
        print_scan_json(mode.command_name(), &outcome, code);
    } else {
        if flags.quiet {
            let stats = outcome.result.stats;
            println!(
                "Scan: scanned={} added={} modified={} deleted={} duration={:.2}s",
                stats.scanned, stats.added, stats.modified, stats.deleted, stats.duration
            );
        } else {
            print_summary(&target, &outcome.result.stats, &outcome.outputs, true);
        }
        if mode == ScanMode::Status {
            if changes {
                console::warning("STATUS: CHANGES_DETECTED");
            } else {
                console::success("STATUS: CLEAN");
            }
        }
        if !flags.quiet && !flags.no_advice {
            print_advice(&build_scan_advice(
                &outcome.result,
                mode,
                mode == ScanMode::Update,
            ));
        }
    }

    code
}

#[allow(clippy::too_many_arguments)]
pub fn run_watch(
    ctx: &RuntimeContext,
    path: &Path,
    interval: u64,
    cycles: u32,
    requested_reports: bool,
    fail_fast: bool,
    scan: &ScanFlags,
    flags: &OutputFlags,
) -> ExitCode {
    let target = match validate_target(path) {
        Ok(target) => target,
        Err(code) => return code,
    };

    let selection = scan
        .report_formats
        .as_deref()
        .map(ReportSelection::from_formats)
        .unwrap_or_default();
    let emit_reports = if scan.report_formats.is_some() {
        selection.any()
    } else {
        requested_reports && !scan.no_reports
    };

    let baseline = match load_baseline(ctx).and_then(|baseline| {
        check_root(&baseline, &target).map(|()| baseline)
    }) {
        Ok(baseline) => baseline,
        Err(code) => {
            if flags.json {
                print_json(&json!({
                    "command": "watch",
                    "target": target,
                    "exit_code": code.code(),
                    "error": error_label(code),
                }));
            }
            return code;
        }
    };

    let ignore = ctx.ignore();
    let mut any_changes = false;

    for cycle in 1..=cycles {
        let (current, snapshot_stats) =
            sentinel_core::build_snapshot(Path::new(&target), &ignore);
        let mut result = compare(&baseline.entries, &current, !scan.hash_only);
        result.stats.duration = snapshot_stats.duration;

        let changed = result.has_changes();
        any_changes = any_changes || changed;
        let stats = result.stats;

        if flags.json {
            // One compact object per cycle keeps the stream parseable line by line.
            println!(
                "{}",
                json!({
                    "cycle": cycle,
                    "cycles": cycles,
                    "scanned": stats.scanned,
                    "added": stats.added,
                    "modified": stats.modified,
                    "deleted": stats.deleted,
                    "changed": changed,
                })
            );
        } else if !flags.quiet {
            println!(
                "Cycle {cycle}/{cycles} | scanned={} added={} modified={} deleted={} duration={:.2}s",
                stats.scanned, stats.added, stats.modified, stats.deleted, stats.duration
            );
        }

        if changed {
            if !flags.json && !flags.quiet {
                log_changes(&result);
            }
            if emit_reports {
                let scan_id = format!("{}_watch_{cycle}", ctx.run_id);
                generate_reports(ctx, &result, &scan_id, selection, !flags.json);
            }
            if fail_fast {
                return ExitCode::ChangesDetected;
            }
        }

        if cycle < cycles {
            std::thread::sleep(std::time::Duration::from_secs(interval));
        }
    }

    if !flags.json {
        if flags.quiet {
            println!(
                "Watch complete: cycles={cycles} interval={interval}s changes_detected={}",
                if any_changes { "yes" } else { "no" }
            );
        } else if !flags.no_advice {
            print_advice(&build_watch_advice(any_changes, cycles, interval, fail_fast));
        }
    }

    if any_changes {
        ExitCode::ChangesDetected
    } else {
        ExitCode::Ok
    }
}

/// Render the selected reports in parallel and collect their paths.
/// A renderer that fails logs the failure and leaves its slot empty;
/// the operation's exit code never depends on report generation.
pub fn generate_reports(
    ctx: &RuntimeContext,
    result: &ScanResult,
    scan_id: &str,
    selection: ReportSelection,
    log_errors: bool,
) -> OutputPaths {
    let mut outputs = ctx.default_outputs();

    std::thread::scope(|scope| {
        let cli_job = selection
            .cli
            .then(|| scope.spawn(|| reports::cli::write_cli(result, scan_id, &ctx.report_cli_dir)));
        let html_job = selection.html.then(|| {
            scope.spawn(|| reports::html::write_html(result, scan_id, &ctx.report_html_dir))
        });
        let json_job = selection.json.then(|| {
            scope.spawn(|| reports::json::write_json(result, scan_id, &ctx.report_json_dir))
        });
        let csv_job = selection
            .csv
            .then(|| scope.spawn(|| reports::csv::write_csv(result, scan_id, &ctx.report_csv_dir)));

        outputs.cli_report = finish_report(cli_job, "CLI", log_errors);
        outputs.html_report = finish_report(html_job, "HTML", log_errors);
        outputs.json_report = finish_report(json_job, "JSON", log_errors);
        outputs.csv_report = finish_report(csv_job, "CSV", log_errors);
    });

    outputs
}

fn finish_report(
    job: Option<std::thread::ScopedJoinHandle<'_, sentinel_core::Result<std::path::PathBuf>>>,
    name: &str,
    log_errors: bool,
) -> String {
    let Some(job) = job else {
        return "N/A".to_string();
    };
    match job.join() {
        Ok(Ok(path)) => display(&path),
        Ok(Err(err)) => {
            if log_errors {
                console::error(&format!("Failed to generate {name} report: {err}"));
            }
            String::new()
        }
        Err(_) => {
            if log_errors {
                console::error(&format!("Failed to generate {name} report: renderer panicked"));
            }
            String::new()
        }
    }
}

fn log_changes(result: &ScanResult) {
    for path in result.added.keys() {
        console::success(&format!("[NEW] {path}"));
    }
    for path in result.modified.keys() {
        console::warning(&format!("[MODIFIED] {path}"));
    }
    for path in result.deleted.keys() {
        console::error(&format!("[DELETED] {path}"));
    }
}

fn print_scan_json(command: &str, outcome: &ScanOutcome, code: ExitCode) {
    let stats = outcome.result.stats;
    print_json(&json!({
        "command": command,
        "target": outcome.target,
        "changed": outcome.result.has_changes(),
        "exit_code": code.code(),
        "stats": {
            "scanned": stats.scanned,
            "added": stats.added,
            "modified": stats.modified,
            "deleted": stats.deleted,
            "duration": stats.duration,
        },
        "outputs": {
            "cli": outcome.outputs.cli_report,
            "html": outcome.outputs.html_report,
            "json": outcome.outputs.json_report,
            "csv": outcome.outputs.csv_report,
        },
    }));
}

fn error_label(code: ExitCode) -> &'static str {
    match code {
        ExitCode::BaselineMissing => "baseline_missing",
        ExitCode::TargetMismatch => "target_mismatch",
        ExitCode::Usage => "usage_error",
        _ => "operation_failed",
    }
}

pub(crate) fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(rendered) => println!("{rendered}"),
        Err(err) => console::error(&format!("Failed to render JSON output: {err}")),
    }
}
