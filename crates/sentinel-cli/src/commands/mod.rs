//! Command dispatch

pub mod baseline;
pub mod destination;
pub mod maintain;
pub mod scan;


use crate::cli::Commands;
use crate::context::RuntimeContext;
use crate::exit::ExitCode;

use scan::ScanMode;

pub fn dispatch(command: Commands, ctx: &RuntimeContext) -> ExitCode {
    match command {
        Commands::Init {
            path,
            force,
            output,
        } => scan::run_init(ctx, &path, force, &output),

        Commands::Scan { path, scan, output } => {
            scan::run_scan_mode(ctx, &path, ScanMode::Scan, false, &scan, &output)
        }
        Commands::Update { path, scan, output } => {
            scan::run_scan_mode(ctx, &path, ScanMode::Update, false, &scan, &output)
        }
        Commands::Status {
            path,
            hash_only,
            output,
        } => {
            let scan = crate::cli::ScanFlags {
                hash_only,
                ..Default::default()
            };
            scan::run_scan_mode(ctx, &path, ScanMode::Status, false, &scan, &output)
        }
        Commands::Verify {
            path,
            reports,
            scan,
            output,
        } => scan::run_scan_mode(ctx, &path, ScanMode::Verify, reports, &scan, &output),

        Commands::Watch {
            path,
            interval,
            cycles,
            reports,
            fail_fast,
            scan,
            output,
        } => scan::run_watch(
            ctx, &path, interval, cycles, reports, fail_fast, &scan, &output,
        ),

        Commands::ListBaseline { limit, json } => baseline::run_list(ctx, limit, json),
        Commands::ShowBaseline { path, json } => baseline::run_show(ctx, &path, json),
        Commands::ExportBaseline { file, overwrite } => {
            baseline::run_export(ctx, &file, overwrite)
        }
        Commands::ImportBaseline { file, force } => baseline::run_import(ctx, &file, force),

        Commands::SetDestination { path, json, quiet } => {
            destination::run_set(&path, json, quiet)
        }
        Commands::ShowDestination { json, quiet } => destination::run_show(ctx, json, quiet),

        Commands::Doctor { fix, output } => maintain::run_doctor(ctx, fix, &output),
        Commands::Guard { fix, output } => maintain::run_guard(ctx, fix, &output),
        Commands::PurgeReports { days, all, dry_run } => {
            maintain::run_purge_reports(ctx, days, all, dry_run)
        }
        Commands::ReportIndex {
            r#type,
            limit,
            json,
        } => maintain::run_report_index(ctx, r#type, limit, json),
        Commands::TailLog { lines } => maintain::run_tail_log(ctx, lines),
    }
}
