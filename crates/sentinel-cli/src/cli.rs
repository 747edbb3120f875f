//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

const LONG_ABOUT: &str = "\
Sentinel is a host-based file-integrity monitor focused on clear evidence,
predictable behavior, and local-first operation. It records a trusted
baseline of a directory tree, detects drift (added, modified, and deleted
files), and emits reports for operators and machines. Exit codes gate CI
pipelines: 0 ok, 1 usage error, 2 changes detected, 3 baseline missing,
4 target mismatch, 5 operation failed.

Sentinel runs locally and never ships data off host. Use it only on
systems you own or are authorized to monitor.";

/// Sentinel - host-based file-integrity monitoring
#[derive(Parser, Debug)]
#[command(name = "sentinel")]
#[command(version, about, long_about = LONG_ABOUT)]
pub struct Cli {
    /// Destination root for logs, reports, and the baseline
    /// (overrides the saved setting and SENTINEL_ROOT)
    #[arg(long, global = true, value_name = "PATH")]
    pub output_root: Option<PathBuf>,

    /// Enable verbose diagnostics on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Create a trusted baseline snapshot of a directory
    Init {
        /// Target directory to baseline
        path: PathBuf,

        /// Replace an existing baseline
        #[arg(long)]
        force: bool,

        #[command(flatten)]
        output: OutputFlags,
    },

    /// Compare current state with the baseline and generate reports
    Scan {
        /// Target directory to scan
        path: PathBuf,

        #[command(flatten)]
        scan: ScanFlags,

        #[command(flatten)]
        output: OutputFlags,
    },

    /// Scan, then refresh the baseline after approved changes
    Update {
        /// Target directory to scan and re-baseline
        path: PathBuf,

        #[command(flatten)]
        scan: ScanFlags,

        #[command(flatten)]
        output: OutputFlags,
    },

    /// CI-friendly integrity check: exit 2 on any drift, no reports
    Status {
        /// Target directory to check
        path: PathBuf,

        /// Compare by hash and size only, ignoring modification times
        #[arg(long)]
        hash_only: bool,

        #[command(flatten)]
        output: OutputFlags,
    },

    /// Verification flow: exit 2 on drift, reports on request
    Verify {
        /// Target directory to verify
        path: PathBuf,

        /// Write reports for this verification
        #[arg(long)]
        reports: bool,

        #[command(flatten)]
        scan: ScanFlags,

        #[command(flatten)]
        output: OutputFlags,
    },

    /// Repeated monitoring cycles against one loaded baseline
    Watch {
        /// Target directory to watch
        path: PathBuf,

        /// Seconds to sleep between cycles
        #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u64).range(1..))]
        interval: u64,

        /// Number of cycles to run
        #[arg(long, default_value_t = 12, value_parser = clap::value_parser!(u32).range(1..))]
        cycles: u32,

        /// Write reports for cycles that detect drift
        #[arg(long)]
        reports: bool,

        /// Exit with code 2 at the first cycle that detects drift
        #[arg(long)]
        fail_fast: bool,

        #[command(flatten)]
        scan: ScanFlags,

        #[command(flatten)]
        output: OutputFlags,
    },

    /// List tracked baseline entries
    ListBaseline {
        /// Maximum entries to print
        #[arg(long, default_value_t = 50, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
        limit: usize,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Inspect one baseline record by exact path or unique substring
    ShowBaseline {
        /// Path (or substring of a path) to look up
        path: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Copy the baseline document to an external file
    ExportBaseline {
        /// Destination file
        file: PathBuf,

        /// Replace the destination if it exists
        #[arg(long)]
        overwrite: bool,
    },

    /// Replace the baseline with an external document (with rollback)
    ImportBaseline {
        /// Source baseline document
        file: PathBuf,

        /// Replace an existing baseline
        #[arg(long)]
        force: bool,
    },

    /// Save a persistent destination for logs, reports, and the baseline
    SetDestination {
        /// New output root
        path: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Suppress non-essential console output
        #[arg(long)]
        quiet: bool,
    },

    /// Show the active and saved output destinations
    ShowDestination {
        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Suppress non-essential console output
        #[arg(long)]
        quiet: bool,
    },

    /// Check operational health: directories, writability, baseline, hashing
    Doctor {
        /// Create missing directories before checking
        #[arg(long)]
        fix: bool,

        #[command(flatten)]
        output: OutputFlags,
    },

    /// Security-focused checks: permissions, seal integrity, log naming
    Guard {
        /// Create missing directories before checking
        #[arg(long)]
        fix: bool,

        #[command(flatten)]
        output: OutputFlags,
    },

    /// Remove old report artifacts
    PurgeReports {
        /// Remove reports older than this many days
        #[arg(long, conflicts_with = "all", value_parser = clap::value_parser!(u32).range(1..))]
        days: Option<u32>,

        /// Remove all reports regardless of age
        #[arg(long)]
        all: bool,

        /// Show what would be removed without removing it
        #[arg(long)]
        dry_run: bool,
    },

    /// List recent report artifacts
    ReportIndex {
        /// Report type to list
        #[arg(long, value_enum, default_value_t = ReportType::All)]
        r#type: ReportType,

        /// Maximum entries to print
        #[arg(long, default_value_t = 30, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
        limit: usize,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the tail of the most recent activity log
    TailLog {
        /// Number of trailing lines to print
        #[arg(long, default_value_t = 40, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
        lines: usize,
    },
}

/// Flags shared by the scan-family commands
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct ScanFlags {
    /// Comma-separated report formats to write
    #[arg(
        long,
        value_enum,
        value_delimiter = ',',
        value_name = "LIST",
        conflicts_with = "no_reports"
    )]
    pub report_formats: Option<Vec<ReportFormat>>,

    /// Exit with code 2 when drift is detected
    #[arg(long)]
    pub strict: bool,

    /// Compare by hash and size only, ignoring modification times
    #[arg(long)]
    pub hash_only: bool,

    /// Skip report generation entirely
    #[arg(long)]
    pub no_reports: bool,
}

/// Console and stdout behavior shared by most commands
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct OutputFlags {
    /// Emit machine-readable JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Suppress non-essential console output
    #[arg(long)]
    pub quiet: bool,

    /// Skip the guidance block
    #[arg(long)]
    pub no_advice: bool,
}

/// One token of a `--report-formats` list
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Cli,
    Html,
    Json,
    Csv,
    All,
    None,
}

/// Report type filter for `report-index`
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportType {
    All,
    Cli,
    Html,
    Json,
    Csv,
}

impl std::fmt::Display for ReportType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::All => "all",
            Self::Cli => "cli",
            Self::Html => "html",
            Self::Json => "json",
            Self::Csv => "csv",
        };
        write!(f, "{label}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_init_with_force() {
        let cli = Cli::parse_from(["sentinel", "init", "/data/x", "--force"]);
        match cli.command {
            Commands::Init { path, force, .. } => {
                assert_eq!(path, PathBuf::from("/data/x"));
                assert!(force);
            }
            other => panic!("expected Init, got {other:?}"),
        }
    }

    #[test]
    fn parse_scan_defaults() {
        let cli = Cli::parse_from(["sentinel", "scan", "/data/x"]);
        match cli.command {
            Commands::Scan { scan, output, .. } => {
                assert_eq!(scan, ScanFlags::default());
                assert_eq!(output, OutputFlags::default());
            }
            other => panic!("expected Scan, got {other:?}"),
        }
    }

    #[test]
    fn parse_report_formats_list() {
        let cli = Cli::parse_from([
            "sentinel",
            "scan",
            "/data/x",
            "--report-formats",
            "cli,html,csv",
        ]);
        match cli.command {
            Commands::Scan { scan, .. } => {
                assert_eq!(
                    scan.report_formats,
                    Some(vec![
                        ReportFormat::Cli,
                        ReportFormat::Html,
                        ReportFormat::Csv
                    ])
                );
            }
            other => panic!("expected Scan, got {other:?}"),
        }
    }

    #[test]
    fn invalid_report_format_is_rejected() {
        let result = Cli::try_parse_from(["sentinel", "scan", "/x", "--report-formats", "pdf"]);
        assert!(result.is_err());
    }

    #[test]
    fn no_reports_conflicts_with_report_formats() {
        let result = Cli::try_parse_from([
            "sentinel",
            "scan",
            "/x",
            "--no-reports",
            "--report-formats",
            "cli",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn parse_watch_options() {
        let cli = Cli::parse_from([
            "sentinel", "watch", "/x", "--interval", "10", "--cycles", "3", "--fail-fast",
        ]);
        match cli.command {
            Commands::Watch {
                interval,
                cycles,
                fail_fast,
                reports,
                ..
            } => {
                assert_eq!(interval, 10);
                assert_eq!(cycles, 3);
                assert!(fail_fast);
                assert!(!reports);
            }
            other => panic!("expected Watch, got {other:?}"),
        }
    }

    #[test]
    fn watch_rejects_zero_interval() {
        assert!(Cli::try_parse_from(["sentinel", "watch", "/x", "--interval", "0"]).is_err());
    }

    #[test]
    fn purge_days_conflicts_with_all() {
        assert!(
            Cli::try_parse_from(["sentinel", "purge-reports", "--days", "7", "--all"]).is_err()
        );
    }

    #[test]
    fn parse_list_baseline_defaults() {
        let cli = Cli::parse_from(["sentinel", "list-baseline"]);
        assert_eq!(
            cli.command,
            Commands::ListBaseline {
                limit: 50,
                json: false
            }
        );
    }

    #[test]
    fn parse_report_index_type() {
        let cli = Cli::parse_from(["sentinel", "report-index", "--type", "csv"]);
        match cli.command {
            Commands::ReportIndex { r#type, limit, .. } => {
                assert_eq!(r#type, ReportType::Csv);
                assert_eq!(limit, 30);
            }
            other => panic!("expected ReportIndex, got {other:?}"),
        }
    }

    #[test]
    fn global_output_root_applies_anywhere() {
        let cli = Cli::parse_from(["sentinel", "status", "/x", "--output-root", "/tmp/out"]);
        assert_eq!(cli.output_root, Some(PathBuf::from("/tmp/out")));
    }

    #[test]
    fn subcommands_reject_extra_positionals() {
        assert!(Cli::try_parse_from(["sentinel", "status", "/x", "/y"]).is_err());
        assert!(Cli::try_parse_from(["sentinel", "list-baseline", "/x"]).is_err());
    }
}
