//! Operator-facing console output and activity logging
//!
//! Result lines go to the console in color; every line is mirrored into
//! the per-run activity log through `tracing`, which is what `tail-log`
//! reads back. Errors go to stderr so machine-readable stdout stays clean.

use std::path::Path;
use std::sync::Mutex;

use colored::Colorize;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the tracing subscriber: a non-ANSI file layer for the activity
/// log, plus a stderr layer when verbose diagnostics are requested.
/// `RUST_LOG` overrides the default filter.
pub fn init_logging(log_file: &Path, verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));

    let file_layer = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .ok()
        .map(|file| {
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(false)
        });

    let stderr_layer = verbose.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .compact()
    });

    // A second init in the same process (tests) is a no-op.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init();
}

pub fn info(message: &str) {
    println!("{message}");
    tracing::info!("{message}");
}

pub fn success(message: &str) {
    println!("{} {}", "ok:".green().bold(), message);
    tracing::info!("{message}");
}

pub fn warning(message: &str) {
    println!("{} {}", "warning:".yellow().bold(), message);
    tracing::warn!("{message}");
}

pub fn error(message: &str) {
    eprintln!("{} {}", "error:".red().bold(), message);
    tracing::error!("{message}");
}
