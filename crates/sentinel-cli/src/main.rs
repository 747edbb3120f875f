//! Sentinel CLI
//!
//! Binds the integrity engine into operator-facing commands with a
//! stable exit-code contract: 0 ok, 1 usage, 2 changes detected,
//! 3 baseline missing, 4 target mismatch, 5 operation failed.

mod advice;
mod cli;
mod commands;
mod console;
mod context;
mod exit;
mod settings;
mod summary;

use clap::Parser;

use cli::Cli;
use context::RuntimeContext;
use exit::ExitCode;

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // Help and version land here too; only real parse failures
            // are usage errors.
            let code = if err.use_stderr() {
                ExitCode::Usage
            } else {
                ExitCode::Ok
            };
            let _ = err.print();
            std::process::exit(code.code());
        }
    };

    let ctx = RuntimeContext::resolve(cli.output_root.as_deref());
    ctx.ensure_dirs();
    console::init_logging(&ctx.log_file, cli.verbose);
    tracing::debug!(
        run_id = %ctx.run_id,
        output_root = %ctx.output_root.display(),
        "sentinel starting"
    );

    let code = commands::dispatch(cli.command, &ctx);
    std::process::exit(code.code());
}
