//! metatar CLI - record and verify filesystem metadata manifests.

mod cli;
mod commands;
mod error;
mod logging;
mod output;
mod progress;

use clap::Parser;
use commands::Outcome;
use std::path::Path;
use std::process::ExitCode;

/// Program name used as the diagnostic prefix.
fn program_name() -> String {
    std::env::args_os()
        .next()
        .as_deref()
        .and_then(|arg0| Path::new(arg0).file_name())
        .map_or_else(
            || "metatar".to_string(),
            |name| name.to_string_lossy().into_owned(),
        )
}

fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    logging::init();

    let program = program_name();
    let formatter = output::create_formatter(cli.json, cli.verbose, cli.quiet);

    let result = match &cli.command {
        cli::Commands::Create(args) => {
            commands::create::execute(args, &*formatter, &program, cli.quiet)
        }
        cli::Commands::List(args) => commands::list::execute(args, &*formatter, &program),
        cli::Commands::Verify(args) => commands::verify::execute(args, &*formatter, &program),
        cli::Commands::Completion { shell } => {
            commands::completion::execute(*shell);
            Ok(Outcome::Success)
        }
    };

    match result {
        Ok(outcome) => outcome.exit_code(),
        Err(err) => {
            tracing::debug!(error = ?err, "command failed");
            eprintln!("{program}: {err:#}");
            ExitCode::from(1)
        }
    }
}
