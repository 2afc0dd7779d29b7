//! demokit CLI - minimal assertion harness for build verification

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::Session;
use demokit::core::{CallError, ManifestError};
use demokit::ops::UnknownSuiteError;
use demokit::util::diagnostic::{self, Diagnostic};

/// Exit code for usage, manifest and I/O errors. Check failures use their
/// own codes, so this sits outside the usual 1..=N range.
const EXIT_ERROR: u8 = 101;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version go to stdout and succeed
            let code = if e.use_stderr() { EXIT_ERROR } else { 0 };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    init_logging(&cli);

    match run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            report_error(&e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn init_logging(cli: &Cli) {
    // DEMOKIT_LOG wins over the verbosity flags
    let filter = EnvFilter::try_from_env("DEMOKIT_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("demokit=debug")
        } else if cli.quiet {
            EnvFilter::new("demokit=error")
        } else {
            EnvFilter::new("demokit=warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<u8> {
    let session = Session::new(&cli)?;

    match cli.command {
        Commands::List(args) => commands::list::execute(args, &session),
        Commands::Run(args) => commands::run::execute(args, &session),
        Commands::Check(args) => commands::check::execute(args, &session),
        Commands::Env(args) => commands::env::execute(args, &session),
        Commands::Demo(args) => commands::demo::execute(args),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}

/// Print an error, using the structured diagnostic when there is one.
fn report_error(e: &anyhow::Error) {
    let diag: Option<Diagnostic> = if let Some(err) = e.downcast_ref::<ManifestError>() {
        Some(err.to_diagnostic())
    } else if let Some(err) = e.downcast_ref::<CallError>() {
        Some(err.to_diagnostic())
    } else {
        e.downcast_ref::<UnknownSuiteError>()
            .map(UnknownSuiteError::to_diagnostic)
    };

    match diag {
        Some(diag) => diagnostic::emit(&diag),
        None => eprintln!("error: {:#}", e),
    }
}
