//! Main entry point for the avcheck CLI application.
//!
//! Parses arguments, sets up logging, runs the probe with the selected
//! reporter and exits 0 when every fatal check passed, 1 otherwise.

use anyhow::Context;
use avcheck::{Cli, OutputFormat, build_config, init_logging, parse_cli};
use avcheck_core::reporting::{JsonReporter, KeyValueReporter, Reporter, TerminalReporter};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = parse_cli();
    match run(&cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("✗ {:#}", e);
            ExitCode::from(1)
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<u8> {
    init_logging(cli.verbose, cli.log_file.as_deref())?;

    let config = build_config(cli);
    log::debug!("Probe configuration: {:?}", config);

    let reporter: Box<dyn Reporter> = match cli.format {
        OutputFormat::Text => Box::new(TerminalReporter::new()),
        OutputFormat::Kv => Box::new(KeyValueReporter),
        OutputFormat::Json => Box::new(JsonReporter),
    };

    let report = avcheck_core::run_probe(&config, reporter.as_ref())
        .context("Cannot start probe")?;
    Ok(report.exit_code())
}
