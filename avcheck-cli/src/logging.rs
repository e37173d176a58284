// ============================================================================
// avcheck-cli/src/logging.rs
// ============================================================================
//
// LOGGING SETUP: fern Dispatch for Console and Optional File Output
//
// Logs go to stderr so that stdout carries only the report. The console shows
// warnings and errors unless --verbose is given; a log file, when requested,
// always receives debug-level records with timestamps.

use anyhow::{Context, Result};
use log::LevelFilter;
use std::path::Path;

/// Returns the current local time formatted for log lines.
pub fn get_timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

pub fn console_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    }
}

/// Installs the global logger.
pub fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let console = fern::Dispatch::new()
        .level(console_level(verbose))
        .format(|out, message, record| {
            out.finish(format_args!("[{}] {}", record.level(), message))
        })
        .chain(std::io::stderr());

    let mut root = fern::Dispatch::new().chain(console);

    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create log directory {}", parent.display())
                })?;
            }
            let file = fern::log_file(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            root = root.level(LevelFilter::Debug).chain(
                fern::Dispatch::new()
                    .level(LevelFilter::Debug)
                    .format(|out, message, record| {
                        out.finish(format_args!(
                            "{} [{}] {}: {}",
                            get_timestamp(),
                            record.level(),
                            record.target(),
                            message
                        ))
                    })
                    .chain(file),
            );
        }
        None => {
            root = root.level(console_level(verbose));
        }
    }

    root.apply().context("Failed to initialise logging")?;
    Ok(())
}
