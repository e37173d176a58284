//! Library component for the avcheck CLI application.
//!
//! Argument definitions, configuration mapping and logging setup used by the
//! `avcheck` binary.

/// Command-line interface definitions using clap
pub mod cli;

/// Mapping from arguments to the core ProbeConfig
pub mod config;

/// Logger initialisation
pub mod logging;

// Re-exports for convenience
pub use cli::{Cli, OutputFormat, parse_cli, parse_cli_from};
pub use config::build_config;
pub use logging::init_logging;
