//! Capability probe framework for FFmpeg-backed media runtimes.
//!
//! A probe run executes an ordered list of checks against a media runtime and
//! collects a [`CapabilityReport`]. Checks confirm that the runtime loads,
//! report engine and binding versions, enumerate codecs and formats, look for
//! a demuxer in the engine's own listing and open a remote stream over a
//! secure transport.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use avcheck_core::{ProbeConfig, run_probe};
//! use avcheck_core::reporting::TerminalReporter;
//!
//! let config = ProbeConfig::default();
//! let report = run_probe(&config, &TerminalReporter::new()).unwrap();
//! std::process::exit(report.exit_code() as i32);
//! ```

pub mod checks;
pub mod config;
pub mod demuxer;
pub mod error;
pub mod external;
pub mod report;
pub mod reporting;
pub mod runner;
pub mod runtime;

// Re-exports for public API
pub use checks::{Check, CheckOutcome, CheckSpec, ProbeContext, default_checks};
pub use config::ProbeConfig;
pub use demuxer::DemuxerMatcher;
pub use error::{CoreError, CoreResult, ErrorKind};
pub use report::{CapabilityReport, CheckResult, Outcome, ReportStatus, RunState};
pub use reporting::Reporter;
pub use runner::ProbeRunner;
pub use runtime::{
    BackendIntrospector, FfmpegFactory, FfmpegIntrospector, MediaSource, RuntimeFactory,
    RuntimeHandle, StreamInfo, StreamProbeResult,
};

/// Runs the default check list against the FFmpeg installation described by `config`.
///
/// Only an invalid configuration is returned as an error; every check failure
/// is recorded in the report.
pub fn run_probe(config: &ProbeConfig, reporter: &dyn Reporter) -> CoreResult<CapabilityReport> {
    config.validate()?;

    let factory = FfmpegFactory::from_config(config);
    let introspector = FfmpegIntrospector::from_config(config);
    let mut ctx = ProbeContext::new(&factory, &introspector);

    let runner = ProbeRunner::new(default_checks(config));
    log::info!("Starting probe run with {} checks", runner.len());
    let report = runner.run(&mut ctx, reporter);
    log::info!(
        "Probe run {} with status {} after {} check(s)",
        report.state(),
        report.status(),
        report.len()
    );
    Ok(report)
}
