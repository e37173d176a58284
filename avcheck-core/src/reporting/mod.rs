//! Reporters render a probe run as it happens.
//!
//! The runner calls a reporter before each check starts, after each result is
//! appended and once the run ends. `TerminalReporter` prints one marked line
//! per check; `KeyValueReporter` and `JsonReporter` produce output for CI.

use crate::report::{CapabilityReport, CheckResult, Outcome, RunState};
use console::{StyledObject, style};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

/// Reporter interface implemented by the human-readable and structured reporters.
pub trait Reporter: Send + Sync {
    fn check_started(&self, _name: &str, _fatal: bool) {}
    fn check_finished(&self, _result: &CheckResult) {}
    fn run_finished(&self, _report: &CapabilityReport) {}
}

/// No-op reporter that discards all updates.
pub struct NullReporter;

impl Reporter for NullReporter {}

/// Status mark for a result: `✓` pass, `✗` fatal failure, `!` advisory failure, `-` skipped.
pub fn status_mark(result: &CheckResult) -> &'static str {
    match result.outcome {
        Outcome::Pass => "✓",
        Outcome::Fail if result.fatal => "✗",
        Outcome::Fail => "!",
        Outcome::Skipped => "-",
    }
}

fn styled_mark(result: &CheckResult) -> StyledObject<&'static str> {
    let mark = style(status_mark(result));
    match result.outcome {
        Outcome::Pass => mark.green().bold(),
        Outcome::Fail if result.fatal => mark.red().bold(),
        Outcome::Fail => mark.yellow().bold(),
        Outcome::Skipped => mark.dim(),
    }
}

/// Status line for a result, styled when the terminal supports colors.
pub fn result_line(result: &CheckResult) -> String {
    format!(
        "{} {}: {}",
        styled_mark(result),
        style(&result.name).bold(),
        result.detail
    )
}

/// Human-friendly reporter that prints concise text output.
pub struct TerminalReporter {
    spinner: Mutex<Option<ProgressBar>>,
}

impl Default for TerminalReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalReporter {
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
        }
    }

    fn finish_spinner(&self) {
        if let Ok(mut guard) = self.spinner.lock() {
            if let Some(pb) = guard.take() {
                pb.finish_and_clear();
            }
        }
    }
}

impl Reporter for TerminalReporter {
    fn check_started(&self, name: &str, _fatal: bool) {
        self.finish_spinner();
        let pb = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::with_template("{spinner} {msg}") {
            pb.set_style(spinner_style);
        }
        pb.set_message(format!("checking {}...", name));
        pb.enable_steady_tick(Duration::from_millis(120));
        if let Ok(mut guard) = self.spinner.lock() {
            *guard = Some(pb);
        }
    }

    fn check_finished(&self, result: &CheckResult) {
        self.finish_spinner();
        println!("{}", result_line(result));
        for warning in &result.warnings {
            println!("{} {}: {}", style("!").yellow().bold(), result.name, warning);
        }
    }

    fn run_finished(&self, report: &CapabilityReport) {
        self.finish_spinner();
        if report.state() == RunState::Completed && report.passed() {
            let line = "=".repeat(50);
            println!("\n{}", line);
            println!(
                "{}",
                style("All checks passed! The media runtime is bound to FFmpeg.")
                    .green()
                    .bold()
            );
            println!("{}", line);
        }
    }
}

/// Line-delimited `key=value` reporter.
pub struct KeyValueReporter;

impl Reporter for KeyValueReporter {
    fn check_finished(&self, result: &CheckResult) {
        println!("{}", result.to_kv_line());
    }

    fn run_finished(&self, report: &CapabilityReport) {
        println!("{}", report.summary_kv_line());
    }
}

/// Reporter that prints the whole report as one JSON document when the run ends.
pub struct JsonReporter;

impl Reporter for JsonReporter {
    fn run_finished(&self, report: &CapabilityReport) {
        match serde_json::to_string_pretty(report) {
            Ok(json) => println!("{}", json),
            Err(e) => log::error!("Failed to serialize report: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_marks() {
        assert_eq!(status_mark(&CheckResult::pass("load", "ok", true)), "✓");
        assert_eq!(status_mark(&CheckResult::fail("demuxer", "absent", true)), "✗");
        assert_eq!(status_mark(&CheckResult::fail("extra", "absent", false)), "!");
        assert_eq!(status_mark(&CheckResult::skipped("remote-open", "offline")), "-");
    }

    #[test]
    fn test_result_line() {
        console::set_colors_enabled(false);
        let result = CheckResult::fail("demuxer", "hls demuxer is not present", true);
        assert_eq!(result_line(&result), "✗ demuxer: hls demuxer is not present");
    }
}
