//! The probe runner.
//!
//! Runs checks strictly in order. Each check's error is converted into a
//! failed result at the check boundary; a fatal failure moves the run to
//! `Halted` and the partial report is returned. Otherwise the run ends
//! `Completed` after the last check.

use crate::checks::{CheckOutcome, CheckSpec, ProbeContext};
use crate::report::{CapabilityReport, CheckResult, RunState};
use crate::reporting::Reporter;

/// Executes an ordered check list against a probe context.
pub struct ProbeRunner {
    checks: Vec<CheckSpec>,
}

impl ProbeRunner {
    pub fn new(checks: Vec<CheckSpec>) -> Self {
        Self { checks }
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    pub fn run(&self, ctx: &mut ProbeContext<'_>, reporter: &dyn Reporter) -> CapabilityReport {
        let mut report = CapabilityReport::new();
        let mut state = RunState::Running;

        for spec in &self.checks {
            let name = spec.check.name();
            reporter.check_started(name, spec.fatal);
            log::debug!("Running check '{}' (fatal: {})", name, spec.fatal);

            let result = match spec.check.run(ctx) {
                Ok(CheckOutcome::Pass { detail, warnings }) => {
                    CheckResult::pass(name, detail, spec.fatal).with_warnings(warnings)
                }
                Ok(CheckOutcome::Fail(detail)) => CheckResult::fail(name, detail, spec.fatal),
                Ok(CheckOutcome::Skipped(detail)) => CheckResult::skipped(name, detail),
                Err(e) => CheckResult::from_error(name, &e, spec.fatal),
            };

            if result.is_fatal_failure() {
                log::error!("Check '{}' failed: {}", name, result.detail);
                state = RunState::Halted;
            } else {
                log::info!("Check '{}': {} ({})", name, result.outcome, result.detail);
            }

            report.push(result);
            if let Some(last) = report.last() {
                reporter.check_finished(last);
            }
            if state == RunState::Halted {
                break;
            }
        }

        if state == RunState::Running {
            state = RunState::Completed;
        }
        report.finish(state);
        reporter.run_finished(&report);
        report
    }
}
