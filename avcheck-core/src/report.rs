use crate::error::{CoreError, ErrorKind};
use serde::Serialize;
use std::fmt::{self, Display};

/// Placeholder detail for failures that carried no message.
const UNKNOWN_FAILURE: &str = "unknown failure";

/// Result of a single check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Pass,
    Fail,
    Skipped,
}

impl Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Pass => write!(f, "pass"),
            Outcome::Fail => write!(f, "fail"),
            Outcome::Skipped => write!(f, "skipped"),
        }
    }
}

/// Recorded result of one check in a run.
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    pub name: String,
    pub outcome: Outcome,
    pub detail: String,
    /// Whether a failure of this check halts the run.
    pub fatal: bool,
    /// Advisory notes that did not affect the outcome.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    /// Kind of the error that caused a failure, when there was one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
}

impl CheckResult {
    pub fn pass<N: Into<String>, D: Into<String>>(name: N, detail: D, fatal: bool) -> Self {
        Self {
            name: name.into(),
            outcome: Outcome::Pass,
            detail: detail.into(),
            fatal,
            warnings: Vec::new(),
            error_kind: None,
        }
    }

    /// A failed check. An empty detail is replaced so that failures always explain themselves.
    pub fn fail<N: Into<String>, D: Into<String>>(name: N, detail: D, fatal: bool) -> Self {
        let detail = detail.into();
        let detail = if detail.trim().is_empty() {
            UNKNOWN_FAILURE.to_string()
        } else {
            detail
        };
        Self {
            name: name.into(),
            outcome: Outcome::Fail,
            detail,
            fatal,
            warnings: Vec::new(),
            error_kind: None,
        }
    }

    /// A skipped check. Skipped checks are never fatal.
    pub fn skipped<N: Into<String>, D: Into<String>>(name: N, detail: D) -> Self {
        Self {
            name: name.into(),
            outcome: Outcome::Skipped,
            detail: detail.into(),
            fatal: false,
            warnings: Vec::new(),
            error_kind: None,
        }
    }

    /// A failure converted from the error a check's underlying call raised.
    pub fn from_error<N: Into<String>>(name: N, error: &CoreError, fatal: bool) -> Self {
        let mut result = Self::fail(name, error.to_string(), fatal);
        result.error_kind = Some(error.kind());
        result
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings = warnings;
        self
    }

    /// True for a failure that halts the run.
    pub fn is_fatal_failure(&self) -> bool {
        self.fatal && self.outcome == Outcome::Fail
    }

    /// Single `key=value` record for line-delimited reports.
    pub fn to_kv_line(&self) -> String {
        let mut fields = vec![
            ("check", self.name.clone()),
            ("outcome", self.outcome.to_string()),
            ("fatal", self.fatal.to_string()),
            ("detail", self.detail.clone()),
        ];
        if let Some(kind) = self.error_kind {
            fields.push(("error_kind", kind.to_string()));
        }
        if !self.warnings.is_empty() {
            fields.push(("warnings", self.warnings.join("; ")));
        }
        kv_line(&fields)
    }
}

/// Terminal state of a probe run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    Running,
    /// Stopped early on a fatal failure.
    Halted,
    /// Every check ran.
    Completed,
}

impl Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunState::Running => write!(f, "running"),
            RunState::Halted => write!(f, "halted"),
            RunState::Completed => write!(f, "completed"),
        }
    }
}

/// Overall verdict of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Pass,
    Fatal,
}

impl Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportStatus::Pass => write!(f, "pass"),
            ReportStatus::Fatal => write!(f, "fatal"),
        }
    }
}

/// Ordered results of a probe run. Results can only be appended.
#[derive(Debug, Clone, Serialize)]
pub struct CapabilityReport {
    status: ReportStatus,
    state: RunState,
    results: Vec<CheckResult>,
}

impl Default for CapabilityReport {
    fn default() -> Self {
        Self::new()
    }
}

impl CapabilityReport {
    pub fn new() -> Self {
        Self {
            status: ReportStatus::Pass,
            state: RunState::Running,
            results: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, result: CheckResult) {
        if result.is_fatal_failure() {
            self.status = ReportStatus::Fatal;
        }
        self.results.push(result);
    }

    pub(crate) fn finish(&mut self, state: RunState) {
        self.state = state;
    }

    pub fn results(&self) -> &[CheckResult] {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn last(&self) -> Option<&CheckResult> {
        self.results.last()
    }

    pub fn get(&self, name: &str) -> Option<&CheckResult> {
        self.results.iter().find(|r| r.name == name)
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn status(&self) -> ReportStatus {
        self.status
    }

    pub fn passed(&self) -> bool {
        self.status == ReportStatus::Pass
    }

    /// Process exit code: 0 when every fatal check passed, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        if self.passed() { 0 } else { 1 }
    }

    /// Closing `key=value` record summarising the run.
    pub fn summary_kv_line(&self) -> String {
        kv_line(&[
            ("summary", self.status.to_string()),
            ("state", self.state.to_string()),
            ("checks", self.results.len().to_string()),
            ("exit_code", self.exit_code().to_string()),
        ])
    }
}

fn kv_line(fields: &[(&str, String)]) -> String {
    fields
        .iter()
        .map(|(key, value)| format!("{}={}", key, quote_value(value)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Quotes a value that would otherwise break `key=value` tokenisation.
fn quote_value(value: &str) -> String {
    let needs_quotes = value.is_empty()
        || value
            .chars()
            .any(|c| c.is_whitespace() || c == '"' || c == '=' || c == '\\');
    if !needs_quotes {
        return value.to_string();
    }
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            other => quoted.push(other),
        }
    }
    quoted.push('"');
    quoted
}
