// ============================================================================
// avcheck-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Error Types for the Probe Framework
//
// Every failure a check can observe is one of these variants. The runner never
// lets a CoreError escape a check: it is converted into a failed CheckResult
// and its ErrorKind label is kept for structured reports.

use serde::Serialize;
use std::fmt;
use std::io;
use std::time::Duration;
use thiserror::Error;

/// Errors raised while probing a media runtime.
#[derive(Error, Debug)]
pub enum CoreError {
    /// The runtime could not be constructed (binding or engine missing).
    #[error("failed to load media runtime: {0}")]
    Load(String),

    #[error("version query failed: {0}")]
    Version(String),

    #[error("enumeration failed: {0}")]
    Enumeration(String),

    /// A command could not be started at all.
    #[error("failed to start {command}: {source}")]
    CommandStart {
        command: String,
        #[source]
        source: io::Error,
    },

    /// A command ran but exited unsuccessfully.
    #[error("{command} failed: {message}")]
    Subprocess { command: String, message: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("{operation} timed out after {timeout:?}")]
    Timeout {
        operation: String,
        timeout: Duration,
    },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for probe operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Coarse classification of a [`CoreError`], used as a stable label in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    Load,
    Version,
    Enumeration,
    Subprocess,
    Network,
    Timeout,
    Parse,
    Config,
    Io,
}

impl ErrorKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Load => "load",
            ErrorKind::Version => "version",
            ErrorKind::Enumeration => "enumeration",
            ErrorKind::Subprocess => "subprocess",
            ErrorKind::Network => "network",
            ErrorKind::Timeout => "timeout",
            ErrorKind::Parse => "parse",
            ErrorKind::Config => "config",
            ErrorKind::Io => "io",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl CoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::Load(_) => ErrorKind::Load,
            CoreError::Version(_) => ErrorKind::Version,
            CoreError::Enumeration(_) => ErrorKind::Enumeration,
            CoreError::CommandStart { .. } | CoreError::Subprocess { .. } => ErrorKind::Subprocess,
            CoreError::Network(_) => ErrorKind::Network,
            CoreError::Timeout { .. } => ErrorKind::Timeout,
            CoreError::Parse(_) => ErrorKind::Parse,
            CoreError::Config(_) => ErrorKind::Config,
            CoreError::Io(_) => ErrorKind::Io,
        }
    }
}

// ---- Helper constructors ----

pub fn command_start_error(command: impl Into<String>, source: io::Error) -> CoreError {
    CoreError::CommandStart {
        command: command.into(),
        source,
    }
}

pub fn command_failed_error(command: impl Into<String>, message: impl Into<String>) -> CoreError {
    CoreError::Subprocess {
        command: command.into(),
        message: message.into(),
    }
}

pub fn timeout_error(operation: impl Into<String>, timeout: Duration) -> CoreError {
    CoreError::Timeout {
        operation: operation.into(),
        timeout,
    }
}
