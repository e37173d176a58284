// ============================================================================
// avcheck-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL TOOLS: Interactions with the FFmpeg Command-Line Tools
//
// This module encapsulates process execution for ffmpeg and ffprobe. Every
// command goes through one bounded runner so that no check can block past its
// configured limit.
//
// KEY COMPONENTS:
// - Bounded command execution with captured output (process)
// - Dependency checking for the FFmpeg executables

// ---- Internal crate imports ----
use crate::error::{CoreError, CoreResult};

// ---- Standard library imports ----
use std::io;
use std::path::Path;
use std::process::Command;
use std::time::Duration;

// ============================================================================
// SUBMODULES
// ============================================================================

/// Bounded process execution with captured output
pub mod process;

pub use process::{CommandOutput, run_command};

// ============================================================================
// DEPENDENCY CHECKING
// ============================================================================

/// Checks that an external tool exists and runs `-version` successfully.
///
/// Any failure is reported as [`CoreError::Load`] so that a missing engine is
/// distinguishable from an engine that lacks a capability.
///
/// # Returns
///
/// * `Ok(String)` - The first line of the tool's version banner
/// * `Err(CoreError::Load)` - If the tool is missing, fails to start, or exits non-zero
pub fn check_dependency(tool: &Path, timeout: Duration) -> CoreResult<String> {
    let label = tool.display().to_string();
    let mut cmd = Command::new(tool);
    cmd.arg("-version");

    match run_command(&mut cmd, &label, Some(timeout)) {
        Ok(output) => {
            log::debug!("Found dependency: {}", label);
            Ok(output.stdout.lines().next().unwrap_or_default().trim().to_string())
        }
        Err(CoreError::CommandStart { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
            log::warn!("Dependency '{}' not found.", label);
            Err(CoreError::Load(format!("'{}' was not found", label)))
        }
        Err(e) => {
            log::error!("Dependency check for '{}' failed: {}", label, e);
            Err(CoreError::Load(e.to_string()))
        }
    }
}
