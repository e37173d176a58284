//! Configuration structures and constants for the avcheck-core library.
//!
//! `ProbeConfig` carries everything the default check list needs: where the
//! FFmpeg tools live, which demuxer must be present, which stream to open and
//! how long each blocking operation may take.

use crate::error::{CoreError, CoreResult};
use std::path::PathBuf;
use std::time::Duration;

// Default constants

/// Demuxer that must be listed by the backend.
pub const DEFAULT_DEMUXER: &str = "hls";

/// Remote stream opened by the secure remote-open check.
/// Served over HTTPS so that a backend built without TLS fails the check.
pub const DEFAULT_STREAM_URL: &str = "https://test-streams.mux.dev/x36xhzz/x36xhzz.m3u8";

/// Upper bound for opening the remote stream, in seconds.
pub const DEFAULT_OPEN_TIMEOUT_SECS: u64 = 10;

/// Upper bound for every local introspection command, in seconds.
pub const DEFAULT_EXEC_TIMEOUT_SECS: u64 = 30;

/// Reference codecs reported by the codec enumeration check.
pub const REFERENCE_CODECS: &[&str] = &["h264", "h265", "vp8", "vp9", "aac", "mp3", "opus"];

/// Default ffprobe executable name, resolved through `PATH`.
pub const DEFAULT_FFPROBE: &str = "ffprobe";

/// Settings for a probe run.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Path to the ffmpeg executable.
    pub ffmpeg_path: PathBuf,
    /// Path to the ffprobe executable.
    pub ffprobe_path: PathBuf,
    /// Demuxer name that must be present.
    pub demuxer: String,
    /// Stream to open. `None` runs offline and skips the remote-open check.
    pub stream_url: Option<String>,
    pub open_timeout: Duration,
    pub exec_timeout: Duration,
    pub reference_codecs: Vec<String>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: ffmpeg_sidecar::paths::ffmpeg_path(),
            ffprobe_path: PathBuf::from(DEFAULT_FFPROBE),
            demuxer: DEFAULT_DEMUXER.to_string(),
            stream_url: Some(DEFAULT_STREAM_URL.to_string()),
            open_timeout: Duration::from_secs(DEFAULT_OPEN_TIMEOUT_SECS),
            exec_timeout: Duration::from_secs(DEFAULT_EXEC_TIMEOUT_SECS),
            reference_codecs: REFERENCE_CODECS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl ProbeConfig {
    /// Checks that the settings describe a runnable probe.
    pub fn validate(&self) -> CoreResult<()> {
        if self.demuxer.trim().is_empty() {
            return Err(CoreError::Config("demuxer name must not be empty".into()));
        }
        if self.open_timeout.is_zero() {
            return Err(CoreError::Config("open timeout must be greater than zero".into()));
        }
        if self.exec_timeout.is_zero() {
            return Err(CoreError::Config("exec timeout must be greater than zero".into()));
        }
        if let Some(url) = &self.stream_url {
            if url.trim().is_empty() {
                return Err(CoreError::Config("stream URL must not be empty".into()));
            }
        }
        Ok(())
    }
}
