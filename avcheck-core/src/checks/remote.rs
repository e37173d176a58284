use super::{Check, CheckOutcome, ProbeContext, REMOTE_OPEN};
use crate::error::CoreResult;
use crate::runtime::{RuntimeHandle, SourceGuard, StreamProbeResult};
use std::time::Duration;

/// Opens a remote stream through the binding within a bounded time.
///
/// Failure usually means the engine was built without the secure transport
/// the URL needs.
#[derive(Debug, Clone)]
pub struct RemoteOpenCheck {
    url: Option<String>,
    timeout: Duration,
}

impl RemoteOpenCheck {
    /// `url` of `None` skips the check.
    pub fn new(url: Option<String>, timeout: Duration) -> Self {
        Self { url, timeout }
    }
}

impl Check for RemoteOpenCheck {
    fn name(&self) -> &str {
        REMOTE_OPEN
    }

    fn run(&self, ctx: &mut ProbeContext<'_>) -> CoreResult<CheckOutcome> {
        let Some(url) = self.url.as_deref() else {
            return Ok(CheckOutcome::Skipped("no stream URL configured (offline)".into()));
        };

        let probe = probe_stream(ctx.runtime()?, url, self.timeout)?;

        let streams = probe
            .streams
            .iter()
            .map(|s| format!("{}:{}", s.media_type, s.codec.as_deref().unwrap_or("?")))
            .collect::<Vec<_>>()
            .join(", ");
        let mut detail = format!("opened {} with {} stream(s)", url, probe.stream_count);
        if !streams.is_empty() {
            detail.push_str(&format!(" [{}]", streams));
        }
        if let Some(secs) = probe.duration_secs {
            detail.push_str(&format!(", duration {:.1}s", secs));
        }

        let mut warnings = Vec::new();
        if probe.stream_count == 0 {
            warnings.push("stream opened but no streams were discovered".to_string());
        }
        Ok(CheckOutcome::Pass { detail, warnings })
    }
}

/// Opens `url`, inspects its streams and closes it again.
///
/// The source is closed on every path, including when inspection fails.
pub fn probe_stream(
    runtime: &dyn RuntimeHandle,
    url: &str,
    timeout: Duration,
) -> CoreResult<StreamProbeResult> {
    log::info!("Opening {} (timeout {:?})", url, timeout);
    let source = SourceGuard::new(runtime.open(url, timeout)?);

    let streams = source.streams()?;
    for stream in &streams {
        log::debug!(
            "Stream #{}: {} ({})",
            stream.index,
            stream.media_type,
            stream.codec.as_deref().unwrap_or("unknown codec")
        );
    }

    Ok(StreamProbeResult {
        success: true,
        duration_secs: source.duration().map(|d| d.as_secs_f64()),
        stream_count: streams.len(),
        streams,
    })
}
