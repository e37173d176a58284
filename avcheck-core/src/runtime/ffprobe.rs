//! Opening remote URLs through ffprobe.
//!
//! ffprobe is asked for its JSON report. The `-rw_timeout` protocol option
//! bounds network reads inside the engine; the process deadline bounds the
//! whole open, including connection setup and the TLS handshake.

use crate::error::{CoreError, CoreResult};
use crate::external::run_command;
use crate::runtime::{MediaSource, StreamInfo};
use serde::Deserialize;
use std::path::Path;
use std::process::Command;
use std::time::Duration;

#[derive(Debug, Default, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
    #[serde(default)]
    format: Option<ProbeFormat>,
}

#[derive(Debug, Clone, Deserialize)]
struct ProbeStream {
    index: Option<usize>,
    codec_type: Option<String>,
    codec_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

/// A URL opened by ffprobe.
#[derive(Debug)]
pub struct FfprobeSource {
    url: String,
    duration: Option<Duration>,
    streams: Vec<ProbeStream>,
    open: bool,
}

impl FfprobeSource {
    fn from_json(url: &str, json: &str) -> CoreResult<Self> {
        let parsed: ProbeOutput = serde_json::from_str(json)
            .map_err(|e| CoreError::Parse(format!("invalid ffprobe output for {}: {}", url, e)))?;

        let duration = parsed
            .format
            .and_then(|f| f.duration)
            .and_then(|d| d.parse::<f64>().ok())
            .filter(|secs| secs.is_finite() && *secs >= 0.0)
            .map(Duration::from_secs_f64);

        Ok(Self {
            url: url.to_string(),
            duration,
            streams: parsed.streams,
            open: true,
        })
    }
}

impl MediaSource for FfprobeSource {
    fn duration(&self) -> Option<Duration> {
        self.duration
    }

    fn streams(&self) -> CoreResult<Vec<StreamInfo>> {
        Ok(self
            .streams
            .iter()
            .enumerate()
            .map(|(position, stream)| StreamInfo {
                index: stream.index.unwrap_or(position),
                media_type: stream
                    .codec_type
                    .clone()
                    .unwrap_or_else(|| "unknown".to_string()),
                codec: stream.codec_name.clone(),
            })
            .collect())
    }

    fn close(&mut self) {
        if self.open {
            log::debug!("Closed {}", self.url);
            self.open = false;
        }
    }
}

/// Opens `url` with ffprobe, failing once `timeout` elapses.
pub fn open_url(ffprobe: &Path, url: &str, timeout: Duration) -> CoreResult<FfprobeSource> {
    let rw_timeout = timeout.as_micros().to_string();
    let mut cmd = Command::new(ffprobe);
    cmd.args([
        "-v",
        "error",
        "-rw_timeout",
        rw_timeout.as_str(),
        "-print_format",
        "json",
        "-show_format",
        "-show_streams",
        url,
    ]);

    let output = run_command(&mut cmd, "ffprobe open", Some(timeout)).map_err(|e| match e {
        CoreError::Subprocess { message, .. } => CoreError::Network(network_message(url, &message)),
        other => other,
    })?;

    let diagnostics = output.stderr.trim();
    if !diagnostics.is_empty() {
        log::warn!("ffprobe reported while opening {}: {}", url, diagnostics);
    }

    FfprobeSource::from_json(url, &output.stdout)
}

fn network_message(url: &str, stderr: &str) -> String {
    if url.starts_with("https:") && stderr.contains("Protocol not found") {
        format!("{} (https is not compiled into the backend)", stderr)
    } else {
        stderr.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HLS_JSON: &str = r#"{
        "streams": [
            {"index": 0, "codec_name": "h264", "codec_type": "video", "width": 1280},
            {"index": 1, "codec_name": "aac", "codec_type": "audio"},
            {"index": 2, "codec_type": "data"}
        ],
        "format": {"filename": "https://example.com/a.m3u8", "nb_streams": 3, "duration": "634.566667"}
    }"#;

    #[test]
    fn test_streams_from_json() {
        let source = FfprobeSource::from_json("https://example.com/a.m3u8", HLS_JSON).unwrap();
        let streams = source.streams().unwrap();
        assert_eq!(streams.len(), 3);
        assert_eq!(streams[0].media_type, "video");
        assert_eq!(streams[0].codec.as_deref(), Some("h264"));
        assert_eq!(streams[2].codec, None);
        let secs = source.duration().unwrap().as_secs_f64();
        assert!((secs - 634.566667).abs() < 1e-6);
    }

    #[test]
    fn test_missing_duration() {
        let source = FfprobeSource::from_json("u", r#"{"streams": [], "format": {"duration": "N/A"}}"#).unwrap();
        assert!(source.duration().is_none());
        assert!(source.streams().unwrap().is_empty());
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        assert!(matches!(
            FfprobeSource::from_json("u", "not json"),
            Err(CoreError::Parse(_))
        ));
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut source = FfprobeSource::from_json("u", "{}").unwrap();
        source.close();
        source.close();
        assert!(!source.open);
    }

    #[test]
    fn test_protocol_hint_for_https() {
        let msg = network_message("https://x/y.m3u8", "https: Protocol not found");
        assert!(msg.contains("https is not compiled into the backend"));
        assert_eq!(network_message("http://x", "Connection refused"), "Connection refused");
    }
}
