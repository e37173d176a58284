// avcheck-cli/src/config.rs
//
// Turns parsed arguments into the core library's ProbeConfig.

use crate::cli::Cli;
use avcheck_core::config::{DEFAULT_FFPROBE, DEFAULT_STREAM_URL, ProbeConfig};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub fn build_config(cli: &Cli) -> ProbeConfig {
    let defaults = ProbeConfig::default();

    let ffprobe_path = match (&cli.ffprobe, &cli.ffmpeg) {
        (Some(ffprobe), _) => ffprobe.clone(),
        (None, Some(ffmpeg)) => sibling_ffprobe(ffmpeg),
        (None, None) => defaults.ffprobe_path.clone(),
    };

    let stream_url = if cli.offline {
        None
    } else {
        Some(cli.url.clone().unwrap_or_else(|| DEFAULT_STREAM_URL.to_string()))
    };

    ProbeConfig {
        ffmpeg_path: cli.ffmpeg.clone().unwrap_or(defaults.ffmpeg_path),
        ffprobe_path,
        demuxer: cli.demuxer.clone(),
        stream_url,
        open_timeout: Duration::from_secs(cli.timeout),
        exec_timeout: Duration::from_secs(cli.exec_timeout),
        reference_codecs: cli.codecs.clone().unwrap_or(defaults.reference_codecs),
    }
}

/// `ffprobe` in the same directory as `ffmpeg`, or the bare name when ffmpeg has no directory.
fn sibling_ffprobe(ffmpeg: &Path) -> PathBuf {
    match ffmpeg.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join(DEFAULT_FFPROBE),
        _ => PathBuf::from(DEFAULT_FFPROBE),
    }
}
