//! FFmpeg-backed runtime.
//!
//! The binding talks to the engine through its command-line tools: `ffmpeg`
//! for versions and listings, `ffprobe` for opening URLs. Every invocation is
//! bounded by the configured exec timeout.

use crate::config::ProbeConfig;
use crate::error::{CoreError, CoreResult};
use crate::external::{check_dependency, run_command};
use crate::runtime::{BackendIntrospector, MediaSource, RuntimeFactory, RuntimeHandle, ffprobe};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

/// Version of this binding layer.
pub const BINDING_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Loads an [`FfmpegRuntime`] after confirming both tools are runnable.
#[derive(Debug, Clone)]
pub struct FfmpegFactory {
    ffmpeg: PathBuf,
    ffprobe: PathBuf,
    exec_timeout: Duration,
}

impl FfmpegFactory {
    pub fn new(
        ffmpeg: impl Into<PathBuf>,
        ffprobe: impl Into<PathBuf>,
        exec_timeout: Duration,
    ) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            ffprobe: ffprobe.into(),
            exec_timeout,
        }
    }

    pub fn from_config(config: &ProbeConfig) -> Self {
        Self::new(&config.ffmpeg_path, &config.ffprobe_path, config.exec_timeout)
    }
}

impl RuntimeFactory for FfmpegFactory {
    fn load(&self) -> CoreResult<Box<dyn RuntimeHandle>> {
        let banner = check_dependency(&self.ffmpeg, self.exec_timeout)?;
        check_dependency(&self.ffprobe, self.exec_timeout)?;
        log::info!("Loaded FFmpeg runtime from {}", self.ffmpeg.display());
        Ok(Box::new(FfmpegRuntime {
            ffmpeg: self.ffmpeg.clone(),
            ffprobe: self.ffprobe.clone(),
            exec_timeout: self.exec_timeout,
            version_banner: banner,
        }))
    }
}

/// Runtime handle backed by the FFmpeg command-line tools.
#[derive(Debug, Clone)]
pub struct FfmpegRuntime {
    ffmpeg: PathBuf,
    ffprobe: PathBuf,
    exec_timeout: Duration,
    version_banner: String,
}

impl FfmpegRuntime {
    fn listing(&self, flag: &str) -> CoreResult<String> {
        ffmpeg_listing(&self.ffmpeg, flag, self.exec_timeout)
            .map_err(|e| match e {
                CoreError::Timeout { .. } => e,
                other => CoreError::Enumeration(other.to_string()),
            })
    }
}

impl RuntimeHandle for FfmpegRuntime {
    fn describe(&self) -> String {
        format!("FFmpeg runtime at {}", self.ffmpeg.display())
    }

    fn binding_version(&self) -> CoreResult<String> {
        Ok(BINDING_VERSION.to_string())
    }

    fn backend_version(&self) -> CoreResult<String> {
        parse_version_banner(&self.version_banner)
    }

    fn codecs(&self) -> CoreResult<BTreeSet<String>> {
        let output = self.listing("-codecs")?;
        parse_codec_listing(&output)
    }

    fn formats(&self) -> CoreResult<BTreeSet<String>> {
        let output = self.listing("-formats")?;
        parse_format_listing(&output)
    }

    fn open(&self, url: &str, timeout: Duration) -> CoreResult<Box<dyn MediaSource>> {
        let source = ffprobe::open_url(&self.ffprobe, url, timeout)?;
        Ok(Box::new(source))
    }
}

/// Demuxer listing taken straight from the `ffmpeg` executable.
#[derive(Debug, Clone)]
pub struct FfmpegIntrospector {
    ffmpeg: PathBuf,
    exec_timeout: Duration,
}

impl FfmpegIntrospector {
    pub fn new(ffmpeg: impl Into<PathBuf>, exec_timeout: Duration) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            exec_timeout,
        }
    }

    pub fn from_config(config: &ProbeConfig) -> Self {
        Self::new(&config.ffmpeg_path, config.exec_timeout)
    }
}

impl BackendIntrospector for FfmpegIntrospector {
    fn list_demuxers(&self) -> CoreResult<String> {
        ffmpeg_listing(&self.ffmpeg, "-demuxers", self.exec_timeout)
    }
}

fn ffmpeg_listing(ffmpeg: &Path, flag: &str, timeout: Duration) -> CoreResult<String> {
    let mut cmd = Command::new(ffmpeg);
    cmd.args(["-hide_banner", flag]);
    let label = format!("ffmpeg {}", flag);
    run_command(&mut cmd, &label, Some(timeout)).map(|output| output.stdout)
}

/// Extracts the version token from the first line of `ffmpeg -version`.
///
/// `ffmpeg version n6.1.1-static Copyright (c) ...` yields `n6.1.1-static`.
pub fn parse_version_banner(banner: &str) -> CoreResult<String> {
    let first = banner.lines().next().unwrap_or_default();
    let mut tokens = first.split_whitespace();
    while let Some(token) = tokens.next() {
        if token == "version" {
            if let Some(version) = tokens.next() {
                return Ok(version.to_string());
            }
        }
    }
    Err(CoreError::Version(format!(
        "unrecognised version banner: '{}'",
        first.trim()
    )))
}

/// One entry of a `-codecs` or `-formats` listing.
struct ListingEntry<'a> {
    flags: &'a str,
    name: &'a str,
    description: &'a str,
}

/// Splits a listing into entries after its dashed separator line.
///
/// The flag column has a fixed width, taken from the legend above the
/// separator (`D..... = Decoding supported` is six columns wide). Flag columns
/// may contain spaces, as with ` D d lavfi` in newer `-formats` output.
fn listing_entries(output: &str) -> CoreResult<Vec<ListingEntry<'_>>> {
    let mut lines = output.lines();
    let mut width = None;
    while let Some(line) = lines.next() {
        let trimmed = line.trim();
        if trimmed.starts_with("--") {
            let entries = lines
                .filter_map(|line| parse_entry(line.trim_end(), width))
                .collect();
            return Ok(entries);
        }
        if width.is_none() && trimmed.contains(" = ") {
            width = trimmed.split_whitespace().next().map(str::len);
        }
    }
    Err(CoreError::Parse("listing has no separator line".into()))
}

fn parse_entry(line: &str, width: Option<usize>) -> Option<ListingEntry<'_>> {
    let line = line.strip_prefix(' ').unwrap_or(line);
    let (flags, rest) = match width {
        Some(width) => (line.get(..width)?, line.get(width..)?),
        None => {
            // No legend: skip leading tokens made only of flag characters.
            let start = line
                .split_whitespace()
                .find(|token| !token.chars().all(|c| matches!(c, 'D' | 'E' | 'd' | '.')))
                .and_then(|token| line.find(token))?;
            (&line[..start], &line[start..])
        }
    };
    let rest = rest.trim_start();
    let name_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
    let (name, description) = rest.split_at(name_end);
    if name.is_empty() {
        return None;
    }
    Some(ListingEntry {
        flags,
        name,
        description: description.trim(),
    })
}

/// Names listed inside a `(decoders: ...)` or `(encoders: ...)` group.
fn implementation_names<'a>(description: &'a str, marker: &str) -> Vec<&'a str> {
    description
        .find(marker)
        .map(|start| {
            let group = &description[start + marker.len()..];
            let group = group.split(')').next().unwrap_or_default();
            group.split_whitespace().collect()
        })
        .unwrap_or_default()
}

/// Parses `ffmpeg -codecs` into the identifiers of codecs this build implements.
///
/// Descriptors without a decoder (`D` in the first flag column) or an encoder
/// (`E` in the second) are skipped. Named implementations such as `libx264`
/// listed in `(decoders: ...)` and `(encoders: ...)` are included too.
pub fn parse_codec_listing(output: &str) -> CoreResult<BTreeSet<String>> {
    let mut names = BTreeSet::new();
    for entry in listing_entries(output)? {
        let mut flags = entry.flags.chars();
        let decodes = flags.next() == Some('D');
        let encodes = flags.next() == Some('E');
        if !(decodes || encodes) {
            continue;
        }
        names.insert(entry.name.to_string());
        for marker in ["(decoders:", "(encoders:"] {
            names.extend(
                implementation_names(entry.description, marker)
                    .into_iter()
                    .map(str::to_string),
            );
        }
    }
    Ok(names)
}

/// Parses `ffmpeg -formats` into container identifiers.
///
/// Comma-joined names such as `mov,mp4,m4a` contribute each alias separately.
pub fn parse_format_listing(output: &str) -> CoreResult<BTreeSet<String>> {
    let mut names = BTreeSet::new();
    for entry in listing_entries(output)? {
        if !entry.flags.contains(['D', 'E']) {
            continue;
        }
        names.extend(
            entry
                .name
                .split(',')
                .filter(|n| !n.is_empty())
                .map(str::to_string),
        );
    }
    Ok(names)
}
