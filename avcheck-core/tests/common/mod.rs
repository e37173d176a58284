// Fake runtime, introspector and reporter shared by the integration tests.
#![allow(dead_code)]

use avcheck_core::error::{CoreError, CoreResult, command_failed_error, timeout_error};
use avcheck_core::report::{CapabilityReport, CheckResult};
use avcheck_core::reporting::Reporter;
use avcheck_core::runtime::{
    BackendIntrospector, MediaSource, RuntimeFactory, RuntimeHandle, StreamInfo,
};
use std::cell::Cell;
use std::collections::BTreeSet;
use std::rc::Rc;
use std::sync::Mutex;
use std::time::Duration;

pub const HLS_LISTING: &str = "File formats:\n D. = Demuxing supported\n .E = Muxing supported\n --\n D  hevc            raw HEVC video\n D  hls             Apple HTTP Live Streaming\n";

pub const HLSV2_ONLY_LISTING: &str = "File formats:\n --\n D  hevc            raw HEVC video\n D  hlsv2           Prefixed name\n";

/// How the fake runtime responds to `open`.
#[derive(Clone, Debug)]
pub enum FakeOpen {
    Streams(Vec<(&'static str, Option<&'static str>)>),
    /// Opens, but stream inspection fails.
    BrokenStreams,
    NetworkError(String),
    Timeout(Duration),
}

#[derive(Clone, Debug)]
pub struct FakeRuntime {
    pub binding: Result<String, String>,
    pub backend: Result<String, String>,
    pub codecs: Result<Vec<&'static str>, String>,
    pub formats: Result<Vec<&'static str>, String>,
    pub open: FakeOpen,
    pub opened: Rc<Cell<usize>>,
    pub closed: Rc<Cell<usize>>,
}

impl Default for FakeRuntime {
    fn default() -> Self {
        Self {
            binding: Ok("14.0.1".into()),
            backend: Ok("6.1.1".into()),
            codecs: Ok(vec!["h264", "hevc", "vp8", "vp9", "aac", "mp3", "opus", "flac"]),
            formats: Ok(vec!["mov", "mp4", "hls", "matroska"]),
            open: FakeOpen::Streams(vec![("video", Some("h264")), ("audio", Some("aac"))]),
            opened: Rc::new(Cell::new(0)),
            closed: Rc::new(Cell::new(0)),
        }
    }
}

fn to_set(names: &[&'static str]) -> BTreeSet<String> {
    names.iter().map(|n| n.to_string()).collect()
}

impl RuntimeHandle for FakeRuntime {
    fn binding_version(&self) -> CoreResult<String> {
        self.binding.clone().map_err(CoreError::Version)
    }

    fn backend_version(&self) -> CoreResult<String> {
        self.backend.clone().map_err(CoreError::Version)
    }

    fn codecs(&self) -> CoreResult<BTreeSet<String>> {
        self.codecs
            .as_ref()
            .map(|c| to_set(c))
            .map_err(|e| CoreError::Enumeration(e.clone()))
    }

    fn formats(&self) -> CoreResult<BTreeSet<String>> {
        self.formats
            .as_ref()
            .map(|f| to_set(f))
            .map_err(|e| CoreError::Enumeration(e.clone()))
    }

    fn open(&self, _url: &str, timeout: Duration) -> CoreResult<Box<dyn MediaSource>> {
        let streams = match &self.open {
            FakeOpen::Streams(streams) => Some(streams.clone()),
            FakeOpen::BrokenStreams => None,
            FakeOpen::NetworkError(msg) => return Err(CoreError::Network(msg.clone())),
            FakeOpen::Timeout(limit) => {
                assert!(*limit <= timeout);
                return Err(timeout_error("ffprobe open", *limit));
            }
        };
        self.opened.set(self.opened.get() + 1);
        Ok(Box::new(FakeSource {
            streams,
            closed: self.closed.clone(),
        }))
    }
}

pub struct FakeSource {
    streams: Option<Vec<(&'static str, Option<&'static str>)>>,
    closed: Rc<Cell<usize>>,
}

impl MediaSource for FakeSource {
    fn duration(&self) -> Option<Duration> {
        Some(Duration::from_secs(60))
    }

    fn streams(&self) -> CoreResult<Vec<StreamInfo>> {
        let streams = self
            .streams
            .as_ref()
            .ok_or_else(|| CoreError::Parse("stream metadata unavailable".into()))?;
        Ok(streams
            .iter()
            .enumerate()
            .map(|(index, (media_type, codec))| StreamInfo {
                index,
                media_type: media_type.to_string(),
                codec: codec.map(str::to_string),
            })
            .collect())
    }

    fn close(&mut self) {
        self.closed.set(self.closed.get() + 1);
    }
}

pub struct FakeFactory {
    pub runtime: Result<FakeRuntime, String>,
}

impl FakeFactory {
    pub fn working() -> Self {
        Self {
            runtime: Ok(FakeRuntime::default()),
        }
    }

    pub fn with(runtime: FakeRuntime) -> Self {
        Self { runtime: Ok(runtime) }
    }

    pub fn broken(message: &str) -> Self {
        Self {
            runtime: Err(message.to_string()),
        }
    }
}

impl RuntimeFactory for FakeFactory {
    fn load(&self) -> CoreResult<Box<dyn RuntimeHandle>> {
        match &self.runtime {
            Ok(runtime) => Ok(Box::new(runtime.clone())),
            Err(message) => Err(CoreError::Load(message.clone())),
        }
    }
}

pub struct FakeIntrospector {
    pub listing: Result<String, String>,
}

impl FakeIntrospector {
    pub fn listing(listing: &str) -> Self {
        Self {
            listing: Ok(listing.to_string()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            listing: Err(message.to_string()),
        }
    }
}

impl BackendIntrospector for FakeIntrospector {
    fn list_demuxers(&self) -> CoreResult<String> {
        self.listing
            .clone()
            .map_err(|message| command_failed_error("ffmpeg -demuxers", message))
    }
}

/// Reporter that records every callback as a short string.
#[derive(Default)]
pub struct RecordingReporter {
    pub events: Mutex<Vec<String>>,
}

impl RecordingReporter {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl Reporter for RecordingReporter {
    fn check_started(&self, name: &str, _fatal: bool) {
        self.events.lock().unwrap().push(format!("start:{}", name));
    }

    fn check_finished(&self, result: &CheckResult) {
        self.events
            .lock()
            .unwrap()
            .push(format!("finish:{}:{}", result.name, result.outcome));
    }

    fn run_finished(&self, report: &CapabilityReport) {
        self.events
            .lock()
            .unwrap()
            .push(format!("done:{}", report.state()));
    }
}
