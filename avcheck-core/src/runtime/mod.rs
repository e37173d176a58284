// ============================================================================
// avcheck-core/src/runtime/mod.rs
// ============================================================================
//
// MEDIA RUNTIME: Abstractions over the Binding and its Backend Engine
//
// The probe framework depends only on the traits in this module. The FFmpeg
// implementation lives in the submodules; tests substitute fakes.
//
// KEY COMPONENTS:
// - RuntimeFactory: explicit construction of a runtime (load failure is a typed error)
// - RuntimeHandle: typed accessors for versions, codecs, formats and URL opening
// - BackendIntrospector: the engine's own diagnostic listing, bypassing the binding
// - MediaSource / SourceGuard: an opened remote resource with guaranteed release

use crate::error::CoreResult;
use serde::Serialize;
use std::collections::BTreeSet;
use std::ops::{Deref, DerefMut};
use std::time::Duration;

pub mod ffmpeg;
pub mod ffprobe;

pub use ffmpeg::{FfmpegFactory, FfmpegIntrospector, FfmpegRuntime};

/// Constructs a [`RuntimeHandle`].
pub trait RuntimeFactory {
    fn load(&self) -> CoreResult<Box<dyn RuntimeHandle>>;
}

/// Capability surface of a loaded media runtime.
pub trait RuntimeHandle {
    /// Short human-readable description of what was loaded.
    fn describe(&self) -> String {
        "media runtime".to_string()
    }

    /// Version of the binding layer.
    fn binding_version(&self) -> CoreResult<String>;

    /// Version of the underlying engine.
    fn backend_version(&self) -> CoreResult<String>;

    /// Identifiers of every codec known to the engine.
    fn codecs(&self) -> CoreResult<BTreeSet<String>>;

    /// Identifiers of every container format known to the engine.
    fn formats(&self) -> CoreResult<BTreeSet<String>>;

    /// Opens `url`, failing rather than blocking once `timeout` elapses.
    fn open(&self, url: &str, timeout: Duration) -> CoreResult<Box<dyn MediaSource>>;
}

/// Diagnostic listing produced by the engine itself rather than the binding.
pub trait BackendIntrospector {
    /// Raw line-oriented output of the engine's demuxer listing.
    fn list_demuxers(&self) -> CoreResult<String>;
}

/// An opened media resource.
pub trait MediaSource {
    fn duration(&self) -> Option<Duration>;

    /// Logical streams of the resource, in container order.
    fn streams(&self) -> CoreResult<Vec<StreamInfo>>;

    /// Releases the resource. Called exactly once by [`SourceGuard`].
    fn close(&mut self);
}

/// One logical stream of an opened resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamInfo {
    pub index: usize,
    /// Media type as reported by the engine (`video`, `audio`, `data`, ...).
    pub media_type: String,
    /// Decoder name, when the engine could resolve one.
    pub codec: Option<String>,
}

/// Outcome of opening and inspecting a remote URL.
#[derive(Debug, Clone, Serialize)]
pub struct StreamProbeResult {
    pub success: bool,
    pub duration_secs: Option<f64>,
    pub stream_count: usize,
    pub streams: Vec<StreamInfo>,
}

/// Closes the wrapped source when dropped, whether or not inspection succeeded.
pub struct SourceGuard {
    source: Box<dyn MediaSource>,
}

impl SourceGuard {
    pub fn new(source: Box<dyn MediaSource>) -> Self {
        Self { source }
    }
}

impl Deref for SourceGuard {
    type Target = dyn MediaSource;

    fn deref(&self) -> &Self::Target {
        self.source.as_ref()
    }
}

impl DerefMut for SourceGuard {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.source.as_mut()
    }
}

impl Drop for SourceGuard {
    fn drop(&mut self) {
        self.source.close();
    }
}
