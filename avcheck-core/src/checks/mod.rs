// ============================================================================
// avcheck-core/src/checks/mod.rs
// ============================================================================
//
// CAPABILITY CHECKS: The Ordered Probe Steps
//
// Each check performs one capability query and returns a CheckOutcome, or the
// CoreError its underlying call raised. Whether a failure is fatal is decided
// by the CheckSpec that schedules the check, not by the check itself.
//
// KEY COMPONENTS:
// - Check: trait implemented by every probe step
// - CheckSpec: a check plus its fatal/advisory classification
// - ProbeContext: runtime factory, loaded runtime and backend introspector
// - default_checks: the standard six-step list

use crate::config::ProbeConfig;
use crate::error::{CoreError, CoreResult};
use crate::runtime::{BackendIntrospector, RuntimeFactory, RuntimeHandle};

mod demuxer;
mod remote;
mod runtime;

pub use demuxer::DemuxerCheck;
pub use remote::{RemoteOpenCheck, probe_stream};
pub use runtime::{CodecCheck, FormatCheck, LoadCheck, VersionCheck, available_reference_codecs};

// ---- Check names ----

pub const LOAD: &str = "load";
pub const VERSION: &str = "version";
pub const CODECS: &str = "codecs";
pub const FORMATS: &str = "formats";
pub const DEMUXER: &str = "demuxer";
pub const REMOTE_OPEN: &str = "remote-open";

/// What a check observed when its underlying calls succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    Pass { detail: String, warnings: Vec<String> },
    /// The call worked but the capability is absent.
    Fail(String),
    Skipped(String),
}

impl CheckOutcome {
    pub fn pass(detail: impl Into<String>) -> Self {
        CheckOutcome::Pass {
            detail: detail.into(),
            warnings: Vec::new(),
        }
    }
}

/// A single capability probe step.
pub trait Check {
    fn name(&self) -> &str;

    fn run(&self, ctx: &mut ProbeContext<'_>) -> CoreResult<CheckOutcome>;
}

/// A scheduled check with its fatal/advisory classification.
pub struct CheckSpec {
    pub check: Box<dyn Check>,
    pub fatal: bool,
}

impl CheckSpec {
    pub fn fatal(check: impl Check + 'static) -> Self {
        Self {
            check: Box::new(check),
            fatal: true,
        }
    }

    pub fn advisory(check: impl Check + 'static) -> Self {
        Self {
            check: Box::new(check),
            fatal: false,
        }
    }
}

/// Collaborators available to checks during a run.
pub struct ProbeContext<'a> {
    factory: &'a dyn RuntimeFactory,
    introspector: &'a dyn BackendIntrospector,
    runtime: Option<Box<dyn RuntimeHandle>>,
}

impl<'a> ProbeContext<'a> {
    pub fn new(factory: &'a dyn RuntimeFactory, introspector: &'a dyn BackendIntrospector) -> Self {
        Self {
            factory,
            introspector,
            runtime: None,
        }
    }

    /// Loads the runtime through the factory, replacing any previous handle.
    pub fn load_runtime(&mut self) -> CoreResult<&dyn RuntimeHandle> {
        let runtime = self.factory.load()?;
        let runtime: &dyn RuntimeHandle = &**self.runtime.insert(runtime);
        Ok(runtime)
    }

    /// The loaded runtime; a load error if the load check has not succeeded.
    pub fn runtime(&self) -> CoreResult<&dyn RuntimeHandle> {
        self.runtime
            .as_deref()
            .ok_or_else(|| CoreError::Load("media runtime is not loaded".into()))
    }

    pub fn introspector(&self) -> &dyn BackendIntrospector {
        self.introspector
    }
}

/// The standard check list, in order, with its fatal/advisory split.
///
/// Every step is fatal. The version check downgrades a missing binding
/// version to a warning itself; the remote-open check is skipped, not failed,
/// when no stream URL is configured.
pub fn default_checks(config: &ProbeConfig) -> Vec<CheckSpec> {
    vec![
        CheckSpec::fatal(LoadCheck),
        CheckSpec::fatal(VersionCheck),
        CheckSpec::fatal(CodecCheck::new(config.reference_codecs.clone())),
        CheckSpec::fatal(FormatCheck),
        CheckSpec::fatal(DemuxerCheck::new(&config.demuxer)),
        CheckSpec::fatal(RemoteOpenCheck::new(
            config.stream_url.clone(),
            config.open_timeout,
        )),
    ]
}
