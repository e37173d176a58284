//! Checks answered by the runtime handle: load, versions, codecs, formats.

use super::{CODECS, Check, CheckOutcome, FORMATS, LOAD, ProbeContext, VERSION};
use crate::error::{CoreError, CoreResult};
use std::collections::BTreeSet;

/// Constructs the runtime. Later checks use the handle it leaves in the context.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadCheck;

impl Check for LoadCheck {
    fn name(&self) -> &str {
        LOAD
    }

    fn run(&self, ctx: &mut ProbeContext<'_>) -> CoreResult<CheckOutcome> {
        let runtime = ctx.load_runtime()?;
        Ok(CheckOutcome::pass(format!("{} loaded", runtime.describe())))
    }
}

/// Reads the engine version (required) and the binding version (cosmetic).
#[derive(Debug, Clone, Copy, Default)]
pub struct VersionCheck;

impl Check for VersionCheck {
    fn name(&self) -> &str {
        VERSION
    }

    fn run(&self, ctx: &mut ProbeContext<'_>) -> CoreResult<CheckOutcome> {
        let runtime = ctx.runtime()?;

        let backend = runtime.backend_version()?;
        if backend.trim().is_empty() {
            return Err(CoreError::Version("engine reported an empty version".into()));
        }

        let mut warnings = Vec::new();
        let detail = match runtime.binding_version() {
            Ok(binding) => format!("binding {}, engine {}", binding, backend),
            Err(e) => {
                log::warn!("Could not read binding version: {}", e);
                warnings.push(format!("could not read binding version: {}", e));
                format!("engine {}", backend)
            }
        };
        Ok(CheckOutcome::Pass { detail, warnings })
    }
}

/// Enumerates codecs and reports which reference codecs are among them.
///
/// A missing reference codec is informational only.
#[derive(Debug, Clone, Default)]
pub struct CodecCheck {
    reference: Vec<String>,
}

impl CodecCheck {
    pub fn new(reference: Vec<String>) -> Self {
        Self { reference }
    }
}

impl Check for CodecCheck {
    fn name(&self) -> &str {
        CODECS
    }

    fn run(&self, ctx: &mut ProbeContext<'_>) -> CoreResult<CheckOutcome> {
        let codecs = ctx.runtime()?.codecs()?;
        let common = available_reference_codecs(&self.reference, &codecs);
        log::debug!("Reference codecs available: {:?}", common);

        let common = if common.is_empty() {
            "none".to_string()
        } else {
            common.join(", ")
        };
        Ok(CheckOutcome::pass(format!(
            "{} codecs available; common: {}",
            codecs.len(),
            common
        )))
    }
}

/// Reference names mapped to the identifiers FFmpeg actually uses.
fn codec_aliases(name: &str) -> &'static [&'static str] {
    match name {
        "h265" => &["hevc"],
        "hevc" => &["h265"],
        _ => &[],
    }
}

/// Reference codecs present in `available`, in reference order.
pub fn available_reference_codecs(
    reference: &[String],
    available: &BTreeSet<String>,
) -> Vec<String> {
    reference
        .iter()
        .filter(|name| {
            available.contains(name.as_str())
                || codec_aliases(name).iter().any(|alias| available.contains(*alias))
        })
        .cloned()
        .collect()
}

/// Enumerates container formats.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatCheck;

impl Check for FormatCheck {
    fn name(&self) -> &str {
        FORMATS
    }

    fn run(&self, ctx: &mut ProbeContext<'_>) -> CoreResult<CheckOutcome> {
        let formats = ctx.runtime()?.formats()?;
        Ok(CheckOutcome::pass(format!("{} formats available", formats.len())))
    }
}
