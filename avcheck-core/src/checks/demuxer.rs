use super::{Check, CheckOutcome, DEMUXER, ProbeContext};
use crate::demuxer::DemuxerMatcher;
use crate::error::CoreResult;

/// Confirms the engine itself lists a demuxer, bypassing the binding.
#[derive(Debug, Clone)]
pub struct DemuxerCheck {
    target: String,
}

impl DemuxerCheck {
    pub fn new(target: &str) -> Self {
        Self {
            target: target.to_string(),
        }
    }
}

impl Check for DemuxerCheck {
    fn name(&self) -> &str {
        DEMUXER
    }

    fn run(&self, ctx: &mut ProbeContext<'_>) -> CoreResult<CheckOutcome> {
        let matcher = DemuxerMatcher::new(&self.target)?;
        let listing = ctx.introspector().list_demuxers()?;

        if matcher.is_listed(&listing) {
            Ok(CheckOutcome::pass(format!("{} demuxer is present", matcher.name())))
        } else {
            log::warn!("{} demuxer missing from backend listing", matcher.name());
            Ok(CheckOutcome::Fail(format!(
                "{} demuxer is not present",
                matcher.name()
            )))
        }
    }
}
