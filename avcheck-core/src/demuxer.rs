//! Word-boundary matching of demuxer names in backend introspection output.
//!
//! `ffmpeg -demuxers` prints one demuxer per line as a capability flag column
//! followed by the name:
//!
//! ```text
//!  D  hls             Apple HTTP Live Streaming
//!  D  hlsv2           (hypothetical prefixed name)
//! ```
//!
//! A name is present only when it is the whole first token after the flag, so
//! `hls` is not satisfied by `hlsv2`.

use crate::error::{CoreError, CoreResult};
use regex::Regex;

/// Compiled matcher for a single demuxer name.
#[derive(Debug, Clone)]
pub struct DemuxerMatcher {
    name: String,
    pattern: Regex,
}

impl DemuxerMatcher {
    pub fn new(name: &str) -> CoreResult<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::Parse("demuxer name must not be empty".into()));
        }
        // Horizontal whitespace only: a match must not span lines.
        let pattern = Regex::new(&format!(r"(?m)^[ \t]*\S[ \t]+{}\b", regex::escape(name)))
            .map_err(|e| {
                CoreError::Parse(format!("invalid demuxer pattern for '{}': {}", name, e))
            })?;
        Ok(Self {
            name: name.to_string(),
            pattern,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true if any line of `listing` declares this demuxer.
    pub fn is_listed(&self, listing: &str) -> bool {
        self.pattern.is_match(listing)
    }
}
