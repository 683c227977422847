//! Duration extraction from the transcoder's diagnostic stream.
//!
//! ffmpeg emits progress lines of the form `... time=00:01:23.45 ...` on
//! its error stream with increasing timestamps. The last marker therefore
//! approximates the total output duration.

use once_cell::sync::Lazy;
use regex_lite::Regex;

use super::error::TranscodeError;

static TIME_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"time=(\d+):(\d+):(\d+(?:\.\d+)?)").expect("time marker pattern")
});

/// Recovers the total duration in whole seconds from diagnostic text.
///
/// Seconds are floored: `01:02:03.50` yields `1*3600 + 2*60 + 3 = 3723`.
pub fn extract_duration_secs(diagnostics: &str) -> Result<u64, TranscodeError> {
    let caps = TIME_MARKER
        .captures_iter(diagnostics)
        .last()
        .ok_or_else(|| TranscodeError::duration_not_found("no time= marker in diagnostics"))?;

    let hours: u64 = parse_group(&caps, 1)?;
    let minutes: u64 = parse_group(&caps, 2)?;
    let seconds: f64 = caps
        .get(3)
        .and_then(|m| m.as_str().parse().ok())
        .ok_or_else(|| TranscodeError::duration_not_found("malformed seconds group"))?;

    Ok(hours * 3600 + minutes * 60 + seconds as u64)
}

fn parse_group(caps: &regex_lite::Captures<'_>, index: usize) -> Result<u64, TranscodeError> {
    caps.get(index)
        .and_then(|m| m.as_str().parse().ok())
        .ok_or_else(|| TranscodeError::duration_not_found("malformed time components"))
}
