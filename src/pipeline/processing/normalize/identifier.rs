use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Result, TrackerError};

/// Anything that is not a letter or decimal digit separates id segments.
static SEPARATOR_RUN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^\p{Alphabetic}\p{Nd}]+").expect("separator pattern is valid")
});

/// One or more trailing revision markers such as `-R1` or `-REV2`, with
/// something left in front of them.
static REVISION_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.+?)(?:-(?:REV|R)[0-9]+)+$").expect("revision pattern is valid"));

/// Canonicalizes manuscript identifiers into a comparable key.
///
/// `jou-2021-0042.R1`, ` JOU_2021_0042 ` and `JOU 2021 0042-R2` all collapse to
/// `JOU-2021-0042`. The transform is a fixed point: feeding its output back in
/// returns the same string.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentifierNormalizer;

impl IdentifierNormalizer {
    pub fn new() -> Self {
        Self
    }

    pub fn normalize(&self, raw_id: &str) -> Result<String> {
        let trimmed = raw_id.trim();
        if trimmed.is_empty() {
            return Err(TrackerError::InvalidIdentifier);
        }

        let upper = trimmed.to_uppercase();
        let collapsed = SEPARATOR_RUN.replace_all(&upper, "-");
        let collapsed = collapsed.trim_matches('-');
        if collapsed.is_empty() {
            // No letters or digits to canonicalize
            return Ok(trimmed.to_string());
        }

        let canonical = match REVISION_SUFFIX.captures(collapsed) {
            Some(caps) => caps[1].to_string(),
            None => collapsed.to_string(),
        };
        Ok(canonical)
    }

    /// Normalizes an optional value, treating `None` like an empty id.
    pub fn normalize_opt(&self, raw_id: Option<&str>) -> Result<String> {
        self.normalize(raw_id.unwrap_or_default())
    }
}
