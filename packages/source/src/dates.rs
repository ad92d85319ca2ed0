//! Date normalization for bulletin timestamps.
//!
//! Agencies publish dates in several templates and timezones. A
//! [`DateNormalizer`] tries a source's templates in priority order and
//! always yields an offset-aware timestamp, so every comparison downstream
//! is between instants.

use chrono::{DateTime, FixedOffset, NaiveDateTime};

use crate::SourceError;

/// Template used for cutoffs and for serializing normalized timestamps.
pub const CANONICAL_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";

/// Parses raw date strings for a single source.
#[derive(Debug, Clone)]
pub struct DateNormalizer {
    formats: Vec<String>,
    offset: FixedOffset,
}

impl DateNormalizer {
    /// Creates a normalizer that tries `formats` in order. Naive templates
    /// are stamped with `offset` (the reading is taken as local wall-clock
    /// time, never converted).
    #[must_use]
    pub const fn new(formats: Vec<String>, offset: FixedOffset) -> Self {
        Self { formats, offset }
    }

    /// Returns the offset stamped on naive timestamps.
    #[must_use]
    pub const fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Parses `raw` with the first template that accepts it.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::InvalidDateFormat`] if no template matches.
    pub fn normalize(&self, raw: &str) -> Result<DateTime<FixedOffset>, SourceError> {
        let trimmed = raw.trim();
        self.formats
            .iter()
            .find_map(|format| parse_with(trimmed, format, self.offset))
            .ok_or_else(|| SourceError::InvalidDateFormat {
                value: raw.to_owned(),
            })
    }
}

/// Formats a timestamp with [`CANONICAL_DATE_FORMAT`].
#[must_use]
pub fn format_canonical(timestamp: &DateTime<FixedOffset>) -> String {
    timestamp.format(CANONICAL_DATE_FORMAT).to_string()
}

/// Parses a string written with [`CANONICAL_DATE_FORMAT`].
#[must_use]
pub fn parse_canonical(raw: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_str(raw.trim(), CANONICAL_DATE_FORMAT).ok()
}

fn parse_with(raw: &str, format: &str, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    if carries_offset(format) {
        return DateTime::parse_from_str(raw, format).ok();
    }
    NaiveDateTime::parse_from_str(raw, format)
        .ok()?
        .and_local_timezone(offset)
        .single()
}

fn carries_offset(format: &str) -> bool {
    ["%z", "%:z", "%#z"].iter().any(|d| format.contains(d))
}
