//! Cutoff filtering.
//!
//! Callers may ask for only the entries observed at or after a given
//! moment. The cutoff is parsed once, before anything is fetched, and kept
//! as an offset-aware instant so it can only ever be compared against other
//! offset-aware instants.

use chrono::{DateTime, FixedOffset};

use crate::SourceError;
use crate::dates::{DateNormalizer, parse_canonical};

/// Lower bound on observed timestamps. Entries strictly earlier are dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CutoffFilter {
    cutoff: Option<DateTime<FixedOffset>>,
}

impl CutoffFilter {
    /// A filter that admits everything.
    #[must_use]
    pub const fn none() -> Self {
        Self { cutoff: None }
    }

    /// A filter at an already-parsed instant.
    #[must_use]
    pub const fn at(cutoff: DateTime<FixedOffset>) -> Self {
        Self {
            cutoff: Some(cutoff),
        }
    }

    /// Parses an optional cutoff string. The canonical template is tried
    /// first, then each of the source's own templates.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::InvalidDateFormat`] if `raw` is present but
    /// matches none of the templates.
    pub fn parse(raw: Option<&str>, normalizer: &DateNormalizer) -> Result<Self, SourceError> {
        let Some(raw) = raw else {
            return Ok(Self::none());
        };

        let cutoff = match parse_canonical(raw) {
            Some(cutoff) => cutoff,
            None => normalizer.normalize(raw)?,
        };

        log::debug!("Cutoff set to {cutoff}");
        Ok(Self::at(cutoff))
    }

    /// Returns the cutoff instant, if any.
    #[must_use]
    pub const fn cutoff(&self) -> Option<DateTime<FixedOffset>> {
        self.cutoff
    }

    /// Whether `observed_at` falls strictly before the cutoff.
    #[must_use]
    pub fn is_before_cutoff(&self, observed_at: &DateTime<FixedOffset>) -> bool {
        self.cutoff.is_some_and(|cutoff| *observed_at < cutoff)
    }
}
