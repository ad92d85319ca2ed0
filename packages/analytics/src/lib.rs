#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Descriptive statistics over earthquake records.
//!
//! [`StatsAggregator`] is a value built by a pure reducer step per record.
//! The summary only becomes visible through [`StatsAggregator::finish`], so
//! a half-folded state is never observed.

use chrono::{DateTime, FixedOffset};
use quake_bulletin_analytics_models::{
    DateRange, EarthquakeStatsSummary, MagnitudeBucket, RecordedCounts,
};
use quake_bulletin_quake_models::EarthquakeRecord;

/// Running fold state over an ordered record sequence.
#[derive(Debug, Clone, Default)]
pub struct StatsAggregator {
    earliest: Option<DateTime<FixedOffset>>,
    latest: Option<DateTime<FixedOffset>>,
    strongest: Option<EarthquakeRecord>,
    weakest: Option<EarthquakeRecord>,
    counts: RecordedCounts,
}

impl StatsAggregator {
    /// Starts an empty fold.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one record into the state.
    ///
    /// Strongest/weakest only change on a strictly greater/smaller
    /// magnitude, so ties keep the record seen first. Records without a
    /// magnitude are counted but never compared.
    #[must_use]
    pub fn step(mut self, record: &EarthquakeRecord) -> Self {
        let observed_at = record.observed_at;
        self.earliest = Some(self.earliest.map_or(observed_at, |e| e.min(observed_at)));
        self.latest = Some(self.latest.map_or(observed_at, |l| l.max(observed_at)));

        if let Some(magnitude) = record.magnitude {
            if self
                .strongest
                .as_ref()
                .and_then(|s| s.magnitude)
                .is_none_or(|current| magnitude > current)
            {
                self.strongest = Some(record.clone());
            }
            if self
                .weakest
                .as_ref()
                .and_then(|w| w.magnitude)
                .is_none_or(|current| magnitude < current)
            {
                self.weakest = Some(record.clone());
            }
        }

        self.counts.total += 1;
        self.counts
            .per_magnitude
            .increment(MagnitudeBucket::for_magnitude(record.magnitude));
        *self
            .counts
            .per_day
            .entry(observed_at.date_naive())
            .or_insert(0) += 1;

        self
    }

    /// Completes the fold.
    #[must_use]
    pub fn finish(self) -> EarthquakeStatsSummary {
        let date_range = self
            .earliest
            .zip(self.latest)
            .map(|(start, end)| DateRange { start, end });

        EarthquakeStatsSummary {
            date_range,
            strongest: self.strongest,
            weakest: self.weakest,
            counts: self.counts,
        }
    }
}

/// Summarizes `records` in a single pass.
#[must_use]
pub fn summarize(records: &[EarthquakeRecord]) -> EarthquakeStatsSummary {
    let summary = records
        .iter()
        .fold(StatsAggregator::new(), StatsAggregator::step)
        .finish();

    log::debug!(
        "Summarized {} records ({} without magnitude)",
        summary.counts.total,
        summary.counts.per_magnitude.unspecified
    );

    summary
}
