#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Summary statistics types for earthquake records.
//!
//! [`EarthquakeStatsSummary`] is the result of folding an ordered record
//! sequence once. It is plain data: building it is the job of the
//! analytics crate.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, NaiveDate};
use quake_bulletin_quake_models::EarthquakeRecord;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter};

/// Magnitude band a record is counted under. Bands are half-open.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MagnitudeBucket {
    /// No magnitude was published.
    Unspecified,
    /// Below 4.0.
    #[strum(serialize = "below_4_0")]
    #[serde(rename = "below_4_0")]
    Below4,
    /// 4.0 up to (not including) 6.0.
    #[strum(serialize = "4_0_to_5_9")]
    #[serde(rename = "4_0_to_5_9")]
    From4To6,
    /// 6.0 up to (not including) 8.0.
    #[strum(serialize = "6_0_to_7_9")]
    #[serde(rename = "6_0_to_7_9")]
    From6To8,
    /// 8.0 and above.
    #[strum(serialize = "8_0_and_above")]
    #[serde(rename = "8_0_and_above")]
    AtLeast8,
}

impl MagnitudeBucket {
    /// Returns the bucket for an optional magnitude.
    #[must_use]
    pub fn for_magnitude(magnitude: Option<f64>) -> Self {
        match magnitude {
            None => Self::Unspecified,
            Some(m) if m < 4.0 => Self::Below4,
            Some(m) if m < 6.0 => Self::From4To6,
            Some(m) if m < 8.0 => Self::From6To8,
            Some(_) => Self::AtLeast8,
        }
    }
}

/// Record counts per magnitude band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MagnitudeCounts {
    /// Records without a magnitude.
    pub unspecified: u64,
    /// Magnitude below 4.0.
    pub below_4_0: u64,
    /// Magnitude in `[4.0, 6.0)`.
    pub from_4_0_to_5_9: u64,
    /// Magnitude in `[6.0, 8.0)`.
    pub from_6_0_to_7_9: u64,
    /// Magnitude 8.0 or more.
    pub at_least_8_0: u64,
}

impl MagnitudeCounts {
    /// Returns the count for `bucket`.
    #[must_use]
    pub const fn get(&self, bucket: MagnitudeBucket) -> u64 {
        match bucket {
            MagnitudeBucket::Unspecified => self.unspecified,
            MagnitudeBucket::Below4 => self.below_4_0,
            MagnitudeBucket::From4To6 => self.from_4_0_to_5_9,
            MagnitudeBucket::From6To8 => self.from_6_0_to_7_9,
            MagnitudeBucket::AtLeast8 => self.at_least_8_0,
        }
    }

    /// Adds one to `bucket`.
    pub const fn increment(&mut self, bucket: MagnitudeBucket) {
        match bucket {
            MagnitudeBucket::Unspecified => self.unspecified += 1,
            MagnitudeBucket::Below4 => self.below_4_0 += 1,
            MagnitudeBucket::From4To6 => self.from_4_0_to_5_9 += 1,
            MagnitudeBucket::From6To8 => self.from_6_0_to_7_9 += 1,
            MagnitudeBucket::AtLeast8 => self.at_least_8_0 += 1,
        }
    }

    /// Sum over every band.
    #[must_use]
    pub const fn sum(&self) -> u64 {
        self.unspecified
            + self.below_4_0
            + self.from_4_0_to_5_9
            + self.from_6_0_to_7_9
            + self.at_least_8_0
    }
}

/// Earliest and latest observed timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    /// Earliest observed timestamp.
    pub start: DateTime<FixedOffset>,
    /// Latest observed timestamp.
    pub end: DateTime<FixedOffset>,
}

/// Totals over the whole sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordedCounts {
    /// Number of records.
    pub total: u64,
    /// Records per magnitude band.
    pub per_magnitude: MagnitudeCounts,
    /// Records per calendar day, in each record's own offset.
    pub per_day: BTreeMap<NaiveDate, u64>,
}

/// Statistics over one ordered record sequence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarthquakeStatsSummary {
    /// `None` for an empty sequence.
    pub date_range: Option<DateRange>,
    /// Record with the highest magnitude; earliest seen wins ties.
    pub strongest: Option<EarthquakeRecord>,
    /// Record with the lowest magnitude; earliest seen wins ties.
    pub weakest: Option<EarthquakeRecord>,
    /// Totals.
    pub counts: RecordedCounts,
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn buckets_are_half_open() {
        assert_eq!(MagnitudeBucket::for_magnitude(None), MagnitudeBucket::Unspecified);
        assert_eq!(MagnitudeBucket::for_magnitude(Some(3.99)), MagnitudeBucket::Below4);
        assert_eq!(MagnitudeBucket::for_magnitude(Some(4.0)), MagnitudeBucket::From4To6);
        assert_eq!(MagnitudeBucket::for_magnitude(Some(5.9)), MagnitudeBucket::From4To6);
        assert_eq!(MagnitudeBucket::for_magnitude(Some(5.95)), MagnitudeBucket::From4To6);
        assert_eq!(MagnitudeBucket::for_magnitude(Some(6.0)), MagnitudeBucket::From6To8);
        assert_eq!(MagnitudeBucket::for_magnitude(Some(7.99)), MagnitudeBucket::From6To8);
        assert_eq!(MagnitudeBucket::for_magnitude(Some(8.0)), MagnitudeBucket::AtLeast8);
        assert_eq!(MagnitudeBucket::for_magnitude(Some(-0.5)), MagnitudeBucket::Below4);
    }

    #[test]
    fn increment_and_get_agree_for_every_bucket() {
        let mut counts = MagnitudeCounts::default();
        for (i, bucket) in MagnitudeBucket::iter().enumerate() {
            for _ in 0..=i {
                counts.increment(bucket);
            }
        }
        for (i, bucket) in MagnitudeBucket::iter().enumerate() {
            assert_eq!(counts.get(bucket), i as u64 + 1, "{bucket}");
        }
        assert_eq!(counts.sum(), 15);
    }

    #[test]
    fn bucket_labels() {
        assert_eq!(MagnitudeBucket::From4To6.to_string(), "4_0_to_5_9");
        assert_eq!(MagnitudeBucket::Unspecified.as_ref(), "unspecified");
    }

    #[test]
    fn empty_summary_serializes_nulls() {
        let json = serde_json::to_value(EarthquakeStatsSummary::default()).unwrap();
        assert!(json["dateRange"].is_null());
        assert!(json["strongest"].is_null());
        assert_eq!(json["counts"]["total"], 0);
        assert_eq!(json["counts"]["perMagnitude"]["below_4_0"], 0);
    }
}
