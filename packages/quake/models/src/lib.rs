#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Normalized earthquake record types.
//!
//! Every bulletin source (PHIVOLCS HTML tables, the JMA JSON feed) produces
//! [`EarthquakeRecord`] values that conform to this shared shape. Fields
//! that only one agency publishes are optional so records from either
//! source can flow through the same statistics code.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A latitude/longitude pair in decimal degrees.
///
/// Records carry `Option<Coordinates>` so a position is either fully known
/// or absent, never half-populated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinates {
    /// Latitude in decimal degrees (positive north).
    pub latitude: f64,
    /// Longitude in decimal degrees (positive east).
    pub longitude: f64,
}

impl Coordinates {
    /// Pairs up two independently parsed axes. Returns `None` unless both
    /// are present.
    #[must_use]
    pub const fn from_axes(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        match (latitude, longitude) {
            (Some(latitude), Some(longitude)) => Some(Self {
                latitude,
                longitude,
            }),
            _ => None,
        }
    }
}

/// Where an earthquake occurred, as published by the agency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// Human-readable (English) place description.
    pub name: String,
    /// Native-script place name (JMA publishes Japanese names alongside the
    /// English ones). `None` for sources that publish a single name.
    pub native_name: Option<String>,
}

impl Location {
    /// Creates a location with only a single, English description.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            native_name: None,
        }
    }

    /// Creates a location with both the English and native-script names.
    #[must_use]
    pub fn bilingual(name: impl Into<String>, native_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            native_name: Some(native_name.into()),
        }
    }
}

/// Lower/upper split used by the JMA seismic intensity scale for levels 5
/// and 6 (e.g. `5-`, `6+`).
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
    EnumString,
    AsRefStr,
)]
pub enum IntensityQualifier {
    /// Weak half of the level (`-`).
    #[strum(serialize = "-")]
    Lower,
    /// Strong half of the level (`+`).
    #[strum(serialize = "+")]
    Upper,
}

/// Maximum observed seismic intensity on the JMA shindo scale (0-7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeismicIntensity {
    /// Integer level, 0 through 7.
    pub level: u8,
    /// Lower/upper split, only published for levels 5 and 6.
    pub qualifier: Option<IntensityQualifier>,
}

impl SeismicIntensity {
    /// Highest level on the shindo scale.
    pub const MAX_LEVEL: u8 = 7;
}

/// Error returned when a string is not a valid [`SeismicIntensity`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidIntensityError {
    /// The rejected input.
    pub value: String,
}

impl std::fmt::Display for InvalidIntensityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid seismic intensity '{}': expected 0-7 with optional '-'/'+'",
            self.value
        )
    }
}

impl std::error::Error for InvalidIntensityError {}

impl std::str::FromStr for SeismicIntensity {
    type Err = InvalidIntensityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || InvalidIntensityError {
            value: s.to_owned(),
        };

        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        let level = chars
            .next()
            .and_then(|c| c.to_digit(10))
            .and_then(|d| u8::try_from(d).ok())
            .filter(|level| *level <= Self::MAX_LEVEL)
            .ok_or_else(err)?;

        let rest = chars.as_str();
        let qualifier = if rest.is_empty() {
            None
        } else {
            if !matches!(level, 5 | 6) {
                return Err(err());
            }
            Some(rest.parse::<IntensityQualifier>().map_err(|_| err())?)
        };

        Ok(Self { level, qualifier })
    }
}

impl std::fmt::Display for SeismicIntensity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.level)?;
        if let Some(qualifier) = self.qualifier {
            write!(f, "{qualifier}")?;
        }
        Ok(())
    }
}

/// A single earthquake normalized from any supported bulletin.
///
/// Records are built once during extraction and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarthquakeRecord {
    /// When the earthquake occurred. PHIVOLCS wall-clock readings carry a
    /// fixed `+08:00` offset; JMA timestamps carry the feed's own offset.
    pub observed_at: DateTime<FixedOffset>,
    /// When the report was issued (JMA only).
    pub issuance_at: Option<DateTime<FixedOffset>>,
    /// Where the earthquake occurred.
    pub location: Location,
    /// Magnitude. `None` for provisional entries with no published value.
    pub magnitude: Option<f64>,
    /// Maximum observed seismic intensity (JMA only).
    pub max_seismic_intensity: Option<SeismicIntensity>,
    /// Epicenter. `None` when the source uses a placeholder for either axis.
    pub coordinates: Option<Coordinates>,
    /// Hypocenter depth in kilometers.
    pub depth_km: Option<u32>,
    /// Link to the agency's detail page for this event.
    pub event_details_url: Option<String>,
    /// Link to the agency's map graphic for this event (PHIVOLCS only).
    pub graphic_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_require_both_axes() {
        assert!(Coordinates::from_axes(Some(14.5), None).is_none());
        assert!(Coordinates::from_axes(None, Some(121.0)).is_none());
        assert!(Coordinates::from_axes(None, None).is_none());

        let coords = Coordinates::from_axes(Some(14.5), Some(121.0)).unwrap();
        assert!((coords.latitude - 14.5).abs() < f64::EPSILON);
        assert!((coords.longitude - 121.0).abs() < f64::EPSILON);
    }

    #[test]
    fn parses_plain_intensity() {
        let intensity: SeismicIntensity = "3".parse().unwrap();
        assert_eq!(intensity.level, 3);
        assert_eq!(intensity.qualifier, None);
        assert_eq!(intensity.to_string(), "3");
    }

    #[test]
    fn parses_qualified_intensity() {
        let lower: SeismicIntensity = "5-".parse().unwrap();
        assert_eq!(lower.qualifier, Some(IntensityQualifier::Lower));
        assert_eq!(lower.to_string(), "5-");

        let upper: SeismicIntensity = "6+".parse().unwrap();
        assert_eq!(upper.level, 6);
        assert_eq!(upper.qualifier, Some(IntensityQualifier::Upper));
        assert!(lower < upper);
    }

    #[test]
    fn rejects_invalid_intensity() {
        assert!("".parse::<SeismicIntensity>().is_err());
        assert!("8".parse::<SeismicIntensity>().is_err());
        assert!("3+".parse::<SeismicIntensity>().is_err());
        assert!("5x".parse::<SeismicIntensity>().is_err());
    }

    #[test]
    fn serializes_camel_case() {
        let record = EarthquakeRecord {
            observed_at: DateTime::parse_from_rfc3339("2024-01-10T23:35:00+08:00").unwrap(),
            issuance_at: None,
            location: Location::named("Davao Oriental"),
            magnitude: Some(4.5),
            max_seismic_intensity: None,
            coordinates: None,
            depth_km: Some(10),
            event_details_url: None,
            graphic_url: None,
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["observedAt"], "2024-01-10T23:35:00+08:00");
        assert_eq!(json["location"]["name"], "Davao Oriental");
        assert_eq!(json["depthKm"], 10);
    }
}
