//! JMA JSON feed extraction.
//!
//! The feed is a bare array of event objects, newest first. Coordinates and
//! depth arrive packed into a single ISO 6709-style string (`cod`), e.g.
//! `+37.5+137.2-10000/`, with depth in meters.

use std::sync::{Arc, LazyLock};

use chrono::{DateTime, FixedOffset};
use quake_bulletin_quake_models::{Coordinates, EarthquakeRecord, Location, SeismicIntensity};
use quake_bulletin_scraper::PageFetcher;
use quake_bulletin_scraper::json_feed;
use regex::Regex;
use serde::Deserialize;

use crate::SourceError;
use crate::bulletin::{BulletinSource, run_source};
use crate::cutoff::CutoffFilter;
use crate::dates::DateNormalizer;
use crate::progress::ProgressCallback;
use crate::source_def::{FetcherConfig, SourceDefinition};

const COORDINATES_PATTERN: &str = r"^([+-]\d+\.\d+)([+-]\d+\.\d+)([+-]\d+)?";

static COORDINATES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(COORDINATES_PATTERN).unwrap_or_else(|_| unreachable!()));

/// One object of the JMA feed. Only the fields used for records are kept;
/// missing fields read as empty strings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct JmaEntry {
    /// Observed timestamp.
    pub at: String,
    /// Report issuance timestamp.
    pub rdt: String,
    /// Place name in Japanese.
    pub anm: String,
    /// Place name in English.
    pub en_anm: String,
    /// Magnitude, empty while provisional.
    pub mag: String,
    /// Maximum seismic intensity, empty when not observed.
    pub maxi: String,
    /// Packed coordinates and depth.
    pub cod: String,
    /// Event identifier used by the detail page.
    pub ctt: String,
}

/// Packed `cod` value split into its parts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hypocenter {
    /// Epicenter, when the feed published one.
    pub coordinates: Option<Coordinates>,
    /// Depth in whole kilometers.
    pub depth_km: Option<u32>,
}

/// The JMA earthquake list feed.
#[derive(Debug, Clone)]
pub struct JmaSource {
    label: String,
    normalizer: DateNormalizer,
    detail_base_url: String,
}

impl JmaSource {
    /// Creates a feed source.
    #[must_use]
    pub const fn new(label: String, normalizer: DateNormalizer, detail_base_url: String) -> Self {
        Self {
            label,
            normalizer,
            detail_base_url,
        }
    }
}

impl BulletinSource for JmaSource {
    type Entry = JmaEntry;

    fn label(&self) -> &str {
        &self.label
    }

    fn parse_entries(&self, body: &str) -> Result<Vec<JmaEntry>, SourceError> {
        Ok(json_feed::parse_entries(body)?)
    }

    fn observed_at(
        &self,
        entry: &JmaEntry,
    ) -> Result<Option<DateTime<FixedOffset>>, SourceError> {
        self.normalizer.normalize(&entry.at).map(Some)
    }

    fn build_record(
        &self,
        entry: &JmaEntry,
        observed_at: DateTime<FixedOffset>,
    ) -> Result<EarthquakeRecord, SourceError> {
        let issuance_at = if entry.rdt.trim().is_empty() {
            None
        } else {
            Some(self.normalizer.normalize(&entry.rdt)?)
        };

        let magnitude = match entry.mag.trim() {
            "" => None,
            raw => Some(raw.parse::<f64>().map_err(|_| SourceError::InvalidField {
                field: "magnitude",
                value: raw.to_owned(),
            })?),
        };

        let max_seismic_intensity = match entry.maxi.trim() {
            "" => None,
            raw => Some(
                raw.parse::<SeismicIntensity>()
                    .map_err(|_| SourceError::InvalidField {
                        field: "max seismic intensity",
                        value: raw.to_owned(),
                    })?,
            ),
        };

        let hypocenter = parse_hypocenter(&entry.cod)?;

        Ok(EarthquakeRecord {
            observed_at,
            issuance_at,
            location: Location::bilingual(
                entry.en_anm.replace('\u{200b}', "").trim(),
                entry.anm.trim(),
            ),
            magnitude,
            max_seismic_intensity,
            coordinates: hypocenter.coordinates,
            depth_km: hypocenter.depth_km,
            event_details_url: Some(format!("{}{}", self.detail_base_url, entry.ctt)),
            graphic_url: None,
        })
    }

    fn accepts_after(
        &self,
        previous: Option<&EarthquakeRecord>,
        candidate: &EarthquakeRecord,
    ) -> bool {
        previous.is_none_or(|previous| previous.observed_at != candidate.observed_at)
    }
}

/// Decodes a packed `±lat±lon±depth[/]` string.
///
/// # Errors
///
/// Returns [`SourceError::InvalidCoordinatesFormat`] if a non-empty value
/// does not start with two signed decimals, or
/// [`SourceError::InvalidDepthFormat`] if the depth group is missing or out
/// of range.
pub fn parse_hypocenter(cod: &str) -> Result<Hypocenter, SourceError> {
    let cod = cod.trim();
    if cod.is_empty() {
        return Ok(Hypocenter {
            coordinates: None,
            depth_km: None,
        });
    }

    let caps = COORDINATES_RE
        .captures(cod)
        .ok_or_else(|| SourceError::InvalidCoordinatesFormat {
            value: cod.to_owned(),
            pattern: COORDINATES_PATTERN.to_owned(),
        })?;

    let invalid_coordinates = || SourceError::InvalidCoordinatesFormat {
        value: cod.to_owned(),
        pattern: COORDINATES_PATTERN.to_owned(),
    };
    let latitude: f64 = caps[1].parse().map_err(|_| invalid_coordinates())?;
    let longitude: f64 = caps[2].parse().map_err(|_| invalid_coordinates())?;

    let invalid_depth = || SourceError::InvalidDepthFormat {
        value: cod.to_owned(),
        pattern: COORDINATES_PATTERN.to_owned(),
    };
    let depth_m: i64 = caps
        .get(3)
        .ok_or_else(invalid_depth)?
        .as_str()
        .parse()
        .map_err(|_| invalid_depth())?;
    let depth_km = u32::try_from(depth_m.unsigned_abs() / 1000).map_err(|_| invalid_depth())?;

    Ok(Hypocenter {
        coordinates: Some(Coordinates {
            latitude,
            longitude,
        }),
        depth_km: Some(depth_km),
    })
}

/// Fetches the feed at `url` and builds its records, dropping adjacent
/// entries with the same observed timestamp.
///
/// # Errors
///
/// Returns [`SourceError::Definition`] if the definition is not a JSON feed
/// source, or any fetch or normalization error.
pub async fn extract<F: PageFetcher>(
    definition: &SourceDefinition,
    fetcher: &F,
    url: &str,
    cutoff: &CutoffFilter,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<Vec<EarthquakeRecord>, SourceError> {
    let FetcherConfig::JsonFeed { detail_base_url } = &definition.fetcher else {
        return Err(SourceError::Definition {
            message: format!("{}: expected a json_feed fetcher", definition.id),
        });
    };

    let source = JmaSource::new(
        definition.id.clone(),
        definition.date_normalizer()?,
        detail_base_url.clone(),
    );

    run_source(&source, fetcher, url, cutoff, progress).await
}
