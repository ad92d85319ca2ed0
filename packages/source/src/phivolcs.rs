//! PHIVOLCS HTML bulletin extraction.
//!
//! The bulletin is an HTML page whose entry table has moved between eras,
//! so extraction runs the definition's table strategies through
//! [`first_non_empty`] until one yields records. Each row is date,
//! latitude, longitude, depth, magnitude, and location, with an anchor to
//! the event page.

use std::str::FromStr;
use std::sync::{Arc, LazyLock};

use chrono::{DateTime, FixedOffset};
use quake_bulletin_quake_models::{Coordinates, EarthquakeRecord, Location};
use quake_bulletin_scraper::PageFetcher;
use quake_bulletin_scraper::html_table::{TableLocator, TableRow, extract_rows};
use regex::Regex;

use crate::SourceError;
use crate::bulletin::{BulletinSource, run_source};
use crate::cutoff::CutoffFilter;
use crate::dates::DateNormalizer;
use crate::progress::ProgressCallback;
use crate::source_def::{FetcherConfig, SourceDefinition};
use crate::strategy::first_non_empty;

const DATE_CELL: usize = 0;
const LATITUDE_CELL: usize = 1;
const LONGITUDE_CELL: usize = 2;
const DEPTH_CELL: usize = 3;
const MAGNITUDE_CELL: usize = 4;
const LOCATION_CELL: usize = 5;

/// Placeholder the bulletin uses for unknown numeric values.
const PLACEHOLDER: &str = "-";

static NON_PRINTABLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\x20-\x7E]").unwrap_or_else(|_| unreachable!()));

static DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{2})\s+(\w+)\s+(\d{4})\s+-\s+(\d{2}:\d{2}\s+[AaPp][Mm])")
        .unwrap_or_else(|_| unreachable!())
});

// Double-encoded non-breaking spaces left over from the page's charset.
static MOJIBAKE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:Ã‚|Â)+").unwrap_or_else(|_| unreachable!()));

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").unwrap_or_else(|_| unreachable!()));

/// One table strategy of the PHIVOLCS bulletin.
#[derive(Debug, Clone)]
pub struct PhivolcsSource {
    label: String,
    normalizer: DateNormalizer,
    detail_base_url: String,
    locator: TableLocator,
}

impl PhivolcsSource {
    /// Creates a source that reads the table described by `locator`.
    #[must_use]
    pub const fn new(
        label: String,
        normalizer: DateNormalizer,
        detail_base_url: String,
        locator: TableLocator,
    ) -> Self {
        Self {
            label,
            normalizer,
            detail_base_url,
            locator,
        }
    }
}

impl BulletinSource for PhivolcsSource {
    type Entry = TableRow;

    fn label(&self) -> &str {
        &self.label
    }

    fn parse_entries(&self, body: &str) -> Result<Vec<TableRow>, SourceError> {
        Ok(extract_rows(body, self.locator))
    }

    fn observed_at(
        &self,
        row: &TableRow,
    ) -> Result<Option<DateTime<FixedOffset>>, SourceError> {
        let Some(raw) = row.cell(DATE_CELL) else {
            return Ok(None);
        };

        let cleaned = NON_PRINTABLE_RE.replace_all(raw, "");
        let Some(caps) = DATE_RE.captures(cleaned.trim()) else {
            log::debug!("[{}] Skipping undated row: {:?}", self.label, raw.trim());
            return Ok(None);
        };

        let rebuilt = format!("{} {} {} - {}", &caps[1], &caps[2], &caps[3], &caps[4]);
        self.normalizer.normalize(&rebuilt).map(Some)
    }

    fn build_record(
        &self,
        row: &TableRow,
        observed_at: DateTime<FixedOffset>,
    ) -> Result<EarthquakeRecord, SourceError> {
        if row.cells.len() <= LOCATION_CELL {
            return Err(SourceError::MalformedEntry {
                message: format!(
                    "row dated {observed_at} has {} cells, expected at least {}",
                    row.cells.len(),
                    LOCATION_CELL + 1
                ),
            });
        }

        let latitude = parse_optional::<f64>("latitude", &row.cells[LATITUDE_CELL])?;
        let longitude = parse_optional::<f64>("longitude", &row.cells[LONGITUDE_CELL])?;
        let depth_km = parse_optional::<u32>("depth", &row.cells[DEPTH_CELL])?;
        let magnitude = parse_optional::<f64>("magnitude", &row.cells[MAGNITUDE_CELL])?;

        let (event_details_url, graphic_url) = row.first_link().map_or((None, None), |href| {
            (
                Some(format!("{}{href}", self.detail_base_url)),
                Some(format!(
                    "{}{}",
                    self.detail_base_url,
                    href.replace(".html", ".jpg")
                )),
            )
        });

        Ok(EarthquakeRecord {
            observed_at,
            issuance_at: None,
            location: Location::named(clean_location(&row.cells[LOCATION_CELL])),
            magnitude,
            max_seismic_intensity: None,
            coordinates: Coordinates::from_axes(latitude, longitude),
            depth_km,
            event_details_url,
            graphic_url,
        })
    }
}

/// Runs the definition's table strategies against `url`, first non-empty
/// wins.
///
/// # Errors
///
/// Returns [`SourceError::Definition`] if the definition is not an HTML
/// table source, or the first error raised by any strategy.
pub async fn extract<F: PageFetcher>(
    definition: &SourceDefinition,
    fetcher: &F,
    url: &str,
    cutoff: &CutoffFilter,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<Vec<EarthquakeRecord>, SourceError> {
    let FetcherConfig::HtmlTable {
        detail_base_url,
        strategies,
    } = &definition.fetcher
    else {
        return Err(SourceError::Definition {
            message: format!("{}: expected an html_table fetcher", definition.id),
        });
    };

    let normalizer = definition.date_normalizer()?;

    let records = first_non_empty(strategies, |strategy| {
        let source = PhivolcsSource::new(
            format!("{}/{}", definition.id, strategy.label),
            normalizer.clone(),
            detail_base_url.clone(),
            strategy.locator(),
        );
        async move { run_source(&source, fetcher, url, cutoff, progress).await }
    })
    .await?;

    if records.is_empty() {
        log::warn!(
            "[{}] No strategy yielded records for {url}",
            definition.id
        );
    }

    Ok(records)
}

fn parse_optional<T: FromStr>(field: &'static str, raw: &str) -> Result<Option<T>, SourceError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == PLACEHOLDER {
        return Ok(None);
    }
    trimmed
        .parse()
        .map(Some)
        .map_err(|_| SourceError::InvalidField {
            field,
            value: trimmed.to_owned(),
        })
}

fn clean_location(raw: &str) -> String {
    let without_mojibake = MOJIBAKE_RE.replace_all(raw.trim(), "");
    WHITESPACE_RE
        .replace_all(&without_mojibake, " ")
        .trim()
        .to_owned()
}
