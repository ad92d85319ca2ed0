//! Config-driven bulletin source definition.
//!
//! [`SourceDefinition`] captures everything agency-specific that is plain
//! data: URL patterns, date templates, the fixed UTC offset, and how the
//! raw entries are laid out. The agency behavior that is not plain data
//! (field cleanup, coordinate decoding) lives in the per-agency modules.

use chrono::FixedOffset;
use quake_bulletin_scraper::html_table::TableLocator;
use quake_bulletin_source_models::Agency;
use serde::Deserialize;

use crate::SourceError;
use crate::dates::DateNormalizer;

/// A complete bulletin source definition.
///
/// Loaded from TOML files embedded at compile time.
#[derive(Debug, Deserialize)]
pub struct SourceDefinition {
    /// Unique identifier (e.g. `"phivolcs"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Which extractor variant handles this source.
    pub agency: Agency,
    /// Default page to fetch when the caller does not supply one.
    pub home_url: String,
    /// Regexes a URL must match (any one) to belong to this source.
    pub url_patterns: Vec<String>,
    /// `strftime`-style date templates, in priority order.
    pub date_formats: Vec<String>,
    /// Fixed offset stamped on naive timestamps. `None` means UTC.
    #[serde(default)]
    pub utc_offset_hours: Option<i32>,
    /// Whether TLS to this source must be verified against a pinned CA
    /// chain rather than the built-in roots.
    #[serde(default)]
    pub pinned_ca: bool,
    /// How raw entries are laid out.
    pub fetcher: FetcherConfig,
}

/// How raw entries are laid out at the source.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FetcherConfig {
    /// Rows of an HTML table whose position on the page varies by era.
    HtmlTable {
        /// Prefix joined to each row's anchor `href`.
        detail_base_url: String,
        /// Table locations to try, in priority order.
        strategies: Vec<TableStrategy>,
    },
    /// A bare JSON array of event objects.
    JsonFeed {
        /// Prefix joined to each entry's event identifier.
        detail_base_url: String,
    },
}

/// One table-location strategy of the extraction chain.
#[derive(Debug, Clone, Deserialize)]
pub struct TableStrategy {
    /// Name used in log messages.
    pub label: String,
    /// Zero-based ordinal of the table in document order.
    pub table_index: usize,
    /// Leading rows to drop.
    #[serde(default)]
    pub skip_rows: usize,
}

impl TableStrategy {
    /// Returns the scraper-level locator for this strategy.
    #[must_use]
    pub const fn locator(&self) -> TableLocator {
        TableLocator {
            table_index: self.table_index,
            skip_rows: self.skip_rows,
        }
    }
}

impl SourceDefinition {
    /// Returns the fixed offset stamped on this source's naive timestamps.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Definition`] if the configured offset is out of
    /// range.
    pub fn utc_offset(&self) -> Result<FixedOffset, SourceError> {
        let hours = self.utc_offset_hours.unwrap_or(0);
        hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| SourceError::Definition {
                message: format!("{}: UTC offset {hours}h is out of range", self.id),
            })
    }

    /// Builds the [`DateNormalizer`] for this source.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Definition`] if the offset is invalid or no
    /// date formats are configured.
    pub fn date_normalizer(&self) -> Result<DateNormalizer, SourceError> {
        if self.date_formats.is_empty() {
            return Err(SourceError::Definition {
                message: format!("{}: no date formats configured", self.id),
            });
        }
        Ok(DateNormalizer::new(
            self.date_formats.clone(),
            self.utc_offset()?,
        ))
    }
}

/// Parses a TOML string into a [`SourceDefinition`].
///
/// # Errors
///
/// Returns an error string if the TOML is malformed or missing required
/// fields.
pub fn parse_source_toml(toml_str: &str) -> Result<SourceDefinition, String> {
    toml::de::from_str(toml_str).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE_SOURCE: &str = r#"
        id = "test"
        name = "Test Source"
        agency = "PHIVOLCS"
        home_url = "https://example.org/"
        url_patterns = ['^https://example\.org/$']
        date_formats = ["%Y%m%d_%H%M"]
        utc_offset_hours = 8

        [fetcher]
        type = "html_table"
        detail_base_url = "https://example.org/"

        [[fetcher.strategies]]
        label = "primary"
        table_index = 2
        skip_rows = 1

        [[fetcher.strategies]]
        label = "fallback"
        table_index = 1
    "#;

    #[test]
    fn parses_html_table_definition() {
        let def = parse_source_toml(TABLE_SOURCE).unwrap();
        assert_eq!(def.agency, Agency::Phivolcs);
        assert!(!def.pinned_ca);

        let FetcherConfig::HtmlTable { strategies, .. } = &def.fetcher else {
            panic!("expected html_table fetcher");
        };
        assert_eq!(strategies.len(), 2);
        assert_eq!(strategies[0].locator().skip_rows, 1);
        assert_eq!(strategies[1].skip_rows, 0);
    }

    #[test]
    fn offset_defaults_to_utc() {
        let toml = TABLE_SOURCE.replace("utc_offset_hours = 8", "");
        let def = parse_source_toml(&toml).unwrap();
        assert_eq!(def.utc_offset().unwrap().local_minus_utc(), 0);
    }

    #[test]
    fn rejects_out_of_range_offset() {
        let toml = TABLE_SOURCE.replace("utc_offset_hours = 8", "utc_offset_hours = 30");
        let def = parse_source_toml(&toml).unwrap();
        assert!(matches!(
            def.utc_offset(),
            Err(SourceError::Definition { .. })
        ));
    }

    #[test]
    fn rejects_unknown_agency() {
        let toml = TABLE_SOURCE.replace("\"PHIVOLCS\"", "\"USGS\"");
        assert!(parse_source_toml(&toml).is_err());
    }
}
