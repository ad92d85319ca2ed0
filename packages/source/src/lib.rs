#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Earthquake bulletin sources.
//!
//! Turns a bulletin URL into normalized [`EarthquakeRecord`] values:
//! the URL is classified against the embedded source definitions, the
//! optional cutoff is parsed with that source's date templates, and the
//! matching agency extractor fetches and builds the records.

pub mod bulletin;
pub mod classify;
pub mod cutoff;
pub mod dates;
pub mod jma;
pub mod phivolcs;
pub mod progress;
pub mod registry;
pub mod source_def;
pub mod strategy;

use std::sync::Arc;

use quake_bulletin_quake_models::EarthquakeRecord;
use quake_bulletin_scraper::{PageFetcher, ScrapeError};
use quake_bulletin_source_models::Agency;

use crate::cutoff::CutoffFilter;
use crate::progress::ProgressCallback;

/// Errors that can occur while classifying, fetching, or normalizing a
/// bulletin.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The URL matches no known bulletin source.
    #[error("Invalid URL: {url}")]
    InvalidUrl {
        /// The rejected URL.
        url: String,
    },

    /// A date string matches none of the source's templates.
    #[error("Invalid date format: '{value}'")]
    InvalidDateFormat {
        /// The rejected date string.
        value: String,
    },

    /// A packed coordinate string could not be decoded.
    #[error("Invalid coordinates format: '{value}' (expected {pattern})")]
    InvalidCoordinatesFormat {
        /// The rejected coordinate string.
        value: String,
        /// The pattern it was matched against.
        pattern: String,
    },

    /// A packed coordinate string carried no usable depth.
    #[error("Invalid depth format: '{value}' (expected {pattern})")]
    InvalidDepthFormat {
        /// The rejected coordinate string.
        value: String,
        /// The pattern it was matched against.
        pattern: String,
    },

    /// A numeric field could not be parsed.
    #[error("Invalid {field}: '{value}'")]
    InvalidField {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected raw value.
        value: String,
    },

    /// An entry does not have the expected shape.
    #[error("Malformed entry: {message}")]
    MalformedEntry {
        /// Description of what went wrong.
        message: String,
    },

    /// Fetching or decoding the page failed.
    #[error(transparent)]
    Scrape(#[from] ScrapeError),

    /// A configured pattern does not compile.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// An embedded source definition is unusable.
    #[error("Source definition error: {message}")]
    Definition {
        /// Description of what went wrong.
        message: String,
    },
}

/// Extracts every record published at `url`.
///
/// `cutoff`, when present, is parsed before anything is fetched, so a bad
/// cutoff never costs a network round trip.
///
/// # Errors
///
/// Returns [`SourceError::InvalidUrl`] for an unrecognized URL,
/// [`SourceError::InvalidDateFormat`] for an unparseable cutoff, and any
/// fetch or normalization error raised by the agency extractor.
pub async fn extract<F: PageFetcher>(
    fetcher: &F,
    url: &str,
    cutoff: Option<&str>,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<Vec<EarthquakeRecord>, SourceError> {
    let agency = classify::classify_url(url)?;
    let definition = registry::definition(agency)?;
    let normalizer = definition.date_normalizer()?;
    let cutoff = CutoffFilter::parse(cutoff, &normalizer)?;

    log::info!("Extracting {} bulletin from {url}", definition.name);

    match agency {
        Agency::Phivolcs => phivolcs::extract(definition, fetcher, url, &cutoff, progress).await,
        Agency::Jma => jma::extract(definition, fetcher, url, &cutoff, progress).await,
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use quake_bulletin_scraper::{PageFetcher, ScrapeError};

    /// Serves a fixed body and counts how many times it was asked to.
    pub struct FixtureFetcher {
        body: Option<String>,
        fetches: AtomicUsize,
    }

    impl FixtureFetcher {
        pub fn serving(body: &str) -> Self {
            Self {
                body: Some(body.to_owned()),
                fetches: AtomicUsize::new(0),
            }
        }

        /// A fetcher whose every request fails like a non-200 response.
        pub fn failing() -> Self {
            Self {
                body: None,
                fetches: AtomicUsize::new(0),
            }
        }

        pub fn fetches(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    impl PageFetcher for FixtureFetcher {
        async fn fetch_text(&self, _url: &str) -> Result<String, ScrapeError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.body
                .clone()
                .ok_or_else(|| ScrapeError::Parse("503 Service Unavailable".to_owned()))
        }
    }
}
