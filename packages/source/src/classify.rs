//! URL classification.
//!
//! Decides which agency a bulletin URL belongs to by matching it against
//! each registered source's pattern set, in registry order.

use quake_bulletin_source_models::Agency;
use regex::Regex;

use crate::SourceError;
use crate::registry::all_sources;

/// Returns the agency whose pattern set matches `url`.
///
/// # Errors
///
/// Returns [`SourceError::InvalidUrl`] if no source matches, or
/// [`SourceError::Regex`] if a configured pattern does not compile.
pub fn classify_url(url: &str) -> Result<Agency, SourceError> {
    for source in all_sources() {
        for pattern in &source.url_patterns {
            if Regex::new(pattern)?.is_match(url) {
                log::debug!("{url} classified as {} ({pattern})", source.agency);
                return Ok(source.agency);
            }
        }
    }

    Err(SourceError::InvalidUrl {
        url: url.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_jma_feed() {
        assert_eq!(
            classify_url("https://www.jma.go.jp/bosai/quake/data/list.json").unwrap(),
            Agency::Jma
        );
    }

    #[test]
    fn classifies_phivolcs_home() {
        for url in [
            "https://earthquake.phivolcs.dost.gov.ph/",
            "http://earthquake.phivolcs.dost.gov.ph",
        ] {
            assert_eq!(classify_url(url).unwrap(), Agency::Phivolcs, "{url}");
        }
    }

    #[test]
    fn classifies_phivolcs_monthly_archive() {
        let url = "https://earthquake.phivolcs.dost.gov.ph/EQLatest-Monthly/2023/2023_January.html";
        assert_eq!(classify_url(url).unwrap(), Agency::Phivolcs);
    }

    #[test]
    fn rejects_archive_outside_year_range() {
        for url in [
            "https://earthquake.phivolcs.dost.gov.ph/EQLatest-Monthly/2016/2016_January.html",
            "https://earthquake.phivolcs.dost.gov.ph/EQLatest-Monthly/2025/2025_January.html",
        ] {
            assert!(
                matches!(classify_url(url), Err(SourceError::InvalidUrl { .. })),
                "{url}"
            );
        }
    }

    #[test]
    fn rejects_unknown_host() {
        let err = classify_url("https://example.com/").unwrap_err();
        assert!(matches!(err, SourceError::InvalidUrl { url } if url == "https://example.com/"));
    }

    #[test]
    fn rejects_other_jma_paths() {
        assert!(classify_url("https://www.jma.go.jp/bosai/quake/data/other.json").is_err());
    }
}
