//! Source registry: loads all source definitions from embedded TOML configs.
//!
//! Each `.toml` file in `packages/source/sources/` is baked into the binary
//! at compile time via [`include_str!`]. Order matters: URL classification
//! walks the registry front to back and the first matching source wins.

use std::sync::LazyLock;

use quake_bulletin_source_models::Agency;

use crate::SourceError;
use crate::source_def::{SourceDefinition, parse_source_toml};

/// TOML configs embedded at compile time, in classification order.
const SOURCE_TOMLS: &[(&str, &str)] = &[
    ("jma", include_str!("../sources/jma.toml")),
    ("phivolcs", include_str!("../sources/phivolcs.toml")),
];

static SOURCES: LazyLock<Vec<SourceDefinition>> = LazyLock::new(|| {
    SOURCE_TOMLS
        .iter()
        .map(|(name, toml)| {
            parse_source_toml(toml).unwrap_or_else(|e| panic!("Failed to parse {name}.toml: {e}"))
        })
        .collect()
});

/// Returns all configured source definitions, in classification order.
///
/// # Panics
///
/// Panics if any TOML config is malformed (this is a compile-time guarantee
/// since the configs are embedded).
#[must_use]
pub fn all_sources() -> &'static [SourceDefinition] {
    &SOURCES
}

/// Returns the definition that handles `agency`.
///
/// # Errors
///
/// Returns [`SourceError::Definition`] if no embedded config declares the
/// agency.
pub fn definition(agency: Agency) -> Result<&'static SourceDefinition, SourceError> {
    all_sources()
        .iter()
        .find(|def| def.agency == agency)
        .ok_or_else(|| SourceError::Definition {
            message: format!("no source definition for {agency}"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_all_sources() {
        assert_eq!(all_sources().len(), SOURCE_TOMLS.len());
    }

    #[test]
    fn every_agency_has_exactly_one_definition() {
        for agency in Agency::all() {
            let count = all_sources()
                .iter()
                .filter(|def| def.agency == *agency)
                .count();
            assert_eq!(count, 1, "{agency} has {count} definitions");
        }
    }

    #[test]
    fn jma_is_classified_before_phivolcs() {
        let order: Vec<Agency> = all_sources().iter().map(|def| def.agency).collect();
        assert_eq!(order, vec![Agency::Jma, Agency::Phivolcs]);
    }

    #[test]
    fn all_sources_have_required_fields() {
        for source in all_sources() {
            assert!(!source.id.is_empty(), "source id is empty");
            assert!(!source.name.is_empty(), "source name is empty");
            assert!(
                !source.url_patterns.is_empty(),
                "{}: no url patterns",
                source.id
            );
            assert!(
                source.date_normalizer().is_ok(),
                "{}: invalid date configuration",
                source.id
            );
        }
    }

    #[test]
    fn url_patterns_compile() {
        for source in all_sources() {
            for pattern in &source.url_patterns {
                assert!(
                    regex::Regex::new(pattern).is_ok(),
                    "{}: bad pattern {pattern}",
                    source.id
                );
            }
        }
    }
}
