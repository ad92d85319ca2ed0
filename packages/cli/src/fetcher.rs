//! HTTP client selection.
//!
//! Sources flagged `pinned_ca` are verified against a PEM bundle supplied
//! by the operator instead of the built-in roots.

use std::path::{Path, PathBuf};

use quake_bulletin_scraper::HttpFetcher;
use quake_bulletin_source::source_def::SourceDefinition;

/// Environment variable consulted when `--ca-cert` is not given.
pub const CA_CERT_ENV: &str = "QUAKE_BULLETIN_PHIVOLCS_CA_CERT";

/// Picks the CA bundle path: the flag wins over the environment.
#[must_use]
pub fn resolve_ca_cert(flag: Option<PathBuf>, env: Option<PathBuf>) -> Option<PathBuf> {
    flag.or(env)
}

/// Builds the fetcher for `definition`.
///
/// # Errors
///
/// Returns an error if the CA bundle cannot be read or parsed, or the HTTP
/// client cannot be built.
pub fn for_source(
    definition: &SourceDefinition,
    ca_cert: Option<&Path>,
) -> Result<HttpFetcher, Box<dyn std::error::Error>> {
    if !definition.pinned_ca {
        return Ok(HttpFetcher::new()?);
    }

    if let Some(path) = ca_cert {
        log::info!(
            "Verifying {} against CA bundle {}",
            definition.name,
            path.display()
        );
        return Ok(HttpFetcher::with_pinned_ca_file(path)?);
    }

    log::warn!(
        "{} publishes behind a certificate chain missing from common root stores; \
         pass --ca-cert or set {CA_CERT_ENV} if the TLS handshake fails",
        definition.name
    );
    Ok(HttpFetcher::new()?)
}
