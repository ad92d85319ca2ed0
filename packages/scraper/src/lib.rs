#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Page fetching and raw extraction for earthquake bulletins.
//!
//! Provides the [`PageFetcher`] trait with a `reqwest`-backed
//! implementation ([`HttpFetcher`]), plus parsers for the two raw shapes the
//! agencies publish: ordinal HTML tables ([`html_table`]) and bare JSON
//! arrays ([`json_feed`]).
//!
//! This crate knows nothing about earthquakes. It returns raw cell text and
//! deserialized entries that the source crate turns into records.

pub mod html_table;
pub mod json_feed;

use std::path::Path;

/// Errors that can occur while fetching or parsing a bulletin page.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    /// An HTTP request failed or returned a non-success status.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body could not be decoded as the expected JSON shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Parsing the response body failed.
    #[error("Parse error: {0}")]
    Parse(String),

    /// An I/O operation failed (e.g. reading a CA bundle).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Capability for retrieving the body of a bulletin page.
///
/// Every fetch is a full round trip; implementations must surface
/// non-success responses as errors rather than empty bodies.
pub trait PageFetcher: Send + Sync {
    /// Fetches the body at `url` as text.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError`] if the request fails or the server responds
    /// with a non-success status.
    fn fetch_text(
        &self,
        url: &str,
    ) -> impl std::future::Future<Output = Result<String, ScrapeError>> + Send;
}

/// [`PageFetcher`] backed by a [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Creates a fetcher that verifies TLS against the built-in root store.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError`] if the HTTP client cannot be built.
    pub fn new() -> Result<Self, ScrapeError> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self { client })
    }

    /// Creates a fetcher that only trusts the certificate authorities in the
    /// given PEM bundle. Built-in roots are disabled.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError`] if the bundle is unparseable, contains no
    /// certificates, or the client cannot be built.
    pub fn with_pinned_ca_pem(pem_bundle: &[u8]) -> Result<Self, ScrapeError> {
        let certificates = reqwest::Certificate::from_pem_bundle(pem_bundle)?;
        if certificates.is_empty() {
            return Err(ScrapeError::Parse(
                "CA bundle contains no certificates".to_owned(),
            ));
        }

        log::debug!("Pinning {} CA certificate(s)", certificates.len());

        let mut builder = reqwest::Client::builder().tls_built_in_root_certs(false);
        for certificate in certificates {
            builder = builder.add_root_certificate(certificate);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    /// Reads a PEM bundle from disk and builds a pinned fetcher from it.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError`] if the file cannot be read or the bundle is
    /// invalid.
    pub fn with_pinned_ca_file(path: &Path) -> Result<Self, ScrapeError> {
        let pem = std::fs::read(path)?;
        Self::with_pinned_ca_pem(&pem)
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String, ScrapeError> {
        log::debug!("GET {url}");
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }
}
