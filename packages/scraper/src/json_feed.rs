//! Bare-array JSON feed parsing.
//!
//! The JMA feed is a single JSON array of event objects with no pagination
//! envelope, so the whole body is deserialized in one pass.

use serde::de::DeserializeOwned;

use crate::ScrapeError;

/// Deserializes a JSON body whose top level is an array of `T`.
///
/// # Errors
///
/// Returns [`ScrapeError::Json`] if the body is not an array of `T`.
pub fn parse_entries<T: DeserializeOwned>(body: &str) -> Result<Vec<T>, ScrapeError> {
    let entries: Vec<T> = serde_json::from_str(body)?;
    log::debug!("Decoded {} feed entries", entries.len());
    Ok(entries)
}
