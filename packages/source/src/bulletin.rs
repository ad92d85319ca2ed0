//! Shared extraction pipeline.
//!
//! Each agency implements [`BulletinSource`]: how to split a fetched body
//! into raw entries, how to read an entry's observed timestamp, and how to
//! build the full record. [`run_source`] drives any implementation through
//! the same fetch → filter → build sequence.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset};
use quake_bulletin_quake_models::EarthquakeRecord;
use quake_bulletin_scraper::PageFetcher;

use crate::SourceError;
use crate::cutoff::CutoffFilter;
use crate::progress::ProgressCallback;

/// Per-agency capability set used by [`run_source`].
pub trait BulletinSource {
    /// One raw, unparsed entry (a table row, a JSON object).
    type Entry;

    /// Label for log messages.
    fn label(&self) -> &str;

    /// Splits a fetched body into raw entries, in publish order.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the body does not have the expected shape.
    fn parse_entries(&self, body: &str) -> Result<Vec<Self::Entry>, SourceError>;

    /// Reads the entry's observed timestamp. `Ok(None)` means the entry is
    /// not an event at all (e.g. a header row) and is skipped silently.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the entry looks like an event but its date
    /// cannot be normalized.
    fn observed_at(
        &self,
        entry: &Self::Entry,
    ) -> Result<Option<DateTime<FixedOffset>>, SourceError>;

    /// Builds the full record for an entry that passed the cutoff.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if any field has an unexpected format.
    fn build_record(
        &self,
        entry: &Self::Entry,
        observed_at: DateTime<FixedOffset>,
    ) -> Result<EarthquakeRecord, SourceError>;

    /// Whether `candidate` should be kept given the last accepted record.
    /// Defaults to always keeping it.
    fn accepts_after(
        &self,
        previous: Option<&EarthquakeRecord>,
        candidate: &EarthquakeRecord,
    ) -> bool {
        let _ = (previous, candidate);
        true
    }
}

/// Fetches `url` once and turns its entries into records.
///
/// # Errors
///
/// Returns [`SourceError`] if the fetch fails or any entry is malformed.
pub async fn run_source<S, F>(
    source: &S,
    fetcher: &F,
    url: &str,
    cutoff: &CutoffFilter,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<Vec<EarthquakeRecord>, SourceError>
where
    S: BulletinSource,
    F: PageFetcher,
{
    log::info!("[{}] Fetching {url}", source.label());
    let body = fetcher.fetch_text(url).await?;
    let entries = source.parse_entries(&body)?;
    build_records(source, &entries, cutoff, progress)
}

/// Turns already-parsed entries into records, honoring the cutoff and the
/// source's acceptance rule.
///
/// # Errors
///
/// Returns the first [`SourceError`] raised by the source.
pub fn build_records<S: BulletinSource>(
    source: &S,
    entries: &[S::Entry],
    cutoff: &CutoffFilter,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<Vec<EarthquakeRecord>, SourceError> {
    progress.set_total(entries.len() as u64);
    progress.set_message(format!("[{}] Building records", source.label()));

    let mut records: Vec<EarthquakeRecord> = Vec::new();
    let mut skipped = 0_usize;
    let mut before_cutoff = 0_usize;

    for entry in entries {
        progress.inc(1);

        let Some(observed_at) = source.observed_at(entry)? else {
            skipped += 1;
            continue;
        };

        if cutoff.is_before_cutoff(&observed_at) {
            before_cutoff += 1;
            continue;
        }

        let record = source.build_record(entry, observed_at)?;

        if !source.accepts_after(records.last(), &record) {
            log::debug!(
                "[{}] Dropping duplicate entry observed at {}",
                source.label(),
                record.observed_at
            );
            continue;
        }

        records.push(record);
    }

    log::info!(
        "[{}] {} records ({skipped} non-entry rows, {before_cutoff} before cutoff)",
        source.label(),
        records.len()
    );
    progress.finish(format!("[{}] {} records", source.label(), records.len()));

    Ok(records)
}
