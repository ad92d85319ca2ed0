//! Ordinal HTML table extraction.
//!
//! Locates the n-th `<table>` element in document order (nested tables
//! included, matching how the agency pages are laid out) and returns every
//! descendant `<tr>` as a [`TableRow`] of raw cell text plus anchor targets.
//! No header detection happens here; callers decide which rows are entries.

use scraper::{ElementRef, Html, Selector};

/// Which table on the page holds the entries, and how many leading rows to
/// discard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableLocator {
    /// Zero-based ordinal of the `<table>` element in document order.
    pub table_index: usize,
    /// Number of leading `<tr>` rows to drop (e.g. a header row).
    pub skip_rows: usize,
}

/// One `<tr>` from a located table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableRow {
    /// Text content of each `<td>`/`<th>` cell, untrimmed.
    pub cells: Vec<String>,
    /// `href` of every anchor in the row, in document order.
    pub links: Vec<String>,
}

impl TableRow {
    /// Returns the raw text of cell `index`, if present.
    #[must_use]
    pub fn cell(&self, index: usize) -> Option<&str> {
        self.cells.get(index).map(String::as_str)
    }

    /// Returns the first anchor target in the row.
    #[must_use]
    pub fn first_link(&self) -> Option<&str> {
        self.links.first().map(String::as_str)
    }
}

/// Extracts the rows of the table at `locator.table_index`.
///
/// Returns an empty list when the page has fewer tables than the ordinal
/// asks for, so a layout mismatch reads the same as an empty table.
#[must_use]
pub fn extract_rows(body: &str, locator: TableLocator) -> Vec<TableRow> {
    let document = Html::parse_document(body);
    let table_sel = selector("table");
    let row_sel = selector("tr");

    let Some(table) = document.select(&table_sel).nth(locator.table_index) else {
        log::debug!(
            "Page has no table at index {} (rows treated as empty)",
            locator.table_index
        );
        return Vec::new();
    };

    table
        .select(&row_sel)
        .skip(locator.skip_rows)
        .map(read_row)
        .collect()
}

fn read_row(row: ElementRef<'_>) -> TableRow {
    let cell_sel = selector("td, th");
    let link_sel = selector("a[href]");

    let cells = row
        .select(&cell_sel)
        .map(|cell| cell.text().collect::<String>())
        .collect();
    let links = row
        .select(&link_sel)
        .filter_map(|a| a.value().attr("href"))
        .map(str::to_owned)
        .collect();

    TableRow { cells, links }
}

fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|_| unreachable!())
}
