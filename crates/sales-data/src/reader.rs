//! CSV loading for the game sales analysis.
//!
//! Reads a header-led CSV of sales records into a [`RawTable`], checking
//! the header against the fixed schema before any row is read.

use std::io::Read;
use std::path::Path;

use sales_core::error::{Result, SalesError};
use sales_core::models::{Column, RawRecord, RawTable};
use tracing::{debug, warn};

// ── Public API ────────────────────────────────────────────────────────────────

/// Open `path` and load every record into a [`RawTable`].
///
/// Fails with [`SalesError::FileAccess`] when the file cannot be opened and
/// with a parse error when the header or a row is malformed.
pub fn load_raw_table(path: &Path) -> Result<RawTable> {
    let file = std::fs::File::open(path).map_err(|source| SalesError::FileAccess {
        path: path.to_path_buf(),
        source,
    })?;

    let table = read_raw_table(std::io::BufReader::new(file))?;
    debug!("Loaded {} records from {}", table.len(), path.display());
    Ok(table)
}

/// Read a CSV document from any reader into a [`RawTable`].
///
/// Header cells are matched to schema columns ignoring case and surrounding
/// whitespace. Unknown columns are skipped; a missing schema column fails
/// with [`SalesError::MissingColumns`].
pub fn read_raw_table<R: Read>(reader: R) -> Result<RawTable> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader.headers()?.iter().map(str::to_string).collect();
    let layout = resolve_layout(&headers)?;

    let mut records = Vec::new();
    for row in csv_reader.records() {
        let row = row?;
        let mut raw = RawRecord::default();
        for &(index, column) in &layout {
            raw.set(column, row.get(index));
        }
        records.push(raw);
    }

    Ok(RawTable {
        columns: headers,
        records,
    })
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Map each schema column to its position in `headers`.
fn resolve_layout(headers: &[String]) -> Result<Vec<(usize, Column)>> {
    let mut layout: Vec<(usize, Column)> = Vec::with_capacity(Column::ALL.len());

    for (index, header) in headers.iter().enumerate() {
        match Column::from_header(header) {
            Some(column) if layout.iter().any(|&(_, c)| c == column) => {
                warn!("Duplicate column {:?} ignored", header);
            }
            Some(column) => layout.push((index, column)),
            None => debug!("Skipping unknown column {:?}", header),
        }
    }

    let missing: Vec<String> = Column::ALL
        .into_iter()
        .filter(|c| !layout.iter().any(|&(_, found)| found == *c))
        .map(|c| c.name().to_string())
        .collect();

    if !missing.is_empty() {
        return Err(SalesError::MissingColumns(missing));
    }

    Ok(layout)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
