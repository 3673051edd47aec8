//! Export of a cleaned table back to CSV.

use std::io::Write;
use std::path::Path;

use sales_core::error::{Result, SalesError};
use sales_core::models::{Column, SalesRecord, SalesTable};
use tracing::info;

/// Write `table` as CSV with lower-case headers in schema order.
///
/// Null cells are written empty. Unknown years and critic scores stay `0`,
/// so loading and cleaning the output again yields the same table.
pub fn write_cleaned_csv<W: Write>(table: &SalesTable, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(Column::ALL.iter().map(|c| c.name()))?;

    for record in table {
        csv_writer.write_record(record_cells(record))?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Write the cleaned table to `path`, replacing any existing file.
pub fn export_cleaned_csv(table: &SalesTable, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path).map_err(|source| SalesError::FileAccess {
        path: path.to_path_buf(),
        source,
    })?;
    write_cleaned_csv(table, std::io::BufWriter::new(file))?;
    info!("Wrote {} cleaned records to {}", table.len(), path.display());
    Ok(())
}

fn record_cells(record: &SalesRecord) -> [String; 11] {
    [
        record.name.clone().unwrap_or_default(),
        record.platform.clone(),
        record.year_of_release.to_string(),
        record.genre.clone().unwrap_or_default(),
        record.na_sales.to_string(),
        record.eu_sales.to_string(),
        record.jp_sales.to_string(),
        record.other_sales.to_string(),
        record.critic_score.to_string(),
        record.user_score.map(|s| s.to_string()).unwrap_or_default(),
        record.rating.clone().unwrap_or_default(),
    ]
}
