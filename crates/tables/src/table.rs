//! Normalized CSV tables shared between the parsers and the database

// standard library
use std::path::Path;

// external crates
use log::{info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;

// internal modules
use crate::common::Nuclide;
use crate::error::{Error, Result};

/// A row of one of the normalized tables
///
/// `COLUMNS` is the header written to, and required from, the CSV file. It
/// must follow the field order of the row so that the header and the values
/// line up.
pub trait TableRow: Serialize + DeserializeOwned {
    /// Header of the normalized table
    const COLUMNS: &'static [&'static str];

    /// Identity of the nuclide this row describes
    fn nuclide(&self) -> Nuclide;

    /// Mass number as recorded in the source
    fn mass_number(&self) -> u16;

    /// Check that A = Z + N
    fn is_consistent(&self) -> bool {
        let nuclide = self.nuclide();
        nuclide.z as u32 + nuclide.n as u32 == self.mass_number() as u32
    }
}

/// Write rows to a normalized CSV table
///
/// The header is always written, even for an empty table.
pub fn write_csv<R: TableRow, P: AsRef<Path>>(path: P, rows: &[R]) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    writer.write_record(R::COLUMNS)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    info!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

/// Read rows from a normalized CSV table
///
/// The header must provide every column in `COLUMNS`, otherwise this is a
/// [Error::SchemaMismatch]. Rows failing A = Z + N are dropped with a
/// warning.
pub fn read_csv<R: TableRow, P: AsRef<Path>>(path: P) -> Result<Vec<R>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::MissingSource {
            path: path.to_path_buf(),
            remediation: "Regenerate the normalized tables with `nmass init --rebuild`".into(),
        });
    }

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;

    let headers = reader.headers()?.clone();
    let missing = R::COLUMNS
        .iter()
        .filter(|column| !headers.iter().any(|h| h == **column))
        .map(|column| column.to_string())
        .collect::<Vec<String>>();

    if !missing.is_empty() {
        return Err(Error::SchemaMismatch {
            path: path.to_path_buf(),
            missing,
        });
    }

    let mut rows = Vec::new();
    let mut rejected = 0;
    for result in reader.deserialize() {
        let row: R = result?;
        if row.is_consistent() {
            rows.push(row);
        } else {
            rejected += 1;
        }
    }

    if rejected > 0 {
        warn!(
            "Discarded {rejected} rows failing A = Z + N from {}",
            path.display()
        );
    }

    Ok(rows)
}
