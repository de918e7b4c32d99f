//! Writing query results out as CSV or JSON

// standard library
use std::io::Write;
use std::path::Path;

// external crates
use log::info;
use serde::{Deserialize, Serialize};

// internal modules
use crate::error::Result;

/// Output format for exported rows
#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Comma separated with a header of field names
    #[default]
    Csv,
    /// Pretty printed array of objects
    Json,
}

impl ExportFormat {
    /// Conventional file extension
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// Write serialisable rows to any writer
///
/// Rows must be flat for CSV, nested structures are only supported by JSON.
/// `None` becomes an empty CSV field or a JSON `null`.
///
/// ```rust
/// # use nmass_db::{write_rows, ExportFormat, SeparationEnergies};
/// let rows = [SeparationEnergies {
///     s_n: Some(7.646),
///     ..Default::default()
/// }];
///
/// let mut out = Vec::new();
/// write_rows(&rows, ExportFormat::Csv, &mut out)?;
/// assert_eq!(String::from_utf8(out).unwrap(), "s_n,s_p,s_2n,s_2p,s_alpha\n7.646,,,,\n");
/// # Ok::<(), nmass_db::Error>(())
/// ```
pub fn write_rows<T: Serialize, W: Write>(
    rows: &[T],
    format: ExportFormat,
    mut writer: W,
) -> Result<()> {
    match format {
        ExportFormat::Csv => {
            let mut csv = csv::Writer::from_writer(writer);
            for row in rows {
                csv.serialize(row)?;
            }
            csv.flush()?;
        }
        ExportFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, rows)?;
            writeln!(writer)?;
            writer.flush()?;
        }
    }
    Ok(())
}

/// Write serialisable rows to a file, replacing anything already there
pub fn export_rows<T: Serialize, P: AsRef<Path>>(
    rows: &[T],
    format: ExportFormat,
    path: P,
) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let file = std::io::BufWriter::new(std::fs::File::create(path)?);
    write_rows(rows, format, file)?;
    info!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}
