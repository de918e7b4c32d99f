//! Result and Error types for the source tables module

use std::path::PathBuf;

/// Type alias for `Result<T, tables::Error>`
pub type Result<T> = core::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
/// The error type for `nmass-tables`
pub enum Error {
    /// Underlying file I/O error
    #[error("failure in file I/O")]
    Io(#[from] std::io::Error),

    /// Failure to read or write a normalized table
    #[error("failed CSV operation")]
    Csv(#[from] csv::Error),

    /// A raw source file is not where it was expected
    #[error("source file {path:?} not found\n{remediation}")]
    MissingSource {
        path: PathBuf,
        remediation: String,
    },

    /// Normalized table header does not provide the expected columns
    #[error("table {path:?} is missing columns {missing:?}")]
    SchemaMismatch {
        path: PathBuf,
        missing: Vec<String>,
    },

    /// Generic error type for nom parser results
    #[error("parser failed: {0}")]
    ParseError(String),

    /// Every mirror for a remote source failed
    #[error("could not download {name} from any mirror, last error: {last_error}\n{remediation}")]
    DownloadFailed {
        name: String,
        last_error: String,
        remediation: String,
    },

    /// Text that could not be interpreted as a nuclide
    #[error("unable to interpret \"{0}\" as a nuclide")]
    InvalidNuclide(String),
}
