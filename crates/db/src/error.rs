//! Result and Error types for the nuclear mass database

use std::path::PathBuf;

use nmass_utils::f;

/// Type alias for `Result<T, db::Error>`
pub type Result<T> = core::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
/// The error type for `nmass-db`
pub enum Error {
    /// A query parameter is outside of its valid domain
    #[error("invalid {field} = {value}: {reason}")]
    Parameter {
        field: &'static str,
        value: String,
        reason: String,
    },

    /// No data for the requested nuclide
    #[error("nuclide Z={z}, N={n} not found{}", hint(.z, .suggestions))]
    NotFound {
        z: u16,
        n: u16,
        suggestions: Vec<u16>,
    },

    /// The database artifact exists but failed the sanity check
    #[error(
        "database {path:?} is corrupt: {reason}\nDelete the file and run: nmass init --rebuild"
    )]
    DataCorrupt { path: PathBuf, reason: String },

    /// The database artifact has not been built yet
    #[error("database {path:?} not found, build it with: nmass init")]
    DatabaseMissing { path: PathBuf },

    /// Failure reading or parsing a source table
    #[error(transparent)]
    Tables(#[from] nmass_tables::Error),

    /// Failure in an SQLite operation
    #[error("failed SQLite operation")]
    Sql(#[from] rusqlite::Error),

    /// Underlying file I/O error
    #[error("failure in file I/O")]
    Io(#[from] std::io::Error),

    /// Failure to (de)serialise JSON
    #[error("failed serde JSON operation")]
    Json(#[from] serde_json::Error),

    /// Failure writing CSV output
    #[error("failed CSV operation")]
    Csv(#[from] csv::Error),
}

impl Error {
    /// Shorthand for a parameter error
    pub(crate) fn parameter<V: ToString>(field: &'static str, value: V, reason: &str) -> Self {
        Self::Parameter {
            field,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Nearby neutron numbers for the not found message
fn hint(z: &u16, suggestions: &[u16]) -> String {
    if suggestions.is_empty() {
        return String::new();
    }

    let available = suggestions
        .iter()
        .map(|n| f!("N={n}"))
        .collect::<Vec<String>>()
        .join(", ");
    f!(", available for Z={z}: {available}")
}
