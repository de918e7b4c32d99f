//! Shared machinery for the raw source parsers

// standard library
use std::collections::HashSet;
use std::fmt::Debug;
use std::hash::Hash;
use std::path::Path;

// external crates
use log::{debug, info, warn};
use serde::Serialize;

// nmass modules
use nmass_utils::f;

// internal modules
use crate::error::{Error, Result};
use crate::table::TableRow;

/// Options controlling how raw source files are read
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParseOptions {
    /// Number of header lines before the AME data section
    pub header_lines: usize,
    /// Fraction of malformed candidate rows above which a warning is logged
    pub skip_warn_fraction: f64,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            header_lines: 36,
            skip_warn_fraction: 0.10,
        }
    }
}

/// Line accounting for a single parse of a raw source file
#[derive(Serialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct ParseStats {
    /// Total number of lines in the file
    pub lines: usize,
    /// Rows accepted into the table
    pub parsed: usize,
    /// Data lines too short to hold a record
    pub skipped_short: usize,
    /// Data lines that could not be interpreted
    pub skipped_malformed: usize,
    /// Rows discarded for failing A = Z + N
    pub rejected: usize,
    /// Repeated identities, first occurrence kept
    pub duplicates: usize,
}

impl ParseStats {
    /// Every line that looked like it should have been a record
    pub fn candidates(&self) -> usize {
        self.parsed + self.skipped_malformed + self.rejected + self.duplicates
    }

    /// Fraction of candidate rows that were malformed
    pub fn malformed_fraction(&self) -> f64 {
        match self.candidates() {
            0 => 0.0,
            n => self.skipped_malformed as f64 / n as f64,
        }
    }

    fn report(&self, source: &str, options: &ParseOptions) {
        info!("{source}: {self}");

        if self.rejected > 0 {
            warn!("{source}: discarded {} rows failing A = Z + N", self.rejected);
        }

        let fraction = self.malformed_fraction();
        if fraction > options.skip_warn_fraction {
            warn!(
                "{source}: {:.1}% of rows were malformed, check the file format",
                fraction * 100.0
            );
        }
    }
}

impl std::fmt::Display for ParseStats {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{} rows from {} lines ({} short, {} malformed, {} rejected, {} duplicates)",
            self.parsed,
            self.lines,
            self.skipped_short,
            self.skipped_malformed,
            self.rejected,
            self.duplicates
        )
    }
}

/// Common interface to the raw source parsers
///
/// Parsing is lazy and memoized, so repeated calls to
/// [parse()](SourceParser::parse) return the same rows without reading the
/// file again.
pub trait SourceParser {
    /// Normalized row type produced by this parser
    type Row: TableRow;

    /// Short name of the source, e.g. `AME2020`
    fn name(&self) -> &'static str;

    /// Path to the raw source file
    fn path(&self) -> &Path;

    /// Rows in file order
    fn parse(&self) -> Result<&[Self::Row]>;

    /// Statistics from the parse, if it has happened yet
    fn stats(&self) -> Option<&ParseStats>;
}

/// Classification of a single line of a raw source file
pub(crate) enum Line<R> {
    /// A valid record
    Row(R),
    /// Not part of the data at all (headers, labels, page furniture)
    Ignored,
    /// Data line too short to hold a record
    Short,
    /// Data line that could not be interpreted
    Malformed,
    /// Record that failed A = Z + N
    Rejected,
}

/// Read a raw source file, with remediation advice if it is missing
pub(crate) fn read_source(path: &Path, remediation: &str) -> Result<String> {
    if !path.exists() {
        return Err(Error::MissingSource {
            path: path.to_path_buf(),
            remediation: remediation.to_string(),
        });
    }

    let bytes = std::fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Run a line classifier over file content, collecting rows and statistics
///
/// The first `skip` lines are never classified. Duplicate keys keep the
/// first row seen.
pub(crate) fn collect_rows<R, K, C, I>(
    source: &str,
    content: &str,
    skip: usize,
    options: &ParseOptions,
    mut classify: C,
    identity: I,
) -> (Vec<R>, ParseStats)
where
    C: FnMut(&str) -> Line<R>,
    I: Fn(&R) -> K,
    K: Hash + Eq + Debug,
{
    let mut stats = ParseStats::default();
    let mut seen = HashSet::new();
    let mut rows = Vec::new();

    for (number, line) in content.lines().enumerate() {
        stats.lines += 1;
        if number < skip {
            continue;
        }

        match classify(line) {
            Line::Row(row) => {
                let key = identity(&row);
                if seen.contains(&key) {
                    warn!("{source}: duplicate entry {key:?} on line {}", number + 1);
                    stats.duplicates += 1;
                } else {
                    seen.insert(key);
                    rows.push(row);
                    stats.parsed += 1;
                }
            }
            Line::Ignored => {}
            Line::Short => stats.skipped_short += 1,
            Line::Malformed => {
                debug!("{source}: malformed line {}: {line:?}", number + 1);
                stats.skipped_malformed += 1;
            }
            Line::Rejected => {
                debug!("{source}: A != Z + N on line {}", number + 1);
                stats.rejected += 1;
            }
        }
    }

    stats.report(source, options);
    (rows, stats)
}

/// Standard advice for the tables published by the Atomic Mass Data Center
pub(crate) fn amdc_remediation(path: &Path) -> String {
    f!(
        "Run `nmass fetch`, or download manually from \
         https://www.anl.gov/phy/atomic-mass-data-resources and save to {}",
        path.display()
    )
}
