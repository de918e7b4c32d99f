//! AME2020 atomic mass evaluation
//!
//! Reads the fixed-width `mass_1.mas20.txt` table. See Wang et al., Chinese
//! Physics C 45, 030003 (2021) for the format description.

// standard library
use std::path::{Path, PathBuf};

// external crates
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

// internal modules
use crate::common::Nuclide;
use crate::error::Result;
use crate::parsers::{column, table_integer, table_value};
use crate::source::{
    amdc_remediation, collect_rows, read_source, Line, ParseOptions, ParseStats, SourceParser,
};
use crate::table::TableRow;

/// Shortest line that still reaches the mass excess column
const MIN_LINE_LENGTH: usize = 28;

/// A single nuclide from the AME2020 mass table
///
/// All energies are in keV and atomic masses in micro-u. Values that the
/// evaluation marks as not calculable (`*`) are `None`.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
pub struct AmeRow {
    /// Proton number
    pub z: u16,
    /// Neutron number
    pub n: u16,
    /// Mass number
    pub a: u16,
    /// Element symbol
    pub element: String,
    /// Origin of the value, e.g. `-n`, `x`
    pub origin: String,

    /// Mass excess (keV)
    #[serde(deserialize_with = "csv::invalid_option")]
    pub mass_excess_kev: Option<f64>,
    /// Uncertainty in mass excess (keV)
    #[serde(deserialize_with = "csv::invalid_option")]
    pub mass_excess_unc_kev: Option<f64>,
    /// Mass excess is an estimate from systematics rather than measured
    pub mass_excess_estimated: bool,

    /// Binding energy per nucleon (keV)
    #[serde(deserialize_with = "csv::invalid_option")]
    pub binding_per_a_kev: Option<f64>,
    /// Uncertainty in binding energy per nucleon (keV)
    #[serde(deserialize_with = "csv::invalid_option")]
    pub binding_per_a_unc_kev: Option<f64>,
    /// Binding energy per nucleon is an estimate
    pub binding_per_a_estimated: bool,

    /// Beta decay type, typically `B-`
    pub beta_decay_type: String,
    /// Beta decay energy (keV)
    #[serde(deserialize_with = "csv::invalid_option")]
    pub beta_energy_kev: Option<f64>,
    /// Uncertainty in beta decay energy (keV)
    #[serde(deserialize_with = "csv::invalid_option")]
    pub beta_energy_unc_kev: Option<f64>,
    /// Beta decay energy is an estimate
    pub beta_energy_estimated: bool,

    /// Atomic mass (micro-u)
    #[serde(deserialize_with = "csv::invalid_option")]
    pub atomic_mass_micro_u: Option<f64>,
    /// Uncertainty in atomic mass (micro-u)
    #[serde(deserialize_with = "csv::invalid_option")]
    pub atomic_mass_unc_micro_u: Option<f64>,
    /// Atomic mass is an estimate
    pub atomic_mass_estimated: bool,
}

impl TableRow for AmeRow {
    const COLUMNS: &'static [&'static str] = &[
        "z",
        "n",
        "a",
        "element",
        "origin",
        "mass_excess_kev",
        "mass_excess_unc_kev",
        "mass_excess_estimated",
        "binding_per_a_kev",
        "binding_per_a_unc_kev",
        "binding_per_a_estimated",
        "beta_decay_type",
        "beta_energy_kev",
        "beta_energy_unc_kev",
        "beta_energy_estimated",
        "atomic_mass_micro_u",
        "atomic_mass_unc_micro_u",
        "atomic_mass_estimated",
    ];

    fn nuclide(&self) -> Nuclide {
        Nuclide::new(self.z, self.n)
    }

    fn mass_number(&self) -> u16 {
        self.a
    }
}

/// Parser for the AME2020 mass table
///
/// ```rust, no_run
/// # use nmass_tables::{AmeParser, SourceParser};
/// let parser = AmeParser::new("data/mass_1.mas20.txt");
/// for row in parser.parse().unwrap() {
///     println!("{} {} {:?}", row.z, row.n, row.mass_excess_kev);
/// }
/// ```
#[derive(Debug)]
pub struct AmeParser {
    path: PathBuf,
    options: ParseOptions,
    parsed: OnceCell<(Vec<AmeRow>, ParseStats)>,
}

impl AmeParser {
    /// Parser for the file at `path` with default options
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            options: ParseOptions::default(),
            parsed: OnceCell::new(),
        }
    }

    /// Replace the parse options
    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    fn load(&self) -> Result<(Vec<AmeRow>, ParseStats)> {
        let content = read_source(&self.path, &amdc_remediation(&self.path))?;
        Ok(collect_rows(
            self.name(),
            &content,
            self.options.header_lines,
            &self.options,
            classify,
            |row: &AmeRow| (row.z, row.n),
        ))
    }
}

impl SourceParser for AmeParser {
    type Row = AmeRow;

    fn name(&self) -> &'static str {
        "AME2020"
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn parse(&self) -> Result<&[AmeRow]> {
        let (rows, _) = self.parsed.get_or_try_init(|| self.load())?;
        Ok(rows)
    }

    fn stats(&self) -> Option<&ParseStats> {
        self.parsed.get().map(|(_, stats)| stats)
    }
}

fn classify(line: &str) -> Line<AmeRow> {
    if line.trim_end().len() < MIN_LINE_LENGTH {
        return Line::Short;
    }

    let identity = (
        table_integer(column(line, 4, 9)),
        table_integer(column(line, 9, 14)),
        table_integer(column(line, 14, 19)),
    );
    let (n, z, a) = match identity {
        (Some(n), Some(z), Some(a)) => (n, z, a),
        _ => return Line::Malformed,
    };

    if z as u32 + n as u32 != a as u32 {
        return Line::Rejected;
    }

    let value = |start, end| table_value(column(line, start, end)).map(|(v, _)| v);
    let estimated = |field: Option<(f64, bool)>| field.is_some_and(|(_, estimated)| estimated);
    let mass_excess = table_value(column(line, 28, 42));
    let binding_per_a = table_value(column(line, 54, 67));
    let beta_energy = table_value(column(line, 81, 94));

    // atomic mass is split into an integer part and micro-u
    let atomic_micro = table_value(column(line, 110, 123));
    let atomic_mass = match (value(106, 109), atomic_micro) {
        (Some(int), Some((micro, _))) => Some(int * 1e6 + micro),
        _ => None,
    };

    Line::Row(AmeRow {
        z,
        n,
        a,
        element: column(line, 20, 23).trim().to_string(),
        origin: column(line, 23, 27).trim().to_string(),
        mass_excess_kev: mass_excess.map(|(v, _)| v),
        mass_excess_unc_kev: value(42, 54),
        mass_excess_estimated: estimated(mass_excess),
        binding_per_a_kev: binding_per_a.map(|(v, _)| v),
        binding_per_a_unc_kev: value(68, 78),
        binding_per_a_estimated: estimated(binding_per_a),
        beta_decay_type: column(line, 79, 81).trim().to_string(),
        beta_energy_kev: beta_energy.map(|(v, _)| v),
        beta_energy_unc_kev: value(94, 105),
        beta_energy_estimated: estimated(beta_energy),
        atomic_mass_micro_u: atomic_mass,
        atomic_mass_unc_micro_u: value(123, 135),
        atomic_mass_estimated: atomic_mass.is_some() && estimated(atomic_micro),
    })
}
