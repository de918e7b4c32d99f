//! FRDM2012 theoretical masses and deformations
//!
//! Reads the text layer of the table published by Möller et al., Atomic Data
//! and Nuclear Data Tables 109-110, 1-204 (2016). The PDF itself is not
//! decoded here, extract it first with something like `pdftotext -layout`.
//!
//! The text is organised into `Z=<z>` sections, each followed by one row
//! per isotope:
//!
//! ```text
//! Z=26(Fe)
//! 30 56 0.154 0.000 0.027 −0.007 0.162 0.000 −0.013 0.007 −1.500 −1.620 492.043 −60.390 −60.610 0.000 −1.570 −60.310
//! ```

// standard library
use std::path::{Path, PathBuf};

// external crates
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

// nmass modules
use nmass_utils::{f, StringExt};

// internal modules
use crate::common::Nuclide;
use crate::error::Result;
use crate::parsers::{section_header, table_integer, table_value};
use crate::source::{collect_rows, read_source, Line, ParseOptions, ParseStats, SourceParser};
use crate::table::TableRow;

/// Values on a complete row, including the experimental mass
const FULL_ROW: usize = 18;

/// Values on a row where the experimental mass cells are blank
const THEORY_ROW: usize = 16;

/// A single nuclide from the FRDM2012 table
///
/// All energies are in MeV. The experimental mass and its uncertainty are
/// only present where the nuclide was measured when the model was fitted.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
pub struct FrdmRow {
    /// Proton number
    pub z: u16,
    /// Neutron number
    pub n: u16,
    /// Mass number
    pub a: u16,

    /// Quadrupole deformation (Nilsson)
    pub eps2: f64,
    /// Octupole deformation (Nilsson)
    pub eps3: f64,
    /// Hexadecapole deformation (Nilsson)
    pub eps4: f64,
    /// Hexacontatetrapole deformation (Nilsson)
    pub eps6: f64,

    /// Quadrupole deformation
    pub beta2: f64,
    /// Octupole deformation
    pub beta3: f64,
    /// Hexadecapole deformation
    pub beta4: f64,
    /// Hexacontatetrapole deformation
    pub beta6: f64,

    /// Shell plus pairing correction (MeV)
    pub shell_pairing_mev: f64,
    /// Microscopic correction (MeV)
    pub microscopic_mev: f64,
    /// Total binding energy (MeV)
    pub binding_mev: f64,
    /// Calculated mass excess (MeV)
    pub mass_excess_mev: f64,

    /// Experimental mass excess used in the fit (MeV)
    #[serde(deserialize_with = "csv::invalid_option")]
    pub mass_exp_mev: Option<f64>,
    /// Uncertainty in experimental mass excess (MeV)
    #[serde(deserialize_with = "csv::invalid_option")]
    pub mass_exp_unc_mev: Option<f64>,

    /// Microscopic correction in the FRLDM variant (MeV)
    pub microscopic_fl_mev: f64,
    /// Calculated mass excess in the FRLDM variant (MeV)
    pub mass_excess_fl_mev: f64,
}

impl TableRow for FrdmRow {
    const COLUMNS: &'static [&'static str] = &[
        "z",
        "n",
        "a",
        "eps2",
        "eps3",
        "eps4",
        "eps6",
        "beta2",
        "beta3",
        "beta4",
        "beta6",
        "shell_pairing_mev",
        "microscopic_mev",
        "binding_mev",
        "mass_excess_mev",
        "mass_exp_mev",
        "mass_exp_unc_mev",
        "microscopic_fl_mev",
        "mass_excess_fl_mev",
    ];

    fn nuclide(&self) -> Nuclide {
        Nuclide::new(self.z, self.n)
    }

    fn mass_number(&self) -> u16 {
        self.a
    }
}

impl FrdmRow {
    /// Check if the model value is beyond measured data
    pub fn is_extrapolated(&self) -> bool {
        self.mass_exp_mev.is_none()
    }
}

/// Parser for the FRDM2012 text table
///
/// ```rust, no_run
/// # use nmass_tables::{FrdmParser, SourceParser};
/// let parser = FrdmParser::new("data/frdm2012.txt");
/// let deformed = parser
///     .parse()
///     .unwrap()
///     .iter()
///     .filter(|row| row.beta2.abs() > 0.3)
///     .count();
/// ```
#[derive(Debug)]
pub struct FrdmParser {
    path: PathBuf,
    options: ParseOptions,
    parsed: OnceCell<(Vec<FrdmRow>, ParseStats)>,
}

impl FrdmParser {
    /// Parser for the text layer at `path` with default options
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

    fn load(&self) -> Result<(Vec<FrdmRow>, ParseStats)> {
        let remediation = f!(
            "Extract the text layer of the FRDM2012 table (ADNDT 109-110, 2016), \
             e.g. `pdftotext -layout frdm2012.pdf {}`",
            self.path.display()
        );
        let content = read_source(&self.path, &remediation)?;

        // rows only make sense once a Z section has been opened
        let mut section: Option<u16> = None;
        let by_section = |line: &str| {
            if let Ok((_, z)) = section_header(line) {
                section = Some(z);
                return Line::Ignored;
            }
            match section {
                Some(z) => classify(z, line),
                None => Line::Ignored,
            }
        };

        Ok(collect_rows(
            self.name(),
            &content,
            0,
            &self.options,
            by_section,
            |row: &FrdmRow| (row.z, row.n),
        ))
    }
}

impl SourceParser for FrdmParser {
    type Row = FrdmRow;

    fn name(&self) -> &'static str {
        "FRDM2012"
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn parse(&self) -> Result<&[FrdmRow]> {
        let (rows, _) = self.parsed.get_or_try_init(|| self.load())?;
        Ok(rows)
    }

    fn stats(&self) -> Option<&ParseStats> {
        self.parsed.get().map(|(_, stats)| stats)
    }
}

/// Classify a line within the section for proton number `z`
fn classify(z: u16, line: &str) -> Line<FrdmRow> {
    let line = line.ascii_minus();
    let tokens = line.split_whitespace().collect::<Vec<&str>>();

    // data rows open with N and A, anything else is labels or page furniture
    let (n, a) = match tokens.as_slice() {
        [n, a, ..] => match (table_integer(n), table_integer(a)) {
            (Some(n), Some(a)) => (n, a),
            _ => return Line::Ignored,
        },
        _ => return Line::Ignored,
    };

    let values = match tokens[2..]
        .iter()
        .map(|t| table_value(t).map(|(v, _)| v))
        .collect::<Option<Vec<f64>>>()
    {
        Some(values) => values,
        None => return Line::Malformed,
    };

    let (experimental, rest) = match tokens.len() {
        FULL_ROW => ((Some(values[12]), Some(values[13])), &values[14..]),
        THEORY_ROW => ((None, None), &values[12..]),
        _ => return Line::Malformed,
    };

    if z as u32 + n as u32 != a as u32 {
        return Line::Rejected;
    }

    Line::Row(FrdmRow {
        z,
        n,
        a,
        eps2: values[0],
        eps3: values[1],
        eps4: values[2],
        eps6: values[3],
        beta2: values[4],
        beta3: values[5],
        beta4: values[6],
        beta6: values[7],
        shell_pairing_mev: values[8],
        microscopic_mev: values[9],
        binding_mev: values[10],
        mass_excess_mev: values[11],
        mass_exp_mev: experimental.0,
        mass_exp_unc_mev: experimental.1,
        microscopic_fl_mev: rest[0],
        mass_excess_fl_mev: rest[1],
    })
}
