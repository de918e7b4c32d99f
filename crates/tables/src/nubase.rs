//! NUBASE2020 nuclear ground and isomeric state properties
//!
//! Reads the fixed-width `nubase_4.mas20.txt` table. See Kondev et al.,
//! Chinese Physics C 45, 030001 (2021) for the format description.

// standard library
use std::path::{Path, PathBuf};

// external crates
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

// nmass modules
use nmass_utils::f;

// internal modules
use crate::common::{IsomerState, Nuclide};
use crate::elements::element_symbol;
use crate::error::Result;
use crate::parsers::{column, half_life_value, table_integer, table_value};
use crate::source::{
    amdc_remediation, collect_rows, read_source, Line, ParseOptions, ParseStats, SourceParser,
};
use crate::table::TableRow;

/// Shortest line that still reaches the end of the mass excess uncertainty
const MIN_LINE_LENGTH: usize = 31;

/// Julian year in seconds, as used by NUBASE
const YEAR: f64 = 31_557_600.0;

/// A single ground or isomeric state from NUBASE2020
///
/// Energies are in keV. Only ground states (empty isomer tag) take part in
/// the fused view, isomers remain available through the decay table.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
pub struct NubaseRow {
    /// Proton number
    pub z: u16,
    /// Neutron number
    pub n: u16,
    /// Mass number
    pub a: u16,
    /// Element symbol
    pub symbol: String,
    /// Ground or isomeric state
    pub isomer: IsomerState,

    /// Mass excess (keV)
    #[serde(deserialize_with = "csv::invalid_option")]
    pub mass_excess_kev: Option<f64>,
    /// Uncertainty in mass excess (keV)
    #[serde(deserialize_with = "csv::invalid_option")]
    pub mass_excess_unc_kev: Option<f64>,
    /// Mass excess is an estimate from systematics rather than measured
    pub mass_excess_estimated: bool,

    /// Excitation energy of an isomer (keV)
    #[serde(deserialize_with = "csv::invalid_option")]
    pub excitation_kev: Option<f64>,
    /// Uncertainty in excitation energy (keV)
    #[serde(deserialize_with = "csv::invalid_option")]
    pub excitation_unc_kev: Option<f64>,
    /// Excitation energy is an estimate from systematics
    pub excitation_estimated: bool,

    /// Half-life as published, e.g. `4.468 Gy`
    pub half_life: String,
    /// Half-life in seconds, if finite and known
    #[serde(deserialize_with = "csv::invalid_option")]
    pub half_life_s: Option<f64>,
    /// Uncertainty in half-life as published
    pub half_life_unc: String,
    /// Half-life is an estimate from systematics
    pub half_life_estimated: bool,
    /// Stable against all decay modes
    pub is_stable: bool,

    /// Spin and parity, e.g. `1/2-`
    pub spin_parity: String,
    /// Year of discovery
    #[serde(deserialize_with = "csv::invalid_option")]
    pub discovery_year: Option<u16>,
    /// Decay modes and branching ratios, e.g. `A=100;SF=5.44e-5 17`
    pub decay_modes: String,
}

impl TableRow for NubaseRow {
    const COLUMNS: &'static [&'static str] = &[
        "z",
        "n",
        "a",
        "symbol",
        "isomer",
        "mass_excess_kev",
        "mass_excess_unc_kev",
        "mass_excess_estimated",
        "excitation_kev",
        "excitation_unc_kev",
        "excitation_estimated",
        "half_life",
        "half_life_s",
        "half_life_unc",
        "half_life_estimated",
        "is_stable",
        "spin_parity",
        "discovery_year",
        "decay_modes",
    ];

    fn nuclide(&self) -> Nuclide {
        Nuclide::new(self.z, self.n)
    }

    fn mass_number(&self) -> u16 {
        self.a
    }
}

/// Normalized half-life
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
pub struct HalfLife {
    /// Text as published
    pub text: String,
    /// Value in seconds, `None` for stable or unknown
    pub seconds: Option<f64>,
    /// Stable against all decay modes
    pub stable: bool,
    /// Value is an estimate from systematics
    pub estimated: bool,
}

/// Interpret a published half-life
///
/// Recognises `stbl` (stable), the particle-unbound markers (`p-unst`,
/// `n-unst`) and `<value> <unit>` with an optional limit prefix. Units run
/// from `ys` to `Yy` using the Julian year. Anything unrecognised keeps its
/// text with no value in seconds.
///
/// ```rust
/// # use nmass_tables::parse_half_life;
/// let uranium = parse_half_life("4.468 Gy");
/// let seconds = uranium.seconds.unwrap();
/// assert!((seconds - 1.41e17).abs() / 1.41e17 < 1e-3);
///
/// let iron = parse_half_life("stbl");
/// assert!(iron.stable);
/// assert_eq!(iron.seconds, None);
///
/// let unbound = parse_half_life("p-unst");
/// assert_eq!(unbound.text, "p-unst");
/// assert_eq!(unbound.seconds, None);
/// ```
pub fn parse_half_life(raw: &str) -> HalfLife {
    let text = raw.trim().to_string();
    let lowered = text.to_lowercase();

    if lowered.starts_with("stbl") || lowered == "stable" {
        return HalfLife {
            text,
            stable: true,
            ..Default::default()
        };
    }

    match half_life_value(&text) {
        Ok(("", (value, estimated, unit))) => HalfLife {
            seconds: unit_seconds(unit).map(|scale| value * scale),
            estimated: estimated || text.contains('#'),
            text,
            stable: false,
        },
        _ => HalfLife {
            estimated: text.contains('#'),
            text,
            ..Default::default()
        },
    }
}

/// Seconds per half-life unit
fn unit_seconds(unit: &str) -> Option<f64> {
    let scale = match unit {
        "ys" => 1e-24,
        "zs" => 1e-21,
        "as" => 1e-18,
        "fs" => 1e-15,
        "ps" => 1e-12,
        "ns" => 1e-9,
        "us" | "μs" | "µs" => 1e-6,
        "ms" => 1e-3,
        "s" => 1.0,
        "m" => 60.0,
        "h" => 3600.0,
        "d" => 86400.0,
        "y" => YEAR,
        "ky" => 1e3 * YEAR,
        "My" => 1e6 * YEAR,
        "Gy" => 1e9 * YEAR,
        "Ty" => 1e12 * YEAR,
        "Py" => 1e15 * YEAR,
        "Ey" => 1e18 * YEAR,
        "Zy" => 1e21 * YEAR,
        "Yy" => 1e24 * YEAR,
        _ => return None,
    };
    Some(scale)
}

/// Parser for the NUBASE2020 table
///
/// ```rust, no_run
/// # use nmass_tables::{NubaseParser, SourceParser};
/// let parser = NubaseParser::new("data/nubase_4.mas20.txt");
/// let isomers = parser
///     .parse()
///     .unwrap()
///     .iter()
///     .filter(|row| !row.isomer.is_ground())
///     .count();
/// ```
#[derive(Debug)]
pub struct NubaseParser {
    path: PathBuf,
    options: ParseOptions,
    parsed: OnceCell<(Vec<NubaseRow>, ParseStats)>,
}

impl NubaseParser {
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

    fn load(&self) -> Result<(Vec<NubaseRow>, ParseStats)> {
        let content = read_source(&self.path, &amdc_remediation(&self.path))?;
        Ok(collect_rows(
            self.name(),
            &content,
            0,
            &self.options,
            classify,
            |row: &NubaseRow| (row.z, row.n, row.isomer),
        ))
    }
}

impl SourceParser for NubaseParser {
    type Row = NubaseRow;

    fn name(&self) -> &'static str {
        "NUBASE2020"
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn parse(&self) -> Result<&[NubaseRow]> {
        let (rows, _) = self.parsed.get_or_try_init(|| self.load())?;
        Ok(rows)
    }

    fn stats(&self) -> Option<&ParseStats> {
        self.parsed.get().map(|(_, stats)| stats)
    }
}

fn classify(line: &str) -> Line<NubaseRow> {
    if line.starts_with('#') {
        return Line::Ignored;
    }
    if line.trim_end().len() < MIN_LINE_LENGTH {
        return Line::Short;
    }

    // ZZZi packs the proton number with the isomer code
    let (a, zzzi) = match (
        table_integer(column(line, 0, 3)),
        table_integer(column(line, 4, 8)),
    ) {
        (Some(a), Some(zzzi)) => (a, zzzi),
        _ => return Line::Malformed,
    };
    let z = zzzi / 10;
    let isomer = match IsomerState::from_code((zzzi % 10) as u8) {
        Some(isomer) => isomer,
        None => return Line::Malformed,
    };

    let nuclide = match Nuclide::from_za(z, a) {
        Some(nuclide) => nuclide,
        None => return Line::Rejected,
    };

    let symbol = column(line, 11, 16)
        .trim()
        .trim_start_matches(|c: char| c.is_ascii_digit())
        .to_string();

    let value = |start, end| table_value(column(line, start, end)).map(|(v, _)| v);
    let mass_excess = table_value(column(line, 18, 31));
    let excitation = table_value(column(line, 42, 54));

    let raw_half_life = f!(
        "{} {}",
        column(line, 69, 78).trim(),
        column(line, 78, 80).trim()
    );
    let half_life = parse_half_life(&raw_half_life);

    Line::Row(NubaseRow {
        z,
        n: nuclide.n,
        a,
        symbol: if symbol.is_empty() {
            element_symbol(z)
        } else {
            symbol
        },
        isomer,
        mass_excess_kev: mass_excess.map(|(v, _)| v),
        mass_excess_unc_kev: value(31, 42),
        mass_excess_estimated: mass_excess.is_some_and(|(_, estimated)| estimated),
        excitation_kev: excitation.map(|(v, _)| v),
        excitation_unc_kev: value(54, 65),
        excitation_estimated: excitation.is_some_and(|(_, estimated)| estimated),
        half_life: half_life.text,
        half_life_s: half_life.seconds,
        half_life_unc: column(line, 81, 88).trim().to_string(),
        half_life_estimated: half_life.estimated,
        is_stable: half_life.stable,
        spin_parity: column(line, 88, 102).trim().to_string(),
        discovery_year: table_integer(column(line, 114, 118)),
        decay_modes: column(line, 119, line.len()).trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const URANIUM: &str = "238 0920   238U         47308.1        1.5                           4.468    Gy        0+            20          1896 A=100;SF=5.44e-5 17";
    const TIN_ISOMER: &str = "130 0501   130Snm      -78185.5        1.9     1946.88               1.7      m         (7-)          20          1973 B-=100";

    #[test]
    fn ground_state_row() {
        let Line::Row(row) = classify(URANIUM) else {
            panic!("expected a row")
        };
        assert_eq!((row.z, row.n, row.a), (92, 146, 238));
        assert_eq!(row.symbol, "U");
        assert_eq!(row.isomer, IsomerState::Ground);
        assert_eq!(row.mass_excess_kev, Some(47308.1));
        assert_eq!(row.half_life, "4.468 Gy");
        assert!(!row.is_stable);
        assert_eq!(row.spin_parity, "0+");
        assert_eq!(row.discovery_year, Some(1896));
        assert_eq!(row.decay_modes, "A=100;SF=5.44e-5 17");
        let seconds = row.half_life_s.unwrap();
        assert!((seconds / 1.41e17 - 1.0).abs() < 0.001);
    }

    #[test]
    fn isomer_row() {
        let Line::Row(row) = classify(TIN_ISOMER) else {
            panic!("expected a row")
        };
        assert_eq!((row.z, row.n), (50, 80));
        assert_eq!(row.symbol, "Sn");
        assert_eq!(row.isomer, IsomerState::Excited(1));
        assert_eq!(row.excitation_kev, Some(1946.88));
        assert!(!row.excitation_estimated);
        assert!((row.half_life_s.unwrap() - 102.0).abs() < 1e-9);
    }

    #[test]
    fn estimated_excitation() {
        let line = TIN_ISOMER.replacen("1946.88 ", "1950#   ", 1);
        let Line::Row(row) = classify(&line) else {
            panic!("expected a row")
        };
        assert_eq!(row.excitation_kev, Some(1950.0));
        assert!(row.excitation_estimated);
        assert!(!row.mass_excess_estimated);
    }

    #[test]
    fn skipped_lines() {
        assert!(matches!(classify("# NUBASE2020 comment"), Line::Ignored));
        assert!(matches!(classify(""), Line::Short));
        let garbled = URANIUM.replacen("238 ", "xyz ", 1);
        assert!(matches!(classify(&garbled), Line::Malformed));
        let impossible = URANIUM.replacen("238 0920", " 80 0920", 1);
        assert!(matches!(classify(&impossible), Line::Rejected));
    }

    #[test]
    fn half_life_units() {
        let helium = parse_half_life("602 ys").seconds.unwrap();
        assert!((helium / 602e-24 - 1.0).abs() < 1e-12);
        assert_eq!(parse_half_life("39.7 s").seconds, Some(39.7));
        assert_eq!(parse_half_life("24.10 d").seconds, Some(24.10 * 86400.0));
        assert_eq!(parse_half_life("2 μs").seconds, Some(2e-6));
        assert_eq!(parse_half_life("2 us").seconds, Some(2e-6));
        assert_eq!(parse_half_life("12.32 y").seconds, Some(12.32 * YEAR));
    }

    #[test]
    fn half_life_markers() {
        let estimated = parse_half_life("150# ms");
        assert!(estimated.estimated);
        assert_eq!(estimated.seconds, Some(150.0 * 1e-3));

        let unknown_unit = parse_half_life("3 fortnights");
        assert_eq!(unknown_unit.text, "3 fortnights");
        assert_eq!(unknown_unit.seconds, None);

        let blank = parse_half_life("  ");
        assert_eq!(blank.text, "");
        assert!(!blank.stable);
        assert_eq!(blank.seconds, None);
    }
}
