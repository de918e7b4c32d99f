//! Rows returned by queries

// external crates
use rusqlite::types::Type;
use rusqlite::Row;
use serde::Serialize;

// nmass modules
use nmass_tables::{element_symbol, IsomerState, Nuclide};
use nmass_utils::{f, OptionExt, ValueExt};

// internal modules
use crate::constants::is_magic;
use crate::derived::Prefer;
use crate::error::Result;

/// Columns of the fused `nuclides` view, in selection order
pub const VIEW_COLUMNS: [&str; 37] = [
    "z",
    "n",
    "a",
    "element",
    "mass_excess_exp_kev",
    "mass_excess_exp_unc_kev",
    "mass_excess_exp_estimated",
    "mass_excess_th_kev",
    "mass_excess_th_estimated",
    "exp_minus_th_kev",
    "binding_per_a_kev",
    "binding_per_a_estimated",
    "beta_decay_type",
    "beta_energy_kev",
    "beta_energy_estimated",
    "atomic_mass_micro_u",
    "atomic_mass_estimated",
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
    "binding_th_mev",
    "half_life",
    "half_life_s",
    "is_stable",
    "spin_parity",
    "decay_modes",
    "discovery_year",
    "has_experimental",
    "has_theoretical",
    "has_decay_data",
];

/// Comma separated view columns for a SELECT
pub(crate) fn view_selection() -> String {
    VIEW_COLUMNS.join(", ")
}

/// Comma separated nubase2020 columns for a SELECT
pub(crate) const DECAY_SELECTION: &str = "z, n, a, symbol, isomer, mass_excess_kev, \
     excitation_kev, excitation_estimated, half_life, half_life_s, half_life_estimated, \
     is_stable, spin_parity, decay_modes, discovery_year";

/// Everything known about a ground state nuclide
///
/// One row of the fused view. Mass excesses are kept in keV as stored, FRDM
/// energies in MeV. Any field from a source that has no entry for the
/// nuclide is `None`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct NuclideRecord {
    pub z: u16,
    pub n: u16,
    pub a: u16,
    pub element: String,

    pub mass_excess_exp_kev: Option<f64>,
    pub mass_excess_exp_unc_kev: Option<f64>,
    pub mass_excess_exp_estimated: Option<bool>,
    pub mass_excess_th_kev: Option<f64>,
    pub mass_excess_th_estimated: Option<bool>,
    pub exp_minus_th_kev: Option<f64>,

    pub binding_per_a_kev: Option<f64>,
    pub binding_per_a_estimated: Option<bool>,
    pub beta_decay_type: Option<String>,
    pub beta_energy_kev: Option<f64>,
    pub beta_energy_estimated: Option<bool>,
    pub atomic_mass_micro_u: Option<f64>,
    pub atomic_mass_estimated: Option<bool>,

    pub eps2: Option<f64>,
    pub eps3: Option<f64>,
    pub eps4: Option<f64>,
    pub eps6: Option<f64>,
    pub beta2: Option<f64>,
    pub beta3: Option<f64>,
    pub beta4: Option<f64>,
    pub beta6: Option<f64>,
    pub shell_pairing_mev: Option<f64>,
    pub microscopic_mev: Option<f64>,
    pub binding_th_mev: Option<f64>,

    pub half_life: Option<String>,
    pub half_life_s: Option<f64>,
    pub is_stable: Option<bool>,
    pub spin_parity: Option<String>,
    pub decay_modes: Option<String>,
    pub discovery_year: Option<u16>,

    pub has_experimental: bool,
    pub has_theoretical: bool,
    pub has_decay_data: bool,
}

impl NuclideRecord {
    /// Map a row selected with [view_selection()]
    pub(crate) fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let z: u16 = row.get("z")?;
        let element: Option<String> = row.get("element")?;

        Ok(Self {
            z,
            n: row.get("n")?,
            a: row.get("a")?,
            element: element.unwrap_or_else(|| element_symbol(z)),
            mass_excess_exp_kev: row.get("mass_excess_exp_kev")?,
            mass_excess_exp_unc_kev: row.get("mass_excess_exp_unc_kev")?,
            mass_excess_exp_estimated: row.get("mass_excess_exp_estimated")?,
            mass_excess_th_kev: row.get("mass_excess_th_kev")?,
            mass_excess_th_estimated: row.get("mass_excess_th_estimated")?,
            exp_minus_th_kev: row.get("exp_minus_th_kev")?,
            binding_per_a_kev: row.get("binding_per_a_kev")?,
            binding_per_a_estimated: row.get("binding_per_a_estimated")?,
            beta_decay_type: row.get("beta_decay_type")?,
            beta_energy_kev: row.get("beta_energy_kev")?,
            beta_energy_estimated: row.get("beta_energy_estimated")?,
            atomic_mass_micro_u: row.get("atomic_mass_micro_u")?,
            atomic_mass_estimated: row.get("atomic_mass_estimated")?,
            eps2: row.get("eps2")?,
            eps3: row.get("eps3")?,
            eps4: row.get("eps4")?,
            eps6: row.get("eps6")?,
            beta2: row.get("beta2")?,
            beta3: row.get("beta3")?,
            beta4: row.get("beta4")?,
            beta6: row.get("beta6")?,
            shell_pairing_mev: row.get("shell_pairing_mev")?,
            microscopic_mev: row.get("microscopic_mev")?,
            binding_th_mev: row.get("binding_th_mev")?,
            half_life: row.get("half_life")?,
            half_life_s: row.get("half_life_s")?,
            is_stable: row.get("is_stable")?,
            spin_parity: row.get("spin_parity")?,
            decay_modes: row.get("decay_modes")?,
            discovery_year: row.get("discovery_year")?,
            has_experimental: row.get("has_experimental")?,
            has_theoretical: row.get("has_theoretical")?,
            has_decay_data: row.get("has_decay_data")?,
        })
    }

    pub fn nuclide(&self) -> Nuclide {
        Nuclide::new(self.z, self.n)
    }

    /// Conventional name, e.g. "Fe56"
    pub fn name(&self) -> String {
        f!("{}{}", self.element, self.a)
    }

    /// Mass excess from one source with the other as fallback (keV)
    pub fn mass_excess_kev(&self, prefer: Prefer) -> Option<f64> {
        match prefer {
            Prefer::Experimental => self.mass_excess_exp_kev.or(self.mass_excess_th_kev),
            Prefer::Theoretical => self.mass_excess_th_kev.or(self.mass_excess_exp_kev),
        }
    }

    /// True if the mass number matches the proton and neutron numbers
    pub(crate) fn is_consistent(&self) -> bool {
        self.z as u32 + self.n as u32 == self.a as u32
    }

    /// Pretty JSON for machine readable output
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl std::fmt::Display for NuclideRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let flag = |estimated: Option<bool>| match estimated {
            Some(true) => " (estimated)",
            _ => "",
        };

        let mut s = f!("{} (Z={}, N={}, A={})\n", self.name(), self.z, self.n, self.a);
        s += &f!(
            "  Mass excess (AME2020):   {} keV{}\n",
            self.mass_excess_exp_kev.display_prec(3),
            flag(self.mass_excess_exp_estimated)
        );
        s += &f!(
            "  Mass excess (FRDM2012):  {} keV{}\n",
            self.mass_excess_th_kev.display_prec(1),
            flag(self.mass_excess_th_estimated)
        );
        s += &f!(
            "  Exp - Th:                {} keV\n",
            self.exp_minus_th_kev.display_prec(1)
        );
        s += &f!(
            "  Binding energy / A:      {} keV{}\n",
            self.binding_per_a_kev.display_prec(3),
            flag(self.binding_per_a_estimated)
        );
        s += &f!("  Deformation beta2:       {}\n", self.beta2.display_prec(3));
        if let Some(seconds) = self.half_life_s {
            s += &f!(
                "  Half-life:               {} ({} s)\n",
                self.half_life.display(),
                seconds.sci(4, 2)
            );
        } else {
            s += &f!("  Half-life:               {}\n", self.half_life.display());
        }
        s += &f!("  Spin/parity:             {}\n", self.spin_parity.display());
        s += &f!("  Decay modes:             {}", self.decay_modes.display());
        write!(f, "{s}")
    }
}

/// A ground or isomeric state from NUBASE2020
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct DecayRecord {
    pub z: u16,
    pub n: u16,
    pub a: u16,
    pub symbol: String,
    pub isomer: IsomerState,
    pub mass_excess_kev: Option<f64>,
    pub excitation_kev: Option<f64>,
    pub excitation_estimated: bool,
    pub half_life: String,
    pub half_life_s: Option<f64>,
    pub half_life_estimated: bool,
    pub is_stable: bool,
    pub spin_parity: String,
    pub decay_modes: String,
    pub discovery_year: Option<u16>,
}

impl DecayRecord {
    /// Map a row selected with [DECAY_SELECTION]
    pub(crate) fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let tag: String = row.get("isomer")?;
        let isomer = IsomerState::from_tag(&tag).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                4,
                Type::Text,
                Box::new(nmass_tables::Error::ParseError(f!("isomer tag {tag:?}"))),
            )
        })?;

        Ok(Self {
            z: row.get("z")?,
            n: row.get("n")?,
            a: row.get("a")?,
            symbol: row.get("symbol")?,
            isomer,
            mass_excess_kev: row.get("mass_excess_kev")?,
            excitation_kev: row.get("excitation_kev")?,
            excitation_estimated: row.get("excitation_estimated")?,
            half_life: row.get("half_life")?,
            half_life_s: row.get("half_life_s")?,
            half_life_estimated: row.get("half_life_estimated")?,
            is_stable: row.get("is_stable")?,
            spin_parity: row.get("spin_parity")?,
            decay_modes: row.get("decay_modes")?,
            discovery_year: row.get("discovery_year")?,
        })
    }

    /// Name including the isomer tag, e.g. "Sn130m"
    pub fn name(&self) -> String {
        f!("{}{}{}", self.symbol, self.a, self.isomer)
    }

    /// Decay mode codes in order, e.g. `["A", "SF"]` for "A=100;SF=5.44e-5"
    pub fn mode_codes(&self) -> Vec<&str> {
        decay_mode_codes(&self.decay_modes)
    }

    pub(crate) fn is_consistent(&self) -> bool {
        self.z as u32 + self.n as u32 == self.a as u32
    }
}

impl std::fmt::Display for DecayRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let half_life = match self.is_stable {
            true => "stable".to_string(),
            false => match self.half_life_s {
                Some(seconds) => f!("{} ({} s)", self.half_life, seconds.sci(4, 2)),
                None => self.half_life.clone(),
            },
        };
        write!(
            f,
            "{:<8} Ex {:>10} keV  {:<24} {:<10} {}",
            self.name(),
            self.excitation_kev.display_prec(2),
            half_life,
            self.spin_parity,
            self.decay_modes
        )
    }
}

/// Leading code of each decay branch
///
/// Branches are separated by ';' and the code runs up to the first relation
/// or space, so "B-=100;B-n ?" gives `["B-", "B-n"]`.
pub(crate) fn decay_mode_codes(modes: &str) -> Vec<&str> {
    modes
        .split(';')
        .map(|branch| {
            let branch = branch.trim();
            let end = branch
                .find(|c: char| matches!(c, '=' | '<' | '>' | '~' | ' ' | '?'))
                .unwrap_or(branch.len());
            &branch[..end]
        })
        .filter(|code| !code.is_empty())
        .collect()
}

/// Overview of one element across the fused tables
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ElementSummary {
    pub z: u16,
    pub symbol: String,
    /// Nuclides in the fused view
    pub nuclides: usize,
    /// Nuclides with an AME2020 mass
    pub experimental: usize,
    /// Nuclides with only the FRDM2012 mass
    pub predicted_only: usize,
    /// Smallest and largest neutron number known
    pub n_range: (u16, u16),
    /// Names of the stable ground states
    pub stable: Vec<String>,
    /// Isomeric states in NUBASE2020
    pub isomers: usize,
    /// Z closes a proton shell
    pub magic: bool,
}

impl ElementSummary {
    /// Summary from the isotopes of an element, ordered by N and not empty
    pub(crate) fn from_isotopes(z: u16, isotopes: &[NuclideRecord], isomers: usize) -> Self {
        let first = isotopes.first().map_or(0, |r| r.n);
        let last = isotopes.last().map_or(0, |r| r.n);

        Self {
            z,
            symbol: element_symbol(z),
            nuclides: isotopes.len(),
            experimental: isotopes.iter().filter(|r| r.has_experimental).count(),
            predicted_only: isotopes
                .iter()
                .filter(|r| r.has_theoretical && !r.has_experimental)
                .count(),
            n_range: (first, last),
            stable: isotopes
                .iter()
                .filter(|r| r.is_stable == Some(true))
                .map(|r| r.name())
                .collect(),
            isomers,
            magic: is_magic(z),
        }
    }

    /// Pretty JSON for machine readable output
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl std::fmt::Display for ElementSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let stable = match self.stable.is_empty() {
            true => "none".to_string(),
            false => self.stable.join(", "),
        };

        let mut s = f!("{} (Z={})\n", self.symbol, self.z);
        s += &f!(
            "  Nuclides:         {} (N={}..{})\n",
            self.nuclides, self.n_range.0, self.n_range.1
        );
        s += &f!("  Experimental:     {}\n", self.experimental);
        s += &f!("  Predicted only:   {}\n", self.predicted_only);
        s += &f!("  Stable:           {stable}\n");
        s += &f!("  Isomeric states:  {}", self.isomers);
        if self.magic {
            s += &f!("\n  Z={} is a magic number (proton shell closure)", self.z);
        }
        write!(f, "{s}")
    }
}

/// Counts describing a built database
#[derive(Serialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct Summary {
    /// Rows in the ame2020 table
    pub ame_rows: usize,
    /// Rows in the frdm2012 table
    pub frdm_rows: usize,
    /// Rows in the nubase2020 table, isomers included
    pub nubase_rows: usize,
    /// Rows in the fused view
    pub nuclides: usize,
    /// Nuclides with an AME2020 mass
    pub experimental: usize,
    /// Nuclides with an FRDM2012 mass
    pub theoretical: usize,
    /// Nuclides with both masses
    pub both: usize,
    /// Nuclides with only the FRDM2012 mass
    pub predicted_only: usize,
    /// Nuclides with NUBASE2020 ground state data
    pub decay_data: usize,
    /// Isomeric states in NUBASE2020
    pub isomers: usize,
    /// Stable ground states
    pub stable: usize,
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut s = f!("AME2020 rows:     {}\n", self.ame_rows);
        s += &f!("FRDM2012 rows:    {}\n", self.frdm_rows);
        s += &f!("NUBASE2020 rows:  {}\n", self.nubase_rows);
        s += &f!("Nuclides:         {}\n", self.nuclides);
        s += &f!("  experimental:   {}\n", self.experimental);
        s += &f!("  theoretical:    {}\n", self.theoretical);
        s += &f!("  both:           {}\n", self.both);
        s += &f!("  predicted only: {}\n", self.predicted_only);
        s += &f!("  decay data:     {}\n", self.decay_data);
        s += &f!("  stable:         {}\n", self.stable);
        s += &f!("Isomeric states:  {}", self.isomers);
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decay_codes() {
        assert_eq!(decay_mode_codes("A=100;SF=5.44e-5 17"), vec!["A", "SF"]);
        assert_eq!(decay_mode_codes("B-=100;B-n ?"), vec!["B-", "B-n"]);
        assert_eq!(decay_mode_codes("IS=91.754 36"), vec!["IS"]);
        assert_eq!(decay_mode_codes("p ?"), vec!["p"]);
        assert!(decay_mode_codes("").is_empty());
    }

    #[test]
    fn selection_matches_width() {
        let selection = view_selection();
        assert_eq!(selection.split(", ").count(), VIEW_COLUMNS.len());
        assert!(selection.ends_with("has_decay_data"));
    }
}
