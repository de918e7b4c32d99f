//! Binding, separation and reaction energies from mass excesses
//!
//! Everything is computed in keV from a [MassLookup] and converted to MeV on
//! the way out. Missing masses give `Ok(None)`, while out of range proton or
//! neutron numbers are a parameter error.

// standard library
use std::str::FromStr;

// external crates
use serde::{Deserialize, Serialize};

// nmass modules
use nmass_tables::Nuclide;
use nmass_utils::{f, OptionExt};

// internal modules
use crate::config::Bounds;
use crate::constants::{
    ALPHA_MASS_EXCESS, HYDROGEN_MASS_EXCESS, KEV_PER_MEV, NEUTRON_MASS_EXCESS,
};
use crate::error::{Error, Result};

/// Which source to try first for a mass excess
///
/// The other source is always used as a fallback.
///
/// ```rust
/// # use nmass_db::Prefer;
/// # use std::str::FromStr;
/// assert_eq!(Prefer::from_str("Theoretical").unwrap(), Prefer::Theoretical);
/// assert!(Prefer::from_str("best").is_err());
/// ```
#[derive(
    Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
#[serde(rename_all = "lowercase")]
pub enum Prefer {
    /// AME2020 first, FRDM2012 as fallback
    #[default]
    Experimental,
    /// FRDM2012 first, AME2020 as fallback
    Theoretical,
}

impl FromStr for Prefer {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "experimental" => Ok(Self::Experimental),
            "theoretical" => Ok(Self::Theoretical),
            _ => Err(Error::parameter(
                "prefer",
                s,
                "expected \"experimental\" or \"theoretical\"",
            )),
        }
    }
}

impl std::fmt::Display for Prefer {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Experimental => write!(f, "experimental"),
            Self::Theoretical => write!(f, "theoretical"),
        }
    }
}

/// Source of mass excesses for the derived quantities
pub trait MassLookup {
    /// Valid proton and neutron number ranges
    fn bounds(&self) -> Bounds;

    /// Mass excess in keV, `None` if neither source has a value
    ///
    /// Implementations may assume `nuclide` is within [bounds()](MassLookup::bounds).
    fn mass_excess_kev(&self, nuclide: Nuclide, prefer: Prefer) -> Result<Option<f64>>;
}

/// Separation energies of a nuclide (MeV)
#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq)]
pub struct SeparationEnergies {
    /// One neutron
    pub s_n: Option<f64>,
    /// One proton
    pub s_p: Option<f64>,
    /// Two neutrons
    pub s_2n: Option<f64>,
    /// Two protons
    pub s_2p: Option<f64>,
    /// Alpha particle
    pub s_alpha: Option<f64>,
}

impl std::fmt::Display for SeparationEnergies {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut s = String::new();
        s += &f!("  S(n)     {} MeV\n", self.s_n.display_prec(3));
        s += &f!("  S(p)     {} MeV\n", self.s_p.display_prec(3));
        s += &f!("  S(2n)    {} MeV\n", self.s_2n.display_prec(3));
        s += &f!("  S(2p)    {} MeV\n", self.s_2p.display_prec(3));
        s += &f!("  S(alpha) {} MeV", self.s_alpha.display_prec(3));
        write!(f, "{s}")
    }
}

/// Check a nuclide against the configured bounds
pub fn validate(bounds: &Bounds, z: u16, n: u16) -> Result<Nuclide> {
    bounds.check_z(z)?;
    bounds.check_n(n)?;
    Ok(Nuclide::new(z, n))
}

/// Mass excess (MeV)
pub fn mass_excess<L: MassLookup + ?Sized>(
    lookup: &L,
    z: u16,
    n: u16,
    prefer: Prefer,
) -> Result<Option<f64>> {
    let nuclide = validate(&lookup.bounds(), z, n)?;
    Ok(lookup.mass_excess_kev(nuclide, prefer)?.map(to_mev))
}

/// Total binding energy, `Z*dH + N*dn - ME` (MeV)
pub fn binding_energy<L: MassLookup + ?Sized>(
    lookup: &L,
    z: u16,
    n: u16,
    prefer: Prefer,
) -> Result<Option<f64>> {
    let nuclide = validate(&lookup.bounds(), z, n)?;
    let binding = lookup.mass_excess_kev(nuclide, prefer)?.map(|me| {
        z as f64 * HYDROGEN_MASS_EXCESS + n as f64 * NEUTRON_MASS_EXCESS - me
    });
    Ok(binding.map(to_mev))
}

/// Energy to remove `dz` protons and `dn` neutrons bound as `particle` (keV)
///
/// `None` if the residual nucleus would need negative Z or N.
fn separation<L: MassLookup + ?Sized>(
    lookup: &L,
    z: u16,
    n: u16,
    (dz, dn): (u16, u16),
    particle: f64,
    prefer: Prefer,
) -> Result<Option<f64>> {
    let nuclide = validate(&lookup.bounds(), z, n)?;
    let residual = match (z.checked_sub(dz), n.checked_sub(dn)) {
        (Some(z), Some(n)) => Nuclide::new(z, n),
        _ => return Ok(None),
    };

    let parent = lookup.mass_excess_kev(nuclide, prefer)?;
    let daughter = lookup.mass_excess_kev(residual, prefer)?;
    Ok(parent
        .zip(daughter)
        .map(|(parent, daughter)| to_mev(daughter + particle - parent)))
}

/// One neutron separation energy, `ME(Z,N-1) + dn - ME(Z,N)` (MeV)
pub fn s_n<L: MassLookup + ?Sized>(
    lookup: &L,
    z: u16,
    n: u16,
    prefer: Prefer,
) -> Result<Option<f64>> {
    separation(lookup, z, n, (0, 1), NEUTRON_MASS_EXCESS, prefer)
}

/// One proton separation energy, `ME(Z-1,N) + dH - ME(Z,N)` (MeV)
pub fn s_p<L: MassLookup + ?Sized>(
    lookup: &L,
    z: u16,
    n: u16,
    prefer: Prefer,
) -> Result<Option<f64>> {
    separation(lookup, z, n, (1, 0), HYDROGEN_MASS_EXCESS, prefer)
}

/// Two neutron separation energy, `ME(Z,N-2) + 2dn - ME(Z,N)` (MeV)
pub fn s_2n<L: MassLookup + ?Sized>(
    lookup: &L,
    z: u16,
    n: u16,
    prefer: Prefer,
) -> Result<Option<f64>> {
    separation(lookup, z, n, (0, 2), 2.0 * NEUTRON_MASS_EXCESS, prefer)
}

/// Two proton separation energy, `ME(Z-2,N) + 2dH - ME(Z,N)` (MeV)
pub fn s_2p<L: MassLookup + ?Sized>(
    lookup: &L,
    z: u16,
    n: u16,
    prefer: Prefer,
) -> Result<Option<f64>> {
    separation(lookup, z, n, (2, 0), 2.0 * HYDROGEN_MASS_EXCESS, prefer)
}

/// Alpha separation energy, `ME(Z-2,N-2) + d_alpha - ME(Z,N)` (MeV)
pub fn s_alpha<L: MassLookup + ?Sized>(
    lookup: &L,
    z: u16,
    n: u16,
    prefer: Prefer,
) -> Result<Option<f64>> {
    separation(lookup, z, n, (2, 2), ALPHA_MASS_EXCESS, prefer)
}

/// All separation energies of a nuclide (MeV)
pub fn separation_energies<L: MassLookup + ?Sized>(
    lookup: &L,
    z: u16,
    n: u16,
    prefer: Prefer,
) -> Result<SeparationEnergies> {
    Ok(SeparationEnergies {
        s_n: s_n(lookup, z, n, prefer)?,
        s_p: s_p(lookup, z, n, prefer)?,
        s_2n: s_2n(lookup, z, n, prefer)?,
        s_2p: s_2p(lookup, z, n, prefer)?,
        s_alpha: s_alpha(lookup, z, n, prefer)?,
    })
}

/// Reaction Q-value for `initial + projectile -> final + ejectile` (MeV)
///
/// The projectile is whatever balances Z and N across the reaction, so
/// `Q = (ME_i + ME_proj) - (ME_f + ME_ej)` and a positive Q is exothermic.
/// Photons, neutrons, protons and alphas use fixed mass excesses, anything
/// heavier is looked up with the same `prefer` as the rest of the reaction.
///
/// For example, the alpha decay of U-238 has no projectile:
///
/// ```rust, ignore
/// let q = q_value(
///     &session,
///     Nuclide::new(92, 146),
///     Nuclide::new(90, 144),
///     Nuclide::new(2, 2),
///     Prefer::Experimental,
/// )?;
/// ```
pub fn q_value<L: MassLookup + ?Sized>(
    lookup: &L,
    initial: Nuclide,
    final_state: Nuclide,
    ejectile: Nuclide,
    prefer: Prefer,
) -> Result<Option<f64>> {
    let bounds = lookup.bounds();
    let initial = validate(&bounds, initial.z, initial.n)?;
    let final_state = validate(&bounds, final_state.z, final_state.n)?;
    let ejectile = validate(&bounds, ejectile.z, ejectile.n)?;

    let projectile_z = final_state.z as i32 + ejectile.z as i32 - initial.z as i32;
    let projectile_n = final_state.n as i32 + ejectile.n as i32 - initial.n as i32;
    let projectile = match (u16::try_from(projectile_z), u16::try_from(projectile_n)) {
        (Ok(z), Ok(n)) => validate(&bounds, z, n)?,
        _ => {
            return Err(Error::parameter(
                "projectile",
                f!("Z={projectile_z}, N={projectile_n}"),
                "reaction does not conserve proton and neutron number",
            ))
        }
    };

    let masses = [
        lookup.mass_excess_kev(initial, prefer)?,
        particle_mass_excess(lookup, projectile, prefer)?,
        lookup.mass_excess_kev(final_state, prefer)?,
        particle_mass_excess(lookup, ejectile, prefer)?,
    ];

    Ok(match masses {
        [Some(initial), Some(projectile), Some(final_state), Some(ejectile)] => {
            Some(to_mev(initial + projectile - final_state - ejectile))
        }
        _ => None,
    })
}

/// Fixed mass excess of the light reaction particles (keV)
fn light_particle(nuclide: Nuclide) -> Option<f64> {
    match (nuclide.z, nuclide.n) {
        (0, 0) => Some(0.0),
        (0, 1) => Some(NEUTRON_MASS_EXCESS),
        (1, 0) => Some(HYDROGEN_MASS_EXCESS),
        (2, 2) => Some(ALPHA_MASS_EXCESS),
        _ => None,
    }
}

fn particle_mass_excess<L: MassLookup + ?Sized>(
    lookup: &L,
    nuclide: Nuclide,
    prefer: Prefer,
) -> Result<Option<f64>> {
    match light_particle(nuclide) {
        Some(mass_excess) => Ok(Some(mass_excess)),
        None => lookup.mass_excess_kev(nuclide, prefer),
    }
}

fn to_mev(kev: f64) -> f64 {
    kev / KEV_PER_MEV
}
