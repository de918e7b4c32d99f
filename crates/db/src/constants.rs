//! Physical constants from the AME2020 evaluation

/// Mass excess of the free neutron (keV)
pub const NEUTRON_MASS_EXCESS: f64 = 8071.32;

/// Mass excess of the hydrogen atom (keV)
pub const HYDROGEN_MASS_EXCESS: f64 = 7288.97;

/// Mass excess of the helium-4 atom (keV)
pub const ALPHA_MASS_EXCESS: f64 = 2424.92;

/// Proton and neutron numbers that close a nuclear shell
pub const MAGIC_NUMBERS: [u16; 7] = [2, 8, 20, 28, 50, 82, 126];

/// Conversion from keV internally to MeV at the API boundary
pub(crate) const KEV_PER_MEV: f64 = 1000.0;

/// Check if a proton or neutron number closes a shell
///
/// ```rust
/// # use nmass_db::is_magic;
/// assert!(is_magic(82));
/// assert!(!is_magic(83));
/// ```
pub fn is_magic(number: u16) -> bool {
    MAGIC_NUMBERS.contains(&number)
}
