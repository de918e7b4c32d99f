//! Element symbols by proton number

use nmass_utils::{f, StringExt};

/// Element symbols indexed by proton number, with `n` for the free neutron
const SYMBOLS: [&str; 119] = [
    "n", "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg", "Al", "Si", "P", "S",
    "Cl", "Ar", "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge",
    "As", "Se", "Br", "Kr", "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd",
    "In", "Sn", "Sb", "Te", "I", "Xe", "Cs", "Ba", "La", "Ce", "Pr", "Nd", "Pm", "Sm", "Eu", "Gd",
    "Tb", "Dy", "Ho", "Er", "Tm", "Yb", "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg",
    "Tl", "Pb", "Bi", "Po", "At", "Rn", "Fr", "Ra", "Ac", "Th", "Pa", "U", "Np", "Pu", "Am", "Cm",
    "Bk", "Cf", "Es", "Fm", "Md", "No", "Lr", "Rf", "Db", "Sg", "Bh", "Hs", "Mt", "Ds", "Rg", "Cn",
    "Nh", "Fl", "Mc", "Lv", "Ts", "Og",
];

/// Element symbol for a proton number
///
/// Elements beyond oganesson have no agreed symbol, so these fall back to
/// the `E<z>` placeholder used by the theoretical tables.
///
/// ```rust
/// # use nmass_tables::element_symbol;
/// assert_eq!(element_symbol(0), "n");
/// assert_eq!(element_symbol(26), "Fe");
/// assert_eq!(element_symbol(120), "E120");
/// ```
pub fn element_symbol(z: u16) -> String {
    match SYMBOLS.get(z as usize) {
        Some(symbol) => symbol.to_string(),
        None => f!("E{z}"),
    }
}

/// Proton number for an element symbol
///
/// Matching is case-insensitive apart from the free neutron, which is only
/// recognised as a lowercase `n` so that `N` remains nitrogen.
///
/// ```rust
/// # use nmass_tables::proton_number;
/// assert_eq!(proton_number("fe"), Some(26));
/// assert_eq!(proton_number("N"), Some(7));
/// assert_eq!(proton_number("n"), Some(0));
/// assert_eq!(proton_number("E120"), Some(120));
/// assert_eq!(proton_number("Xx"), None);
/// ```
pub fn proton_number(symbol: &str) -> Option<u16> {
    if symbol == "n" {
        return Some(0);
    }

    if let Some(z) = symbol.strip_prefix('E').and_then(|z| z.parse::<u16>().ok()) {
        return (z as usize >= SYMBOLS.len()).then_some(z);
    }

    let symbol = symbol.to_lowercase().capitalise();
    SYMBOLS
        .iter()
        .skip(1)
        .position(|s| *s == symbol)
        .map(|i| i as u16 + 1)
}
