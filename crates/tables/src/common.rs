//! Common data structures

// external crates
use serde::{Deserialize, Serialize};

// nmass modules
use nmass_utils::f;

// internal modules
use crate::elements::element_symbol;
use crate::error::{Error, Result};
use crate::parsers::nuclide_from_str;

/// NUBASE isomer tags indexed by the isomer code of the `ZZZi` column
const ISOMER_TAGS: [&str; 10] = ["", "m", "n", "p", "q", "r", "x", "w", "i", "j"];

/// Identity of a nuclide by proton and neutron number
///
/// The `FromStr` trait is implemented and will try to parse a string into a
/// nuclide. Either `<element><separator><mass number><isomer>` or the
/// NUBASE style `<mass number><element><isomer>` are accepted, e.g.
///
/// - Common names Fe56, U238
/// - With separators fe-56, Pb_208
/// - Isomers Sn130m, Sn130m1, 130Snm
/// - Free neutron n1, 1n
///
/// Isomers share the identity of their ground state, so any isomer tag is
/// dropped. Use [parse_nuclide()] to keep it.
///
/// ```rust
/// # use nmass_tables::Nuclide;
/// # use std::str::FromStr;
/// let iron = Nuclide::from_str("fe-56").unwrap();
/// assert_eq!(iron, Nuclide::new(26, 30));
/// assert_eq!(iron.a(), 56);
/// assert_eq!(iron.name(), "Fe56");
/// ```
#[derive(
    Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
pub struct Nuclide {
    /// Proton number
    pub z: u16,
    /// Neutron number
    pub n: u16,
}

impl Nuclide {
    /// New nuclide from proton and neutron numbers
    pub fn new(z: u16, n: u16) -> Self {
        Self { z, n }
    }

    /// New nuclide from proton and mass numbers, if A >= Z
    pub fn from_za(z: u16, a: u16) -> Option<Self> {
        a.checked_sub(z).map(|n| Self { z, n })
    }

    /// Mass number (Z+N, total nucleons), saturating at `u16::MAX`
    pub fn a(&self) -> u16 {
        self.z.saturating_add(self.n)
    }

    /// Element symbol
    pub fn symbol(&self) -> String {
        element_symbol(self.z)
    }

    /// A name for the nuclide with consistent formatting
    ///
    /// The nuclide name will be formatted as `<element><mass number>`.
    ///
    /// ```rust
    /// # use nmass_tables::Nuclide;
    /// assert_eq!(Nuclide::new(50, 82).name(), "Sn132");
    /// assert_eq!(Nuclide::new(0, 1).name(), "n1");
    /// ```
    pub fn name(&self) -> String {
        f!("{}{}", self.symbol(), self.a())
    }
}

impl std::str::FromStr for Nuclide {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_nuclide(s).map(|(nuclide, _)| nuclide)
    }
}

impl std::fmt::Display for Nuclide {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Parse a nuclide name, keeping the isomer state
///
/// ```rust
/// # use nmass_tables::{parse_nuclide, IsomerState, Nuclide};
/// let (nuclide, state) = parse_nuclide("130Snm").unwrap();
/// assert_eq!(nuclide, Nuclide::new(50, 80));
/// assert_eq!(state, IsomerState::Excited(1));
///
/// assert!(parse_nuclide("Fe").is_err());
/// assert!(parse_nuclide("Xx56").is_err());
/// ```
pub fn parse_nuclide(s: &str) -> Result<(Nuclide, IsomerState)> {
    let trimmed = s.trim();
    match nuclide_from_str(trimmed) {
        Ok(("", parsed)) => Ok(parsed),
        _ => Err(Error::InvalidNuclide(s.to_string())),
    }
}

/// Variants of excited states
///
/// A nuclide can either be in the ground state, or some excited state. The
/// excited state number is the isomer code of the NUBASE `ZZZi` column and
/// displays as the corresponding NUBASE letter (`m`, `n`, `p`, ...).
///
/// ```rust
/// # use nmass_tables::IsomerState;
/// assert_eq!(IsomerState::from_code(2), Some(IsomerState::Excited(2)));
/// assert_eq!(IsomerState::Excited(2).to_string(), "n");
/// assert_eq!(IsomerState::Ground.to_string(), "");
/// ```
#[derive(
    Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
#[serde(into = "String", try_from = "String")]
pub enum IsomerState {
    #[default]
    Ground,
    Excited(u8),
}

impl IsomerState {
    /// State from a NUBASE isomer code (0-9)
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Ground),
            1..=9 => Some(Self::Excited(code)),
            _ => None,
        }
    }

    /// State from a NUBASE letter tag, empty for the ground state
    pub fn from_tag(tag: &str) -> Option<Self> {
        ISOMER_TAGS
            .iter()
            .position(|t| *t == tag)
            .and_then(|code| Self::from_code(code as u8))
    }

    /// NUBASE isomer code
    pub fn code(&self) -> u8 {
        match self {
            Self::Ground => 0,
            Self::Excited(e) => *e,
        }
    }

    /// Check if this is the ground state
    pub fn is_ground(&self) -> bool {
        matches!(self, Self::Ground)
    }
}

impl std::fmt::Display for IsomerState {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let state = match ISOMER_TAGS.get(self.code() as usize) {
            Some(tag) => tag.to_string(),
            None => f!("m{}", self.code()),
        };
        write!(f, "{state}")
    }
}

impl From<IsomerState> for String {
    fn from(state: IsomerState) -> Self {
        state.to_string()
    }
}

impl TryFrom<String> for IsomerState {
    type Error = Error;

    fn try_from(tag: String) -> Result<Self> {
        Self::from_tag(tag.trim())
            .ok_or_else(|| Error::ParseError(f!("unknown isomer tag {tag:?}")))
    }
}
