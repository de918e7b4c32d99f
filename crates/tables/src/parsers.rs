//! Set of useful parser combinators for the published table formats

// internal modules
use crate::common::{IsomerState, Nuclide};
use crate::elements::proton_number;

// external crates
use log::{trace, warn};

// nom parser combinators
use nom::branch::alt;
use nom::bytes::complete::take_while1;
use nom::character::complete::{alpha1, char, one_of, space0};
use nom::combinator::{all_consuming, opt};
use nom::error::{Error, ErrorKind};
use nom::number::complete::double;
use nom::sequence::tuple;
use nom::{self, Err, IResult};

/// Slice a fixed-width column out of a line
///
/// Lines may be shorter than the full record, so the span is clamped and
/// anything out of range is simply empty. Column positions count bytes, so
/// a span cutting through a multi-byte character is widened to the
/// enclosing character boundaries with a warning.
pub(crate) fn column(line: &str, start: usize, end: usize) -> &str {
    let end = end.min(line.len());
    if start >= end {
        return "";
    }
    if let Some(field) = line.get(start..end) {
        return field;
    }

    let mut from = start;
    while !line.is_char_boundary(from) {
        from -= 1;
    }
    let mut to = end;
    while !line.is_char_boundary(to) {
        to += 1;
    }
    warn!("Columns [{start}, {end}) split a character, reading [{from}, {to}) of {line:?}");
    &line[from..to]
}

/// Numerical value in a published table
///
/// Returns the value and whether it was flagged as estimated. Blank fields
/// and `*` (not calculable) are `None`. A `#` marks an estimated value and
/// replaces the decimal point when there is none.
pub(crate) fn table_value(raw: &str) -> Option<(f64, bool)> {
    let raw = raw.trim();
    if raw.is_empty() || raw == "*" {
        return None;
    }

    let estimated = raw.contains('#');
    let text = if raw.contains('.') {
        raw.replace('#', "")
    } else {
        raw.replacen('#', ".", 1).replace('#', "")
    };

    let parsed: IResult<&str, f64> = all_consuming(double)(text.as_str());
    match parsed {
        Ok((_, value)) if value.is_finite() => Some((value, estimated)),
        _ => {
            trace!("Unable to interpret \"{raw}\" as a value");
            None
        }
    }
}

/// Unsigned integer field, such as identity columns
pub(crate) fn table_integer(raw: &str) -> Option<u16> {
    let parsed: IResult<&str, u16> = all_consuming(nom::character::complete::u16)(raw.trim());
    parsed.ok().map(|(_, value)| value)
}

/// Section header of the FRDM2012 table, e.g. `Z=26(Fe)`
pub(crate) fn section_header(i: &str) -> IResult<&str, u16> {
    let (i, _) = tuple((space0, char('Z'), space0, char('='), space0))(i)?;
    nom::character::complete::u16(i)
}

/// Half-life value with optional limit prefix and unit, e.g. `>4.5 Gy`
///
/// Returns the value, whether it was estimated, and the unit.
pub(crate) fn half_life_value(i: &str) -> IResult<&str, (f64, bool, &str)> {
    let (i, _) = opt(one_of("<>~"))(i)?;
    let (i, _) = opt(char('='))(i)?;
    let (i, _) = space0(i)?;
    let (i, value) = double(i)?;
    let (i, estimated) = opt(char('#'))(i)?;
    let (i, _) = space0(i)?;
    let (i, unit) = take_while1(|c: char| c.is_alphabetic())(i)?;
    let (i, _) = space0(i)?;
    Ok((i, (value, estimated.is_some(), unit)))
}

/// Parse string into a nuclide identity and isomer state
///
/// Can be:
///     - Element first Fe56, fe-56, Sn130m, Sn130m1
///     - Mass number first 56Fe, 130Snm, 1n
///
/// Element-only names (no mass number) are rejected since they do not
/// identify a nuclide.
pub(crate) fn nuclide_from_str(i: &str) -> IResult<&str, (Nuclide, IsomerState)> {
    alt((element_first, mass_first))(i)
}

/// e.g. Fe56, fe-56, Sn130m2
fn element_first(i: &str) -> IResult<&str, (Nuclide, IsomerState)> {
    let (rest, element) = element(i)?;
    let z = proton_number(element).ok_or_else(|| fail(i))?;
    let (rest, _) = opt(separator)(rest)?;
    let (rest, a) = mass_number(rest)?;
    let (rest, state) = opt(metastable)(rest)?;
    let nuclide = Nuclide::from_za(z, a).ok_or_else(|| fail(i))?;
    Ok((rest, (nuclide, state.unwrap_or_default())))
}

/// e.g. 56Fe, 130Snm, 1n
fn mass_first(i: &str) -> IResult<&str, (Nuclide, IsomerState)> {
    let (rest, a) = mass_number(i)?;
    let (rest, _) = opt(separator)(rest)?;
    let (rest, letters) = alpha1(rest)?;

    // The isomer letter runs straight on from the symbol, so try the full
    // run first and then with a trailing tag split off
    let (z, state) = match proton_number(letters) {
        Some(z) => (z, IsomerState::Ground),
        None => {
            let split = letters.len() - 1;
            let (symbol, tag) = letters.split_at(split);
            let z = proton_number(symbol).ok_or_else(|| fail(i))?;
            let state = IsomerState::from_tag(tag).ok_or_else(|| fail(i))?;
            (z, state)
        }
    };

    let (rest, numbered) = opt(numbered_isomer)(rest)?;
    let nuclide = Nuclide::from_za(z, a).ok_or_else(|| fail(i))?;
    Ok((rest, (nuclide, numbered.unwrap_or(state))))
}

/// Get the element symbol
fn element(i: &str) -> IResult<&str, &str> {
    let (rest, element) = alpha1(i)?;

    if element.len() > 2 {
        Err(fail(i))
    } else {
        Ok((rest, element))
    }
}

/// Get an unsigned integer value
fn mass_number(i: &str) -> IResult<&str, u16> {
    nom::character::complete::u16(i)
}

/// List of possible separators people may use
fn separator(i: &str) -> IResult<&str, char> {
    one_of("_-")(i)
}

/// Get the isomer from either numbered or lettered conventions
fn metastable(i: &str) -> IResult<&str, IsomerState> {
    alt((numbered_isomer, lettered_isomer))(i)
}

/// Get the isomer from the ENSDF style m1, m2, etc...
fn numbered_isomer(i: &str) -> IResult<&str, IsomerState> {
    let (rest, _) = one_of("mM")(i)?;
    let (rest, number) = nom::character::complete::u8(rest)?;
    let state = IsomerState::from_code(number).ok_or_else(|| fail(i))?;
    Ok((rest, state))
}

/// Get the isomer type from the NUBASE letters m, n, p, ...
fn lettered_isomer(i: &str) -> IResult<&str, IsomerState> {
    let (rest, tag) = one_of("mnpqrxwij")(i)?;
    let state = IsomerState::from_tag(&tag.to_string()).ok_or_else(|| fail(i))?;
    Ok((rest, state))
}

fn fail(i: &str) -> Err<Error<&str>> {
    Err::Error(Error::new(i, ErrorKind::Fail))
}


#[cfg(test)]
mod nuclide_tests {
    use super::*;

    fn parsed(i: &str) -> (u16, u16, IsomerState) {
        let (rest, (nuclide, state)) = nuclide_from_str(i).unwrap();
        assert_eq!(rest, "");
        (nuclide.z, nuclide.n, state)
    }

    #[test]
    fn element_first_names() {
        assert_eq!(parsed("Fe56"), (26, 30, IsomerState::Ground));
        assert_eq!(parsed("fe-56"), (26, 30, IsomerState::Ground));
        assert_eq!(parsed("U238"), (92, 146, IsomerState::Ground));
        assert_eq!(parsed("Pb_208"), (82, 126, IsomerState::Ground));
        assert_eq!(parsed("n1"), (0, 1, IsomerState::Ground));
    }

    #[test]
    fn element_first_isomers() {
        assert_eq!(parsed("Sn130m"), (50, 80, IsomerState::Excited(1)));
        assert_eq!(parsed("Sn130n"), (50, 80, IsomerState::Excited(2)));
        assert_eq!(parsed("Sn130m2"), (50, 80, IsomerState::Excited(2)));
        assert_eq!(parsed("Sn130m0"), (50, 80, IsomerState::Ground));
    }

    #[test]
    fn mass_first_names() {
        assert_eq!(parsed("56Fe"), (26, 30, IsomerState::Ground));
        assert_eq!(parsed("130Snm"), (50, 80, IsomerState::Excited(1)));
        assert_eq!(parsed("1n"), (0, 1, IsomerState::Ground));
        assert_eq!(parsed("4He"), (2, 2, IsomerState::Ground));
    }

    #[test]
    fn rejected_names() {
        // element only
        assert!(nuclide_from_str("Fe").is_err());
        // unknown element
        assert!(nuclide_from_str("Xx56").is_err());
        // mass number below the proton number
        assert!(nuclide_from_str("U90").is_err());
        // symbols are at most two letters
        assert!(nuclide_from_str("Iron56").is_err());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_are_clamped() {
        assert_eq!(column("  56 Fe", 2, 4), "56");
        assert_eq!(column("  56 Fe", 5, 40), "Fe");
        assert_eq!(column("  56 Fe", 10, 20), "");
    }

    #[test]
    fn columns_keep_multibyte_characters() {
        // "μ" occupies bytes 2 and 3
        let line = "2 μs";
        assert_eq!(column(line, 2, 5), "μs");
        assert_eq!(column(line, 3, 5), "μs");
        assert_eq!(column(line, 0, 3), "2 μ");
    }
}
