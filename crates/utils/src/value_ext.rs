use crate::f;

/// Extends primitives with more specific formatting options
pub trait ValueExt {
    /// Better scientific number formatting
    ///
    /// The default is not very consistent for scientific in particular, so this
    /// allows easy definition. Used for half-lives, which span from
    /// yoctoseconds to well beyond the age of the universe.
    ///
    /// ```rust
    /// # use nmass_utils::ValueExt;
    /// let number = -1.0;
    /// assert_eq!(number.sci(5, 2), "-1.00000e+00".to_string());
    /// assert_eq!((1.41e17).sci(3, 2), "1.410e+17".to_string());
    /// ```
    fn sci(&self, precision: usize, exp_pad: usize) -> String;
}

impl<T: std::fmt::LowerExp> ValueExt for T {
    fn sci(&self, precision: usize, exp_pad: usize) -> String {
        let num = f!("{:.precision$e}", &self, precision = precision);
        let (mantissa, exp) = match num.split_once('e') {
            Some(parts) => parts,
            None => return num,
        };
        // Make sure the exponent is signed
        let (sign, exp) = match exp.strip_prefix('-') {
            Some(exp) => ('-', exp),
            None => ('+', exp),
        };
        f!("{mantissa}e{sign}{exp:0>exp_pad$}")
    }
}
