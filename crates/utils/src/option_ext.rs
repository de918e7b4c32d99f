use crate::f;

/// Extends Option for easy display formatting
pub trait OptionExt {
    /// Better option outputs
    ///
    /// Generic over anything that implements `Display`, this will either be the
    /// value contained within `Some()` or "none" for the `None` variant.
    ///
    /// For example:
    ///
    /// ```rust
    /// # use nmass_utils::OptionExt;
    /// let x: Option<u32> = Some(2);
    /// assert_eq!(x.display(), "2");
    ///
    /// let x: Option<u32> = None;
    /// assert_eq!(x.display(), "none");
    /// ```
    fn display(&self) -> String;

    /// Fixed precision option outputs
    ///
    /// Same as [display()](OptionExt::display) but with a fixed number of
    /// decimal places. Only meaningful for numeric values, strings would be
    /// truncated.
    ///
    /// ```rust
    /// # use nmass_utils::OptionExt;
    /// let x: Option<f64> = Some(-60.6078);
    /// assert_eq!(x.display_prec(3), "-60.608");
    ///
    /// let x: Option<f64> = None;
    /// assert_eq!(x.display_prec(3), "none");
    /// ```
    fn display_prec(&self, precision: usize) -> String;
}

impl<T: std::fmt::Display> OptionExt for Option<T> {
    fn display(&self) -> String {
        match self {
            Some(value) => f!("{value}"),
            None => "none".to_string(),
        }
    }

    fn display_prec(&self, precision: usize) -> String {
        match self {
            Some(value) => f!("{value:.precision$}"),
            None => "none".to_string(),
        }
    }
}
