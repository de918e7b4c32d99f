/// Extends string types with useful functions
pub trait StringExt {
    /// Capilalises the first letter in a string
    ///
    /// ```rust
    /// # use nmass_utils::StringExt;
    /// assert_eq!("fe".capitalise(), "Fe".to_string());
    /// assert_eq!("test string".capitalise(), "Test string".to_string());
    /// ```
    fn capitalise(&self) -> String;

    /// Normalise the typographic minus used in published tables
    ///
    /// Text extracted from PDF tables typically uses U+2212 rather than the
    /// ASCII hyphen-minus, which the standard number parsers reject.
    ///
    /// ```rust
    /// # use nmass_utils::StringExt;
    /// assert_eq!("\u{2212}60.39".ascii_minus(), "-60.39".to_string());
    /// assert_eq!("8.071".ascii_minus(), "8.071".to_string());
    /// ```
    fn ascii_minus(&self) -> String;
}

impl<T: AsRef<str>> StringExt for T {
    fn capitalise(&self) -> String {
        let mut c = self.as_ref().chars();
        match c.next() {
            Some(f) => f.to_uppercase().collect::<String>() + c.as_str(),
            None => String::new(),
        }
    }

    fn ascii_minus(&self) -> String {
        self.as_ref().replace('\u{2212}', "-")
    }
}
