//! Common utility for extended `std` types
//!
//! These are left public for convenience across the nmass crates.
//!
//! For example, capitalising element symbols or consistent display of values
//! that may be missing from one of the source tables.

// Alias for the format! macro
pub use std::format as f;

// Modules
mod option_ext;
mod string_ext;
mod value_ext;

// Flatten
pub use option_ext::OptionExt;
pub use string_ext::StringExt;
pub use value_ext::ValueExt;
