//! Parsers for the published nuclear mass and decay tables
//!
//! Three reference tables are supported:
//!
//! | Source     | Content                             | Parser           |
//! | ---------- | ----------------------------------- | ---------------- |
//! | AME2020    | Experimental atomic masses          | [AmeParser]      |
//! | FRDM2012   | Theoretical masses and deformations | [FrdmParser]     |
//! | NUBASE2020 | Half-lives, spins and decay modes   | [NubaseParser]   |
//!
//! Each parser turns the raw published file into a list of normalized rows
//! ([AmeRow], [FrdmRow], [NubaseRow]) which can be written to and read from
//! CSV tables with [write_csv()] and [read_csv()].
//!
//! For example:
//!
//! ```rust, no_run
//! # use nmass_tables::{AmeParser, SourceParser};
//! let parser = AmeParser::new("data/mass_1.mas20.txt");
//!
//! // Find iron-56 in the evaluation
//! let iron = parser
//!     .parse()
//!     .unwrap()
//!     .iter()
//!     .find(|row| row.z == 26 && row.n == 30)
//!     .unwrap();
//!
//! println!("Fe56 mass excess {:?} keV", iron.mass_excess_kev);
//! println!("{}", parser.stats().unwrap());
//! ```
//!
//! Malformed lines are never fatal. They are counted in the [ParseStats]
//! for each parse and logged, with a warning if an unusual fraction of the
//! file could not be read.
//!
//! AME2020 and NUBASE2020 can be downloaded from the Atomic Mass Data Center
//! mirrors with a [Fetcher]. FRDM2012 is only published as a PDF table, of
//! which the text layer is expected.

// Modules
mod ame;
mod common;
mod elements;
mod error;
mod fetch;
mod frdm;
mod nubase;
mod parsers;
mod source;
mod table;

// Re-exports of anything important with in-lined documentation for simplicity
#[doc(inline)]
pub use common::{parse_nuclide, IsomerState, Nuclide};

#[doc(inline)]
pub use elements::{element_symbol, proton_number};

#[doc(inline)]
pub use error::{Error, Result};

#[doc(inline)]
pub use source::{ParseOptions, ParseStats, SourceParser};

#[doc(inline)]
pub use table::{read_csv, write_csv, TableRow};

#[doc(inline)]
pub use ame::{AmeParser, AmeRow};

#[doc(inline)]
pub use frdm::{FrdmParser, FrdmRow};

#[doc(inline)]
pub use nubase::{parse_half_life, HalfLife, NubaseParser, NubaseRow};

#[doc(inline)]
pub use fetch::{validate, Fetcher, RemoteSource, AME2020, NUBASE2020};
