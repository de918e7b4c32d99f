//! `nmass` fuses the AME2020, FRDM2012 and NUBASE2020 nuclear mass tables
//! into a single queryable database
//!
#![doc = include_str!("../readme.md")]
#![deny(missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

// Re-exports of the workspace crates
#[doc(inline)]
pub use nmass_db as db;

#[doc(inline)]
pub use nmass_tables as tables;

#[doc(inline)]
pub use nmass_utils as utils;
