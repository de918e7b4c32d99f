//! Fused nuclear mass database
//!
//! Combines the normalized AME2020, FRDM2012 and NUBASE2020 tables from
//! [nmass_tables] into a single SQLite view keyed on (Z, N), and derives
//! binding energies, separation energies and reaction Q-values from it.
//!
//! | Source     | Provides                                          |
//! | ---------- | ------------------------------------------------- |
//! | AME2020    | Experimental mass excess, binding, beta energies  |
//! | FRDM2012   | Theoretical mass excess, deformations, energies   |
//! | NUBASE2020 | Half-lives, spin/parity, decay modes, isomers     |
//!
//! Mass excesses are stored in keV. Every derived quantity is returned in
//! MeV, with `Ok(None)` when a required mass is missing and
//! [Error::Parameter] when an input is outside the configured bounds.
//!
//! ```rust, no_run
//! # use nmass_db::{Config, NuclearDatabase, Nuclide, Prefer};
//! let db = NuclearDatabase::init(Config::from_env(), false)?;
//! let session = db.session()?;
//!
//! // alpha decay of U-238
//! let q = session.q_value(
//!     Nuclide::new(92, 146),
//!     Nuclide::new(90, 144),
//!     Nuclide::new(2, 2),
//!     Prefer::Experimental,
//! )?;
//! # Ok::<(), nmass_db::Error>(())
//! ```

// Modules
mod cache;
mod config;
mod constants;
mod database;
mod derived;
mod error;
mod export;
mod query;
mod record;
mod store;

// Inline important structures and re-exports
#[doc(inline)]
pub use nmass_tables::{IsomerState, Nuclide};

#[doc(inline)]
pub use cache::{CacheKey, CacheStats, DatasetId, LruMassCache, MassCache};

#[doc(inline)]
pub use config::{
    Bounds, Config, AME_CSV, AME_FILE, DATABASE_FILE, FRDM_CSV, FRDM_FILE, NUBASE_CSV, NUBASE_FILE,
};

#[doc(inline)]
pub use constants::{
    is_magic, ALPHA_MASS_EXCESS, HYDROGEN_MASS_EXCESS, MAGIC_NUMBERS, NEUTRON_MASS_EXCESS,
};

#[doc(inline)]
pub use database::NuclearDatabase;

#[doc(inline)]
pub use derived::{MassLookup, Prefer, SeparationEnergies};

#[doc(inline)]
pub use error::{Error, Result};

#[doc(inline)]
pub use export::{export_rows, write_rows, ExportFormat};

#[doc(inline)]
pub use query::Session;

#[doc(inline)]
pub use record::{DecayRecord, ElementSummary, NuclideRecord, Summary, VIEW_COLUMNS};

#[doc(inline)]
pub use store::{build, SourceTables, SOURCE_TABLES, VIEW_NAME};

/// Free functions behind the [Session] methods, generic over any [MassLookup]
pub mod formulas {
    #[doc(inline)]
    pub use crate::derived::{
        binding_energy, mass_excess, q_value, s_2n, s_2p, s_alpha, s_n, s_p, separation_energies,
    };
}
