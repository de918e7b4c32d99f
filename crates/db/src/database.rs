//! Owner of a database artifact and its mass cache

// standard library
use std::path::{Path, PathBuf};
use std::sync::Arc;

// external crates
use log::info;

// internal modules
use crate::cache::{DatasetId, LruMassCache, MassCache};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::query::Session;
use crate::record::Summary;
use crate::store::{self, SourceTables};

/// Handle to a built nuclear mass database
///
/// Queries go through a [Session], one per worker thread, created with
/// [session()](NuclearDatabase::session). Every session shares this
/// database's cache. Rebuilding takes `&mut self`, so it can never overlap
/// with a live session.
///
/// ```rust, no_run
/// # use nmass_db::{Config, NuclearDatabase, Prefer};
/// let db = NuclearDatabase::init(Config::from_env(), false)?;
/// let session = db.session()?;
///
/// let fe56 = session.nuclide(26, 30)?;
/// println!("{fe56}");
///
/// let binding = session.binding_energy(26, 30, Prefer::Experimental)?;
/// # Ok::<(), nmass_db::Error>(())
/// ```
#[derive(Debug)]
pub struct NuclearDatabase {
    config: Config,
    path: PathBuf,
    dataset: DatasetId,
    cache: Arc<dyn MassCache>,
}

impl NuclearDatabase {
    /// Open an existing artifact with an LRU cache sized from the config
    pub fn open(config: Config) -> Result<Self> {
        let cache = Arc::new(LruMassCache::new(config.cache_size));
        Self::open_with_cache(config, cache)
    }

    /// Open an existing artifact with any cache implementation
    ///
    /// Fails with [Error::DatabaseMissing] if nothing has been built yet, or
    /// [Error::DataCorrupt] if the file does not pass the sanity check.
    pub fn open_with_cache(config: Config, cache: Arc<dyn MassCache>) -> Result<Self> {
        let path = config.database_path();
        if !path.exists() {
            return Err(Error::DatabaseMissing { path });
        }

        let conn = store::open_read_only(&path)?;
        store::sanity_check(&conn, &path)?;
        info!("Opened {}", path.display());

        Ok(Self {
            dataset: store::dataset_id(&path),
            config,
            path,
            cache,
        })
    }

    /// Open the artifact, building it from the sources when needed
    ///
    /// Builds if no artifact exists yet or if `rebuild` is set, otherwise
    /// behaves like [open()](NuclearDatabase::open).
    pub fn init(config: Config, rebuild: bool) -> Result<Self> {
        if config.database_path().exists() && !rebuild {
            return Self::open(config);
        }
        let tables = SourceTables::ingest(&config)?;
        Self::build(config, &tables)
    }

    /// Build and open an artifact from rows already in memory
    pub fn build(config: Config, tables: &SourceTables) -> Result<Self> {
        store::build(config.database_path(), tables)?;
        Self::open(config)
    }

    /// Build and open an artifact, sharing a caller supplied cache
    ///
    /// Anything the cache still holds for a previous artifact at the same
    /// path is dropped.
    pub fn build_with_cache(
        config: Config,
        tables: &SourceTables,
        cache: Arc<dyn MassCache>,
    ) -> Result<Self> {
        store::build(config.database_path(), tables)?;
        let db = Self::open_with_cache(config, cache)?;
        db.cache.clear(db.dataset);
        Ok(db)
    }

    /// Rebuild from the sources and drop any cached values for this dataset
    pub fn rebuild(&mut self) -> Result<Summary> {
        let tables = SourceTables::ingest(&self.config)?;
        self.rebuild_from(&tables)
    }

    /// Rebuild from rows already in memory
    pub fn rebuild_from(&mut self, tables: &SourceTables) -> Result<Summary> {
        store::build(&self.path, tables)?;
        self.cache.clear(self.dataset);
        self.summary()
    }

    /// New query handle with its own connection
    pub fn session(&self) -> Result<Session<'_>> {
        if !self.path.exists() {
            return Err(Error::DatabaseMissing {
                path: self.path.clone(),
            });
        }
        Session::new(self)
    }

    /// Counts describing the database
    pub fn summary(&self) -> Result<Summary> {
        self.session()?.summary()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Identifier used to key this database's cache entries
    pub fn dataset(&self) -> DatasetId {
        self.dataset
    }

    pub fn cache(&self) -> &dyn MassCache {
        self.cache.as_ref()
    }
}
