//! Runtime configuration

// standard library
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

// external crates
use log::{warn, LevelFilter};
use serde::{Deserialize, Serialize};

// nmass modules
use nmass_tables::ParseOptions;
use nmass_utils::f;

// internal modules
use crate::error::{Error, Result};

/// Raw AME2020 mass table
pub const AME_FILE: &str = "mass_1.mas20.txt";
/// Text layer of the FRDM2012 table
pub const FRDM_FILE: &str = "frdm2012.txt";
/// Raw NUBASE2020 table
pub const NUBASE_FILE: &str = "nubase_4.mas20.txt";
/// Normalized AME2020 table
pub const AME_CSV: &str = "ame2020.csv";
/// Normalized FRDM2012 table
pub const FRDM_CSV: &str = "frdm2012.csv";
/// Normalized NUBASE2020 table
pub const NUBASE_CSV: &str = "nubase2020.csv";
/// Database file name used when no explicit path is configured
pub const DATABASE_FILE: &str = "nuclear_masses.sqlite";

/// Valid ranges for proton and neutron numbers
///
/// Both lower bounds are zero, so only the upper bounds are kept. The mass
/// number is bounded by their sum.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct Bounds {
    /// Largest accepted proton number
    pub z_max: u16,
    /// Largest accepted neutron number
    pub n_max: u16,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            z_max: 140,
            n_max: 250,
        }
    }
}

impl Bounds {
    /// Largest accepted mass number, saturating at `u16::MAX`
    pub fn a_max(&self) -> u16 {
        self.z_max.saturating_add(self.n_max)
    }

    /// Check a proton number
    pub fn check_z(&self, z: u16) -> Result<u16> {
        match z <= self.z_max {
            true => Ok(z),
            false => Err(Error::parameter("Z", z, &range_reason(0, self.z_max))),
        }
    }

    /// Check a neutron number
    pub fn check_n(&self, n: u16) -> Result<u16> {
        match n <= self.n_max {
            true => Ok(n),
            false => Err(Error::parameter("N", n, &range_reason(0, self.n_max))),
        }
    }

    /// Check a mass number
    pub fn check_a(&self, a: u16) -> Result<u16> {
        match (1..=self.a_max()).contains(&a) {
            true => Ok(a),
            false => Err(Error::parameter("A", a, &range_reason(1, self.a_max()))),
        }
    }
}

fn range_reason(min: u16, max: u16) -> String {
    f!("outside of the valid range [{min}, {max}]")
}

/// Configuration for the database and its sources
///
/// Defaults can be overridden from the environment with [Config::from_env()]
/// or from a JSON file with [Config::from_json_file()].
///
/// | Field              | Environment            | Default                            |
/// | ------------------ | ---------------------- | ---------------------------------- |
/// | data_dir           | NMASS_DATA_DIR         | `./data`                           |
/// | db_path            | NMASS_DB_PATH          | `<data_dir>/nuclear_masses.sqlite` |
/// | cache_size         | NMASS_CACHE_SIZE       | 2000                               |
/// | download_timeout_s | NMASS_DOWNLOAD_TIMEOUT | 60                                 |
/// | request_delay_s    | NMASS_REQUEST_DELAY    | 1.0                                |
/// | log_level          | NMASS_LOG_LEVEL        | info                               |
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Directory holding the raw sources and normalized tables
    pub data_dir: PathBuf,
    /// Explicit database path, otherwise inside `data_dir`
    pub db_path: Option<PathBuf>,
    /// Capacity of the derived quantity cache
    pub cache_size: usize,
    /// Download timeout in seconds
    pub download_timeout_s: u64,
    /// Minimum delay between requests to the same domain in seconds
    pub request_delay_s: f64,
    /// Log verbosity, one of error, warn, info, debug, trace, off
    pub log_level: String,
    /// Valid proton and neutron number ranges
    pub bounds: Bounds,
    /// Malformed fraction of a source above which a warning is logged
    pub skip_warn_fraction: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            db_path: None,
            cache_size: 2000,
            download_timeout_s: 60,
            request_delay_s: 1.0,
            log_level: "info".to_string(),
            bounds: Bounds::default(),
            skip_warn_fraction: ParseOptions::default().skip_warn_fraction,
        }
    }
}

impl Config {
    /// Defaults overridden by any `NMASS_*` environment variables
    ///
    /// Invalid values are ignored with a warning.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by variables from an arbitrary lookup
    pub fn from_vars<F: Fn(&str) -> Option<String>>(lookup: F) -> Self {
        let mut config = Self::default();

        if let Some(dir) = lookup("NMASS_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(path) = lookup("NMASS_DB_PATH") {
            config.db_path = Some(PathBuf::from(path));
        }
        if let Some(size) = parsed_var(&lookup, "NMASS_CACHE_SIZE", |v: &usize| *v >= 1) {
            config.cache_size = size;
        }
        if let Some(timeout) = parsed_var(&lookup, "NMASS_DOWNLOAD_TIMEOUT", |v: &u64| *v >= 1) {
            config.download_timeout_s = timeout;
        }
        if let Some(delay) = parsed_var(&lookup, "NMASS_REQUEST_DELAY", |v: &f64| {
            v.is_finite() && *v >= 0.0
        }) {
            config.request_delay_s = delay;
        }
        if let Some(level) = lookup("NMASS_LOG_LEVEL") {
            match LevelFilter::from_str(&level) {
                Ok(_) => config.log_level = level.to_lowercase(),
                Err(_) => warn!("Ignoring NMASS_LOG_LEVEL={level:?}, not a log level"),
            }
        }

        config
    }

    /// Configuration from a JSON file, missing fields take their defaults
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = std::io::BufReader::new(std::fs::File::open(path)?);
        let config: Self = serde_json::from_reader(reader)?;
        Ok(config.sanitised())
    }

    /// Replace the data directory
    pub fn with_data_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.data_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Replace the database path
    pub fn with_db_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.db_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Replace the cache capacity
    pub fn with_cache_size(mut self, size: usize) -> Self {
        self.cache_size = size.max(1);
        self
    }

    /// Path to the database artifact
    pub fn database_path(&self) -> PathBuf {
        match &self.db_path {
            Some(path) => path.clone(),
            None => self.data_dir.join(DATABASE_FILE),
        }
    }

    /// Path to a file inside the data directory
    pub fn data_file(&self, name: &str) -> PathBuf {
        self.data_dir.join(name)
    }

    /// Options for the source parsers
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            skip_warn_fraction: self.skip_warn_fraction,
            ..Default::default()
        }
    }

    /// Minimum delay between download requests
    pub fn request_delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.request_delay_s).unwrap_or_default()
    }

    /// Log verbosity as a filter, `info` if unrecognised
    pub fn log_level_filter(&self) -> LevelFilter {
        LevelFilter::from_str(&self.log_level).unwrap_or(LevelFilter::Info)
    }

    /// Clamp values to their minimums
    fn sanitised(mut self) -> Self {
        self.cache_size = self.cache_size.max(1);
        self.download_timeout_s = self.download_timeout_s.max(1);
        if !self.request_delay_s.is_finite() || self.request_delay_s < 0.0 {
            self.request_delay_s = 0.0;
        }
        self
    }
}

/// Parse an environment value, warning and ignoring anything invalid
fn parsed_var<T, F, V>(lookup: &F, key: &str, valid: V) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
    V: Fn(&T) -> bool,
{
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(value) if valid(&value) => Some(value),
        _ => {
            warn!("Ignoring {key}={raw:?}, using the default");
            None
        }
    }
}
