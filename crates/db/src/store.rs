//! Building, checking and summarising the database artifact
//!
//! The artifact is a single SQLite file holding the three normalized source
//! tables and the fused `nuclides` view over them. It is only ever replaced
//! whole, by building beside the target and renaming over it.

// standard library
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::time::Instant;

// external crates
use log::{debug, error, info};
use rusqlite::{params, Connection, OpenFlags, Transaction};

// nmass modules
use nmass_tables::{
    read_csv, write_csv, AmeParser, AmeRow, FrdmParser, FrdmRow, NubaseParser, NubaseRow,
    SourceParser,
};
use nmass_utils::f;

// internal modules
use crate::cache::DatasetId;
use crate::config::{Config, AME_CSV, AME_FILE, FRDM_CSV, FRDM_FILE, NUBASE_CSV, NUBASE_FILE};
use crate::error::{Error, Result};
use crate::record::{Summary, VIEW_COLUMNS};

const SCHEMA: &str = include_str!("sql/schema.sql");
const VIEW: &str = include_str!("sql/view.sql");

/// Name of the fused view
pub const VIEW_NAME: &str = "nuclides";

/// Names of the normalized source tables
pub const SOURCE_TABLES: [&str; 3] = ["ame2020", "frdm2012", "nubase2020"];

/// Rows of the three normalized tables
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SourceTables {
    pub ame: Vec<AmeRow>,
    pub frdm: Vec<FrdmRow>,
    pub nubase: Vec<NubaseRow>,
}

impl SourceTables {
    /// Parse the raw sources and refresh the normalized tables
    ///
    /// The three sources are parsed in parallel. Each raw file found in the
    /// data directory is parsed and written out as CSV. If a raw file is
    /// missing but its CSV is present, the existing CSV is used as is. The
    /// rows are always loaded back from the CSV files, so the schema checks
    /// apply either way.
    pub fn ingest(config: &Config) -> Result<Self> {
        let options = config.parse_options();

        let (ame, (frdm, nubase)) = rayon::join(
            || {
                let parser = AmeParser::new(config.data_file(AME_FILE)).with_options(options);
                normalize(&parser, &config.data_file(AME_CSV))
            },
            || {
                rayon::join(
                    || {
                        let parser =
                            FrdmParser::new(config.data_file(FRDM_FILE)).with_options(options);
                        normalize(&parser, &config.data_file(FRDM_CSV))
                    },
                    || {
                        let parser =
                            NubaseParser::new(config.data_file(NUBASE_FILE)).with_options(options);
                        normalize(&parser, &config.data_file(NUBASE_CSV))
                    },
                )
            },
        );

        Ok(Self {
            ame: ame?,
            frdm: frdm?,
            nubase: nubase?,
        })
    }

    /// Load the normalized tables from the data directory
    pub fn from_csv(config: &Config) -> Result<Self> {
        Ok(Self {
            ame: read_csv(config.data_file(AME_CSV))?,
            frdm: read_csv(config.data_file(FRDM_CSV))?,
            nubase: read_csv(config.data_file(NUBASE_CSV))?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.ame.is_empty() && self.frdm.is_empty() && self.nubase.is_empty()
    }
}

/// Raw source to CSV, then rows back from the CSV
fn normalize<P: SourceParser>(parser: &P, csv: &Path) -> Result<Vec<P::Row>> {
    if parser.path().exists() || !csv.exists() {
        let rows = parser.parse()?;
        write_csv(csv, rows)?;
        debug!("Wrote {} {} rows to {}", rows.len(), parser.name(), csv.display());
    } else {
        info!(
            "{} source {} not found, using {}",
            parser.name(),
            parser.path().display(),
            csv.display()
        );
    }
    Ok(read_csv(csv)?)
}

/// Build the artifact at `path` from the normalized rows
///
/// Nothing is visible at `path` until the new database has passed the
/// sanity check, at which point it atomically replaces any existing file.
pub fn build<P: AsRef<Path>>(path: P, tables: &SourceTables) -> Result<()> {
    let path = path.as_ref();
    let started = Instant::now();
    info!("Building {}", path.display());

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let temp = temp_path(path);
    if temp.exists() {
        std::fs::remove_file(&temp)?;
    }

    let result = write_database(&temp, tables).and_then(|()| {
        let conn = open_read_only(&temp)?;
        sanity_check(&conn, &temp)
    });

    match result {
        Ok(()) => {
            std::fs::rename(&temp, path)?;
            info!(
                "Built {} in {} ms",
                path.display(),
                started.elapsed().as_millis()
            );
            Ok(())
        }
        Err(e) => {
            error!("Failed to build {}: {e}", path.display());
            if let Err(cleanup) = std::fs::remove_file(&temp) {
                debug!("Could not remove {}: {cleanup}", temp.display());
            }
            Err(e)
        }
    }
}

/// Sibling path for the database under construction
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(f!(".{}.tmp", std::process::id()));
    path.with_file_name(name)
}

fn write_database(path: &Path, tables: &SourceTables) -> Result<()> {
    let mut conn = Connection::open(path)?;
    conn.execute_batch(SCHEMA)?;

    let tx = conn.transaction()?;
    insert_ame(&tx, &tables.ame)?;
    insert_frdm(&tx, &tables.frdm)?;
    insert_nubase(&tx, &tables.nubase)?;
    tx.execute_batch(VIEW)?;
    tx.commit()?;

    debug!(
        "Inserted {} ame2020, {} frdm2012, {} nubase2020 rows",
        tables.ame.len(),
        tables.frdm.len(),
        tables.nubase.len()
    );
    Ok(())
}

fn insert_ame(tx: &Transaction, rows: &[AmeRow]) -> Result<()> {
    let mut stmt = tx.prepare(
        "INSERT INTO ame2020 (
            z, n, a, element, origin,
            mass_excess_kev, mass_excess_unc_kev, mass_excess_estimated,
            binding_per_a_kev, binding_per_a_unc_kev, binding_per_a_estimated,
            beta_decay_type, beta_energy_kev, beta_energy_unc_kev, beta_energy_estimated,
            atomic_mass_micro_u, atomic_mass_unc_micro_u, atomic_mass_estimated
        ) VALUES (
            ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9,
            ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18
        )",
    )?;

    for row in rows {
        stmt.execute(params![
            row.z,
            row.n,
            row.a,
            row.element,
            row.origin,
            row.mass_excess_kev,
            row.mass_excess_unc_kev,
            row.mass_excess_estimated,
            row.binding_per_a_kev,
            row.binding_per_a_unc_kev,
            row.binding_per_a_estimated,
            row.beta_decay_type,
            row.beta_energy_kev,
            row.beta_energy_unc_kev,
            row.beta_energy_estimated,
            row.atomic_mass_micro_u,
            row.atomic_mass_unc_micro_u,
            row.atomic_mass_estimated,
        ])?;
    }
    Ok(())
}

fn insert_frdm(tx: &Transaction, rows: &[FrdmRow]) -> Result<()> {
    let mut stmt = tx.prepare(
        "INSERT INTO frdm2012 (
            z, n, a, eps2, eps3, eps4, eps6, beta2, beta3, beta4, beta6,
            shell_pairing_mev, microscopic_mev, binding_mev, mass_excess_mev,
            mass_exp_mev, mass_exp_unc_mev, microscopic_fl_mev, mass_excess_fl_mev
        ) VALUES (
            ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10,
            ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19
        )",
    )?;

    for row in rows {
        stmt.execute(params![
            row.z,
            row.n,
            row.a,
            row.eps2,
            row.eps3,
            row.eps4,
            row.eps6,
            row.beta2,
            row.beta3,
            row.beta4,
            row.beta6,
            row.shell_pairing_mev,
            row.microscopic_mev,
            row.binding_mev,
            row.mass_excess_mev,
            row.mass_exp_mev,
            row.mass_exp_unc_mev,
            row.microscopic_fl_mev,
            row.mass_excess_fl_mev,
        ])?;
    }
    Ok(())
}

fn insert_nubase(tx: &Transaction, rows: &[NubaseRow]) -> Result<()> {
    let mut stmt = tx.prepare(
        "INSERT INTO nubase2020 (
            z, n, a, symbol, isomer,
            mass_excess_kev, mass_excess_unc_kev, mass_excess_estimated,
            excitation_kev, excitation_unc_kev, excitation_estimated,
            half_life, half_life_s, half_life_unc, half_life_estimated, is_stable,
            spin_parity, discovery_year, decay_modes
        ) VALUES (
            ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10,
            ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19
        )",
    )?;

    for row in rows {
        stmt.execute(params![
            row.z,
            row.n,
            row.a,
            row.symbol,
            row.isomer.to_string(),
            row.mass_excess_kev,
            row.mass_excess_unc_kev,
            row.mass_excess_estimated,
            row.excitation_kev,
            row.excitation_unc_kev,
            row.excitation_estimated,
            row.half_life,
            row.half_life_s,
            row.half_life_unc,
            row.half_life_estimated,
            row.is_stable,
            row.spin_parity,
            row.discovery_year,
            row.decay_modes,
        ])?;
    }
    Ok(())
}

/// Read-only connection to an existing artifact
pub fn open_read_only(path: &Path) -> Result<Connection> {
    let flags = OpenFlags::SQLITE_OPEN_READ_ONLY
        | OpenFlags::SQLITE_OPEN_NO_MUTEX
        | OpenFlags::SQLITE_OPEN_URI;
    Connection::open_with_flags(path, flags).map_err(|e| Error::DataCorrupt {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Structural check of an artifact
///
/// The source tables and view must exist with every expected view column,
/// there must be at least one nuclide, and no row may have A != Z + N. Any
/// failure, including the file not being a database at all, is reported as
/// [Error::DataCorrupt].
pub fn sanity_check(conn: &Connection, path: &Path) -> Result<()> {
    let problem = match inspect(conn) {
        Ok(problem) => problem,
        Err(e) => Some(e.to_string()),
    };

    match problem {
        None => Ok(()),
        Some(reason) => {
            error!("Sanity check failed for {}: {reason}", path.display());
            Err(Error::DataCorrupt {
                path: path.to_path_buf(),
                reason,
            })
        }
    }
}

/// First structural problem found, if any
fn inspect(conn: &Connection) -> rusqlite::Result<Option<String>> {
    let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type IN ('table', 'view')")?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<String>>>()?;

    if let Some(missing) = SOURCE_TABLES
        .iter()
        .chain(std::iter::once(&VIEW_NAME))
        .find(|required| !names.iter().any(|name| name == *required))
    {
        return Ok(Some(f!("missing table or view {missing:?}")));
    }

    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info('nuclides')")?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<String>>>()?;

    let missing = VIEW_COLUMNS
        .iter()
        .filter(|column| !columns.iter().any(|name| name == *column))
        .copied()
        .collect::<Vec<&str>>();
    if !missing.is_empty() {
        return Ok(Some(f!("view is missing columns {}", missing.join(", "))));
    }

    let rows: i64 = conn.query_row("SELECT COUNT(*) FROM nuclides", [], |row| row.get(0))?;
    if rows == 0 {
        return Ok(Some("no nuclides".to_string()));
    }

    let inconsistent: i64 = conn.query_row(
        "SELECT COUNT(*) FROM nuclides WHERE a != z + n",
        [],
        |row| row.get(0),
    )?;
    if inconsistent > 0 {
        return Ok(Some(f!("{inconsistent} rows with A != Z + N")));
    }

    debug!("Sanity check passed with {rows} nuclides");
    Ok(None)
}

/// Row counts of an artifact
pub fn summary(conn: &Connection) -> Result<Summary> {
    let count = |sql: &str| -> Result<usize> { Ok(conn.query_row(sql, [], |row| row.get(0))?) };

    let mut summary = conn.query_row(
        "SELECT
            COUNT(*),
            COALESCE(SUM(has_experimental), 0),
            COALESCE(SUM(has_theoretical), 0),
            COALESCE(SUM(has_experimental AND has_theoretical), 0),
            COALESCE(SUM(has_theoretical AND NOT has_experimental), 0),
            COALESCE(SUM(has_decay_data), 0),
            COALESCE(SUM(is_stable), 0)
         FROM nuclides",
        [],
        |row| {
            Ok(Summary {
                nuclides: row.get(0)?,
                experimental: row.get(1)?,
                theoretical: row.get(2)?,
                both: row.get(3)?,
                predicted_only: row.get(4)?,
                decay_data: row.get(5)?,
                stable: row.get(6)?,
                ..Default::default()
            })
        },
    )?;

    summary.ame_rows = count("SELECT COUNT(*) FROM ame2020")?;
    summary.frdm_rows = count("SELECT COUNT(*) FROM frdm2012")?;
    summary.nubase_rows = count("SELECT COUNT(*) FROM nubase2020")?;
    summary.isomers = count("SELECT COUNT(*) FROM nubase2020 WHERE isomer != ''")?;
    Ok(summary)
}

/// Stable identifier for the artifact at `path` within this process
pub fn dataset_id(path: &Path) -> DatasetId {
    let canonical = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    let mut hasher = DefaultHasher::new();
    canonical.hash(&mut hasher);
    hasher.finish()
}
