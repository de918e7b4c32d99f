//! Per-worker query handles

// standard library
use std::path::Path;

// external crates
use log::{debug, trace};
use rusqlite::{params, Connection, Params};

// nmass modules
use nmass_tables::Nuclide;
use nmass_utils::f;

// internal modules
use crate::cache::CacheKey;
use crate::config::Bounds;
use crate::database::NuclearDatabase;
use crate::derived::{self, MassLookup, Prefer, SeparationEnergies};
use crate::error::{Error, Result};
use crate::record::{
    view_selection, DecayRecord, ElementSummary, NuclideRecord, Summary, DECAY_SELECTION,
};
use crate::store;

/// Maximum number of neutron numbers suggested for a missing nuclide
const SUGGESTIONS: usize = 5;

/// Query handle owning its own read-only connection
///
/// Create one per worker with [NuclearDatabase::session()]. Sessions may be
/// moved to another thread but are not shared, while the mass cache behind
/// them is shared by every session of the same database.
///
/// All proton, neutron and mass numbers and thresholds are validated before
/// any SQL runs.
#[derive(Debug)]
pub struct Session<'db> {
    db: &'db NuclearDatabase,
    conn: Connection,
}

impl<'db> Session<'db> {
    pub(crate) fn new(db: &'db NuclearDatabase) -> Result<Self> {
        let conn = store::open_read_only(db.path())?;
        Ok(Self { db, conn })
    }

    fn path(&self) -> &Path {
        self.db.path()
    }

    /// Counts describing the database
    pub fn summary(&self) -> Result<Summary> {
        store::summary(&self.conn)
    }

    /// Fused record for a nuclide
    ///
    /// Fails with [Error::NotFound] listing up to five neutron numbers that
    /// are available for the same element, nearest first.
    pub fn nuclide(&self, z: u16, n: u16) -> Result<NuclideRecord> {
        match self.find_nuclide(z, n)? {
            Some(record) => Ok(record),
            None => Err(Error::NotFound {
                z,
                n,
                suggestions: self.suggestions(z, n)?,
            }),
        }
    }

    /// Fused record for a nuclide, `None` if no source has it
    pub fn find_nuclide(&self, z: u16, n: u16) -> Result<Option<NuclideRecord>> {
        derived::validate(&self.bounds(), z, n)?;
        let mut records = self.records("z = ?1 AND n = ?2", "z", params![z, n])?;
        Ok(records.pop())
    }

    /// Every nuclide of an element, ordered by N
    pub fn isotopes(&self, z: u16) -> Result<Vec<NuclideRecord>> {
        self.bounds().check_z(z)?;
        self.records("z = ?1", "n", params![z])
    }

    /// Overview of an element from its isotopes and isomers
    ///
    /// An element with no nuclides at all in the database is a
    /// [Error::Parameter] on Z.
    pub fn element(&self, z: u16) -> Result<ElementSummary> {
        let isotopes = self.isotopes(z)?;
        if isotopes.is_empty() {
            return Err(Error::parameter(
                "Z",
                z,
                "no nuclides of this element in the database",
            ));
        }
        let isomers = self.isomers(z)?.len();
        Ok(ElementSummary::from_isotopes(z, &isotopes, isomers))
    }

    /// Every nuclide with `n` neutrons, ordered by Z
    pub fn isotones(&self, n: u16) -> Result<Vec<NuclideRecord>> {
        self.bounds().check_n(n)?;
        self.records("n = ?1", "z", params![n])
    }

    /// Every nuclide with mass number `a`, ordered by Z
    pub fn isobars(&self, a: u16) -> Result<Vec<NuclideRecord>> {
        self.bounds().check_a(a)?;
        self.records("a = ?1", "z", params![a])
    }

    /// Nuclides with a quadrupole deformation of at least `min_beta2`
    /// in magnitude, most deformed first
    pub fn deformed(&self, min_beta2: f64) -> Result<Vec<NuclideRecord>> {
        check_threshold("min_beta2", min_beta2)?;
        self.records(
            "beta2 IS NOT NULL AND ABS(beta2) >= ?1",
            "ABS(beta2) DESC, z, n",
            params![min_beta2],
        )
    }

    /// Nuclides with only a theoretical mass
    pub fn predicted_only(&self) -> Result<Vec<NuclideRecord>> {
        self.records("has_theoretical AND NOT has_experimental", "z, n", [])
    }

    /// Nuclides where experiment and theory agree within `tolerance_kev`,
    /// largest difference first
    pub fn compare_masses(&self, tolerance_kev: f64) -> Result<Vec<NuclideRecord>> {
        check_threshold("tolerance_kev", tolerance_kev)?;
        self.records(
            "exp_minus_th_kev IS NOT NULL AND ABS(exp_minus_th_kev) <= ?1",
            "ABS(exp_minus_th_kev) DESC, z, n",
            params![tolerance_kev],
        )
    }

    /// Nuclides where experiment and theory differ by more than
    /// `tolerance_kev`, largest difference first
    pub fn mass_outliers(&self, tolerance_kev: f64) -> Result<Vec<NuclideRecord>> {
        check_threshold("tolerance_kev", tolerance_kev)?;
        self.records(
            "exp_minus_th_kev IS NOT NULL AND ABS(exp_minus_th_kev) > ?1",
            "ABS(exp_minus_th_kev) DESC, z, n",
            params![tolerance_kev],
        )
    }

    /// Nuclides matching an arbitrary SQL predicate over the view columns
    ///
    /// For example `"has_decay_data AND beta2 > 0.2"`. The connection is
    /// read-only and only a single statement is accepted.
    pub fn select_where(&self, predicate: &str) -> Result<Vec<NuclideRecord>> {
        if predicate.trim().is_empty() {
            return Err(Error::parameter("predicate", predicate, "empty predicate"));
        }
        self.records(predicate, "z, n", [])
    }

    /// Ground state decay data for a nuclide
    pub fn decay(&self, z: u16, n: u16) -> Result<Option<DecayRecord>> {
        derived::validate(&self.bounds(), z, n)?;
        let mut records =
            self.decay_records("z = ?1 AND n = ?2 AND isomer = ''", "z", params![z, n])?;
        Ok(records.pop())
    }

    /// Isomeric states of an element, ordered by N then state
    pub fn isomers(&self, z: u16) -> Result<Vec<DecayRecord>> {
        self.bounds().check_z(z)?;
        self.decay_records("z = ?1 AND isomer != ''", "n, isomer", params![z])
    }

    /// Stable states, ordered by Z, N then state
    ///
    /// Isomers are included unless `ground_only` is set, so the long-lived
    /// Ta180m is listed alongside the stable ground states.
    pub fn stable_nuclides(&self, ground_only: bool) -> Result<Vec<DecayRecord>> {
        self.decay_records(
            "is_stable AND (NOT ?1 OR isomer = '')",
            "z, n, isomer",
            params![ground_only],
        )
    }

    /// States with a half-life within `[min_s, max_s]` seconds, shortest first
    pub fn by_half_life(&self, min_s: f64, max_s: f64) -> Result<Vec<DecayRecord>> {
        check_threshold("min_s", min_s)?;
        check_threshold("max_s", max_s)?;
        if min_s > max_s {
            return Err(Error::parameter(
                "max_s",
                max_s,
                &f!("must not be less than min_s = {min_s}"),
            ));
        }
        self.decay_records(
            "half_life_s IS NOT NULL AND half_life_s BETWEEN ?1 AND ?2",
            "half_life_s, z, n, isomer",
            params![min_s, max_s],
        )
    }

    /// States whose decay modes contain `mode`, e.g. "B-" or "a"
    ///
    /// The match is a case-insensitive substring over the published decay
    /// modes, so "b" finds every beta branch. Isomers are included unless
    /// `ground_only` is set.
    pub fn by_decay_mode(&self, mode: &str, ground_only: bool) -> Result<Vec<DecayRecord>> {
        let mode = mode.trim();
        if mode.is_empty() {
            return Err(Error::parameter("mode", mode, "empty decay mode"));
        }

        self.decay_records(
            "LOWER(decay_modes) LIKE '%' || ?1 || '%' ESCAPE '\\' \
             AND (NOT ?2 OR isomer = '')",
            "z, n, isomer",
            params![like_pattern(&mode.to_lowercase()), ground_only],
        )
    }

    /// Mass excess, preferring one source and falling back on the other
    pub fn mass_excess(&self, z: u16, n: u16, prefer: Prefer) -> Result<Option<f64>> {
        derived::mass_excess(self, z, n, prefer)
    }

    /// Total binding energy
    pub fn binding_energy(&self, z: u16, n: u16, prefer: Prefer) -> Result<Option<f64>> {
        derived::binding_energy(self, z, n, prefer)
    }

    /// One neutron separation energy
    pub fn s_n(&self, z: u16, n: u16, prefer: Prefer) -> Result<Option<f64>> {
        derived::s_n(self, z, n, prefer)
    }

    /// One proton separation energy
    pub fn s_p(&self, z: u16, n: u16, prefer: Prefer) -> Result<Option<f64>> {
        derived::s_p(self, z, n, prefer)
    }

    /// Two neutron separation energy
    pub fn s_2n(&self, z: u16, n: u16, prefer: Prefer) -> Result<Option<f64>> {
        derived::s_2n(self, z, n, prefer)
    }

    /// Two proton separation energy
    pub fn s_2p(&self, z: u16, n: u16, prefer: Prefer) -> Result<Option<f64>> {
        derived::s_2p(self, z, n, prefer)
    }

    /// Alpha separation energy
    pub fn s_alpha(&self, z: u16, n: u16, prefer: Prefer) -> Result<Option<f64>> {
        derived::s_alpha(self, z, n, prefer)
    }

    /// All separation energies at once
    pub fn separation_energies(
        &self,
        z: u16,
        n: u16,
        prefer: Prefer,
    ) -> Result<SeparationEnergies> {
        derived::separation_energies(self, z, n, prefer)
    }

    /// Reaction Q-value, see [derived::q_value()]
    pub fn q_value(
        &self,
        initial: Nuclide,
        final_state: Nuclide,
        ejectile: Nuclide,
        prefer: Prefer,
    ) -> Result<Option<f64>> {
        derived::q_value(self, initial, final_state, ejectile, prefer)
    }

    fn records<P: Params>(
        &self,
        predicate: &str,
        order: &str,
        params: P,
    ) -> Result<Vec<NuclideRecord>> {
        let sql = f!(
            "SELECT {} FROM nuclides WHERE ({predicate}) ORDER BY {order}",
            view_selection()
        );
        trace!("{sql}");

        let mut stmt = self.conn.prepare(&sql)?;
        let records = stmt
            .query_map(params, NuclideRecord::from_row)?
            .collect::<rusqlite::Result<Vec<NuclideRecord>>>()?;

        match records.iter().find(|r| !r.is_consistent()) {
            Some(r) => Err(self.inconsistent(r.z, r.n, r.a)),
            None => Ok(records),
        }
    }

    fn decay_records<P: Params>(
        &self,
        predicate: &str,
        order: &str,
        params: P,
    ) -> Result<Vec<DecayRecord>> {
        let sql = f!(
            "SELECT {} FROM nubase2020 WHERE ({predicate}) ORDER BY {order}",
            DECAY_SELECTION
        );
        trace!("{sql}");

        let mut stmt = self.conn.prepare(&sql)?;
        let records = stmt
            .query_map(params, DecayRecord::from_row)?
            .collect::<rusqlite::Result<Vec<DecayRecord>>>()?;

        match records.iter().find(|r| !r.is_consistent()) {
            Some(r) => Err(self.inconsistent(r.z, r.n, r.a)),
            None => Ok(records),
        }
    }

    fn inconsistent(&self, z: u16, n: u16, a: u16) -> Error {
        Error::DataCorrupt {
            path: self.path().to_path_buf(),
            reason: f!("row Z={z}, N={n} has A={a}"),
        }
    }

    /// Nearest available neutron numbers for an element
    fn suggestions(&self, z: u16, n: u16) -> Result<Vec<u16>> {
        let mut stmt = self
            .conn
            .prepare("SELECT n FROM nuclides WHERE z = ?1 ORDER BY ABS(n - ?2), n LIMIT ?3")?;
        let suggestions = stmt
            .query_map(params![z, n, SUGGESTIONS], |row| row.get::<_, u16>(0))?
            .collect::<rusqlite::Result<Vec<u16>>>()?;
        Ok(suggestions)
    }

    /// Both mass excesses straight from the view (keV)
    fn stored_mass_excess(&self, nuclide: Nuclide) -> Result<(Option<f64>, Option<f64>)> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT mass_excess_exp_kev, mass_excess_th_kev FROM nuclides WHERE z = ?1 AND n = ?2",
        )?;
        let mut rows = stmt.query(params![nuclide.z, nuclide.n])?;
        match rows.next()? {
            Some(row) => Ok((row.get(0)?, row.get(1)?)),
            None => Ok((None, None)),
        }
    }
}

impl MassLookup for Session<'_> {
    fn bounds(&self) -> Bounds {
        self.db.config().bounds
    }

    /// Cached mass excess, `None` results are cached as well
    fn mass_excess_kev(&self, nuclide: Nuclide, prefer: Prefer) -> Result<Option<f64>> {
        let key = CacheKey::new(self.db.dataset(), nuclide.z, nuclide.n, prefer);
        if let Some(value) = self.db.cache().get(&key) {
            return Ok(value);
        }

        let (experimental, theoretical) = self.stored_mass_excess(nuclide)?;
        let value = match prefer {
            Prefer::Experimental => experimental.or(theoretical),
            Prefer::Theoretical => theoretical.or(experimental),
        };

        debug!("Mass excess {} ({prefer}) = {value:?} keV", nuclide.name());
        self.db.cache().put(key, value);
        Ok(value)
    }
}

fn check_threshold(field: &'static str, value: f64) -> Result<f64> {
    match value.is_finite() && value >= 0.0 {
        true => Ok(value),
        false => Err(Error::parameter(field, value, "must be finite and non-negative")),
    }
}

/// Escape the LIKE wildcards so a decay mode only matches literally
fn like_pattern(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(like_pattern("b-"), "b-");
        assert_eq!(like_pattern("100%"), "100\\%");
        assert_eq!(like_pattern("a_b\\"), "a\\_b\\\\");
    }
}
