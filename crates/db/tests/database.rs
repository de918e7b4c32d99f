//! Integration tests for the fused database built from the fixture tables

use std::path::Path;
use std::sync::Arc;

use nmass_db::{
    Config, Error, IsomerState, LruMassCache, MassCache, NuclearDatabase, Nuclide, Prefer,
    SourceTables, AME_CSV, AME_FILE, FRDM_FILE, NUBASE_FILE,
};
use nmass_tables::NubaseRow;
use rstest::{fixture, rstest};
use tempfile::TempDir;

const FIXTURES: &str = "../tables/data";

/// Database built in a scratch directory, alive as long as the directory
struct Scratch {
    dir: TempDir,
    db: NuclearDatabase,
}

impl Scratch {
    fn config(&self) -> Config {
        self.db.config().clone()
    }
}

fn copy_sources(dir: &Path) {
    for name in [AME_FILE, FRDM_FILE, NUBASE_FILE] {
        std::fs::copy(Path::new(FIXTURES).join(name), dir.join(name)).unwrap();
    }
}

#[fixture]
fn scratch() -> Scratch {
    let dir = tempfile::tempdir().unwrap();
    copy_sources(dir.path());
    let config = Config::default().with_data_dir(dir.path());
    let db = NuclearDatabase::init(config, false).unwrap();
    Scratch { dir, db }
}

fn close(value: Option<f64>, expected: f64, tolerance: f64) -> bool {
    value.is_some_and(|v| (v - expected).abs() < tolerance)
}

#[rstest]
fn summary_counts(scratch: Scratch) {
    let summary = scratch.db.summary().unwrap();
    assert_eq!(summary.ame_rows, 22);
    assert_eq!(summary.frdm_rows, 18);
    assert_eq!(summary.nubase_rows, 15);
    assert_eq!(summary.nuclides, 26);
    assert_eq!(summary.experimental, 22);
    assert_eq!(summary.theoretical, 18);
    assert_eq!(summary.both, 16);
    assert_eq!(summary.predicted_only, 2);
    assert_eq!(summary.decay_data, 14);
    assert_eq!(summary.isomers, 1);
    assert_eq!(summary.stable, 5);
}

#[rstest]
fn normalized_tables_written(scratch: Scratch) {
    assert!(scratch.dir.path().join(AME_CSV).exists());
    let tables = SourceTables::from_csv(&scratch.config()).unwrap();
    assert_eq!(tables.ame.len(), 22);
    assert_eq!(tables.frdm.len(), 18);
    assert_eq!(tables.nubase.len(), 15);
}

#[rstest]
fn flags_follow_source_fields(scratch: Scratch) {
    let session = scratch.db.session().unwrap();
    let records = session.select_where("1 = 1").unwrap();
    assert_eq!(records.len(), 26);

    for r in &records {
        assert_eq!(r.a, r.z + r.n, "{}", r.name());
        assert_eq!(r.has_experimental, r.mass_excess_exp_kev.is_some());
        assert_eq!(r.has_theoretical, r.mass_excess_th_kev.is_some());
        assert_eq!(r.has_decay_data, r.half_life.is_some());
        assert_eq!(
            r.exp_minus_th_kev.is_some(),
            r.has_experimental && r.has_theoretical
        );
        assert_eq!(r.mass_excess_exp_estimated.is_some(), r.has_experimental);
        assert_eq!(r.mass_excess_th_estimated.is_some(), r.has_theoretical);
        assert_eq!(r.binding_per_a_estimated.is_some(), r.binding_per_a_kev.is_some());
        assert_eq!(r.beta_energy_estimated.is_some(), r.beta_energy_kev.is_some());
        assert_eq!(r.atomic_mass_estimated.is_some(), r.atomic_mass_micro_u.is_some());
    }
}

#[rstest]
fn estimated_columns_survive_the_build(scratch: Scratch) {
    let session = scratch.db.session().unwrap();

    let fe72 = session.nuclide(26, 46).unwrap();
    assert_eq!(fe72.mass_excess_exp_estimated, Some(true));
    assert_eq!(fe72.binding_per_a_estimated, Some(true));
    assert_eq!(fe72.atomic_mass_estimated, Some(true));
    assert_eq!(fe72.beta_energy_estimated, None);
    assert!(fe72.to_string().contains("keV (estimated)"));

    let fe56 = session.nuclide(26, 30).unwrap();
    assert_eq!(fe56.binding_per_a_estimated, Some(false));
    assert_eq!(fe56.atomic_mass_estimated, Some(false));

    let isomer = &session.isomers(50).unwrap()[0];
    assert!(!isomer.excitation_estimated);
}

#[rstest]
fn iron_56(scratch: Scratch) {
    let session = scratch.db.session().unwrap();
    let fe56 = session.nuclide(26, 30).unwrap();

    assert_eq!(fe56.name(), "Fe56");
    assert!(close(fe56.mass_excess_exp_kev, -60607.8, 1e-6));
    assert!(close(fe56.mass_excess_th_kev, -60390.0, 1e-6));
    assert!(close(fe56.exp_minus_th_kev, -217.8, 1e-6));
    assert_eq!(fe56.mass_excess_exp_estimated, Some(false));
    assert_eq!(fe56.mass_excess_th_estimated, Some(false));
    assert_eq!(fe56.is_stable, Some(true));
    assert_eq!(fe56.spin_parity.as_deref(), Some("0+"));

    let me = session.mass_excess(26, 30, Prefer::Experimental).unwrap();
    assert!(close(me, -60.6, 0.1));
    let th = session.mass_excess(26, 30, Prefer::Theoretical).unwrap();
    assert!(close(th, -60.39, 1e-6));

    let json = fe56.to_json().unwrap();
    assert!(json.contains("\"mass_excess_exp_kev\": -60607.8"));
    assert!(fe56.to_string().starts_with("Fe56 (Z=26, N=30, A=56)"));
}

#[rstest]
fn lead_208_is_spherical(scratch: Scratch) {
    let session = scratch.db.session().unwrap();
    let pb208 = session.nuclide(82, 126).unwrap();
    assert!(pb208.beta2.is_some_and(|b| b.abs() < 0.1));
}

#[rstest]
fn tin_shell_closure(scratch: Scratch) {
    let session = scratch.db.session().unwrap();
    let prefer = Prefer::Experimental;
    let s2n_132 = session.s_2n(50, 82, prefer).unwrap().unwrap();
    let s2n_134 = session.s_2n(50, 84, prefer).unwrap().unwrap();

    assert!((s2n_132 - 12.557).abs() < 0.01);
    assert!(s2n_132 > s2n_134);
}

#[rstest]
fn uranium_alpha_decay(scratch: Scratch) {
    let session = scratch.db.session().unwrap();
    let prefer = Prefer::Experimental;

    let q = session
        .q_value(
            Nuclide::new(92, 146),
            Nuclide::new(90, 144),
            Nuclide::new(2, 2),
            prefer,
        )
        .unwrap();
    assert!(close(q, 4.270, 0.001));

    // unbound to alpha emission, hence the decay
    let s_alpha = session.s_alpha(92, 146, prefer).unwrap().unwrap();
    assert!(s_alpha < 0.0);
    assert!((s_alpha + q.unwrap()).abs() < 1e-9);
}

#[rstest]
fn neutron_capture_q_value(scratch: Scratch) {
    let session = scratch.db.session().unwrap();
    let q = session
        .q_value(
            Nuclide::new(26, 30),
            Nuclide::new(26, 31),
            Nuclide::new(0, 0),
            Prefer::Experimental,
        )
        .unwrap();
    assert!(close(q, 7.6436, 0.001));
}

#[rstest]
fn separation_bundle(scratch: Scratch) {
    let session = scratch.db.session().unwrap();
    let energies = session
        .separation_energies(26, 31, Prefer::Experimental)
        .unwrap();

    assert!(close(energies.s_n, 7.6436, 0.001));
    // no Mn56 or Cr55 in the fixtures
    assert_eq!(energies.s_p, None);
    assert_eq!(energies.s_2p, None);
    assert!(energies.s_2n.is_some());
}

#[rstest]
#[case(26, 0)]
#[case(0, 1)]
#[case(1, 1)]
#[case(1, 0)]
fn separation_domains(scratch: Scratch, #[case] z: u16, #[case] n: u16) {
    let session = scratch.db.session().unwrap();
    let prefer = Prefer::Experimental;

    if n < 1 {
        assert_eq!(session.s_n(z, n, prefer).unwrap(), None);
    }
    if n < 2 {
        assert_eq!(session.s_2n(z, n, prefer).unwrap(), None);
    }
    if z < 1 {
        assert_eq!(session.s_p(z, n, prefer).unwrap(), None);
    }
    if z < 2 {
        assert_eq!(session.s_2p(z, n, prefer).unwrap(), None);
    }
    if z < 2 || n < 2 {
        assert_eq!(session.s_alpha(z, n, prefer).unwrap(), None);
    }
}

#[rstest]
fn out_of_range_parameters(scratch: Scratch) {
    let session = scratch.db.session().unwrap();

    assert!(matches!(
        session.mass_excess(300, 10, Prefer::Experimental),
        Err(Error::Parameter { field: "Z", .. })
    ));
    assert!(matches!(
        session.isotones(251),
        Err(Error::Parameter { field: "N", .. })
    ));
    assert!(matches!(
        session.isobars(0),
        Err(Error::Parameter { field: "A", .. })
    ));
    assert!(matches!(
        session.deformed(f64::NAN),
        Err(Error::Parameter { .. })
    ));
    assert!(matches!(
        session.compare_masses(-1.0),
        Err(Error::Parameter { .. })
    ));
    assert!(matches!(
        session.by_half_life(10.0, 1.0),
        Err(Error::Parameter { field: "max_s", .. })
    ));
    assert!(matches!(
        session.q_value(
            Nuclide::new(92, 146),
            Nuclide::new(26, 30),
            Nuclide::new(0, 0),
            Prefer::Experimental
        ),
        Err(Error::Parameter {
            field: "projectile",
            ..
        })
    ));
}

#[rstest]
fn not_found_suggests_neighbours(scratch: Scratch) {
    let session = scratch.db.session().unwrap();

    match session.nuclide(26, 40) {
        Err(Error::NotFound { z, n, suggestions }) => {
            assert_eq!((z, n), (26, 40));
            assert_eq!(suggestions, vec![46, 31, 49, 30, 29]);
        }
        other => panic!("expected not found, got {other:?}"),
    }

    let message = session.nuclide(26, 40).unwrap_err().to_string();
    assert!(message.contains("available for Z=26: N=46, N=31"));

    match session.nuclide(40, 50) {
        Err(Error::NotFound { suggestions, .. }) => assert!(suggestions.is_empty()),
        other => panic!("expected not found, got {other:?}"),
    }

    assert!(session.find_nuclide(40, 50).unwrap().is_none());
    assert_eq!(session.mass_excess(40, 50, Prefer::Experimental).unwrap(), None);
}

#[rstest]
fn chains_are_ordered(scratch: Scratch) {
    let session = scratch.db.session().unwrap();

    let iron = session.isotopes(26).unwrap();
    let n = iron.iter().map(|r| r.n).collect::<Vec<u16>>();
    assert_eq!(n, vec![28, 29, 30, 31, 46, 49]);

    let isotones = session.isotones(126).unwrap();
    let z = isotones.iter().map(|r| r.z).collect::<Vec<u16>>();
    assert_eq!(z, vec![81, 82]);

    let isobars = session.isobars(234).unwrap();
    let names = isobars.iter().map(|r| r.name()).collect::<Vec<String>>();
    assert_eq!(names, vec!["Th234", "U234"]);
}

#[rstest]
fn element_overview(scratch: Scratch) {
    let session = scratch.db.session().unwrap();

    let iron = session.element(26).unwrap();
    assert_eq!(iron.symbol, "Fe");
    assert_eq!(iron.nuclides, 6);
    assert_eq!(iron.experimental, 5);
    assert_eq!(iron.predicted_only, 1);
    assert_eq!(iron.n_range, (28, 49));
    assert_eq!(iron.stable, vec!["Fe56", "Fe57"]);
    assert_eq!(iron.isomers, 0);
    assert!(!iron.magic);
    assert!(iron.to_string().starts_with("Fe (Z=26)"));

    let tin = session.element(50).unwrap();
    assert_eq!((tin.nuclides, tin.isomers), (5, 1));
    assert!(tin.stable.is_empty());
    assert!(tin.magic);
    assert!(tin.to_json().unwrap().contains("\"magic\": true"));

    assert!(matches!(
        session.element(40),
        Err(Error::Parameter { field: "Z", .. })
    ));
    assert!(matches!(
        session.element(300),
        Err(Error::Parameter { field: "Z", .. })
    ));
}

#[rstest]
fn deformation_and_predictions(scratch: Scratch) {
    let session = scratch.db.session().unwrap();

    let deformed = session.deformed(0.2).unwrap();
    let names = deformed.iter().map(|r| r.name()).collect::<Vec<String>>();
    assert_eq!(names, vec!["Fe75", "U238", "Th234", "U234"]);

    let predicted = session.predicted_only().unwrap();
    let ids = predicted
        .iter()
        .map(|r| (r.z, r.n))
        .collect::<Vec<(u16, u16)>>();
    assert_eq!(ids, vec![(26, 49), (120, 184)]);
    assert!(predicted.iter().all(|r| r.mass_excess_th_estimated == Some(true)));
}

#[rstest]
fn mass_comparison_partitions(scratch: Scratch) {
    let session = scratch.db.session().unwrap();

    let outliers = session.mass_outliers(300.0).unwrap();
    let agree = session.compare_masses(300.0).unwrap();
    assert_eq!(outliers.len() + agree.len(), 16);
    assert_eq!(outliers.len(), 1);
    assert_eq!(outliers[0].name(), "Pb208");

    let close_agreement = session.compare_masses(100.0).unwrap();
    let names = close_agreement
        .iter()
        .map(|r| r.name())
        .collect::<Vec<String>>();
    assert_eq!(names, vec!["Sn132", "Sn133"]);
}

#[rstest]
fn decay_queries(scratch: Scratch) {
    let session = scratch.db.session().unwrap();

    let isomers = session.isomers(50).unwrap();
    assert_eq!(isomers.len(), 1);
    assert_eq!(isomers[0].isomer, IsomerState::Excited(1));
    assert_eq!(isomers[0].name(), "Sn130m");
    assert!(close(isomers[0].excitation_kev, 1946.88, 1e-6));

    let stable = session.stable_nuclides(true).unwrap();
    let names = stable.iter().map(|r| r.name()).collect::<Vec<String>>();
    assert_eq!(names, vec!["H1", "He4", "Fe56", "Fe57", "Pb208"]);

    let window = session.by_half_life(1.0, 3600.0).unwrap();
    let names = window.iter().map(|r| r.name()).collect::<Vec<String>>();
    assert_eq!(names, vec!["Sn132", "Sn130m", "Sn130", "n1"]);

    let alpha = session.by_decay_mode("A", true).unwrap();
    assert_eq!(alpha.len(), 1);
    assert_eq!(alpha[0].mode_codes(), vec!["A", "SF"]);
    assert_eq!(session.by_decay_mode("B-", true).unwrap().len(), 6);
    assert!(session.by_decay_mode(" ", false).is_err());

    let uranium = session.decay(92, 146).unwrap().unwrap();
    assert_eq!(uranium.discovery_year, Some(1896));
    assert!(session.decay(92, 142).unwrap().is_none());
}

#[rstest]
fn decay_modes_match_any_case_and_state(scratch: Scratch) {
    let session = scratch.db.session().unwrap();

    // lower case partial code finds every beta branch, the isomer included
    let beta = session.by_decay_mode("b", false).unwrap();
    let names = beta.iter().map(|r| r.name()).collect::<Vec<String>>();
    assert_eq!(
        names,
        vec!["n1", "H3", "Fe72", "Sn130", "Sn130m", "Sn132", "Th234"]
    );

    let ground = session.by_decay_mode("b", true).unwrap();
    assert_eq!(ground.len(), 6);
    assert!(ground.iter().all(|r| r.isomer.is_ground()));

    let fission = session.by_decay_mode("sf", false).unwrap();
    assert_eq!(fission.len(), 1);
    assert_eq!(fission[0].name(), "U238");

    // wildcards are literal
    assert!(session.by_decay_mode("%", false).unwrap().is_empty());
}

#[rstest]
fn stable_isomers_are_listed(mut scratch: Scratch) {
    let mut tables = SourceTables::from_csv(&scratch.config()).unwrap();
    tables.nubase.push(NubaseRow {
        z: 73,
        n: 107,
        a: 180,
        symbol: "Ta".to_string(),
        isomer: IsomerState::Excited(1),
        mass_excess_kev: Some(-48859.5),
        excitation_kev: Some(77.2),
        half_life: "stbl".to_string(),
        is_stable: true,
        spin_parity: "9-".to_string(),
        decay_modes: "IS=0.01201 32".to_string(),
        ..Default::default()
    });
    scratch.db.rebuild_from(&tables).unwrap();

    let session = scratch.db.session().unwrap();
    let every_state = session.stable_nuclides(false).unwrap();
    let names = every_state.iter().map(|r| r.name()).collect::<Vec<String>>();
    assert_eq!(names, vec!["H1", "He4", "Fe56", "Fe57", "Ta180m", "Pb208"]);

    let ground = session.stable_nuclides(true).unwrap();
    assert!(ground.iter().all(|r| r.name() != "Ta180m"));
    assert_eq!(ground.len(), 5);

    let isotopic = session.by_decay_mode("is", false).unwrap();
    assert!(isotopic.iter().any(|r| r.name() == "Ta180m"));
}

#[rstest]
fn raw_predicate(scratch: Scratch) {
    let session = scratch.db.session().unwrap();

    let heavy = session
        .select_where("has_decay_data AND z > 80")
        .unwrap();
    let names = heavy.iter().map(|r| r.name()).collect::<Vec<String>>();
    assert_eq!(names, vec!["Pb208", "Th234", "U238"]);

    assert!(matches!(session.select_where(""), Err(Error::Parameter { .. })));
    assert!(matches!(
        session.select_where("no_such_column = 1"),
        Err(Error::Sql(_))
    ));
}

#[rstest]
fn cached_lookups_are_idempotent(scratch: Scratch) {
    let session = scratch.db.session().unwrap();
    let prefer = Prefer::Experimental;

    let first = session.mass_excess(50, 82, prefer).unwrap();
    let second = session.mass_excess(50, 82, prefer).unwrap();
    assert_eq!(first, second);

    // misses are cached too
    assert_eq!(session.mass_excess(40, 50, prefer).unwrap(), None);
    assert_eq!(session.mass_excess(40, 50, prefer).unwrap(), None);

    let stats = scratch.db.cache().stats();
    assert_eq!(stats.entries, 2);
    assert_eq!(stats.hits, 2);
    assert_eq!(stats.misses, 2);
}

#[rstest]
fn injected_cache_is_used() {
    let dir = tempfile::tempdir().unwrap();
    copy_sources(dir.path());
    let config = Config::default().with_data_dir(dir.path());
    NuclearDatabase::init(config.clone(), false).unwrap();

    let cache = Arc::new(LruMassCache::new(1));
    let db = NuclearDatabase::open_with_cache(config, cache.clone()).unwrap();
    let session = db.session().unwrap();
    session.binding_energy(26, 30, Prefer::Experimental).unwrap();
    session.binding_energy(26, 31, Prefer::Experimental).unwrap();

    let stats = cache.stats();
    assert_eq!(stats.capacity, 1);
    assert_eq!(stats.entries, 1);
    assert_eq!(stats.evictions, 1);
}

#[rstest]
fn build_with_shared_cache(scratch: Scratch) {
    let prefer = Prefer::Experimental;
    let cache = Arc::new(LruMassCache::new(16));

    let db = NuclearDatabase::open_with_cache(scratch.config(), cache.clone()).unwrap();
    let before = db.session().unwrap().mass_excess(26, 30, prefer).unwrap();
    assert!(close(before, -60.6078, 1e-6));
    assert_eq!(cache.stats().entries, 1);
    drop(db);

    let mut tables = SourceTables::from_csv(&scratch.config()).unwrap();
    for row in tables.ame.iter_mut().filter(|r| (r.z, r.n) == (26, 30)) {
        row.mass_excess_kev = Some(-60000.0);
    }

    let db = NuclearDatabase::build_with_cache(scratch.config(), &tables, cache.clone()).unwrap();
    assert_eq!(cache.stats().entries, 0);

    let after = db.session().unwrap().mass_excess(26, 30, prefer).unwrap();
    assert!(close(after, -60.0, 1e-6));
    assert_eq!(cache.stats().entries, 1);
}

#[rstest]
fn concurrent_sessions(scratch: Scratch) {
    let db = &scratch.db;
    let expected = db
        .session()
        .unwrap()
        .s_2n(50, 82, Prefer::Experimental)
        .unwrap();

    std::thread::scope(|scope| {
        let workers = (0..4)
            .map(|_| {
                scope.spawn(|| {
                    let session = db.session().unwrap();
                    (0..25)
                        .map(|_| session.s_2n(50, 82, Prefer::Experimental).unwrap())
                        .collect::<Vec<Option<f64>>>()
                })
            })
            .collect::<Vec<_>>();

        for worker in workers {
            let results = worker.join().unwrap();
            assert!(results.iter().all(|r| *r == expected));
        }
    });

    assert!(db.cache().stats().hits >= 200);
}

#[rstest]
fn rebuild_invalidates_cache(mut scratch: Scratch) {
    let prefer = Prefer::Experimental;
    let before = scratch
        .db
        .session()
        .unwrap()
        .mass_excess(26, 30, prefer)
        .unwrap();
    assert!(close(before, -60.6078, 1e-6));

    let mut tables = SourceTables::from_csv(&scratch.config()).unwrap();
    for row in tables.ame.iter_mut().filter(|r| (r.z, r.n) == (26, 30)) {
        row.mass_excess_kev = Some(-60000.0);
    }

    let summary = scratch.db.rebuild_from(&tables).unwrap();
    assert_eq!(summary.nuclides, 26);

    let after = scratch
        .db
        .session()
        .unwrap()
        .mass_excess(26, 30, prefer)
        .unwrap();
    assert!(close(after, -60.0, 1e-6));
}

#[rstest]
fn rebuild_is_deterministic(mut scratch: Scratch) {
    let session = scratch.db.session().unwrap();
    let before = session.select_where("1 = 1").unwrap();
    drop(session);

    scratch.db.rebuild().unwrap();
    let after = scratch.db.session().unwrap().select_where("1 = 1").unwrap();
    assert_eq!(before, after);
}

#[rstest]
fn failed_rebuild_keeps_existing(mut scratch: Scratch) {
    let result = scratch.db.rebuild_from(&SourceTables::default());
    assert!(matches!(result, Err(Error::DataCorrupt { .. })));

    // still the previous artifact, and no temporary files left behind
    assert_eq!(scratch.db.summary().unwrap().nuclides, 26);
    let leftovers = std::fs::read_dir(scratch.dir.path())
        .unwrap()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().ends_with(".tmp"))
        .count();
    assert_eq!(leftovers, 0);
}

#[rstest]
fn csv_used_when_raw_source_is_gone(mut scratch: Scratch) {
    std::fs::remove_file(scratch.dir.path().join(AME_FILE)).unwrap();
    let summary = scratch.db.rebuild().unwrap();
    assert_eq!(summary.ame_rows, 22);
}

#[test]
fn missing_sources_are_reported() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::default().with_data_dir(dir.path());

    match NuclearDatabase::init(config, false) {
        Err(Error::Tables(nmass_tables::Error::MissingSource { remediation, .. })) => {
            assert!(remediation.contains("nmass"));
        }
        other => panic!("expected missing source, got {other:?}"),
    }
}

#[test]
fn missing_database() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::default().with_data_dir(dir.path());

    let error = NuclearDatabase::open(config).unwrap_err();
    assert!(matches!(error, Error::DatabaseMissing { .. }));
    assert!(error.to_string().contains("nmass init"));
}

#[test]
fn corrupt_database() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::default().with_data_dir(dir.path());
    std::fs::write(config.database_path(), "definitely not sqlite").unwrap();

    let error = NuclearDatabase::open(config.clone()).unwrap_err();
    assert!(matches!(error, Error::DataCorrupt { .. }));
    assert!(error.to_string().contains("nmass init --rebuild"));

    // init without rebuild refuses to paper over it
    assert!(matches!(
        NuclearDatabase::init(config, false),
        Err(Error::DataCorrupt { .. })
    ));
}

#[test]
fn corrupt_database_is_replaced_on_rebuild() {
    let dir = tempfile::tempdir().unwrap();
    copy_sources(dir.path());
    let config = Config::default().with_data_dir(dir.path());
    std::fs::write(config.database_path(), "definitely not sqlite").unwrap();

    let db = NuclearDatabase::init(config, true).unwrap();
    assert_eq!(db.summary().unwrap().nuclides, 26);
}
