//! Integration tests for the source parsers against the fixture tables

use nmass_tables::{
    read_csv, write_csv, AmeParser, AmeRow, Error, FrdmParser, FrdmRow, IsomerState,
    NubaseParser, NubaseRow, ParseOptions, SourceParser, TableRow,
};
use rstest::{fixture, rstest};

#[fixture]
fn ame() -> AmeParser {
    AmeParser::new("./data/mass_1.mas20.txt")
}

#[fixture]
fn frdm() -> FrdmParser {
    FrdmParser::new("./data/frdm2012.txt")
}

#[fixture]
fn nubase() -> NubaseParser {
    NubaseParser::new("./data/nubase_4.mas20.txt")
}

#[rstest]
fn ame_statistics(ame: AmeParser) {
    assert!(ame.stats().is_none());
    let rows = ame.parse().unwrap();
    let stats = ame.stats().unwrap();

    assert_eq!(rows.len(), 22);
    assert_eq!(stats.parsed, 22);
    assert_eq!(stats.rejected, 1);
    assert_eq!(stats.skipped_malformed, 1);
    assert_eq!(stats.skipped_short, 1);
    assert_eq!(stats.duplicates, 0);
}

#[rstest]
fn frdm_statistics(frdm: FrdmParser) {
    let rows = frdm.parse().unwrap();
    let stats = frdm.stats().unwrap();

    assert_eq!(rows.len(), 18);
    assert_eq!(stats.rejected, 1);
    assert_eq!(stats.skipped_malformed, 1);
    assert_eq!(rows.iter().filter(|r| r.is_extrapolated()).count(), 3);
}

#[rstest]
fn nubase_statistics(nubase: NubaseParser) {
    let rows = nubase.parse().unwrap();
    let stats = nubase.stats().unwrap();

    assert_eq!(rows.len(), 15);
    assert_eq!(stats.skipped_malformed, 1);
    assert_eq!(stats.skipped_short, 1);
    assert_eq!(rows.iter().filter(|r| !r.isomer.is_ground()).count(), 1);
}

#[rstest]
fn parse_is_memoized(ame: AmeParser) {
    let first = ame.parse().unwrap();
    let second = ame.parse().unwrap();
    assert!(std::ptr::eq(first, second));
}

#[rstest]
fn rows_keep_file_order(ame: AmeParser, frdm: FrdmParser) {
    let ame_rows = ame.parse().unwrap();
    assert_eq!((ame_rows[0].z, ame_rows[0].n), (0, 1));
    assert_eq!((ame_rows[21].z, ame_rows[21].n), (92, 146));

    let frdm_rows = frdm.parse().unwrap();
    assert_eq!((frdm_rows[0].z, frdm_rows[0].n), (26, 28));
    assert_eq!((frdm_rows[17].z, frdm_rows[17].n), (120, 184));
}

#[rstest]
fn every_row_is_consistent(ame: AmeParser, frdm: FrdmParser, nubase: NubaseParser) {
    assert!(ame.parse().unwrap().iter().all(|r| r.z + r.n == r.a));
    assert!(frdm.parse().unwrap().iter().all(|r| r.z + r.n == r.a));
    assert!(nubase.parse().unwrap().iter().all(|r| r.z + r.n == r.a));
}

#[rstest]
fn estimated_values_are_flagged(ame: AmeParser, nubase: NubaseParser) {
    let iron72 = ame
        .parse()
        .unwrap()
        .iter()
        .find(|r| r.z == 26 && r.n == 46)
        .unwrap();
    assert!(iron72.mass_excess_estimated);
    assert_eq!(iron72.mass_excess_kev, Some(-40070.0));
    assert!(iron72.binding_per_a_estimated);
    assert!(iron72.atomic_mass_estimated);
    assert!(!iron72.beta_energy_estimated);

    let mut measured = ame.parse().unwrap().iter().filter(|r| !r.mass_excess_estimated);
    assert!(measured.clone().all(|r| !r.binding_per_a_estimated));
    assert!(measured.all(|r| !r.atomic_mass_estimated));

    let iron72 = nubase
        .parse()
        .unwrap()
        .iter()
        .find(|r| r.z == 26 && r.n == 46)
        .unwrap();
    assert!(iron72.mass_excess_estimated);
    assert!(iron72.half_life_estimated);
}

#[rstest]
#[case(0, 1, Some(false), "609.8 s")] // free neutron
#[case(1, 0, Some(true), "stbl")] // hydrogen
#[case(26, 30, Some(true), "stbl")] // iron-56
#[case(26, 29, Some(false), "2.744 y")] // iron-55
#[case(92, 146, Some(false), "4.468 Gy")] // uranium-238
#[case(2, 3, Some(false), "602 ys")] // helium-5
#[case(82, 125, None, "")] // lead-207 is not in the fixture
fn nubase_half_lives(
    nubase: NubaseParser,
    #[case] z: u16,
    #[case] n: u16,
    #[case] stable: Option<bool>,
    #[case] half_life: &str,
) {
    let row = nubase
        .parse()
        .unwrap()
        .iter()
        .find(|r| r.z == z && r.n == n && r.isomer == IsomerState::Ground);
    assert_eq!(row.map(|r| r.is_stable), stable);
    if let Some(row) = row {
        assert_eq!(row.half_life, half_life);
        assert_eq!(row.half_life_s.is_some(), !row.is_stable);
    }
}

#[test]
fn missing_source_has_remediation() {
    let parser = NubaseParser::new("./data/does_not_exist.txt");
    match parser.parse() {
        Err(Error::MissingSource { path, remediation }) => {
            assert!(path.ends_with("does_not_exist.txt"));
            assert!(remediation.contains("nmass fetch"));
        }
        other => panic!("expected a missing source error, got {other:?}"),
    }
}

#[test]
fn malformed_warning_threshold_is_configurable() {
    // Treat the whole AME header as data, which is almost entirely malformed
    let options = ParseOptions {
        header_lines: 0,
        skip_warn_fraction: 0.5,
    };
    let parser = AmeParser::new("./data/mass_1.mas20.txt").with_options(options);
    let rows = parser.parse().unwrap();
    let stats = parser.stats().unwrap();

    assert_eq!(rows.len(), 22);
    assert!(stats.skipped_malformed > 30);
    assert!(stats.malformed_fraction() > options.skip_warn_fraction);
}

#[rstest]
fn csv_round_trip_preserves_rows(ame: AmeParser, frdm: FrdmParser, nubase: NubaseParser) {
    let dir = tempfile::tempdir().unwrap();

    let path = dir.path().join("ame2020.csv");
    write_csv(&path, ame.parse().unwrap()).unwrap();
    let back: Vec<AmeRow> = read_csv(&path).unwrap();
    assert_eq!(back.as_slice(), ame.parse().unwrap());

    let path = dir.path().join("frdm2012.csv");
    write_csv(&path, frdm.parse().unwrap()).unwrap();
    let back: Vec<FrdmRow> = read_csv(&path).unwrap();
    assert_eq!(back.as_slice(), frdm.parse().unwrap());

    let path = dir.path().join("nubase2020.csv");
    write_csv(&path, nubase.parse().unwrap()).unwrap();
    let back: Vec<NubaseRow> = read_csv(&path).unwrap();
    assert_eq!(back.as_slice(), nubase.parse().unwrap());
}

#[test]
fn empty_tables_keep_their_header() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.csv");
    write_csv::<FrdmRow, _>(&path, &[]).unwrap();

    let header = std::fs::read_to_string(&path).unwrap();
    assert_eq!(header.trim(), FrdmRow::COLUMNS.join(","));
    assert!(read_csv::<FrdmRow, _>(&path).unwrap().is_empty());
}

#[test]
fn schema_drift_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("drifted.csv");
    std::fs::write(&path, "z,n,a,element\n26,30,56,Fe\n").unwrap();

    match read_csv::<AmeRow, _>(&path) {
        Err(Error::SchemaMismatch { missing, .. }) => {
            assert!(missing.contains(&"mass_excess_kev".to_string()));
            assert!(!missing.contains(&"element".to_string()));
        }
        other => panic!("expected a schema mismatch, got {other:?}"),
    }
}

#[test]
fn inconsistent_csv_rows_are_dropped() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("inconsistent.csv");

    let good = AmeRow {
        z: 26,
        n: 30,
        a: 56,
        ..Default::default()
    };
    let bad = AmeRow {
        z: 26,
        n: 30,
        a: 57,
        ..Default::default()
    };
    write_csv(&path, &[good.clone(), bad]).unwrap();

    let rows: Vec<AmeRow> = read_csv(&path).unwrap();
    assert_eq!(rows, vec![good]);
}
