use launchdash_core::{DashError, Dataset, LaunchRecord, OutcomeClass, Result};
use std::io::Write;

fn fixture_path() -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/launches.csv")
}

fn write_csv(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write csv");
    file
}

#[test]
fn loads_fixture_with_derived_scalars() -> Result<()> {
    let ds = Dataset::load(fixture_path())?;

    assert_eq!(ds.len(), 14);
    assert_eq!(ds.min_payload(), 0.0);
    assert_eq!(ds.max_payload(), 9600.0);
    assert_eq!(
        ds.sites(),
        &["CCAFS LC-40", "VAFB SLC-4E", "KSC LC-39A", "CCAFS SLC-40"]
    );
    Ok(())
}

#[test]
fn fixture_rows_carry_optional_columns() -> Result<()> {
    let ds = Dataset::load(fixture_path())?;

    let first = &ds.records()[0];
    assert_eq!(first.flight_number, Some(1));
    assert_eq!(first.booster_version.as_deref(), Some("F9 v1.0  B0003"));
    assert_eq!(first.booster_category, "v1.0");
    assert_eq!(first.outcome, OutcomeClass::Failure);

    let missing_payload = ds
        .records()
        .iter()
        .find(|r| r.flight_number == Some(41))
        .expect("flight 41 present");
    assert_eq!(missing_payload.payload_mass_kg, None);
    Ok(())
}

#[test]
fn min_max_ignore_missing_payloads() -> Result<()> {
    let file = write_csv(
        "Launch Site,Payload Mass (kg),Booster Version Category,class\n\
         A,,FT,1\n\
         A,2500,FT,0\n\
         B,nan,B4,1\n\
         B,800,B4,1\n",
    );
    let ds = Dataset::load(file.path())?;
    assert_eq!(ds.min_payload(), 800.0);
    assert_eq!(ds.max_payload(), 2500.0);
    assert_eq!(ds.len(), 4);
    Ok(())
}

#[test]
fn missing_file_is_data_unavailable() {
    let err = Dataset::load("/definitely/not/here.csv").unwrap_err();
    assert!(matches!(err, DashError::DataUnavailable(_)), "got {err:?}");
}

#[test]
fn missing_required_column_is_data_unavailable() {
    let file = write_csv("Launch Site,Booster Version Category,class\nA,FT,1\n");
    match Dataset::load(file.path()) {
        Err(DashError::DataUnavailable(msg)) => assert!(msg.contains("Payload Mass (kg)")),
        other => panic!("expected DataUnavailable, got {other:?}"),
    }
}

#[test]
fn invalid_class_names_the_row() {
    let file = write_csv(
        "Launch Site,Payload Mass (kg),Booster Version Category,class\n\
         A,100,FT,1\n\
         A,200,FT,maybe\n",
    );
    match Dataset::load(file.path()) {
        Err(DashError::DataUnavailable(msg)) => {
            assert!(msg.contains("row 3"), "message was {msg}");
            assert!(msg.contains("class"));
        }
        other => panic!("expected DataUnavailable, got {other:?}"),
    }
}

#[test]
fn non_numeric_payload_is_data_unavailable() {
    let file = write_csv(
        "Launch Site,Payload Mass (kg),Booster Version Category,class\nA,heavy,FT,1\n",
    );
    assert!(matches!(
        Dataset::load(file.path()),
        Err(DashError::DataUnavailable(_))
    ));
}

#[test]
fn no_defined_payload_is_empty_dataset() {
    let file = write_csv(
        "Launch Site,Payload Mass (kg),Booster Version Category,class\n\
         A,,FT,1\n\
         B,NaN,B4,0\n",
    );
    assert!(matches!(
        Dataset::load(file.path()),
        Err(DashError::EmptyDataset)
    ));
}

#[test]
fn header_only_file_is_empty_dataset() {
    let file = write_csv("Launch Site,Payload Mass (kg),Booster Version Category,class\n");
    assert!(matches!(
        Dataset::load(file.path()),
        Err(DashError::EmptyDataset)
    ));
}

#[test]
fn from_records_applies_the_same_rules() {
    assert!(matches!(
        Dataset::from_records(vec![]),
        Err(DashError::EmptyDataset)
    ));

    let ds = Dataset::from_records(vec![
        LaunchRecord::new("B", Some(10.0), "FT", OutcomeClass::Success),
        LaunchRecord::new("A", None, "FT", OutcomeClass::Failure),
        LaunchRecord::new("B", Some(4.0), "B4", OutcomeClass::Failure),
    ])
    .expect("valid dataset");
    assert_eq!(ds.sites(), &["B", "A"]);
    assert_eq!((ds.min_payload(), ds.max_payload()), (4.0, 10.0));
}

#[test]
fn from_records_rejects_invalid_payloads() {
    for bad in [-1.0, f64::NAN, f64::INFINITY] {
        let result = Dataset::from_records(vec![
            LaunchRecord::new("A", Some(bad), "FT", OutcomeClass::Success),
            LaunchRecord::new("A", Some(500.0), "FT", OutcomeClass::Success),
        ]);
        match result {
            Err(DashError::DataUnavailable(msg)) => {
                assert!(msg.contains("record 1"), "message was {msg}")
            }
            other => panic!("expected DataUnavailable for {bad}, got {other:?}"),
        }
    }
}

#[test]
fn cells_and_headers_are_trimmed() -> Result<()> {
    let file = write_csv(
        " Launch Site , Payload Mass (kg) ,Booster Version Category,class\n\
         KSC LC-39A , 1200 , FT , 1 \n",
    );
    let ds = Dataset::load(file.path())?;
    let rec = &ds.records()[0];
    assert_eq!(rec.launch_site, "KSC LC-39A");
    assert_eq!(rec.booster_category, "FT");
    assert_eq!(rec.payload_mass_kg, Some(1200.0));
    assert_eq!(rec.outcome, OutcomeClass::Success);
    Ok(())
}
