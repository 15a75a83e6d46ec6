// Integration tests for the scenario interchange format
use deadlock_analyzer::detection::{Mode, RawMatrices, SystemState, ValidationError};
use deadlock_analyzer::error::{Error, Result, ScenarioError};
use deadlock_analyzer::{Analyzer, Scenario};
use tempfile::TempDir;

#[test]
fn test_save_and_load_single_mode() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("cycle.json");

    let raw = RawMatrices {
        allocated: vec![vec![1, 0], vec![0, 1]],
        requested: vec![vec![0, 1], vec![1, 0]],
        available: vec![0, 0],
        ..Default::default()
    };
    let state = SystemState::from_raw(raw, Mode::Single, 2, 2)?;

    Scenario::from_state(&state).save(&path)?;
    let loaded = Scenario::load(&path)?;

    assert_eq!(loaded.mode, Mode::Single);
    assert!(loaded.max.is_none());
    assert_eq!(loaded.to_state()?, state);
    Ok(())
}

#[test]
fn test_save_and_load_multi_mode() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("bankers.json");

    let raw = RawMatrices {
        allocated: vec![vec![0, 1, 0], vec![2, 0, 0]],
        max: vec![vec![7, 5, 3], vec![3, 2, 2]],
        available: vec![3, 3, 2],
        ..Default::default()
    };
    let state = SystemState::from_raw(raw, Mode::Multi, 2, 3)?;

    Scenario::from_state(&state).save(&path)?;
    let restored: SystemState = Scenario::load(&path)?.try_into()?;

    assert_eq!(restored, state);
    Ok(())
}

#[test]
fn test_exported_json_layout() -> Result<()> {
    let json = Scenario::blank(Mode::Multi, 1, 2).to_json()?;
    let expected = r#"{
  "mode": "multi",
  "allocated": [
    [
      0,
      0
    ]
  ],
  "available": [
    0,
    0
  ],
  "max": [
    [
      0,
      0
    ]
  ]
}"#;
    assert_eq!(json, expected);
    Ok(())
}

#[test]
fn test_missing_file_is_io_error() {
    let temp_dir = TempDir::new().unwrap();
    let err = Scenario::load(temp_dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, Error::IoError(_)));
    assert!(!err.is_input_error());
}

#[test]
fn test_single_mode_import_rejects_two() {
    let json = r#"{
        "mode": "single",
        "allocated": [[0, 0], [0, 0]],
        "available": [0, 0],
        "requested": [[0, 0], [0, 2]]
    }"#;
    let err = Analyzer::default().analyze_json(json).unwrap_err();

    match err {
        Error::MalformedScenario(ScenarioError::Invalid(e)) => {
            assert_eq!(e.cell(), Some((1, 1)));
            assert!(matches!(e, ValidationError::NotSingleUnit { value: 2, .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_wrong_field_type_is_malformed() {
    let json = r#"{"mode": "multi", "allocated": "nope", "available": [0]}"#;
    let err = Scenario::from_json(json).unwrap_err();
    assert!(matches!(err, Error::MalformedScenario(ScenarioError::Json(_))));
}

#[test]
fn test_unknown_mode_is_malformed() {
    let json = r#"{"mode": "hybrid", "allocated": [[0]], "available": [0]}"#;
    assert!(Scenario::from_json(json).is_err());
}
