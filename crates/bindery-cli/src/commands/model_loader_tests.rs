use super::SHAPES;
use super::model_loader::{LoadError, load_model};

#[test]
fn loads_valid_model() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shapes.json");
    std::fs::write(&path, SHAPES).unwrap();

    let model = load_model(&path).unwrap();
    assert_eq!(model.package, "shapes");
    assert_eq!(model.classes.len(), 2);
}

#[test]
fn missing_file_names_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");
    let err = load_model(&path).unwrap_err();
    assert!(matches!(err, LoadError::Read { .. }));
    assert!(err.to_string().contains("absent.json"));
}

#[test]
fn blank_model_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("blank.json");
    std::fs::write(&path, "  \n").unwrap();
    assert!(matches!(load_model(&path), Err(LoadError::Empty)));
}

#[test]
fn model_errors_pass_through() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(
        &path,
        r#"{"package": "p", "classes": [{"name": "B", "parents": ["Missing"]}]}"#,
    )
    .unwrap();
    let err = load_model(&path).unwrap_err();
    assert!(matches!(err, LoadError::Model(_)));
    assert!(err.to_string().contains("Missing"));
}
