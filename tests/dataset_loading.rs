use searchcheck::{Dataset, DatasetError};
use std::io::Write;

fn write_fixture(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path
}

#[test]
fn lines_file_trailing_newline_produces_no_empty_element() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(&dir, "animals.txt", "fox\nwolf\n");

    let dataset = Dataset::load_from_lines(&path).unwrap();
    assert_eq!(dataset.phrases(), ["fox", "wolf"]);
}

#[test]
fn lines_file_keeps_blank_lines_and_internal_whitespace() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(&dir, "animals.txt", "red fox\n\nwolf  \n");

    let dataset = Dataset::load_from_lines(&path).unwrap();
    // Blank lines are kept (caller-owned hygiene); trailing whitespace is
    // trimmed, internal whitespace is not.
    assert_eq!(dataset.phrases(), ["red fox", "", "wolf"]);
}

#[test]
fn json_file_loads_a_flat_list_of_strings() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(&dir, "animals.json", r#"["fox","wolf"]"#);

    let dataset = Dataset::load_from_json(&path).unwrap();
    assert_eq!(dataset.phrases(), ["fox", "wolf"]);
}

#[test]
fn json_file_that_is_not_a_list_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(&dir, "animals.json", r#""fox""#);

    let err = Dataset::load_from_json(&path).unwrap_err();
    assert!(matches!(err, DatasetError::Parse { .. }));
    assert!(err.to_string().contains("animals.json"));
}

#[test]
fn missing_file_is_an_io_error() {
    let err = Dataset::load_from_lines("/nonexistent/animals.txt").unwrap_err();
    assert!(matches!(err, DatasetError::Io { .. }));
}

#[test]
fn load_dispatches_on_extension() {
    let dir = tempfile::tempdir().unwrap();
    let json_path = write_fixture(&dir, "phrases.json", r#"["otter"]"#);
    let txt_path = write_fixture(&dir, "phrases.txt", "otter\n");

    assert_eq!(Dataset::load(&json_path).unwrap().phrases(), ["otter"]);
    assert_eq!(Dataset::load(&txt_path).unwrap().phrases(), ["otter"]);
}

#[test]
fn empty_file_yields_zero_iterations() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(&dir, "empty.txt", "");

    let dataset = Dataset::load(&path).unwrap();
    assert!(dataset.is_empty());
    assert_eq!(dataset.len(), 0);
}

#[test]
fn dataset_iterates_in_order() {
    let dataset = Dataset::new(vec!["panda".into(), "otter".into(), "fox".into()]);
    let collected: Vec<String> = dataset.into_iter().cloned().collect();
    assert_eq!(collected, ["panda", "otter", "fox"]);
}
