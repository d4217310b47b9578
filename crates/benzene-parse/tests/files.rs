use benzene_parse::{parse_file, ParseOptions};
use std::fs;

#[test]
fn parse_file_reads_source() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("main.bz");
    fs::write(&path, "let x = 1\nfunc f ( ) : x end\n").unwrap();

    let parsed = parse_file(&path, ParseOptions::default()).unwrap();
    assert_eq!(parsed.forest.len(), 2);
    assert!(parsed.diagnostics.is_empty());
}

#[test]
fn missing_file_is_an_error_with_context() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.bz");
    let err = parse_file(&path, ParseOptions::default()).unwrap_err();
    assert!(format!("{err:#}").contains("failed to read"));
}

#[test]
fn parsed_output_serializes_to_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("main.bz");
    fs::write(&path, "let x = 1 )").unwrap();

    let parsed = parse_file(&path, ParseOptions::default()).unwrap();
    let json = serde_json::to_value(&parsed).unwrap();
    assert_eq!(json["forest"][0]["Let"]["name"]["token"]["text"], "x");
    assert_eq!(json["diagnostics"][0]["severity"], "Fail");
    assert_eq!(json["diagnostics"][0]["location"]["column"], 11);
}
