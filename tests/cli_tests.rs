//! CLI integration tests
//!
//! These tests run the built binary against the fixture schemas.

use std::path::PathBuf;
use std::process::Command;

fn xsdtable_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_xsdtable"))
}

fn fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path.to_string_lossy().into_owned()
}

#[test]
fn test_cli_tsv_default() {
    let output = Command::new(xsdtable_bin())
        .arg(fixture("orders.xsd"))
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "conversion should succeed");
    assert!(stdout.starts_with("NAME\t"), "should start with the header row");
    assert!(stdout.contains("orderId\txs:string\tSTRING\t12\t1\t"));
    assert!(!stdout.contains("ext:id"), "imports are off by default");
}

#[test]
fn test_cli_imports_and_columns() {
    let output = Command::new(xsdtable_bin())
        .args(["--imports", "--columns", "name,kind", "--response-end-with", "Response"])
        .arg(fixture("orders.xsd"))
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("NAME\tKIND\n"));
    assert!(stdout.contains("getOrderRequest\tin\n"));
    assert!(stdout.contains("ext:id\tout\n"));
}

#[test]
fn test_cli_json_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("report.json");

    let output = Command::new(xsdtable_bin())
        .args(["--format", "json", "--output"])
        .arg(&out)
        .arg(fixture("orders.xsd"))
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(json["xsd_prefix"], "xs");
    assert_eq!(json["enums"].as_array().unwrap().len(), 2);
}

#[test]
fn test_cli_namespaces() {
    let output = Command::new(xsdtable_bin())
        .args(["--namespaces", "--columns", "name"])
        .arg(fixture("orders.xsd"))
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("Default XMLSchema prefix is 'xs'"));
    assert!(stdout.contains("ext - urn:example:common"));
}

#[test]
fn test_cli_missing_file() {
    let output = Command::new(xsdtable_bin())
        .arg(fixture("missing.xsd"))
        .output()
        .expect("Failed to execute command");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr.contains("schema file not found"));
}

#[test]
fn test_cli_unknown_column() {
    let output = Command::new(xsdtable_bin())
        .args(["--columns", "name,bogus"])
        .arg(fixture("orders.xsd"))
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown column 'bogus'"));
}
