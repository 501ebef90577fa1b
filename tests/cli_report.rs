// tests/cli_report.rs
//
// Runs the `footprint-report` binary on fixture files.
use std::process::Command;

use serde_json::Value;

fn run(json: &str) -> (bool, Value) {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("answers.json");
    std::fs::write(&input, json).unwrap();

    let out = Command::new(env!("CARGO_BIN_EXE_footprint-report"))
        .arg(&input)
        .env_remove("FOOTPRINT_CONFIG_PATH")
        .env_remove("FOOTPRINT_WATER_THRESHOLD")
        .env("RUST_LOG", "off")
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .output()
        .expect("spawn footprint-report");
    let body = if out.status.success() {
        serde_json::from_slice(&out.stdout).expect("stdout is JSON")
    } else {
        Value::Null
    };
    (out.status.success(), body)
}

#[test]
fn prints_full_report() {
    let (ok, v) = run(r#"{"1":"Producer","2":"10000","3":"Cuerpo de agua superficial"}"#);
    assert!(ok);
    assert_eq!(v["calculated_footprint"], serde_json::json!(11.0));
    assert_eq!(v["interpretation"]["tier"], "moderate");
    assert_eq!(v["classification"]["discharge"], "surface_water");
    let recs = v["recommendations"].as_array().unwrap();
    assert!(recs[0].as_str().unwrap().contains("water reuse"));
}

#[test]
fn insufficient_data_is_not_an_error() {
    let (ok, v) = run(r#"{"1":"Producer","2":"Some text answer"}"#);
    assert!(ok);
    assert!(v["calculated_footprint"].is_null());
    assert_eq!(v["reason"], "insufficient data");
}

#[test]
fn invalid_input_fails() {
    let (ok, _) = run(r#"["not", "an", "object"]"#);
    assert!(!ok);
}
