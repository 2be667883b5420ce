/// Integration tests for the `dermamap` binary: request file in,
/// decision record out.
use assert_cmd::Command;
use indoc::indoc;
use std::fs;
use tempfile::TempDir;

fn write_request(dir: &TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("request.json");
    fs::write(&path, contents).expect("write request file");
    path
}

#[test]
fn evaluate_emits_a_success_record_as_json() {
    let dir = TempDir::new().unwrap();
    let request = write_request(
        &dir,
        indoc! {r#"
            {
              "images": [{"risk_score": 0.9, "label": "melanoma"}],
              "context": {"age": 70, "bleeding": true}
            }
        "#},
    );

    let output = Command::cargo_bin("dermamap")
        .unwrap()
        .args(["evaluate", request.to_str().unwrap(), "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(value["status"], "success");
    assert_eq!(value["bucket"], "oncologic");
    assert_eq!(value["risk_tier"], "high");
    let factors: Vec<&str> = value["contributing_factors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f.as_str().unwrap())
        .collect();
    assert!(factors.contains(&"Age >= 65 reported"));
    assert!(factors.contains(&"Bleeding reported"));
}

#[test]
fn evaluate_reports_inconsistent_images() {
    let dir = TempDir::new().unwrap();
    let request = write_request(
        &dir,
        indoc! {r#"
            {
              "images": [
                {"risk_score": 0.7, "label": "melanoma"},
                {"risk_score": 0.3, "label": "melanoma"}
              ]
            }
        "#},
    );

    let output = Command::cargo_bin("dermamap")
        .unwrap()
        .args(["evaluate", request.to_str().unwrap(), "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(value["status"], "inconsistent_analysis");
    assert_eq!(value["followup"]["requires_followup"], true);
}

#[test]
fn evaluate_honors_a_threshold_override() {
    let dir = TempDir::new().unwrap();
    let request = write_request(
        &dir,
        indoc! {r#"
            {
              "images": [
                {"risk_score": 0.7, "label": "melanoma"},
                {"risk_score": 0.3, "label": "melanoma"}
              ]
            }
        "#},
    );

    let output = Command::cargo_bin("dermamap")
        .unwrap()
        .args([
            "evaluate",
            request.to_str().unwrap(),
            "--format",
            "json",
            "--disagreement-threshold",
            "0.5",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(value["status"], "success");
}

#[test]
fn evaluate_fails_on_invalid_context() {
    let dir = TempDir::new().unwrap();
    let request = write_request(
        &dir,
        indoc! {r#"
            {
              "images": [{"risk_score": 0.5, "label": "nevus"}],
              "context": {"age": 500}
            }
        "#},
    );

    let output = Command::cargo_bin("dermamap")
        .unwrap()
        .args(["evaluate", request.to_str().unwrap()])
        .assert()
        .failure()
        .get_output()
        .stderr
        .clone();

    let stderr = String::from_utf8_lossy(&output);
    assert!(stderr.contains("age must be an integer between 0 and 120"));
}

#[test]
fn catalog_lists_six_questions_per_bucket() {
    let output = Command::cargo_bin("dermamap")
        .unwrap()
        .args(["catalog", "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
    for bucket in ["oncologic", "fungal", "bacterial", "inflammatory", "general"] {
        assert_eq!(value[bucket].as_array().unwrap().len(), 6, "{bucket}");
    }
}
