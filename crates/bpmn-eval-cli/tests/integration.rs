//! Integration tests for CLI commands.

use std::fs;
use std::io::Write;
use std::process::{Command, Stdio};

use serde_json::{json, Value};
use tempfile::TempDir;

const VALID: &str = r#"<bpmn:definitions xmlns:bpmn="http://www.omg.org/spec/BPMN/20100524/MODEL" id="D"><bpmn:process id="P"><bpmn:startEvent id="S"/><bpmn:sequenceFlow id="F" sourceRef="S" targetRef="E"/><bpmn:endEvent id="E"/></bpmn:process></bpmn:definitions>"#;

const WRONG_ALIAS: &str = "<bpmns:definitions><bpmns:process><bpmns:startEvent/><bpmns:endEvent/></bpmns:process></bpmns:definitions>";

fn run_cli(args: &[&str]) -> (bool, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_bpmn-eval"))
        .args(args)
        .env_remove("BPMN_EVAL_XSD")
        .output()
        .expect("Failed to execute CLI");

    let stdout = String::from_utf8(output.stdout).unwrap();
    let stderr = String::from_utf8(output.stderr).unwrap();
    (output.status.success(), stdout, stderr)
}

fn write_jsonl(dir: &TempDir, name: &str, records: &[Value]) -> String {
    let path = dir.path().join(name);
    let body: String = records.iter().map(|r| format!("{}\n", r)).collect();
    fs::write(&path, body).unwrap();
    path.to_string_lossy().to_string()
}

#[test]
fn test_validate_valid_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("ok.bpmn");
    fs::write(&path, VALID).unwrap();

    let (success, stdout, _) = run_cli(&["validate", path.to_str().unwrap(), "--canonicalize"]);
    assert!(success);
    assert!(stdout.contains("Valid: true"));
    assert!(stdout.contains("Errors: 0"));
    assert!(stdout.contains("Canonical XML:"));
    assert!(stdout.contains("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
}

#[test]
fn test_validate_literal_json_output() {
    let (success, stdout, _) = run_cli(&["validate", WRONG_ALIAS, "--json"]);
    assert!(success);

    let verdict: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(verdict["valid"], false);
    assert!(verdict["canonical_xml"].is_null());
    assert!(verdict["errors"]
        .as_array()
        .unwrap()
        .iter()
        .any(|e| e == "Invalid namespace prefix: bpmns: (should be bpmn:)"));
}

#[test]
fn test_validate_strict_fails_on_invalid() {
    let (success, stdout, _) = run_cli(&["validate", "<broken", "--strict"]);
    assert!(!success);
    assert!(stdout.contains("Malformed XML"));
}

#[test]
fn test_validate_missing_schema_is_an_error() {
    let (success, _, stderr) = run_cli(&["validate", VALID, "--xsd", "/no/such/schema.xsd"]);
    assert!(!success);
    assert!(stderr.contains("Failed to load schema"));
}

#[test]
fn test_canonicalize_from_stdin() {
    let mut child = Command::new(env!("CARGO_BIN_EXE_bpmn-eval"))
        .arg("canonicalize")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(br#"<a z="1" b="2"><di:waypoint x="1" y="2"></di:waypoint></a>"#)
        .unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains(r#"<a b="2" z="1">"#));
    assert!(stdout.contains(r#"  <di:waypoint x="1" y="2"/>"#));
}

#[test]
fn test_canonicalize_degraded_warns() {
    let (success, stdout, stderr) = run_cli(&["canonicalize", "<bpmns:task>"]);
    assert!(success);
    assert_eq!(stdout.trim_end(), "<bpmn:task>");
    assert!(stderr.contains("not well-formed"));
}

#[test]
fn test_metrics_command_writes_report() {
    let temp_dir = TempDir::new().unwrap();
    let predictions = write_jsonl(
        &temp_dir,
        "pred.jsonl",
        &[json!({"output": VALID}), json!({"output": "<broken"})],
    );
    let truths = write_jsonl(
        &temp_dir,
        "gt.jsonl",
        &[json!({"output": VALID}), json!({"output": VALID}), json!({"output": VALID})],
    );
    let report_path = temp_dir.path().join("metrics.json");

    let (success, stdout, stderr) = run_cli(&[
        "metrics",
        "--predictions",
        &predictions,
        "--ground-truths",
        &truths,
        "--output",
        report_path.to_str().unwrap(),
    ]);
    assert!(success, "{}", stderr);
    assert!(stderr.contains("Mismatch in lengths"));
    assert!(stdout.contains("EVALUATION METRICS"));
    assert!(stdout.contains("Exact Match Rate:"));

    let report: Value = serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(report["schema_total_count"], 2);
    assert_eq!(report["schema_valid_count"], 1);
    assert_eq!(report["exact_match_count"], 1);
}

#[test]
fn test_extract_command() {
    let temp_dir = TempDir::new().unwrap();
    let raw = write_jsonl(
        &temp_dir,
        "raw.jsonl",
        &[
            json!({"status": "completed", "prompt": "Ping ops@example.com", "bpmn_xml": VALID}),
            json!({"status": "failed", "prompt": "x", "bpmn_xml": VALID}),
        ],
    );
    let out = temp_dir.path().join("data/train.jsonl");

    let (success, stdout, stderr) = run_cli(&[
        "extract",
        "--input",
        &raw,
        "--output",
        out.to_str().unwrap(),
        "--diagram-type",
        "pid",
    ]);
    assert!(success, "{}", stderr);
    assert!(stdout.contains("Extracted 1 records"));

    let line: Value =
        serde_json::from_str(fs::read_to_string(&out).unwrap().lines().next().unwrap()).unwrap();
    assert_eq!(line["metadata"]["diagram_type"], "pid");
    assert_eq!(line["metadata"]["pii_detected"], json!(["email"]));
}
