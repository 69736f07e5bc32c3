use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

const RECEIPT_TEXT: &str = "SUPER AHORRO\nAV CENTRAL 12\nTEL: 2222-3333\nVENDEDOR\nMARIA\nTIQUETE 00045\n03/02/2021\n7441001234567 ARROZ 1KG\n7441009876543 FRIJOL ROJO\nSUBTOTAL\n1200 G\n800 G\n2000\n500-\n1500\nGRACIAS\n";

fn write_document(path: &Path, text: &str) {
    let document = serde_json::json!({
        "pages": [ { "fullTextAnnotation": { "text": text } } ]
    });
    fs::write(path, document.to_string()).unwrap();
}

fn tiquete(config_dir: &Path) -> Command {
    let config = config_dir.join("config.json");
    if !config.exists() {
        fs::write(&config, "{}").unwrap();
    }
    let mut cmd = Command::cargo_bin("tiquete").unwrap();
    cmd.arg("--config").arg(config);
    cmd
}

#[test]
fn process_writes_named_json_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("ticket1.json");
    let out = dir.path().join("out");
    write_document(&input, RECEIPT_TEXT);

    tiquete(dir.path())
        .arg("process")
        .arg(&input)
        .arg("--output-dir")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("sample_00045.json"));

    let written = fs::read_to_string(out.join("sample_00045.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&written).unwrap();

    assert_eq!(json["date"], "03/02/2021");
    assert_eq!(json["invoiceNumber"], "00045");
    assert_eq!(json["subtotal"], 2000);
    assert_eq!(json["total"], 1500);
    assert_eq!(json["lineItems"].as_array().unwrap().len(), 2);
    assert_eq!(json["lineItems"][1]["description"], "FRIJOL ROJO");
}

#[test]
fn process_prints_to_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("ticket1.json");
    write_document(&input, RECEIPT_TEXT);

    tiquete(dir.path())
        .arg("process")
        .arg(&input)
        .arg("--stdout")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"storeAddress\": \"SUPER AHORRO\\nAV CENTRAL 12\""));
}

#[test]
fn process_reports_missing_field() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("broken.json");
    write_document(&input, &RECEIPT_TEXT.replace("03/02/2021\n", ""));

    tiquete(dir.path())
        .arg("process")
        .arg(&input)
        .arg("--stdout")
        .assert()
        .failure()
        .stderr(predicate::str::contains("broken.json"))
        .stderr(predicate::str::contains("date"));
}

#[test]
fn process_rejects_document_without_pages() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("empty.json");
    fs::write(&input, r#"{ "pages": [] }"#).unwrap();

    tiquete(dir.path())
        .arg("process")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no pages"));
}

#[test]
fn batch_continues_past_failures_and_writes_summary() {
    let dir = tempfile::tempdir().unwrap();
    let inputs = dir.path().join("in");
    let out = dir.path().join("out");
    fs::create_dir_all(&inputs).unwrap();

    write_document(&inputs.join("a.json"), RECEIPT_TEXT);
    write_document(
        &inputs.join("b.json"),
        &RECEIPT_TEXT.replace("TIQUETE 00045", "TIQUETE 00046"),
    );
    write_document(&inputs.join("c.json"), "NOTHING USEFUL\n");

    tiquete(dir.path())
        .arg("batch")
        .arg(format!("{}/*.json", inputs.display()))
        .arg("--output-dir")
        .arg(&out)
        .arg("--continue-on-error")
        .arg("--summary")
        .arg("-j")
        .arg("2")
        .assert()
        .success()
        .stdout(predicate::str::contains("2 successful"));

    assert!(out.join("sample_00045.json").exists());
    assert!(out.join("sample_00046.json").exists());

    let summary = fs::read_to_string(out.join("summary.csv")).unwrap();
    assert_eq!(summary.lines().count(), 4);
    assert!(summary.contains("c.json,error"));
}

#[test]
fn batch_stops_on_first_failure() {
    let dir = tempfile::tempdir().unwrap();
    let inputs = dir.path().join("in");
    fs::create_dir_all(&inputs).unwrap();
    write_document(&inputs.join("c.json"), "NOTHING USEFUL\n");

    tiquete(dir.path())
        .arg("batch")
        .arg(format!("{}/*.json", inputs.display()))
        .arg("--output-dir")
        .arg(dir.path().join("out"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Processing failed"));
}

#[test]
fn batch_honors_no_date_validation() {
    let dir = tempfile::tempdir().unwrap();
    let inputs = dir.path().join("in");
    let out = dir.path().join("out");
    fs::create_dir_all(&inputs).unwrap();
    write_document(
        &inputs.join("a.json"),
        &RECEIPT_TEXT.replace("03/02/2021", "31/02/2021"),
    );

    let run = |extra: &[&str]| {
        tiquete(dir.path())
            .arg("batch")
            .arg(format!("{}/*.json", inputs.display()))
            .arg("--output-dir")
            .arg(&out)
            .arg("--summary")
            .args(extra)
            .assert()
            .success();
        fs::read_to_string(out.join("summary.csv")).unwrap()
    };

    let summary = run(&[]);
    assert!(summary.contains("31/02/2021,2000,1500,2,1,"));

    let summary = run(&["--no-date-validation"]);
    assert!(summary.contains("31/02/2021,2000,1500,2,0,"));
}
