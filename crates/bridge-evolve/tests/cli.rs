use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

const DEAL: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../deals/4H.json");

fn write_config(dir: &std::path::Path, deal: &str) -> std::path::PathBuf {
    write_config_with_logging(dir, deal, false)
}

fn write_config_with_logging(
    dir: &std::path::Path,
    deal: &str,
    structured: bool,
) -> std::path::PathBuf {
    let path = dir.join("evolve.yaml");
    let yaml = format!(
        r#"
run_id: "cli"
deal: "{deal}"
seed: 9
search:
  population: 6
  generations: 2
  replicates: 1
outputs:
  report_json: "{report}"
  summary_md: "{summary}"
logging:
  enable_structured: {structured}
"#,
        report = dir.join("report.json").display(),
        summary = dir.join("summary.md").display(),
    );
    fs::write(&path, yaml).expect("write config");
    path
}

#[test]
fn validate_only_prints_the_deal() {
    let dir = tempdir().expect("temp dir");
    let config = write_config(dir.path(), DEAL);

    Command::cargo_bin("bridge-evolve")
        .expect("binary")
        .arg("--config")
        .arg(&config)
        .arg("--validate-only")
        .assert()
        .success()
        .stdout(predicate::str::contains("Contract: 4H by South"))
        .stdout(predicate::str::contains("Validation-only mode"));

    assert!(!dir.path().join("report.json").exists());
}

#[test]
fn validate_only_leaves_no_telemetry_behind() {
    let dir = tempdir().expect("temp dir");
    let config = write_config_with_logging(dir.path(), DEAL, true);

    Command::cargo_bin("bridge-evolve")
        .expect("binary")
        .arg("--config")
        .arg(&config)
        .arg("--validate-only")
        .assert()
        .success();

    assert!(!dir.path().join("telemetry.jsonl").exists());
}

#[test]
fn full_run_prints_trick_summary() {
    let dir = tempdir().expect("temp dir");
    let config = write_config(dir.path(), DEAL);

    Command::cargo_bin("bridge-evolve")
        .expect("binary")
        .arg("--config")
        .arg(&config)
        .args(["--generations", "3", "--seed", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Search complete for 'cli': 3 generation(s)"))
        .stdout(predicate::str::contains("Declarer won"))
        .stdout(predicate::str::contains("Result: "));

    assert!(dir.path().join("report.json").exists());
    assert!(dir.path().join("summary.md").exists());
}

#[test]
fn invalid_override_is_rejected() {
    let dir = tempdir().expect("temp dir");
    let config = write_config(dir.path(), DEAL);

    Command::cargo_bin("bridge-evolve")
        .expect("binary")
        .arg("--config")
        .arg(&config)
        .args(["--population", "1", "--validate-only"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("search.population"));
}

#[test]
fn malformed_deal_fails_fast() {
    let dir = tempdir().expect("temp dir");
    let deal = dir.path().join("bad.json");
    let text = fs::read_to_string(DEAL)
        .expect("sample deal")
        .replace("\"C9\", \"C6\"", "\"C9\", \"C9\"");
    fs::write(&deal, text).expect("write deal");
    let config = write_config(dir.path(), &deal.display().to_string());

    Command::cargo_bin("bridge-evolve")
        .expect("binary")
        .arg("--config")
        .arg(&config)
        .arg("--validate-only")
        .assert()
        .failure()
        .stderr(predicate::str::contains("bad.json"));
}
