use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn batch_mode_reports_a_summary() {
    let mut cmd = Command::cargo_bin("sarsim").expect("binary builds");
    cmd.args(["--seed", "7", "batch", "--sessions", "3", "--max-rounds", "200"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Batch complete for 'cape-rescue'"));
}

#[test]
fn batch_mode_writes_jsonl_rows() {
    let dir = tempdir().expect("temp dir");
    let rows = dir.path().join("rows.jsonl");

    let mut cmd = Command::cargo_bin("sarsim").expect("binary builds");
    cmd.args(["--seed", "7", "batch", "--sessions", "2", "--max-rounds", "200"])
        .arg("--jsonl")
        .arg(&rows);
    cmd.assert().success();

    let contents = fs::read_to_string(&rows).expect("jsonl readable");
    assert_eq!(contents.lines().count(), 2);
}

#[test]
fn play_mode_quits_cleanly_with_a_scenario_file() {
    let dir = tempdir().expect("temp dir");
    let scenario = dir.path().join("scenario.yaml");
    fs::write(
        &scenario,
        r#"
name: "smoke"
regions:
  - { id: alpha, width: 20, height: 20, origin: { x: 0, y: 0 } }
  - { id: bravo, width: 20, height: 20, origin: { x: 20, y: 0 } }
  - { id: charlie, width: 20, height: 20, origin: { x: 40, y: 0 } }
priors: [0.2, 0.5, 0.3]
seed: 42
"#,
    )
    .expect("scenario written");

    let mut cmd = Command::cargo_bin("sarsim").expect("binary builds");
    cmd.arg("--scenario").arg(&scenario).arg("play");
    cmd.write_stdin("0\n");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Initial Target (P) Probabilities:"));
}

#[test]
fn invalid_scenario_fails_with_a_config_error() {
    let dir = tempdir().expect("temp dir");
    let scenario = dir.path().join("broken.yaml");
    fs::write(
        &scenario,
        r#"
name: "broken"
regions:
  - { id: alpha, width: 20, height: 20, origin: { x: 0, y: 0 } }
  - { id: bravo, width: 20, height: 20, origin: { x: 20, y: 0 } }
  - { id: charlie, width: 20, height: 20, origin: { x: 40, y: 0 } }
priors: [0.2, 0.5, 0.4]
"#,
    )
    .expect("scenario written");

    let mut cmd = Command::cargo_bin("sarsim").expect("binary builds");
    cmd.arg("--scenario").arg(&scenario).arg("play");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("priors must sum to 1"));
}
