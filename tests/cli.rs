use std::fs;

use assert_cmd::Command;
use predicates::{prelude::*, str::contains};
use tempfile::tempdir;

fn write_issue_csv(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let path = dir.path().join("issues.csv");
    fs::write(
        &path,
        "Issue key,Summary,Fix Version/s,Created,Resolved\n\
         PROJ-1,[Portal] login fix,V1,2024-01-01,2024-01-05\n\
         PROJ-2,[SAP ECC] invoice sync,V2,2024-01-02,2024-01-04\n\
         PROJ-3,cleanup,V3,2024-01-03,\n",
    )
    .expect("write issues csv");
    path
}

fn write_release_csv(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let path = dir.path().join("releases.csv");
    fs::write(&path, "RELEASE,DESCRIÇÃO\nV1,\nV2,Shipped\nV3,\n").expect("write releases csv");
    path
}

#[test]
fn import_reports_counts_and_writes_the_store() {
    let dir = tempdir().expect("temp dir");
    let issues = write_issue_csv(&dir);
    let store = dir.path().join("store.json");

    Command::cargo_bin("jira-normalize")
        .expect("binary exists")
        .args([
            "import",
            "-i",
            issues.to_str().unwrap(),
            "-s",
            store.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(contains("3 inserted, 0 updated, 0 rejected"));

    let contents = fs::read_to_string(&store).expect("read store");
    let parsed: serde_json::Value = serde_json::from_str(&contents).expect("parse store");
    assert_eq!(parsed["issues"]["PROJ-1"]["fix_version"], "V1");
    assert_eq!(parsed["issues"]["PROJ-1"]["lead_time_days"], 4);
    assert_eq!(parsed["issues"]["PROJ-2"]["system"], "SAP");
}

#[test]
fn strict_import_fails_on_structurally_rejected_rows() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("broken.csv");
    fs::write(&path, "Issue key,Summary\nPROJ-1,ok\n,no key\n").expect("write csv");
    let store = dir.path().join("store.json");

    Command::cargo_bin("jira-normalize")
        .expect("binary exists")
        .args([
            "import",
            "-i",
            path.to_str().unwrap(),
            "-s",
            store.to_str().unwrap(),
            "--strict",
        ])
        .assert()
        .failure()
        .stderr(contains("missing issue key"));

    // The surviving row was still persisted before the strict check.
    let contents = fs::read_to_string(&store).expect("read store");
    assert!(contents.contains("PROJ-1"));
}

#[test]
fn import_reads_stdin_with_dash() {
    let dir = tempdir().expect("temp dir");
    let store = dir.path().join("store.json");

    Command::cargo_bin("jira-normalize")
        .expect("binary exists")
        .args(["import", "-i", "-", "-s", store.to_str().unwrap(), "--json"])
        .write_stdin("Issue key,Summary\nPROJ-7,piped in\n")
        .assert()
        .success()
        .stdout(contains("\"inserted\": 1"));
}

#[test]
fn release_import_without_required_headers_aborts() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("bad.csv");
    fs::write(&path, "RELEASE,NOTES\nV1,done\n").expect("write csv");
    let store = dir.path().join("store.json");

    Command::cargo_bin("jira-normalize")
        .expect("binary exists")
        .args([
            "releases",
            "-i",
            path.to_str().unwrap(),
            "-s",
            store.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(contains("missing required header"));
}

#[test]
fn classify_partitions_open_and_closed_releases() {
    let dir = tempdir().expect("temp dir");
    let issues = write_issue_csv(&dir);
    let releases = write_release_csv(&dir);
    let store = dir.path().join("store.json");

    for args in [
        vec!["import", "-i", issues.to_str().unwrap()],
        vec!["releases", "-i", releases.to_str().unwrap()],
    ] {
        Command::cargo_bin("jira-normalize")
            .expect("binary exists")
            .args(&args)
            .args(["-s", store.to_str().unwrap()])
            .assert()
            .success();
    }

    let output = Command::cargo_bin("jira-normalize")
        .expect("binary exists")
        .args(["classify", "-s", store.to_str().unwrap(), "--json"])
        .output()
        .expect("run classify");
    assert!(output.status.success());
    let payload: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("parse classify json");
    assert_eq!(payload["open"], serde_json::json!(["V1", "V3"]));
    assert_eq!(payload["closed"], serde_json::json!(["V2"]));
}

#[test]
fn stats_closed_only_drops_open_release_issues() {
    let dir = tempdir().expect("temp dir");
    let issues = write_issue_csv(&dir);
    let releases = write_release_csv(&dir);
    let store = dir.path().join("store.json");

    for args in [
        vec!["import", "-i", issues.to_str().unwrap()],
        vec!["releases", "-i", releases.to_str().unwrap()],
    ] {
        Command::cargo_bin("jira-normalize")
            .expect("binary exists")
            .args(&args)
            .args(["-s", store.to_str().unwrap()])
            .assert()
            .success();
    }

    Command::cargo_bin("jira-normalize")
        .expect("binary exists")
        .args(["stats", "-s", store.to_str().unwrap(), "--closed-only"])
        .assert()
        .success()
        .stdout(contains("V2").and(contains("V1").not()));
}

#[test]
fn stats_filters_restrict_the_issue_set() {
    let dir = tempdir().expect("temp dir");
    let issues = write_issue_csv(&dir);
    let store = dir.path().join("store.json");

    Command::cargo_bin("jira-normalize")
        .expect("binary exists")
        .args([
            "import",
            "-i",
            issues.to_str().unwrap(),
            "-s",
            store.to_str().unwrap(),
        ])
        .assert()
        .success();

    let output = Command::cargo_bin("jira-normalize")
        .expect("binary exists")
        .args([
            "stats",
            "-s",
            store.to_str().unwrap(),
            "--from",
            "2024-01-05",
            "--to",
            "2024-01-05",
            "--json",
        ])
        .output()
        .expect("run stats");
    assert!(output.status.success());
    let payload: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("parse stats json");
    let releases: Vec<&str> = payload
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["release"].as_str().unwrap())
        .collect();
    assert_eq!(releases, vec!["V1"]);
}
