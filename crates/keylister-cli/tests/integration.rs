#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn lister(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("aws-access-key-lister").unwrap();
    cmd.current_dir(dir.path())
        .env("AWS_CONFIG_FILE", dir.path().join("aws-config"))
        .env("AWS_SHARED_CREDENTIALS_FILE", dir.path().join("aws-credentials"))
        .env_remove("AWS_PROFILE")
        .env_remove("AWS_REGION")
        .env_remove("RUST_LOG");
    cmd
}

fn write_account_list(dir: &TempDir, contents: &str) {
    std::fs::write(dir.path().join("accountlist.csv"), contents).unwrap();
}

// ---------------------------------------------------------------------------
// flags
// ---------------------------------------------------------------------------

#[test]
fn help_lists_flags() {
    let dir = TempDir::new().unwrap();
    lister(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--account-list-file"))
        .stdout(predicate::str::contains("--output-file"))
        .stdout(predicate::str::contains("--workers"));
}

#[test]
fn zero_workers_is_rejected() {
    let dir = TempDir::new().unwrap();
    write_account_list(&dir, "111111111111,Auditor\n");
    lister(&dir)
        .args(["--workers", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("workers"));
    assert!(!dir.path().join("output.csv").exists());
}

// ---------------------------------------------------------------------------
// account list validation
// ---------------------------------------------------------------------------

#[test]
fn missing_account_list_fails() {
    let dir = TempDir::new().unwrap();
    lister(&dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains("accountlist.csv"));
    assert!(!dir.path().join("output.csv").exists());
}

#[test]
fn short_account_id_fails_before_any_output() {
    let dir = TempDir::new().unwrap();
    write_account_list(&dir, "111111111111,Auditor\n1111111111,R1\n");
    lister(&dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains("1111111111"))
        .stderr(predicate::str::contains("12 characters"));
    assert!(!dir.path().join("output.csv").exists());
}

#[test]
fn non_numeric_account_id_fails() {
    let dir = TempDir::new().unwrap();
    write_account_list(&dir, "11111111111a,Auditor\n");
    lister(&dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains("numeric"));
}

#[test]
fn three_column_row_fails() {
    let dir = TempDir::new().unwrap();
    write_account_list(&dir, "111111111111,Auditor,extra\n");
    lister(&dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not 2 columns"));
    assert!(!dir.path().join("output.csv").exists());
}

#[test]
fn custom_account_list_path_is_used() {
    let dir = TempDir::new().unwrap();
    let list = dir.path().join("accounts").join("prod.csv");
    std::fs::create_dir_all(list.parent().unwrap()).unwrap();
    std::fs::write(&list, "12345,Auditor\n").unwrap();
    lister(&dir)
        .arg("--account-list-file")
        .arg(&list)
        .assert()
        .failure()
        .stderr(predicate::str::contains("prod.csv"))
        .stderr(predicate::str::contains("12345"));
}

// ---------------------------------------------------------------------------
// report
// ---------------------------------------------------------------------------

#[test]
fn empty_account_list_writes_empty_report() {
    let dir = TempDir::new().unwrap();
    write_account_list(&dir, "");
    let output = dir.path().join("keys.csv");
    lister(&dir)
        .arg("--output-file")
        .arg(&output)
        .arg("--json")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"access_keys\": 0"));

    let contents = std::fs::read_to_string(&output).unwrap();
    assert!(contents.is_empty());
}
