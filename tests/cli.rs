mod common;

use assert_cmd::Command;
use common::TestWorkspace;
use predicates::prelude::*;

fn cli() -> Command {
    Command::cargo_bin("lca-ingest").expect("binary under test")
}

#[test]
fn load_requires_an_input_directory() {
    cli()
        .arg("load")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--input"));
}

#[test]
fn dry_run_load_completes_without_an_endpoint() {
    let ws = TestWorkspace::new();
    let dir = ws.subdir("input");
    ws.write("input/h1b.csv", "CASE_NUMBER,TOTAL_WORKERS\nI-1,3\n");
    let parents = ws.write("parents.txt", "Tata\n");

    cli()
        .arg("load")
        .arg("--input")
        .arg(&dir)
        .arg("--parents")
        .arg(&parents)
        .arg("--dry-run")
        .assert()
        .success()
        .stderr(predicate::str::contains("Dry run"));
}

#[test]
fn load_without_endpoint_or_dry_run_fails() {
    let ws = TestWorkspace::new();
    let dir = ws.subdir("input");
    ws.write("input/h1b.csv", "CASE_NUMBER\nI-1\n");
    let parents = ws.write("parents.txt", "Tata\n");

    cli()
        .arg("load")
        .arg("--input")
        .arg(&dir)
        .arg("--parents")
        .arg(&parents)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--endpoint"));
}

#[test]
fn preview_renders_the_cleaned_table() {
    let ws = TestWorkspace::new();
    let dir = ws.subdir("input");
    ws.write(
        "input/h1b.csv",
        "CASE_NUMBER,EMPLOYER_NAME\nI-1,TATA CONSULTANCY SERVICES\n",
    );

    cli()
        .arg("preview")
        .arg("--input")
        .arg(&dir)
        .arg("--rows")
        .arg("5")
        .assert()
        .success()
        .stdout(predicate::str::contains("CASE_NUMBER"))
        .stdout(predicate::str::contains("Tata Consultancy Services"));
}

#[test]
fn preview_rejects_unknown_columns_and_encodings() {
    let ws = TestWorkspace::new();
    let dir = ws.subdir("input");
    ws.write("input/h1b.csv", "CASE_NUMBER\nI-1\n");

    cli()
        .arg("preview")
        .arg("--input")
        .arg(&dir)
        .arg("--columns")
        .arg("NO_SUCH_COLUMN")
        .assert()
        .failure()
        .stderr(predicate::str::contains("NO_SUCH_COLUMN"));

    cli()
        .arg("preview")
        .arg("--input")
        .arg(&dir)
        .arg("--input-encoding")
        .arg("klingon")
        .assert()
        .failure()
        .stderr(predicate::str::contains("klingon"));
}
