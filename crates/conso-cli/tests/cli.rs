//! End-to-end tests for the `conso` binary

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const CLASSES: &str = "class_name\tencoding\nchemical\tA\nprotein\tP\n";
const TERMS: &str = "identifier\tcurator\tname\tclass\treferences\tdescription\n\
    CONSO00001\tRana\taspirin\tchemical\tpubmed:1\tA drug.\n\
    CONSO00002\tRana\tAPP\tprotein\tpubmed:2\tA protein.\n";
const SYNONYMS: &str = "identifier\tsynonym\treference\tspecificity\n\
    CONSO00001\tASA\tpubmed:1\tEXACT\n";
const XREFS: &str = "identifier\tdatabase\tdatabase_identifier\n\
    CONSO00001\tinchi\tInChI=1S/C9H8O4\n\
    CONSO00001\tsmiles\tCC(=O)OC1=CC=CC=C1C(=O)O\n";
const RELATIONS: &str = "source_ns\tsource_id\tsource_name\trelation\ttarget_ns\ttarget_id\ttarget_name\n\
    CONSO\tCONSO00001\taspirin\tinhibitor_of\tHGNC\t9604\tPTGS1\n";

fn data_dir(synonyms: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "classes.tsv", CLASSES);
    write(dir.path(), "terms.tsv", TERMS);
    write(dir.path(), "synonyms.tsv", synonyms);
    write(dir.path(), "xrefs.tsv", XREFS);
    write(dir.path(), "relations.tsv", RELATIONS);
    dir
}

fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

fn conso(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("conso").unwrap();
    cmd.env_remove("CONSO_DATA_DIR")
        .env_remove("RUST_LOG")
        .arg("--data-dir")
        .arg(dir.path());
    cmd
}

#[test]
fn check_passes_on_clean_tables() {
    let dir = data_dir(SYNONYMS);
    conso(&dir)
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("All checks passed"));
}

#[test]
fn check_reports_unknown_identifier() {
    let dir = data_dir(
        "identifier\tsynonym\treference\tspecificity\n\
         CONSO00001\tASA\tpubmed:1\tEXACT\n\
         CONSO00009\tnope\tpubmed:1\tEXACT\n",
    );
    conso(&dir)
        .arg("check")
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "error[referential] synonyms.tsv, line 3: Invalid identifier CONSO00009",
        ))
        .stdout(predicate::str::contains("Found 1 error(s)"));
}

#[test]
fn check_positional_dir_wins() {
    let dir = data_dir(SYNONYMS);
    Command::cargo_bin("conso")
        .unwrap()
        .env_remove("CONSO_DATA_DIR")
        .arg("check")
        .arg(dir.path())
        .assert()
        .success();
}

#[test]
fn check_json_output() {
    let dir = data_dir(SYNONYMS);
    let output = conso(&dir)
        .args(["--format", "json", "check"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["status"], "success");
    assert_eq!(value["counts"]["terms"], 2);
}

#[test]
fn completeness_warning_blocks_on_request() {
    let dir = data_dir(SYNONYMS);
    write(
        dir.path(),
        "relations.tsv",
        "source_ns\tsource_id\tsource_name\trelation\ttarget_ns\ttarget_id\ttarget_name\n",
    );
    conso(&dir)
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("chemical missing"));
    conso(&dir)
        .args(["check", "--blocking-completeness"])
        .assert()
        .code(1);
}

#[test]
fn fail_fast_reports_stage() {
    let dir = data_dir(SYNONYMS);
    write(
        dir.path(),
        "terms.tsv",
        "identifier\tcurator\tname\tclass\treferences\tdescription\n\
         CONSO00002\tRana\taspirin\tchemical\tpubmed:1\tA drug.\n",
    );
    conso(&dir)
        .args(["check", "--fail-fast"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Stopped during the terms stage"));
}

#[test]
fn index_prints_terms() {
    let dir = data_dir(SYNONYMS);
    conso(&dir)
        .arg("index")
        .assert()
        .success()
        .stdout(predicate::str::contains("CONSO00002\tAPP\tprotein"));
}

#[test]
fn index_refuses_invalid_tables() {
    let dir = data_dir(
        "identifier\tsynonym\treference\tspecificity\n\
         CONSO00009\tnope\tpubmed:1\tEXACT\n",
    );
    conso(&dir).arg("index").assert().code(1);
    conso(&dir)
        .args(["--format", "json", "index", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"identifier\": \"CONSO00001\""));
}

#[test]
fn config_init_then_show() {
    let dir = data_dir(SYNONYMS);
    conso(&dir).args(["config", "init"]).assert().success();
    assert!(dir.path().join("conso.toml").exists());
    conso(&dir)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
    conso(&dir)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("conso.toml"));
    conso(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("namespace = \"CONSO\""));
}

#[test]
fn missing_table_is_a_runtime_error() {
    let dir = data_dir(SYNONYMS);
    fs::remove_file(dir.path().join("xrefs.tsv")).unwrap();
    conso(&dir)
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("xrefs.tsv"));
}

#[test]
fn completions_for_bash() {
    Command::cargo_bin("conso")
        .unwrap()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("_conso()"));
}
