use assert_cmd::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn rdfq_cmd() -> Command {
    let mut cmd = cargo_bin_cmd!("rdfq");
    cmd.env("NO_COLOR", "1");
    cmd
}

const EVENTS: &str = r#"[
  "start_document",
  {"namespace": {"prefix": "foaf", "iri": "http://xmlns.com/foaf/0.1/"}},
  {"start_subject": {"term": {"reference": {"relative": "?this", "resolved": "http://example.org/?this"}}, "origin": "/1"}},
  {"triple": {
    "subject": {"term": {"reference": {"relative": "?this", "resolved": "http://example.org/?this"}}, "origin": "/1"},
    "predicate": {"term": {"curie": {"prefix": "foaf", "local": "name", "iri": "http://xmlns.com/foaf/0.1/name"}}},
    "object": {"term": {"literal": {"lexical": "", "tag": "simple"}}, "origin": "/1/1"}
  }},
  {"end_subject": {"term": {"reference": {"relative": "?this", "resolved": "http://example.org/?this"}}, "origin": "/1"}},
  "end_document"
]"#;

const COMPILED: &str = "PREFIX foaf: <http://xmlns.com/foaf/0.1/>\n\
                        SELECT REDUCED *\n\
                        WHERE {\n\
                        \t{\n\
                        \t\t<?this> foaf:name ?_name .\n\
                        \t}\n\
                        }\n\
                        # @origin _name /1/1\n";

// ============================================================================
// Happy path tests
// ============================================================================

#[test]
fn help_flag() {
    rdfq_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Template-to-SPARQL compiler"))
        .stdout(predicate::str::contains("compile"))
        .stdout(predicate::str::contains("prepare"))
        .stdout(predicate::str::contains("origins"));
}

#[test]
fn compile_from_file() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("events.json");
    fs::write(&path, EVENTS).unwrap();

    rdfq_cmd()
        .arg("compile")
        .arg(&path)
        .assert()
        .success()
        .stdout(COMPILED);
}

#[test]
fn compile_from_stdin_as_ask() {
    rdfq_cmd()
        .args(["compile", "--shape", "ask"])
        .write_stdin(EVENTS)
        .assert()
        .success()
        .stdout(predicate::str::contains("ASK\nWHERE {\n"));
}

#[test]
fn origins_round_trip() {
    rdfq_cmd()
        .arg("origins")
        .write_stdin(COMPILED)
        .assert()
        .success()
        .stdout("{\n  \"_name\": \"/1/1\"\n}\n");
}

#[test]
fn prepare_with_params() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("query.rq");
    fs::write(&path, "SELECT * { ?s ?p ${?n + 1} }\nBINDINGS $n { (1) }\n").unwrap();

    rdfq_cmd()
        .args(["prepare", "--system-id", "http://example.org/"])
        .arg(&path)
        .args(["-p", "n=41"])
        .assert()
        .success()
        .stdout("SELECT * { ?s ?p 42 }\nBINDINGS $n {\n\t(41 )\n}\n");
}

#[test]
fn prepare_uses_config_system_id() {
    let tmp = TempDir::new().unwrap();
    let config = tmp.path().join("rdfq.toml");
    fs::write(&config, "system_id = \"http://example.org/app/\"\n").unwrap();

    rdfq_cmd()
        .arg("--config")
        .arg(&config)
        .arg("prepare")
        .write_stdin("ASK { ${IRI(\"x\")} ?p ?o }")
        .assert()
        .success()
        .stdout("ASK { <http://example.org/app/x> ?p ?o }");
}

// ============================================================================
// Error tests
// ============================================================================

#[test]
fn verbose_quiet_conflict() {
    rdfq_cmd()
        .args(["--verbose", "--quiet", "origins"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn prepare_without_system_id_is_usage_error() {
    rdfq_cmd()
        .arg("prepare")
        .write_stdin("SELECT * {}")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--system-id is required"));
}

#[test]
fn invalid_variable_name_fails() {
    let events = EVENTS.replace("?this", "?not-valid");
    rdfq_cmd()
        .arg("compile")
        .write_stdin(events)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid variable name: not-valid"));
}

#[test]
fn unparseable_parameter_fails() {
    rdfq_cmd()
        .args(["prepare", "--system-id", "http://example.org/", "-p", "n=%%"])
        .write_stdin("SELECT * {}\nBINDINGS $n { (UNDEF) }")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid parameter value: %%"));
}

#[test]
fn malformed_config_fails() {
    let tmp = TempDir::new().unwrap();
    let config = tmp.path().join("rdfq.toml");
    fs::write(&config, "shape = \"describe\"\n").unwrap();

    rdfq_cmd()
        .arg("--config")
        .arg(&config)
        .arg("origins")
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid config"));
}
