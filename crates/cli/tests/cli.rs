// ABOUTME: Integration tests for the zimcat CLI binary.
// ABOUTME: Tests catalog file parsing, stdin input, base URL resolution, and error envelopes.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn zimcat_cmd() -> Command {
    Command::cargo_bin("zimcat").unwrap()
}

const CATALOG: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
    <entry>
        <id>urn:uuid:0c45160e-f917-760a-9159-dfe3c53cdcdd</id>
        <title>Wikipedia</title>
        <name>wikipedia_en_all</name>
        <language>eng</language>
        <tags>wikipedia;_category:wikipedia;_pictures:yes</tags>
        <articleCount>5973596</articleCount>
        <link rel="http://opds-spec.org/acquisition/open-access"
              type="application/x-zim"
              href="/download/wikipedia_en_all.zim" length="1024"/>
    </entry>
</feed>"#;

#[test]
fn parse_catalog_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("root.xml");
    fs::write(&path, CATALOG).unwrap();

    zimcat_cmd()
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "0c45160e-f917-760a-9159-dfe3c53cdcdd",
        ))
        .stdout(predicate::str::contains("wikipedia_en_all"));
}

#[test]
fn parse_catalog_from_stdin() {
    zimcat_cmd()
        .arg("-")
        .write_stdin(CATALOG)
        .assert()
        .success()
        .stdout(predicate::str::contains("Wikipedia"));
}

#[test]
fn base_url_resolves_relative_hrefs() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("root.xml");
    fs::write(&path, CATALOG).unwrap();

    zimcat_cmd()
        .arg(&path)
        .arg("--base-url")
        .arg("https://library.example.org")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "https://library.example.org/download/wikipedia_en_all.zim",
        ));
}

#[test]
fn missing_file_reports_error_envelope() {
    zimcat_cmd()
        .arg("/no/such/catalog.xml")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"ok\": false"))
        .stdout(predicate::str::contains("\"failed\": 1"));
}

#[test]
fn malformed_catalog_reports_error_envelope() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.xml");
    fs::write(&path, "<feed><entry>").unwrap();

    zimcat_cmd()
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("malformed catalog XML"));
}

#[test]
fn multiple_targets_emit_envelope() {
    let temp_dir = TempDir::new().unwrap();
    let good = temp_dir.path().join("root.xml");
    fs::write(&good, CATALOG).unwrap();
    let bad = temp_dir.path().join("broken.xml");
    fs::write(&bad, "not xml at all").unwrap();

    zimcat_cmd()
        .arg(&good)
        .arg(&bad)
        .arg("--compact")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"total_catalogs\":2"))
        .stdout(predicate::str::contains("\"parsed\":1"))
        .stdout(predicate::str::contains("\"failed\":1"));
}

#[test]
fn stdin_only_once() {
    zimcat_cmd()
        .arg("-")
        .arg("-")
        .write_stdin(CATALOG)
        .assert()
        .failure()
        .stderr(predicate::str::contains("stdin"));
}
