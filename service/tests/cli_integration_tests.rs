//! End-to-end tests for the `metamodel-check` binary
//!
//! These tests execute the built binary via `std::process::Command`.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn run_check(args: &[&Path]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_metamodel-check"))
        .args(args)
        .output()
        .expect("Failed to run metamodel-check")
}

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("Failed to write model file");
    path
}

const PEOPLE: &str = r#"{
  "$class": "concerto.metamodel@1.0.0.Model",
  "namespace": "org.people",
  "declarations": [
    {
      "$class": "concerto.metamodel@1.0.0.ParticipantDeclaration",
      "name": "Person",
      "identified": { "$class": "concerto.metamodel@1.0.0.IdentifiedBy", "name": "email" },
      "properties": [
        { "$class": "concerto.metamodel@1.0.0.StringProperty", "name": "email" },
        { "$class": "concerto.metamodel@1.0.0.IntegerProperty", "name": "age", "isOptional": true }
      ]
    }
  ]
}"#;

const BROKEN: &str = r"
namespace: org.broken
declarations:
  - $class: concerto.metamodel@1.0.0.ConceptDeclaration
    name: Car
    superType:
      name: Vehicle
";

#[test]
fn test_valid_model_prints_declarations() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let people = write(&dir, "people.json", PEOPLE);

    let output = run_check(&[&people]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("org.people.Person"));
    assert!(stdout.contains("Field {name=age, type=Integer, array=false, optional=true}"));
}

#[test]
fn test_invalid_model_fails() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let broken = write(&dir, "broken.yaml", BROKEN);

    let output = run_check(&[&broken]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Vehicle"), "{stderr}");
}
