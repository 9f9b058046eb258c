//! CLI integration tests for schema-model binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("schema-model"))
}

// Helper to create a temp schema file
fn write_temp_file(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

mod transform_command {
    use super::*;

    #[test]
    fn basic_transform() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(
            &dir,
            "minimal.json",
            r#"{"type":"object","properties":{"foo":{"type":"string","required":true}}}"#,
        );

        cmd()
            .args(["transform", schema.to_str().unwrap()])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""title":"Minimal""#))
            .stdout(predicate::str::contains(
                r#""schema":"http://json-schema.org/schema#""#,
            ))
            .stdout(predicate::str::contains(r#""required":["foo"]"#));
    }

    #[test]
    fn transform_with_pretty() {
        cmd()
            .args(["transform", "tests/fixtures/minimal.json", "--pretty"])
            .assert()
            .success()
            .stdout(predicate::str::contains("{\n"));
    }

    #[test]
    fn transform_snake_cases_keys() {
        cmd()
            .args(["transform", "tests/fixtures/card.json"])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""family_name""#))
            .stdout(predicate::str::contains(r#""definitions":"#).not())
            .stdout(predicate::str::contains("$schema").not());
    }

    #[test]
    fn transform_no_snake_case() {
        cmd()
            .args(["transform", "tests/fixtures/card.json", "--no-snake-case"])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""familyName""#));
    }

    #[test]
    fn transform_name_override() {
        cmd()
            .args(["transform", "tests/fixtures/minimal.json", "--name", "person"])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""title":"Person""#));
    }

    #[test]
    fn transform_with_config_file() {
        let dir = TempDir::new().unwrap();
        let config = write_temp_file(
            &dir,
            "config.json",
            r#"{"exceptions": ["definitions", "description"], "default_schema_url": "urn:test"}"#,
        );

        cmd()
            .args([
                "transform",
                "tests/fixtures/card.json",
                "--config",
                config.to_str().unwrap(),
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("Formatted Name").not())
            .stdout(predicate::str::contains(r#""title":"Card""#));
    }
}

mod generate_command {
    use super::*;

    #[test]
    fn generate_to_stdout() {
        cmd()
            .args(["generate", "tests/fixtures/card.json"])
            .assert()
            .success()
            .stdout(predicate::str::starts_with(
                "# http://json-schema.org/draft-03/schema#\n",
            ))
            .stdout(predicate::str::contains("class Card\n"))
            .stdout(predicate::str::contains("  field :bday, type: Date"))
            .stdout(predicate::str::contains("  embeds_one :address"))
            .stdout(predicate::str::contains(
                "  validates :family_name, :given_name, presence: true",
            ));
    }

    #[test]
    fn generate_with_output_file() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("model.rb");

        cmd()
            .args([
                "generate",
                "tests/fixtures/address.json",
                "--output",
                output.to_str().unwrap(),
            ])
            .assert()
            .success()
            .stdout(predicate::str::is_empty());

        let content = fs::read_to_string(&output).unwrap();
        assert!(content.contains("class Address\n"));
        assert!(content.contains(
            "  # :street_address dependents: post_office_box, extended_address\n  validates :street_address, presence: true"
        ));
    }

    #[test]
    fn generate_into_output_dir() {
        let dir = TempDir::new().unwrap();
        let results = dir.path().join("results");

        cmd()
            .args([
                "generate",
                "tests/fixtures/card.json",
                "--output-dir",
                results.to_str().unwrap(),
            ])
            .assert()
            .success();

        let content = fs::read_to_string(results.join("card.rb")).unwrap();
        assert!(content.contains("class Card\n"));
    }

    #[test]
    fn generate_without_properties_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("empty.rb");

        cmd()
            .args([
                "generate",
                "tests/fixtures/empty.json",
                "--output",
                output.to_str().unwrap(),
            ])
            .assert()
            .success()
            .stdout(predicate::str::is_empty());

        assert!(!output.exists());
    }

    #[test]
    fn output_and_output_dir_conflict() {
        cmd()
            .args([
                "generate",
                "tests/fixtures/card.json",
                "--output",
                "a.rb",
                "--output-dir",
                "out",
            ])
            .assert()
            .failure();
    }
}

mod error_handling {
    use super::*;

    #[test]
    fn file_not_found() {
        cmd()
            .args(["transform", "/nonexistent/schema.json"])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("not found"));
    }

    #[test]
    fn invalid_json_schema() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "bad.json", r#"{ not valid json"#);

        cmd()
            .args(["transform", schema.to_str().unwrap()])
            .assert()
            .code(2);
    }

    #[test]
    fn non_object_schema() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "list.json", r#"[1, 2, 3]"#);

        cmd()
            .args(["generate", schema.to_str().unwrap()])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("expected object"));
    }

    #[test]
    fn properties_as_array() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "list.json", r#"{"properties": ["foo", "bar"]}"#);

        cmd()
            .args(["generate", schema.to_str().unwrap()])
            .assert()
            .code(2)
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::contains("/properties"));
    }

    #[test]
    fn invalid_config_file() {
        let dir = TempDir::new().unwrap();
        let config = write_temp_file(&dir, "config.json", r#"{"max_depth": "deep"}"#);

        cmd()
            .args([
                "transform",
                "tests/fixtures/minimal.json",
                "--config",
                config.to_str().unwrap(),
            ])
            .assert()
            .code(2);
    }

    #[test]
    fn missing_schema_path() {
        cmd().arg("transform").assert().failure();
    }
}

mod help_and_version {
    use super::*;

    #[test]
    fn help_flag() {
        cmd()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "Transform JSON Schemas into document-model classes",
            ));
    }

    #[test]
    fn version_flag() {
        cmd()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("schema-model"));
    }

    #[test]
    fn generate_help() {
        cmd()
            .args(["generate", "--help"])
            .assert()
            .success()
            .stdout(predicate::str::contains("--output"))
            .stdout(predicate::str::contains("--output-dir"))
            .stdout(predicate::str::contains("--config"));
    }
}

#[cfg(feature = "remote")]
mod remote {
    use super::*;

    #[test]
    fn generate_from_url() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", "/schemas/geo.json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"description":"A geographical coordinate","properties":{"latitude":{"type":"number"},"longitude":{"type":"number"}}}"#,
            )
            .create();

        cmd()
            .args(["generate", &format!("{}/schemas/geo.json", server.url())])
            .assert()
            .success()
            .stdout(predicate::str::contains("class Geo\n"))
            .stdout(predicate::str::contains("  field :longitude, type: Float\nend\n"));
    }
}
