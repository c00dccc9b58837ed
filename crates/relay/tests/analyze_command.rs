use std::fs;
use std::path::PathBuf;

use predicates::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

macro_rules! relay {
    () => {
        assert_cmd::cargo::cargo_bin_cmd!("relay")
    };
}

const CHAIN_SNAPSHOT: &str = r#"{
    "repositories": [
        {
            "name": "@test/repo_a",
            "version": "1.0.0",
            "changes": [{ "bump_type": "major", "description": "Drop legacy API" }]
        },
        {
            "name": "@test/repo_b",
            "version": "1.0.0",
            "dependencies": { "@test/repo_a": "1.0.0" }
        },
        { "path": "repos/repo_c.toml", "repository": "org/repo_c" }
    ]
}"#;

const REPO_C: &str = r#"
name = "@test/repo_c"
version = "1.0.0"

[dependencies]
"@test/repo_b" = "1.0.0"
"#;

fn create_chain_snapshot() -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("create temp dir");
    fs::create_dir_all(dir.path().join("repos")).expect("create repos dir");
    fs::write(dir.path().join("repos/repo_c.toml"), REPO_C).expect("write repo_c record");
    let snapshot = dir.path().join("snapshot.json");
    fs::write(&snapshot, CHAIN_SNAPSHOT).expect("write snapshot");
    (dir, snapshot)
}

#[test]
fn analyze_renders_markdown_report() {
    let (dir, snapshot) = create_chain_snapshot();

    relay!()
        .arg("analyze")
        .arg(&snapshot)
        .current_dir(dir.path())
        .env_remove("RELAY_LOG")
        .assert()
        .success()
        .stdout(contains("# Publish analysis"))
        .stdout(contains("| @test/repo_a | 1.0.0 | major |"))
        .stdout(contains("- @test/repo_c\n  - production: @test/repo_b `1.0.0`"))
        .stdout(contains("- @test/repo_a: @test/repo_b, @test/repo_c"))
        .stdout(contains("## Errors").not())
        .stderr(predicate::str::is_empty());
}

#[test]
fn analyze_renders_json_report() {
    let (dir, snapshot) = create_chain_snapshot();

    let output = relay!()
        .args(["analyze", "--format", "json"])
        .arg(&snapshot)
        .current_dir(dir.path())
        .output()
        .expect("run relay");

    assert!(output.status.success());
    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is json");
    let pending: Vec<&str> = value["pending_changes"]
        .as_array()
        .expect("pending changes array")
        .iter()
        .filter_map(|change| change["name"].as_str())
        .collect();
    assert_eq!(pending, vec!["@test/repo_a", "@test/repo_b", "@test/repo_c"]);
    assert!(value["pending_changes"][0].get("to_version").is_none());
    assert_eq!(value["packages"][2]["repository"], "org/repo_c");
}

#[test]
fn analyze_is_byte_reproducible() {
    let (dir, snapshot) = create_chain_snapshot();

    let run = || {
        relay!()
            .arg("analyze")
            .arg(&snapshot)
            .current_dir(dir.path())
            .output()
            .expect("run relay")
            .stdout
    };

    assert_eq!(run(), run());
}

#[test]
fn unresolved_repository_is_a_warning() {
    let dir = TempDir::new().expect("create temp dir");
    let snapshot = dir.path().join("snapshot.json");
    fs::write(
        &snapshot,
        r#"{ "repositories": [
            { "name": "app", "version": "1.0.0", "changes": [{ "bump_type": "patch" }] },
            { "path": "missing.json", "repository": "org/missing" }
        ] }"#,
    )
    .expect("write snapshot");

    relay!()
        .arg("analyze")
        .arg(&snapshot)
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(contains("## Errors"))
        .stdout(contains("UnresolvedRepository: repository 'org/missing'"))
        .stderr(contains("warning: plan reported 1 error(s)"));
}

#[test]
fn strict_fails_when_plan_has_errors() {
    let dir = TempDir::new().expect("create temp dir");
    let snapshot = dir.path().join("snapshot.json");
    fs::write(
        &snapshot,
        r#"{ "repositories": [{ "name": "bad", "version": "one" }] }"#,
    )
    .expect("write snapshot");

    relay!()
        .args(["analyze", "--strict"])
        .arg(&snapshot)
        .current_dir(dir.path())
        .assert()
        .failure()
        .stdout(contains("- bad: invalid version"))
        .stderr(contains("error: plan has 1 error(s) and --strict is set"));
}

#[test]
fn duplicate_names_are_fatal() {
    let dir = TempDir::new().expect("create temp dir");
    let snapshot = dir.path().join("snapshot.toml");
    fs::write(
        &snapshot,
        r#"
[[repositories]]
name = "lib"
version = "1.0.0"

[[repositories]]
name = "lib"
version = "2.0.0"
"#,
    )
    .expect("write snapshot");

    relay!()
        .arg("analyze")
        .arg(&snapshot)
        .current_dir(dir.path())
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(contains("error: failed to plan publishing"))
        .stderr(contains("caused by: duplicate package name 'lib'"));
}

#[test]
fn missing_snapshot_reports_cause() {
    let dir = TempDir::new().expect("create temp dir");

    relay!()
        .args(["analyze", "nope.json"])
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(contains("error: failed to load snapshot"))
        .stderr(contains("caused by: failed to read 'nope.json'"));
}

#[test]
fn unsupported_snapshot_extension_is_rejected() {
    let dir = TempDir::new().expect("create temp dir");
    fs::write(dir.path().join("snapshot.yaml"), "repositories: []").expect("write snapshot");

    relay!()
        .args(["analyze", "snapshot.yaml"])
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(contains("expected .json or .toml"));
}

#[test]
fn config_file_policy_is_applied() {
    let dir = TempDir::new().expect("create temp dir");
    let snapshot = dir.path().join("snapshot.json");
    fs::write(
        &snapshot,
        r#"{ "repositories": [
            { "name": "host", "version": "1.0.0", "changes": [{ "bump_type": "major" }] },
            { "name": "plugin", "version": "1.0.0", "peerDependencies": { "host": "^1.0.0" } }
        ] }"#,
    )
    .expect("write snapshot");
    fs::write(
        dir.path().join("relay.toml"),
        "[policy]\ncascade-through-peer = true\n",
    )
    .expect("write config");

    relay!()
        .arg("analyze")
        .arg(&snapshot)
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(contains("- host: plugin"));
}

#[test]
fn cascade_flag_overrides_missing_config() {
    let dir = TempDir::new().expect("create temp dir");
    let snapshot = dir.path().join("snapshot.json");
    fs::write(
        &snapshot,
        r#"{ "repositories": [
            { "name": "host", "version": "1.0.0", "changes": [{ "bump_type": "major" }] },
            { "name": "plugin", "version": "1.0.0", "peerDependencies": { "host": "^1.0.0" } }
        ] }"#,
    )
    .expect("write snapshot");

    relay!()
        .arg("analyze")
        .arg(&snapshot)
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(contains("- host: no dependents affected"));

    relay!()
        .args(["analyze", "--cascade-peer"])
        .arg(&snapshot)
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(contains("- host: plugin"));
}

#[test]
fn explicit_missing_config_is_an_error() {
    let (dir, snapshot) = create_chain_snapshot();

    relay!()
        .args(["--config", "custom.toml", "analyze"])
        .arg(&snapshot)
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(contains("error: failed to read config 'custom.toml'"));
}
