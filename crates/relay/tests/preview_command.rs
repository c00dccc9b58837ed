use std::fs;

use predicates::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

macro_rules! relay {
    () => {
        assert_cmd::cargo::cargo_bin_cmd!("relay")
    };
}

fn create_project(snapshot: &str) -> TempDir {
    let dir = TempDir::new().expect("create temp dir");
    fs::write(dir.path().join("snapshot.json"), snapshot).expect("write snapshot");
    dir
}

const ESCALATION_SNAPSHOT: &str = r#"{ "repositories": [
    { "name": "repo_y", "version": "1.0.0", "changes": [{ "bump_type": "major" }] },
    {
        "name": "repo_x",
        "version": "1.2.3",
        "dependencies": { "repo_y": "^1.0.0" },
        "changes": [{ "bump_type": "patch" }]
    },
    { "name": "repo_z", "version": "0.1.0", "devDependencies": { "repo_y": "^1.0.0" } }
] }"#;

#[test]
fn preview_lists_publish_order() {
    let dir = create_project(ESCALATION_SNAPSHOT);

    relay!()
        .args(["preview", "snapshot.json"])
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(contains("# Publish preview"))
        .stdout(contains(
            "1. repo_y 1.0.0 → 2.0.0 (major)\n2. repo_x 1.2.3 → 1.3.0 (minor) [escalated]\n",
        ))
        .stdout(contains("- repo_z: dev-dependency-only changes"));
}

#[test]
fn escalation_flag_matches_dependency_bump() {
    let dir = create_project(ESCALATION_SNAPSHOT);

    relay!()
        .args(["preview", "--escalation", "match-dependency", "snapshot.json"])
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(contains("2. repo_x 1.2.3 → 2.0.0 (major) [escalated]"));
}

#[test]
fn state_file_marks_published_versions() {
    let dir = create_project(ESCALATION_SNAPSHOT);
    fs::write(
        dir.path().join("state.toml"),
        "[published]\nrepo_y = [\"2.0.0\"]\n",
    )
    .expect("write state");

    relay!()
        .args(["preview", "--state", "state.toml", "snapshot.json"])
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(contains("1. repo_y 1.0.0 → 2.0.0 (major) [already published]"))
        .stdout(contains("1 of 2 still to publish."));
}

#[test]
fn missing_state_file_is_empty_state() {
    let dir = create_project(ESCALATION_SNAPSHOT);

    relay!()
        .args(["preview", "--state", "state.toml", "snapshot.json"])
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(contains("already published").not())
        .stdout(contains("2 of 2 still to publish."));
}

#[test]
fn malformed_state_file_is_fatal() {
    let dir = create_project(ESCALATION_SNAPSHOT);
    fs::write(dir.path().join("state.toml"), "[published\n").expect("write state");

    relay!()
        .args(["preview", "--state", "state.toml", "snapshot.json"])
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(contains("error: failed to load publish state"))
        .stderr(contains("caused by: failed to parse publish state 'state.toml'"));
}

#[test]
fn preview_json_includes_already_published() {
    let dir = create_project(ESCALATION_SNAPSHOT);
    fs::write(
        dir.path().join("state.toml"),
        "[published]\nrepo_y = [\"2.0.0\"]\n",
    )
    .expect("write state");

    let output = relay!()
        .args(["preview", "--format", "json", "--state", "state.toml", "snapshot.json"])
        .current_dir(dir.path())
        .output()
        .expect("run relay");

    assert!(output.status.success());
    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is json");
    assert_eq!(value["publishing_order"], serde_json::json!(["repo_y", "repo_x"]));
    assert_eq!(value["already_published"], serde_json::json!(["repo_y"]));
    assert_eq!(value["pending"], serde_json::json!(["repo_x"]));
    assert_eq!(value["info"][0]["reason"], "dev-dependency-only changes");
}

#[test]
fn cycle_is_reported_and_excluded() {
    let dir = create_project(
        r#"{ "repositories": [
            { "name": "ping", "version": "1.0.0", "dependencies": { "pong": "^1.0.0" },
              "changes": [{ "bump_type": "minor" }] },
            { "name": "pong", "version": "1.0.0", "dependencies": { "ping": "^1.0.0" },
              "changes": [{ "bump_type": "minor" }] },
            { "name": "solo", "version": "1.0.0", "changes": [{ "bump_type": "patch" }] }
        ] }"#,
    );

    relay!()
        .args(["preview", "snapshot.json"])
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(contains("## Publish order\n\n1. solo 1.0.0 → 1.0.1 (patch)\n\n"))
        .stdout(contains("- CyclicDependency: dependency cycle between ping, pong"))
        .stderr(contains("warning: plan reported 1 error(s)"));
}

#[test]
fn verbose_logging_goes_to_stderr() {
    let dir = create_project(ESCALATION_SNAPSHOT);

    relay!()
        .args(["preview", "-v", "--format", "json", "snapshot.json"])
        .current_dir(dir.path())
        .env_remove("RELAY_LOG")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("{"))
        .stderr(contains("computed publish plan"));
}
