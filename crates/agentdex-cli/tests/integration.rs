#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

fn agentdex(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("agentdex").unwrap();
    cmd.current_dir(dir.path())
        .env("AGENTDEX_ROOT", dir.path())
        .env_remove("RUST_LOG");
    cmd
}

fn write(path: &Path, content: &str) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

fn seed(dir: &TempDir) {
    let root = dir.path();
    write(
        &root.join(".claude/agents/api-designer.md"),
        "---\nname: api-designer\n---\nDesigns HTTP APIs.\n\n- Schema Design: OpenAPI first\n",
    );
    write(
        &root.join(".claude/agents/backend-developer.md"),
        "Builds services with the api-designer.\n",
    );
    write(
        &root.join(".claude/commands/feature.md"),
        "---\ndescription: Build a feature\n---\n## Workflow\n1. **api-designer** -> Define schema\n2. **backend-developer** -> Implement\n\n## Gates\n- All tests must pass\n",
    );
    write(&root.join(".claude/commands/broken.md"), "---\nname: broken\n");
}

// ---------------------------------------------------------------------------
// agentdex parse
// ---------------------------------------------------------------------------

#[test]
fn parse_prints_tables_and_errors() {
    let dir = TempDir::new().unwrap();
    seed(&dir);
    agentdex(&dir)
        .arg("parse")
        .assert()
        .success()
        .stdout(predicate::str::contains("Agents (2)"))
        .stdout(predicate::str::contains("Commands (1)"))
        .stdout(predicate::str::contains("feature-workflow"))
        .stdout(predicate::str::contains("Errors (1)"))
        .stdout(predicate::str::contains("broken.md"));
}

#[test]
fn parse_json_is_camel_case() {
    let dir = TempDir::new().unwrap();
    seed(&dir);
    let output = agentdex(&dir).args(["parse", "--json"]).output().unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["agents"].as_array().unwrap().len(), 2);
    assert_eq!(value["workflows"][0]["type"], "conditional");
    assert_eq!(
        value["workflows"][0]["agentSequence"],
        serde_json::json!(["api-designer", "backend-developer"])
    );
    assert_eq!(value["commands"][0]["workflowRef"], "feature-workflow");
    assert_eq!(value["errors"].as_array().unwrap().len(), 1);
}

#[test]
fn parse_empty_project_succeeds() {
    let dir = TempDir::new().unwrap();
    agentdex(&dir)
        .arg("parse")
        .assert()
        .success()
        .stdout(predicate::str::contains("Agents (0)"));
}

// ---------------------------------------------------------------------------
// agentdex show
// ---------------------------------------------------------------------------

#[test]
fn show_agent_and_workflow() {
    let dir = TempDir::new().unwrap();
    seed(&dir);
    agentdex(&dir)
        .args(["show", "agent", "api-designer"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Schema Design"));

    agentdex(&dir)
        .args(["show", "workflow", "feature-workflow"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1. api-designer: Define schema"))
        .stdout(predicate::str::contains("[required] All tests must pass"));
}

#[test]
fn show_unknown_entity_fails() {
    let dir = TempDir::new().unwrap();
    seed(&dir);
    agentdex(&dir)
        .args(["show", "agent", "nobody"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("agent 'nobody' not found"));

    agentdex(&dir)
        .args(["show", "widget", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown entity kind"));
}

// ---------------------------------------------------------------------------
// agentdex sync
// ---------------------------------------------------------------------------

#[test]
fn sync_creates_then_reports_unchanged() {
    let dir = TempDir::new().unwrap();
    seed(&dir);
    let store = dir.path().join("store.json");

    agentdex(&dir)
        .args(["sync", "--store"])
        .arg(&store)
        .assert()
        .success()
        .stdout(predicate::str::contains("4 created"));
    assert!(store.exists());

    agentdex(&dir)
        .args(["sync", "--store"])
        .arg(&store)
        .assert()
        .success()
        .stdout(predicate::str::contains("0 created, 0 updated, 4 unchanged"));
}

#[test]
fn sync_dry_run_does_not_write() {
    let dir = TempDir::new().unwrap();
    seed(&dir);
    let store = dir.path().join("store.json");

    agentdex(&dir)
        .args(["sync", "--dry-run", "--store"])
        .arg(&store)
        .assert()
        .success()
        .stdout(predicate::str::contains("Plan: 4 create"));
    assert!(!store.exists());
}

#[test]
fn sync_detects_updates() {
    let dir = TempDir::new().unwrap();
    seed(&dir);
    let store = dir.path().join("store.json");
    agentdex(&dir).args(["sync", "--store"]).arg(&store).assert().success();

    write(
        &dir.path().join(".claude/agents/backend-developer.md"),
        "Builds and runs services.\n",
    );
    let output = agentdex(&dir)
        .args(["sync", "--json", "--store"])
        .arg(&store)
        .output()
        .unwrap();
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["updated"], serde_json::json!(["agent:backend-developer"]));
    assert_eq!(report["unchanged"], 3);
}

#[test]
fn sync_rejects_corrupt_store() {
    let dir = TempDir::new().unwrap();
    seed(&dir);
    let store = dir.path().join("store.json");
    std::fs::write(&store, "not json").unwrap();

    agentdex(&dir)
        .args(["sync", "--store"])
        .arg(&store)
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to open store"));
}

// ---------------------------------------------------------------------------
// agentdex config
// ---------------------------------------------------------------------------

#[test]
fn config_show_defaults() {
    let dir = TempDir::new().unwrap();
    agentdex(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains(".claude/agents"));
}

#[test]
fn config_validate_warns_on_missing_dirs() {
    let dir = TempDir::new().unwrap();
    agentdex(&dir)
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[warning] agents directory not found"));
}

#[test]
fn config_validate_fails_on_shared_dir() {
    let dir = TempDir::new().unwrap();
    write(
        &dir.path().join(".agentdex/config.yaml"),
        "collections:\n  agents: docs\n  commands: docs\n",
    );
    agentdex(&dir)
        .args(["config", "validate"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("[error]"));
}
