//! The `pawnpm` binary end to end.

use predicates::prelude::*;
use pawnpm::test_utils::{TestProject, TestRegistry};

use crate::common::{acme_registry, pawnpm};

#[test]
fn test_help_lists_commands() {
    let mut cmd = assert_cmd::Command::cargo_bin("pawnpm").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("ensure"))
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("resources"));
}

#[test]
fn test_ensure_vendors_closure() {
    let registry = acme_registry();
    let project = TestProject::new(&["acme/app"]).unwrap();

    pawnpm(&project, &registry)
        .arg("ensure")
        .assert()
        .success()
        .stdout(predicate::str::contains("Ensured 4 dependencies for test/gamemode:"))
        .stdout(predicate::str::contains("acme/core@1.0.0"));

    assert!(project.vendor_dir().join("acme/util/pawn.json").is_file());
}

#[test]
fn test_ensure_quiet_prints_nothing() {
    let registry = acme_registry();
    let project = TestProject::new(&["acme/core"]).unwrap();

    pawnpm(&project, &registry)
        .args(["ensure", "--quiet"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_ensure_reports_missing_dependency() {
    let registry = TestRegistry::new().unwrap();
    let project = TestProject::new(&["acme/missing"]).unwrap();

    pawnpm(&project, &registry)
        .arg("ensure")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("acme/missing"))
        .stderr(predicate::str::contains("suggestion"));
}

#[test]
fn test_ensure_rejects_invalid_manifest() {
    let registry = TestRegistry::new().unwrap();
    let project = TestProject::new(&[]).unwrap();
    project
        .write_manifest(&serde_json::json!({"entry": "gm.pwn", "dependencies": []}))
        .unwrap();

    pawnpm(&project, &registry)
        .arg("ensure")
        .assert()
        .failure()
        .stderr(predicate::str::contains("output"));

    assert!(!project.vendor_dir().exists());
}

#[test]
fn test_validate_reports_summary() {
    let registry = TestRegistry::new().unwrap();
    let project = TestProject::new(&["acme/core@1.0.0", "acme/util"]).unwrap();

    pawnpm(&project, &registry)
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("test/gamemode: is valid"))
        .stdout(predicate::str::contains("2 dependencies"));
}

#[test]
fn test_add_then_ensure() {
    let registry = acme_registry();
    let project = TestProject::new(&[]).unwrap();

    pawnpm(&project, &registry)
        .args(["add", "acme/core@2.0.0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added acme/core@2.0.0"));

    pawnpm(&project, &registry)
        .arg("ensure")
        .assert()
        .success()
        .stdout(predicate::str::contains("Ensured 1 dependencies"));

    let core = std::fs::read_to_string(project.vendor_dir().join("acme/core/core.inc")).unwrap();
    assert_eq!(core, "// acme/core 2\n");
}

#[test]
fn test_add_rejects_malformed_reference() {
    let registry = TestRegistry::new().unwrap();
    let project = TestProject::new(&[]).unwrap();

    pawnpm(&project, &registry)
        .args(["add", "not a reference"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Malformed dependency reference"));
}

#[test]
fn test_resources_for_platform() {
    let registry = TestRegistry::new().unwrap();
    let project = TestProject::new(&[]).unwrap();
    project
        .write_manifest(&serde_json::json!({
            "entry": "gm.pwn",
            "output": "gm.amx",
            "resources": [
                {"name": "plugin-linux.tar.gz", "platform": "linux", "archive": true,
                 "plugins": ["plugin.so"]},
                {"name": "plugin-win.zip", "platform": "windows", "archive": true,
                 "plugins": ["plugin.dll"]},
                {"name": "shared.inc"}
            ]
        }))
        .unwrap();

    pawnpm(&project, &registry)
        .args(["resources", "--platform", "windows"])
        .assert()
        .success()
        .stdout(predicate::str::contains("plugin-win.zip"))
        .stdout(predicate::str::contains("shared.inc (any platform)"))
        .stdout(predicate::str::contains("plugin-linux").not());

    pawnpm(&project, &registry)
        .args(["resources", "--platform", "darwin"])
        .assert()
        .success()
        .stdout(predicate::str::contains("shared.inc"));
}

#[test]
fn test_config_file_sets_registry() {
    let registry = acme_registry();
    let project = TestProject::new(&["acme/core"]).unwrap();
    let config = project.path().join("config.toml");
    std::fs::write(&config, format!("registry_url = \"{}\"\n", registry.url())).unwrap();

    let mut cmd = assert_cmd::Command::cargo_bin("pawnpm").unwrap();
    cmd.arg("--dir")
        .arg(project.path())
        .arg("--config")
        .arg(&config)
        .env_remove("PAWNPM_REGISTRY_URL")
        .env_remove("RUST_LOG")
        .arg("ensure")
        .assert()
        .success();

    assert!(project.vendor_dir().join("acme/core/core.inc").is_file());
}
