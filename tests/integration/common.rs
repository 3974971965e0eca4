//! Helpers shared by the integration tests.

use assert_cmd::Command;
use pawnpm::test_utils::{TestProject, TestRegistry};

/// Build a `pawnpm` invocation for `project` that resolves against `registry`.
///
/// The global config path points into the project so the user's own
/// configuration never leaks into a test run.
pub fn pawnpm(project: &TestProject, registry: &TestRegistry) -> Command {
    let mut cmd = Command::cargo_bin("pawnpm").expect("pawnpm binary is built");
    cmd.arg("--dir")
        .arg(project.path())
        .env("PAWNPM_REGISTRY_URL", registry.url())
        .env("PAWNPM_CONFIG", project.path().join("missing-config.toml"))
        .env_remove("RUST_LOG");
    cmd
}

/// Registry with a small dependency tree:
///
/// ```text
/// acme/core           tags 1.0.0, 2.0.0
/// acme/util -> acme/core@1.0.0
/// acme/app  -> acme/util, acme/core
/// ```
pub fn acme_registry() -> TestRegistry {
    let registry = TestRegistry::new().unwrap();

    let core = registry.create_package("acme", "core", None).unwrap();
    core.tag("1.0.0").unwrap();
    core.write_file("core.inc", "// acme/core 2\n").unwrap();
    core.commit_all("Second release").unwrap();
    core.tag("2.0.0").unwrap();

    registry
        .create_package(
            "acme",
            "util",
            Some(serde_json::json!({
                "user": "acme",
                "repo": "util",
                "dependencies": ["acme/core@1.0.0"],
            })),
        )
        .unwrap();

    registry
        .create_package(
            "acme",
            "app",
            Some(serde_json::json!({
                "user": "acme",
                "repo": "app",
                "dependencies": ["acme/util", "acme/core"],
            })),
        )
        .unwrap();

    registry
}
