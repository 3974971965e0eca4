//! On-disk fixtures: a local package registry and root projects.
//!
//! [`TestRegistry`] lays out real git repositories as `<root>/<user>/<repo>`,
//! so pointing the registry base URL at `file://<root>` makes the git fetcher
//! resolve `user/repo` references exactly as it would against GitHub.

use anyhow::{Context, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::test_utils::TestGit;

/// A directory of git repositories served over `file://`.
pub struct TestRegistry {
    temp_dir: TempDir,
}

impl TestRegistry {
    /// Create an empty registry in a fresh temporary directory.
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp_dir: TempDir::new().context("Failed to create registry directory")?,
        })
    }

    /// Directory holding the repositories.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Base URL to configure as the registry.
    pub fn url(&self) -> String {
        format!("file://{}", self.path().display())
    }

    /// Path of `user/repo` inside the registry.
    pub fn repo_path(&self, user: &str, repo: &str) -> PathBuf {
        self.path().join(user).join(repo)
    }

    /// Create `user/repo` with an optional `pawn.json` and an include file,
    /// committed on `main`.
    pub fn create_package(&self, user: &str, repo: &str, manifest: Option<Value>) -> Result<TestGit> {
        let path = self.repo_path(user, repo);
        std::fs::create_dir_all(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;

        let git = TestGit::new(&path);
        git.init()?;
        git.config_user()?;
        git.write_file(&format!("{repo}.inc"), &format!("// {user}/{repo}\n"))?;
        if let Some(manifest) = manifest {
            git.write_file("pawn.json", &serde_json::to_string_pretty(&manifest)?)?;
        }
        git.commit_all("Initial commit")?;
        Ok(git)
    }
}

/// A root project directory with a `pawn.json`.
pub struct TestProject {
    temp_dir: TempDir,
}

impl TestProject {
    /// Create a buildable project declaring `dependencies`.
    pub fn new(dependencies: &[&str]) -> Result<Self> {
        let project = Self {
            temp_dir: TempDir::new().context("Failed to create project directory")?,
        };
        project.write_manifest(&serde_json::json!({
            "user": "test",
            "repo": "gamemode",
            "entry": "gamemode.pwn",
            "output": "gamemode.amx",
            "dependencies": dependencies,
        }))?;
        Ok(project)
    }

    /// Replace the project's `pawn.json`.
    pub fn write_manifest(&self, manifest: &Value) -> Result<()> {
        std::fs::write(self.path().join("pawn.json"), serde_json::to_string_pretty(manifest)?)
            .context("Failed to write project manifest")
    }

    /// Project root.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Vendor directory of the project.
    pub fn vendor_dir(&self) -> PathBuf {
        self.path().join(crate::constants::VENDOR_DIR_NAME)
    }
}
