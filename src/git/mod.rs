//! Git operations wrapper for pawnpm
//!
//! Vendored packages are plain git working copies under
//! `dependencies/<user>/<repo>`. This module wraps the system `git` binary
//! (rather than an embedded implementation) so that credential helpers, SSH
//! agents and proxy settings configured for git keep working unchanged.
//!
//! All operations are async and go through [`GitCommand`], which bounds every
//! invocation with a timeout and maps failures onto
//! [`PawnpmError`](crate::core::PawnpmError) variants.
//!
//! # Version resolution
//!
//! A dependency version is either a tag or a commit SHA. Callers try
//! [`GitRepo::resolve_tag`] first (`refs/tags/<version>`), then
//! [`GitRepo::resolve_commit`], which only consults git when the string looks
//! like a hexadecimal object name. An empty version is not resolved here;
//! callers check out the remote default branch instead
//! ([`GitRepo::checkout_default_branch`]).
//!
//! ```rust,no_run
//! use pawnpm::git::GitRepo;
//! use std::path::Path;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let repo = GitRepo::new(Path::new("dependencies/Southclaws/samp-logger"))
//!     .with_context("Southclaws/samp-logger@1.1.0");
//! repo.clone_remote("https://github.com/Southclaws/samp-logger").await?;
//!
//! if let Some(commit) = repo.resolve_tag("1.1.0").await? {
//!     repo.checkout_commit(&commit).await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod command_builder;


use anyhow::Result;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;

use crate::constants::DEFAULT_GIT_TIMEOUT;
use crate::core::PawnpmError;
pub use command_builder::GitCommand;

/// Abbreviated or full hexadecimal object name.
static COMMIT_SHA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-fA-F]{4,40}$").expect("commit SHA pattern is valid")
});

/// Handle to a local git working copy.
#[derive(Debug, Clone)]
pub struct GitRepo {
    /// Root of the working copy (the directory containing `.git`).
    path: PathBuf,

    /// Timeout applied to every command run against this repository.
    timeout: Option<Duration>,

    /// Dependency this working copy belongs to, used to tag git logs.
    context: Option<String>,
}

impl GitRepo {
    /// Handle for an existing working copy; nothing is checked.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            timeout: Some(DEFAULT_GIT_TIMEOUT),
            context: None,
        }
    }

    /// Replace the per-command timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Prefix every git log line of this repository with `context`.
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    fn tagged(&self, cmd: GitCommand) -> GitCommand {
        let cmd = cmd.with_timeout(self.timeout);
        match &self.context {
            Some(context) => cmd.with_context(context.clone()),
            None => cmd,
        }
    }

    fn command(&self, cmd: GitCommand) -> GitCommand {
        self.tagged(cmd.current_dir(&self.path))
    }

    /// Clone `url` into this handle's path, using its timeout and context.
    ///
    /// # Errors
    ///
    /// [`PawnpmError::GitCloneFailed`] if git cannot clone the URL.
    pub async fn clone_remote(&self, url: &str) -> Result<()> {
        self.tagged(GitCommand::clone(url, &self.path)).execute_success().await
    }

    /// Fetch branches and tags from `origin` without touching the working tree.
    pub async fn fetch(&self) -> Result<()> {
        self.command(GitCommand::fetch()).execute_success().await
    }

    /// Commit the tag `tag` points at.
    pub async fn resolve_tag(&self, tag: &str) -> Result<Option<String>> {
        self.verify_commit(&format!("refs/tags/{tag}")).await
    }

    /// Full commit for an abbreviated or full SHA.
    ///
    /// Strings that are not 4-40 hex digits are never passed to git and give
    /// `Ok(None)`, as do unknown commits.
    pub async fn resolve_commit(&self, sha: &str) -> Result<Option<String>> {
        if !COMMIT_SHA.is_match(sha) {
            return Ok(None);
        }
        self.verify_commit(sha).await
    }

    async fn verify_commit(&self, rev: &str) -> Result<Option<String>> {
        match self.command(GitCommand::verify_commit(rev)).execute_stdout().await {
            Ok(commit) if !commit.is_empty() => Ok(Some(commit)),
            Ok(_) => Ok(None),
            Err(e) => match e.downcast_ref::<PawnpmError>() {
                // `rev-parse --verify --quiet` exits non-zero with no output for unknown revisions
                Some(PawnpmError::GitCommandError { stderr, .. }) if stderr.is_empty() => Ok(None),
                _ => Err(e),
            },
        }
    }

    /// Check out `commit` with a detached HEAD, discarding local changes.
    pub async fn checkout_commit(&self, commit: &str) -> Result<()> {
        self.reset().await;
        self.command(GitCommand::checkout_detached(commit)).execute_success().await
    }

    /// Check out the tip of the remote default branch.
    ///
    /// The local branch of the same name is reset to `origin/<branch>`.
    /// Returns the branch name.
    pub async fn checkout_default_branch(&self) -> Result<String> {
        let remote_head = match self.command(GitCommand::remote_head()).execute_stdout().await {
            Ok(head) => head,
            Err(_) => {
                // Clones made by older git, or repositories whose remote HEAD moved.
                self.command(GitCommand::update_remote_head()).execute_success().await?;
                self.command(GitCommand::remote_head()).execute_stdout().await?
            }
        };

        let branch = remote_head.strip_prefix("origin/").unwrap_or(&remote_head).to_string();
        self.reset().await;
        self.command(GitCommand::checkout_branch(&branch, &remote_head))
            .execute_success()
            .await?;
        Ok(branch)
    }

    async fn reset(&self) {
        if let Err(e) = self.command(GitCommand::reset_hard()).execute_success().await {
            tracing::warn!(target: "git", "git reset failed in {}: {}", self.path.display(), e);
        }
    }

    /// Commit hash of HEAD.
    pub async fn get_current_commit(&self) -> Result<String> {
        self.command(GitCommand::current_commit()).execute_stdout().await
    }
}

/// Whether `git --version` runs successfully.
#[must_use]
pub fn is_git_installed() -> bool {
    std::process::Command::new(crate::utils::platform::get_git_command())
        .arg("--version")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

/// Fail with [`PawnpmError::GitNotFound`] unless git is usable.
pub fn ensure_git_available() -> Result<()> {
    if !crate::utils::platform::command_exists(crate::utils::platform::get_git_command())
        || !is_git_installed()
    {
        return Err(PawnpmError::GitNotFound.into());
    }
    Ok(())
}

/// Whether `path` contains a `.git` entry.
#[must_use]
pub fn is_valid_git_repo(path: &Path) -> bool {
    path.join(".git").exists()
}
