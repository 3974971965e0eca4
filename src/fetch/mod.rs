//! Materializing one dependency into the vendor directory.
//!
//! The resolver does not know how packages get onto disk; it asks a
//! [`Fetcher`] to place `user/repo` at the requested version under
//! `<vendor_dir>/<user>/<repo>` and report which commit it ended up on.
//! [`GitFetcher`] is the implementation backed by the system `git` binary.
//!
//! # Concurrency
//!
//! Calls for different repositories run independently. Calls for the same
//! destination are serialized twice over: an in-process mutex per destination
//! path, then a [`VendorLock`] file lock so separate processes sharing a
//! project also take turns.
//!
//! # Repair
//!
//! A destination that exists without a `.git` directory is what an interrupted
//! clone leaves behind. It is deleted and cloned again, so re-running after a
//! failure converges.

mod lock;

use anyhow::{Context, Result};
use dashmap::DashMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::GlobalConfig;
use crate::constants::{DEFAULT_GIT_TIMEOUT, DEFAULT_REGISTRY_URL};
use crate::core::PawnpmError;
use crate::dependency::{DependencyMeta, ResolvedRef};
use crate::git::{GitRepo, is_valid_git_repo};
use crate::utils::fs::{ensure_dir, remove_dir_all};

pub use lock::VendorLock;

/// Places a dependency into a vendor directory.
///
/// Implementations must leave `vendor_dir/<user>/<repo>` checked out at
/// `meta.version` (or the default-branch tip when the version is empty) and
/// return the commit that is checked out.
pub trait Fetcher: Send + Sync {
    /// Fetch and check out `meta` under `vendor_dir`.
    fn fetch(
        &self,
        vendor_dir: &Path,
        meta: &DependencyMeta,
    ) -> impl Future<Output = Result<ResolvedRef>> + Send;
}

/// [`Fetcher`] that clones from a git registry (GitHub by default).
#[derive(Debug, Clone)]
pub struct GitFetcher {
    /// Base URL repositories live under, e.g. `https://github.com`
    registry_url: String,

    /// Timeout for each git command
    timeout: Option<Duration>,

    /// In-process lock per destination directory
    locks: Arc<DashMap<PathBuf, Arc<Mutex<()>>>>,
}

impl Default for GitFetcher {
    fn default() -> Self {
        Self::new(DEFAULT_REGISTRY_URL)
    }
}

impl GitFetcher {
    /// Fetcher cloning from `registry_url`.
    pub fn new(registry_url: impl Into<String>) -> Self {
        Self {
            registry_url: registry_url.into(),
            timeout: Some(DEFAULT_GIT_TIMEOUT),
            locks: Arc::new(DashMap::new()),
        }
    }

    /// Fetcher using the registry and timeout from `config`.
    #[must_use]
    pub fn from_config(config: &GlobalConfig) -> Self {
        Self::new(config.registry_url()).with_timeout(Some(config.git_timeout()))
    }

    /// Replace the per-command git timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Registry base URL.
    #[must_use]
    pub fn registry_url(&self) -> &str {
        &self.registry_url
    }

    fn destination_lock(&self, destination: &Path) -> Arc<Mutex<()>> {
        self.locks
            .entry(destination.to_path_buf())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Open the working copy at `destination`, cloning it if needed.
    ///
    /// Returns the repository and whether it was freshly cloned.
    async fn open_or_clone(&self, destination: &Path, meta: &DependencyMeta) -> Result<(GitRepo, bool)> {
        let repo = GitRepo::new(destination).with_timeout(self.timeout).with_context(meta.to_string());

        if destination.exists() {
            if is_valid_git_repo(destination) {
                return Ok((repo, false));
            }
            warn!(
                target: "pawnpm::fetch",
                "{} is not a git repository (interrupted clone?), removing it",
                destination.display()
            );
            remove_dir_all(destination).await?;
        }

        if let Some(parent) = destination.parent() {
            ensure_dir(parent)?;
        }

        let url = meta.url_with_base(&self.registry_url);
        info!(target: "pawnpm::fetch", "Cloning {} into {}", url, destination.display());
        repo.clone_remote(&url).await?;
        Ok((repo, true))
    }

    async fn fetch_locked(&self, vendor_dir: &Path, meta: &DependencyMeta) -> Result<ResolvedRef> {
        let destination = meta.vendor_location(vendor_dir);
        let (repo, fresh) = self.open_or_clone(&destination, meta).await?;

        if meta.version.is_empty() {
            if !fresh {
                repo.fetch().await?;
            }
            let branch = repo.checkout_default_branch().await?;
            let commit = repo.get_current_commit().await?;
            debug!(target: "pawnpm::fetch", "{} at {} tip {}", meta, branch, commit);
            return Ok(ResolvedRef { commit, tag: None });
        }

        if !fresh {
            if let Some(resolved) = locate(&repo, &meta.version).await? {
                if resolved.commit == repo.get_current_commit().await? {
                    debug!(target: "pawnpm::fetch", "{} already at {}", meta, resolved);
                    return Ok(resolved);
                }
            }
            repo.fetch().await?;
        }

        let resolved = locate(&repo, &meta.version).await?.ok_or_else(|| PawnpmError::VersionNotFound {
            dependency: meta.repository(),
            version: meta.version.clone(),
        })?;

        repo.checkout_commit(&resolved.commit).await?;
        debug!(target: "pawnpm::fetch", "{} checked out at {}", meta, resolved);
        Ok(resolved)
    }
}

/// Resolve a pinned version to a commit, tags first.
async fn locate(repo: &GitRepo, version: &str) -> Result<Option<ResolvedRef>> {
    if let Some(commit) = repo.resolve_tag(version).await? {
        return Ok(Some(ResolvedRef {
            commit,
            tag: Some(version.to_string()),
        }));
    }
    Ok(repo
        .resolve_commit(version)
        .await?
        .map(|commit| ResolvedRef { commit, tag: None }))
}

/// Lock file name for a repository; `@` cannot occur in owner or repository names.
fn lock_name(meta: &DependencyMeta) -> String {
    format!("{}@{}", meta.user, meta.repo)
}

impl Fetcher for GitFetcher {
    async fn fetch(&self, vendor_dir: &Path, meta: &DependencyMeta) -> Result<ResolvedRef> {
        let destination = meta.vendor_location(vendor_dir);
        let mutex = self.destination_lock(&destination);
        let _guard = mutex.lock().await;

        ensure_dir(vendor_dir)?;
        let _file_lock = VendorLock::acquire(vendor_dir, &lock_name(meta))
            .await
            .with_context(|| format!("Failed to lock {}", destination.display()))?;

        self.fetch_locked(vendor_dir, meta).await
    }
}
