//! Dependency resolution into a flat vendor directory.
//!
//! [`Resolver::ensure_dependencies`] walks a root package's dependency list
//! depth-first. Each reference is parsed, handed to a [`Fetcher`] which places
//! the repository under `<root>/dependencies/<user>/<repo>`, and the vendored
//! copy's own manifest (if it has one) is read to continue the walk.
//!
//! # Deduplication
//!
//! A resolution key is the full identity `(user, repo, path, version)`. Each key
//! is handled once per call, which absorbs both diamonds (two packages needing
//! the same dependency) and cycles (packages needing each other). Cycles are
//! not errors.
//!
//! # One checkout per repository
//!
//! Keys differ by subpath and version, but the vendor layout only has room for
//! one checkout of each repository. Within a call the resolver remembers the
//! version each directory was checked out at:
//!
//! | already checked out | requested     | outcome                          |
//! |---------------------|---------------|----------------------------------|
//! | `v`                 | `v`           | reuse, no fetch                  |
//! | anything            | (unpinned)    | reuse, no fetch                  |
//! | (unpinned)          | `v`           | fetch `v`, warn                  |
//! | `v`                 | `w` (`w != v`)| [`PawnpmError::VersionConflict`] |
//!
//! # Closure
//!
//! Every resolved key is recorded on the root in
//! [`Package::all_dependencies`]: parents before their children, siblings in
//! declaration order. The list is rebuilt from scratch on every call and only
//! replaces the previous one when the whole walk succeeds.


use anyhow::{Context, Result};
use futures::future::{BoxFuture, FutureExt};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::config::GlobalConfig;
use crate::core::PawnpmError;
use crate::dependency::{DependencyMeta, ResolvedDependency, ResolvedRef};
use crate::fetch::{Fetcher, GitFetcher};
use crate::manifest::Package;

/// State of one [`Resolver::ensure_dependencies`] call.
#[derive(Debug, Default)]
struct ResolutionContext {
    /// Keys already handled
    visited: HashSet<DependencyMeta>,

    /// `user/repo` -> version requested and revision obtained for its directory
    checkouts: HashMap<String, (String, ResolvedRef)>,

    /// Resolved keys in discovery order
    closure: Vec<ResolvedDependency>,
}

/// Walks dependency graphs and vendors every package in them.
#[derive(Debug, Clone)]
pub struct Resolver<F: Fetcher> {
    fetcher: F,
}

impl Resolver<GitFetcher> {
    /// Resolver cloning from the registry configured in `config`.
    #[must_use]
    pub fn from_config(config: &GlobalConfig) -> Self {
        Self::new(GitFetcher::from_config(config))
    }
}

impl<F: Fetcher> Resolver<F> {
    /// Resolver using `fetcher` to materialize packages.
    pub const fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    /// The fetcher packages are materialized with.
    pub const fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Vendor every dependency reachable from `root`.
    ///
    /// `root` must be the package the user is developing, loaded from disk.
    /// On success `root.all_dependencies` holds the resolved closure.
    ///
    /// # Errors
    ///
    /// - [`PawnpmError::NotALocalPackage`] if `root` is not a root package
    ///   whose local path is an existing directory
    /// - a malformed reference, wrapped with the reference and its package
    /// - [`PawnpmError::FetchFailed`] naming the dependency that could not be fetched
    /// - [`PawnpmError::VersionConflict`] when one repository is pinned to two versions
    /// - an unreadable vendored manifest
    ///
    /// Errors from nested packages carry the identity of every package
    /// between the root and the failure.
    pub async fn ensure_dependencies(&self, root: &mut Package) -> Result<()> {
        if !root.is_root {
            return Err(PawnpmError::NotALocalPackage {
                reason: format!("package {} is not the root package", root.identity_string()),
            }
            .into());
        }

        let local_path = root.local_path.as_ref().ok_or_else(|| PawnpmError::NotALocalPackage {
            reason: format!("package {} has no local path", root.identity_string()),
        })?;

        if !local_path.is_dir() {
            return Err(PawnpmError::NotALocalPackage {
                reason: format!("local path {} does not exist", local_path.display()),
            }
            .into());
        }

        let vendor_dir = root.vendor_dir().ok_or_else(|| PawnpmError::NotALocalPackage {
            reason: format!("package {} has no vendor directory", root.identity_string()),
        })?;

        info!(
            target: "pawnpm::resolver",
            "Ensuring {} dependencies of {} in {}",
            root.dependencies.len(),
            root.identity_string(),
            vendor_dir.display()
        );

        let mut ctx = ResolutionContext::default();
        self.resolve_package(root, &vendor_dir, &mut ctx).await?;

        info!(
            target: "pawnpm::resolver",
            "Resolved {} dependencies for {}",
            ctx.closure.len(),
            root.identity_string()
        );
        root.all_dependencies = ctx.closure;
        Ok(())
    }

    /// Resolve every dependency `package` declares, depth-first.
    fn resolve_package<'a>(
        &'a self,
        package: &'a Package,
        vendor_dir: &'a Path,
        ctx: &'a mut ResolutionContext,
    ) -> BoxFuture<'a, Result<()>> {
        async move {
            for reference in &package.dependencies {
                let meta = reference.explode().with_context(|| {
                    format!(
                        "Invalid dependency '{}' declared by {}",
                        reference,
                        package.identity_string()
                    )
                })?;

                if ctx.visited.contains(&meta) {
                    debug!(target: "pawnpm::resolver", "{} already resolved", meta);
                    continue;
                }
                ctx.visited.insert(meta.clone());

                let resolved = self.checkout(vendor_dir, &meta, ctx).await?;
                ctx.closure.push(ResolvedDependency {
                    meta: meta.clone(),
                    reference: resolved,
                });

                let location = meta.vendor_location(vendor_dir);
                let Some(mut nested) = Package::try_load_from_dir(&location)
                    .with_context(|| format!("Failed to read manifest of {meta}"))?
                else {
                    debug!(target: "pawnpm::resolver", "{} has no manifest", meta);
                    continue;
                };

                nested.is_root = false;
                nested.meta = meta.clone();
                nested.vendor_path = Some(vendor_dir.to_path_buf());

                let identity = nested.identity_string();
                self.resolve_package(&nested, vendor_dir, ctx)
                    .await
                    .with_context(|| format!("Failed to ensure package {identity}"))?;
            }
            Ok(())
        }
        .boxed()
    }

    /// Make `meta`'s directory hold the requested version.
    async fn checkout(
        &self,
        vendor_dir: &Path,
        meta: &DependencyMeta,
        ctx: &mut ResolutionContext,
    ) -> Result<ResolvedRef> {
        let repository = meta.repository();

        if let Some((existing, resolved)) = ctx.checkouts.get(&repository) {
            if *existing == meta.version || meta.version.is_empty() {
                debug!(
                    target: "pawnpm::resolver",
                    "{} reuses checkout of {} at {}",
                    meta,
                    repository,
                    resolved
                );
                return Ok(resolved.clone());
            }
            if !existing.is_empty() {
                return Err(PawnpmError::VersionConflict {
                    repository,
                    existing: existing.clone(),
                    requested: meta.version.clone(),
                }
                .into());
            }
            warn!(
                target: "pawnpm::resolver",
                "{} was checked out at its default branch, switching to {}",
                repository,
                meta.version
            );
        }

        debug!(target: "pawnpm::resolver", "Fetching {}", meta);
        let resolved = self.fetcher.fetch(vendor_dir, meta).await.map_err(|e| {
            let reason = e.root_cause().to_string();
            e.context(PawnpmError::FetchFailed {
                dependency: meta.to_string(),
                reason,
            })
        })?;

        // Earlier entries for this directory now point at the new checkout.
        for entry in ctx.closure.iter_mut().filter(|d| d.meta.repository() == repository) {
            entry.reference = resolved.clone();
        }

        ctx.checkouts.insert(repository, (meta.version.clone(), resolved.clone()));
        Ok(resolved)
    }
}
