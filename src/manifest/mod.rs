//! Package manifest (`pawn.json` / `pawn.yaml`) model.
//!
//! A manifest describes a Pawn package. The same structure serves two roles:
//!
//! - the **root** package the user is developing, which declares an entry script,
//!   an output file and the dependencies needed to build it;
//! - a **vendored** package living under the root's `dependencies/` directory,
//!   which is often a pure library with nothing but sources and maybe its own
//!   dependency list.
//!
//! # Manifest Format
//!
//! ```json
//! {
//!   "user": "Southclaws",
//!   "repo": "gamemode",
//!   "entry": "gamemode.pwn",
//!   "output": "gamemode.amx",
//!   "dependencies": [
//!     "pawn-lang/samp-stdlib@0.3.7",
//!     "Southclaws/pawn-requests:include@0.10.0"
//!   ],
//!   "builds": [{ "name": "debug", "args": ["-d3"] }],
//!   "runtime": { "gamemodes": ["gamemode"] },
//!   "resources": [
//!     { "name": "^plugin-(.*).zip$", "platform": "linux", "archive": true,
//!       "plugins": ["plugin.so"] }
//!   ]
//! }
//! ```
//!
//! The same keys are used in YAML. The format a package was loaded from is
//! remembered and used again by [`Package::save`].
//!
//! Build and runtime configuration belong to the compiler and server tooling;
//! they are carried through verbatim ([`BuildConfig`], [`RuntimeConfig`]).

mod manifest_io;
mod manifest_validation;
pub mod resource;


use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::{MANIFEST_JSON, MANIFEST_YAML, VENDOR_DIR_NAME};
use crate::dependency::{DependencyMeta, DependencyString, ResolvedDependency};

pub use manifest_io::find_manifest;
pub use manifest_validation::ValidationError;
pub use resource::{Resource, applicable_resources};

/// Serialization format of a manifest file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ManifestFormat {
    /// `pawn.json`
    #[default]
    Json,
    /// `pawn.yaml`
    Yaml,
}

impl ManifestFormat {
    /// File name used for this format at a package root.
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Json => MANIFEST_JSON,
            Self::Yaml => MANIFEST_YAML,
        }
    }
}

impl fmt::Display for ManifestFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => f.write_str("json"),
            Self::Yaml => f.write_str("yaml"),
        }
    }
}

/// One compiler build configuration.
///
/// Only `name` is interpreted (to pick a build); every other key is kept as-is
/// for the compiler collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Build name, used by `--build <name>` style selection
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Remaining compiler settings, untouched
    #[serde(flatten)]
    pub settings: serde_json::Map<String, serde_json::Value>,
}

/// Server runtime configuration, carried verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuntimeConfig(pub serde_json::Value);

/// A Pawn package: identity, dependencies, and build/runtime needs.
///
/// Fields marked "runtime only" describe where the package lives and are never
/// written to the manifest file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Package {
    /// Runtime only: true for the package the user is developing
    #[serde(skip)]
    pub is_root: bool,
    /// Runtime only: directory containing the manifest, when materialized
    #[serde(skip)]
    pub local_path: Option<PathBuf>,
    /// Runtime only: directory this package's dependencies are vendored into
    #[serde(skip)]
    pub vendor_path: Option<PathBuf>,
    /// Runtime only: format the manifest was read from and will be saved in
    #[serde(skip)]
    pub format: ManifestFormat,
    /// Runtime only: resolved dependency closure, filled on the root by the resolver
    #[serde(skip)]
    pub all_dependencies: Vec<ResolvedDependency>,

    /// Identity; for vendored packages inferred from where they were fetched from
    #[serde(flatten)]
    pub meta: DependencyMeta,

    /// Package authors
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contributors: Vec<String>,
    /// Website or forum topic associated with the package
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub website: String,

    /// Entry script passed to the compiler
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub entry: String,
    /// Compiled output file
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub output: String,
    /// Dependency references in declaration order; duplicates are allowed
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<DependencyString>,
    /// Compiler build configurations
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub builds: Vec<BuildConfig>,
    /// Server runtime configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<RuntimeConfig>,
    /// Auxiliary resources (includes, plugin binaries, files), filtered by platform
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<Resource>,
}

impl Package {
    /// In-memory pointer to a remote package; it has no local presence.
    #[must_use]
    pub fn from_dependency(meta: DependencyMeta) -> Self {
        Self {
            meta,
            ..Self::default()
        }
    }

    /// `<user>/<repo>:<version>`, for logs and display.
    ///
    /// This is not a resolution key: it leaves out the subpath.
    #[must_use]
    pub fn identity_string(&self) -> String {
        format!("{}/{}:{}", self.meta.user, self.meta.repo, self.meta.version)
    }

    /// `https://github.com/<user>/<repo>`; the URL is not checked.
    #[must_use]
    pub fn canonical_url(&self) -> String {
        self.meta.canonical_url()
    }

    /// Directory dependencies of this package are vendored into.
    ///
    /// The explicit vendor path when set, otherwise `<local_path>/dependencies`.
    #[must_use]
    pub fn vendor_dir(&self) -> Option<PathBuf> {
        self.vendor_path
            .clone()
            .or_else(|| self.local_path.as_ref().map(|path| path.join(VENDOR_DIR_NAME)))
    }

    /// Resources that apply on `platform`, in declaration order.
    #[must_use]
    pub fn applicable_resources(&self, platform: &str) -> Vec<&Resource> {
        applicable_resources(&self.resources, platform)
    }

    /// Build configuration named `name`, or the first one when no name is given.
    #[must_use]
    pub fn build_config(&self, name: Option<&str>) -> Option<&BuildConfig> {
        match name {
            Some(name) => self.builds.iter().find(|build| build.name == name),
            None => self.builds.first(),
        }
    }

    /// Append a dependency reference after checking it parses.
    ///
    /// # Errors
    ///
    /// Fails when the reference is malformed or already declared verbatim.
    pub fn add_dependency(&mut self, reference: &str) -> anyhow::Result<DependencyMeta> {
        let meta = DependencyMeta::parse(reference)?;
        if self.dependencies.iter().any(|dep| dep.as_str() == reference) {
            anyhow::bail!("Dependency '{reference}' is already declared in {}", self.identity_string());
        }
        self.dependencies.push(DependencyString::new(reference));
        Ok(meta)
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.identity_string())
    }
}
