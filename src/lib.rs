//! pawnpm - Pawn Package Manager
//!
//! A package manager for Pawn scripts that uses GitHub as its registry. A package
//! is a git repository with a `pawn.json` (or `pawn.yaml`) manifest; dependencies
//! are written as `owner/repository[:subpath][@version]` and are vendored, with
//! their own dependencies, into the root package's `dependencies/` directory.
//!
//! # Architecture Overview
//!
//! - A [`dependency::DependencyMeta`] is the parsed identity of a reference.
//! - A [`manifest::Package`] is a loaded manifest plus where it lives on disk.
//! - The [`resolver::Resolver`] walks the dependency graph depth-first and asks a
//!   [`fetch::Fetcher`] to make each repository present at the requested version.
//! - [`fetch::GitFetcher`] implements that with the system `git` binary.
//!
//! # Core Modules
//!
//! - [`dependency`] - Reference parsing and dependency identity
//! - [`manifest`] - Manifest loading, validation, saving and resource selection
//! - [`resolver`] - Transitive dependency resolution into a flat vendor directory
//! - [`fetch`] - Fetcher abstraction and the git-backed implementation
//! - [`git`] - Thin async wrapper over the `git` command
//! - [`config`] - Global configuration (`~/.pawnpm/config.toml`)
//! - [`cli`] - Command-line interface
//! - [`core`] - Error types and user-facing error formatting
//! - [`utils`] - File system and platform helpers
//!
//! # Manifest Format
//!
//! ```json
//! {
//!   "user": "Southclaws",
//!   "repo": "gamemode",
//!   "entry": "gamemodes/main.pwn",
//!   "output": "gamemodes/main.amx",
//!   "dependencies": [
//!     "pawn-lang/samp-stdlib@0.3.7",
//!     "Southclaws/samp-logger:includes@1.1.0"
//!   ]
//! }
//! ```
//!
//! # Vendor Layout
//!
//! Every repository in the closure is cloned once under the root package,
//! regardless of how deep in the graph it was required:
//!
//! ```text
//! gamemode/
//! ├── pawn.json
//! └── dependencies/
//!     ├── .locks/
//!     ├── pawn-lang/samp-stdlib/
//!     └── Southclaws/samp-logger/
//! ```
//!
//! # Library Usage
//!
//! ```rust,no_run
//! use pawnpm::manifest::Package;
//! use pawnpm::resolver::Resolver;
//! use pawnpm::fetch::GitFetcher;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let mut root = Package::load_from_dir(std::path::Path::new("."), true)?;
//! let resolver = Resolver::new(GitFetcher::default());
//! resolver.ensure_dependencies(&mut root).await?;
//!
//! for dependency in &root.all_dependencies {
//!     println!("{} at {}", dependency.meta, dependency.reference);
//! }
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod dependency;
pub mod fetch;
pub mod git;
pub mod manifest;
pub mod resolver;
pub mod utils;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
