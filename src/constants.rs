//! Global constants used throughout the pawnpm codebase.
//!
//! File names, directory names and timeouts that more than one module
//! depends on live here so they cannot drift apart.

use std::time::Duration;

/// Manifest file name for packages described in JSON.
pub const MANIFEST_JSON: &str = "pawn.json";

/// Manifest file name for packages described in YAML.
pub const MANIFEST_YAML: &str = "pawn.yaml";

/// Directory under a package root that holds vendored dependencies.
pub const VENDOR_DIR_NAME: &str = "dependencies";

/// Directory under the vendor directory holding advisory lock files.
pub const LOCKS_DIR_NAME: &str = ".locks";

/// Host used for canonical package URLs.
pub const REGISTRY_HOST: &str = "github.com";

/// Base URL repositories are cloned from unless configured otherwise.
pub const DEFAULT_REGISTRY_URL: &str = "https://github.com";

/// Default timeout for a single git command (5 minutes).
///
/// Clones of large plugin repositories over slow links can take minutes;
/// anything longer is almost always a credential prompt waiting for input.
pub const DEFAULT_GIT_TIMEOUT: Duration = Duration::from_secs(300);
