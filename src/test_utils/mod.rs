//! Test utilities for pawnpm
//!
//! Shared by unit tests and, through the `test-utils` feature, by the
//! integration suite:
//!
//! - [`init_test_logging`] wires `tracing` output into the test harness
//! - [`TestGit`] drives the `git` binary to build fixture repositories
//! - [`TestRegistry`] / [`TestProject`] lay out a local registry and a root package
//!
//! # Example
//!
//! ```rust,no_run
//! use pawnpm::test_utils::{TestProject, TestRegistry};
//!
//! # fn example() -> anyhow::Result<()> {
//! let registry = TestRegistry::new()?;
//! registry.create_package("Southclaws", "samp-logger", None)?;
//!
//! let project = TestProject::new(&["Southclaws/samp-logger"])?;
//! assert!(project.path().join("pawn.json").exists());
//! # Ok(())
//! # }
//! ```

pub mod fixtures;
pub mod git_helper;

pub use fixtures::{TestProject, TestRegistry};
pub use git_helper::TestGit;

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Uses `level` when given, otherwise `RUST_LOG`; with neither, tests stay
/// silent.
///
/// ```bash
/// RUST_LOG=pawnpm=debug,git=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}
