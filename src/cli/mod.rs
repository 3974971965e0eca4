//! Command-line interface for pawnpm
//!
//! # Commands
//!
//! - `ensure` - validate the package and vendor all of its dependencies
//! - `validate` - check the package manifest without touching the network
//! - `add` - declare a new dependency in the manifest
//! - `resources` - list the resources that apply to a platform
//!
//! # Global Options
//!
//! - `--verbose` / `-v` - debug logging
//! - `--quiet` / `-q` - errors only
//! - `--config <PATH>` - global configuration file (default `~/.pawnpm/config.toml`)
//! - `--dir <PATH>` - package directory (default: current directory)
//!
//! Log filtering honours `RUST_LOG` when set, e.g.
//! `RUST_LOG=pawnpm=debug,git=debug pawnpm ensure`.

mod add;
mod ensure;
mod resources;
mod validate;


use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::config::GlobalConfig;

pub use add::AddCommand;
pub use ensure::EnsureCommand;
pub use resources::ResourcesCommand;
pub use validate::ValidateCommand;

/// Settings derived from the global flags, applied before any command runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliConfig {
    /// Default log filter when `RUST_LOG` is not set; `None` logs nothing
    pub log_level: Option<String>,

    /// Global configuration file to load instead of the default one
    pub config_path: Option<PathBuf>,

    /// Directory of the package to operate on
    pub package_dir: Option<PathBuf>,

    /// Suppress informational output
    pub quiet: bool,
}

/// Everything a command needs to run.
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// Root directory of the package being worked on
    pub package_dir: PathBuf,

    /// Loaded global configuration
    pub config: GlobalConfig,

    /// Suppress informational output
    pub quiet: bool,
}

impl CommandContext {
    /// Resolve the package directory and load the global configuration.
    pub async fn from_cli_config(config: &CliConfig) -> Result<Self> {
        let package_dir = match &config.package_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().context("Failed to determine current directory")?,
        };

        Ok(Self {
            package_dir,
            config: GlobalConfig::load_with_optional(config.config_path.clone()).await?,
            quiet: config.quiet,
        })
    }
}

/// Pawn package manager: vendors GitHub-hosted Pawn packages into `dependencies/`.
#[derive(Parser, Debug)]
#[command(name = "pawnpm", version, about, long_about = None)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the global configuration file
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Package directory to operate on
    #[arg(long, global = true, value_name = "PATH")]
    dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate the package and vendor every dependency it needs
    Ensure(EnsureCommand),

    /// Check the package manifest for errors
    Validate(ValidateCommand),

    /// Add a dependency to the package manifest
    Add(AddCommand),

    /// List resources applicable to a platform
    Resources(ResourcesCommand),
}

impl Cli {
    /// Run the selected command with settings taken from the global flags.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config).await
    }

    /// Translate the global flags into a [`CliConfig`].
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            None
        } else {
            Some("info".to_string())
        };

        CliConfig {
            log_level,
            config_path: self.config.clone(),
            package_dir: self.dir.clone(),
            quiet: self.quiet,
        }
    }

    /// Run the selected command with an explicit configuration.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        init_logging(config.log_level.as_deref());
        let ctx = CommandContext::from_cli_config(&config).await?;

        match self.command {
            Commands::Ensure(cmd) => cmd.execute(&ctx).await,
            Commands::Validate(cmd) => cmd.execute(&ctx).await,
            Commands::Add(cmd) => cmd.execute(&ctx).await,
            Commands::Resources(cmd) => cmd.execute(&ctx).await,
        }
    }
}

/// Log filter for a level: pawnpm's own targets at `level`, everything else at `warn`.
fn log_filter(level: &str) -> String {
    format!("warn,pawnpm={level},git={level},git::perf={level}")
}

/// Install the global tracing subscriber, writing to stderr.
///
/// `RUST_LOG` wins over `level`. With neither, nothing is logged.
fn init_logging(level: Option<&str>) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if let Some(level) = level {
        EnvFilter::new(log_filter(level))
    } else {
        return;
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
