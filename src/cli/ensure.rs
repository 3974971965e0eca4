//! `pawnpm ensure`: vendor every dependency of the package.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use crate::cli::CommandContext;
use crate::core::PawnpmError;
use crate::git::ensure_git_available;
use crate::manifest::Package;
use crate::resolver::Resolver;

/// Validate the package and materialize its dependency closure under `dependencies/`.
#[derive(Args, Debug, Default)]
pub struct EnsureCommand {}

impl EnsureCommand {
    /// Run the command.
    pub async fn execute(self, ctx: &CommandContext) -> Result<()> {
        let mut root = Package::load_from_dir(&ctx.package_dir, true)?;
        root.validate().map_err(|e| PawnpmError::ManifestValidationError {
            reason: e.to_string(),
        })?;

        ensure_git_available()?;

        let resolver = Resolver::from_config(&ctx.config);
        resolver.ensure_dependencies(&mut root).await?;

        if !ctx.quiet {
            for dependency in &root.all_dependencies {
                println!(
                    "  {} {} {}",
                    "+".green(),
                    dependency.meta,
                    dependency.reference.to_string().dimmed()
                );
            }
            println!(
                "{} Ensured {} dependencies for {}",
                "✓".green(),
                root.all_dependencies.len(),
                root.identity_string()
            );
        }

        Ok(())
    }
}
