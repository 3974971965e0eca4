//! `pawnpm validate`: check the package manifest without fetching anything.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use crate::cli::CommandContext;
use crate::core::PawnpmError;
use crate::manifest::Package;

/// Check that the manifest parses, names an entry and an output, and that
/// every declared dependency reference is well formed.
#[derive(Args, Debug, Default)]
pub struct ValidateCommand {}

impl ValidateCommand {
    /// Run the command.
    pub async fn execute(self, ctx: &CommandContext) -> Result<()> {
        let package = Package::load_from_dir(&ctx.package_dir, true)?;

        package.validate().map_err(|e| PawnpmError::ManifestValidationError {
            reason: e.to_string(),
        })?;

        for reference in &package.dependencies {
            reference.explode()?;
        }

        if !ctx.quiet {
            println!(
                "{} {} is valid ({} manifest, {} dependencies, {} resources)",
                "✓".green(),
                package.identity_string(),
                package.format,
                package.dependencies.len(),
                package.resources.len()
            );
        }

        Ok(())
    }
}
