//! `pawnpm add`: declare a dependency.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use crate::cli::CommandContext;
use crate::manifest::Package;

/// Append a dependency reference to the manifest.
///
/// The manifest is written back in the format it was read in. Nothing is
/// fetched; run `pawnpm ensure` afterwards.
#[derive(Args, Debug)]
pub struct AddCommand {
    /// Dependency reference, `owner/repo[:path][@version]`
    #[arg(value_name = "REFERENCE")]
    pub reference: String,
}

impl AddCommand {
    /// Run the command.
    pub async fn execute(self, ctx: &CommandContext) -> Result<()> {
        let mut package = Package::load_from_dir(&ctx.package_dir, true)?;
        let meta = package.add_dependency(&self.reference)?;
        let path = package.save()?;

        tracing::debug!("Added {} to {}", meta, path.display());
        if !ctx.quiet {
            println!("{} Added {} to {}", "✓".green(), meta, path.display());
        }

        Ok(())
    }
}
