//! `pawnpm resources`: show which resources a platform would use.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use crate::cli::CommandContext;
use crate::manifest::{Package, Resource};

/// List the package's resources that apply to a platform.
#[derive(Args, Debug, Default)]
pub struct ResourcesCommand {
    /// Platform to select for (default: configured platform, else this host)
    #[arg(long, value_name = "NAME")]
    pub platform: Option<String>,
}

impl ResourcesCommand {
    /// Run the command.
    pub async fn execute(self, ctx: &CommandContext) -> Result<()> {
        let package = Package::load_from_dir(&ctx.package_dir, true)?;
        for resource in &package.resources {
            resource.validate()?;
        }

        let platform = self.platform.unwrap_or_else(|| ctx.config.platform());
        let selected = package.applicable_resources(&platform);

        if ctx.quiet {
            return Ok(());
        }

        if selected.is_empty() {
            println!("No resources apply to {platform}");
            return Ok(());
        }

        println!("Resources for {}:", platform.bold());
        for resource in selected {
            println!("  {}", describe(resource));
        }
        Ok(())
    }
}

fn describe(resource: &Resource) -> String {
    let mut line = resource.name.clone();
    if resource.platform.is_empty() {
        line.push_str(" (any platform)");
    }
    if resource.archive {
        line.push_str(" [archive]");
        if !resource.includes.is_empty() {
            line.push_str(&format!(" includes: {}", resource.includes.join(", ")));
        }
        if !resource.plugins.is_empty() {
            line.push_str(&format!(" plugins: {}", resource.plugins.join(", ")));
        }
        if !resource.files.is_empty() {
            line.push_str(&format!(" files: {}", resource.files.len()));
        }
    }
    line
}
