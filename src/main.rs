//! pawnpm CLI entry point
//!
//! Parses arguments, runs the selected command and prints failures with
//! suggestions. Commands:
//! - `ensure` - Vendor all dependencies of the package
//! - `validate` - Check the manifest without fetching
//! - `add` - Declare a new dependency
//! - `resources` - Show the resources that apply to a platform

use anyhow::Result;
use clap::Parser;
use pawnpm::cli;
use pawnpm::core::user_friendly_error;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute().await {
        Ok(()) => Ok(()),
        Err(e) => {
            user_friendly_error(e).display();
            std::process::exit(1);
        }
    }
}
