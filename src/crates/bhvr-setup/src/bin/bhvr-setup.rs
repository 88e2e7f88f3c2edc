//! bhvr-setup CLI - one-time provisioning for the bhvr fullstack starter
//!
//! Main entry point for the bhvr-setup command-line tool.

use bhvr_setup::console;
use bhvr_setup::{Setup, StdinPrompt, WranglerCli, DEFAULT_CONFIG_PATH};
use clap::Parser;
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser)]
#[command(name = "bhvr-setup")]
#[command(about = "Provision a Cloudflare D1 database for the bhvr stack", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"), long_version = bhvr_setup::version_info())]
struct Cli {
    /// Path to the server's wrangler configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing; status lines go through the console module, so
    // logging stays quiet unless asked for
    let max_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt().with_max_level(max_level).init();
    debug!("{}", bhvr_setup::version_info());

    let mut setup = Setup::new(WranglerCli::new(), StdinPrompt, cli.config);

    // Remediation has already been printed by the failing stage
    if let Err(e) = setup.run().await {
        debug!(error = %e, "Setup aborted");
        console::error("Setup did not complete.");
        std::process::exit(1);
    }

    Ok(())
}
