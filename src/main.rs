//! Daily AbleSci check-in for every configured account
//!
//! Reads accounts from `ABLESCI_ACCOUNTS`, checks each one in, prints a
//! timestamped report and sends a notification unless every account was
//! already checked in.
//!
//! # Usage
//!
//! ```bash
//! ABLESCI_ACCOUNTS="alice@example.com:password" ablesci-checkin
//! ```
//!
//! The process always exits successfully; failures show up in the report.

use clap::Parser;

use ablesci_checkin::{
    cli::{RunArgs, run_checkin_mode},
    utils::VERSION,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "ablesci-checkin")]
#[command(disable_version_flag = true)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long, value_name = "FILE")]
    config: Option<std::path::PathBuf>,

    /// Show version information
    #[arg(long)]
    version: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Handle version flag early
    if cli.version {
        println!("{}", VERSION);
        return Ok(());
    }

    let args = RunArgs {
        config: cli.config,
        verbose: cli.verbose,
    };

    if let Err(e) = run_checkin_mode(args).await {
        eprintln!("Check-in run finished with an error: {}", e);
    }

    Ok(())
}
