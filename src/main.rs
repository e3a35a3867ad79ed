//! spoiler-check - end-to-end scenario runner for the Story Spoiler API

use clap::Parser;
use spoiler_check::commands::Commands;
use spoiler_check::{cli, common::logging};

#[derive(Parser)]
#[command(name = "spoiler-check", about = "Story Spoiler API scenario runner")]
#[command(version, long_about = None)]
struct Cli {
    /// Log request and response details
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    logging::init_cli(cli.verbose);

    if let Err(e) = cli::dispatch(cli.command).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
