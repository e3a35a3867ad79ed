//! CLI command definitions
//!
//! Defines the clap commands for spoiler-check.

use clap::{Args, Subcommand};
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Commands {
    /// Authenticate and run the scenario plan against the service
    Run {
        #[command(flatten)]
        target: TargetArgs,

        /// YAML scenario plan to run instead of the built-in suite
        #[arg(long)]
        plan: Option<PathBuf>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the scenario plan in execution order without contacting the service
    List {
        /// YAML scenario plan to show instead of the built-in suite
        #[arg(long)]
        plan: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the configuration file location and effective settings
    Config {
        #[command(flatten)]
        target: TargetArgs,
    },
}

/// Service and account selection, overriding the configuration file
#[derive(Args, Debug, Default)]
pub struct TargetArgs {
    /// Configuration file (default: platform config dir)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Base URL of the Story Spoiler service
    #[arg(long)]
    pub base_url: Option<String>,

    /// Username for authentication
    #[arg(long)]
    pub username: Option<String>,

    /// Password for authentication
    #[arg(long)]
    pub password: Option<String>,
}
