//! CLI definitions for Bootline.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Bootline CLI.
#[derive(Parser)]
#[command(name = "bootline")]
#[command(about = "Load extensions in order and report when they are ready")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "bootline.toml", global = true, env = "BOOTLINE_CONFIG")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Load the configured extensions and run their post-start hooks (default)
    Run {
        /// Skip `after_app_start` hooks
        #[arg(long)]
        no_hooks: bool,
    },

    /// Validate the configuration file
    Check,

    /// List the modules the built-in catalog provides
    Modules,
}
