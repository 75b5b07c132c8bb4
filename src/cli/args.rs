//! CLI argument definitions using clap
//!
//! Commands:
//! - collview find --config <path> [--view <name>]
//! - collview find-one --config <path> [--view <name>]
//! - collview update --config <path> [--view <name>]
//! - collview remove --config <path> [--view <name>]
//! - collview upsert --config <path> [--view <name>]
//! - collview explain --config <path> [--view <name>]
//! - collview views --config <path>

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// collview - scoped views over a JSON document collection
#[derive(Parser, Debug)]
#[command(name = "collview")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Configuration file and the view an operation runs through
#[derive(Args, Debug, Clone)]
pub struct Target {
    /// Path to configuration file
    #[arg(long, default_value = "./collview.json")]
    pub config: PathBuf,

    /// View to operate through; defaults to the whole collection
    #[arg(long)]
    pub view: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Find documents matching the request selector
    Find {
        #[command(flatten)]
        target: Target,
    },

    /// Find the first document matching the request selector
    FindOne {
        #[command(flatten)]
        target: Target,
    },

    /// Apply the request modifier to matching documents
    Update {
        #[command(flatten)]
        target: Target,
    },

    /// Remove matching documents
    Remove {
        #[command(flatten)]
        target: Target,
    },

    /// Update matching documents or insert one
    Upsert {
        #[command(flatten)]
        target: Target,
    },

    /// Print the merged selector and options without running them
    Explain {
        #[command(flatten)]
        target: Target,
    },

    /// List the configured views
    Views {
        /// Path to configuration file
        #[arg(long, default_value = "./collview.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
