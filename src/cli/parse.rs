//! CLI parse: clap types for blockmap. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Blockmap CLI - content manifests for directory trees
#[derive(Parser)]
#[command(name = "blockmap")]
#[command(about = "Record and verify a deterministic content manifest of a directory")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory the manifest describes (and is saved in)
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Configuration file path (overrides <root>/.blockmap.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Hash every file under the root and save the manifest
    Generate {
        /// Save as <name><output name> instead of the default file
        #[arg(long)]
        name: Option<String>,

        /// Relative path prefix to exclude (repeatable)
        #[arg(long = "ignore")]
        ignore: Vec<String>,

        /// Skip files that cannot be read instead of failing
        #[arg(long)]
        auto_ignore: bool,

        /// Print the root digest without writing the manifest
        #[arg(long)]
        no_save: bool,
    },
    /// Regenerate and compare against the saved manifest
    Verify {
        #[arg(long)]
        name: Option<String>,
    },
    /// Print the saved manifest
    Show {
        #[arg(long)]
        name: Option<String>,
    },
}
