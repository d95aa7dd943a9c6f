//! Blockmap CLI Binary

use blockmap::cli::{map_error, Cli, RunContext};
use blockmap::config::ConfigLoader;
use blockmap::logging::{init_logging, LoggingConfig};
use clap::Parser;
use std::process;
use tracing::{debug, error};

fn main() {
    let cli = Cli::parse();

    let logging_config = build_logging_config(&cli);
    if let Err(e) = init_logging(Some(&logging_config)) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    let context = match RunContext::new(cli.root.clone(), cli.config.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("Error initializing: {}", e);
            eprintln!("{}", map_error(&e));
            process::exit(1);
        }
    };
    debug!(root = %context.root().display(), "CLI context initialized");

    match context.execute(&cli.command) {
        Ok(outcome) => {
            println!("{}", outcome.output);
            if !outcome.success {
                process::exit(1);
            }
        }
        Err(e) => {
            error!("Command failed: {}", e);
            eprintln!("{}", map_error(&e));
            process::exit(1);
        }
    }
}

/// Build logging configuration from the config file and CLI flags.
/// Precedence: CLI flags override config file override defaults.
fn build_logging_config(cli: &Cli) -> LoggingConfig {
    let loaded = match cli.config {
        Some(ref path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(&cli.root),
    };
    let mut config = loaded.map(|c| c.logging).unwrap_or_default();

    if let Some(ref level) = cli.log_level {
        config.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        config.format = format.clone();
    }

    config
}
