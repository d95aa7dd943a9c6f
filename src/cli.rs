//! CLI domain: parse, route, output, and presentation only.
//! Manifest logic lives in `crate::manifest`; this layer wires it to the terminal.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::map_error;
pub use parse::{Cli, Commands};
pub use presentation::{format_generation, format_manifest_table, format_verify};
pub use route::{RunContext, RunOutcome};
