//! Presentation: text formatters for command results.

use crate::manifest::{Generation, Manifest};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use std::path::Path;

pub fn format_generation(generation: &Generation, saved_to: Option<&Path>) -> String {
    let mut out = format!(
        "Root hash: {}\nFiles: {}",
        hex::encode(generation.root_digest),
        generation.entries
    );
    if let Some(path) = saved_to {
        out.push_str(&format!("\nSaved: {}", path.display()));
    }
    if let Some(warning) = generation.warning() {
        out.push_str(&format!(
            "\n\n{} ({}):",
            "Skipped unreadable paths".yellow(),
            warning.paths.len()
        ));
        for path in &warning.paths {
            out.push_str(&format!("\n  - {}", path));
        }
    }
    out
}

pub fn format_verify(saved: &Manifest, current: &Generation, unchanged: bool) -> String {
    let status = if unchanged {
        "OK".green().to_string()
    } else {
        "CHANGED".red().to_string()
    };
    let saved_hash = saved
        .root_digest()
        .map(hex::encode)
        .unwrap_or_else(|| "-".to_string());
    let mut out = format!(
        "{}\n  Saved hash:   {}\n  Current hash: {}",
        status,
        saved_hash,
        hex::encode(current.root_digest)
    );
    if !current.is_complete() {
        out.push_str(&format!(
            "\n  {} {} unreadable path(s) skipped",
            "Warning:".yellow(),
            current.skipped.len()
        ));
    }
    out
}

pub fn format_manifest_table(manifest: &Manifest) -> String {
    let mut out = format!("Root: {}\n", manifest.root().display());
    match manifest.root_digest() {
        Some(digest) => out.push_str(&format!("Hash: {}\n", hex::encode(digest))),
        None => out.push_str("Hash: (unhashed)\n"),
    }
    if !manifest.ignore_paths().is_empty() {
        out.push_str(&format!("Ignored: {}\n", manifest.ignore_paths().join(", ")));
    }

    let Some(archive) = manifest.archive() else {
        out.push_str("Archive: (uninitialized)\n");
        return out;
    };

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Path", "Digest"]);
    for (path, digest) in archive {
        table.add_row(vec![path.clone(), hex::encode(digest)]);
    }
    out.push_str(&format!("\n{}\n", table));
    out
}
