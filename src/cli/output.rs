//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::ManifestError;

/// Map domain errors to a string for CLI output, including the source chain.
pub fn map_error(e: &ManifestError) -> String {
    let mut message = e.to_string();
    let mut source = std::error::Error::source(e);
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !message.contains(&cause_text) {
            message.push_str(&format!("\n  caused by: {}", cause_text));
        }
        source = cause.source();
    }
    message
}
