//! Blockmap: deterministic content manifests for directory trees
//!
//! A manifest maps every file under a root directory (by normalized relative
//! path) to a BLAKE3 digest of its contents, and summarizes that map with a
//! single root digest over its canonical serialization. Saved manifests can
//! later be compared against a fresh generation to detect any change.

pub mod archive;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod manifest;
pub mod tree;
pub mod types;

pub use archive::Archive;
pub use error::{IgnoredPathsWarning, ManifestError};
pub use manifest::{equal, Generation, Manifest, ManifestOptions};
pub use types::Digest;
