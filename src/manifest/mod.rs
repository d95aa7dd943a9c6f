//! Manifest (the "block map")
//!
//! A manifest records the content digest of every file under a root
//! directory, a root digest over the canonical archive, and the ignore
//! policy used to produce it. It is populated by one generation pass,
//! persisted as a single JSON file inside the tree it describes, and
//! compared structurally against other manifests.

mod generate;
mod persistence;

pub use generate::Generation;

use crate::archive::{self, Archive};
use crate::error::ManifestError;
use crate::tree::path::normalize_ignore_prefix;
use crate::types::Digest;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Default reserved file name for a persisted manifest
pub const DEFAULT_OUTPUT_NAME: &str = ".link";

/// Construction-time policy for a manifest
#[derive(Debug, Clone)]
pub struct ManifestOptions {
    /// Reserved file name; saved as `<name><output_name>` and never inventoried
    pub output_name: String,
    /// Relative path prefixes excluded from hashing
    pub ignore_paths: Vec<String>,
    /// Skip unreadable files instead of failing generation
    pub auto_ignore: bool,
    /// Names of extra saves; each `<name><output_name>` at the root is
    /// reserved and never inventoried
    pub saved_names: Vec<String>,
}

impl Default for ManifestOptions {
    fn default() -> Self {
        Self {
            output_name: DEFAULT_OUTPUT_NAME.to_string(),
            ignore_paths: Vec::new(),
            auto_ignore: false,
            saved_names: Vec::new(),
        }
    }
}

/// Content inventory of a directory tree
#[derive(Debug, Clone)]
pub struct Manifest {
    archive: Option<Archive>,
    root_digest: Option<Digest>,
    root: PathBuf,
    ignore_paths: Vec<String>,
    auto_ignore: bool,
    output_name: String,
    saved_names: Vec<String>,
}

impl Manifest {
    /// Create an empty, ungenerated manifest rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_options(root, ManifestOptions::default())
    }

    pub fn with_options(root: impl Into<PathBuf>, options: ManifestOptions) -> Self {
        let mut manifest = Self {
            archive: Some(Archive::new()),
            root_digest: None,
            root: root.into(),
            ignore_paths: Vec::new(),
            auto_ignore: options.auto_ignore,
            output_name: options.output_name,
            saved_names: Vec::new(),
        };
        manifest.set_ignore_paths(options.ignore_paths);
        for name in options.saved_names {
            manifest.add_saved_name(&name);
        }
        manifest
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The archive, or `None` if a loaded record carried no archive
    pub fn archive(&self) -> Option<&Archive> {
        self.archive.as_ref()
    }

    /// Mutable access to the archive.
    ///
    /// Any mutation makes the root digest stale, so it is cleared here and
    /// must be regenerated before the manifest can be saved.
    pub fn archive_mut(&mut self) -> &mut Archive {
        self.root_digest = None;
        self.archive.get_or_insert_with(Archive::new)
    }

    /// Root digest from the last successful generation or load
    pub fn root_digest(&self) -> Option<&Digest> {
        self.root_digest.as_ref()
    }

    pub fn ignore_paths(&self) -> &[String] {
        &self.ignore_paths
    }

    pub fn auto_ignore(&self) -> bool {
        self.auto_ignore
    }

    pub fn set_auto_ignore(&mut self, auto_ignore: bool) {
        self.auto_ignore = auto_ignore;
    }

    pub fn output_name(&self) -> &str {
        &self.output_name
    }

    pub fn saved_names(&self) -> &[String] {
        &self.saved_names
    }

    /// Reserve `<name><output_name>` so a save under that name is not
    /// inventoried by later generations.
    pub fn add_saved_name(&mut self, name: &str) {
        if !name.is_empty() && !self.saved_names.iter().any(|n| n == name) {
            self.saved_names.push(name.to_string());
        }
    }

    /// Construction options that reproduce this manifest's policy
    pub fn options(&self) -> ManifestOptions {
        ManifestOptions {
            output_name: self.output_name.clone(),
            ignore_paths: self.ignore_paths.clone(),
            auto_ignore: self.auto_ignore,
            saved_names: self.saved_names.clone(),
        }
    }

    /// Replace the ignore set, dropping duplicates and empty prefixes.
    pub fn set_ignore_paths<I, S>(&mut self, paths: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.ignore_paths.clear();
        for path in paths {
            self.add_ignore_path(path.as_ref());
        }
    }

    /// Add one ignore prefix unless it is already present.
    pub fn add_ignore_path(&mut self, path: &str) {
        push_ignore_path(&mut self.ignore_paths, path);
    }

    /// Whether a normalized relative path falls under an ignore prefix
    pub fn is_ignored(&self, rel_path: &str) -> bool {
        matches_ignore(&self.ignore_paths, rel_path)
    }

    /// Recompute the digest of the current archive without storing it
    pub fn compute_root_digest(&self) -> Result<Digest, ManifestError> {
        archive::root_digest(self.archive.as_ref())
    }

    /// Check that the stored root digest matches the archive it claims to cover.
    ///
    /// Loading never performs this check on its own.
    pub fn verify(&self) -> Result<(), ManifestError> {
        let stored = self
            .root_digest
            .ok_or(ManifestError::NotGenerated { op: "Verify" })?;
        let computed = self.compute_root_digest()?;
        if stored != computed {
            return Err(ManifestError::DigestMismatch {
                stored: hex::encode(stored),
                computed: hex::encode(computed),
            });
        }
        Ok(())
    }
}

fn push_ignore_path(ignore_paths: &mut Vec<String>, path: &str) {
    let normalized = normalize_ignore_prefix(path);
    if normalized.is_empty() {
        warn!(path, "Ignoring empty ignore prefix");
        return;
    }
    if !ignore_paths.contains(&normalized) {
        ignore_paths.push(normalized);
    }
}

fn matches_ignore(ignore_paths: &[String], rel_path: &str) -> bool {
    ignore_paths
        .iter()
        .any(|prefix| rel_path.starts_with(prefix.as_str()))
}

/// Structural equality of two manifests.
///
/// Two manifests are equal when their root digests match byte for byte and
/// their canonical archives serialize to identical bytes. The described root
/// directory and the ignore policy are metadata and do not participate.
pub fn equal(a: &Manifest, b: &Manifest) -> bool {
    if a.root_digest != b.root_digest {
        return false;
    }

    match (canonical_bytes(a), canonical_bytes(b)) {
        (Some(a_bytes), Some(b_bytes)) => a_bytes == b_bytes,
        _ => false,
    }
}

fn canonical_bytes(manifest: &Manifest) -> Option<Vec<u8>> {
    match &manifest.archive {
        Some(archive) => match archive.marshal_canonical() {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                warn!(root = %manifest.root.display(), "Failed to encode archive: {}", e);
                None
            }
        },
        // Mirrors the `null` an uninitialized archive persists as
        None => Some(b"null".to_vec()),
    }
}

impl PartialEq for Manifest {
    fn eq(&self, other: &Self) -> bool {
        equal(self, other)
    }
}

impl fmt::Display for Manifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Root: {}", self.root.display())?;
        match &self.root_digest {
            Some(digest) => writeln!(f, "Hash: {}", hex::encode(digest))?,
            None => writeln!(f, "Hash: (unhashed)")?,
        }
        if let Some(archive) = &self.archive {
            for (path, digest) in archive {
                writeln!(f, "{}: {}", path, hex::encode(digest))?;
            }
        }
        Ok(())
    }
}
