//! Manifest generation: traversal, ignore policy, hashing, root digest

use super::{matches_ignore, push_ignore_path, Manifest};
use crate::archive::{self, Archive};
use crate::error::{IgnoredPathsWarning, ManifestError};
use crate::tree::path;
use crate::tree::{Blake3FileHasher, FileHasher, FsWalker, Walker};
use crate::types::{short_hex, Digest};
use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info, instrument, trace, warn};

/// Outcome of a successful generation pass.
///
/// `skipped` lists paths excluded because they could not be read while
/// auto-ignore was on. The manifest is valid either way; a non-empty list
/// means it does not cover the whole tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    pub root_digest: Digest,
    pub entries: usize,
    pub skipped: Vec<String>,
}

impl Generation {
    /// True when no path was skipped
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }

    /// The skipped paths as an advisory error, if there were any
    pub fn warning(&self) -> Option<IgnoredPathsWarning> {
        if self.skipped.is_empty() {
            None
        } else {
            Some(IgnoredPathsWarning {
                paths: self.skipped.clone(),
            })
        }
    }
}

impl Manifest {
    /// Whether an archive key is one of this manifest's own saved files.
    ///
    /// Only exact names at the top of the root are reserved: `output_name`
    /// itself and `<name><output_name>` for each registered saved name. Any
    /// other file, whatever its extension, is content.
    pub fn is_manifest_file(&self, key: &str) -> bool {
        match key.strip_suffix(self.output_name.as_str()) {
            Some("") => true,
            Some(prefix) => self.saved_names.iter().any(|name| name == prefix),
            None => false,
        }
    }

    /// Generate the archive from the filesystem under `root`
    pub fn generate(&mut self) -> Result<Generation, ManifestError> {
        let mut walker = FsWalker::new(self.root.clone());
        self.generate_with(&mut walker, &Blake3FileHasher)
    }

    /// Generate the archive using the given walker and hasher.
    ///
    /// The new archive is only committed once every path has been handled
    /// and the root digest computed; on a fatal error the manifest keeps its
    /// previous state.
    #[instrument(skip_all, fields(root = %self.root.display()))]
    pub fn generate_with<W, H>(
        &mut self,
        walker: &mut W,
        hasher: &H,
    ) -> Result<Generation, ManifestError>
    where
        W: Walker + ?Sized,
        H: FileHasher + ?Sized,
    {
        let start = Instant::now();
        info!("Starting manifest generation");

        if let Err(source) = walker.walk() {
            error!("Filesystem walk failed: {}", source);
            return Err(ManifestError::Walk {
                root: walker.root().to_path_buf(),
                source,
            });
        }

        let mut archive = Archive::new();
        let mut ignore_paths = self.ignore_paths.clone();
        let mut skipped = Vec::new();
        // Archive key -> originating file, to catch normalization collisions
        let mut origins: HashMap<String, &Path> = HashMap::new();

        for file_path in walker.files() {
            let rel_path = path::relative_to(&self.root, file_path)?;
            let key = path::normalize_relative(rel_path)?;

            if self.is_manifest_file(&key) {
                debug!(path = %key, "Skipping manifest output file");
                continue;
            }
            if matches_ignore(&ignore_paths, &key) {
                trace!(path = %key, "Skipping ignored path");
                continue;
            }

            match hasher.hash_file(file_path) {
                Ok(digest) => {
                    if let Some(first) = origins.insert(key.clone(), file_path.as_path()) {
                        return Err(ManifestError::PathCollision {
                            key,
                            first: first.to_path_buf(),
                            second: file_path.clone(),
                        });
                    }
                    archive.insert(key, digest);
                }
                Err(e) if e.is_permission_denied() && self.auto_ignore => {
                    warn!(path = %key, "Permission denied, auto-ignoring");
                    push_ignore_path(&mut ignore_paths, &key);
                    skipped.push(key);
                }
                Err(e) => {
                    error!(path = %key, "Failed to hash file: {}", e);
                    return Err(ManifestError::Hash(e));
                }
            }
        }

        let root_digest = archive::root_digest(Some(&archive))?;
        let entries = archive.len();

        self.archive = Some(archive);
        self.root_digest = Some(root_digest);
        self.ignore_paths = ignore_paths;

        info!(
            entries,
            skipped = skipped.len(),
            root_digest = %short_hex(&root_digest),
            duration_ms = start.elapsed().as_millis(),
            "Manifest generation completed"
        );

        Ok(Generation {
            root_digest,
            entries,
            skipped,
        })
    }
}
