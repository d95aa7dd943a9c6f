//! Filesystem walker for discovering the files under a manifest root

use crate::error::WalkError;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use walkdir::WalkDir;

/// Discovers absolute file paths under a root.
///
/// `files` may return paths in any order; the archive is responsible for
/// deterministic output.
pub trait Walker {
    /// Traverse the root, replacing any previously discovered files.
    fn walk(&mut self) -> Result<(), WalkError>;

    /// Absolute paths found by the last successful `walk`.
    fn files(&self) -> &[PathBuf];

    /// Root this walker traverses.
    fn root(&self) -> &Path;
}

/// `walkdir`-backed walker over the real filesystem.
///
/// Symbolic links are never followed, so every discovered path stays under
/// the root and a link's target is not inventoried.
#[derive(Debug)]
pub struct FsWalker {
    root: PathBuf,
    files: Vec<PathBuf>,
}

impl FsWalker {
    /// Create a new walker for the given root path
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            files: Vec::new(),
        }
    }
}

impl Walker for FsWalker {
    fn walk(&mut self) -> Result<(), WalkError> {
        if !self.root.is_dir() {
            return Err(WalkError::InvalidRoot(self.root.clone()));
        }

        let walker = WalkDir::new(&self.root).follow_links(false);

        let mut files = Vec::new();
        for entry in walker {
            let entry = entry.map_err(|e| {
                let path = e.path().map(Path::to_path_buf);
                let source = e
                    .into_io_error()
                    .unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, "filesystem loop"));
                WalkError::Traversal {
                    root: self.root.clone(),
                    path,
                    source,
                }
            })?;

            // Symlinks and directories are not inventoried
            if !entry.file_type().is_file() {
                trace!(path = %entry.path().display(), "Skipping non-file entry");
                continue;
            }

            files.push(entry.into_path());
        }

        debug!(root = %self.root.display(), file_count = files.len(), "Walked filesystem");
        self.files = files;
        Ok(())
    }

    fn files(&self) -> &[PathBuf] {
        &self.files
    }

    fn root(&self) -> &Path {
        &self.root
    }
}
