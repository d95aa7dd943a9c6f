//! Content hashing for individual files using BLAKE3

use crate::error::HashError;
use crate::types::Digest;
use blake3::Hasher;
use std::fs::File;
use std::io;
use std::path::Path;

/// Computes the content digest of a single file.
///
/// Failures must be classified so that permission problems can be told
/// apart from other I/O errors.
pub trait FileHasher {
    fn hash_file(&self, path: &Path) -> Result<Digest, HashError>;
}

/// Streams file contents through BLAKE3
#[derive(Debug, Clone, Copy, Default)]
pub struct Blake3FileHasher;

impl FileHasher for Blake3FileHasher {
    fn hash_file(&self, path: &Path) -> Result<Digest, HashError> {
        let mut file = File::open(path).map_err(|e| HashError::new(path, e))?;
        let mut hasher = Hasher::new();
        io::copy(&mut file, &mut hasher).map_err(|e| HashError::new(path, e))?;
        Ok(*hasher.finalize().as_bytes())
    }
}

/// Compute content hash for in-memory bytes
pub fn compute_content_hash(content: &[u8]) -> Digest {
    let mut hasher = Hasher::new();
    hasher.update(content);
    *hasher.finalize().as_bytes()
}
