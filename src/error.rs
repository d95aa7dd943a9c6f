//! Error types for the manifest engine.
//!
//! Fatal failures abort an operation and are reported as `ManifestError`.
//! Auto-ignored paths are advisory and travel alongside a successful
//! generation as `IgnoredPathsWarning`.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Filesystem traversal errors
#[derive(Debug, Error)]
pub enum WalkError {
    #[error("Root {0} does not exist or is not a directory")]
    InvalidRoot(PathBuf),

    #[error("Failed to walk {root} at {path:?}: {source}")]
    Traversal {
        root: PathBuf,
        path: Option<PathBuf>,
        #[source]
        source: io::Error,
    },
}

/// Classification of a single-file hashing failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashErrorKind {
    PermissionDenied,
    NotFound,
    Io,
}

impl From<io::ErrorKind> for HashErrorKind {
    fn from(kind: io::ErrorKind) -> Self {
        match kind {
            io::ErrorKind::PermissionDenied => HashErrorKind::PermissionDenied,
            io::ErrorKind::NotFound => HashErrorKind::NotFound,
            _ => HashErrorKind::Io,
        }
    }
}

/// Failure to hash one file's contents
#[derive(Debug, Error)]
#[error("Failed to hash {path}: {source}")]
pub struct HashError {
    pub path: PathBuf,
    pub kind: HashErrorKind,
    #[source]
    pub source: io::Error,
}

impl HashError {
    pub fn new(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self {
            path: path.into(),
            kind: source.kind().into(),
            source,
        }
    }

    pub fn is_permission_denied(&self) -> bool {
        self.kind == HashErrorKind::PermissionDenied
    }
}

/// Canonical archive encode/decode errors
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Malformed archive: {0}")]
    Malformed(String),

    #[error("Invalid digest encoding for {path}: {reason}")]
    InvalidEncoding { path: String, reason: String },

    #[error("Digest for {path} has {actual} bytes, expected {expected}")]
    DigestLength {
        path: String,
        expected: usize,
        actual: usize,
    },

    #[error("Duplicate archive key: {0}")]
    DuplicateKey(String),

    #[error("Failed to encode archive: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Fatal manifest errors
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Generate: failed to walk {root}: {source}")]
    Walk {
        root: PathBuf,
        #[source]
        source: WalkError,
    },

    #[error("Generate: {path} is not under root {root}")]
    RelativePath { path: PathBuf, root: PathBuf },

    #[error("Generate: {0}")]
    Hash(#[from] HashError),

    #[error("Generate: {first} and {second} both normalize to archive key {key}")]
    PathCollision {
        key: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("Generate: {} is not valid UTF-8 and cannot be used as an archive key", .path.display())]
    NonUtf8Path { path: PathBuf },

    #[error("Root digest: attempted to hash an uninitialized archive")]
    UninitializedArchive,

    #[error("{op}: manifest has no root digest, run generate first")]
    NotGenerated { op: &'static str },

    #[error("Verify: stored root digest {stored} does not match archive digest {computed}")]
    DigestMismatch { stored: String, computed: String },

    #[error("{op}: I/O error on {path}: {source}")]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Load: failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Save: failed to encode manifest: {0}")]
    Encode(#[source] serde_json::Error),

    #[error(transparent)]
    Archive(#[from] ArchiveError),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<config::ConfigError> for ManifestError {
    fn from(err: config::ConfigError) -> Self {
        ManifestError::ConfigError(err.to_string())
    }
}

/// Advisory report of paths skipped because they could not be read.
///
/// Attached to a successful generation; the manifest is valid but does not
/// cover these paths.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Permission denied, ignored: {}", .paths.join(", "))]
pub struct IgnoredPathsWarning {
    pub paths: Vec<String>,
}
