//! Filesystem collaborators
//!
//! Path discovery (`Walker`) and per-file content hashing (`FileHasher`)
//! used by the manifest engine, with default implementations over the
//! real filesystem.

pub mod hasher;
pub mod path;
pub mod walker;

pub use hasher::{Blake3FileHasher, FileHasher};
pub use walker::{FsWalker, Walker};
