//! Shared fixtures for integration tests

use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Create a temp tree from (relative path, contents) pairs
pub fn tree(files: &[(&str, &str)]) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    write_files(temp_dir.path(), files);
    temp_dir
}

pub fn write_files(root: &Path, files: &[(&str, &str)]) {
    for (rel, contents) in files {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }
}
