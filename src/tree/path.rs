//! Relative path computation and normalization for archive keys

use crate::error::ManifestError;
use std::path::{Component, Path};
use unicode_normalization::UnicodeNormalization;

/// Compute `path` relative to `root`.
///
/// Both sides are compared component-wise; if `path` does not live under
/// `root` the walker and the manifest disagree about the root, which is fatal.
pub fn relative_to<'a>(root: &Path, path: &'a Path) -> Result<&'a Path, ManifestError> {
    path.strip_prefix(root)
        .map_err(|_| ManifestError::RelativePath {
            path: path.to_path_buf(),
            root: root.to_path_buf(),
        })
}

/// Normalize a relative path into an archive key
///
/// This function:
/// 1. Joins normal components with `/` regardless of platform (`.` is dropped)
/// 2. Converts any remaining `\` separators to `/`
/// 3. Normalizes Unicode to NFC
///
/// Keys are text, so a component that is not valid UTF-8 is rejected with
/// `ManifestError::NonUtf8Path` rather than replaced lossily.
pub fn normalize_relative(path: &Path) -> Result<String, ManifestError> {
    let mut components = Vec::new();
    for component in path.components() {
        if let Component::Normal(name) = component {
            let name = name.to_str().ok_or_else(|| ManifestError::NonUtf8Path {
                path: path.to_path_buf(),
            })?;
            components.push(name);
        }
    }

    Ok(components.join("/").replace('\\', "/").nfc().collect())
}

/// Normalize a user-supplied ignore prefix so it compares against archive keys.
///
/// A trailing `/` is meaningful (it restricts the prefix to a directory) and
/// is preserved.
pub fn normalize_ignore_prefix(prefix: &str) -> String {
    let replaced = prefix.replace('\\', "/");
    let normalized: String = replaced.nfc().collect();
    let mut result = normalized.as_str();
    while let Some(rest) = result.strip_prefix("./") {
        result = rest;
    }
    result.trim_start_matches('/').to_string()
}
