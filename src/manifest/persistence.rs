//! Persistence of a manifest to a single JSON file
//!
//! Record layout:
//!
//! ```json
//! {"archive":{"a.txt":"<base64>"},"rootHash":"<base64>","root":"/data",
//!  "ignorePaths":["build/"],"autoIgnore":false}
//! ```

use super::{Manifest, ManifestOptions};
use crate::archive::Archive;
use crate::error::ManifestError;
use crate::types::{short_hex, Digest};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, instrument};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ManifestRecord {
    archive: Option<Archive>,
    #[serde(default, with = "optional_digest")]
    root_hash: Option<Digest>,
    #[serde(default)]
    root: String,
    #[serde(default)]
    ignore_paths: Option<Vec<String>>,
    #[serde(default)]
    auto_ignore: bool,
}

impl Manifest {
    /// Path of the manifest file for `name` inside `dir`
    pub fn manifest_path(&self, dir: &Path, name: Option<&str>) -> PathBuf {
        dir.join(format!("{}{}", name.unwrap_or(""), self.output_name))
    }

    /// Write the manifest to `dir/<name><output_name>`, replacing any existing file.
    ///
    /// The record is written to a temporary file in `dir` and renamed into
    /// place. Fails if the manifest has not been generated.
    #[instrument(skip(self), fields(dir = %dir.display()))]
    pub fn save(&self, dir: &Path, name: Option<&str>) -> Result<PathBuf, ManifestError> {
        let root_digest = self
            .root_digest
            .ok_or(ManifestError::NotGenerated { op: "Save" })?;

        let record = ManifestRecord {
            archive: self.archive.clone(),
            root_hash: Some(root_digest),
            root: self.root.to_string_lossy().into_owned(),
            ignore_paths: Some(self.ignore_paths.clone()),
            auto_ignore: self.auto_ignore,
        };
        let bytes = serde_json::to_vec(&record).map_err(ManifestError::Encode)?;

        let target = self.manifest_path(dir, name);
        let mut tmp = NamedTempFile::new_in(dir).map_err(save_error(dir))?;
        tmp.write_all(&bytes).map_err(save_error(tmp.path()))?;
        tmp.as_file().sync_all().map_err(save_error(tmp.path()))?;
        tmp.persist(&target)
            .map_err(|e| save_error(&target)(e.error))?;

        info!(
            path = %target.display(),
            root_digest = %short_hex(&root_digest),
            "Saved manifest"
        );
        Ok(target)
    }

    /// Replace this manifest's state with the record saved in `dir`.
    ///
    /// The configured output name and saved names are kept. The embedded root
    /// digest is not checked against the archive; call `verify` for that.
    ///
    /// A missing or unreadable file fails with `ManifestError::Io` (op
    /// `"Load"`), kept apart from `ManifestError::Decode`, which is reserved
    /// for a file that exists but does not parse.
    #[instrument(skip(self), fields(dir = %dir.display()))]
    pub fn load(&mut self, dir: &Path, name: Option<&str>) -> Result<(), ManifestError> {
        let path = self.manifest_path(dir, name);
        let bytes = fs::read(&path).map_err(|source| ManifestError::Io {
            op: "Load",
            path: path.clone(),
            source,
        })?;
        let record: ManifestRecord =
            serde_json::from_slice(&bytes).map_err(|source| ManifestError::Decode {
                path: path.clone(),
                source,
            })?;

        self.archive = record.archive;
        self.root_digest = record.root_hash;
        self.root = PathBuf::from(record.root);
        self.auto_ignore = record.auto_ignore;
        self.set_ignore_paths(record.ignore_paths.unwrap_or_default());

        debug!(
            path = %path.display(),
            entries = self.archive.as_ref().map(Archive::len).unwrap_or(0),
            "Loaded manifest"
        );
        Ok(())
    }

    /// Load a saved manifest into a new value
    pub fn open(
        dir: &Path,
        name: Option<&str>,
        options: ManifestOptions,
    ) -> Result<Self, ManifestError> {
        let mut manifest = Manifest::with_options(dir, options);
        manifest.load(dir, name)?;
        Ok(manifest)
    }
}

fn save_error(path: &Path) -> impl FnOnce(io::Error) -> ManifestError {
    let path = path.to_path_buf();
    move |source| ManifestError::Io {
        op: "Save",
        path,
        source,
    }
}

mod optional_digest {
    use crate::types::{decode_digest, encode_digest, Digest};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(digest: &Option<Digest>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match digest {
            Some(digest) => serializer.serialize_some(&encode_digest(digest)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Digest>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text: Option<String> = Option::deserialize(deserializer)?;
        text.map(|t| decode_digest(&t).map_err(|e| de::Error::custom(format!("rootHash: {e}"))))
            .transpose()
    }
}
