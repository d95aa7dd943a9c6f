//! Canonical Archive
//!
//! Maps normalized relative file paths to content digests. The canonical
//! serialization is a compact JSON object whose keys appear in byte order and
//! whose values are base64-encoded digests, so two archives holding the same
//! pairs always produce identical bytes no matter how they were filled.

use crate::error::{ArchiveError, ManifestError};
use crate::tree::hasher::compute_content_hash;
use crate::types::{decode_digest, encode_digest, Digest, DigestDecodeError, DIGEST_LEN};
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::btree_map::{self, BTreeMap};
use std::fmt;

/// Ordered path -> digest mapping
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Archive {
    entries: BTreeMap<String, Digest>,
}

impl Archive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the digest for a path, returning the previous digest if any.
    pub fn insert(&mut self, path: impl Into<String>, digest: Digest) -> Option<Digest> {
        self.entries.insert(path.into(), digest)
    }

    pub fn get(&self, path: &str) -> Option<&Digest> {
        self.entries.get(path)
    }

    pub fn remove(&mut self, path: &str) -> Option<Digest> {
        self.entries.remove(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in canonical (byte-wise path) order
    pub fn iter(&self) -> btree_map::Iter<'_, String, Digest> {
        self.entries.iter()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Serialize to the canonical byte form.
    ///
    /// Output is a pure function of the (path, digest) pairs.
    pub fn marshal_canonical(&self) -> Result<Vec<u8>, ArchiveError> {
        serde_json::to_vec(self).map_err(ArchiveError::Encode)
    }

    /// Parse the canonical byte form.
    ///
    /// Rejects anything that is not a JSON object of base64 digests of the
    /// expected length, and objects that repeat a key.
    pub fn unmarshal_canonical(bytes: &[u8]) -> Result<Self, ArchiveError> {
        let raw: RawEntries =
            serde_json::from_slice(bytes).map_err(|e| ArchiveError::Malformed(e.to_string()))?;
        Self::from_raw(raw.0)
    }
}

impl<'a> IntoIterator for &'a Archive {
    type Item = (&'a String, &'a Digest);
    type IntoIter = btree_map::Iter<'a, String, Digest>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl FromIterator<(String, Digest)> for Archive {
    fn from_iter<I: IntoIterator<Item = (String, Digest)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Digest over the canonical serialization of an archive.
///
/// `None` stands for an archive that was never initialized (for example a
/// persisted manifest whose archive is `null`); that is a precondition
/// failure. An empty archive is valid and hashes the bytes `{}`.
pub fn root_digest(archive: Option<&Archive>) -> Result<Digest, ManifestError> {
    let archive = archive.ok_or(ManifestError::UninitializedArchive)?;
    let canonical = archive.marshal_canonical()?;
    Ok(compute_content_hash(&canonical))
}

impl Serialize for Archive {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (path, digest) in &self.entries {
            map.serialize_entry(path, &encode_digest(digest))?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Archive {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawEntries::deserialize(deserializer)?;
        Archive::from_raw(raw.0).map_err(de::Error::custom)
    }
}

impl Archive {
    fn from_raw(raw: Vec<(String, String)>) -> Result<Self, ArchiveError> {
        let mut entries = BTreeMap::new();
        for (path, encoded) in raw {
            let digest = decode_digest(&encoded).map_err(|e| match e {
                DigestDecodeError::Encoding(reason) => ArchiveError::InvalidEncoding {
                    path: path.clone(),
                    reason,
                },
                DigestDecodeError::Length(actual) => ArchiveError::DigestLength {
                    path: path.clone(),
                    expected: DIGEST_LEN,
                    actual,
                },
            })?;
            match entries.entry(path) {
                btree_map::Entry::Occupied(slot) => {
                    return Err(ArchiveError::DuplicateKey(slot.key().clone()));
                }
                btree_map::Entry::Vacant(slot) => {
                    slot.insert(digest);
                }
            }
        }
        Ok(Self { entries })
    }
}

/// Key/value pairs exactly as they appear in the input, duplicates included
struct RawEntries(Vec<(String, String)>);

impl<'de> Deserialize<'de> for RawEntries {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(RawEntriesVisitor)
    }
}

struct RawEntriesVisitor;

impl<'de> Visitor<'de> for RawEntriesVisitor {
    type Value = RawEntries;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of relative paths to base64 digests")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut pairs = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some(pair) = access.next_entry::<String, String>()? {
            pairs.push(pair);
        }
        Ok(RawEntries(pairs))
    }
}
