//! Core type definitions shared across the manifest engine.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use thiserror::Error;

/// Length in bytes of every content and root digest (BLAKE3 output).
pub const DIGEST_LEN: usize = 32;

/// Fixed-length content digest.
pub type Digest = [u8; DIGEST_LEN];

/// Encode a digest with the reversible text encoding used on disk (standard base64).
pub fn encode_digest(digest: &Digest) -> String {
    STANDARD.encode(digest)
}

/// Decode a digest from its on-disk text form.
///
/// Fails with `Encoding` when the text is not valid base64 and with
/// `Length` when it decodes to the wrong number of bytes.
pub fn decode_digest(text: &str) -> Result<Digest, DigestDecodeError> {
    let bytes = STANDARD
        .decode(text)
        .map_err(|e| DigestDecodeError::Encoding(e.to_string()))?;
    Digest::try_from(bytes.as_slice()).map_err(|_| DigestDecodeError::Length(bytes.len()))
}

/// Reason a digest could not be decoded from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DigestDecodeError {
    #[error("invalid base64: {0}")]
    Encoding(String),

    #[error("digest has {0} bytes, expected {}", DIGEST_LEN)]
    Length(usize),
}

/// Short hex rendering for logs and human output.
pub fn short_hex(digest: &Digest) -> String {
    hex::encode(&digest[..8])
}
