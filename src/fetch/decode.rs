//! Content-type driven payload decoding.
//!
//! The file-download endpoint serves JSON, zipped JSON (one file per
//! archive) or raw binary replay blobs, distinguished only by the response
//! content type. Decoding failures are fatal to the single file being
//! decoded; callers treat the corresponding field as absent and continue.

use std::io::{Cursor, Read};

use thiserror::Error;

/// Errors from decoding a single payload.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Unsupported content type: {0}")]
    UnsupportedContentType(String),

    #[error("Archive contains no files")]
    EmptyArchive,

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A decoded payload, tagged by how it arrived.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedPayload {
    /// Parsed JSON, whether it came in plain or inside an archive.
    Json(serde_json::Value),
    /// Opaque bytes (replay blobs); the caller decides what to do.
    Binary(Vec<u8>),
}

impl DecodedPayload {
    /// The JSON value, if this payload decoded as JSON.
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            DecodedPayload::Json(value) => Some(value),
            DecodedPayload::Binary(_) => None,
        }
    }
}

/// Decode a response body according to its declared content type.
///
/// - `application/zip`: open the archive and parse its first file as JSON;
///   an archive with no entries is an error.
/// - `application/json`: parse as JSON.
/// - `application/octet-stream`: return the bytes unparsed.
/// - anything else: `UnsupportedContentType` naming the offender.
pub fn decode(content_type: Option<&str>, body: &[u8]) -> Result<DecodedPayload, DecodeError> {
    let content_type = content_type.unwrap_or("");

    if content_type.contains("application/zip") {
        let mut archive = zip::ZipArchive::new(Cursor::new(body))?;
        if archive.is_empty() {
            return Err(DecodeError::EmptyArchive);
        }
        // Data files are shipped one JSON document per archive.
        let mut file = archive.by_index(0)?;
        let mut text = String::new();
        file.read_to_string(&mut text)?;
        return Ok(DecodedPayload::Json(serde_json::from_str(&text)?));
    }

    if content_type.contains("application/json") {
        return Ok(DecodedPayload::Json(serde_json::from_slice(body)?));
    }

    if content_type.contains("application/octet-stream") {
        return Ok(DecodedPayload::Binary(body.to_vec()));
    }

    Err(DecodeError::UnsupportedContentType(
        content_type.to_string(),
    ))
}
