// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! JSON and CBOR helpers for protocol records.
//!
//! JSON is the interop encoding. CBOR carries the same field names and is
//! offered for compact transport between Rust peers.

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Encoding or decoding failure.
#[derive(Debug, Error)]
pub enum CodecError {
    /// JSON failure (includes structural rejections raised while decoding).
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    /// CBOR encode failure.
    #[error("cbor encode: {0}")]
    CborEncode(String),
    /// CBOR decode failure (includes structural rejections raised while decoding).
    #[error("cbor decode: {0}")]
    CborDecode(String),
}

/// Encode to compact JSON.
pub fn to_json<T: Serialize>(value: &T) -> Result<String, CodecError> {
    Ok(serde_json::to_string(value)?)
}

/// Encode to indented JSON.
pub fn to_json_pretty<T: Serialize>(value: &T) -> Result<String, CodecError> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Decode from JSON text.
pub fn from_json<T: DeserializeOwned>(text: &str) -> Result<T, CodecError> {
    Ok(serde_json::from_str(text)?)
}

/// Encode to CBOR bytes.
pub fn to_cbor<T: Serialize>(value: &T) -> Result<Vec<u8>, CodecError> {
    let mut out = Vec::new();
    ciborium::ser::into_writer(value, &mut out)
        .map_err(|e| CodecError::CborEncode(e.to_string()))?;
    Ok(out)
}

/// Decode from CBOR bytes.
pub fn from_cbor<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CodecError> {
    ciborium::de::from_reader(bytes).map_err(|e| CodecError::CborDecode(e.to_string()))
}
