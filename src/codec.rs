//! base64url segment encoding, as used on the wire.

use ct_codecs::{Base64UrlSafeNoPadding, Decoder, Encoder};
use serde::{de::DeserializeOwned, Serialize};

use crate::error::*;

/// Encode raw bytes as an unpadded base64url segment.
pub fn encode_segment(bin: impl AsRef<[u8]>) -> String {
    // ct-codecs only errors when the encoded length overflows `usize`, which no
    // in-memory slice can reach.
    Base64UrlSafeNoPadding::encode_to_string(bin).unwrap_or_default()
}

/// Decode an unpadded base64url segment.
///
/// Characters outside the URL-safe alphabet, padding and non-canonical trailing bits
/// are all rejected.
pub fn decode_segment(segment: &str) -> Result<Vec<u8>, Error> {
    Base64UrlSafeNoPadding::decode_to_vec(segment, None)
        .map_err(|_| JWTError::MalformedSegment.into())
}

/// Serialize `value` as JSON and encode it as a segment.
///
/// Only fails if `value` can't be represented as JSON.
pub fn encode_json_segment<T: Serialize + ?Sized>(
    value: &T,
) -> Result<String, serde_json::Error> {
    serde_json::to_vec(value).map(encode_segment)
}

/// Decode a segment and parse it as JSON.
pub fn decode_json_segment<T: DeserializeOwned>(segment: &str) -> Result<T, Error> {
    let json = decode_segment(segment)?;
    serde_json::from_slice(&json).map_err(|_| JWTError::MalformedSegment.into())
}
