//! Pagination cursor codec.
//!
//! A cursor is the key of the last item of a page, made opaque:
//!
//! ```text
//! Item ──serde_json──▶ text ──lz4 (size prepended)──▶ bytes ──base64url──▶ token
//! ```
//!
//! Decoding reverses each step exactly and fails with a [`TokenError`] on any
//! malformed input, never with an empty key.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use tablewright_types::Item;

/// Largest decompressed cursor accepted, in bytes.
pub const MAX_CURSOR_LEN: usize = 64 * 1024;

/// Length of the little-endian size header written by `compress_prepend_size`.
const SIZE_HEADER_LEN: usize = 4;

/// Errors from encoding or decoding a cursor.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// The cursor holds no key attributes.
    #[error("cursor is empty")]
    Empty,

    /// The token is not URL-safe base64.
    #[error("cursor is not valid base64: {0}")]
    Encoding(#[from] base64::DecodeError),

    /// The token is too short to carry a size header.
    #[error("cursor is truncated")]
    Truncated,

    /// The cursor exceeds [`MAX_CURSOR_LEN`].
    #[error("cursor of {size} bytes exceeds the {max} byte limit")]
    TooLarge { size: usize, max: usize },

    /// The compressed payload is corrupt.
    #[error("cursor failed to decompress: {0}")]
    Compression(#[from] lz4_flex::block::DecompressError),

    /// The decompressed payload is not a key attribute map.
    #[error("cursor payload is malformed: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Encodes the key attributes of the last processed item into a token.
pub fn encode_cursor(key: &Item) -> Result<String, TokenError> {
    if key.is_empty() {
        return Err(TokenError::Empty);
    }
    let text = serde_json::to_vec(key)?;
    if text.len() > MAX_CURSOR_LEN {
        return Err(TokenError::TooLarge {
            size: text.len(),
            max: MAX_CURSOR_LEN,
        });
    }
    let compressed = lz4_flex::compress_prepend_size(&text);
    Ok(URL_SAFE_NO_PAD.encode(compressed))
}

/// Decodes a token back into the key attributes it was encoded from.
pub fn decode_cursor(token: &str) -> Result<Item, TokenError> {
    if token.is_empty() {
        return Err(TokenError::Empty);
    }
    let compressed = URL_SAFE_NO_PAD.decode(token)?;

    let header: [u8; SIZE_HEADER_LEN] = compressed
        .get(..SIZE_HEADER_LEN)
        .and_then(|h| h.try_into().ok())
        .ok_or(TokenError::Truncated)?;
    let size = u32::from_le_bytes(header) as usize;
    if size > MAX_CURSOR_LEN {
        return Err(TokenError::TooLarge {
            size,
            max: MAX_CURSOR_LEN,
        });
    }

    let text = lz4_flex::decompress_size_prepended(&compressed)?;
    let key: Item = serde_json::from_slice(&text)?;
    if key.is_empty() {
        return Err(TokenError::Empty);
    }
    Ok(key)
}
