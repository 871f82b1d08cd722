//! Decoding the speech service's audio payload.
//!
//! The synthesis endpoint returns its audio as a base64 string wrapping raw
//! 16-bit little-endian linear PCM.  This module provides the two decode
//! steps, in order:
//!
//! 1. [`decode_base64`] — base64 string → raw bytes.
//! 2. [`pcm16le_to_f32`] — PCM bytes → normalised `f32` samples in [-1, 1).

use base64::{engine::general_purpose, Engine as _};
use thiserror::Error;

// ---------------------------------------------------------------------------
// DecodeError
// ---------------------------------------------------------------------------

/// The payload contained characters outside the base64 alphabet (or broken
/// padding).
#[derive(Debug, Error)]
#[error("invalid base64 audio payload: {0}")]
pub struct DecodeError(#[from] base64::DecodeError);

// ---------------------------------------------------------------------------
// decode_base64
// ---------------------------------------------------------------------------

/// Decode a standard base64 string into raw bytes.
///
/// No side effects; fails with [`DecodeError`] on any input that is not
/// standard base64.
///
/// # Example
/// ```
/// use textbook_aide::audio::decode_base64;
///
/// assert_eq!(decode_base64("QQ==").unwrap(), vec![65]);
/// assert!(decode_base64("not base64!").is_err());
/// ```
pub fn decode_base64(payload: &str) -> Result<Vec<u8>, DecodeError> {
    Ok(general_purpose::STANDARD.decode(payload)?)
}

// ---------------------------------------------------------------------------
// pcm16le_to_f32
// ---------------------------------------------------------------------------

/// Reinterpret little-endian 16-bit PCM bytes as normalised `f32` samples.
///
/// Each sample is divided by 32768.0, mapping the int16 range onto
/// [-1.0, 1.0).  A trailing odd byte cannot form a sample and is dropped;
/// the synthesis service documents its payloads as whole frames, so in
/// practice there is none.
pub fn pcm16le_to_f32(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]) as f32 / 32768.0)
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
