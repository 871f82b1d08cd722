//! Audio pipeline — synthesised PCM payload → playable WAV resource.
//!
//! # Pipeline
//!
//! ```text
//! base64 payload → decode_base64 → pcm16le_to_f32 → encode_wav → AudioArtifact
//! ```
//!
//! The synthesis service always produces 16-bit linear PCM at 24 000 Hz,
//! mono; the decode/encode parameters come from
//! [`AudioConfig`](crate::config::AudioConfig).

pub mod artifact;
pub mod decode;
pub mod wav;

pub use artifact::AudioArtifact;
pub use decode::{decode_base64, pcm16le_to_f32, DecodeError};
pub use wav::{encode_wav, sample_to_i16, WAV_HEADER_LEN};
