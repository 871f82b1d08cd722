//! Image input surface — loading a textbook-page photo for generation.
//!
//! [`PageImage`] is the validated image value the rest of the crate works
//! with: raw bytes plus a MIME type that is guaranteed to start with
//! `image/`.  Anything else is rejected up front with
//! [`UploadError::Rejected`] so the generation pipeline never sees a
//! non-image payload.
//!
//! Two sources are supported:
//! * a file on disk ([`PageImage::from_path`], MIME derived from the
//!   extension), and
//! * a `data:<mime>;base64,<payload>` URL ([`PageImage::from_data_url`]),
//!   the format browser uploaders hand around.

use std::fmt;
use std::path::Path;

use base64::{engine::general_purpose, Engine as _};
use thiserror::Error;

// ---------------------------------------------------------------------------
// UploadError
// ---------------------------------------------------------------------------

/// Errors raised while accepting an image upload.
#[derive(Debug, Error)]
pub enum UploadError {
    /// The MIME type does not start with `image/`.
    #[error("not an image file (MIME type '{0}')")]
    Rejected(String),

    /// The file extension is not a recognised image format.
    #[error("unrecognised image extension for '{0}'")]
    UnknownExtension(String),

    /// The file could not be read.
    #[error("failed to read image: {0}")]
    Io(#[from] std::io::Error),

    /// The string is not a `data:<mime>;base64,<payload>` URL.
    #[error("malformed data URL")]
    MalformedDataUrl,

    /// The data-URL payload is not valid base64.
    #[error("invalid base64 payload in data URL: {0}")]
    Base64(#[from] base64::DecodeError),
}

// ---------------------------------------------------------------------------
// PageImage
// ---------------------------------------------------------------------------

/// A validated in-memory image of a textbook page.
///
/// Construction always validates the MIME type; holding a `PageImage` means
/// the payload is image-typed.  The bytes are owned so the image survives the
/// upload surface that produced it.
#[derive(Clone, PartialEq, Eq)]
pub struct PageImage {
    bytes: Vec<u8>,
    mime_type: String,
}

impl PageImage {
    /// Build a `PageImage` from raw bytes and a MIME type.
    ///
    /// Returns [`UploadError::Rejected`] unless `mime_type` starts with
    /// `image/`.
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Result<Self, UploadError> {
        let mime_type = mime_type.into();
        if !mime_type.starts_with("image/") {
            return Err(UploadError::Rejected(mime_type));
        }
        Ok(Self { bytes, mime_type })
    }

    /// Read an image file from disk, deriving the MIME type from the file
    /// extension.
    pub fn from_path(path: &Path) -> Result<Self, UploadError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        let mime = ext
            .as_deref()
            .and_then(mime_for_extension)
            .ok_or_else(|| UploadError::UnknownExtension(path.display().to_string()))?;

        let bytes = std::fs::read(path)?;
        Self::new(bytes, mime)
    }

    /// Parse a `data:<mime>;base64,<payload>` URL.
    pub fn from_data_url(url: &str) -> Result<Self, UploadError> {
        let rest = url.strip_prefix("data:").ok_or(UploadError::MalformedDataUrl)?;
        let (header, payload) = rest.split_once(',').ok_or(UploadError::MalformedDataUrl)?;
        let mime = header
            .strip_suffix(";base64")
            .ok_or(UploadError::MalformedDataUrl)?;

        let bytes = general_purpose::STANDARD.decode(payload)?;
        Self::new(bytes, mime)
    }

    /// Render as a `data:` URL (the inverse of [`from_data_url`]).
    ///
    /// [`from_data_url`]: PageImage::from_data_url
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64_data())
    }

    /// The image payload encoded as standard base64, ready to inline into a
    /// service request.
    pub fn base64_data(&self) -> String {
        general_purpose::STANDARD.encode(&self.bytes)
    }

    /// The validated MIME type (always `image/…`).
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// The raw image bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

// Payload bytes are elided: a page photo is easily megabytes.
impl fmt::Debug for PageImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageImage")
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// MIME type for a lowercase image file extension, or `None` for anything
/// this tool does not accept.
fn mime_for_extension(ext: &str) -> Option<&'static str> {
    match ext {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "bmp" => Some("image/bmp"),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
