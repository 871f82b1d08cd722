//! Supplementary font loading for the PDF export.
//!
//! The built-in PDF fonts cannot render Malayalam, so exporting a Malayalam
//! quiz needs the Noto Sans Malayalam TTF.  [`FontSource`] loads it from a
//! local file when one is configured, otherwise fetches it over HTTP.
//!
//! A [`FontLoadError`] is never fatal: the exporter logs it and falls back
//! to the built-in font (the table stays structurally intact, the glyphs
//! degrade).

use std::path::PathBuf;

use thiserror::Error;

use crate::config::ExportConfig;

// ---------------------------------------------------------------------------
// FontLoadError
// ---------------------------------------------------------------------------

/// The supplementary font could not be loaded.
#[derive(Debug, Error)]
pub enum FontLoadError {
    /// HTTP transport failure while downloading the font.
    #[error("font download failed: {0}")]
    Fetch(String),

    /// The font host answered with a non-success status.
    #[error("font resource returned HTTP {0}")]
    Status(u16),

    /// The configured local font file could not be read.
    #[error("failed to read font file {path}: {source}")]
    File {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl From<reqwest::Error> for FontLoadError {
    fn from(e: reqwest::Error) -> Self {
        FontLoadError::Fetch(e.to_string())
    }
}

// ---------------------------------------------------------------------------
// FontSource
// ---------------------------------------------------------------------------

/// Loads the supplementary Malayalam font bytes.
pub struct FontSource {
    url: String,
    file: Option<PathBuf>,
    client: reqwest::Client,
}

impl FontSource {
    /// Build a font source from export config.
    pub fn from_config(config: &ExportConfig) -> Self {
        Self {
            url: config.malayalam_font_url.clone(),
            file: config.malayalam_font_file.clone(),
            client: reqwest::Client::new(),
        }
    }

    /// Load the TTF bytes — local file first, HTTP otherwise.
    pub async fn load(&self) -> Result<Vec<u8>, FontLoadError> {
        if let Some(path) = &self.file {
            return std::fs::read(path).map_err(|source| FontLoadError::File {
                path: path.display().to_string(),
                source,
            });
        }

        log::debug!("fetching supplementary font: {}", self.url);
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FontLoadError::Status(status.as_u16()));
        }

        Ok(response.bytes().await?.to_vec())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
