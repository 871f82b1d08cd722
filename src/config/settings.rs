//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::locale::Language;

use super::AppPaths;

// ---------------------------------------------------------------------------
// ServiceConfig
// ---------------------------------------------------------------------------

/// Settings for the remote generative service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL of the Gemini REST API.
    pub base_url: String,
    /// API key — `None` means read it from the `GEMINI_API_KEY` environment
    /// variable at startup.
    pub api_key: Option<String>,
    /// Model used for text extraction and quiz generation.
    pub text_model: String,
    /// Model used for speech synthesis (audio response modality).
    pub tts_model: String,
    /// Maximum seconds to wait for a service response before timing out.
    ///
    /// Audio synthesis of a full page can take a while; the default is
    /// generous.
    pub timeout_secs: u64,
}

impl ServiceConfig {
    /// Environment variable holding the service credential.
    pub const API_KEY_ENV: &'static str = "GEMINI_API_KEY";

    /// Resolve the credential: config value first, environment second.
    pub fn resolve_api_key(&self) -> Result<String> {
        if let Some(key) = self.api_key.as_deref() {
            if !key.is_empty() {
                return Ok(key.to_string());
            }
        }
        std::env::var(Self::API_KEY_ENV).with_context(|| {
            format!(
                "no API key configured — set `service.api_key` in settings.toml \
                 or the {} environment variable",
                Self::API_KEY_ENV
            )
        })
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".into(),
            api_key: None,
            text_model: "gemini-2.5-flash".into(),
            tts_model: "gemini-2.5-flash-preview-tts".into(),
            timeout_secs: 120,
        }
    }
}

// ---------------------------------------------------------------------------
// AudioConfig
// ---------------------------------------------------------------------------

/// PCM parameters of the synthesis service's audio payloads.
///
/// The service produces 16-bit linear PCM at 24 000 Hz, mono; these values
/// feed the WAV encoder and are not normally changed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Sample rate of the synthesised audio in Hz.
    pub sample_rate: u32,
    /// Channel count of the synthesised audio.
    pub channels: u16,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: 24_000,
            channels: 1,
        }
    }
}

// ---------------------------------------------------------------------------
// ExportConfig
// ---------------------------------------------------------------------------

/// Settings for quiz PDF export and generated-file output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory for generated PDFs and WAV files — `None` means the
    /// current working directory.
    pub output_dir: Option<PathBuf>,
    /// URL of the supplementary Malayalam font, fetched when exporting a
    /// Malayalam quiz.
    pub malayalam_font_url: String,
    /// Local font file used instead of the download when set.
    pub malayalam_font_file: Option<PathBuf>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            malayalam_font_url: "https://cdn.jsdelivr.net/gh/googlefonts/noto-fonts@main\
                                 /hinted/ttf/NotoSansMalayalam/NotoSansMalayalam-Regular.ttf"
                .into(),
            malayalam_font_file: None,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use textbook_aide::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Content language for prompts, messages, and the PDF table.
    pub language: Language,
    /// Remote generative service settings.
    pub service: ServiceConfig,
    /// PCM parameters of synthesised audio.
    pub audio: AudioConfig,
    /// PDF export and output settings.
    pub export: ExportConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            language: Language::default(),
            service: ServiceConfig::default(),
            audio: AudioConfig::default(),
            export: ExportConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// (first-run scenario) so callers never need to special-case a missing
    /// file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests and `--config`).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
