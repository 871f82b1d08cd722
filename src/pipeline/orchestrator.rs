//! Generation orchestrator — image in, quiz or playable audio out.
//!
//! [`GenerationOrchestrator`] owns the service client and exposes the two
//! generation operations:
//!
//! ```text
//! produce_quiz:   image ── generate_structured ──▶ parse ──▶ Vec<QuizItem>
//!
//! produce_speech: image ── stage 1: generate_text ──▶ ExtractedText
//!                          stage 2: generate_audio ──▶ SynthesizedAudio
//!                          stage 3: base64 → f32 PCM → WAV ──▶ AudioArtifact
//! ```
//!
//! The speech stages are strictly sequential (stage 2 embeds stage 1's
//! output) and are modelled as explicit types so a retry policy could later
//! be attached per stage without entangling them.  There is no retry today:
//! a single failed attempt surfaces immediately, and identical images re-run
//! the full pipeline every time — no caching, no deduplication.

use std::sync::Arc;

use thiserror::Error;

use crate::audio::{decode_base64, encode_wav, pcm16le_to_f32, AudioArtifact, DecodeError};
use crate::config::AudioConfig;
use crate::gemini::{ClientError, GenerativeClient, PromptBuilder};
use crate::input::PageImage;
use crate::locale::Language;
use crate::quiz::{self, QuizItem, QuizParseError};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Quiz generation failed.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The service call itself failed (network, quota, auth) or returned no
    /// content at all.
    #[error("quiz request failed: {0}")]
    Service(#[from] ClientError),

    /// The response text was not a valid question/answer array.
    #[error(transparent)]
    Malformed(#[from] QuizParseError),
}

/// Speech generation failed.
#[derive(Debug, Error)]
pub enum SpeechError {
    /// Stage 1 produced no text — the page had nothing readable.  This is a
    /// local check; the service happily returns empty transcriptions.
    #[error("could not extract any text from the image")]
    Extraction,

    /// Stage 2's response carried no audio payload.
    #[error("failed to generate audio data")]
    Synthesis,

    /// A service call failed in transport (either stage).
    #[error("speech request failed: {0}")]
    Service(ClientError),

    /// Stage 3: the audio payload was not valid base64.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Stage 3: the WAV container could not be written.
    #[error("failed to encode WAV container: {0}")]
    Encode(String),
}

// ---------------------------------------------------------------------------
// Stage result types
// ---------------------------------------------------------------------------

/// Verbatim text transcribed from the page image (speech stage 1).
///
/// Guaranteed non-blank: construction goes through
/// [`GenerationOrchestrator::extract_text`], which rejects empty or
/// whitespace-only transcriptions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText(String);

impl ExtractedText {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The raw synthesis payload from speech stage 2, not yet decoded.
///
/// Carries the PCM parameters the synthesis model is known to produce so
/// stage 3 needs nothing beyond this value.
#[derive(Debug, Clone)]
pub struct SynthesizedAudio {
    /// Base64-encoded 16-bit little-endian PCM.
    payload: String,
    sample_rate: u32,
    channels: u16,
}

// ---------------------------------------------------------------------------
// GenerationOrchestrator
// ---------------------------------------------------------------------------

/// Drives the image → quiz and image → speech pipelines.
///
/// Holds the service client behind `Arc<dyn GenerativeClient>` so the
/// production client and test substitutes are interchangeable.
pub struct GenerationOrchestrator {
    client: Arc<dyn GenerativeClient>,
    audio: AudioConfig,
}

impl GenerationOrchestrator {
    pub fn new(client: Arc<dyn GenerativeClient>, audio: AudioConfig) -> Self {
        Self { client, audio }
    }

    /// Generate a quiz from the page image.
    ///
    /// One schema-constrained service call; the response is parsed locally
    /// as the backstop.  No retry — a failure surfaces immediately.
    pub async fn produce_quiz(
        &self,
        image: &PageImage,
        language: Language,
    ) -> Result<Vec<QuizItem>, GenerationError> {
        let prompts = PromptBuilder::new(language);
        let json_text = self
            .client
            .generate_structured(image, &prompts.quiz_instruction(), quiz::response_schema())
            .await?;

        let items = quiz::parse_quiz(&json_text)?;
        log::info!("quiz generated: {} items ({})", items.len(), language);
        Ok(items)
    }

    /// Speech stage 1 — transcribe all visible text verbatim.
    ///
    /// Fails with [`SpeechError::Extraction`] when the transcription is
    /// empty or whitespace-only.
    pub async fn extract_text(
        &self,
        image: &PageImage,
        language: Language,
    ) -> Result<ExtractedText, SpeechError> {
        let prompts = PromptBuilder::new(language);
        let text = self
            .client
            .generate_text(image, &prompts.extraction_instruction())
            .await
            .map_err(|e| match e {
                ClientError::EmptyResponse => SpeechError::Extraction,
                other => SpeechError::Service(other),
            })?;

        if text.trim().is_empty() {
            return Err(SpeechError::Extraction);
        }

        log::info!("extracted {} characters of page text", text.len());
        Ok(ExtractedText(text))
    }

    /// Speech stage 2 — synthesise the extracted text in audio mode.
    ///
    /// Fails with [`SpeechError::Synthesis`] when the response carries no
    /// audio payload.
    pub async fn synthesize(
        &self,
        text: &ExtractedText,
        language: Language,
    ) -> Result<SynthesizedAudio, SpeechError> {
        let prompts = PromptBuilder::new(language);
        let payload = self
            .client
            .generate_audio(&prompts.speech_prompt(text.as_str()))
            .await
            .map_err(|e| match e {
                ClientError::EmptyResponse => SpeechError::Synthesis,
                other => SpeechError::Service(other),
            })?;

        Ok(SynthesizedAudio {
            payload,
            sample_rate: self.audio.sample_rate,
            channels: self.audio.channels,
        })
    }

    /// Speech stage 3 — decode the payload and wrap it as a WAV resource.
    pub fn encode_artifact(&self, audio: &SynthesizedAudio) -> Result<AudioArtifact, SpeechError> {
        let pcm_bytes = decode_base64(&audio.payload)?;
        let samples = pcm16le_to_f32(&pcm_bytes);
        let wav = encode_wav(&samples, audio.sample_rate, audio.channels)
            .map_err(|e| SpeechError::Encode(e.to_string()))?;

        Ok(AudioArtifact::new(wav, audio.sample_rate, audio.channels))
    }

    /// Full image → playable audio pipeline (stages 1–3 in order).
    pub async fn produce_speech(
        &self,
        image: &PageImage,
        language: Language,
    ) -> Result<AudioArtifact, SpeechError> {
        let text = self.extract_text(image, language).await?;
        let audio = self.synthesize(&text, language).await?;
        let artifact = self.encode_artifact(&audio)?;
        log::info!(
            "speech generated: {:.1}s at {} Hz",
            artifact.duration_secs(),
            artifact.sample_rate()
        );
        Ok(artifact)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use base64::{engine::general_purpose, Engine as _};
    use std::sync::atomic::{AtomicUsize, Ordering};

    // -----------------------------------------------------------------------
    // Test doubles
    // -----------------------------------------------------------------------

    /// Scripted client: fixed responses per method, with call counters.
    struct ScriptedClient {
        text: Result<String, ClientError>,
        structured: Result<String, ClientError>,
        audio: Result<String, ClientError>,
        audio_calls: AtomicUsize,
    }

    impl ScriptedClient {
        fn new() -> Self {
            Self {
                text: Ok("Page text.".into()),
                structured: Ok("[]".into()),
                audio: Ok(String::new()),
                audio_calls: AtomicUsize::new(0),
            }
        }

        fn clone_result(r: &Result<String, ClientError>) -> Result<String, ClientError> {
            match r {
                Ok(s) => Ok(s.clone()),
                Err(ClientError::EmptyResponse) => Err(ClientError::EmptyResponse),
                Err(ClientError::Timeout) => Err(ClientError::Timeout),
                Err(ClientError::Request(m)) => Err(ClientError::Request(m.clone())),
                Err(ClientError::Parse(m)) => Err(ClientError::Parse(m.clone())),
                Err(ClientError::Status { status, message }) => Err(ClientError::Status {
                    status: *status,
                    message: message.clone(),
                }),
            }
        }
    }

    #[async_trait]
    impl GenerativeClient for ScriptedClient {
        async fn generate_text(
            &self,
            _image: &PageImage,
            _instruction: &str,
        ) -> Result<String, ClientError> {
            Self::clone_result(&self.text)
        }

        async fn generate_structured(
            &self,
            _image: &PageImage,
            _instruction: &str,
            _schema: serde_json::Value,
        ) -> Result<String, ClientError> {
            Self::clone_result(&self.structured)
        }

        async fn generate_audio(&self, _prompt: &str) -> Result<String, ClientError> {
            self.audio_calls.fetch_add(1, Ordering::SeqCst);
            Self::clone_result(&self.audio)
        }
    }

    fn image() -> PageImage {
        PageImage::new(vec![1, 2, 3], "image/png").unwrap()
    }

    fn orchestrator(client: ScriptedClient) -> (GenerationOrchestrator, Arc<ScriptedClient>) {
        let client = Arc::new(client);
        let orch = GenerationOrchestrator::new(client.clone(), AudioConfig::default());
        (orch, client)
    }

    // -----------------------------------------------------------------------
    // produce_quiz
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn quiz_parses_the_structured_response() {
        let mut client = ScriptedClient::new();
        client.structured =
            Ok(r#"[{"question": "Q1?", "answer": "A1"}, {"question": "Q2?", "answer": "A2"}]"#
                .into());
        let (orch, _) = orchestrator(client);

        let quiz = orch.produce_quiz(&image(), Language::En).await.unwrap();
        assert_eq!(quiz.len(), 2);
        assert_eq!(quiz[0].question, "Q1?");
    }

    #[tokio::test]
    async fn quiz_transport_failure_surfaces_as_service_error() {
        let mut client = ScriptedClient::new();
        client.structured = Err(ClientError::Status {
            status: 429,
            message: "quota exceeded".into(),
        });
        let (orch, _) = orchestrator(client);

        let err = orch.produce_quiz(&image(), Language::En).await.unwrap_err();
        assert!(matches!(err, GenerationError::Service(_)));
    }

    #[tokio::test]
    async fn quiz_malformed_json_surfaces_as_malformed() {
        let mut client = ScriptedClient::new();
        client.structured = Ok("here is your quiz!".into());
        let (orch, _) = orchestrator(client);

        let err = orch.produce_quiz(&image(), Language::En).await.unwrap_err();
        assert!(matches!(err, GenerationError::Malformed(_)));
    }

    // -----------------------------------------------------------------------
    // produce_speech — stage sequencing
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn empty_extraction_fails_before_synthesis_runs() {
        let mut client = ScriptedClient::new();
        client.text = Ok("   \n\t ".into());
        let (orch, client) = orchestrator(client);

        let err = orch.produce_speech(&image(), Language::En).await.unwrap_err();
        assert!(matches!(err, SpeechError::Extraction));
        assert_eq!(client.audio_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_text_part_counts_as_extraction_failure() {
        let mut client = ScriptedClient::new();
        client.text = Err(ClientError::EmptyResponse);
        let (orch, client) = orchestrator(client);

        let err = orch.produce_speech(&image(), Language::En).await.unwrap_err();
        assert!(matches!(err, SpeechError::Extraction));
        assert_eq!(client.audio_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_audio_payload_is_a_synthesis_failure() {
        let mut client = ScriptedClient::new();
        client.audio = Err(ClientError::EmptyResponse);
        let (orch, _) = orchestrator(client);

        let err = orch.produce_speech(&image(), Language::En).await.unwrap_err();
        assert!(matches!(err, SpeechError::Synthesis));
    }

    #[tokio::test]
    async fn transport_failure_in_stage_two_is_a_service_error() {
        let mut client = ScriptedClient::new();
        client.audio = Err(ClientError::Timeout);
        let (orch, _) = orchestrator(client);

        let err = orch.produce_speech(&image(), Language::En).await.unwrap_err();
        assert!(matches!(err, SpeechError::Service(ClientError::Timeout)));
    }

    #[tokio::test]
    async fn invalid_base64_payload_is_a_decode_failure() {
        let mut client = ScriptedClient::new();
        client.audio = Ok("not valid base64!!".into());
        let (orch, _) = orchestrator(client);

        let err = orch.produce_speech(&image(), Language::En).await.unwrap_err();
        assert!(matches!(err, SpeechError::Decode(_)));
    }

    // -----------------------------------------------------------------------
    // produce_speech — happy path
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn speech_pipeline_yields_a_wav_artifact() {
        // 4 PCM samples: 0, +16384, -16384, -32768 (little-endian int16).
        let pcm: Vec<u8> = vec![0x00, 0x00, 0x00, 0x40, 0x00, 0xC0, 0x00, 0x80];
        let mut client = ScriptedClient::new();
        client.audio = Ok(general_purpose::STANDARD.encode(&pcm));
        let (orch, client) = orchestrator(client);

        let artifact = orch.produce_speech(&image(), Language::Ml).await.unwrap();
        assert_eq!(client.audio_calls.load(Ordering::SeqCst), 1);
        assert_eq!(artifact.sample_rate(), 24_000);
        assert_eq!(artifact.channels(), 1);
        // 44-byte header + 4 samples × 2 bytes
        assert_eq!(artifact.wav_bytes().len(), 44 + 8);
        assert_eq!(&artifact.wav_bytes()[0..4], b"RIFF");
    }

    #[tokio::test]
    async fn extraction_preserves_the_verbatim_text() {
        let mut client = ScriptedClient::new();
        client.text = Ok("  The water cycle.  ".into());
        let (orch, _) = orchestrator(client);

        let text = orch.extract_text(&image(), Language::En).await.unwrap();
        // Verbatim: surrounding whitespace is the service's business, not ours.
        assert_eq!(text.as_str(), "  The water cycle.  ");
    }
}
