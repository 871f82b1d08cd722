//! Core `GenerativeClient` trait and the Gemini REST implementation.
//!
//! `GeminiClient` calls the `generateContent` endpoint of the Gemini API.
//! It is constructed explicitly with an injected credential — there is no
//! ambient, module-level client — so the orchestrator can be tested against
//! a substitute implementation of [`GenerativeClient`].

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::config::ServiceConfig;
use crate::input::PageImage;

// ---------------------------------------------------------------------------
// ClientError
// ---------------------------------------------------------------------------

/// Errors that can occur while talking to the generative service.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("service request timed out")]
    Timeout,

    /// The service answered with a non-success status (quota, auth, …).
    #[error("service returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// The HTTP response could not be parsed as the expected JSON.
    #[error("failed to parse service response: {0}")]
    Parse(String),

    /// The response carried no usable content part (no text, or no audio in
    /// audio mode).
    #[error("service response contained no usable content")]
    EmptyResponse,
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ClientError::Timeout
        } else {
            ClientError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// GenerativeClient trait
// ---------------------------------------------------------------------------

/// Async interface to a multimodal generative service.
///
/// Implementors must be `Send + Sync` so they can be shared as
/// `Arc<dyn GenerativeClient>`.  Each method is one remote call; every call
/// is built fresh from its arguments — the client holds no per-request
/// state.
#[async_trait]
pub trait GenerativeClient: Send + Sync {
    /// Free-form text generation from an image plus an instruction.
    async fn generate_text(
        &self,
        image: &PageImage,
        instruction: &str,
    ) -> Result<String, ClientError>;

    /// JSON generation from an image, constrained by a structured-output
    /// `schema`.  Returns the raw JSON text for the caller to parse.
    async fn generate_structured(
        &self,
        image: &PageImage,
        instruction: &str,
        schema: Value,
    ) -> Result<String, ClientError>;

    /// Audio-modality generation from a text prompt.  Returns the base64
    /// PCM payload.
    async fn generate_audio(&self, prompt: &str) -> Result<String, ClientError>;
}

// Compile-time assertion: Box<dyn GenerativeClient> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn GenerativeClient>) {}
};

// ---------------------------------------------------------------------------
// Wire types (generateContent response)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    text: Option<String>,
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    #[allow(dead_code)]
    mime_type: Option<String>,
    data: String,
}

impl GenerateContentResponse {
    /// First text part of the first candidate, if any.
    fn into_first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .find_map(|p| p.text)
    }

    /// First inline (audio) payload of the first candidate, if any.
    fn into_first_inline_data(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .find_map(|p| p.inline_data.map(|d| d.data))
    }
}

// ---------------------------------------------------------------------------
// GeminiClient
// ---------------------------------------------------------------------------

/// Calls the Gemini `generateContent` REST endpoint.
///
/// All connection details (`base_url`, model ids, timeout) come from
/// [`ServiceConfig`]; the API key is injected at construction and attached
/// as the `x-goog-api-key` header on every request.
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    text_model: String,
    tts_model: String,
}

impl GeminiClient {
    /// Build a `GeminiClient` from service config plus the resolved
    /// credential.
    ///
    /// The HTTP client is pre-configured with the per-request timeout from
    /// `config.timeout_secs`.  A default (no-timeout) client is used as a
    /// last-resort fallback if the builder fails (should never happen in
    /// practice).
    pub fn new(config: &ServiceConfig, api_key: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            text_model: config.text_model.clone(),
            tts_model: config.tts_model.clone(),
        }
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }

    /// POST `body` to `model`'s generateContent endpoint and parse the
    /// response envelope.
    async fn generate(
        &self,
        model: &str,
        body: Value,
    ) -> Result<GenerateContentResponse, ClientError> {
        let response = self
            .client
            .post(self.endpoint(model))
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))
    }

    /// The image + instruction parts shared by both image-input requests.
    fn image_parts(image: &PageImage, instruction: &str) -> Value {
        serde_json::json!([
            {
                "inlineData": {
                    "mimeType": image.mime_type(),
                    "data": image.base64_data(),
                }
            },
            { "text": instruction }
        ])
    }
}

#[async_trait]
impl GenerativeClient for GeminiClient {
    async fn generate_text(
        &self,
        image: &PageImage,
        instruction: &str,
    ) -> Result<String, ClientError> {
        let body = serde_json::json!({
            "contents": [{ "parts": Self::image_parts(image, instruction) }],
        });

        self.generate(&self.text_model, body)
            .await?
            .into_first_text()
            .ok_or(ClientError::EmptyResponse)
    }

    async fn generate_structured(
        &self,
        image: &PageImage,
        instruction: &str,
        schema: Value,
    ) -> Result<String, ClientError> {
        let body = serde_json::json!({
            "contents": [{ "parts": Self::image_parts(image, instruction) }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": schema,
            },
        });

        self.generate(&self.text_model, body)
            .await?
            .into_first_text()
            .ok_or(ClientError::EmptyResponse)
    }

    async fn generate_audio(&self, prompt: &str) -> Result<String, ClientError> {
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "responseModalities": ["AUDIO"],
            },
        });

        self.generate(&self.tts_model, body)
            .await?
            .into_first_inline_data()
            .ok_or(ClientError::EmptyResponse)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceConfig;

    fn make_client() -> GeminiClient {
        GeminiClient::new(&ServiceConfig::default(), "test-key".into())
    }

    #[test]
    fn new_builds_without_panic() {
        let _client = make_client();
    }

    #[test]
    fn endpoint_interpolates_model_and_strips_trailing_slash() {
        let mut config = ServiceConfig::default();
        config.base_url = "https://generativelanguage.googleapis.com/".into();
        let client = GeminiClient::new(&config, "k".into());
        assert_eq!(
            client.endpoint("gemini-2.5-flash"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    /// Verify that `GeminiClient` is object-safe (usable as `dyn GenerativeClient`).
    #[test]
    fn client_is_object_safe() {
        let client: Box<dyn GenerativeClient> = Box::new(make_client());
        drop(client);
    }

    #[test]
    fn image_parts_inline_the_payload() {
        let image = PageImage::new(vec![65], "image/png").unwrap();
        let parts = GeminiClient::image_parts(&image, "describe");
        assert_eq!(parts[0]["inlineData"]["mimeType"], "image/png");
        assert_eq!(parts[0]["inlineData"]["data"], "QQ==");
        assert_eq!(parts[1]["text"], "describe");
    }

    // ---- response envelope parsing ---

    #[test]
    fn parses_a_text_response() {
        let json = r#"{
            "candidates": [
                { "content": { "parts": [ { "text": "extracted page text" } ] } }
            ]
        }"#;
        let parsed: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.into_first_text().unwrap(), "extracted page text");
    }

    #[test]
    fn parses_an_audio_response() {
        let json = r#"{
            "candidates": [
                { "content": { "parts": [
                    { "inlineData": { "mimeType": "audio/L16;codec=pcm;rate=24000", "data": "AAAA" } }
                ] } }
            ]
        }"#;
        let parsed: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.into_first_inline_data().unwrap(), "AAAA");
    }

    #[test]
    fn text_lookup_skips_non_text_parts() {
        let json = r#"{
            "candidates": [
                { "content": { "parts": [
                    { "inlineData": { "mimeType": "audio/L16", "data": "AAAA" } },
                    { "text": "after audio" }
                ] } }
            ]
        }"#;
        let parsed: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.into_first_text().unwrap(), "after audio");
    }

    #[test]
    fn empty_envelope_yields_no_content() {
        let parsed: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.into_first_text().is_none());

        let parsed: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates": [{"content": null}]}"#).unwrap();
        assert!(parsed.into_first_inline_data().is_none());
    }

    #[test]
    fn timeout_errors_map_to_timeout_variant() {
        // Display strings are part of the user-facing error contract.
        assert_eq!(ClientError::Timeout.to_string(), "service request timed out");
        let status = ClientError::Status {
            status: 429,
            message: "quota".into(),
        };
        assert!(status.to_string().contains("429"));
    }
}
