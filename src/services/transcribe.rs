//! Speech-to-text client for the Gemini `generateContent` endpoint,
//! consumed strictly as a black box: audio bytes in, transcript out.
//!
//! A transcription failure never mutates scheduler state; callers surface
//! it as a retryable upstream error and the active arm stays active.

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tokio::time::sleep;
use tracing::warn;

use crate::bandit::ItemKind;

const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_API_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_TIMEOUT_MS: u64 = 30_000;
const MAX_RETRIES: usize = 3;
const BASE_BACKOFF_MS: u64 = 200;

#[derive(Debug, Clone)]
pub struct TranscriberConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub api_endpoint: String,
    pub timeout: Duration,
    /// Fixed transcript returned instead of calling out; test/dev escape
    /// hatch.
    pub mock_transcript: Option<String>,
}

#[derive(Debug, Error)]
pub enum TranscribeError {
    #[error("transcription not configured: {0}")]
    NotConfigured(&'static str),
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("JSON decode failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("empty transcript")]
    EmptyTranscript,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    fn first_text(&self) -> Option<&str> {
        self.candidates
            .iter()
            .filter_map(|c| c.content.as_ref())
            .flat_map(|content| content.parts.iter())
            .find_map(|part| part.text.as_deref())
    }
}

#[derive(Clone)]
pub struct Transcriber {
    config: TranscriberConfig,
    client: reqwest::Client,
}

impl Transcriber {
    pub fn from_env() -> Self {
        let api_key = env_string("GEMINI_API_KEY");
        let model = env_string("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let api_endpoint = env_string("GEMINI_API_ENDPOINT")
            .unwrap_or_else(|| DEFAULT_API_ENDPOINT.to_string())
            .trim_end_matches('/')
            .to_string();
        let timeout =
            Duration::from_millis(env_u64("GEMINI_TIMEOUT_MS").unwrap_or(DEFAULT_TIMEOUT_MS));
        let mock_transcript = env_string("TRANSCRIBE_MOCK");

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            config: TranscriberConfig {
                api_key,
                model,
                api_endpoint,
                timeout,
                mock_transcript,
            },
            client,
        }
    }

    pub fn is_available(&self) -> bool {
        self.config.mock_transcript.is_some()
            || self
                .config
                .api_key
                .as_deref()
                .is_some_and(|v| !v.trim().is_empty())
    }

    /// Transcribes one audio clip. The returned text is lowercased and
    /// trimmed; scoring normalizes it further.
    pub async fn transcribe(
        &self,
        audio: &[u8],
        mime_type: &str,
        kind: ItemKind,
    ) -> Result<String, TranscribeError> {
        if let Some(ref mock) = self.config.mock_transcript {
            return Ok(mock.to_lowercase().trim().to_string());
        }

        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|v| !v.trim().is_empty())
            .ok_or(TranscribeError::NotConfigured("GEMINI_API_KEY"))?;

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.api_endpoint, self.config.model
        );

        use base64::Engine as _;
        let encoded = base64::engine::general_purpose::STANDARD.encode(audio);
        let payload = serde_json::json!({
            "contents": [{
                "role": "user",
                "parts": [
                    { "inlineData": { "mimeType": mime_type, "data": encoded } },
                    { "text": prompt_for(kind) }
                ]
            }]
        });

        let response = self.post_with_retry(&url, api_key, &payload).await?;
        let text = response
            .first_text()
            .map(|t| t.to_lowercase().trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(TranscribeError::EmptyTranscript)?;

        Ok(text)
    }

    async fn post_with_retry(
        &self,
        url: &str,
        api_key: &str,
        payload: &serde_json::Value,
    ) -> Result<GenerateContentResponse, TranscribeError> {
        let mut last_error: Option<TranscribeError> = None;

        for retry in 0..=MAX_RETRIES {
            match self
                .client
                .post(url)
                .header("x-goog-api-key", api_key)
                .json(payload)
                .send()
                .await
            {
                Ok(resp) => {
                    let status = resp.status();
                    if status.is_success() {
                        let bytes = resp.bytes().await?;
                        return serde_json::from_slice(&bytes).map_err(TranscribeError::Json);
                    }
                    let body = resp.text().await.unwrap_or_default();
                    let err = TranscribeError::HttpStatus { status, body };
                    if retry < MAX_RETRIES && is_retryable(status) {
                        let backoff = Duration::from_millis(BASE_BACKOFF_MS * (1 << retry));
                        warn!(retry, ?status, "transcription request failed, retrying");
                        sleep(backoff).await;
                        last_error = Some(err);
                        continue;
                    }
                    return Err(err);
                }
                Err(e) => {
                    let err = TranscribeError::Request(e);
                    if retry < MAX_RETRIES {
                        let backoff = Duration::from_millis(BASE_BACKOFF_MS * (1 << retry));
                        warn!(retry, "transcription request error, retrying");
                        sleep(backoff).await;
                        last_error = Some(err);
                        continue;
                    }
                    return Err(err);
                }
            }
        }

        Err(last_error.unwrap_or(TranscribeError::NotConfigured("unknown")))
    }
}

fn prompt_for(kind: ItemKind) -> &'static str {
    match kind {
        ItemKind::Letter => {
            "Listen to this audio and transcribe ONLY the spoken letter \
             (or phonetic form like 'bee', 'see'). Return only the text."
        }
        ItemKind::TwoLetterWord => {
            "Listen to this audio and transcribe ONLY the spoken word or sound. \
             Return only the text."
        }
        ItemKind::Word => {
            "Listen to this audio and transcribe ONLY the spoken word. Return only the text."
        }
        ItemKind::Sentence => {
            "Listen to this audio and transcribe ONLY the spoken sentence. Return only the text."
        }
    }
}

fn is_retryable(status: reqwest::StatusCode) -> bool {
    status.is_server_error() || status == reqwest::StatusCode::TOO_MANY_REQUESTS
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_u64(key: &str) -> Option<u64> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}
