//! HTTP access to the transcription, chat and synthesis endpoints.

use crate::config::VoiceConfig;
use crate::error::VoiceError;
use async_trait::async_trait;
use termin_types::voice::{ChatRequest, ChatReply, SynthesisRequest, Transcription};
use termin_types::ApiErrorBody;

const TRANSCRIBE_PATH: &str = "/api/voice-transcribe";
const CHAT_PATH: &str = "/api/help-chat";
const SYNTHESIZE_PATH: &str = "/api/voice-synthesize";

/// Multipart file name the transcription endpoint expects.
const UPLOAD_FILE_NAME: &str = "recording.webm";

/// A finished recording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedAudio {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl RecordedAudio {
    pub fn webm(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            mime_type: "audio/webm".to_string(),
        }
    }
}

/// The three backend calls of a voice turn.
#[async_trait]
pub trait VoiceBackend: Send + Sync {
    async fn transcribe(&self, audio: &RecordedAudio) -> Result<Transcription, VoiceError>;

    /// Returns the chatbot's answer text.
    async fn chat(&self, request: &ChatRequest) -> Result<String, VoiceError>;

    /// Returns encoded audio (mp3) for `request.text`.
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<Vec<u8>, VoiceError>;
}

/// [`VoiceBackend`] over the TerminFinder HTTP API.
#[derive(Debug, Clone)]
pub struct HttpVoiceBackend {
    http: reqwest::Client,
    base_url: String,
}

impl HttpVoiceBackend {
    pub fn new(config: &VoiceConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .user_agent(concat!("terminfinder-voice/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();

        Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Reads the `{error}` message of a failed response, or `fallback`.
async fn error_message(response: reqwest::Response, fallback: &str) -> String {
    let status = response.status();
    let message = response
        .json::<ApiErrorBody>()
        .await
        .ok()
        .and_then(|body| body.error)
        .unwrap_or_else(|| fallback.to_string());
    tracing::warn!(status = status.as_u16(), message = %message, "voice endpoint failed");
    message
}

#[async_trait]
impl VoiceBackend for HttpVoiceBackend {
    async fn transcribe(&self, audio: &RecordedAudio) -> Result<Transcription, VoiceError> {
        let part = reqwest::multipart::Part::bytes(audio.bytes.clone())
            .file_name(UPLOAD_FILE_NAME)
            .mime_str(&audio.mime_type)?;
        let form = reqwest::multipart::Form::new().part("audio", part);

        let response = self
            .http
            .post(self.url(TRANSCRIBE_PATH))
            .multipart(form)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(VoiceError::Transcription(
                error_message(response, "Transcription failed").await,
            ));
        }

        let transcription: Transcription = response.json().await?;
        if !transcription.success || transcription.text.trim().is_empty() {
            return Err(VoiceError::Transcription(
                transcription
                    .error
                    .unwrap_or_else(|| "Transcription failed".to_string()),
            ));
        }

        tracing::debug!(
            language = %transcription.language,
            chars = transcription.text.chars().count(),
            "transcribed recording"
        );
        Ok(transcription)
    }

    async fn chat(&self, request: &ChatRequest) -> Result<String, VoiceError> {
        let response = self
            .http
            .post(self.url(CHAT_PATH))
            .json(request)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(VoiceError::Chat(error_message(response, "Chatbot error").await));
        }

        let reply: ChatReply = response.json().await?;
        reply
            .response
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| VoiceError::Chat("No response from chatbot".to_string()))
    }

    async fn synthesize(&self, request: &SynthesisRequest) -> Result<Vec<u8>, VoiceError> {
        let response = self
            .http
            .post(self.url(SYNTHESIZE_PATH))
            .json(request)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(VoiceError::Synthesis(
                error_message(response, "Speech synthesis failed").await,
            ));
        }

        let audio = response.bytes().await?.to_vec();
        tracing::debug!(bytes = audio.len(), "synthesized reply");
        Ok(audio)
    }
}
