//! Wire types for the voice endpoints.
//!
//! The voice assistant talks to three backend endpoints in sequence:
//! transcription (`/api/voice-transcribe`), the help chatbot
//! (`/api/help-chat`) and speech synthesis (`/api/voice-synthesize`).

use crate::null_as_default;
use serde::{Deserialize, Serialize};

/// Language assumed when the transcription endpoint does not report one.
pub const DEFAULT_LANGUAGE: &str = "de";

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

/// Result of a transcription upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcription {
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
    /// Detected spoken language (ISO code or Whisper language name).
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub success: bool,
    /// Present when the backend reports a soft failure with a 200 status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Request body for the help chatbot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    /// Path of the page the user is on; gives the chatbot its context.
    pub current_page: String,
    pub session_id: String,
    pub language: String,
    /// Ask for short, speakable answers.
    pub voice_mode: bool,
}

/// Help chatbot reply. A missing `response` is treated as a failure.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub response: Option<String>,
}

/// Request body for speech synthesis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthesisRequest {
    pub text: String,
    pub language: String,
}
