use thiserror::Error;

#[derive(Error, Debug)]
pub enum VoiceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Microphone error: {0}")]
    Microphone(String),

    #[error("Transcription error: {0}")]
    Transcription(String),

    #[error("Chat error: {0}")]
    Chat(String),

    #[error("Speech synthesis error: {0}")]
    Synthesis(String),

    #[error("Playback error: {0}")]
    Playback(String),

    #[error("Highlight error: {0}")]
    Highlight(String),

    #[error("Cannot {action} while {state}")]
    InvalidState {
        action: &'static str,
        state: &'static str,
    },
}

impl VoiceError {
    /// Short German text for the status bubble.
    pub fn user_message(&self) -> String {
        match self {
            Self::Microphone(_) => "Mikrofonzugriff verweigert".to_string(),
            Self::Transcription(msg) | Self::Chat(msg) | Self::Synthesis(msg) => {
                format!("Fehler: {}", msg)
            }
            other => format!("Fehler: {}", other),
        }
    }
}
