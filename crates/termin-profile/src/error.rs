//! Error types for the profile editor.

/// Errors that can occur while loading or saving a practice profile.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    /// The request could not be sent or the response body could not be read.
    #[error("profile request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-OK status.
    #[error("profile API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The response body was not a valid profile record.
    #[error("profile decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ProfileError {
    /// Short text for the alert banner.
    pub fn user_message(&self) -> String {
        match self {
            Self::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}
