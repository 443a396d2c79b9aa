use serde::{Deserialize, Serialize};
use std::time::Duration;

fn default_api_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_max_recording_secs() -> u64 {
    30
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_voice_mode() -> bool {
    true
}

fn default_click_delay_ms() -> u64 {
    1000
}

fn default_current_page() -> String {
    "/".to_string()
}

/// Settings for the voice assistant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceConfig {
    /// Origin of the TerminFinder backend.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Recording stops automatically after this many seconds. Default: 30.
    #[serde(default = "default_max_recording_secs")]
    pub max_recording_secs: u64,
    /// Timeout for each backend request. Default: 30.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Ask the chatbot for short, speakable replies.
    #[serde(default = "default_voice_mode")]
    pub voice_mode: bool,
    /// Delay between highlighting an element and clicking it.
    #[serde(default = "default_click_delay_ms")]
    pub click_delay_ms: u64,
    /// Path of the page the assistant is running on.
    #[serde(default = "default_current_page")]
    pub current_page: String,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            max_recording_secs: default_max_recording_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            voice_mode: default_voice_mode(),
            click_delay_ms: default_click_delay_ms(),
            current_page: default_current_page(),
        }
    }
}

impl VoiceConfig {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            ..Default::default()
        }
    }

    pub fn max_recording(&self) -> Duration {
        Duration::from_secs(self.max_recording_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn click_delay(&self) -> Duration {
        Duration::from_millis(self.click_delay_ms)
    }
}
