//! File-backed stand-ins for the microphone and the speaker.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use termin_voice::{AudioPlayer, AudioRecorder, RecordedAudio, VoiceError};

fn mime_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("wav") => "audio/wav",
        Some("ogg") => "audio/ogg",
        Some("mp3") => "audio/mpeg",
        Some("m4a") | Some("mp4") => "audio/mp4",
        _ => "audio/webm",
    }
}

/// "Records" by reading a prepared audio file.
#[derive(Debug)]
pub struct FileRecorder {
    path: PathBuf,
    captured: Option<Vec<u8>>,
}

impl FileRecorder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            captured: None,
        }
    }
}

#[async_trait]
impl AudioRecorder for FileRecorder {
    async fn start(&mut self) -> Result<(), VoiceError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| VoiceError::Microphone(format!("{}: {}", self.path.display(), e)))?;
        tracing::debug!(path = %self.path.display(), bytes = bytes.len(), "loaded recording");
        self.captured = Some(bytes);
        Ok(())
    }

    async fn stop(&mut self) -> Result<RecordedAudio, VoiceError> {
        let bytes = self
            .captured
            .take()
            .ok_or_else(|| VoiceError::Microphone("recording was not started".to_string()))?;
        Ok(RecordedAudio {
            bytes,
            mime_type: mime_type_for(&self.path).to_string(),
        })
    }
}

/// "Plays" by writing the audio to a file, or only logging its size.
#[derive(Debug, Default)]
pub struct FilePlayer {
    output: Option<PathBuf>,
}

impl FilePlayer {
    pub fn new(output: Option<PathBuf>) -> Self {
        Self { output }
    }
}

#[async_trait]
impl AudioPlayer for FilePlayer {
    async fn play(&mut self, audio: &[u8]) -> Result<(), VoiceError> {
        match &self.output {
            Some(path) => {
                tokio::fs::write(path, audio)
                    .await
                    .map_err(|e| VoiceError::Playback(format!("{}: {}", path.display(), e)))?;
                tracing::info!(path = %path.display(), bytes = audio.len(), "wrote reply audio");
            }
            None => tracing::info!(bytes = audio.len(), "reply audio discarded"),
        }
        Ok(())
    }
}
