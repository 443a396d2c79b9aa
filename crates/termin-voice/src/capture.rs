//! Push-to-talk voice turn: record, transcribe, answer, speak.
//!
//! [`VoiceCapture`] is a three-state machine (idle, recording, processing).
//! A turn runs its backend calls strictly in sequence and the first failure
//! ends it. Whatever happens the machine is back in idle when a call returns,
//! and every step is announced on a broadcast channel for the status bubble.

use crate::backend::{RecordedAudio, VoiceBackend};
use crate::config::VoiceConfig;
use crate::controller::{CommandController, CommandOutcome};
use crate::error::VoiceError;
use async_trait::async_trait;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use termin_types::voice::{ChatRequest, SynthesisRequest, Transcription};
use tokio::sync::broadcast;
use tokio::time::Instant;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Default capacity for the status broadcast channel.
const STATUS_BROADCAST_CAPACITY: usize = 64;

/// Microphone access.
#[async_trait]
pub trait AudioRecorder: Send {
    /// Requests microphone permission and begins capturing.
    async fn start(&mut self) -> Result<(), VoiceError>;

    /// Ends the capture and releases the microphone.
    async fn stop(&mut self) -> Result<RecordedAudio, VoiceError>;
}

/// Audio output. `play` resolves once playback has finished.
#[async_trait]
pub trait AudioPlayer: Send {
    async fn play(&mut self, audio: &[u8]) -> Result<(), VoiceError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureState {
    Idle,
    Recording,
    Processing,
}

impl CaptureState {
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Recording => "recording",
            Self::Processing => "processing",
        }
    }
}

/// Progress of a voice turn, for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "text", rename_all = "snake_case")]
pub enum VoiceStatus {
    Recording,
    Processing,
    Transcript(String),
    Reply(String),
    Playing,
    Done,
    /// Already phrased for the user.
    Error(String),
}

impl VoiceStatus {
    pub fn message(&self) -> String {
        match self {
            Self::Recording => "Aufnahme läuft...".to_string(),
            Self::Processing => "Verarbeitung...".to_string(),
            Self::Transcript(text) => format!("Sie: {}", text),
            Self::Reply(text) => format!("Assistent: {}", text),
            Self::Playing => "Wiedergabe...".to_string(),
            Self::Done => "Fertig!".to_string(),
            Self::Error(message) => message.clone(),
        }
    }
}

/// A completed voice turn.
#[derive(Debug, Clone, Serialize)]
pub struct VoiceTurn {
    pub transcription: Transcription,
    /// Set when the command was carried out on the page.
    pub command: Option<CommandOutcome>,
    /// What was spoken back.
    pub reply: String,
    pub audio_bytes: usize,
}

/// The voice assistant's recording and answering loop.
pub struct VoiceCapture {
    config: VoiceConfig,
    backend: Arc<dyn VoiceBackend>,
    recorder: Box<dyn AudioRecorder>,
    player: Box<dyn AudioPlayer>,
    controller: Option<CommandController>,
    state: CaptureState,
    /// Armed by `start`, cleared once the recording ends.
    deadline: Option<Instant>,
    session_id: String,
    status_tx: broadcast::Sender<VoiceStatus>,
}

impl std::fmt::Debug for VoiceCapture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoiceCapture")
            .field("state", &self.state)
            .field("session_id", &self.session_id)
            .field("controller", &self.controller.is_some())
            .finish()
    }
}

impl VoiceCapture {
    pub fn new(
        config: VoiceConfig,
        backend: Arc<dyn VoiceBackend>,
        recorder: Box<dyn AudioRecorder>,
        player: Box<dyn AudioPlayer>,
    ) -> Self {
        let (status_tx, _) = broadcast::channel(STATUS_BROADCAST_CAPACITY);
        Self {
            config,
            backend,
            recorder,
            player,
            controller: None,
            state: CaptureState::Idle,
            deadline: None,
            session_id: format!("voice_{}", Uuid::new_v4()),
            status_tx,
        }
    }

    /// Lets commands that can be handled on the page skip the chatbot.
    pub fn with_controller(mut self, controller: CommandController) -> Self {
        self.controller = Some(controller);
        self
    }

    pub fn controller_mut(&mut self) -> Option<&mut CommandController> {
        self.controller.as_mut()
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    /// Chat session identifier, fixed for the lifetime of this capture.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn subscribe(&self) -> broadcast::Receiver<VoiceStatus> {
        self.status_tx.subscribe()
    }

    fn emit(&self, status: VoiceStatus) {
        let _ = self.status_tx.send(status);
    }

    fn fail(&mut self, e: VoiceError) -> VoiceError {
        error!(error = %e, state = self.state.label(), "voice turn failed");
        self.state = CaptureState::Idle;
        self.deadline = None;
        self.emit(VoiceStatus::Error(e.user_message()));
        e
    }

    /// Starts recording. Rejected unless idle.
    ///
    /// This also arms the maximum recording time. A host driving the voice
    /// button itself must race its stop press against
    /// [`recording_deadline`](Self::recording_deadline) and call
    /// [`stop`](Self::stop) on whichever comes first; [`record`](Self::record)
    /// does exactly that.
    pub async fn start(&mut self) -> Result<(), VoiceError> {
        if self.state != CaptureState::Idle {
            warn!(state = self.state.label(), "start rejected");
            return Err(VoiceError::InvalidState {
                action: "start recording",
                state: self.state.label(),
            });
        }

        if let Err(e) = self.recorder.start().await {
            return Err(self.fail(e));
        }

        self.state = CaptureState::Recording;
        self.deadline = Some(Instant::now() + self.config.max_recording());
        self.emit(VoiceStatus::Recording);
        info!(session_id = %self.session_id, "recording started");
        Ok(())
    }

    /// Resolves when the running recording reaches its maximum length.
    /// Never resolves while nothing is being recorded.
    pub async fn recording_deadline(&self) {
        match self.deadline {
            Some(deadline) => {
                tokio::time::sleep_until(deadline).await;
                info!(
                    max_secs = self.config.max_recording_secs,
                    "maximum recording time reached"
                );
            }
            None => std::future::pending().await,
        }
    }

    /// Stops recording and runs the turn to completion.
    pub async fn stop(&mut self) -> Result<VoiceTurn, VoiceError> {
        if self.state != CaptureState::Recording {
            return Err(VoiceError::InvalidState {
                action: "stop recording",
                state: self.state.label(),
            });
        }

        self.state = CaptureState::Processing;
        self.deadline = None;
        self.emit(VoiceStatus::Processing);
        info!("recording stopped");

        match self.process().await {
            Ok(turn) => {
                self.state = CaptureState::Idle;
                self.emit(VoiceStatus::Done);
                Ok(turn)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Records until `stop_signal` resolves or the maximum recording time
    /// elapses, then runs the turn.
    pub async fn record<F>(&mut self, stop_signal: F) -> Result<VoiceTurn, VoiceError>
    where
        F: Future<Output = ()>,
    {
        self.start().await?;

        tokio::select! {
            _ = stop_signal => {}
            _ = self.recording_deadline() => {}
        }

        self.stop().await
    }

    async fn process(&mut self) -> Result<VoiceTurn, VoiceError> {
        let audio = self.recorder.stop().await?;
        info!(bytes = audio.bytes.len(), mime_type = %audio.mime_type, "processing recording");

        let transcription = self.backend.transcribe(&audio).await?;
        self.emit(VoiceStatus::Transcript(transcription.text.clone()));

        let command = match &self.controller {
            Some(controller) => Some(controller.execute(&transcription.text).await),
            None => None,
        };

        let reply = match &command {
            Some(outcome) if !outcome.wants_chat() => outcome.message.clone(),
            _ => {
                let current_page = self
                    .controller
                    .as_ref()
                    .map(|c| c.current_page().to_string())
                    .unwrap_or_else(|| self.config.current_page.clone());
                let request = ChatRequest {
                    message: transcription.text.clone(),
                    current_page,
                    session_id: self.session_id.clone(),
                    language: transcription.language.clone(),
                    voice_mode: self.config.voice_mode,
                };
                self.backend.chat(&request).await?
            }
        };
        self.emit(VoiceStatus::Reply(reply.clone()));

        let speech = self
            .backend
            .synthesize(&SynthesisRequest {
                text: reply.clone(),
                language: transcription.language.clone(),
            })
            .await?;

        self.emit(VoiceStatus::Playing);
        self.player.play(&speech).await?;

        Ok(VoiceTurn {
            transcription,
            command,
            reply,
            audio_bytes: speech.len(),
        })
    }
}
