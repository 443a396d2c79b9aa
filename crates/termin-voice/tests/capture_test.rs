//! Voice turns against fake audio devices and backends.

use async_trait::async_trait;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use termin_types::voice::{ChatRequest, SynthesisRequest, Transcription};
use termin_voice::{
    AudioPlayer, AudioRecorder, CaptureState, CommandAction, CommandController, HighlightTiming,
    Highlighter, HttpVoiceBackend, RecordedAudio, VoiceBackend, VoiceCapture, VoiceConfig,
    VoiceError, VoiceStatus,
};
use tokio::sync::broadcast;

const SPEECH: &[u8] = b"ID3-fake-mp3";

#[derive(Default)]
struct FakeRecorder {
    deny: bool,
    stops: Arc<AtomicUsize>,
}

#[async_trait]
impl AudioRecorder for FakeRecorder {
    async fn start(&mut self) -> Result<(), VoiceError> {
        if self.deny {
            return Err(VoiceError::Microphone("NotAllowedError".to_string()));
        }
        Ok(())
    }

    async fn stop(&mut self) -> Result<RecordedAudio, VoiceError> {
        self.stops.fetch_add(1, Ordering::SeqCst);
        Ok(RecordedAudio::webm(b"webm-bytes".to_vec()))
    }
}

#[derive(Default)]
struct FakePlayer {
    broken: bool,
    played: Arc<Mutex<Vec<Vec<u8>>>>,
}

#[async_trait]
impl AudioPlayer for FakePlayer {
    async fn play(&mut self, audio: &[u8]) -> Result<(), VoiceError> {
        if self.broken {
            return Err(VoiceError::Playback("NotSupportedError".to_string()));
        }
        self.played.lock().unwrap().push(audio.to_vec());
        Ok(())
    }
}

fn drain(rx: &mut broadcast::Receiver<VoiceStatus>) -> Vec<VoiceStatus> {
    let mut statuses = Vec::new();
    while let Ok(status) = rx.try_recv() {
        statuses.push(status);
    }
    statuses
}

// --- HTTP fake backend ---

const REPLY: &str = "Wählen Sie einen Arzt und dann einen freien Termin.";

/// Canned endpoint answers plus a log of what each endpoint received.
struct Server {
    transcription: (StatusCode, Value),
    chat: (StatusCode, Value),
    synthesis: StatusCode,
    uploads: Mutex<Vec<(String, String, usize)>>,
    chats: Mutex<Vec<Value>>,
    syntheses: Mutex<Vec<Value>>,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            transcription: (
                StatusCode::OK,
                json!({"text": "Wie buche ich einen Termin?", "language": "de", "success": true}),
            ),
            chat: (StatusCode::OK, json!({"response": REPLY})),
            synthesis: StatusCode::OK,
            uploads: Mutex::default(),
            chats: Mutex::default(),
            syntheses: Mutex::default(),
        }
    }
}

async fn transcribe(State(server): State<Arc<Server>>, mut multipart: Multipart) -> Response {
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.unwrap();
        server
            .uploads
            .lock()
            .unwrap()
            .push((name, file_name, bytes.len()));
    }

    let (status, body) = server.transcription.clone();
    (status, Json(body)).into_response()
}

async fn chat(State(server): State<Arc<Server>>, Json(body): Json<Value>) -> Response {
    server.chats.lock().unwrap().push(body);
    let (status, body) = server.chat.clone();
    (status, Json(body)).into_response()
}

async fn synthesize(State(server): State<Arc<Server>>, Json(body): Json<Value>) -> Response {
    server.syntheses.lock().unwrap().push(body);
    if server.synthesis != StatusCode::OK {
        return (server.synthesis, Json(json!({"error": "TTS-Kontingent erschöpft"})))
            .into_response();
    }
    SPEECH.to_vec().into_response()
}

async fn spawn_server(server: Arc<Server>) -> String {
    let app = Router::new()
        .route("/api/voice-transcribe", post(transcribe))
        .route("/api/help-chat", post(chat))
        .route("/api/voice-synthesize", post(synthesize))
        .with_state(server);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn http_capture(url: String, recorder: FakeRecorder, player: FakePlayer) -> VoiceCapture {
    let config = VoiceConfig::new(url);
    let backend = Arc::new(HttpVoiceBackend::new(&config));
    VoiceCapture::new(config, backend, Box::new(recorder), Box::new(player))
}

#[tokio::test]
async fn full_turn_through_chatbot() {
    let server = Arc::new(Server::default());
    let url = spawn_server(server.clone()).await;
    let player = FakePlayer::default();
    let played = player.played.clone();
    let mut capture = http_capture(url, FakeRecorder::default(), player);
    let mut rx = capture.subscribe();

    capture.start().await.unwrap();
    assert_eq!(capture.state(), CaptureState::Recording);

    let turn = capture.stop().await.unwrap();
    assert_eq!(capture.state(), CaptureState::Idle);
    assert_eq!(turn.transcription.text, "Wie buche ich einen Termin?");
    assert_eq!(turn.reply, REPLY);
    assert!(turn.command.is_none());
    assert_eq!(turn.audio_bytes, SPEECH.len());

    let uploads = server.uploads.lock().unwrap().clone();
    assert_eq!(
        uploads,
        vec![("audio".to_string(), "recording.webm".to_string(), 10)]
    );

    let chats = server.chats.lock().unwrap().clone();
    assert_eq!(chats.len(), 1);
    assert_eq!(chats[0]["message"], "Wie buche ich einen Termin?");
    assert_eq!(chats[0]["current_page"], "/");
    assert_eq!(chats[0]["language"], "de");
    assert_eq!(chats[0]["voice_mode"], true);
    assert_eq!(chats[0]["session_id"], capture.session_id());

    let syntheses = server.syntheses.lock().unwrap().clone();
    assert_eq!(
        syntheses,
        vec![json!({"text": REPLY, "language": "de"})]
    );
    assert_eq!(played.lock().unwrap().as_slice(), [SPEECH.to_vec()]);

    assert_eq!(
        drain(&mut rx),
        vec![
            VoiceStatus::Recording,
            VoiceStatus::Processing,
            VoiceStatus::Transcript("Wie buche ich einen Termin?".to_string()),
            VoiceStatus::Reply(REPLY.to_string()),
            VoiceStatus::Playing,
            VoiceStatus::Done,
        ]
    );
}

#[tokio::test]
async fn transcription_failure_aborts_turn() {
    let server = Arc::new(Server {
        transcription: (
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({"error": "Whisper nicht erreichbar"}),
        ),
        ..Default::default()
    });
    let url = spawn_server(server.clone()).await;
    let mut capture = http_capture(url, FakeRecorder::default(), FakePlayer::default());
    let mut rx = capture.subscribe();

    capture.start().await.unwrap();
    let err = capture.stop().await.unwrap_err();

    assert!(matches!(err, VoiceError::Transcription(_)));
    assert_eq!(capture.state(), CaptureState::Idle);
    assert!(server.chats.lock().unwrap().is_empty());
    assert!(server.syntheses.lock().unwrap().is_empty());
    assert_eq!(
        drain(&mut rx).last(),
        Some(&VoiceStatus::Error("Fehler: Whisper nicht erreichbar".to_string()))
    );

    // A new turn can start right away.
    capture.start().await.unwrap();
    assert_eq!(capture.state(), CaptureState::Recording);
}

#[tokio::test]
async fn unreachable_backend_returns_to_idle() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut capture = http_capture(
        format!("http://{}", addr),
        FakeRecorder::default(),
        FakePlayer::default(),
    );
    capture.start().await.unwrap();
    let err = capture.stop().await.unwrap_err();

    assert!(matches!(err, VoiceError::Http(_)));
    assert_eq!(capture.state(), CaptureState::Idle);
}

type FailedTurn = (Arc<Server>, VoiceError, Vec<VoiceStatus>, CaptureState);

/// Runs one turn against `server` and returns the error it ended with.
async fn failed_turn(server: Server, player: FakePlayer) -> FailedTurn {
    let server = Arc::new(server);
    let url = spawn_server(server.clone()).await;
    let mut capture = http_capture(url, FakeRecorder::default(), player);
    let mut rx = capture.subscribe();

    capture.start().await.unwrap();
    let err = capture.stop().await.unwrap_err();
    (server, err, drain(&mut rx), capture.state())
}

#[tokio::test]
async fn soft_transcription_failure_with_ok_status() {
    let (server, err, statuses, state) = failed_turn(
        Server {
            transcription: (
                StatusCode::OK,
                json!({"text": "", "success": false, "error": "Audio zu kurz"}),
            ),
            ..Default::default()
        },
        FakePlayer::default(),
    )
    .await;

    assert!(matches!(&err, VoiceError::Transcription(msg) if msg == "Audio zu kurz"));
    assert_eq!(state, CaptureState::Idle);
    assert!(server.chats.lock().unwrap().is_empty());
    assert_eq!(
        statuses.last(),
        Some(&VoiceStatus::Error("Fehler: Audio zu kurz".to_string()))
    );
}

#[tokio::test]
async fn empty_transcript_is_a_transcription_failure() {
    let (server, err, _, state) = failed_turn(
        Server {
            transcription: (
                StatusCode::OK,
                json!({"text": "   ", "language": "de", "success": true}),
            ),
            ..Default::default()
        },
        FakePlayer::default(),
    )
    .await;

    assert!(matches!(&err, VoiceError::Transcription(msg) if msg == "Transcription failed"));
    assert_eq!(state, CaptureState::Idle);
    assert!(server.chats.lock().unwrap().is_empty());
}

#[tokio::test]
async fn missing_chat_reply_aborts_turn() {
    for body in [json!({}), json!({"response": ""})] {
        let (server, err, statuses, state) = failed_turn(
            Server {
                chat: (StatusCode::OK, body),
                ..Default::default()
            },
            FakePlayer::default(),
        )
        .await;

        assert!(matches!(&err, VoiceError::Chat(msg) if msg == "No response from chatbot"));
        assert_eq!(state, CaptureState::Idle);
        assert!(server.syntheses.lock().unwrap().is_empty());
        assert_eq!(
            statuses.last(),
            Some(&VoiceStatus::Error("Fehler: No response from chatbot".to_string()))
        );
    }
}

#[tokio::test]
async fn chat_server_error_aborts_turn() {
    let (server, err, statuses, state) = failed_turn(
        Server {
            chat: (
                StatusCode::SERVICE_UNAVAILABLE,
                json!({"error": "Chatbot überlastet"}),
            ),
            ..Default::default()
        },
        FakePlayer::default(),
    )
    .await;

    assert!(matches!(&err, VoiceError::Chat(msg) if msg == "Chatbot überlastet"));
    assert_eq!(state, CaptureState::Idle);
    assert_eq!(server.chats.lock().unwrap().len(), 1);
    assert!(server.syntheses.lock().unwrap().is_empty());
    assert!(!statuses.contains(&VoiceStatus::Done));
}

#[tokio::test]
async fn chat_error_without_body_uses_generic_message() {
    let (_, err, _, _) = failed_turn(
        Server {
            chat: (StatusCode::BAD_GATEWAY, Value::Null),
            ..Default::default()
        },
        FakePlayer::default(),
    )
    .await;

    assert!(matches!(&err, VoiceError::Chat(msg) if msg == "Chatbot error"));
}

#[tokio::test]
async fn synthesis_failure_plays_nothing() {
    let player = FakePlayer::default();
    let played = player.played.clone();
    let (server, err, statuses, state) = failed_turn(
        Server {
            synthesis: StatusCode::INTERNAL_SERVER_ERROR,
            ..Default::default()
        },
        player,
    )
    .await;

    assert!(matches!(&err, VoiceError::Synthesis(msg) if msg == "TTS-Kontingent erschöpft"));
    assert_eq!(state, CaptureState::Idle);
    assert_eq!(server.syntheses.lock().unwrap().len(), 1);
    assert!(played.lock().unwrap().is_empty());
    assert!(!statuses.contains(&VoiceStatus::Playing));
    assert_eq!(
        statuses.last(),
        Some(&VoiceStatus::Error("Fehler: TTS-Kontingent erschöpft".to_string()))
    );
}

#[tokio::test]
async fn playback_failure_returns_to_idle() {
    let (server, err, statuses, state) = failed_turn(
        Server::default(),
        FakePlayer {
            broken: true,
            ..Default::default()
        },
    )
    .await;

    assert!(matches!(err, VoiceError::Playback(_)));
    assert_eq!(state, CaptureState::Idle);
    assert_eq!(server.syntheses.lock().unwrap().len(), 1);
    assert!(statuses.contains(&VoiceStatus::Playing));
    assert_eq!(
        statuses.last(),
        Some(&VoiceStatus::Error(
            "Fehler: Playback error: NotSupportedError".to_string()
        ))
    );
}

// --- In-process fake backend ---

#[derive(Default)]
struct FakeBackend {
    transcript: String,
    chats: Mutex<Vec<ChatRequest>>,
    spoken: Mutex<Vec<String>>,
}

#[async_trait]
impl VoiceBackend for FakeBackend {
    async fn transcribe(&self, _audio: &RecordedAudio) -> Result<Transcription, VoiceError> {
        Ok(Transcription {
            text: self.transcript.clone(),
            language: "en".to_string(),
            success: true,
            error: None,
        })
    }

    async fn chat(&self, request: &ChatRequest) -> Result<String, VoiceError> {
        self.chats.lock().unwrap().push(request.clone());
        Ok("Gern geholfen.".to_string())
    }

    async fn synthesize(&self, request: &SynthesisRequest) -> Result<Vec<u8>, VoiceError> {
        self.spoken.lock().unwrap().push(request.text.clone());
        Ok(SPEECH.to_vec())
    }
}

fn fake_capture(backend: Arc<FakeBackend>, recorder: FakeRecorder) -> VoiceCapture {
    VoiceCapture::new(
        VoiceConfig::default(),
        backend,
        Box::new(recorder),
        Box::new(FakePlayer::default()),
    )
}

#[tokio::test]
async fn microphone_denied_stays_idle() {
    let backend = Arc::new(FakeBackend::default());
    let mut capture = fake_capture(
        backend,
        FakeRecorder {
            deny: true,
            ..Default::default()
        },
    );
    let mut rx = capture.subscribe();

    let err = capture.start().await.unwrap_err();

    assert!(matches!(err, VoiceError::Microphone(_)));
    assert_eq!(capture.state(), CaptureState::Idle);
    assert_eq!(
        drain(&mut rx),
        vec![VoiceStatus::Error("Mikrofonzugriff verweigert".to_string())]
    );
}

#[tokio::test]
async fn start_is_rejected_while_recording_and_stop_while_idle() {
    let backend = Arc::new(FakeBackend {
        transcript: "hilfe".to_string(),
        ..Default::default()
    });
    let mut capture = fake_capture(backend, FakeRecorder::default());

    let err = capture.stop().await.unwrap_err();
    assert_eq!(err.to_string(), "Cannot stop recording while idle");

    capture.start().await.unwrap();
    let err = capture.start().await.unwrap_err();
    assert_eq!(err.to_string(), "Cannot start recording while recording");
    assert_eq!(capture.state(), CaptureState::Recording);
}

#[tokio::test(start_paused = true)]
async fn recording_stops_after_maximum_time() {
    let backend = Arc::new(FakeBackend {
        transcript: "hilfe".to_string(),
        ..Default::default()
    });
    let recorder = FakeRecorder::default();
    let stops = recorder.stops.clone();
    let mut capture = fake_capture(backend.clone(), recorder);

    let started = tokio::time::Instant::now();
    let turn = capture
        .record(std::future::pending::<()>())
        .await
        .unwrap();

    assert!(started.elapsed() >= Duration::from_secs(30));
    assert_eq!(stops.load(Ordering::SeqCst), 1);
    assert_eq!(turn.reply, "Gern geholfen.");
    assert_eq!(backend.chats.lock().unwrap()[0].language, "en");
}

#[tokio::test(start_paused = true)]
async fn button_driven_recording_hits_the_deadline() {
    let backend = Arc::new(FakeBackend {
        transcript: "hilfe".to_string(),
        ..Default::default()
    });
    let recorder = FakeRecorder::default();
    let stops = recorder.stops.clone();
    let mut capture = fake_capture(backend, recorder);

    let started = tokio::time::Instant::now();
    capture.start().await.unwrap();
    tokio::time::sleep(Duration::from_secs(20)).await;
    assert_eq!(capture.state(), CaptureState::Recording);

    // The user never presses the button a second time.
    let second_press = std::future::pending::<()>();
    tokio::select! {
        _ = second_press => unreachable!(),
        _ = capture.recording_deadline() => {}
    }
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(30));
    assert!(elapsed < Duration::from_secs(31));

    capture.stop().await.unwrap();
    assert_eq!(stops.load(Ordering::SeqCst), 1);
    assert_eq!(capture.state(), CaptureState::Idle);
}

#[tokio::test(start_paused = true)]
async fn no_deadline_while_idle() {
    let backend = Arc::new(FakeBackend {
        transcript: "hilfe".to_string(),
        ..Default::default()
    });
    let mut capture = fake_capture(backend, FakeRecorder::default());

    let idle = tokio::time::timeout(Duration::from_secs(120), capture.recording_deadline()).await;
    assert!(idle.is_err());

    capture.start().await.unwrap();
    capture.stop().await.unwrap();
    let finished =
        tokio::time::timeout(Duration::from_secs(120), capture.recording_deadline()).await;
    assert!(finished.is_err());
}

#[tokio::test(start_paused = true)]
async fn stop_signal_ends_recording_early() {
    let backend = Arc::new(FakeBackend {
        transcript: "hilfe".to_string(),
        ..Default::default()
    });
    let mut capture = fake_capture(backend, FakeRecorder::default());

    let started = tokio::time::Instant::now();
    capture
        .record(tokio::time::sleep(Duration::from_secs(2)))
        .await
        .unwrap();

    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(2));
    assert!(elapsed < Duration::from_secs(30));
}

#[tokio::test(start_paused = true)]
async fn page_commands_skip_the_chatbot() {
    let backend = Arc::new(FakeBackend {
        transcript: "Show my appointments".to_string(),
        ..Default::default()
    });
    let config = VoiceConfig::default();
    let controller =
        CommandController::new(&config, Highlighter::spawn(HighlightTiming::default())).unwrap();
    let mut capture = fake_capture(backend.clone(), FakeRecorder::default())
        .with_controller(controller);

    capture.start().await.unwrap();
    let turn = capture.stop().await.unwrap();

    let command = turn.command.expect("command outcome");
    assert_eq!(
        command.action,
        CommandAction::PageNavigation {
            path: "/patient/bookings".to_string()
        }
    );
    assert!(backend.chats.lock().unwrap().is_empty());
    assert_eq!(
        backend.spoken.lock().unwrap().as_slice(),
        ["Navigiere zu /patient/bookings...".to_string()]
    );
}

#[tokio::test(start_paused = true)]
async fn unresolved_commands_fall_back_to_chat_with_page_context() {
    let backend = Arc::new(FakeBackend {
        transcript: "Was kostet ein Termin?".to_string(),
        ..Default::default()
    });
    let config = VoiceConfig::default();
    let mut controller =
        CommandController::new(&config, Highlighter::spawn(HighlightTiming::default())).unwrap();
    controller.load_page("/patient/search", &mut []);
    let mut capture = fake_capture(backend.clone(), FakeRecorder::default())
        .with_controller(controller);

    capture.start().await.unwrap();
    let turn = capture.stop().await.unwrap();

    assert_eq!(
        turn.command.map(|c| c.action),
        Some(CommandAction::ChatbotExplain)
    );
    let chats = backend.chats.lock().unwrap();
    assert_eq!(chats.len(), 1);
    assert_eq!(chats[0].current_page, "/patient/search");
    assert_eq!(turn.reply, "Gern geholfen.");
}
