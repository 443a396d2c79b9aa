//! Voice navigation assistant for the TerminFinder web client.
//!
//! A spoken command is recorded, transcribed by the backend and either
//! carried out on the current page (navigate, highlight, click, focus) or
//! answered by the help chatbot, whose reply is synthesized and played back.
//!
//! - [`IntentParser`] classifies a transcript and extracts target keywords.
//! - [`ElementIndex`] and [`RouteTable`] resolve keywords to an element or a page.
//! - [`Highlighter`] runs the highlight animation on a single worker task.
//! - [`CommandController`] ties the above together for one page.
//! - [`VoiceCapture`] drives the record/transcribe/chat/speak turn.

pub mod backend;
pub mod capture;
pub mod config;
pub mod controller;
pub mod error;
pub mod highlight;
pub mod intent;
pub mod locator;
pub mod page;
pub mod user;

pub use backend::{HttpVoiceBackend, RecordedAudio, VoiceBackend};
pub use capture::{AudioPlayer, AudioRecorder, CaptureState, VoiceCapture, VoiceStatus, VoiceTurn};
pub use config::VoiceConfig;
pub use controller::{CommandAction, CommandController, CommandOutcome};
pub use error::VoiceError;
pub use highlight::{HighlightTiming, Highlighter};
pub use intent::{ActionKind, Intent, IntentParser, Language, ParsedIntent};
pub use locator::{ElementIndex, IndexedElement, RouteTable};
pub use page::{ElementHandle, ElementKind, ElementStyle, PageElement, TracedElement};
pub use user::detect_user_type;
