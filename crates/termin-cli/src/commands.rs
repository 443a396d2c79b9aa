//! Implementations of the `terminfinder` subcommands.

use crate::config::{Config, ConfigError};
use crate::devices::{FilePlayer, FileRecorder};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use termin_profile::{
    CompletenessReport, CompletenessScheme, FormState, ProfileClient, ProfileEditor,
};
use termin_types::ProfileRecord;
use termin_voice::{
    CommandAction, CommandController, CommandOutcome, HighlightTiming, Highlighter,
    HttpVoiceBackend, IntentParser, PageElement, ParsedIntent, TracedElement, VoiceCapture,
    VoiceError, VoiceTurn,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Voice(#[from] VoiceError),

    #[error("{0}")]
    Profile(String),

    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },

    #[error("unknown completeness scheme: {0} (expected extended or contact)")]
    Scheme(String),
}

/// One element of a page fixture file.
#[derive(Debug, Clone, Deserialize)]
pub struct ElementSpec {
    pub tag: String,
    #[serde(default)]
    pub attributes: HashMap<String, String>,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub text: String,
}

impl ElementSpec {
    fn into_element(self, position: usize) -> PageElement {
        let name = self
            .attributes
            .get(termin_voice::page::NAV_ATTR)
            .cloned()
            .unwrap_or_else(|| format!("{}#{}", self.tag, position));
        let mut element = PageElement::new(TracedElement::new(name), self.tag).with_text(self.text);
        element.attributes = self.attributes;
        element.classes = self.classes;
        element
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let display = path.display().to_string();
    let contents = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: display.clone(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| CliError::Json {
        path: display,
        source,
    })
}

/// Reads a page fixture: a JSON array of [`ElementSpec`].
pub fn load_page(path: &Path) -> Result<Vec<PageElement>, CliError> {
    let specs: Vec<ElementSpec> = read_json(path)?;
    Ok(specs
        .into_iter()
        .enumerate()
        .map(|(i, spec)| spec.into_element(i))
        .collect())
}

/// `intent`: classify a command without acting on it.
pub fn intent(text: &str) -> Result<ParsedIntent, CliError> {
    Ok(IntentParser::new()?.parse(text))
}

/// `locate`: carry out a command against a page fixture.
pub async fn locate(
    config: &Config,
    text: &str,
    page: Option<&Path>,
    current_page: Option<String>,
) -> Result<CommandOutcome, CliError> {
    let voice = config.voice_config();
    let mut elements = match page {
        Some(path) => load_page(path)?,
        None => Vec::new(),
    };

    let mut controller =
        CommandController::new(&voice, Highlighter::spawn(HighlightTiming::default()))?;
    controller.load_page(
        current_page.unwrap_or_else(|| voice.current_page.clone()),
        &mut elements,
    );

    let outcome = controller.execute(text).await;
    if matches!(outcome.action, CommandAction::ElementClick { .. }) {
        // Let the delayed click land before the process exits.
        tokio::time::sleep(voice.click_delay()).await;
    }
    Ok(outcome)
}

/// `score`: completeness of a profile read from `file`, or fetched from
/// the backend when no file is given.
pub async fn score(
    config: &Config,
    scheme: &str,
    file: Option<&Path>,
) -> Result<CompletenessReport, CliError> {
    let scheme =
        CompletenessScheme::from_name(scheme).ok_or_else(|| CliError::Scheme(scheme.to_string()))?;

    match file {
        Some(path) => {
            let record: ProfileRecord = read_json(path)?;
            let mut form = FormState::default();
            form.populate(&record);
            Ok(termin_profile::score(scheme, &form, &record))
        }
        None => {
            let mut client = ProfileClient::new(config.api.base_url.clone());
            if let Some(token) = &config.api.token {
                client = client.with_token(token.clone());
            }
            ProfileEditor::new(client, scheme)
                .load()
                .await
                .map_err(|alert| CliError::Profile(alert.message))
        }
    }
}

/// `ask`: run one voice turn with a recorded audio file.
pub async fn ask(
    config: &Config,
    audio: PathBuf,
    output: Option<PathBuf>,
) -> Result<VoiceTurn, CliError> {
    let voice = config.voice_config();
    let backend = Arc::new(HttpVoiceBackend::new(&voice));
    let mut controller =
        CommandController::new(&voice, Highlighter::spawn(HighlightTiming::default()))?;
    controller.load_page(voice.current_page.clone(), &mut []);

    let mut capture = VoiceCapture::new(
        voice,
        backend,
        Box::new(FileRecorder::new(audio)),
        Box::new(FilePlayer::new(output)),
    )
    .with_controller(controller);

    let mut statuses = capture.subscribe();
    let printer = tokio::spawn(async move {
        while let Ok(status) = statuses.recv().await {
            tracing::info!(status = %status.message(), "voice");
        }
    });

    capture.start().await?;
    let turn = capture.stop().await;

    drop(capture);
    let _ = printer.await;
    Ok(turn?)
}
