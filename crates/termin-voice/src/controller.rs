//! Carries out voice commands on the current page.

use crate::config::VoiceConfig;
use crate::error::VoiceError;
use crate::highlight::Highlighter;
use crate::intent::{ActionKind, Intent, IntentParser, ParsedIntent};
use crate::locator::{ElementIndex, RouteTable};
use crate::page::{auto_annotate, PageElement};
use serde::Serialize;
use std::time::Duration;
use tracing::{error, info};

/// What a command did, or why it did nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CommandAction {
    /// The host should load `path`.
    PageNavigation { path: String },
    ElementHighlight { target: String },
    /// The element is clicked after the configured delay.
    ElementClick { target: String },
    ElementFocus { target: String },
    FallbackToChatbot,
    ChatbotExplain,
    ElementNotFound,
    UnsupportedAction,
    Failed,
}

/// Result of [`CommandController::execute`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandOutcome {
    pub success: bool,
    /// German text to show and speak.
    pub message: String,
    pub action: CommandAction,
    pub parsed: ParsedIntent,
}

impl CommandOutcome {
    /// True when the command should be answered by the help chatbot instead.
    pub fn wants_chat(&self) -> bool {
        matches!(
            self.action,
            CommandAction::FallbackToChatbot | CommandAction::ChatbotExplain
        )
    }
}

type Handled = (bool, String, CommandAction);

/// Parses transcripts and acts on the page the assistant runs on.
#[derive(Debug)]
pub struct CommandController {
    parser: IntentParser,
    routes: RouteTable,
    index: ElementIndex,
    highlighter: Highlighter,
    current_page: String,
    click_delay: Duration,
}

impl CommandController {
    /// A controller with the default routes and an empty page.
    pub fn new(config: &VoiceConfig, highlighter: Highlighter) -> Result<Self, VoiceError> {
        Ok(Self {
            parser: IntentParser::new()?,
            routes: RouteTable::default_routes(),
            index: ElementIndex::default(),
            highlighter,
            current_page: config.current_page.clone(),
            click_delay: config.click_delay(),
        })
    }

    pub fn with_routes(mut self, routes: RouteTable) -> Self {
        self.routes = routes;
        self
    }

    /// Switches to a newly loaded page: unannotated buttons and links get
    /// generated identifiers and the element index is rebuilt.
    pub fn load_page(&mut self, path: impl Into<String>, elements: &mut [PageElement]) {
        self.current_page = path.into();
        auto_annotate(elements);
        self.index = ElementIndex::build(elements);
        info!(
            page = %self.current_page,
            elements = self.index.len(),
            "voice navigation ready"
        );
    }

    pub fn current_page(&self) -> &str {
        &self.current_page
    }

    pub fn index(&self) -> &ElementIndex {
        &self.index
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn parse(&self, transcript: &str) -> ParsedIntent {
        self.parser.parse(transcript)
    }

    /// Parses `transcript` and carries it out. Never fails: problems are
    /// reported through the outcome.
    pub async fn execute(&self, transcript: &str) -> CommandOutcome {
        let parsed = self.parser.parse(transcript);

        let result = match parsed.intent {
            Intent::Navigate => self.navigate(&parsed).await,
            Intent::Action => self.act(&parsed).await,
            Intent::Explain => Ok((
                true,
                "Lass mich dir das erklären...".to_string(),
                CommandAction::ChatbotExplain,
            )),
        };

        let (success, message, action) = result.unwrap_or_else(|e| {
            error!(error = %e, transcript = %transcript, "voice command failed");
            (
                false,
                "Entschuldigung, ich konnte diesen Befehl nicht ausführen.".to_string(),
                CommandAction::Failed,
            )
        });

        info!(success, action = ?action, "executed voice command");
        CommandOutcome {
            success,
            message,
            action,
            parsed,
        }
    }

    async fn navigate(&self, parsed: &ParsedIntent) -> Result<Handled, VoiceError> {
        if let Some(path) = self.routes.lookup(&parsed.keywords) {
            if path != self.current_page {
                return Ok((
                    true,
                    format!("Navigiere zu {}...", path),
                    CommandAction::PageNavigation {
                        path: path.to_string(),
                    },
                ));
            }
        }

        if let Some(entry) = self.index.best_match(&parsed.keywords) {
            self.highlighter
                .highlight(entry.element.handle.clone())
                .await?;
            let title = entry.display_name();
            return Ok((
                true,
                format!("Hier ist: {}", title),
                CommandAction::ElementHighlight {
                    target: title.to_string(),
                },
            ));
        }

        Ok((
            false,
            "Ich konnte dieses Element nicht finden. Lass mich dir helfen...".to_string(),
            CommandAction::FallbackToChatbot,
        ))
    }

    async fn act(&self, parsed: &ParsedIntent) -> Result<Handled, VoiceError> {
        let Some(entry) = self.index.best_match(&parsed.keywords) else {
            return Ok((
                false,
                "Ich konnte das Element nicht finden.".to_string(),
                CommandAction::ElementNotFound,
            ));
        };

        let kind = parsed.action.unwrap_or(ActionKind::Generic);
        let handle = entry.element.handle.clone();
        self.highlighter.highlight(handle.clone()).await?;
        let title = entry.display_name().to_string();

        Ok(match kind {
            ActionKind::Click | ActionKind::Generic => {
                let delay = self.click_delay;
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    handle.click();
                });
                (
                    true,
                    format!("Klicke auf: {}", title),
                    CommandAction::ElementClick { target: title },
                )
            }
            ActionKind::Fill => {
                handle.focus();
                (
                    true,
                    format!("Bereit für Eingabe in: {}", title),
                    CommandAction::ElementFocus { target: title },
                )
            }
            ActionKind::Highlight => (
                true,
                format!("Hier ist: {}", title),
                CommandAction::ElementHighlight { target: title },
            ),
            ActionKind::Book => (
                false,
                "Diese Aktion wird noch nicht unterstützt.".to_string(),
                CommandAction::UnsupportedAction,
            ),
        })
    }
}
