//! Voice command intent classification.
//!
//! A transcript is classified as navigation, action or explanation by
//! testing anchored patterns for every supported language. Groups are
//! checked in fixed priority (navigation, then action, then explanation) and
//! the first matching pattern wins; with no match the command is treated as
//! a question for the chatbot.

use crate::error::VoiceError;
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;

/// Coarse classification of a voice command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Navigate,
    Action,
    Explain,
}

/// What an action command wants done with its target element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Click,
    Fill,
    Book,
    Highlight,
    /// An action verb was recognised but none of the specific kinds.
    Generic,
}

/// Languages with a pattern set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    German,
    English,
}

/// A classified voice command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedIntent {
    pub intent: Intent,
    /// Set only for `Intent::Action`.
    pub action: Option<ActionKind>,
    /// Target keywords with intent words and short tokens removed.
    pub keywords: Vec<String>,
    pub raw_text: String,
}

struct PatternSet {
    language: Language,
    navigation: &'static [&'static str],
    action: &'static [&'static str],
    explain: &'static [&'static str],
}

const PATTERN_SETS: &[PatternSet] = &[
    PatternSet {
        language: Language::German,
        navigation: &[
            r"^(gehe? zu|zeige?|öffne?|navigiere zu)",
            r"^(wo ist|wo finde ich)",
        ],
        action: &[
            r"^(klicke auf|klick|drücke?)",
            r"^(fülle? aus|eingeben)",
            r"^(buche?|reserviere?)",
            r"^(markiere|hebe hervor)",
        ],
        explain: &[r"^(wie|was|warum|erkläre|erklär)", r"^(hilfe|info|information)"],
    },
    PatternSet {
        language: Language::English,
        navigation: &[r"^(go to|navigate to|show|open)", r"^(where is|find)"],
        action: &[
            r"^(click|press|tap)",
            r"^(fill|type|enter)",
            r"^(book|reserve)",
            r"^(highlight)",
        ],
        explain: &[r"^(how|what|why|explain)", r"^(help|info|information)"],
    },
];

/// Sub-type patterns, checked in order after an action match: first against
/// the leading verb alone, then against the whole command.
const ACTION_KIND_PATTERNS: &[(ActionKind, &str)] = &[
    (ActionKind::Click, r"klick|click|drück|press|tap"),
    (ActionKind::Fill, r"füll|eingeben|type|fill|enter"),
    (ActionKind::Book, r"buch|reservier|book|reserve"),
    (ActionKind::Highlight, r"markier|hervor|highlight"),
];

/// Intent verbs, articles, pronouns and fillers that never name a target.
const STOP_WORDS: &[&str] = &[
    // German intent words
    "gehe", "geh", "zeige", "zeig", "öffne", "öffnen", "navigiere", "klick", "klicke", "drücke",
    "drück", "fülle", "füll", "eingeben", "buche", "reserviere", "markiere", "hebe", "hervor",
    "wie", "was", "warum", "erkläre", "erklär", "wo", "ist", "finde", "finden",
    // German articles, pronouns, prepositions
    "ich", "mir", "mich", "mein", "meine", "meinen", "meiner", "dein", "deine", "der", "die",
    "das", "den", "dem", "des", "ein", "eine", "einen", "einem", "auf", "zu", "zum", "zur",
    "aus", "mit", "für", "von", "und", "bitte", "hier", "bei",
    // English intent words
    "go", "show", "open", "navigate", "click", "press", "tap", "fill", "type", "enter", "book",
    "reserve", "highlight", "how", "what", "why", "where", "find", "explain",
    // English articles, pronouns, prepositions
    "the", "a", "an", "my", "me", "your", "to", "on", "in", "for", "of", "and", "please",
    "this", "that", "with",
];

/// Lower-cases `text` and replaces punctuation with spaces. Letters
/// (including umlauts and ß) and digits are kept.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() || c.is_whitespace() { c } else { ' ' })
        .collect::<String>()
        .trim()
        .to_string()
}

/// Regex-based classifier for voice commands.
#[derive(Debug)]
pub struct IntentParser {
    navigation: Vec<(Language, Regex)>,
    action: Vec<(Language, Regex)>,
    explain: Vec<(Language, Regex)>,
    action_kinds: Vec<(ActionKind, Regex)>,
    stop_words: HashSet<&'static str>,
}

fn compile(
    select: impl Fn(&PatternSet) -> &'static [&'static str],
) -> Result<Vec<(Language, Regex)>, VoiceError> {
    let mut compiled = Vec::new();
    for set in PATTERN_SETS {
        for pattern in select(set) {
            compiled.push((set.language, Regex::new(pattern)?));
        }
    }
    Ok(compiled)
}

/// First pattern of `group` matching `text`, with the matched verb.
fn leading_verb<'t>(group: &[(Language, Regex)], text: &'t str) -> Option<(Language, &'t str)> {
    group.iter().find_map(|(language, pattern)| {
        pattern
            .find(text)
            .map(|found| (*language, found.as_str()))
    })
}

fn first_match(group: &[(Language, Regex)], text: &str) -> Option<Language> {
    leading_verb(group, text).map(|(language, _)| language)
}

impl IntentParser {
    /// Compiles the German and English pattern sets.
    pub fn new() -> Result<Self, VoiceError> {
        let action_kinds = ACTION_KIND_PATTERNS
            .iter()
            .map(|(kind, pattern)| Ok((*kind, Regex::new(pattern)?)))
            .collect::<Result<Vec<_>, VoiceError>>()?;

        Ok(Self {
            navigation: compile(|set| set.navigation)?,
            action: compile(|set| set.action)?,
            explain: compile(|set| set.explain)?,
            action_kinds,
            stop_words: STOP_WORDS.iter().copied().collect(),
        })
    }

    /// Classifies `transcript` and extracts its target keywords.
    pub fn parse(&self, transcript: &str) -> ParsedIntent {
        let text = normalize(transcript);

        let (intent, action, language) = if let Some(language) = first_match(&self.navigation, &text)
        {
            (Intent::Navigate, None, Some(language))
        } else if let Some((language, verb)) = leading_verb(&self.action, &text) {
            (Intent::Action, Some(self.action_kind(verb, &text)), Some(language))
        } else {
            (Intent::Explain, None, first_match(&self.explain, &text))
        };

        let keywords = self.keywords(&text);

        tracing::debug!(
            intent = ?intent,
            action = ?action,
            language = ?language,
            keywords = ?keywords,
            "parsed voice command"
        );

        ParsedIntent {
            intent,
            action,
            keywords,
            raw_text: transcript.to_string(),
        }
    }

    /// The verb decides; the rest of the command only when the verb is
    /// not a known kind, so a target like "booking" cannot override it.
    fn action_kind(&self, verb: &str, text: &str) -> ActionKind {
        self.kind_in(verb)
            .or_else(|| self.kind_in(text))
            .unwrap_or(ActionKind::Generic)
    }

    fn kind_in(&self, text: &str) -> Option<ActionKind> {
        self.action_kinds
            .iter()
            .find(|(_, pattern)| pattern.is_match(text))
            .map(|(kind, _)| *kind)
    }

    fn keywords(&self, text: &str) -> Vec<String> {
        text.split_whitespace()
            .filter(|word| word.chars().count() > 2 && !self.stop_words.contains(word))
            .map(str::to_string)
            .collect()
    }
}
