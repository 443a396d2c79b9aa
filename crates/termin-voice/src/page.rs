//! Page model consumed by the element locator and the highlight effect.
//!
//! The assistant never owns page nodes. Each [`PageElement`] carries the
//! attributes the locator reads plus a shared [`ElementHandle`] through which
//! the host (a browser shell, the CLI, a test) scrolls, styles, clicks and
//! focuses the real node.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

/// Attribute naming an element for voice navigation.
pub const NAV_ATTR: &str = "data-voice-nav";
/// Attribute holding the spoken title of an element.
pub const TITLE_ATTR: &str = "data-voice-title";
/// Attribute holding a longer description of an element.
pub const DESCRIPTION_ATTR: &str = "data-voice-description";

/// Inline style properties touched by the highlight effect.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ElementStyle {
    pub box_shadow: String,
    pub transition: String,
    pub z_index: String,
}

/// Operations the assistant performs on a page node.
pub trait ElementHandle: fmt::Debug + Send + Sync {
    /// Smooth-scrolls the node to the vertical center of the viewport.
    fn scroll_into_view(&self);
    fn style(&self) -> ElementStyle;
    fn set_style(&self, style: &ElementStyle);
    fn click(&self);
    fn focus(&self);
}

/// Category tag derived from the node's tag name and attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Button,
    Link,
    Input,
    Tab,
    Modal,
    Element,
}

/// A node on the current page.
#[derive(Debug, Clone)]
pub struct PageElement {
    pub handle: Arc<dyn ElementHandle>,
    /// Lower-case tag name, e.g. `button`.
    pub tag: String,
    pub attributes: HashMap<String, String>,
    pub classes: Vec<String>,
    /// Text content of the node.
    pub text: String,
}

impl PageElement {
    pub fn new(handle: Arc<dyn ElementHandle>, tag: impl Into<String>) -> Self {
        Self {
            handle,
            tag: tag.into().to_lowercase(),
            attributes: HashMap::new(),
            classes: Vec::new(),
            text: String::new(),
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Classifies the node the way the highlight messages refer to it.
    pub fn kind(&self) -> ElementKind {
        match self.tag.as_str() {
            "button" => ElementKind::Button,
            _ if self.attr("role") == Some("button") => ElementKind::Button,
            "a" => ElementKind::Link,
            "input" | "textarea" => ElementKind::Input,
            _ if self.attr("data-bs-toggle") == Some("tab") => ElementKind::Tab,
            _ if self.has_class("modal") => ElementKind::Modal,
            _ => ElementKind::Element,
        }
    }
}

/// Gives every unannotated button and link with visible text an
/// `auto-btn-{n}` / `auto-link-{n}` identifier and uses the trimmed text as
/// its title. `n` counts all buttons (or links) on the page in order.
pub fn auto_annotate(elements: &mut [PageElement]) -> usize {
    let mut buttons = 0;
    let mut links = 0;
    let mut annotated = 0;

    for element in elements.iter_mut() {
        let prefix = match element.tag.as_str() {
            "button" => {
                buttons += 1;
                format!("auto-btn-{}", buttons - 1)
            }
            "a" => {
                links += 1;
                format!("auto-link-{}", links - 1)
            }
            _ => continue,
        };

        if element.attr(NAV_ATTR).is_some() {
            continue;
        }
        let text = element.text.trim().to_string();
        if text.is_empty() {
            continue;
        }
        element.attributes.insert(NAV_ATTR.to_string(), prefix);
        element.attributes.insert(TITLE_ATTR.to_string(), text);
        annotated += 1;
    }

    tracing::debug!(count = annotated, "auto-annotated page elements");
    annotated
}

/// One operation recorded by a [`TracedElement`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementEvent {
    Scrolled,
    Styled(ElementStyle),
    Clicked,
    Focused,
}

/// An element handle with no real node behind it. Operations are logged and
/// recorded so that callers can inspect what the assistant did.
#[derive(Debug, Default)]
pub struct TracedElement {
    name: String,
    style: Mutex<ElementStyle>,
    events: Mutex<Vec<ElementEvent>>,
}

impl TracedElement {
    pub fn new(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            ..Default::default()
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Everything done to this element so far, oldest first.
    pub fn events(&self) -> Vec<ElementEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    fn record(&self, event: ElementEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl ElementHandle for TracedElement {
    fn scroll_into_view(&self) {
        tracing::info!(element = %self.name, "scroll into view");
        self.record(ElementEvent::Scrolled);
    }

    fn style(&self) -> ElementStyle {
        self.style.lock().map(|s| s.clone()).unwrap_or_default()
    }

    fn set_style(&self, style: &ElementStyle) {
        tracing::debug!(element = %self.name, box_shadow = %style.box_shadow, "set style");
        if let Ok(mut current) = self.style.lock() {
            *current = style.clone();
        }
        self.record(ElementEvent::Styled(style.clone()));
    }

    fn click(&self) {
        tracing::info!(element = %self.name, "click");
        self.record(ElementEvent::Clicked);
    }

    fn focus(&self) {
        tracing::info!(element = %self.name, "focus");
        self.record(ElementEvent::Focused);
    }
}
