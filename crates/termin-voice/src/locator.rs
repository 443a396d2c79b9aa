//! Resolves command keywords to a page route or an on-page element.

use crate::intent::normalize;
use crate::page::{ElementKind, PageElement, DESCRIPTION_ATTR, NAV_ATTR, TITLE_ATTR};

/// Points for a query keyword contained in an element's keyword set.
const EXACT_POINTS: u32 = 10;
/// Points for a query keyword overlapping an element keyword as a substring.
const PARTIAL_POINTS: u32 = 5;
/// A match must score strictly above this.
const MATCH_THRESHOLD: u32 = 5;

/// Splits `text` into unique lower-case tokens longer than two characters,
/// in order of first occurrence.
pub fn extract_keywords(text: &str) -> Vec<String> {
    let mut keywords: Vec<String> = Vec::new();
    for word in normalize(text).split_whitespace() {
        if word.chars().count() > 2 && !keywords.iter().any(|k| k == word) {
            keywords.push(word.to_string());
        }
    }
    keywords
}

/// An element reachable by voice.
#[derive(Debug, Clone)]
pub struct IndexedElement {
    pub nav_id: String,
    pub title: String,
    pub description: String,
    pub kind: ElementKind,
    pub keywords: Vec<String>,
    pub element: PageElement,
}

impl IndexedElement {
    /// Title for spoken messages and command targets.
    pub fn display_name(&self) -> &str {
        if self.title.is_empty() {
            "das Element"
        } else {
            &self.title
        }
    }

    fn score(&self, query: &[String]) -> u32 {
        query
            .iter()
            .map(|keyword| {
                if self.keywords.contains(keyword) {
                    EXACT_POINTS
                } else if self
                    .keywords
                    .iter()
                    .any(|own| own.contains(keyword.as_str()) || keyword.contains(own.as_str()))
                {
                    PARTIAL_POINTS
                } else {
                    0
                }
            })
            .sum()
    }
}

/// Searchable map of the annotated elements on the current page.
#[derive(Debug, Clone, Default)]
pub struct ElementIndex {
    entries: Vec<IndexedElement>,
}

impl ElementIndex {
    /// Indexes every element carrying a navigation id. A repeated id
    /// replaces the earlier entry but keeps its position.
    pub fn build(elements: &[PageElement]) -> Self {
        let mut index = Self::default();
        for element in elements {
            let Some(nav_id) = element.attr(NAV_ATTR) else {
                continue;
            };
            let title = element.attr(TITLE_ATTR).unwrap_or_default().to_string();
            let description = element.attr(DESCRIPTION_ATTR).unwrap_or_default().to_string();
            let keywords =
                extract_keywords(&format!("{} {} {}", title, description, element.text));

            let entry = IndexedElement {
                nav_id: nav_id.to_string(),
                title,
                description,
                kind: element.kind(),
                keywords,
                element: element.clone(),
            };

            match index.entries.iter_mut().find(|e| e.nav_id == entry.nav_id) {
                Some(existing) => *existing = entry,
                None => index.entries.push(entry),
            }
        }

        tracing::debug!(elements = index.entries.len(), "built element index");
        index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, nav_id: &str) -> Option<&IndexedElement> {
        self.entries.iter().find(|e| e.nav_id == nav_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &IndexedElement> {
        self.entries.iter()
    }

    /// Highest-scoring element for `keywords`, or `None` when nothing scores
    /// above the threshold. Earlier entries win ties.
    pub fn best_match(&self, keywords: &[String]) -> Option<&IndexedElement> {
        if keywords.is_empty() {
            return None;
        }

        let mut best: Option<(&IndexedElement, u32)> = None;
        for entry in &self.entries {
            let score = entry.score(keywords);
            if score > best.map_or(0, |(_, s)| s) {
                best = Some((entry, score));
            }
        }

        match best {
            Some((entry, score)) if score > MATCH_THRESHOLD => {
                tracing::debug!(nav_id = %entry.nav_id, score, "matched element");
                Some(entry)
            }
            _ => None,
        }
    }
}

/// Ordered keyword-to-path table for cross-page navigation.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<(String, String)>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a route. An existing key keeps its position and first path.
    pub fn insert(&mut self, key: &str, path: &str) {
        let key = normalize(key);
        if !self.routes.iter().any(|(k, _)| *k == key) {
            self.routes.push((key, path.to_string()));
        }
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// `(key, path)` pairs in lookup order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.routes.iter().map(|(k, p)| (k.as_str(), p.as_str()))
    }

    /// Resolves keywords to a path: the joined phrase as an exact key, then
    /// each keyword as an exact key, then substring containment between the
    /// phrase and a key in either direction.
    pub fn lookup(&self, keywords: &[String]) -> Option<&str> {
        if keywords.is_empty() {
            return None;
        }
        let phrase = keywords.join(" ");

        let exact = |needle: &str| {
            self.routes
                .iter()
                .find(|(key, _)| key == needle)
                .map(|(_, path)| path.as_str())
        };

        exact(phrase.as_str())
            .or_else(|| keywords.iter().find_map(|k| exact(k.as_str())))
            .or_else(|| {
                self.routes
                    .iter()
                    .find(|(key, _)| phrase.contains(key.as_str()) || key.contains(phrase.as_str()))
                    .map(|(_, path)| path.as_str())
            })
    }

    /// The TerminFinder pages in German and English.
    pub fn default_routes() -> Self {
        const ROUTES: &[(&str, &str)] = &[
            ("suche", "/patient/search"),
            ("arztsuche", "/patient/search"),
            ("search", "/patient/search"),
            ("ärzte finden", "/patient/search"),
            ("termine", "/patient/bookings"),
            ("buchungen", "/patient/bookings"),
            ("meine termine", "/patient/bookings"),
            ("bookings", "/patient/bookings"),
            ("appointments", "/patient/bookings"),
            ("my appointments", "/patient/bookings"),
            ("profil", "/patient/profile"),
            ("einstellungen", "/patient/profile"),
            ("dashboard", "/patient/dashboard"),
            ("praxis profil", "/practice/profile"),
            ("praxisprofil", "/practice/profile"),
            ("practice profile", "/practice/profile"),
            ("kalender", "/doctor/calendar"),
            ("calendar", "/doctor/calendar"),
            ("verfügbarkeiten", "/doctor/calendar"),
            ("patienten termine", "/doctor/bookings"),
            ("arzt dashboard", "/doctor/dashboard"),
            ("anmelden", "/patient/login"),
            ("login", "/patient/login"),
            ("registrieren", "/patient/register"),
            ("register", "/patient/register"),
            ("arzt login", "/doctor/login"),
            ("doctor login", "/doctor/login"),
        ];

        let mut table = Self::new();
        for (key, path) in ROUTES {
            table.insert(key, path);
        }
        table
    }
}
