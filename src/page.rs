//! Page-driving seam for the UI under test.
//!
//! This module provides a unified interface over whatever actually drives the
//! page:
//! - a WebDriver-backed session supplied by the embedding application
//! - [`MockPage`] for tests and offline spreadsheet runs
//!
//! The engine only ever talks to [`PageDriver`]; session bootstrap, login and
//! navigation to the starting page are the caller's responsibility.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Result type for page operations
pub type PageResult<T> = Result<T, PageError>;

/// Error types for page operations
#[derive(Debug)]
pub enum PageError {
    /// No element resolved for the locator
    NotFound(String),

    /// Any other driver-side failure
    Backend(String),

    /// I/O error (fixture loading)
    Io(std::io::Error),

    /// Fixture parse error
    Fixture(serde_json::Error),
}

impl std::fmt::Display for PageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PageError::NotFound(locator) => write!(f, "element not found for locator: {}", locator),
            PageError::Backend(msg) => write!(f, "page backend error: {}", msg),
            PageError::Io(err) => write!(f, "I/O error: {}", err),
            PageError::Fixture(err) => write!(f, "fixture error: {}", err),
        }
    }
}

impl std::error::Error for PageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PageError::NotFound(_) | PageError::Backend(_) => None,
            PageError::Io(err) => Some(err),
            PageError::Fixture(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for PageError {
    fn from(err: std::io::Error) -> Self {
        PageError::Io(err)
    }
}

impl From<serde_json::Error> for PageError {
    fn from(err: serde_json::Error) -> Self {
        PageError::Fixture(err)
    }
}

/// Trait for page drivers
///
/// Implementations resolve locator expressions against the current page and
/// perform the handful of interactions the engine needs. The session behind
/// the driver is exclusively owned by one run; there is no concurrent access.
pub trait PageDriver {
    /// Resolve `locator`, clear the element's current value, then type `value`
    fn set_value(&mut self, locator: &str, value: &str) -> PageResult<()>;

    /// Resolve `locator` and click the element
    fn click(&mut self, locator: &str) -> PageResult<()>;

    /// Whether an element at `locator` is present and displayed
    fn is_visible(&mut self, locator: &str) -> PageResult<bool>;

    /// Displayed text of the element at `locator`
    fn text(&mut self, locator: &str) -> PageResult<String>;

    /// Full page reload, returning the page to its starting state
    fn reset(&mut self) -> PageResult<()>;
}

/// A scripted element on a [`MockPage`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MockElement {
    /// Current input value (mutated by set-value actions)
    #[serde(default)]
    pub value: String,

    /// Displayed text (read by the verification step)
    #[serde(default)]
    pub text: String,

    /// Whether the element is displayed
    #[serde(default = "visible_default")]
    pub visible: bool,

    /// Number of visibility polls to report hidden before becoming visible
    #[serde(default)]
    pub appears_after: u32,

    /// Number of clicks received
    #[serde(default)]
    pub clicks: u32,
}

fn visible_default() -> bool {
    true
}

impl Default for MockElement {
    fn default() -> Self {
        Self {
            value: String::new(),
            text: String::new(),
            visible: true,
            appears_after: 0,
            clicks: 0,
        }
    }
}

impl MockElement {
    /// Create a visible element with no text or value
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the displayed text
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set the current input value
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// Mark the element as present but not displayed
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Report hidden for the first `polls` visibility checks, then visible
    pub fn appears_after(mut self, polls: u32) -> Self {
        self.appears_after = polls;
        self
    }
}

/// An action a [`MockPage`] has performed, in execution order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppliedAction {
    SetValue { locator: String, value: String },
    Click { locator: String },
}

/// An in-memory page of scripted elements keyed by locator
///
/// Used by unit and integration tests, and by the CLI to run spreadsheets
/// offline against a JSON fixture. Every interaction is recorded in
/// [`journal`](MockPage::journal); [`reset`](PageDriver::reset) restores each
/// element to its initial state the way a real page reload would.
#[derive(Debug, Clone, Default)]
pub struct MockPage {
    elements: HashMap<String, MockElement>,
    initial: HashMap<String, MockElement>,
    /// Journal of applied actions (survives resets)
    pub journal: Vec<AppliedAction>,
    resets: usize,
}

impl MockPage {
    /// Create an empty page
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a scripted element
    pub fn with_element(mut self, locator: impl Into<String>, element: MockElement) -> Self {
        let locator = locator.into();
        self.initial.insert(locator.clone(), element.clone());
        self.elements.insert(locator, element);
        self
    }

    /// Load a page from a JSON fixture mapping locators to elements
    pub fn from_fixture(path: impl AsRef<Path>) -> PageResult<Self> {
        let data = std::fs::read_to_string(path)?;
        let elements: HashMap<String, MockElement> = serde_json::from_str(&data)?;
        Ok(Self {
            initial: elements.clone(),
            elements,
            journal: Vec::new(),
            resets: 0,
        })
    }

    /// Current state of the element at `locator`
    pub fn element(&self, locator: &str) -> Option<&MockElement> {
        self.elements.get(locator)
    }

    /// How many times the page has been reset
    pub fn resets(&self) -> usize {
        self.resets
    }

    fn element_mut(&mut self, locator: &str) -> PageResult<&mut MockElement> {
        self.elements
            .get_mut(locator)
            .ok_or_else(|| PageError::NotFound(locator.to_string()))
    }
}

impl PageDriver for MockPage {
    fn set_value(&mut self, locator: &str, value: &str) -> PageResult<()> {
        let element = self.element_mut(locator)?;
        element.value.clear();
        element.value.push_str(value);
        self.journal.push(AppliedAction::SetValue {
            locator: locator.to_string(),
            value: value.to_string(),
        });
        Ok(())
    }

    fn click(&mut self, locator: &str) -> PageResult<()> {
        let element = self.element_mut(locator)?;
        element.clicks += 1;
        self.journal.push(AppliedAction::Click {
            locator: locator.to_string(),
        });
        Ok(())
    }

    fn is_visible(&mut self, locator: &str) -> PageResult<bool> {
        let element = self.element_mut(locator)?;
        if element.appears_after > 0 {
            element.appears_after -= 1;
            return Ok(false);
        }
        Ok(element.visible)
    }

    fn text(&mut self, locator: &str) -> PageResult<String> {
        self.elements
            .get(locator)
            .map(|e| e.text.clone())
            .ok_or_else(|| PageError::NotFound(locator.to_string()))
    }

    fn reset(&mut self) -> PageResult<()> {
        self.elements = self.initial.clone();
        self.resets += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_value_clears_previous_value() {
        let mut page =
            MockPage::new().with_element("//input", MockElement::new().value("stale"));
        page.set_value("//input", "fresh").unwrap();
        assert_eq!(page.element("//input").unwrap().value, "fresh");
    }

    #[test]
    fn test_click_counts_and_journal_order() {
        let mut page = MockPage::new()
            .with_element("//a", MockElement::new())
            .with_element("//b", MockElement::new());
        page.click("//a").unwrap();
        page.set_value("//b", "x").unwrap();
        page.click("//a").unwrap();

        assert_eq!(page.element("//a").unwrap().clicks, 2);
        assert_eq!(
            page.journal,
            vec![
                AppliedAction::Click { locator: "//a".to_string() },
                AppliedAction::SetValue { locator: "//b".to_string(), value: "x".to_string() },
                AppliedAction::Click { locator: "//a".to_string() },
            ]
        );
    }

    #[test]
    fn test_missing_element_is_not_found() {
        let mut page = MockPage::new();
        assert!(matches!(page.click("//nope"), Err(PageError::NotFound(_))));
        assert!(matches!(page.text("//nope"), Err(PageError::NotFound(_))));
        assert!(matches!(page.is_visible("//nope"), Err(PageError::NotFound(_))));
    }

    #[test]
    fn test_appears_after_counts_down_polls() {
        let mut page =
            MockPage::new().with_element("//late", MockElement::new().appears_after(2));
        assert!(!page.is_visible("//late").unwrap());
        assert!(!page.is_visible("//late").unwrap());
        assert!(page.is_visible("//late").unwrap());
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let mut page =
            MockPage::new().with_element("//input", MockElement::new().value("start"));
        page.set_value("//input", "changed").unwrap();
        page.click("//input").unwrap();
        page.reset().unwrap();

        let element = page.element("//input").unwrap();
        assert_eq!(element.value, "start");
        assert_eq!(element.clicks, 0);
        assert_eq!(page.resets(), 1);
        // The journal is an observation log; resets do not erase it
        assert_eq!(page.journal.len(), 2);
    }

    #[test]
    fn test_fixture_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.json");
        std::fs::write(
            &path,
            r#"{
                "//result": { "text": "Result: OK" },
                "//spinner": { "visible": false },
                "//toast": { "appears_after": 3 }
            }"#,
        )
        .unwrap();

        let mut page = MockPage::from_fixture(&path).unwrap();
        assert_eq!(page.text("//result").unwrap(), "Result: OK");
        assert!(!page.is_visible("//spinner").unwrap());
        assert_eq!(page.element("//toast").unwrap().appears_after, 3);
    }
}
