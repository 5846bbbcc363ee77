//! Mock Machine Translator for testing
//!
//! This module provides a deterministic, API-free translator for testing
//! the sync pipeline without requiring API keys or network access. It is
//! also what `locale-sync --mock` runs against.
//!
//! # Example
//!
//! ```ignore
//! use locale_sync::mt::{MachineTranslator, MockTranslator, MockMode};
//!
//! #[tokio::test]
//! async fn test_translation() {
//!     let mock = MockTranslator::new(MockMode::Suffix);
//!     let result = mock.translate("hello", "fr", "").await.unwrap();
//!     assert_eq!(result, "hello_fr");
//! }
//! ```

use crate::mt::error::{MtError, MtResult};
use crate::mt::translator::MachineTranslator;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// Mock translation modes for testing different scenarios
#[derive(Debug, Clone)]
pub enum MockMode {
    /// Append locale suffix: "hello" → "hello_fr"
    /// Placeholders pass through untouched
    Suffix,

    /// Use predefined mappings for realistic translations
    /// (text, target_locale) → translation, falling back to `Suffix`
    Mappings(HashMap<(String, String), String>),

    /// Rewrite `{{name}}` as `{ name }` and append the locale suffix,
    /// the way chat models tend to mangle placeholders
    MangledPlaceholders,

    /// Fail for the listed source texts, behave like `Suffix` otherwise
    FailOn(Vec<String>),

    /// Simulate API errors for every request
    Error(String),

    /// No-op: return input unchanged
    NoOp,
}

/// One recorded `translate` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockCall {
    pub text: String,
    pub target_locale: String,
    pub context: String,
}

/// Mock translator that simulates various translation scenarios
///
/// Every call is recorded so tests can assert on what was sent.
#[derive(Debug)]
pub struct MockTranslator {
    mode: MockMode,
    /// Optional simulated network delay (in milliseconds)
    delay_ms: u64,
    calls: Mutex<Vec<MockCall>>,
}

impl MockTranslator {
    pub fn new(mode: MockMode) -> Self {
        Self::with_delay(mode, 0)
    }

    /// Create a MockTranslator where every call takes `delay_ms`
    pub fn with_delay(mode: MockMode, delay_ms: u64) -> Self {
        Self {
            mode,
            delay_ms,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// All calls received so far, in arrival order
    pub fn recorded_calls(&self) -> Vec<MockCall> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    /// Source texts received so far
    pub fn calls(&self) -> Vec<String> {
        self.recorded_calls().into_iter().map(|c| c.text).collect()
    }

    /// Context hints received so far
    pub fn contexts(&self) -> Vec<String> {
        self.recorded_calls()
            .into_iter()
            .map(|c| c.context)
            .collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|calls| calls.len()).unwrap_or_default()
    }

    fn record(&self, text: &str, target_locale: &str, context: &str) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(MockCall {
                text: text.to_string(),
                target_locale: target_locale.to_string(),
                context: context.to_string(),
            });
        }
    }

    async fn apply_delay(&self) {
        if self.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        }
    }

    /// Apply translation logic based on the mode
    fn apply_translation(&self, text: &str, target: &str) -> MtResult<String> {
        let suffixed = || format!("{}_{}", text, target);

        match &self.mode {
            MockMode::Suffix => Ok(suffixed()),
            MockMode::Mappings(map) => {
                let key = (text.to_string(), target.to_string());
                Ok(map.get(&key).cloned().unwrap_or_else(suffixed))
            }
            MockMode::MangledPlaceholders => {
                let mangled = text.replace("{{", "{ ").replace("}}", " }");
                Ok(format!("{}_{}", mangled, target))
            }
            MockMode::FailOn(texts) => {
                if texts.iter().any(|t| t == text) {
                    Err(MtError::TranslationError(format!(
                        "Simulated failure for '{}'",
                        text
                    )))
                } else {
                    Ok(suffixed())
                }
            }
            MockMode::Error(msg) => Err(MtError::TranslationError(msg.clone())),
            MockMode::NoOp => Ok(text.to_string()),
        }
    }
}

#[async_trait]
impl MachineTranslator for MockTranslator {
    async fn translate(
        &self,
        text: &str,
        target_locale: &str,
        context: &str,
    ) -> MtResult<String> {
        self.record(text, target_locale, context);
        self.apply_delay().await;
        self.apply_translation(text, target_locale)
    }

    fn provider_name(&self) -> &str {
        "Mock Translator"
    }
}
