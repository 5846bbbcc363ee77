//! Request and outcome types for batch translation

use crate::tree::mark_failed;

/// One text to translate, with the hint passed to the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    pub text: String,
    pub target_locale: String,
    /// e.g. `Section: flash, Key: title`
    pub context: String,
}

impl TranslationRequest {
    pub fn new(
        text: impl Into<String>,
        target_locale: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            target_locale: target_locale.into(),
            context: context.into(),
        }
    }
}

/// How a single request resolved
///
/// Failures carry the original text so the caller can persist a
/// sentinel-marked value without re-deriving it from a magic string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationOutcome {
    /// Provider output after placeholder reconciliation, or the input itself
    /// when it was not worth translating
    Translated(String),
    /// The provider call failed
    Failed { original: String, reason: String },
}

impl TranslationOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, TranslationOutcome::Failed { .. })
    }

    /// The string written to the locale file: the translation, or
    /// `TODO: <original>` for a failure
    pub fn persisted_value(&self) -> String {
        match self {
            TranslationOutcome::Translated(text) => text.clone(),
            TranslationOutcome::Failed { original, .. } => mark_failed(original),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translated_persists_as_is() {
        let outcome = TranslationOutcome::Translated("Hallo".to_string());
        assert!(!outcome.is_failed());
        assert_eq!(outcome.persisted_value(), "Hallo");
    }

    #[test]
    fn test_failed_persists_with_sentinel() {
        let outcome = TranslationOutcome::Failed {
            original: "Hello {{name}}".to_string(),
            reason: "timeout".to_string(),
        };
        assert!(outcome.is_failed());
        assert_eq!(outcome.persisted_value(), "TODO: Hello {{name}}");
    }
}
