//! Machine Translation trait and utilities
//!
//! This module defines the `MachineTranslator` trait for provider abstraction,
//! so the sync engine can drive different MT backends (OpenAI-compatible
//! chat models, mock) without coupling to any specific implementation.
//!
//! # Example
//!
//! ```ignore
//! use locale_sync::mt::{MachineTranslator, OpenAiProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = OpenAiProvider::new(config)?;
//!
//!     let result = provider
//!         .translate("Flash", "de", "Section: buttons, Key: flash")
//!         .await?;
//!     println!("{}", result);
//!
//!     Ok(())
//! }
//! ```

use crate::mt::error::{MtError, MtResult};
use async_trait::async_trait;

/// Generic trait for machine translation providers
///
/// Implementations handle one translation request at a time. Batching,
/// rate limiting and failure isolation are the caller's business (see
/// [`crate::mt::batch::BatchTranslator`]), so an implementation is free to
/// return an error instead of degrading gracefully.
#[async_trait]
pub trait MachineTranslator: Send + Sync {
    /// Translate a single text string into the target locale
    ///
    /// # Arguments
    ///
    /// * `text` - The source text
    /// * `target_locale` - Target language code (e.g., "de", "pt-BR")
    /// * `context` - Human-readable hint about where the text is used,
    ///   e.g. `Section: flash, Key: title`
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The translated text
    /// * `Err(MtError)` - If translation fails
    async fn translate(&self, text: &str, target_locale: &str, context: &str)
    -> MtResult<String>;

    /// Get the name of this translation provider
    ///
    /// Used for logging to identify which provider handled a run.
    fn provider_name(&self) -> &str;
}

/// English names for the locales shipped by default
const LANGUAGE_NAMES: &[(&str, &str)] = &[
    ("de", "German"),
    ("es", "Spanish"),
    ("fr", "French"),
    ("it", "Italian"),
    ("ja", "Japanese"),
    ("ko", "Korean"),
    ("nl", "Dutch"),
    ("pl", "Polish"),
    ("pt", "Portuguese"),
    ("ru", "Russian"),
    ("sl", "Slovenian"),
    ("tr", "Turkish"),
    ("uk", "Ukrainian"),
    ("zh", "Chinese (Simplified)"),
];

/// Locale codes synced when no explicit list is configured
pub fn default_target_locales() -> Vec<String> {
    LANGUAGE_NAMES
        .iter()
        .map(|(code, _)| code.to_string())
        .collect()
}

/// English display name for a locale, used in provider prompts and logs
///
/// Region and script subtags are ignored (`pt-BR` → `Portuguese`).
/// Unknown codes are returned as given.
pub fn language_name(locale: &str) -> String {
    let base = normalize_locale(locale);
    LANGUAGE_NAMES
        .iter()
        .find(|(code, _)| *code == base)
        .map(|(_, name)| name.to_string())
        .unwrap_or_else(|| locale.to_string())
}

/// Normalize a locale code by stripping region information
///
/// - `en-US` → `en`
/// - `zh-Hans` → `zh`
/// - `pt_BR` → `pt`
pub fn normalize_locale(locale: &str) -> String {
    locale
        .split(['-', '_'])
        .next()
        .unwrap_or(locale)
        .to_lowercase()
}

/// Validate that a locale code is in acceptable format
///
/// Checks that the locale code contains only alphanumeric characters,
/// hyphens, and underscores (following ISO 639 conventions). Locale codes
/// double as file names, so anything else is rejected.
pub fn validate_locale(locale: &str) -> MtResult<()> {
    if locale.is_empty() {
        return Err(MtError::InvalidLocale("Locale code is empty".to_string()));
    }

    if !locale
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(MtError::InvalidLocale(format!(
            "Invalid characters in locale code: {}",
            locale
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_locale_with_region() {
        assert_eq!(normalize_locale("en-US"), "en");
        assert_eq!(normalize_locale("pt_BR"), "pt");
        assert_eq!(normalize_locale("zh-Hans"), "zh");
    }

    #[test]
    fn test_normalize_locale_case_insensitive() {
        assert_eq!(normalize_locale("EN"), "en");
        assert_eq!(normalize_locale("DE-AT"), "de");
    }

    #[test]
    fn test_language_name_known_codes() {
        assert_eq!(language_name("de"), "German");
        assert_eq!(language_name("zh"), "Chinese (Simplified)");
        assert_eq!(language_name("pt-BR"), "Portuguese");
    }

    #[test]
    fn test_language_name_unknown_code_falls_back() {
        assert_eq!(language_name("eo"), "eo");
    }

    #[test]
    fn test_default_target_locales() {
        let locales = default_target_locales();
        assert_eq!(locales.len(), 14);
        assert_eq!(locales.first().map(String::as_str), Some("de"));
        assert!(!locales.contains(&"en".to_string()));
    }

    #[test]
    fn test_validate_locale_valid_codes() {
        assert!(validate_locale("en").is_ok());
        assert!(validate_locale("en-US").is_ok());
        assert!(validate_locale("zh_Hans").is_ok());
    }

    #[test]
    fn test_validate_locale_invalid_codes() {
        assert!(validate_locale("").is_err());
        assert!(validate_locale("../en").is_err());
        assert!(validate_locale("fr#bad").is_err());
    }

    #[test]
    fn test_validate_locale_error_messages() {
        match validate_locale("en@US") {
            Err(MtError::InvalidLocale(msg)) => {
                assert!(msg.contains("Invalid characters"));
            }
            _ => panic!("Expected InvalidLocale error"),
        }
    }
}
