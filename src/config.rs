//! Run configuration
//!
//! Everything a sync run depends on is collected once into a [`SyncConfig`]
//! (normally by the CLI, from flags and environment variables) and passed
//! down explicitly. Nothing below this module reads the environment.

use std::fmt;
use std::path::PathBuf;

use crate::error::{SyncError, SyncResult};
use crate::mt::translator::{default_target_locales, validate_locale};

pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_SOURCE_LOCALE: &str = "en";

/// Provider billing tier. Decides how aggressively requests are batched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Tier {
    #[default]
    Free,
    Paid,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Free => write!(f, "free"),
            Tier::Paid => write!(f, "paid"),
        }
    }
}

/// Connection settings for the translation provider
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Base URL of an OpenAI-compatible API, without a trailing slash
    pub endpoint: String,
    pub model: String,
    pub api_key: String,
    pub tier: Tier,
    /// Short description of the product being localized, added to the prompt
    pub app_description: Option<String>,
}

impl ProviderConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: api_key.into(),
            tier: Tier::Free,
            app_description: None,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_tier(mut self, tier: Tier) -> Self {
        self.tier = tier;
        self
    }

    pub fn with_app_description(mut self, description: impl Into<String>) -> Self {
        self.app_description = Some(description.into());
        self
    }

    /// Check that a real provider can be built from these settings
    pub fn validate(&self) -> SyncResult<()> {
        if self.api_key.trim().is_empty() {
            return Err(SyncError::Config(
                "OPENAI_API_KEY is not set. Set it with: export OPENAI_API_KEY=your-key-here"
                    .to_string(),
            ));
        }
        if self.model.trim().is_empty() {
            return Err(SyncError::Config("Model name cannot be empty".to_string()));
        }
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(SyncError::Config(format!(
                "Provider endpoint must be an http(s) URL, got '{}'",
                self.endpoint
            )));
        }
        Ok(())
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("api_key", &"***")
            .field("tier", &self.tier)
            .field("app_description", &self.app_description)
            .finish()
    }
}

/// Immutable settings for one sync run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Directory holding `<locale>.json` files
    pub locales_dir: PathBuf,
    /// Locale whose file is the source of truth
    pub source_locale: String,
    /// Locales to bring in line with the source, processed in this order
    pub target_locales: Vec<String>,
    /// Also re-translate leaves carrying the failure marker
    pub retry_failed: bool,
    /// Report what would change without calling the provider or writing files
    pub dry_run: bool,
    pub provider: ProviderConfig,
}

impl SyncConfig {
    pub fn new(locales_dir: impl Into<PathBuf>, provider: ProviderConfig) -> Self {
        Self {
            locales_dir: locales_dir.into(),
            source_locale: DEFAULT_SOURCE_LOCALE.to_string(),
            target_locales: default_target_locales(),
            retry_failed: false,
            dry_run: false,
            provider,
        }
    }

    pub fn with_source_locale(mut self, locale: impl Into<String>) -> Self {
        self.source_locale = locale.into();
        self
    }

    pub fn with_target_locales<I, S>(mut self, locales: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.target_locales = locales.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_retry_failed(mut self, retry_failed: bool) -> Self {
        self.retry_failed = retry_failed;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Check locale codes. Provider settings are checked separately, since
    /// a mock provider needs none of them.
    pub fn validate(&self) -> SyncResult<()> {
        validate_locale(&self.source_locale)
            .map_err(|e| SyncError::Config(format!("Source locale: {}", e)))?;

        if self.target_locales.is_empty() {
            return Err(SyncError::Config(
                "At least one target locale is required".to_string(),
            ));
        }

        for locale in &self.target_locales {
            validate_locale(locale)
                .map_err(|e| SyncError::Config(format!("Target locale: {}", e)))?;
            if *locale == self.source_locale {
                return Err(SyncError::Config(format!(
                    "Target locale '{}' is the source locale",
                    locale
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SyncConfig {
        SyncConfig::new("locales", ProviderConfig::new("sk-test"))
    }

    #[test]
    fn test_defaults() {
        let config = config();
        assert_eq!(config.source_locale, "en");
        assert_eq!(config.target_locales.len(), 14);
        assert!(!config.retry_failed);
        assert!(!config.dry_run);
        assert_eq!(config.provider.model, "gpt-4o-mini");
        assert_eq!(config.provider.endpoint, "https://api.openai.com/v1");
        assert_eq!(config.provider.tier, Tier::Free);
        assert!(config.validate().is_ok());
        assert!(config.provider.validate().is_ok());
    }

    #[test]
    fn test_missing_api_key_is_config_error() {
        let provider = ProviderConfig::new("   ");
        match provider.validate() {
            Err(SyncError::Config(msg)) => assert!(msg.contains("OPENAI_API_KEY")),
            other => panic!("Expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn test_endpoint_must_be_http() {
        let provider = ProviderConfig::new("sk").with_endpoint("ftp://example.com");
        assert!(provider.validate().is_err());
    }

    #[test]
    fn test_endpoint_trailing_slash_trimmed() {
        let provider = ProviderConfig::new("sk").with_endpoint("http://localhost:8080/v1/");
        assert_eq!(provider.endpoint, "http://localhost:8080/v1");
    }

    #[test]
    fn test_empty_target_list_rejected() {
        let config = config().with_target_locales(Vec::<String>::new());
        assert!(matches!(config.validate(), Err(SyncError::Config(_))));
    }

    #[test]
    fn test_invalid_target_locale_rejected() {
        let config = config().with_target_locales(["de", "../etc/passwd"]);
        assert!(matches!(config.validate(), Err(SyncError::Config(_))));
    }

    #[test]
    fn test_source_locale_as_target_rejected() {
        let config = config().with_target_locales(["de", "en"]);
        match config.validate() {
            Err(SyncError::Config(msg)) => assert!(msg.contains("source locale")),
            other => panic!("Expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn test_debug_masks_api_key() {
        let debug_str = format!("{:?}", ProviderConfig::new("sk-secret"));
        assert!(debug_str.contains("***"));
        assert!(!debug_str.contains("sk-secret"));
    }

    #[test]
    fn test_tier_display() {
        assert_eq!(Tier::Paid.to_string(), "paid");
        assert_eq!(Tier::default().to_string(), "free");
    }
}
