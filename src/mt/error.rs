use thiserror::Error;

/// Error types for the Machine Translation module
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MtError {
    /// Provider is misconfigured (missing credential, rejected request)
    #[error("Configuration error: {0}")]
    ConfigError(String),
    /// Transport failure while talking to the provider
    #[error("Network error: {0}")]
    NetworkError(String),
    /// Provider answered, but not with a usable translation
    #[error("Translation error: {0}")]
    TranslationError(String),
    /// Locale code is empty or contains unexpected characters
    #[error("Invalid locale: {0}")]
    InvalidLocale(String),
}

impl From<reqwest::Error> for MtError {
    fn from(err: reqwest::Error) -> Self {
        MtError::NetworkError(err.to_string())
    }
}

/// Result type for MT operations
pub type MtResult<T> = Result<T, MtError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefixes() {
        assert_eq!(
            MtError::ConfigError("no key".to_string()).to_string(),
            "Configuration error: no key"
        );
        assert_eq!(
            MtError::TranslationError("empty choices".to_string()).to_string(),
            "Translation error: empty choices"
        );
        assert_eq!(
            MtError::InvalidLocale("x@y".to_string()).to_string(),
            "Invalid locale: x@y"
        );
    }
}
