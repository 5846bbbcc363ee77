//! OpenAI-compatible chat completions provider
//!
//! Sends one chat completion per text to `{endpoint}/chat/completions`.
//! Any server that speaks the OpenAI chat API (OpenAI itself, Azure
//! deployments behind a proxy, local llama.cpp / vLLM servers) can be used
//! by pointing the endpoint at it.
//!
//! # Authentication
//!
//! The API key is sent as a bearer token. The CLI reads it from
//! `OPENAI_API_KEY`.
//!
//! # Example
//!
//! ```ignore
//! use locale_sync::config::ProviderConfig;
//! use locale_sync::mt::{MachineTranslator, OpenAiProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = OpenAiProvider::new(&ProviderConfig::new("sk-..."))?;
//!     let result = provider.translate("Flash", "de", "Section: buttons, Key: flash").await?;
//!     println!("{}", result);
//!     Ok(())
//! }
//! ```

use crate::config::ProviderConfig;
use crate::mt::error::{MtError, MtResult};
use crate::mt::translator::{MachineTranslator, language_name, validate_locale};
use async_trait::async_trait;
use serde_json::json;

/// Chat completions translation provider
#[derive(Clone)]
pub struct OpenAiProvider {
    /// API key for authentication
    api_key: String,
    /// HTTP client for async requests
    client: reqwest::Client,
    /// Base URL, e.g. `https://api.openai.com/v1`
    base_url: String,
    model: String,
    app_description: Option<String>,
}

impl OpenAiProvider {
    /// Sampling temperature. Low, since UI strings want consistency.
    const TEMPERATURE: f64 = 0.3;

    /// Upper bound on completion length; UI strings are short
    const MAX_TOKENS: u32 = 500;

    /// Create a provider from connection settings
    ///
    /// # Returns
    ///
    /// * `Ok(Self)` - New provider instance
    /// * `Err(MtError)` - If the API key is empty or HTTP client creation fails
    pub fn new(config: &ProviderConfig) -> MtResult<Self> {
        if config.api_key.trim().is_empty() {
            return Err(MtError::ConfigError("API key cannot be empty".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .map_err(|e| MtError::NetworkError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_key: config.api_key.clone(),
            client,
            base_url: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            app_description: config.app_description.clone(),
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Instructions sent as the system message
    fn system_prompt(&self, target_locale: &str, context: &str) -> String {
        let mut prompt = String::from("You are a professional translator for a software application");
        if let Some(description) = &self.app_description {
            prompt.push_str(&format!(" ({})", description));
        }
        prompt.push_str(".\n\n");
        prompt.push_str(&format!(
            "Translate the given text to {}.\n\n",
            language_name(target_locale)
        ));
        prompt.push_str(
            "Important rules:\n\
             1. Keep technical terms in English when appropriate (e.g., \"SD card\", \"USB\", \"Flash\")\n\
             2. Preserve ALL placeholders exactly as they appear (e.g., {{count}}, {{boardName}}, {{step}})\n\
             3. Use natural, concise UI text appropriate for buttons and labels\n\
             4. Maintain formal but friendly tone\n\
             5. For plural forms (keys ending in _one or _other), translate appropriately for the grammatical number\n\
             6. Keep keyboard shortcuts and hotkeys in English\n\
             7. Only return the translated text, no explanations\n",
        );
        if !context.is_empty() {
            prompt.push_str(&format!("\nContext: {}", context));
        }
        prompt
    }

    fn request_body(&self, text: &str, target_locale: &str, context: &str) -> serde_json::Value {
        json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": self.system_prompt(target_locale, context) },
                { "role": "user", "content": text }
            ],
            "temperature": Self::TEMPERATURE,
            "max_tokens": Self::MAX_TOKENS
        })
    }

    /// Pull the completion text out of a chat completions response
    fn extract_content(json: &serde_json::Value) -> MtResult<String> {
        json["choices"][0]["message"]["content"]
            .as_str()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                MtError::TranslationError(
                    "Invalid API response: missing 'choices[0].message.content'".to_string(),
                )
            })
    }
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

#[async_trait]
impl MachineTranslator for OpenAiProvider {
    async fn translate(
        &self,
        text: &str,
        target_locale: &str,
        context: &str,
    ) -> MtResult<String> {
        validate_locale(target_locale)?;

        if text.is_empty() {
            return Ok(String::new());
        }

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&self.request_body(text, target_locale, context))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            return Err(if status.as_u16() == 401 || status.as_u16() == 403 {
                MtError::ConfigError(format!("API rejected credentials ({}): {}", status, error_text))
            } else {
                MtError::TranslationError(format!("API error ({}): {}", status, error_text))
            });
        }

        let json: serde_json::Value = response.json().await.map_err(|e| {
            MtError::TranslationError(format!("Failed to parse API response: {}", e))
        })?;

        Self::extract_content(&json)
    }

    fn provider_name(&self) -> &str {
        "OpenAI"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> OpenAiProvider {
        OpenAiProvider::new(&ProviderConfig::new("test-api-key")).unwrap()
    }

    // ========== Initialization Tests ==========

    #[test]
    fn test_new_with_valid_key() {
        let provider = provider();
        assert_eq!(provider.provider_name(), "OpenAI");
        assert_eq!(provider.model, "gpt-4o-mini");
    }

    #[test]
    fn test_new_with_empty_key() {
        match OpenAiProvider::new(&ProviderConfig::new("  ")) {
            Err(MtError::ConfigError(msg)) => assert!(msg.contains("empty")),
            other => panic!("Expected ConfigError, got {:?}", other),
        }
    }

    #[test]
    fn test_completions_url() {
        let config = ProviderConfig::new("k").with_endpoint("http://localhost:8000/v1/");
        let provider = OpenAiProvider::new(&config).unwrap();
        assert_eq!(
            provider.completions_url(),
            "http://localhost:8000/v1/chat/completions"
        );
    }

    // ========== Request Tests ==========

    #[test]
    fn test_request_body_shape() {
        let body = provider().request_body("Flash", "de", "Section: buttons, Key: flash");
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["temperature"], 0.3);
        assert_eq!(body["max_tokens"], 500);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "Flash");
    }

    #[test]
    fn test_system_prompt_names_language_and_context() {
        let prompt = provider().system_prompt("ja", "Section: modal, Key: title");
        assert!(prompt.contains("Translate the given text to Japanese."));
        assert!(prompt.contains("{{count}}"));
        assert!(prompt.ends_with("Context: Section: modal, Key: title"));
    }

    #[test]
    fn test_system_prompt_without_context() {
        let prompt = provider().system_prompt("de", "");
        assert!(!prompt.contains("Context:"));
    }

    #[test]
    fn test_system_prompt_includes_app_description() {
        let config = ProviderConfig::new("k").with_app_description("a disk imaging tool");
        let prompt = OpenAiProvider::new(&config)
            .unwrap()
            .system_prompt("fr", "");
        assert!(prompt.contains("(a disk imaging tool)"));
    }

    // ========== Response Tests ==========

    #[test]
    fn test_extract_content() {
        let json = serde_json::json!({
            "choices": [{ "message": { "role": "assistant", "content": " Blinken \n" } }]
        });
        assert_eq!(OpenAiProvider::extract_content(&json).unwrap(), "Blinken");
    }

    #[test]
    fn test_extract_content_malformed() {
        for json in [
            serde_json::json!({}),
            serde_json::json!({ "choices": [] }),
            serde_json::json!({ "choices": [{ "message": { "content": null } }] }),
            serde_json::json!({ "choices": [{ "message": { "content": "  " } }] }),
        ] {
            match OpenAiProvider::extract_content(&json) {
                Err(MtError::TranslationError(msg)) => assert!(msg.contains("choices")),
                other => panic!("Expected TranslationError, got {:?}", other),
            }
        }
    }

    // ========== Validation Tests ==========

    #[tokio::test]
    async fn test_translate_empty_text() {
        let result = provider().translate("", "fr", "").await.unwrap();
        assert_eq!(result, "");
    }

    #[tokio::test]
    async fn test_translate_invalid_target_locale() {
        let result = provider().translate("hello", "invalid#code", "").await;
        assert!(matches!(result, Err(MtError::InvalidLocale(_))));
    }

    #[test]
    fn test_debug_output() {
        let debug_str = format!("{:?}", provider());
        assert!(debug_str.contains("***"));
        assert!(!debug_str.contains("test-api-key"));
    }

    // ========== Integration Tests (require real API key) ==========

    #[tokio::test]
    #[ignore] // Run with: cargo test --ignored
    async fn test_real_api_single_translation() {
        let Ok(api_key) = std::env::var("OPENAI_API_KEY") else {
            eprintln!("Skipping: OPENAI_API_KEY not set");
            return;
        };

        let provider = OpenAiProvider::new(&ProviderConfig::new(api_key)).unwrap();
        let result = provider
            .translate("Hello {{name}}", "fr", "Section: greeting, Key: hello")
            .await
            .unwrap();
        println!("Translation: Hello {{{{name}}}} → {}", result);

        assert!(!result.is_empty());
    }
}
