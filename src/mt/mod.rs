/// Machine Translation Module
///
/// This module turns source strings into target-language strings for the
/// sync engine. It wraps an external provider behind the
/// [`MachineTranslator`] trait and adds what the provider does not give us:
/// request-rate discipline, per-item failure isolation, and placeholder
/// repair.
///
/// # Overview
///
/// 1. **MT Trait & Providers** - Generic trait with an OpenAI-compatible implementation and a mock
/// 2. **Placeholder Reconciler** - Restores `{{name}}` placeholders a model mangled or dropped
/// 3. **Batch Translator** - Sends requests in rate-limited concurrent batches, never failing as a whole
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use locale_sync::config::Tier;
/// use locale_sync::mt::{BatchTranslator, MockMode, MockTranslator, RatePolicy, TranslationRequest};
///
/// #[tokio::main]
/// async fn main() {
///     let translator = BatchTranslator::new(
///         Arc::new(MockTranslator::new(MockMode::Suffix)),
///         RatePolicy::for_model("gpt-4o-mini", Tier::Paid),
///     );
///     let outcomes = translator
///         .translate_all(&[TranslationRequest::new("Hello {{name}}", "de", "Section: , Key: hello")])
///         .await;
///     println!("{:?}", outcomes);
/// }
/// ```
pub mod batch;
pub mod data;
pub mod error;
pub mod mock;
pub mod openai;
pub mod placeholder;
pub mod translator;

pub use batch::{BatchTranslator, RatePolicy};
pub use data::{TranslationOutcome, TranslationRequest};
pub use error::{MtError, MtResult};
pub use mock::{MockCall, MockMode, MockTranslator};
pub use openai::OpenAiProvider;
pub use placeholder::{Reconciled, extract_placeholders, reconcile, reconcile_detailed};
pub use translator::{MachineTranslator, language_name};
