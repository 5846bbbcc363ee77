//! Rate-limited batch translation
//!
//! Providers publish per-model, per-tier request ceilings. Rather than
//! tracking a budget, requests are sent in fixed-size batches with a fixed
//! pause between batches, chosen from the model name and billing tier.
//! Free tiers (and models we know nothing about) get one request per
//! batch and a 21 second pause, which stays under ~3 requests per minute.
//!
//! Within a batch all requests run concurrently. A failing request never
//! affects its neighbours: it resolves to [`TranslationOutcome::Failed`].

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::config::Tier;
use crate::mt::data::{TranslationOutcome, TranslationRequest};
use crate::mt::placeholder::{reconcile_detailed, should_bypass_translation};
use crate::mt::translator::MachineTranslator;

/// Batch size and inter-batch delay for one provider model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatePolicy {
    pub batch_size: usize,
    pub batch_delay: Duration,
}

impl RatePolicy {
    const FREE_DELAY_MS: u64 = 21_000;

    /// Known models, matched by substring in order. Values are
    /// (paid batch size, paid delay in ms).
    const PAID_TIERS: &'static [(&'static str, usize, u64)] = &[
        ("gpt-4o-mini", 50, 300),
        ("gpt-4o", 40, 750),
        ("gpt-3.5", 100, 500),
    ];

    pub fn new(batch_size: usize, batch_delay: Duration) -> Self {
        Self {
            batch_size: batch_size.max(1),
            batch_delay,
        }
    }

    /// One request at a time, 21 seconds apart
    pub fn conservative() -> Self {
        Self::new(1, Duration::from_millis(Self::FREE_DELAY_MS))
    }

    /// Policy for `model` on `tier`. Unknown models are always conservative.
    pub fn for_model(model: &str, tier: Tier) -> Self {
        let known = Self::PAID_TIERS
            .iter()
            .find(|(pattern, _, _)| model.contains(*pattern));

        match (known, tier) {
            (Some((_, batch_size, delay_ms)), Tier::Paid) => {
                Self::new(*batch_size, Duration::from_millis(*delay_ms))
            }
            _ => Self::conservative(),
        }
    }

    /// Number of batches needed for `items` requests
    pub fn batch_count(&self, items: usize) -> usize {
        items.div_ceil(self.batch_size)
    }
}

/// Drives a [`MachineTranslator`] in rate-limited concurrent batches
#[derive(Clone)]
pub struct BatchTranslator {
    translator: Arc<dyn MachineTranslator>,
    policy: RatePolicy,
}

impl BatchTranslator {
    pub fn new(translator: Arc<dyn MachineTranslator>, policy: RatePolicy) -> Self {
        Self { translator, policy }
    }

    pub fn policy(&self) -> RatePolicy {
        self.policy
    }

    pub fn provider_name(&self) -> &str {
        self.translator.provider_name()
    }

    /// Translate every request, preserving order and length.
    ///
    /// Never fails: provider errors become [`TranslationOutcome::Failed`].
    pub async fn translate_all(&self, requests: &[TranslationRequest]) -> Vec<TranslationOutcome> {
        let total = requests.len();
        let mut outcomes = Vec::with_capacity(total);
        let batches = self.policy.batch_count(total);

        for (index, batch) in requests.chunks(self.policy.batch_size).enumerate() {
            let results = join_all(batch.iter().map(|request| self.translate_one(request))).await;
            outcomes.extend(results);

            if index + 1 < batches {
                info!("Progress: {}/{} translated...", outcomes.len(), total);
                tokio::time::sleep(self.policy.batch_delay).await;
            }
        }

        outcomes
    }

    /// Translate one request, absorbing any provider failure
    pub async fn translate_one(&self, request: &TranslationRequest) -> TranslationOutcome {
        if should_bypass_translation(&request.text) {
            debug!("Not translating '{}'", request.text);
            return TranslationOutcome::Translated(request.text.clone());
        }

        match self
            .translator
            .translate(&request.text, &request.target_locale, &request.context)
            .await
        {
            Ok(translated) => {
                let reconciled = reconcile_detailed(&request.text, &translated);
                if !reconciled.unresolved.is_empty() {
                    warn!(
                        "Placeholders {:?} missing from {} translation of \"{}\": \"{}\"",
                        reconciled.unresolved, request.target_locale, request.text, reconciled.text
                    );
                }
                TranslationOutcome::Translated(reconciled.text)
            }
            Err(err) => {
                warn!("Translation failed for \"{}\": {}", request.text, err);
                TranslationOutcome::Failed {
                    original: request.text.clone(),
                    reason: err.to_string(),
                }
            }
        }
    }
}
