//! Sync orchestration
//!
//! For each configured target locale, strictly one after another:
//!
//! 1. load the target tree
//! 2. collect missing leaves (and sentinel-marked leaves in retry mode)
//! 3. skip the locale if nothing is pending
//! 4. translate the pending leaves through the [`BatchTranslator`]
//! 5. patch the results into a clone of the target tree
//! 6. write the clone back over the file
//!
//! Locales are never processed concurrently: the batch policy is the only
//! rate budget there is, and two locales in flight would double it.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::{SyncConfig, Tier};
use crate::diff::{MissingEntry, collect_failed, collect_missing, count_leaves};
use crate::error::SyncResult;
use crate::mt::batch::{BatchTranslator, RatePolicy};
use crate::mt::data::TranslationRequest;
use crate::mt::translator::{MachineTranslator, language_name};
use crate::patch::set_leaf;
use crate::store::LocaleStore;
use crate::tree::LocaleTree;

/// Counters for one invocation, summed over all locales
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStatistics {
    /// Leaves written with a real translation
    pub translated: usize,
    /// Leaves written with the failure marker
    pub failed: usize,
    /// Previously failed leaves sent again, whatever the outcome
    pub retried: usize,
}

impl RunStatistics {
    fn add(&mut self, report: &LocaleReport) {
        self.translated += report.translated;
        self.failed += report.failed;
        self.retried += report.retried;
    }
}

/// What happened to one target locale
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocaleReport {
    pub locale: String,
    /// Leaves absent from the target
    pub missing: usize,
    /// Sentinel-marked leaves queued for another attempt
    pub retried: usize,
    pub translated: usize,
    pub failed: usize,
    /// Whether the locale file was rewritten
    pub written: bool,
}

impl LocaleReport {
    fn skipped(locale: &str) -> Self {
        Self {
            locale: locale.to_string(),
            ..Self::default()
        }
    }

    pub fn pending(&self) -> usize {
        self.missing + self.retried
    }
}

/// Result of a whole run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub locales: Vec<LocaleReport>,
    pub stats: RunStatistics,
}

impl SyncReport {
    /// True if any locale file was rewritten
    pub fn has_changes(&self) -> bool {
        self.locales.iter().any(|report| report.written)
    }

    pub fn locale(&self, locale: &str) -> Option<&LocaleReport> {
        self.locales.iter().find(|report| report.locale == locale)
    }

    /// Log the end-of-run summary
    pub fn log_summary(&self) {
        if !self.has_changes() {
            info!("All translation files are up to date!");
            return;
        }

        info!("Translation files updated successfully!");
        info!("Summary:");
        info!("  - Total translated: {} keys", self.stats.translated);
        if self.stats.retried > 0 {
            info!(
                "  - Retried: {} previously failed translations",
                self.stats.retried
            );
        }
        if self.stats.failed > 0 {
            warn!(
                "  - Total failed: {} keys (marked with \"TODO: \")",
                self.stats.failed
            );
            info!("  - Run again with --retry-failed to retry failed translations");
        }
        info!("  - Please review translations for accuracy and context");
    }
}

/// Drives a sync run over every configured target locale
pub struct Synchronizer {
    config: SyncConfig,
    store: LocaleStore,
    translator: BatchTranslator,
}

impl Synchronizer {
    /// Build a synchronizer whose rate policy follows the configured model and tier
    pub fn new(config: SyncConfig, translator: Arc<dyn MachineTranslator>) -> Self {
        let policy = RatePolicy::for_model(&config.provider.model, config.provider.tier);
        Self::with_policy(config, translator, policy)
    }

    /// Build a synchronizer with an explicit rate policy
    pub fn with_policy(
        config: SyncConfig,
        translator: Arc<dyn MachineTranslator>,
        policy: RatePolicy,
    ) -> Self {
        let store = LocaleStore::new(config.locales_dir.clone());
        Self {
            config,
            store,
            translator: BatchTranslator::new(translator, policy),
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Run the sync. Item-level translation failures do not make this fail;
    /// configuration and file errors do.
    pub async fn run(&self) -> SyncResult<SyncReport> {
        self.config.validate()?;

        info!(
            "Syncing translation files with {}.json (source of truth)",
            self.config.source_locale
        );
        info!("Provider: {}", self.translator.provider_name());
        self.log_policy();

        let source = self.store.load(&self.config.source_locale)?;
        info!("Source file has {} keys", count_leaves(&source));

        let mut report = SyncReport::default();
        for locale in &self.config.target_locales {
            let locale_report = self.sync_locale(&source, locale).await?;
            // A dry run sends nothing, so the run counters stay at zero
            if !self.config.dry_run {
                report.stats.add(&locale_report);
            }
            report.locales.push(locale_report);
        }

        Ok(report)
    }

    fn log_policy(&self) {
        let policy = self.translator.policy();
        let delay_ms = policy.batch_delay.as_millis();
        match self.config.provider.tier {
            Tier::Paid => info!(
                "Using paid tier rate limits (batch: {}, delay: {}ms)",
                policy.batch_size, delay_ms
            ),
            Tier::Free => {
                info!(
                    "Using free tier rate limits (batch: {}, delay: {}ms)",
                    policy.batch_size, delay_ms
                );
                info!("Tip: pass --tier paid (or OPENAI_TIER=paid) for much faster translations");
            }
        }
    }

    /// Entries to translate for one target: missing leaves first, then
    /// sentinel-marked leaves when retry mode is on
    pub fn pending_entries(&self, source: &LocaleTree, target: &LocaleTree) -> Vec<MissingEntry> {
        let mut entries = collect_missing(source, target);
        if self.config.retry_failed {
            let failed = collect_failed(source, target);
            if !failed.is_empty() {
                info!("  Retrying {} failed translations", failed.len());
            }
            entries.extend(failed);
        }
        entries
    }

    async fn sync_locale(&self, source: &LocaleTree, locale: &str) -> SyncResult<LocaleReport> {
        info!("Processing {} ({})...", locale, language_name(locale));

        let target = self.store.load(locale)?;
        let entries = self.pending_entries(source, &target);

        if entries.is_empty() {
            info!(
                "  {} is up to date ({} keys)",
                locale,
                count_leaves(&target)
            );
            return Ok(LocaleReport::skipped(locale));
        }

        let retried = entries.iter().filter(|entry| entry.is_retry).count();
        let mut report = LocaleReport {
            locale: locale.to_string(),
            missing: entries.len() - retried,
            retried,
            ..LocaleReport::default()
        };
        info!("  Found {} missing keys", entries.len());

        if self.config.dry_run {
            for entry in &entries {
                debug!("  pending {}: \"{}\"", entry.path, entry.value);
            }
            info!("  Dry run: {} not written", locale);
            return Ok(report);
        }

        let requests: Vec<TranslationRequest> = entries
            .iter()
            .map(|entry| TranslationRequest::new(&entry.value, locale, &entry.context))
            .collect();
        info!(
            "  Translating {} strings with {}...",
            requests.len(),
            self.translator.provider_name()
        );
        let outcomes = self.translator.translate_all(&requests).await;

        let mut updated = target.clone();
        for (entry, outcome) in entries.iter().zip(&outcomes) {
            set_leaf(&mut updated, &entry.path, outcome.persisted_value());
        }

        report.failed = outcomes.iter().filter(|o| o.is_failed()).count();
        report.translated = outcomes.len() - report.failed;

        self.store.save(locale, &updated)?;
        report.written = true;

        if report.failed > 0 {
            warn!(
                "  Updated {}: {} translated, {} failed",
                locale, report.translated, report.failed
            );
        } else {
            info!("  Updated {} with {} new keys", locale, report.translated);
        }

        Ok(report)
    }
}
