//! Keep JSON locale files in sync with a source locale
//!
//! Every target locale file is compared with the source file. Strings the
//! target lacks are machine translated and written back; strings whose
//! earlier translation failed carry a `TODO: ` marker and can be retried.
//! Existing translations are never touched.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use locale_sync::config::{ProviderConfig, SyncConfig};
//! use locale_sync::mt::OpenAiProvider;
//! use locale_sync::sync::Synchronizer;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = ProviderConfig::new(std::env::var("OPENAI_API_KEY")?);
//!     let config = SyncConfig::new("src/locales", provider.clone())
//!         .with_target_locales(["de", "fr"]);
//!
//!     let translator = Arc::new(OpenAiProvider::new(&provider)?);
//!     let report = Synchronizer::new(config, translator).run().await?;
//!     report.log_summary();
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod diff;
pub mod error;
pub mod mt;
pub mod patch;
pub mod store;
pub mod sync;
pub mod tree;


pub use config::{ProviderConfig, SyncConfig, Tier};
pub use diff::{MissingEntry, collect_failed, collect_missing, count_leaves};
pub use error::{SyncError, SyncResult};
pub use patch::{set_by_path, set_leaf};
pub use store::LocaleStore;
pub use sync::{LocaleReport, RunStatistics, SyncReport, Synchronizer};
pub use tree::{LeafPath, LocaleTree, SENTINEL_PREFIX};
