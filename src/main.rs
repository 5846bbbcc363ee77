use clap::builder::FalseyValueParser;
use clap::{Arg, ArgAction, Command};
use locale_sync::config::{
    DEFAULT_ENDPOINT, DEFAULT_MODEL, DEFAULT_SOURCE_LOCALE, ProviderConfig, SyncConfig, Tier,
};
use locale_sync::mt::{MachineTranslator, MockMode, MockTranslator, OpenAiProvider, RatePolicy};
use locale_sync::store::LocaleStore;
use locale_sync::sync::Synchronizer;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("locale-sync")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Sync locale JSON files with the source locale, machine translating missing keys")
        .arg(
            Arg::new("locales-dir")
                .long("locales-dir")
                .short('d')
                .env("LOCALES_DIR")
                .help("Directory containing <locale>.json files")
                .default_value("src/locales"),
        )
        .arg(
            Arg::new("source-locale")
                .long("source")
                .short('s')
                .help("Source of truth locale (default: en)")
                .default_value(DEFAULT_SOURCE_LOCALE),
        )
        .arg(
            Arg::new("languages")
                .long("languages")
                .short('l')
                .help("Comma-separated target locales (default: the built-in list)")
                .value_delimiter(',')
                .conflicts_with("discover"),
        )
        .arg(
            Arg::new("discover")
                .long("discover")
                .help("Sync every <locale>.json found in the locales directory")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("retry-failed")
                .long("retry-failed")
                .short('r')
                .env("RETRY_FAILED")
                .help("Re-translate values previously marked with \"TODO: \"")
                .action(ArgAction::SetTrue)
                .value_parser(FalseyValueParser::new()),
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .short('n')
                .help("Report missing keys without translating or writing anything")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("mock")
                .long("mock")
                .short('m')
                .help("Use mock translator instead of the OpenAI API")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("api-key")
                .long("api-key")
                .env("OPENAI_API_KEY")
                .hide_env_values(true)
                .help("API key for the translation provider"),
        )
        .arg(
            Arg::new("model")
                .long("model")
                .env("OPENAI_MODEL")
                .help("Chat model used for translation")
                .default_value(DEFAULT_MODEL),
        )
        .arg(
            Arg::new("endpoint")
                .long("endpoint")
                .env("OPENAI_API")
                .help("Base URL of an OpenAI-compatible API")
                .default_value(DEFAULT_ENDPOINT),
        )
        .arg(
            Arg::new("tier")
                .long("tier")
                .env("OPENAI_TIER")
                .help("Provider billing tier; decides batch size and delay")
                .value_parser(clap::value_parser!(Tier))
                .ignore_case(true)
                .default_value("free"),
        )
        .arg(
            Arg::new("app-description")
                .long("app-description")
                .env("LOCALE_SYNC_APP_DESCRIPTION")
                .help("Short description of the application, given to the model as context"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Show debug output")
                .action(ArgAction::SetTrue),
        )
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = cli().get_matches();

    let default_level = if matches.get_flag("verbose") {
        "debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    let get = |id: &str| matches.get_one::<String>(id).cloned().unwrap_or_default();

    let mut provider = ProviderConfig::new(get("api-key"))
        .with_endpoint(get("endpoint"))
        .with_model(get("model"))
        .with_tier(matches.get_one::<Tier>("tier").copied().unwrap_or_default());
    if let Some(description) = matches.get_one::<String>("app-description") {
        provider = provider.with_app_description(description.clone());
    }

    let use_mock = matches.get_flag("mock");
    let dry_run = matches.get_flag("dry-run");
    if !use_mock && !dry_run {
        if let Err(e) = provider.validate() {
            error!("{}", e);
            return Err(e.into());
        }
    }

    let source_locale = get("source-locale");
    let locales_dir = get("locales-dir");
    let mut config = SyncConfig::new(&locales_dir, provider.clone())
        .with_source_locale(&source_locale)
        .with_retry_failed(matches.get_flag("retry-failed"))
        .with_dry_run(dry_run);

    if let Some(languages) = matches.get_many::<String>("languages") {
        config = config.with_target_locales(languages.cloned());
    } else if matches.get_flag("discover") {
        let locales = LocaleStore::new(&locales_dir).discover_locales()?;
        config =
            config.with_target_locales(locales.into_iter().filter(|l| *l != source_locale));
    }

    let synchronizer = if use_mock || dry_run {
        if use_mock {
            info!("Using mock translator");
        }
        let translator: Arc<dyn MachineTranslator> =
            Arc::new(MockTranslator::new(MockMode::Suffix));
        Synchronizer::with_policy(config, translator, RatePolicy::new(50, Duration::ZERO))
    } else {
        info!("Using OpenAI API: {}", provider.endpoint);
        info!("Model: {}", provider.model);
        let translator: Arc<dyn MachineTranslator> = Arc::new(OpenAiProvider::new(&provider)?);
        Synchronizer::new(config, translator)
    };

    let report = match synchronizer.run().await {
        Ok(report) => report,
        Err(e) => {
            error!("{}", e);
            return Err(e.into());
        }
    };

    if dry_run {
        let pending: usize = report.locales.iter().map(|r| r.pending()).sum();
        info!("Dry run complete: {} keys pending", pending);
    } else {
        report.log_summary();
    }

    // Item-level failures are reported in the summary and as markers in the
    // files; they never make the process fail.
    Ok(())
}
