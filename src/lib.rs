pub mod cli;
pub mod core;
pub mod providers;

use crate::core::config::AppConfig;
use crate::core::controller::{InteractionController, Selection};
use crate::core::{ConversionEngine, CurrencyCode, RateProvider, SystemClock};
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

pub enum AppCommand {
    Convert {
        amount: String,
        from: Option<String>,
        to: Vec<String>,
    },
    Currencies,
    Interactive,
}

/// Wires the HTTP rate source, the shared rate cache and the system clock
/// into a conversion engine.
pub fn build_engine(config: &AppConfig) -> Arc<ConversionEngine> {
    let source = Arc::new(providers::ExchangeRateApiProvider::new(
        &config.provider.base_url,
    ));
    let provider = Arc::new(RateProvider::with_ttl(source, config.cache_ttl()));
    Arc::new(ConversionEngine::new(provider, Arc::new(SystemClock)))
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("fxconv starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    match command {
        AppCommand::Convert { amount, from, to } => {
            let from = from.unwrap_or_else(|| config.default_from.clone());
            let targets = if to.is_empty() {
                vec![config.default_to.clone()]
            } else {
                to
            };
            let engine = build_engine(&config);
            cli::convert::run(&engine, &amount, &from, &targets).await
        }
        AppCommand::Currencies => {
            cli::currencies::run(&config.default_from, &config.default_to);
            Ok(())
        }
        AppCommand::Interactive => {
            let selection = Selection::new(
                CurrencyCode::parse(&config.default_from),
                CurrencyCode::parse(&config.default_to),
            );
            let controller = InteractionController::new(
                build_engine(&config),
                Arc::new(cli::interactive::TerminalRenderer::default()),
                selection,
                config.debounce(),
            );
            cli::interactive::run(controller).await
        }
    }
}
