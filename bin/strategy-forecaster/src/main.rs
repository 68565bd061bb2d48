use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use common::{Config, Variant};
use feed::FinazonClient;
use strategy::{SignalRegistry, StrategyParams};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── Logging ──────────────────────────────────────────────────────────────
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // ── Config ────────────────────────────────────────────────────────────────
    let cfg = Config::from_env();
    let query = cfg.quote_query(Variant::Strategy);
    info!(
        ticker = %query.ticker,
        interval = %query.interval,
        page_size = query.page_size,
        "Strategy forecaster starting"
    );

    // ── Signal rules ──────────────────────────────────────────────────────────
    let params = match &cfg.strategy_config_path {
        Some(path) => StrategyParams::load(path)
            .with_context(|| format!("loading strategy params from {path}"))?,
        None => {
            info!("STRATEGY_CONFIG_PATH not set, using built-in indicator parameters");
            StrategyParams::default()
        }
    };
    let signals = SignalRegistry::from_params(&params);

    // ── Quote source ──────────────────────────────────────────────────────────
    let quotes = FinazonClient::new(&cfg.finazon_base_url, &cfg.finazon_api_key, query)
        .context("building quote client")?;

    // ── Server ────────────────────────────────────────────────────────────────
    let state = api::AppState {
        quotes: Arc::new(quotes),
        forecaster: api::Forecaster::Strategy(Arc::new(signals)),
    };
    api::serve(state, cfg.port).await.context("serving /predict")?;
    Ok(())
}
