use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use common::{Config, Variant};
use feed::FinazonClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── Logging ──────────────────────────────────────────────────────────────
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // ── Config ────────────────────────────────────────────────────────────────
    let cfg = Config::from_env();
    let query = cfg.quote_query(Variant::Model);
    info!(
        ticker = %query.ticker,
        interval = %query.interval,
        page_size = query.page_size,
        epochs = cfg.training.epochs,
        batch_size = cfg.training.batch_size,
        seeded = cfg.training.seed.is_some(),
        "Model forecaster starting"
    );

    // ── Quote source ──────────────────────────────────────────────────────────
    let quotes = FinazonClient::new(&cfg.finazon_base_url, &cfg.finazon_api_key, query)
        .context("building quote client")?;

    // ── Server ────────────────────────────────────────────────────────────────
    let state = api::AppState {
        quotes: Arc::new(quotes),
        forecaster: api::Forecaster::Model(cfg.training.clone()),
    };
    api::serve(state, cfg.port).await.context("serving /predict")?;
    Ok(())
}
