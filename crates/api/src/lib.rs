pub mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use common::{QuoteSource, Result, TrainingConfig, Variant};
use strategy::SignalRegistry;

use routes::{ModelState, StrategyState};

/// What a process forecasts with. Each variant carries only its own inputs.
#[derive(Clone)]
pub enum Forecaster {
    /// Retrain a classifier per request with these hyper-parameters.
    Model(TrainingConfig),
    /// Vote with these indicator rules.
    Strategy(Arc<SignalRegistry>),
}

impl Forecaster {
    pub fn variant(&self) -> Variant {
        match self {
            Forecaster::Model(_) => Variant::Model,
            Forecaster::Strategy(_) => Variant::Strategy,
        }
    }
}

/// Everything a forecaster process serves from.
#[derive(Clone)]
pub struct AppState {
    pub quotes: Arc<dyn QuoteSource>,
    pub forecaster: Forecaster,
}

/// Routes for the state's variant: `/predict` plus `/healthz`.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_headers(Any)
        .allow_methods(Any);

    let variant = state.forecaster.variant();
    let predict = match state.forecaster {
        Forecaster::Model(training) => routes::model_router(ModelState {
            quotes: state.quotes,
            training,
        }),
        Forecaster::Strategy(signals) => routes::strategy_router(StrategyState {
            quotes: state.quotes,
            signals,
        }),
    };

    Router::new()
        .merge(predict)
        .merge(routes::health_router(variant))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Bind `0.0.0.0:port` and serve until the process exits.
pub async fn serve(state: AppState, port: u16) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let variant = state.forecaster.variant();
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, %variant, "Forex forecaster listening on http://{addr}/predict");
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forecaster_reports_its_variant() {
        let model = Forecaster::Model(TrainingConfig::default());
        assert_eq!(model.variant(), Variant::Model);
        let strategy = Forecaster::Strategy(Arc::new(SignalRegistry::default()));
        assert_eq!(strategy.variant(), Variant::Strategy);
    }
}
