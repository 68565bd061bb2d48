use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tracing::{error, info, instrument};
use uuid::Uuid;

use common::{closes, Error, QuoteSource, TrainingConfig};
use strategy::{PriceSeries, SignalRegistry};

/// Inputs of the model forecaster's `/predict`.
#[derive(Clone)]
pub struct ModelState {
    pub quotes: Arc<dyn QuoteSource>,
    pub training: TrainingConfig,
}

/// Inputs of the strategy forecaster's `/predict`.
#[derive(Clone)]
pub struct StrategyState {
    pub quotes: Arc<dyn QuoteSource>,
    pub signals: Arc<SignalRegistry>,
}

pub fn model_router(state: ModelState) -> Router {
    Router::new()
        .route("/predict", get(predict_model))
        .with_state(state)
}

pub fn strategy_router(state: StrategyState) -> Router {
    Router::new()
        .route("/predict", get(predict_strategy))
        .with_state(state)
}

// ─── Model forecaster ─────────────────────────────────────────────────────────

/// Fetch, train a fresh classifier, classify the last window.
#[instrument(skip_all, fields(request_id = %Uuid::new_v4()))]
async fn predict_model(State(state): State<ModelState>) -> Response {
    let bars = match state.quotes.fetch_bars().await {
        Ok(bars) => bars,
        Err(e) => {
            error!(error = %e, "Error fetching data from quote provider");
            return model_error("Failed to fetch forex data");
        }
    };

    let close_prices = closes(&bars);
    let training = state.training.clone();
    let outcome =
        tokio::task::spawn_blocking(move || model::train_and_predict(&close_prices, &training))
            .await
            .map_err(|e| Error::Other(format!("training task failed: {e}")))
            .and_then(|result| result);

    match outcome {
        Ok(forecast) => {
            info!(
                prediction = %forecast.direction,
                probabilities = ?forecast.probabilities,
                "Forecast ready"
            );
            Json(json!({
                "status": "success",
                "prediction": forecast.direction,
            }))
            .into_response()
        }
        Err(e) => {
            error!(error = %e, bars = bars.len(), "Model forecast failed");
            model_error(&e.to_string())
        }
    }
}

fn model_error(message: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "status": "error", "message": message })),
    )
        .into_response()
}

// ─── Strategy forecaster ──────────────────────────────────────────────────────

/// Fetch, run the indicator votes, return the majority.
#[instrument(skip_all, fields(request_id = %Uuid::new_v4()))]
async fn predict_strategy(State(state): State<StrategyState>) -> Response {
    let bars = match state.quotes.fetch_bars().await {
        Ok(bars) => bars,
        Err(e) => {
            error!(error = %e, "Error fetching data from quote provider");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Error fetching forex data").into_response();
        }
    };

    let series = PriceSeries::from_bars(&bars);
    let prediction = state.signals.forecast(&series);
    info!(%prediction, bars = bars.len(), "Forecast ready");

    Json(json!({ "prediction": prediction })).into_response()
}
