use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use chrono::{Duration, TimeZone, Utc};
use serde_json::Value;
use tower::ServiceExt;

use api::{router, AppState, Forecaster};
use common::{Bar, Error, QuoteSource, Result, TrainingConfig, Variant};
use strategy::SignalRegistry;

/// In-memory quote source. `None` simulates a network failure.
struct FakeQuotes(Option<Vec<Bar>>);

#[async_trait]
impl QuoteSource for FakeQuotes {
    async fn fetch_bars(&self) -> Result<Vec<Bar>> {
        self.0
            .clone()
            .ok_or_else(|| Error::Http("connection refused".into()))
    }
}

fn bars_from_closes(closes: impl IntoIterator<Item = f64>) -> Vec<Bar> {
    let start = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
    closes
        .into_iter()
        .enumerate()
        .map(|(i, c)| Bar::flat(start + Duration::minutes(i as i64), c))
        .collect()
}

fn rising(n: usize) -> Vec<Bar> {
    bars_from_closes((0..n).map(|i| 1.0800 + i as f64 * 0.0001))
}

fn state(variant: Variant, bars: Option<Vec<Bar>>) -> AppState {
    let forecaster = match variant {
        Variant::Model => Forecaster::Model(TrainingConfig {
            seed: Some(11),
            ..TrainingConfig::default()
        }),
        Variant::Strategy => Forecaster::Strategy(Arc::new(SignalRegistry::default())),
    };
    AppState {
        quotes: Arc::new(FakeQuotes(bars)),
        forecaster,
    }
}

async fn get(state: AppState, uri: &str) -> (StatusCode, Vec<u8>) {
    let resp = router(state)
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

async fn get_json(state: AppState, uri: &str) -> (StatusCode, Value) {
    let (status, body) = get(state, uri).await;
    (status, serde_json::from_slice(&body).unwrap())
}

// ─── Strategy forecaster ──────────────────────────────────────────────────────

#[tokio::test]
async fn strategy_rising_market_predicts_up() {
    let app = state(Variant::Strategy, Some(rising(250)));
    let (status, body) = get_json(app, "/predict").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({ "prediction": "UP" }));
}

#[tokio::test]
async fn strategy_short_history_predicts_flat() {
    let app = state(Variant::Strategy, Some(rising(150)));
    let (status, body) = get_json(app, "/predict").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["prediction"], "FLAT");
}

#[tokio::test]
async fn strategy_fetch_failure_is_plain_text_500() {
    let (status, body) = get(state(Variant::Strategy, None), "/predict").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(String::from_utf8(body).unwrap(), "Error fetching forex data");
}

// ─── Model forecaster ─────────────────────────────────────────────────────────

#[tokio::test]
async fn model_returns_success_with_a_label() {
    let bars = bars_from_closes((0..80).map(|i| 1.08 + ((i * 5) % 7) as f64 * 0.0001));
    let (status, body) = get_json(state(Variant::Model, Some(bars)), "/predict").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    let prediction = body["prediction"].as_str().unwrap();
    assert!(["UP", "DOWN", "FLAT"].contains(&prediction), "got {prediction}");
}

#[tokio::test]
async fn model_fetch_failure_is_json_500() {
    let (status, body) = get_json(state(Variant::Model, None), "/predict").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        serde_json::json!({ "status": "error", "message": "Failed to fetch forex data" })
    );
}

#[tokio::test]
async fn model_insufficient_history_is_json_500() {
    let (status, body) = get_json(state(Variant::Model, Some(rising(4))), "/predict").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["status"], "error");
    assert!(body["message"].as_str().unwrap().contains("Insufficient data"));
}

// ─── Shared ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn healthz_reports_variant() {
    let (status, body) = get_json(state(Variant::Model, None), "/healthz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({ "status": "ok", "variant": "model" }));

    let (_, body) = get_json(state(Variant::Strategy, None), "/healthz").await;
    assert_eq!(body["variant"], "strategy");
}

#[tokio::test]
async fn unknown_route_is_404() {
    let (status, _) = get(state(Variant::Strategy, Some(rising(10))), "/forecast").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
