use async_trait::async_trait;
use chrono::DateTime;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use common::{Bar, Error, QuoteQuery, QuoteSource, Result};

const TIME_SERIES_PATH: &str = "finazon/forex/time_series";

/// REST client for the Finazon time-series endpoint.
///
/// Every call performs exactly one GET with the query fixed at construction.
/// There is no retry and no timeout beyond what the transport imposes.
pub struct FinazonClient {
    base_url: String,
    api_key: String,
    query: QuoteQuery,
    http: Client,
}

impl FinazonClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        query: QuoteQuery,
    ) -> Result<Self> {
        let http = Client::builder()
            .use_rustls_tls()
            .build()
            .map_err(|e| Error::Http(e.to_string()))?;
        Ok(Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            query,
            http,
        })
    }

    /// Full request URL including the API key.
    fn request_url(&self) -> Result<Url> {
        let base = self.base_url.trim_end_matches('/');
        let page = self.query.page.to_string();
        let page_size = self.query.page_size.to_string();
        Url::parse_with_params(
            &format!("{base}/{TIME_SERIES_PATH}"),
            [
                ("ticker", self.query.ticker.as_str()),
                ("interval", self.query.interval.as_str()),
                ("page", page.as_str()),
                ("page_size", page_size.as_str()),
                ("apikey", self.api_key.as_str()),
            ],
        )
        .map_err(|e| Error::Config(format!("invalid Finazon base URL '{base}': {e}")))
    }
}

#[async_trait]
impl QuoteSource for FinazonClient {
    async fn fetch_bars(&self) -> Result<Vec<Bar>> {
        let url = self.request_url()?;
        debug!(
            ticker = %self.query.ticker,
            interval = %self.query.interval,
            page_size = self.query.page_size,
            "Fetching time series from Finazon"
        );

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| Error::Http(e.to_string()))?;

        if !status.is_success() {
            return Err(Error::Provider(format!("HTTP {status}: {body}")));
        }

        let bars = parse_time_series(&body)?;
        debug!(bars = bars.len(), "Time series received");
        Ok(bars)
    }
}

/// Decode a time-series response body into oldest-first bars.
///
/// Records are sorted by `t` when every one carries it. Otherwise the
/// provider's order is kept as is.
pub fn parse_time_series(body: &str) -> Result<Vec<Bar>> {
    let resp: TimeSeriesResponse = serde_json::from_str(body)?;

    let mut bars = resp
        .data
        .into_iter()
        .map(|r| {
            let timestamp = r
                .t
                .map(|t| {
                    DateTime::from_timestamp(t, 0)
                        .ok_or_else(|| Error::Provider(format!("bar timestamp out of range: {t}")))
                })
                .transpose()?;
            Ok(Bar {
                timestamp,
                open: r.o,
                high: r.h,
                low: r.l,
                close: r.c,
                volume: r.v,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    if bars.iter().all(|b| b.timestamp.is_some()) {
        bars.sort_by_key(|b| b.timestamp);
    }
    Ok(bars)
}

// ─── Response types ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct TimeSeriesResponse {
    data: Vec<BarRecord>,
}

#[derive(Deserialize)]
struct BarRecord {
    t: Option<i64>,
    o: f64,
    h: f64,
    l: f64,
    c: f64,
    #[serde(default)]
    v: f64,
}
