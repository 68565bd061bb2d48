use serde::{Deserialize, Serialize};

use crate::Variant;

const DEFAULT_BASE_URL: &str = "https://api.finazon.io/latest";

/// All configuration loaded from environment variables at startup.
/// A missing `FINAZON_API_KEY` or an unparsable value causes an immediate
/// panic with a clear message.
#[derive(Debug, Clone)]
pub struct Config {
    // Quote provider
    pub finazon_api_key: String,
    pub finazon_base_url: String,
    pub ticker: String,
    pub interval: String,
    /// `None` means "use the variant's default".
    pub page_size: Option<usize>,

    // Server
    pub port: u16,

    // Strategy params file path (optional, built-in defaults otherwise)
    pub strategy_config_path: Option<String>,

    // Model training
    pub training: TrainingConfig,
}

impl Config {
    /// Load all configuration from environment variables.
    /// Loads `.env` if present.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // ignore error if .env not present
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let required = |key: &str| {
            lookup(key).unwrap_or_else(|| {
                panic!("Required environment variable '{key}' is not set. Check your .env file.")
            })
        };

        let defaults = TrainingConfig::default();
        let training = TrainingConfig {
            epochs: parsed(&lookup, "MODEL_EPOCHS").unwrap_or(defaults.epochs),
            batch_size: parsed(&lookup, "MODEL_BATCH_SIZE").unwrap_or(defaults.batch_size),
            learning_rate: parsed(&lookup, "MODEL_LEARNING_RATE")
                .unwrap_or(defaults.learning_rate),
            seed: parsed(&lookup, "MODEL_SEED"),
        };
        if training.epochs == 0 || training.batch_size == 0 {
            panic!("MODEL_EPOCHS and MODEL_BATCH_SIZE must be greater than zero");
        }

        Config {
            finazon_api_key: required("FINAZON_API_KEY"),
            finazon_base_url: lookup("FINAZON_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            ticker: lookup("FORECAST_TICKER").unwrap_or_else(|| "EUR/USD".to_string()),
            interval: lookup("FORECAST_INTERVAL").unwrap_or_else(|| "1m".to_string()),
            page_size: parsed(&lookup, "FORECAST_PAGE_SIZE"),
            port: parsed(&lookup, "FORECAST_PORT").unwrap_or(3000),
            strategy_config_path: lookup("STRATEGY_CONFIG_PATH"),
            training,
        }
    }

    /// The fixed upstream query for the given forecaster.
    pub fn quote_query(&self, variant: Variant) -> QuoteQuery {
        QuoteQuery {
            ticker: self.ticker.clone(),
            interval: self.interval.clone(),
            page: 0,
            page_size: self
                .page_size
                .unwrap_or_else(|| variant.default_page_size()),
        }
    }
}

/// Parse an optional variable. Present-but-invalid values are fatal.
fn parsed<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Option<T> {
    lookup(key).map(|raw| {
        raw.trim().parse::<T>().unwrap_or_else(|_| {
            panic!("Environment variable '{key}' has an invalid value: '{raw}'")
        })
    })
}

/// Fixed parameters of the upstream time-series request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteQuery {
    pub ticker: String,
    pub interval: String,
    pub page: usize,
    pub page_size: usize,
}

/// Hyper-parameters for the per-request classifier fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    pub epochs: usize,
    pub batch_size: usize,
    pub learning_rate: f64,
    /// Fixed RNG seed for weight init and shuffling. `None` reseeds per request.
    pub seed: Option<u64>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            epochs: 50,
            batch_size: 8,
            learning_rate: 0.001,
            seed: None,
        }
    }
}
