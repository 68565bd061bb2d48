pub mod config;
pub mod error;
pub mod quotes;
pub mod types;

pub use config::{Config, QuoteQuery, TrainingConfig};
pub use error::{Error, Result};
pub use quotes::QuoteSource;
pub use types::*;
