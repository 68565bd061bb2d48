use async_trait::async_trait;

use crate::{Bar, Result};

/// Abstraction over the upstream quote provider.
///
/// `FinazonClient` implements this against the real API. Tests substitute
/// in-memory sources. The query (ticker, interval, page size) is fixed when
/// the source is built, so a call takes no arguments.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Fetch the configured bar history, oldest first.
    async fn fetch_bars(&self) -> Result<Vec<Bar>>;
}
