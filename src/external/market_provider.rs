use async_trait::async_trait;
use thiserror::Error;

use crate::models::{DataSource, MarketChart};

/// A market chart together with the provider tier that produced it.
#[derive(Debug, Clone)]
pub struct SourcedChart {
    pub chart: MarketChart,
    pub source: DataSource,
}

#[derive(Debug, Error)]
pub enum MarketProviderError {
    #[error("network error: {0}")]
    Network(String),

    #[error("bad response: {0}")]
    BadResponse(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("unknown coin: {0}")]
    NotFound(String),

    #[error("rate limited")]
    RateLimited,
}

#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Fetches the raw price/volume/market-cap history for one coin over the
    /// trailing `days` days, quoted in `vs_currency`.
    async fn fetch_market_chart(
        &self,
        coin: &str,
        vs_currency: &str,
        days: u32,
    ) -> Result<SourcedChart, MarketProviderError>;
}
