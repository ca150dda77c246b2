use async_trait::async_trait;
use tracing::{info, warn};

use crate::external::market_provider::{MarketDataProvider, MarketProviderError, SourcedChart};

/// FallbackProvider serves live data when it can and mock data when it can't.
///
/// Strategy:
/// 1. Try the live provider.
/// 2. On any error, fall back to the mock provider; the chart keeps its
///    `source` tag so responses can carry a degraded-data indicator.
/// 3. If the mock somehow fails too, surface the live provider's error.
pub struct FallbackProvider {
    primary: Box<dyn MarketDataProvider>,
    mock: Box<dyn MarketDataProvider>,
}

impl FallbackProvider {
    pub fn new(primary: Box<dyn MarketDataProvider>, mock: Box<dyn MarketDataProvider>) -> Self {
        Self { primary, mock }
    }
}

#[async_trait]
impl MarketDataProvider for FallbackProvider {
    async fn fetch_market_chart(
        &self,
        coin: &str,
        vs_currency: &str,
        days: u32,
    ) -> Result<SourcedChart, MarketProviderError> {
        let primary_err = match self.primary.fetch_market_chart(coin, vs_currency, days).await {
            Ok(sourced) => {
                info!("✓ Fetched {} ({}d) from upstream provider", coin, days);
                return Ok(sourced);
            }
            Err(e) => {
                warn!(
                    "Upstream fetch failed for {}: {}. Falling back to mock data",
                    coin, e
                );
                e
            }
        };

        match self.mock.fetch_market_chart(coin, vs_currency, days).await {
            Ok(sourced) => {
                info!("⚠️ Serving mock data for {} ({}d)", coin, days);
                Ok(sourced)
            }
            Err(mock_err) => {
                warn!("Mock provider failed for {}: {}", coin, mock_err);
                Err(primary_err)
            }
        }
    }
}
