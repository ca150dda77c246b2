use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};

use crate::external::market_provider::{MarketDataProvider, MarketProviderError, SourcedChart};
use crate::models::{DataSource, MarketChart, RawSample};

/// Synthetic market data for when the upstream provider is unreachable.
/// Prices follow a random walk, volumes jitter around a base figure.
pub struct MockMarketProvider;

impl MockMarketProvider {
    fn generate(days: u32) -> MarketChart {
        let now = Utc::now();
        let len = days as usize + 1;

        let mut prices = Vec::with_capacity(len);
        let mut total_volumes = Vec::with_capacity(len);
        let mut market_caps = Vec::with_capacity(len);

        let mut price = 60_000.0_f64;
        let mut volume = 25.0e9_f64;

        for i in (0..=days as i64).rev() {
            let ts = (now - ChronoDuration::days(i)).timestamp_millis();

            price *= 1.0 + (rand::random::<f64>() - 0.5) * 0.04;
            volume *= 1.0 + (rand::random::<f64>() - 0.5) * 0.3;

            prices.push(RawSample(ts, price));
            total_volumes.push(RawSample(ts, volume));
            market_caps.push(RawSample(ts, price * 19_700_000.0));
        }

        MarketChart {
            prices,
            market_caps: Some(market_caps),
            total_volumes: Some(total_volumes),
        }
    }
}

#[async_trait]
impl MarketDataProvider for MockMarketProvider {
    async fn fetch_market_chart(
        &self,
        _coin: &str,
        _vs_currency: &str,
        days: u32,
    ) -> Result<SourcedChart, MarketProviderError> {
        Ok(SourcedChart {
            chart: Self::generate(days),
            source: DataSource::Mock,
        })
    }
}
