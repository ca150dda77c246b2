use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use axum::http::StatusCode;

use crate::external::market_provider::{MarketDataProvider, MarketProviderError, SourcedChart};
use crate::external::webhook::{FetchNotifier, FetchTrace};
use crate::models::{DataSource, MarketChart};

const DEFAULT_BASE_URL: &str = "https://api.coingecko.com/api/v3";

pub struct CoinGeckoProvider {
    client: reqwest::Client,
    base_url: String,
    notifier: Arc<FetchNotifier>,
}

impl CoinGeckoProvider {
    pub fn from_env(notifier: Arc<FetchNotifier>) -> Self {
        let base_url = std::env::var("COINGECKO_BASE")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Self {
            client: reqwest::Client::new(),
            base_url,
            notifier,
        }
    }
}

#[async_trait]
impl MarketDataProvider for CoinGeckoProvider {
    async fn fetch_market_chart(
        &self,
        coin: &str,
        vs_currency: &str,
        days: u32,
    ) -> Result<SourcedChart, MarketProviderError> {
        let url = format!("{}/coins/{}/market_chart", self.base_url, coin);
        let start = Instant::now();

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("vs_currency", vs_currency),
                ("days", &days.to_string()),
                ("interval", "daily"),
            ])
            .send()
            .await
            .map_err(|e| MarketProviderError::Network(e.to_string()))?;

        let status = resp.status().as_u16();
        self.notifier.record(FetchTrace::new(
            &url,
            coin,
            vs_currency,
            days,
            status,
            start.elapsed(),
        ));

        let http_status = resp.status();
        if http_status == StatusCode::TOO_MANY_REQUESTS {
            return Err(MarketProviderError::RateLimited);
        }
        if http_status == StatusCode::NOT_FOUND {
            return Err(MarketProviderError::NotFound(coin.to_string()));
        }
        if !http_status.is_success() {
            return Err(MarketProviderError::BadResponse(format!(
                "upstream returned {}",
                http_status
            )));
        }

        let chart: MarketChart = resp
            .json()
            .await
            .map_err(|e| MarketProviderError::Parse(e.to_string()))?;

        Ok(SourcedChart {
            chart,
            source: DataSource::Live,
        })
    }
}
