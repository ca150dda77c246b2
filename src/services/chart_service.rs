use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::info;

use crate::errors::AppError;
use crate::external::market_provider::MarketDataProvider;
use crate::models::{ChartParams, ChartPoint, ChartResponse, VolumeSlice};
use crate::services::transform;

/// How many trailing daily volumes feed the volume-distribution view.
const VOLUME_DISTRIBUTION_DAYS: usize = 7;

/// Fetches a coin's market chart and runs it through the transformation
/// pipeline: daily aggregation, day-over-day change, trailing moving
/// average, display-window trim. Daily volumes are joined into the series by
/// calendar-date key; dates without a volume stay absent.
pub async fn get_chart(
    provider: &dyn MarketDataProvider,
    coin: &str,
    params: &ChartParams,
) -> Result<ChartResponse, AppError> {
    if coin.trim().is_empty() {
        return Err(AppError::Validation("coin must not be empty".to_string()));
    }
    if params.days == 0 {
        return Err(AppError::Validation("days must be >= 1".to_string()));
    }
    if params.window == 0 {
        return Err(AppError::Validation("window must be >= 1".to_string()));
    }

    let vs_currency = params
        .vs
        .clone()
        .or_else(|| std::env::var("DEFAULT_VS_CURRENCY").ok())
        .unwrap_or_else(|| "usd".to_string());

    let sourced = provider
        .fetch_market_chart(coin, &vs_currency, params.days)
        .await?;

    let daily = transform::to_daily(&sourced.chart.prices);
    let changed = transform::with_pct_change(&daily);
    let smoothed = transform::with_sma(&changed, params.window);
    let trimmed = transform::last_n(&smoothed, params.limit);

    let volume_daily = sourced
        .chart
        .total_volumes
        .as_deref()
        .map(transform::to_daily)
        .unwrap_or_default();
    let volume_by_date: HashMap<NaiveDate, f64> = volume_daily
        .iter()
        .map(|point| (point.date, point.value))
        .collect();

    let series: Vec<ChartPoint> = trimmed
        .into_iter()
        .map(|point| ChartPoint {
            date: point.date,
            price: point.value,
            pct_change: point.pct_change,
            sma: point.average,
            volume: volume_by_date.get(&point.date).copied(),
        })
        .collect();

    let volume_distribution: Vec<VolumeSlice> =
        transform::last_n(&volume_daily, VOLUME_DISTRIBUTION_DAYS)
            .into_iter()
            .map(|point| VolumeSlice {
                date: point.date,
                volume: point.value,
            })
            .collect();

    info!(
        "Built chart for {} ({}): {} points, source {:?}",
        coin,
        vs_currency,
        series.len(),
        sourced.source
    );

    Ok(ChartResponse {
        coin: coin.to_string(),
        vs_currency,
        days: params.days,
        source: sourced.source,
        series,
        volume_distribution,
    })
}
