use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One upstream observation, a `[timestamp_ms, value]` pair on the wire.
///
/// No uniqueness constraint; several samples may fall on the same calendar
/// date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawSample(pub i64, pub f64);

impl RawSample {
    pub fn timestamp_ms(&self) -> i64 {
        self.0
    }

    pub fn value(&self) -> f64 {
        self.1
    }
}

/// The upstream `market_chart` response shape (CoinGecko).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarketChart {
    pub prices: Vec<RawSample>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_caps: Option<Vec<RawSample>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_volumes: Option<Vec<RawSample>>,
}

/// Where a served chart came from. `Mock` marks a degraded response so the
/// UI can surface a "using mock data" indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Live,
    Mock,
}

#[derive(Debug, Deserialize)]
pub struct ChartParams {
    /// Quote currency; falls back to DEFAULT_VS_CURRENCY, then "usd".
    pub vs: Option<String>,
    #[serde(default = "default_days")]
    pub days: u32,
    /// Moving-average window in days.
    #[serde(default = "default_window")]
    pub window: usize,
    /// Trailing display window: at most this many daily points are returned.
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_days() -> u32 {
    30
}

fn default_window() -> usize {
    7
}

fn default_limit() -> usize {
    60
}

/// One display-ready entry of the chart series. `date` serializes as an ISO
/// calendar-date string and is stable as a join key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub date: NaiveDate,
    pub price: f64,
    pub pct_change: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sma: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
}

/// One slice of the volume-distribution view (the last few daily volumes).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeSlice {
    pub date: NaiveDate,
    pub volume: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartResponse {
    pub coin: String,
    pub vs_currency: String,
    pub days: u32,
    pub source: DataSource,
    pub series: Vec<ChartPoint>,
    pub volume_distribution: Vec<VolumeSlice>,
}
