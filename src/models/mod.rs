mod market_chart;

pub use market_chart::{
    ChartParams, ChartPoint, ChartResponse, DataSource, MarketChart, RawSample, VolumeSlice,
};
