pub mod coingecko;
pub mod fallback;
pub mod market_provider;
pub mod mock;
pub mod webhook;
