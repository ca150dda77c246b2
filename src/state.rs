use std::sync::Arc;

use crate::external::market_provider::MarketDataProvider;

#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn MarketDataProvider>,
}
