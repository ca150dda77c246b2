use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use coindash_backend::app;
use coindash_backend::external::coingecko::CoinGeckoProvider;
use coindash_backend::external::fallback::FallbackProvider;
use coindash_backend::external::market_provider::MarketDataProvider;
use coindash_backend::external::mock::MockMarketProvider;
use coindash_backend::external::webhook::FetchNotifier;
use coindash_backend::logging::{self, LoggingConfig};
use coindash_backend::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging FIRST
    logging::init_logging(LoggingConfig::from_env())?;

    let notifier = Arc::new(FetchNotifier::from_env());

    // Select market-data provider based on MARKET_PROVIDER env var (defaults to fallback)
    let provider_name = std::env::var("MARKET_PROVIDER")
        .unwrap_or_else(|_| "fallback".to_string());

    let provider: Arc<dyn MarketDataProvider> = match provider_name.to_lowercase().as_str() {
        "coingecko" => {
            tracing::info!("📊 Using market provider: CoinGecko only");
            Arc::new(CoinGeckoProvider::from_env(notifier))
        }
        "mock" => {
            tracing::info!("📊 Using market provider: mock data only");
            Arc::new(MockMarketProvider)
        }
        "fallback" => {
            tracing::info!("📊 Using market provider: CoinGecko with mock fallback");
            let live = Box::new(CoinGeckoProvider::from_env(notifier));
            Arc::new(FallbackProvider::new(live, Box::new(MockMarketProvider)))
        }
        other => {
            anyhow::bail!(
                "Invalid MARKET_PROVIDER: {}. Must be 'coingecko', 'mock', or 'fallback'",
                other
            );
        }
    };

    let state = AppState { provider };
    let app = app::create_app(state);

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("🚀 Coindash backend running at http://{}/", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
