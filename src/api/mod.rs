mod coingecko;

pub use coingecko::{CoinGeckoClient, DEFAULT_BASE_URL};

use async_trait::async_trait;

use crate::error::FetchError;
use crate::types::{Asset, Currency, HistoryPoint};

/// Upstream market data provider.
#[async_trait]
pub trait MarketSource: Send + Sync {
    /// Assets ranked by descending market cap, priced in `currency`.
    async fn fetch_markets(&self, currency: Currency, limit: u32) -> Result<Vec<Asset>, FetchError>;

    /// Daily price series for one asset over the trailing `days`.
    async fn fetch_history(
        &self,
        asset_id: &str,
        currency: Currency,
        days: u32,
    ) -> Result<Vec<HistoryPoint>, FetchError>;
}
