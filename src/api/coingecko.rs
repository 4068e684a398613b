use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::MarketSource;
use crate::error::FetchError;
use crate::types::{Asset, Currency, HistoryPoint};

pub const DEFAULT_BASE_URL: &str = "https://api.coingecko.com/api/v3";

pub struct CoinGeckoClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct MarketChart {
    prices: Vec<(f64, f64)>,
}

impl CoinGeckoClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("pulse/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        debug!(%url, "GET");
        let resp = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status,
                body: snippet(&body),
            });
        }

        Ok(resp.text().await?)
    }
}

#[async_trait]
impl MarketSource for CoinGeckoClient {
    async fn fetch_markets(&self, currency: Currency, limit: u32) -> Result<Vec<Asset>, FetchError> {
        let url = format!(
            "{}/coins/markets?vs_currency={}&order=market_cap_desc&per_page={}&page=1&sparkline=false",
            self.base_url,
            currency.code(),
            limit
        );
        let text = self.get_text(&url).await?;
        parse_markets(&text)
    }

    async fn fetch_history(
        &self,
        asset_id: &str,
        currency: Currency,
        days: u32,
    ) -> Result<Vec<HistoryPoint>, FetchError> {
        let url = format!(
            "{}/coins/{}/market_chart?vs_currency={}&days={}&interval=daily",
            self.base_url,
            urlencoding::encode(asset_id),
            currency.code(),
            days
        );
        let text = self.get_text(&url).await?;
        parse_history(&text)
    }
}

pub(crate) fn parse_markets(text: &str) -> Result<Vec<Asset>, FetchError> {
    serde_json::from_str(text).map_err(|e| {
        FetchError::Malformed(format!("market data: {} | response: {}", e, snippet(text)))
    })
}

pub(crate) fn parse_history(text: &str) -> Result<Vec<HistoryPoint>, FetchError> {
    let chart: MarketChart = serde_json::from_str(text).map_err(|e| {
        FetchError::Malformed(format!("price history: {} | response: {}", e, snippet(text)))
    })?;

    chart
        .prices
        .into_iter()
        .map(|(ms, price)| {
            let timestamp = DateTime::<Utc>::from_timestamp_millis(ms as i64)
                .ok_or_else(|| FetchError::Malformed(format!("bad timestamp {}", ms)))?;
            Ok(HistoryPoint { timestamp, price })
        })
        .collect()
}

fn snippet(text: &str) -> String {
    text.chars().take(300).collect()
}
