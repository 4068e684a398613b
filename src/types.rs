use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Deserializer, Serialize};

fn f64_or_zero<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    Option::<f64>::deserialize(d).map(|v| v.unwrap_or(0.0))
}

fn string_or_empty<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Option::<String>::deserialize(d).map(|v| v.unwrap_or_default())
}

/// One row of the `/coins/markets` listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub symbol: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "f64_or_zero")]
    pub current_price: f64,
    #[serde(default, deserialize_with = "f64_or_zero")]
    pub price_change_percentage_24h: f64,
    #[serde(default, deserialize_with = "f64_or_zero")]
    pub market_cap: f64,
    #[serde(default, deserialize_with = "f64_or_zero")]
    pub total_volume: f64,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub image: String,
    pub market_cap_rank: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistoryPoint {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    #[default]
    Usd,
    Eur,
    Gbp,
    Jpy,
}

impl Currency {
    pub const ALL: [Currency; 4] = [Currency::Usd, Currency::Eur, Currency::Gbp, Currency::Jpy];

    /// Lower-case code expected by the `vs_currency` query parameter.
    pub fn code(self) -> &'static str {
        match self {
            Currency::Usd => "usd",
            Currency::Eur => "eur",
            Currency::Gbp => "gbp",
            Currency::Jpy => "jpy",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Jpy => "JPY",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Currency::Usd => "$",
            Currency::Eur => "\u{20ac}",
            Currency::Gbp => "\u{a3}",
            Currency::Jpy => "\u{a5}",
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|c| *c == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let len = Self::ALL.len();
        Self::ALL[(self.index() + len - 1) % len]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Dark,
    Light,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Dark => ThemeMode::Light,
            ThemeMode::Light => ThemeMode::Dark,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ThemeMode::Dark => "dark",
            ThemeMode::Light => "light",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_nulls_become_defaults() {
        let json = r#"{
            "id": "bitcoin",
            "symbol": "btc",
            "name": "Bitcoin",
            "current_price": null,
            "price_change_percentage_24h": null,
            "market_cap": 1000.5,
            "total_volume": null,
            "image": null,
            "market_cap_rank": 1
        }"#;
        let asset: Asset = serde_json::from_str(json).expect("asset should parse");
        assert_eq!(asset.current_price, 0.0);
        assert_eq!(asset.price_change_percentage_24h, 0.0);
        assert_eq!(asset.market_cap, 1000.5);
        assert_eq!(asset.image, "");
        assert_eq!(asset.market_cap_rank, Some(1));
    }

    #[test]
    fn test_currency_cycles_through_all() {
        let mut c = Currency::Usd;
        for _ in 0..Currency::ALL.len() {
            c = c.next();
        }
        assert_eq!(c, Currency::Usd);
        assert_eq!(Currency::Usd.prev(), Currency::Jpy);
        assert_eq!(Currency::Gbp.next(), Currency::Jpy);
    }

    #[test]
    fn test_currency_serde_uses_lowercase_codes() {
        let c: Currency = serde_json::from_str("\"eur\"").expect("currency should parse");
        assert_eq!(c, Currency::Eur);
        assert_eq!(c.code(), "eur");
        assert_eq!(c.label(), "EUR");
    }

    #[test]
    fn test_theme_toggle_round_trips() {
        assert_eq!(ThemeMode::Dark.toggled(), ThemeMode::Light);
        assert_eq!(ThemeMode::Dark.toggled().toggled(), ThemeMode::Dark);
    }
}
