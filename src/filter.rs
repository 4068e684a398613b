use crate::types::Asset;

/// True when `query` appears in the asset's name or symbol, ignoring case.
/// An empty query matches everything.
pub fn matches(asset: &Asset, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    asset.name.to_lowercase().contains(&needle) || asset.symbol.to_lowercase().contains(&needle)
}

/// Subset of `assets` matching `query`, in listing (market cap) order.
pub fn filter_assets<'a>(assets: &'a [Asset], query: &str) -> Vec<&'a Asset> {
    assets.iter().filter(|a| matches(a, query)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(id: &str, symbol: &str, name: &str) -> Asset {
        Asset {
            id: id.to_string(),
            symbol: symbol.to_string(),
            name: name.to_string(),
            current_price: 1.0,
            price_change_percentage_24h: 0.0,
            market_cap: 0.0,
            total_volume: 0.0,
            image: String::new(),
            market_cap_rank: None,
        }
    }

    fn sample() -> Vec<Asset> {
        vec![
            asset("bitcoin", "btc", "Bitcoin"),
            asset("ethereum", "eth", "Ethereum"),
            asset("tether", "usdt", "Tether"),
            asset("ethena", "ena", "Ethena"),
            asset("wrapped-bitcoin", "wbtc", "Wrapped Bitcoin"),
        ]
    }

    fn ids(v: &[&Asset]) -> Vec<String> {
        v.iter().map(|a| a.id.clone()).collect()
    }

    #[test]
    fn test_empty_query_keeps_everything() {
        let assets = sample();
        assert_eq!(filter_assets(&assets, "").len(), assets.len());
    }

    #[test]
    fn test_matches_name_or_symbol_case_insensitive() {
        let assets = sample();
        assert_eq!(ids(&filter_assets(&assets, "ETH")), vec!["ethereum", "tether", "ethena"]);
        assert_eq!(ids(&filter_assets(&assets, "Btc")), vec!["bitcoin", "wrapped-bitcoin"]);
        assert_eq!(ids(&filter_assets(&assets, "usdt")), vec!["tether"]);
        assert!(filter_assets(&assets, "doge").is_empty());
    }

    #[test]
    fn test_result_is_exact_subset() {
        let assets = sample();
        for q in ["e", "bit", "T", "xyz", "wrapped b"] {
            let got = ids(&filter_assets(&assets, q));
            let expected: Vec<String> = assets
                .iter()
                .filter(|a| {
                    a.name.to_lowercase().contains(&q.to_lowercase())
                        || a.symbol.to_lowercase().contains(&q.to_lowercase())
                })
                .map(|a| a.id.clone())
                .collect();
            assert_eq!(got, expected, "query {:?}", q);
        }
    }

    #[test]
    fn test_filter_is_idempotent() {
        let assets = sample();
        for q in ["eth", "B", "", "coin"] {
            let once: Vec<Asset> = filter_assets(&assets, q).into_iter().cloned().collect();
            let twice: Vec<Asset> = filter_assets(&once, q).into_iter().cloned().collect();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_scenario_eth_yields_only_ethereum() {
        let assets = vec![asset("bitcoin", "btc", "Bitcoin"), asset("ethereum", "eth", "Ethereum")];
        assert_eq!(ids(&filter_assets(&assets, "eth")), vec!["ethereum"]);
    }
}
