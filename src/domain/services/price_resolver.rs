//! Exact-timestamp price lookup with network fallback
//!
//! Lookups are keyed by network, timestamp and the base/quote pair. The
//! requested network is asked first, then every other registered network
//! in registration order. Only exact timestamp hits are returned; approximating
//! a price from neighbouring records is the nearest-price converter's job.

use crate::domain::repositories::item_cache::ItemCache;
use crate::domain::value_objects::price::Price;
use chrono::{DateTime, Utc};
use std::sync::Arc;

pub struct PriceResolver {
    cache: Arc<dyn ItemCache<Price>>,
    networks: Vec<String>,
}

impl PriceResolver {
    /// # Arguments
    /// * `cache` - Price cache shared with the ledger
    /// * `networks` - Known network names, in registration order
    pub fn new(cache: Arc<dyn ItemCache<Price>>, networks: Vec<String>) -> Self {
        Self { cache, networks }
    }

    pub fn networks(&self) -> &[String] {
        &self.networks
    }

    /// Network whose cache holds an exact `base_asset`/`quote_symbol` price at
    /// `timestamp`, preferring `network`.
    pub fn preferred_network(
        &self,
        network: &str,
        timestamp: DateTime<Utc>,
        base_asset: &str,
        quote_symbol: &str,
    ) -> Option<String> {
        if self.find_price(network, timestamp, base_asset, quote_symbol).is_some() {
            return Some(network.to_string());
        }

        self.networks
            .iter()
            .filter(|name| name.as_str() != network)
            .find(|name| {
                self.find_price(name, timestamp, base_asset, quote_symbol)
                    .is_some()
            })
            .cloned()
    }

    pub fn has_price(
        &self,
        network: &str,
        timestamp: DateTime<Utc>,
        base_asset: &str,
        quote_symbol: &str,
    ) -> bool {
        self.preferred_network(network, timestamp, base_asset, quote_symbol)
            .is_some()
    }

    pub fn resolve_price(
        &self,
        network: &str,
        timestamp: DateTime<Utc>,
        base_asset: &str,
        quote_symbol: &str,
    ) -> Option<Price> {
        let preferred = self.preferred_network(network, timestamp, base_asset, quote_symbol)?;
        self.find_price(&preferred, timestamp, base_asset, quote_symbol)
    }

    fn find_price(
        &self,
        network: &str,
        timestamp: DateTime<Utc>,
        base_asset: &str,
        quote_symbol: &str,
    ) -> Option<Price> {
        self.cache
            .load_at(network, timestamp)
            .into_iter()
            .find(|price| price.base_asset() == base_asset && price.quote_symbol() == quote_symbol)
    }

    /// Full price history of `network`, oldest first.
    pub fn range_prices(&self, network: &str) -> Vec<Price> {
        let mut prices = self.cache.load_range(network);
        prices.sort_by_key(|price| price.timestamp());
        prices
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::amount::Amount;
    use crate::persistence::memory_cache::MemoryItemCache;
    use bigdecimal::BigDecimal;
    use chrono::{Duration, TimeZone};

    fn at(seconds: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap() + Duration::seconds(seconds)
    }

    fn pair_price(network: &str, seconds: i64, base: &str, quote: &str, value: i64) -> Price {
        let quote = Amount::new(at(seconds), network, quote, BigDecimal::from(value));
        Price::new(at(seconds), network, base, quote)
    }

    fn price(network: &str, seconds: i64, quote: i64) -> Price {
        pair_price(network, seconds, "BTC", "USDT", quote)
    }

    fn resolver(prices: Vec<Price>) -> PriceResolver {
        let cache = Arc::new(MemoryItemCache::<Price>::new());
        for p in prices {
            cache.save(p).unwrap();
        }
        PriceResolver::new(cache, vec!["A".to_string(), "B".to_string(), "C".to_string()])
    }

    #[test]
    fn test_prefers_requested_network() {
        let resolver = resolver(vec![price("A", 10, 100), price("B", 10, 200)]);
        let found = resolver.resolve_price("B", at(10), "BTC", "USDT").unwrap();
        assert_eq!(found.source_name(), "B");
    }

    #[test]
    fn test_falls_back_to_next_network() {
        let resolver = resolver(vec![price("B", 10, 200)]);
        assert!(resolver.has_price("A", at(10), "BTC", "USDT"));

        let found = resolver.resolve_price("A", at(10), "BTC", "USDT").unwrap();
        assert_eq!(found.source_name(), "B");
        assert_eq!(found.quote_amount().quantity(), &BigDecimal::from(200));
    }

    #[test]
    fn test_fallback_follows_registration_order() {
        let resolver = resolver(vec![price("C", 10, 300), price("B", 10, 200)]);
        assert_eq!(
            resolver.preferred_network("A", at(10), "BTC", "USDT"),
            Some("B".to_string())
        );
    }

    #[test]
    fn test_no_price_anywhere() {
        let resolver = resolver(vec![price("A", 10, 100)]);
        assert!(!resolver.has_price("A", at(11), "BTC", "USDT"));
        assert!(resolver.resolve_price("A", at(11), "BTC", "USDT").is_none());
    }

    #[test]
    fn test_unregistered_network_still_checked_first() {
        let resolver = resolver(vec![price("Z", 10, 900), price("A", 10, 100)]);
        let found = resolver.resolve_price("Z", at(10), "BTC", "USDT").unwrap();
        assert_eq!(found.source_name(), "Z");
    }

    #[test]
    fn test_picks_the_requested_pair_within_one_timestamp() {
        let resolver = resolver(vec![
            pair_price("A", 10, "BTC", "USDT", 40_000),
            pair_price("A", 10, "ETH", "USDT", 3_000),
            pair_price("A", 10, "BTC", "EUR", 36_000),
        ]);

        let eth = resolver.resolve_price("A", at(10), "ETH", "USDT").unwrap();
        assert_eq!(eth.base_asset(), "ETH");
        assert_eq!(eth.quote_amount().quantity(), &BigDecimal::from(3_000));

        let btc_eur = resolver.resolve_price("A", at(10), "BTC", "EUR").unwrap();
        assert_eq!(btc_eur.quote_symbol(), "EUR");
        assert_eq!(btc_eur.quote_amount().quantity(), &BigDecimal::from(36_000));

        assert!(!resolver.has_price("A", at(10), "ETH", "EUR"));
    }

    #[test]
    fn test_fallback_skips_networks_without_the_pair() {
        let resolver = resolver(vec![
            pair_price("A", 10, "BTC", "USDT", 40_000),
            pair_price("B", 10, "ETH", "USDT", 3_000),
        ]);
        assert_eq!(
            resolver.preferred_network("A", at(10), "ETH", "USDT"),
            Some("B".to_string())
        );
    }

    #[test]
    fn test_range_prices_sorted() {
        let resolver = resolver(vec![price("A", 30, 3), price("A", 10, 1), price("A", 20, 2)]);
        let history = resolver.range_prices("A");
        let times: Vec<_> = history.iter().map(|p| p.timestamp()).collect();
        assert_eq!(times, vec![at(10), at(20), at(30)]);
    }
}
