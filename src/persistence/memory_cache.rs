//! In-process item cache

use crate::domain::errors::CacheError;
use crate::domain::repositories::item_cache::{CacheItem, ItemCache};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::RwLock;

type CacheKey = (String, DateTime<Utc>);

/// Items keyed by (network, timestamp). Several distinct items may share a
/// key, e.g. two legs recorded at the same instant.
pub struct MemoryItemCache<T: CacheItem> {
    items: RwLock<BTreeMap<CacheKey, Vec<T>>>,
}

impl<T: CacheItem> MemoryItemCache<T> {
    pub fn new() -> Self {
        Self {
            items: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn with_items(items: impl IntoIterator<Item = T>) -> Self {
        let cache = Self::new();
        {
            let mut map = cache.items.write().unwrap_or_else(|e| e.into_inner());
            for item in items {
                Self::insert(&mut map, item);
            }
        }
        cache
    }

    pub fn len(&self) -> usize {
        self.read().values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns false when an identical item was already stored.
    pub(crate) fn insert(map: &mut BTreeMap<CacheKey, Vec<T>>, item: T) -> bool {
        let key = (item.network_name().to_string(), item.timestamp());
        let bucket = map.entry(key).or_default();
        if bucket.contains(&item) {
            return false;
        }
        bucket.push(item);
        true
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, BTreeMap<CacheKey, Vec<T>>> {
        self.items.read().unwrap_or_else(|e| e.into_inner())
    }
}

impl<T: CacheItem> Default for MemoryItemCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: CacheItem> ItemCache<T> for MemoryItemCache<T> {
    fn has_item(&self, network_name: &str, timestamp: DateTime<Utc>) -> bool {
        if network_name.trim().is_empty() {
            return false;
        }
        self.read()
            .get(&(network_name.to_string(), timestamp))
            .is_some_and(|bucket| !bucket.is_empty())
    }

    fn save(&self, item: T) -> Result<bool, CacheError> {
        let mut map = self.items.write().map_err(|_| CacheError::LockPoisoned)?;
        Ok(Self::insert(&mut map, item))
    }

    fn load(&self, network_name: &str, timestamp: DateTime<Utc>) -> Option<T> {
        self.read()
            .get(&(network_name.to_string(), timestamp))
            .and_then(|bucket| bucket.first().cloned())
    }

    fn load_at(&self, network_name: &str, timestamp: DateTime<Utc>) -> Vec<T> {
        if network_name.trim().is_empty() {
            return Vec::new();
        }
        self.read()
            .get(&(network_name.to_string(), timestamp))
            .cloned()
            .unwrap_or_default()
    }

    fn load_range(&self, network_name: &str) -> Vec<T> {
        // Keys sort by network first, then time
        self.read()
            .iter()
            .filter(|((network, _), _)| network == network_name)
            .flat_map(|(_, bucket)| bucket.iter().cloned())
            .collect()
    }

    fn load_all(&self) -> Vec<T> {
        let mut all: Vec<T> = self.read().values().flatten().cloned().collect();
        all.sort_by_key(|item| item.timestamp());
        all
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::amount::Amount;
    use crate::domain::value_objects::price::Price;
    use bigdecimal::BigDecimal;
    use chrono::{Duration, TimeZone};

    fn at(seconds: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap() + Duration::seconds(seconds)
    }

    fn price(network: &str, seconds: i64, quote: i64) -> Price {
        let quote = Amount::new(at(seconds), network, "USDT", BigDecimal::from(quote));
        Price::new(at(seconds), network, "BTC", quote)
    }

    #[test]
    fn test_save_and_load_exact_key() {
        let cache = MemoryItemCache::<Price>::new();
        cache.save(price("Binance", 10, 100)).unwrap();

        assert!(cache.has_item("Binance", at(10)));
        assert!(!cache.has_item("Binance", at(11)));
        assert!(!cache.has_item("Bybit", at(10)));
        assert_eq!(cache.load("Binance", at(10)), Some(price("Binance", 10, 100)));
        assert_eq!(cache.load("Binance", at(11)), None);
    }

    #[test]
    fn test_blank_network_is_never_cached() {
        let cache = MemoryItemCache::<Price>::new();
        cache.save(price("", 10, 100)).unwrap();
        assert!(!cache.has_item("", at(10)));
        assert!(!cache.has_item("  ", at(10)));
    }

    #[test]
    fn test_identical_items_are_stored_once() {
        let cache = MemoryItemCache::<Price>::new();
        assert!(cache.save(price("Binance", 10, 100)).unwrap());
        assert!(!cache.save(price("Binance", 10, 100)).unwrap());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_distinct_items_share_a_key() {
        let cache = MemoryItemCache::<Price>::new();
        cache.save(price("Binance", 10, 100)).unwrap();
        cache.save(price("Binance", 10, 101)).unwrap();

        assert_eq!(cache.len(), 2);
        let first = cache.load("Binance", at(10)).unwrap();
        assert_eq!(first.quote_amount().quantity(), &BigDecimal::from(100));

        let bucket = cache.load_at("Binance", at(10));
        assert_eq!(bucket, vec![price("Binance", 10, 100), price("Binance", 10, 101)]);
        assert!(cache.load_at("Binance", at(11)).is_empty());
    }

    #[test]
    fn test_load_range_and_all() {
        let cache = MemoryItemCache::with_items(vec![
            price("Bybit", 5, 50),
            price("Binance", 20, 200),
            price("Binance", 10, 100),
        ]);

        let binance: Vec<_> = cache
            .load_range("Binance")
            .iter()
            .map(|p| p.timestamp())
            .collect();
        assert_eq!(binance, vec![at(10), at(20)]);

        let all: Vec<_> = cache.load_all().iter().map(|p| p.timestamp()).collect();
        assert_eq!(all, vec![at(5), at(10), at(20)]);
        assert!(cache.load_range("Kraken").is_empty());
    }
}
