//! Item cache contract
//!
//! Exact-match store keyed by (network name, timestamp). Lookups are
//! synchronous on purpose: callers use `has_item` to decide whether more
//! expensive work is needed, so it has to answer immediately.

use crate::domain::entities::transaction::Transaction;
use crate::domain::errors::CacheError;
use crate::domain::value_objects::price::Price;
use chrono::{DateTime, Utc};

/// Anything that can be stored in an [`ItemCache`].
pub trait CacheItem: Clone + PartialEq + Send + Sync {
    /// Network the item originates from, used as the first half of the key
    fn network_name(&self) -> &str;

    fn timestamp(&self) -> DateTime<Utc>;

    /// Directory-style name for the item kind (e.g. "prices")
    fn kind() -> &'static str;
}

impl CacheItem for Transaction {
    fn network_name(&self) -> &str {
        &self.source_name
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn kind() -> &'static str {
        "transactions"
    }
}

impl CacheItem for Price {
    fn network_name(&self) -> &str {
        self.source_name()
    }

    fn timestamp(&self) -> DateTime<Utc> {
        Price::timestamp(self)
    }

    fn kind() -> &'static str {
        "prices"
    }
}

pub trait ItemCache<T: CacheItem>: Send + Sync {
    /// Whether an item exists for the exact key
    fn has_item(&self, network_name: &str, timestamp: DateTime<Utc>) -> bool;

    /// Store `item`; storing an identical item twice keeps one copy.
    /// Returns whether the item was newly stored.
    fn save(&self, item: T) -> Result<bool, CacheError>;

    /// First item stored under the exact key
    fn load(&self, network_name: &str, timestamp: DateTime<Utc>) -> Option<T>;

    /// Every item stored under the exact key, in save order
    fn load_at(&self, network_name: &str, timestamp: DateTime<Utc>) -> Vec<T>;

    /// Every item stored for `network_name`, oldest first
    fn load_range(&self, network_name: &str) -> Vec<T>;

    /// Every item across all networks, oldest first
    fn load_all(&self) -> Vec<T>;
}
