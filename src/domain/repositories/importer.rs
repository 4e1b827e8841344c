//! Asset Range Importer Trait
//!
//! This module defines the `AssetRangeImporter` trait, the common interface for
//! every source of transactions and prices: exchanges, banks, price data sets.
//! The ledger only ever talks to importers through this trait.
//!
//! Implementations should prefer returning whole ranges over single results.

use crate::domain::entities::transaction::Transaction;
use crate::domain::errors::ImporterError;
use crate::domain::value_objects::price::Price;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Common result type for importer operations
pub type ImporterResult<T> = Result<T, ImporterError>;

/// Importer trait providing a uniform view over every value source
#[async_trait]
pub trait AssetRangeImporter: Send + Sync {
    /// Name of the underlying source (e.g. "Binance", a bank name)
    fn name(&self) -> &str;

    /// Whether this source can reach complete historical pricing, including
    /// data regular exchanges do not keep
    fn has_full_history(&self) -> bool;

    /// Query past transactions (orders, deposits, withdrawals) as normalized legs
    ///
    /// # Arguments
    /// * `base_asset` - Base asset (e.g. "BTC")
    /// * `quote_asset` - Quote asset (e.g. "USDT")
    /// * `start` / `end` - Optional bounds, inclusive
    async fn query_past_transactions(
        &self,
        base_asset: &str,
        quote_asset: &str,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> ImporterResult<Vec<Transaction>>;

    /// Query quote prices between the requested dates
    async fn query_past_prices(
        &self,
        base_asset: &str,
        quote_asset: &str,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> ImporterResult<Vec<Price>>;

    /// Whether this source can trade `base_asset` against `quote_asset`
    fn is_symbol_pair_supported(&self, base_asset: &str, quote_asset: &str) -> bool;
}
