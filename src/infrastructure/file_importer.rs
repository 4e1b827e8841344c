//! Importer over exported JSON snapshots
//!
//! Each snapshot file holds everything one source has to say: its
//! transactions, its price records and the symbol pairs it can trade.
//!
//! ```json
//! {
//!   "name": "Binance",
//!   "has_full_history": false,
//!   "supported_pairs": [["BTC", "USDT"]],
//!   "transactions": [],
//!   "prices": []
//! }
//! ```

use crate::domain::entities::transaction::Transaction;
use crate::domain::errors::ImporterError;
use crate::domain::repositories::importer::{AssetRangeImporter, ImporterResult};
use crate::domain::value_objects::price::Price;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// On-disk layout of an importer snapshot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportSnapshot {
    pub name: String,
    #[serde(default)]
    pub has_full_history: bool,
    #[serde(default)]
    pub supported_pairs: Vec<(String, String)>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub prices: Vec<Price>,
}

pub struct FileImporter {
    snapshot: ImportSnapshot,
}

fn within(timestamp: DateTime<Utc>, start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> bool {
    start.map_or(true, |start| timestamp >= start) && end.map_or(true, |end| timestamp <= end)
}

impl FileImporter {
    pub fn from_snapshot(snapshot: ImportSnapshot) -> Self {
        Self { snapshot }
    }

    pub async fn open(path: impl AsRef<Path>) -> ImporterResult<Self> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ImporterError::SourceUnavailable {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        let snapshot: ImportSnapshot =
            serde_json::from_str(&json).map_err(|e| ImporterError::ParseError {
                source_name: path.display().to_string(),
                reason: e.to_string(),
            })?;

        info!(
            "Loaded {} snapshot from {}: {} transactions, {} prices",
            snapshot.name,
            path.display(),
            snapshot.transactions.len(),
            snapshot.prices.len()
        );

        Ok(Self::from_snapshot(snapshot))
    }

    /// Opens every `*.json` snapshot in `dir`, ordered by file name.
    pub async fn open_dir(dir: impl AsRef<Path>) -> ImporterResult<Vec<Self>> {
        let dir = dir.as_ref();
        let unavailable = |e: std::io::Error| ImporterError::SourceUnavailable {
            path: dir.display().to_string(),
            reason: e.to_string(),
        };

        let mut entries = tokio::fs::read_dir(dir).await.map_err(unavailable)?;
        let mut paths = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(unavailable)? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut importers = Vec::with_capacity(paths.len());
        for path in paths {
            importers.push(Self::open(&path).await?);
        }
        Ok(importers)
    }
}

#[async_trait]
impl AssetRangeImporter for FileImporter {
    fn name(&self) -> &str {
        &self.snapshot.name
    }

    fn has_full_history(&self) -> bool {
        self.snapshot.has_full_history
    }

    async fn query_past_transactions(
        &self,
        _base_asset: &str,
        _quote_asset: &str,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> ImporterResult<Vec<Transaction>> {
        // Snapshots hold account-wide history, not per-market fills
        let transactions: Vec<Transaction> = self
            .snapshot
            .transactions
            .iter()
            .filter(|t| within(t.timestamp, start, end))
            .cloned()
            .collect();

        debug!("{} returned {} transactions", self.name(), transactions.len());
        Ok(transactions)
    }

    async fn query_past_prices(
        &self,
        base_asset: &str,
        quote_asset: &str,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> ImporterResult<Vec<Price>> {
        let prices: Vec<Price> = self
            .snapshot
            .prices
            .iter()
            .filter(|p| p.base_asset() == base_asset && p.quote_symbol() == quote_asset)
            .filter(|p| within(p.timestamp(), start, end))
            .cloned()
            .collect();

        debug!(
            "{} returned {} {}/{} prices",
            self.name(),
            prices.len(),
            base_asset,
            quote_asset
        );
        Ok(prices)
    }

    fn is_symbol_pair_supported(&self, base_asset: &str, quote_asset: &str) -> bool {
        self.snapshot
            .supported_pairs
            .iter()
            .any(|(base, quote)| base == base_asset && quote == quote_asset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::transaction::{Category, Network, TransactionType};
    use crate::domain::value_objects::amount::Amount;
    use bigdecimal::BigDecimal;
    use chrono::{Duration, TimeZone};

    fn at(days: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap() + Duration::days(days)
    }

    fn snapshot() -> ImportSnapshot {
        let deposit = |day: i64| {
            Transaction::new(
                at(day),
                "Binance",
                format!("tx-{}", day),
                Amount::new(at(day), "Binance", "BTC", BigDecimal::from(1)),
                Network::new("Binance", "spot"),
                Category::Asset,
                TransactionType::Credit,
            )
        };
        let price = |day: i64, base: &str, quote: &str| {
            Price::new(
                at(day),
                "Binance",
                base,
                Amount::new(at(day), "Binance", quote, BigDecimal::from(40_000)),
            )
        };

        ImportSnapshot {
            name: "Binance".to_string(),
            has_full_history: false,
            supported_pairs: vec![("BTC".to_string(), "USDT".to_string())],
            transactions: vec![deposit(0), deposit(5), deposit(10)],
            prices: vec![
                price(0, "BTC", "USDT"),
                price(5, "BTC", "USDT"),
                price(5, "ETH", "USDT"),
                price(5, "BTC", "EUR"),
            ],
        }
    }

    #[tokio::test]
    async fn test_transactions_filtered_by_range() {
        let importer = FileImporter::from_snapshot(snapshot());

        let all = importer
            .query_past_transactions("BTC", "USDT", None, None)
            .await
            .unwrap();
        assert_eq!(all.len(), 3);

        let bounded = importer
            .query_past_transactions("BTC", "USDT", Some(at(5)), Some(at(10)))
            .await
            .unwrap();
        let ids: Vec<_> = bounded.iter().map(|t| t.transaction_id.as_str()).collect();
        assert_eq!(ids, vec!["tx-5", "tx-10"]);
    }

    #[tokio::test]
    async fn test_prices_filtered_by_pair_and_range() {
        let importer = FileImporter::from_snapshot(snapshot());

        let prices = importer
            .query_past_prices("BTC", "USDT", Some(at(1)), None)
            .await
            .unwrap();
        assert_eq!(prices.len(), 1);
        assert_eq!(prices[0].timestamp(), at(5));
        assert_eq!(prices[0].quote_symbol(), "USDT");
    }

    #[tokio::test]
    async fn test_supported_pairs() {
        let importer = FileImporter::from_snapshot(snapshot());
        assert!(importer.is_symbol_pair_supported("BTC", "USDT"));
        assert!(!importer.is_symbol_pair_supported("USDT", "BTC"));
        assert_eq!(importer.name(), "Binance");
        assert!(!importer.has_full_history());
    }

    #[tokio::test]
    async fn test_open_reads_snapshot_file() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path();
        let json = serde_json::to_string(&snapshot()).unwrap();
        tokio::fs::write(dir.join("binance.json"), json).await.unwrap();
        tokio::fs::write(dir.join("notes.txt"), "ignored").await.unwrap();

        let importers = FileImporter::open_dir(dir).await.unwrap();
        assert_eq!(importers.len(), 1);
        assert_eq!(importers[0].name(), "Binance");
    }

    #[tokio::test]
    async fn test_open_missing_file_fails() {
        let result = FileImporter::open("/nonexistent/cryptoledger/snapshot.json").await;
        assert!(matches!(result, Err(ImporterError::SourceUnavailable { .. })));
    }

    #[tokio::test]
    async fn test_open_malformed_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("malformed.json");
        tokio::fs::write(&path, "{ not json").await.unwrap();

        let result = FileImporter::open(&path).await;
        assert!(matches!(result, Err(ImporterError::ParseError { .. })));
    }
}
