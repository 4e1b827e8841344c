use crate::config::LedgerConfig;
use crate::domain::entities::transaction::Transaction;
use crate::domain::errors::LedgerError;
use crate::domain::repositories::importer::AssetRangeImporter;
use crate::domain::repositories::item_cache::ItemCache;
use crate::domain::services::combinations::build_pair_combinations;
use crate::domain::services::conversion::{ConversionPipeline, PriceSource};
use crate::domain::services::price_resolver::PriceResolver;
use crate::domain::services::reconciliation::TransactionProcessor;
use crate::domain::value_objects::price::Price;
use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use std::sync::Arc;
use tracing::{debug, info};

/// Outcome of a refresh from the importers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateResult {
    pub transaction_count: usize,
    pub price_count: usize,
}

/// Retrieves transactions and prices from every importer and serves them from
/// the caches afterwards. Read operations never reach the importers.
pub struct LedgerService {
    importers: Vec<Arc<dyn AssetRangeImporter>>,
    transaction_cache: Arc<dyn ItemCache<Transaction>>,
    price_cache: Arc<dyn ItemCache<Price>>,
    processor: Box<dyn TransactionProcessor>,
    config: LedgerConfig,
    resolver: PriceResolver,
}

impl LedgerService {
    /// Fails when `config` does not describe a usable run.
    pub fn new(
        importers: Vec<Arc<dyn AssetRangeImporter>>,
        transaction_cache: Arc<dyn ItemCache<Transaction>>,
        price_cache: Arc<dyn ItemCache<Price>>,
        processor: Box<dyn TransactionProcessor>,
        config: LedgerConfig,
    ) -> Result<Self, LedgerError> {
        config.validate()?;

        let networks = importers.iter().map(|i| i.name().to_string()).collect();
        let resolver = PriceResolver::new(price_cache.clone(), networks);

        Ok(Self {
            importers,
            transaction_cache,
            price_cache,
            processor,
            config,
            resolver,
        })
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Pulls everything the importers know for the configured range into the caches.
    ///
    /// Nothing is cached unless every importer answered, so a failed update never
    /// leaves transactions behind without their prices. The counts only include
    /// items that were not cached yet.
    pub async fn update_all_from_source(&self) -> Result<UpdateResult, LedgerError> {
        let transactions = self.import_transactions().await?;
        let prices = self.import_prices(&transactions).await?;

        let mut transaction_count = 0;
        for transaction in transactions {
            if self.transaction_cache.save(transaction)? {
                transaction_count += 1;
            }
        }

        let mut price_count = 0;
        for price in prices {
            if self.price_cache.save(price)? {
                price_count += 1;
            }
        }

        info!(
            "Updated ledger from {} importers: {} new transactions, {} new prices",
            self.importers.len(),
            transaction_count,
            price_count
        );

        Ok(UpdateResult {
            transaction_count,
            price_count,
        })
    }

    async fn import_prices(&self, transactions: &[Transaction]) -> Result<Vec<Price>, LedgerError> {
        let pairs = build_pair_combinations(transactions, Some(&self.config.target_symbol));
        debug!("Prefetching prices for {} pairs", pairs.len());

        let mut prices = Vec::new();
        for pair in &pairs {
            let queries = self.importers.iter().map(|importer| {
                importer.query_past_prices(
                    &pair.base,
                    &pair.quote,
                    self.config.time_start,
                    self.config.time_end,
                )
            });

            for batch in join_all(queries).await {
                prices.extend(batch?);
            }
        }

        Ok(prices)
    }

    async fn import_transactions(&self) -> Result<Vec<Transaction>, LedgerError> {
        let queries = self.importers.iter().map(|importer| {
            importer.query_past_transactions(
                &self.config.asset_base,
                &self.config.asset_quote,
                self.config.time_start,
                self.config.time_end,
            )
        });

        let mut transactions = Vec::new();
        for (importer, result) in self.importers.iter().zip(join_all(queries).await) {
            let batch = result?;
            debug!("{} delivered {} transactions", importer.name(), batch.len());
            transactions.extend(batch);
        }

        Ok(self.processor.process(&transactions))
    }

    /// Every cached transaction, oldest first
    pub fn query_transactions(&self) -> Vec<Transaction> {
        self.transaction_cache.load_all()
    }

    pub fn has_cached_transactions(&self) -> bool {
        !self.transaction_cache.load_all().is_empty()
    }

    /// Name of the first importer able to reach complete price history
    pub fn full_history_network(&self) -> Option<String> {
        self.importers
            .iter()
            .find(|i| i.has_full_history())
            .map(|i| i.name().to_string())
    }

    pub fn conversion_pipeline(self: &Arc<Self>) -> ConversionPipeline {
        let source: Arc<dyn PriceSource> = self.clone();
        ConversionPipeline::standard(source, self.full_history_network())
    }
}

impl PriceSource for LedgerService {
    fn has_price(
        &self,
        network: &str,
        timestamp: DateTime<Utc>,
        base_asset: &str,
        quote_symbol: &str,
    ) -> bool {
        self.resolver
            .has_price(network, timestamp, base_asset, quote_symbol)
    }

    fn query_price(
        &self,
        network: &str,
        timestamp: DateTime<Utc>,
        base_asset: &str,
        quote_symbol: &str,
    ) -> Option<Price> {
        self.resolver
            .resolve_price(network, timestamp, base_asset, quote_symbol)
    }

    fn query_range_prices(&self, network: &str) -> Vec<Price> {
        self.resolver.range_prices(network)
    }

    fn is_symbol_pair_supported(&self, base_asset: &str, quote_asset: &str) -> bool {
        self.importers
            .iter()
            .any(|i| i.is_symbol_pair_supported(base_asset, quote_asset))
    }
}
