//! Nearest price valuation
//!
//! Always able to produce a value: scans the whole history of a network known
//! to carry full pricing data and uses the record for the requested pair that
//! is closest in time.

use super::{AmountConverter, PriceSource};
use crate::domain::services::time_distance;
use crate::domain::value_objects::amount::Amount;
use crate::domain::value_objects::price::Price;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::debug;

pub struct NearestPriceConverter {
    source: Arc<dyn PriceSource>,
    network: String,
}

impl NearestPriceConverter {
    /// # Arguments
    /// * `source` - Price lookups
    /// * `network` - Network flagged as having full price history
    pub fn new(source: Arc<dyn PriceSource>, network: impl Into<String>) -> Self {
        Self {
            source,
            network: network.into(),
        }
    }

    pub fn network(&self) -> &str {
        &self.network
    }

    fn nearest_price(
        &self,
        base_asset: &str,
        quote_symbol: &str,
        timestamp: DateTime<Utc>,
    ) -> Option<Price> {
        // History is oldest first, so the earlier record wins a tie
        self.source
            .query_range_prices(&self.network)
            .into_iter()
            .filter(|price| price.base_asset() == base_asset && price.quote_symbol() == quote_symbol)
            .min_by_key(|price| time_distance(price.timestamp(), timestamp))
    }
}

impl AmountConverter for NearestPriceConverter {
    fn name(&self) -> &str {
        "NearestPrice"
    }

    fn can_convert(&self, _amount: &Amount, _target_symbol: &str, _timestamp: DateTime<Utc>) -> bool {
        true
    }

    fn convert(&self, amount: &Amount, target_symbol: &str, timestamp: DateTime<Utc>) -> Amount {
        match self.nearest_price(amount.symbol(), target_symbol, timestamp) {
            Some(price) => {
                debug!(
                    "Nearest {} price on {} for {} is from {}",
                    amount.symbol(),
                    self.network,
                    timestamp,
                    price.timestamp()
                );
                price.value_of(amount.quantity())
            }
            None => Amount::zero(target_symbol),
        }
    }
}
