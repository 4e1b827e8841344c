//! Trade price valuation
//!
//! Uses the exact price recorded for the amount's symbol against the target
//! symbol at the requested time.

use super::{AmountConverter, PriceSource};
use crate::domain::value_objects::amount::Amount;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::warn;

/// Values amounts with the exact price recorded by the amount's own source
/// (or a fallback network) at the requested time.
pub struct TradePriceConverter {
    source: Arc<dyn PriceSource>,
}

impl TradePriceConverter {
    pub fn new(source: Arc<dyn PriceSource>) -> Self {
        Self { source }
    }
}

impl AmountConverter for TradePriceConverter {
    fn name(&self) -> &str {
        "TradePrice"
    }

    fn can_convert(&self, amount: &Amount, target_symbol: &str, timestamp: DateTime<Utc>) -> bool {
        self.source.is_symbol_pair_supported(amount.symbol(), target_symbol)
            && self.source.has_price(
                amount.source_name(),
                timestamp,
                amount.symbol(),
                target_symbol,
            )
    }

    fn convert(&self, amount: &Amount, target_symbol: &str, timestamp: DateTime<Utc>) -> Amount {
        let price = self.source.query_price(
            amount.source_name(),
            timestamp,
            amount.symbol(),
            target_symbol,
        );

        match price {
            Some(price) => price.value_of(amount.quantity()),
            None => {
                warn!(
                    "Trade price for {} on {} at {} vanished after lookup",
                    amount.symbol(),
                    amount.source_name(),
                    timestamp
                );
                Amount::zero(target_symbol)
            }
        }
    }
}
