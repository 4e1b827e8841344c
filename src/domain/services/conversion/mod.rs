//! Amount conversion pipeline
//!
//! An ordered chain of converters. The first converter able to value an amount
//! in the target symbol performs the conversion; when none can, the result is a
//! zero amount in the target symbol so a missing price stays visible instead of
//! aborting a report.

pub mod nearest_price;
pub mod realtime_price;
pub mod trade_price;

pub use nearest_price::NearestPriceConverter;
pub use realtime_price::RealtimePriceConverter;
pub use trade_price::TradePriceConverter;

use crate::domain::errors::ConversionError;
use crate::domain::value_objects::amount::Amount;
use crate::domain::value_objects::price::Price;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::debug;

/// Read-only price lookups the converters depend on.
pub trait PriceSource: Send + Sync {
    /// Whether an exact `base_asset`/`quote_symbol` price exists at `timestamp`
    /// on `network` or a fallback network
    fn has_price(
        &self,
        network: &str,
        timestamp: DateTime<Utc>,
        base_asset: &str,
        quote_symbol: &str,
    ) -> bool;

    fn query_price(
        &self,
        network: &str,
        timestamp: DateTime<Utc>,
        base_asset: &str,
        quote_symbol: &str,
    ) -> Option<Price>;

    /// Full price history of `network`, oldest first
    fn query_range_prices(&self, network: &str) -> Vec<Price>;

    fn is_symbol_pair_supported(&self, base_asset: &str, quote_asset: &str) -> bool;
}

pub trait AmountConverter: Send + Sync {
    fn name(&self) -> &str;

    /// Cheap check, no I/O beyond in-memory caches
    fn can_convert(&self, amount: &Amount, target_symbol: &str, timestamp: DateTime<Utc>) -> bool;

    /// Only called after `can_convert` answered true
    fn convert(&self, amount: &Amount, target_symbol: &str, timestamp: DateTime<Utc>) -> Amount;
}

pub struct ConversionPipeline {
    converters: Vec<Box<dyn AmountConverter>>,
}

impl ConversionPipeline {
    pub fn new(converters: Vec<Box<dyn AmountConverter>>) -> Self {
        Self { converters }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Trade prices first, then the nearest price of the full-history network
    /// when one is given, then live pricing.
    pub fn standard(source: Arc<dyn PriceSource>, full_history_network: Option<String>) -> Self {
        let mut pipeline = Self::empty();
        pipeline.push(Box::new(TradePriceConverter::new(source.clone())));

        if let Some(network) = full_history_network {
            pipeline.push(Box::new(NearestPriceConverter::new(source, network)));
        }

        pipeline.push(Box::new(RealtimePriceConverter::new()));
        pipeline
    }

    pub fn push(&mut self, converter: Box<dyn AmountConverter>) {
        self.converters.push(converter);
    }

    pub fn converter_names(&self) -> Vec<&str> {
        self.converters.iter().map(|c| c.name()).collect()
    }

    pub fn convert(
        &self,
        amount: &Amount,
        timestamp: DateTime<Utc>,
        target_symbol: &str,
    ) -> Result<Amount, ConversionError> {
        if amount.symbol() == target_symbol {
            return Err(ConversionError::InvalidOperation {
                from: amount.symbol().to_string(),
                to: target_symbol.to_string(),
            });
        }

        let converter = self
            .converters
            .iter()
            .find(|c| c.can_convert(amount, target_symbol, timestamp));

        match converter {
            Some(converter) => {
                debug!(
                    "Converting {} {} to {} at {} with {}",
                    amount.quantity(),
                    amount.symbol(),
                    target_symbol,
                    timestamp,
                    converter.name()
                );
                Ok(converter.convert(amount, target_symbol, timestamp))
            }
            None => {
                debug!(
                    "No converter for {} to {} at {}",
                    amount.symbol(),
                    target_symbol,
                    timestamp
                );
                Ok(Amount::zero(target_symbol))
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use bigdecimal::BigDecimal;

    struct FixedConverter {
        name: &'static str,
        accepts: bool,
        quantity: i64,
    }

    impl AmountConverter for FixedConverter {
        fn name(&self) -> &str {
            self.name
        }

        fn can_convert(&self, _: &Amount, _: &str, _: DateTime<Utc>) -> bool {
            self.accepts
        }

        fn convert(&self, _: &Amount, target_symbol: &str, timestamp: DateTime<Utc>) -> Amount {
            Amount::new(timestamp, self.name, target_symbol, BigDecimal::from(self.quantity))
        }
    }

    fn btc(quantity: i64) -> Amount {
        Amount::new(at(0), "Binance", "BTC", BigDecimal::from(quantity))
    }

    #[test]
    fn test_same_symbol_conversion_fails() {
        let pipeline = ConversionPipeline::empty();
        let result = pipeline.convert(&btc(1), at(0), "BTC");
        assert_eq!(
            result,
            Err(ConversionError::InvalidOperation {
                from: "BTC".to_string(),
                to: "BTC".to_string(),
            })
        );
    }

    #[test]
    fn test_empty_pipeline_returns_zero_in_target() {
        let pipeline = ConversionPipeline::empty();
        let result = pipeline.convert(&btc(1), at(0), "USDT").unwrap();
        assert_eq!(result.symbol(), "USDT");
        assert!(result.is_zero());
    }

    #[test]
    fn test_first_capable_converter_wins() {
        let pipeline = ConversionPipeline::new(vec![
            Box::new(FixedConverter { name: "declines", accepts: false, quantity: 1 }),
            Box::new(FixedConverter { name: "first", accepts: true, quantity: 2 }),
            Box::new(FixedConverter { name: "second", accepts: true, quantity: 3 }),
        ]);

        let result = pipeline.convert(&btc(1), at(0), "USDT").unwrap();
        assert_eq!(result.source_name(), "first");
        assert_eq!(result.quantity(), &BigDecimal::from(2));
    }

    #[test]
    fn test_standard_chain_order() {
        let source: Arc<dyn PriceSource> = Arc::new(StaticPriceSource::default());

        let with_history = ConversionPipeline::standard(source.clone(), Some("CryptoCompare".to_string()));
        assert_eq!(
            with_history.converter_names(),
            vec!["TradePrice", "NearestPrice", "RealtimePrice"]
        );

        let without_history = ConversionPipeline::standard(source, None);
        assert_eq!(
            without_history.converter_names(),
            vec!["TradePrice", "RealtimePrice"]
        );
    }

    #[test]
    fn test_standard_chain_prefers_exact_trade_price() {
        let source = StaticPriceSource::new(
            vec![
                price("Binance", 0, "BTC", "USDT", 40_000),
                price("CryptoCompare", 0, "BTC", "USDT", 39_000),
            ],
            &[("BTC", "USDT")],
        );
        let pipeline = ConversionPipeline::standard(Arc::new(source), Some("CryptoCompare".to_string()));

        let result = pipeline.convert(&btc(2), at(0), "USDT").unwrap();
        assert_eq!(result.quantity(), &BigDecimal::from(80_000));
        assert_eq!(result.source_name(), "Binance");
    }

    #[test]
    fn test_standard_chain_falls_back_to_nearest_price() {
        let source = StaticPriceSource::new(
            vec![price("CryptoCompare", -30, "BTC", "USDT", 39_000)],
            &[("BTC", "USDT")],
        );
        let pipeline = ConversionPipeline::standard(Arc::new(source), Some("CryptoCompare".to_string()));

        let result = pipeline.convert(&btc(1), at(0), "USDT").unwrap();
        assert_eq!(result.quantity(), &BigDecimal::from(39_000));
        assert_eq!(result.timestamp(), at(-30));
    }

    #[test]
    fn test_standard_chain_values_each_pair_with_its_own_price() {
        let source = StaticPriceSource::new(
            vec![
                price("Binance", 0, "BTC", "USDT", 40_000),
                price("Binance", 0, "ETH", "USDT", 3_000),
                price("Binance", 0, "BTC", "EUR", 36_000),
            ],
            &[("BTC", "USDT"), ("ETH", "USDT"), ("BTC", "EUR")],
        );
        let pipeline = ConversionPipeline::standard(Arc::new(source), None);

        let eth = Amount::new(at(0), "Binance", "ETH", BigDecimal::from(1));
        let result = pipeline.convert(&eth, at(0), "USDT").unwrap();
        assert_eq!(result.quantity(), &BigDecimal::from(3_000));
        assert_eq!(result.symbol(), "USDT");

        let result = pipeline.convert(&btc(1), at(0), "EUR").unwrap();
        assert_eq!(result.quantity(), &BigDecimal::from(36_000));
        assert_eq!(result.symbol(), "EUR");
    }
}
