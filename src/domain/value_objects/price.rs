use crate::domain::value_objects::amount::Amount;
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One unit of `base_asset` is worth `quote_amount` at `timestamp`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    timestamp: DateTime<Utc>,
    source_name: String,
    base_asset: String,
    quote_amount: Amount,
}

impl Price {
    pub fn new(
        timestamp: DateTime<Utc>,
        source_name: impl Into<String>,
        base_asset: impl Into<String>,
        quote_amount: Amount,
    ) -> Self {
        Self {
            timestamp,
            source_name: source_name.into(),
            base_asset: base_asset.into(),
            quote_amount,
        }
    }

    /// Price worth nothing, used where a price is required but none is known.
    pub fn empty(symbol: &str) -> Self {
        Self::new(Utc::now(), String::new(), symbol, Amount::zero(symbol))
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn base_asset(&self) -> &str {
        &self.base_asset
    }

    pub fn quote_amount(&self) -> &Amount {
        &self.quote_amount
    }

    pub fn quote_symbol(&self) -> &str {
        self.quote_amount.symbol()
    }

    /// Values `quantity` units of the base asset with this price, as an amount
    /// of the quote symbol stamped with this price's time and source.
    pub fn value_of(&self, quantity: &BigDecimal) -> Amount {
        let quoted = self.quote_amount.scaled(quantity);
        Amount::new(
            self.timestamp,
            self.source_name.clone(),
            self.quote_symbol(),
            quoted.quantity().clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::str::FromStr;

    fn btc_price(quote: &str) -> Price {
        let timestamp = Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap();
        let quote = Amount::new(
            timestamp,
            "CryptoCompare",
            "USDT",
            BigDecimal::from_str(quote).unwrap(),
        );
        Price::new(timestamp, "CryptoCompare", "BTC", quote)
    }

    #[test]
    fn test_price_accessors() {
        let price = btc_price("40000");
        assert_eq!(price.base_asset(), "BTC");
        assert_eq!(price.quote_symbol(), "USDT");
        assert_eq!(price.source_name(), "CryptoCompare");
    }

    #[test]
    fn test_value_of_multiplies_quote() {
        let price = btc_price("40000");
        let valued = price.value_of(&BigDecimal::from_str("0.5").unwrap());
        assert_eq!(valued.quantity(), &BigDecimal::from(20000));
        assert_eq!(valued.symbol(), "USDT");
        assert_eq!(valued.timestamp(), price.timestamp());
        assert_eq!(valued.source_name(), "CryptoCompare");
    }

    #[test]
    fn test_empty_price() {
        let price = Price::empty("EUR");
        assert_eq!(price.base_asset(), "EUR");
        assert!(price.quote_amount().is_zero());
        assert_eq!(price.source_name(), "");
    }
}
