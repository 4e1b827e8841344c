use crate::domain::errors::ValidationError;
use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A quantity of a single asset, observed at a point in time on some source.
///
/// Amounts are immutable. Arithmetic is only defined between amounts of the
/// same symbol; anything else has to go through the conversion pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amount {
    timestamp: DateTime<Utc>,
    source_name: String,
    symbol: String,
    quantity: BigDecimal,
}

impl Amount {
    pub fn new(
        timestamp: DateTime<Utc>,
        source_name: impl Into<String>,
        symbol: impl Into<String>,
        quantity: BigDecimal,
    ) -> Self {
        Self {
            timestamp,
            source_name: source_name.into(),
            symbol: symbol.into(),
            quantity,
        }
    }

    /// Zero quantity of `symbol`, with no source and the current time.
    ///
    /// Used as the visible "no data" result when nothing could be valued.
    pub fn zero(symbol: impl Into<String>) -> Self {
        Self::new(Utc::now(), String::new(), symbol, BigDecimal::zero())
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn quantity(&self) -> &BigDecimal {
        &self.quantity
    }

    pub fn is_zero(&self) -> bool {
        self.quantity.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.quantity < BigDecimal::zero()
    }

    pub fn with_quantity(&self, quantity: BigDecimal) -> Self {
        Self {
            quantity,
            ..self.clone()
        }
    }

    pub fn add(&self, other: &Amount) -> Result<Amount, ValidationError> {
        self.ensure_same_symbol(other)?;
        Ok(self.with_quantity(&self.quantity + &other.quantity))
    }

    pub fn subtract(&self, other: &Amount) -> Result<Amount, ValidationError> {
        self.ensure_same_symbol(other)?;
        Ok(self.with_quantity(&self.quantity - &other.quantity))
    }

    pub fn multiply(&self, other: &Amount) -> Result<Amount, ValidationError> {
        self.ensure_same_symbol(other)?;
        Ok(self.with_quantity(&self.quantity * &other.quantity))
    }

    /// Multiplies by a bare factor (e.g. a quote quantity), keeping the symbol.
    pub fn scaled(&self, factor: &BigDecimal) -> Amount {
        self.with_quantity(&self.quantity * factor)
    }

    /// Sums `amounts` into one amount of `target_symbol`.
    ///
    /// An empty collection yields [`Amount::zero`]. Every element must already
    /// be denominated in `target_symbol`.
    pub fn sum(amounts: &[Amount], target_symbol: &str) -> Result<Amount, ValidationError> {
        let Some((first, rest)) = amounts.split_first() else {
            return Ok(Amount::zero(target_symbol));
        };

        if first.symbol != target_symbol {
            return Err(ValidationError::SymbolMismatch {
                left: target_symbol.to_string(),
                right: first.symbol.clone(),
            });
        }

        rest.iter().try_fold(first.clone(), |total, amount| total.add(amount))
    }

    fn ensure_same_symbol(&self, other: &Amount) -> Result<(), ValidationError> {
        if self.symbol == other.symbol {
            return Ok(());
        }

        Err(ValidationError::SymbolMismatch {
            left: self.symbol.clone(),
            right: other.symbol.clone(),
        })
    }

    fn sign_character(&self) -> &'static str {
        match self.symbol.as_str() {
            "BTC" => "₿",
            "USD" => "$",
            "USDT" => "₮",
            "EUR" => "€",
            _ => " ",
        }
    }

    fn decimal_places(&self) -> i64 {
        match self.symbol.as_str() {
            "USD" | "USDT" | "EUR" => 2,
            _ => 8,
        }
    }

    /// Fixed-point rendering of the quantity, independent of how the decimal
    /// crate would pick between plain and exponent notation.
    fn formatted_quantity(&self) -> String {
        let places = self.decimal_places();
        let rounded = self.quantity.round(places).with_scale(places);
        let (digits, _) = rounded.as_bigint_and_exponent();

        let raw = digits.to_string();
        let (negative, magnitude) = match raw.strip_prefix('-') {
            Some(magnitude) => (true, magnitude.to_string()),
            None => (false, raw),
        };

        let places = places as usize;
        let padded = format!("{:0>width$}", magnitude, width = places + 1);
        let (whole, fraction) = padded.split_at(padded.len() - places);

        let sign = if negative { "-" } else { "" };
        if places == 0 {
            format!("{}{}", sign, whole)
        } else {
            format!("{}{}.{}", sign, whole, fraction)
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.sign_character(), self.formatted_quantity())
    }
}
