//! Realtime price valuation
//!
//! Last link of the standard chain. No live feed is connected, so it never
//! accepts a conversion.

use super::AmountConverter;
use crate::domain::value_objects::amount::Amount;
use chrono::{DateTime, Utc};

#[derive(Debug, Default, Clone, Copy)]
pub struct RealtimePriceConverter;

impl RealtimePriceConverter {
    pub fn new() -> Self {
        Self
    }
}

impl AmountConverter for RealtimePriceConverter {
    fn name(&self) -> &str {
        "RealtimePrice"
    }

    fn can_convert(&self, _amount: &Amount, _target_symbol: &str, _timestamp: DateTime<Utc>) -> bool {
        false
    }

    fn convert(&self, _amount: &Amount, target_symbol: &str, _timestamp: DateTime<Utc>) -> Amount {
        Amount::zero(target_symbol)
    }
}
