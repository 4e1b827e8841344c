use super::conversion::ConversionPipeline;
use crate::domain::entities::transaction::{Category, Transaction};
use crate::domain::errors::ConversionError;
use crate::domain::value_objects::amount::Amount;
use chrono::{DateTime, Utc};

/// Value of `amount` in `target_symbol` at `timestamp`.
///
/// Amounts already denominated in the target are returned as they are.
pub fn value_in(
    amount: &Amount,
    pipeline: &ConversionPipeline,
    timestamp: DateTime<Utc>,
    target_symbol: &str,
) -> Result<Amount, ConversionError> {
    if amount.symbol() == target_symbol {
        return Ok(amount.clone());
    }
    pipeline.convert(amount, timestamp, target_symbol)
}

/// Total value in `target_symbol` of every transaction in `category`.
pub fn calculate_total_amount(
    transactions: &[Transaction],
    pipeline: &ConversionPipeline,
    timestamp: DateTime<Utc>,
    target_symbol: &str,
    category: Category,
) -> Result<Amount, ConversionError> {
    let values = transactions
        .iter()
        .filter(|t| t.category == category)
        .map(|t| value_in(&t.amount, pipeline, timestamp, target_symbol))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Amount::sum(&values, target_symbol)?)
}
