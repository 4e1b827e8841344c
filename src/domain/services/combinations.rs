//! Combination enumeration and asset pair building for price prefetching

use crate::domain::entities::transaction::Transaction;
use crate::domain::errors::ValidationError;
use crate::domain::value_objects::asset_pair::AssetPair;

/// Every `count`-element combination of `items`, in lexicographic index order.
///
/// Relative input order is kept inside each combination, so `[a, b, c]` with
/// `count = 2` yields `[a, b]`, `[a, c]`, `[b, c]`.
///
/// # Errors
/// `ValidationError::InvalidInput` when `count` exceeds the number of items.
pub fn combinations<T: Clone>(items: &[T], count: usize) -> Result<Vec<Vec<T>>, ValidationError> {
    let len = items.len();
    if count > len {
        return Err(ValidationError::InvalidInput(format!(
            "count ({}) is greater than the number of elements ({})",
            count, len
        )));
    }

    let mut indices: Vec<usize> = (0..count).collect();
    let mut results = Vec::new();

    loop {
        results.push(indices.iter().map(|&i| items[i].clone()).collect());

        // Rightmost index that can still move: position i tops out at len - count + i
        let Some(pivot) = (0..count).rev().find(|&i| indices[i] < len - count + i) else {
            break;
        };

        indices[pivot] += 1;
        for i in pivot + 1..count {
            indices[i] = indices[i - 1] + 1;
        }
    }

    Ok(results)
}

/// Distinct asset symbols of `transactions` in first-seen order, followed by
/// `target_symbol` when it is non-blank and not already present.
pub fn collect_symbols(transactions: &[Transaction], target_symbol: Option<&str>) -> Vec<String> {
    let mut symbols: Vec<String> = Vec::new();

    for transaction in transactions {
        let symbol = transaction.symbol();
        if !symbols.iter().any(|s| s == symbol) {
            symbols.push(symbol.to_string());
        }
    }

    if let Some(target) = target_symbol.map(str::trim).filter(|t| !t.is_empty()) {
        if !symbols.iter().any(|s| s == target) {
            symbols.push(target.to_string());
        }
    }

    symbols
}

/// All unordered asset pairs over the symbols seen in `transactions` plus the
/// reporting symbol.
pub fn build_pair_combinations(
    transactions: &[Transaction],
    target_symbol: Option<&str>,
) -> Vec<AssetPair> {
    let symbols = collect_symbols(transactions, target_symbol);
    if symbols.len() < 2 {
        return Vec::new();
    }

    // count = 2 never exceeds the length checked above
    combinations(&symbols, 2)
        .unwrap_or_default()
        .into_iter()
        .map(|pair| AssetPair::new(pair[0].clone(), pair[1].clone()))
        .collect()
}
