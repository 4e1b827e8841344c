//! Fills missing transaction ids from the counterpart leg of the same transfer
//!
//! Withdrawals from multi-sig wallets (Bybit, for one) arrive without an
//! external id while the receiving side does carry it. The missing id is taken
//! from the opposite leg on the same address and asset, closest in time.

use super::TransactionProcessor;
use crate::domain::entities::transaction::{Transaction, TransactionType};
use crate::domain::services::time_distance;
use tracing::debug;

#[derive(Debug, Default, Clone, Copy)]
pub struct FillTransactionIdProcessor;

impl FillTransactionIdProcessor {
    pub fn new() -> Self {
        Self
    }

    /// Counterpart leg for `leg`, if any.
    ///
    /// Candidates share asset and address, carry an id, and sit on the other
    /// side of the transfer (Transfer legs never qualify). Among candidates at
    /// equal distance the earliest one wins; equal timestamps keep input order.
    fn find_counterpart<'a>(
        leg: &Transaction,
        transactions: &'a [Transaction],
    ) -> Option<&'a Transaction> {
        let mut candidates: Vec<&Transaction> = transactions
            .iter()
            .filter(|c| c.symbol() == leg.symbol())
            .filter(|c| c.network.address == leg.network.address)
            .filter(|c| c.has_transaction_id())
            .filter(|c| c.transaction_type != TransactionType::Transfer)
            .filter(|c| c.transaction_type != leg.transaction_type)
            .collect();

        candidates.sort_by_key(|c| c.timestamp);

        // min_by_key keeps the first of equal minima
        candidates
            .into_iter()
            .min_by_key(|c| time_distance(c.timestamp, leg.timestamp))
    }
}

impl TransactionProcessor for FillTransactionIdProcessor {
    fn process(&self, transactions: &[Transaction]) -> Vec<Transaction> {
        let mut filled = 0usize;

        let processed: Vec<Transaction> = transactions
            .iter()
            .map(|leg| {
                if leg.has_transaction_id() {
                    return leg.clone();
                }

                match Self::find_counterpart(leg, transactions) {
                    Some(counterpart) => {
                        debug!(
                            "Filled missing id for {} {} leg at {} from {}: {}",
                            leg.transaction_type,
                            leg.symbol(),
                            leg.timestamp,
                            counterpart.source_name,
                            counterpart.transaction_id
                        );
                        filled += 1;
                        leg.with_transaction_id(counterpart.transaction_id.clone())
                    }
                    None => leg.clone(),
                }
            })
            .collect();

        debug!(
            "Reconciled {} of {} transactions without id",
            filled,
            transactions.iter().filter(|t| !t.has_transaction_id()).count()
        );

        processed
    }
}
