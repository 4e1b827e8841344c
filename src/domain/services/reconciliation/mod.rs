//! Reconciliation module
//!
//! Processors that repair imported transaction batches before they are saved.
//! Some networks cannot report every detail through their APIs, so the whole
//! batch is enriched here once every importer has delivered.

pub mod fill_transaction_id;

pub use fill_transaction_id::FillTransactionIdProcessor;

use crate::domain::entities::transaction::Transaction;

/// Enriches a complete batch of transactions.
///
/// Implementations treat the input as immutable and return a new batch of the
/// same length and order.
pub trait TransactionProcessor: Send + Sync {
    fn process(&self, transactions: &[Transaction]) -> Vec<Transaction>;
}

/// Processor that returns the batch unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassThroughProcessor;

impl TransactionProcessor for PassThroughProcessor {
    fn process(&self, transactions: &[Transaction]) -> Vec<Transaction> {
        transactions.to_vec()
    }
}
