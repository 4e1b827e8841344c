//! Transaction entity - one leg of a double-entry event

use crate::domain::value_objects::amount::Amount;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Anything that can hold value: an exchange, a wallet, a bank account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Network {
    /// Bank, chain or importer name
    pub name: String,
    /// Account number, wallet address, etc.
    pub address: String,
}

impl Network {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
        }
    }
}

/// Double-entry category of a transaction leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Asset,
    Equity,
    Liability,
    Expense,
    Fee,
}

impl Category {
    pub fn name(&self) -> &str {
        match self {
            Category::Asset => "Asset",
            Category::Equity => "Equity",
            Category::Liability => "Liability",
            Category::Expense => "Expense",
            Category::Fee => "Fee",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Which side of a transfer a leg represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    /// Added value
    Credit,
    /// Removed value
    Debit,
    /// Moved value
    Transfer,
}

impl TransactionType {
    pub fn name(&self) -> &str {
        match self {
            TransactionType::Credit => "Credit",
            TransactionType::Debit => "Debit",
            TransactionType::Transfer => "Transfer",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// One leg of a double-entry event.
///
/// Two transactions sharing `transaction_id` with opposing types are the two
/// legs of one real-world transfer. The id may be blank when the originating
/// network does not report one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub timestamp: DateTime<Utc>,
    pub source_name: String,
    pub transaction_id: String,
    pub amount: Amount,
    pub network: Network,
    pub category: Category,
    pub transaction_type: TransactionType,
}

impl Transaction {
    pub fn new(
        timestamp: DateTime<Utc>,
        source_name: impl Into<String>,
        transaction_id: impl Into<String>,
        amount: Amount,
        network: Network,
        category: Category,
        transaction_type: TransactionType,
    ) -> Self {
        Self {
            timestamp,
            source_name: source_name.into(),
            transaction_id: transaction_id.into(),
            amount,
            network,
            category,
            transaction_type,
        }
    }

    pub fn has_transaction_id(&self) -> bool {
        !self.transaction_id.trim().is_empty()
    }

    pub fn symbol(&self) -> &str {
        self.amount.symbol()
    }

    /// Copy of this leg carrying `transaction_id`.
    pub fn with_transaction_id(&self, transaction_id: impl Into<String>) -> Self {
        Self {
            transaction_id: transaction_id.into(),
            ..self.clone()
        }
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:<10}]: {:<18} @ {} > {:<8} > {:<10} > {}",
            self.category,
            self.amount.to_string(),
            self.timestamp.format("%H:%M"),
            self.transaction_type,
            self.source_name,
            self.transaction_id
        )
    }
}
