//! # Outbound Ports
//!
//! Dependencies the swap engine drives: the module's key-value namespace and
//! the account ledger.

use crate::domain::{KVStoreError, LedgerError};
use serde::{Deserialize, Serialize};
use shared_types::{AccAddress, Coins};

/// Abstract interface for the module's key-value namespace.
///
/// Writes made during a block become durable at block commit; that commit
/// is the backend's concern.
pub trait KeyValueStore: Send + Sync {
    /// Get a value by key.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError>;

    /// Put a single key-value pair.
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError>;

    /// Delete a key.
    fn delete(&mut self, key: &[u8]) -> Result<(), KVStoreError>;

    /// Execute an atomic batch write.
    ///
    /// Either ALL operations in the batch succeed, or NONE are applied.
    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError>;

    /// Check if a key exists.
    fn exists(&self, key: &[u8]) -> Result<bool, KVStoreError>;

    /// All pairs whose key starts with `prefix`, in ascending key order.
    fn prefix_scan(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, KVStoreError>;
}

/// Batch operation for atomic writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOperation {
    /// Put a key-value pair.
    Put { key: Vec<u8>, value: Vec<u8> },
    /// Delete a key.
    Delete { key: Vec<u8> },
}

impl BatchOperation {
    /// Create a Put operation.
    pub fn put(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        BatchOperation::Put {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Create a Delete operation.
    pub fn delete(key: impl Into<Vec<u8>>) -> Self {
        BatchOperation::Delete { key: key.into() }
    }
}

/// Event attribute emitted by a transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Account/coin ledger shared with the other plugins.
///
/// Each `send_coins` call is atomic on its own. Callers that make several
/// transfers check balances with `has_coins` first.
pub trait LedgerKeeper: Send + Sync {
    /// Move `amount` from `from` to `to`, returning the transfer tags.
    fn send_coins(
        &self,
        from: &AccAddress,
        to: &AccAddress,
        amount: &Coins,
    ) -> Result<Vec<Tag>, LedgerError>;

    /// Balance of `address`.
    fn get_coins(&self, address: &AccAddress) -> Coins;

    /// Whether `address` holds at least `amount` of every denom.
    fn has_coins(&self, address: &AccAddress, amount: &Coins) -> bool {
        self.get_coins(address).is_all_gte(amount)
    }
}
