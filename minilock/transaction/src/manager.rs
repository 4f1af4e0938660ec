//! Transaction registry.
//!
//! The manager assigns a timestamp to every transaction identifier the first time it is seen
//! and keeps the transaction around for the rest of the run.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use minilock_common::types::TxnId;

use crate::error::TransactionError;
use crate::timestamp::TimestampGenerator;
use crate::transaction::Transaction;

#[derive(Debug, Default)]
pub struct TransactionManager {
    transactions: BTreeMap<TxnId, Transaction>,
    timestamps: TimestampGenerator,
}

impl TransactionManager {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a manager that draws timestamps from the given generator.
    #[inline]
    pub fn with_timestamps(timestamps: TimestampGenerator) -> Self {
        Self {
            transactions: BTreeMap::new(),
            timestamps,
        }
    }

    /// Returns the transaction for `id`, registering it with the next timestamp if it has not
    /// been seen before. Repeated calls with the same `id` do not consume timestamps.
    pub fn register(&mut self, id: TxnId) -> Result<&mut Transaction, TransactionError> {
        match self.transactions.entry(id) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let timestamp = self
                    .timestamps
                    .next()
                    .map_err(|source| TransactionError::Register { txn: id, source })?;
                Ok(entry.insert(Transaction::new(id, timestamp)))
            }
        }
    }

    #[inline]
    pub fn get(&self, id: TxnId) -> Option<&Transaction> {
        self.transactions.get(&id)
    }

    #[inline]
    pub fn get_mut(&mut self, id: TxnId) -> Option<&mut Transaction> {
        self.transactions.get_mut(&id)
    }

    /// Returns `true` if `id` is registered and has been aborted.
    #[inline]
    pub fn is_aborted(&self, id: TxnId) -> bool {
        self.get(id).is_some_and(Transaction::is_aborted)
    }

    /// Iterates over all transactions in identifier order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.values()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TimestampError;
    use crate::operation::Operation;

    #[test]
    fn test_register_is_idempotent() {
        let mut manager = TransactionManager::new();
        let ts = manager.register(7).unwrap().timestamp();
        manager.register(3).unwrap();
        assert_eq!(manager.register(7).unwrap().timestamp(), ts);
        assert_eq!(manager.len(), 2);
    }

    #[test]
    fn test_timestamps_follow_registration_order() {
        let mut manager = TransactionManager::new();
        manager.register(9).unwrap();
        manager.register(2).unwrap();
        let t9 = manager.get(9).unwrap().timestamp();
        let t2 = manager.get(2).unwrap().timestamp();
        assert!(t9 < t2);
    }

    #[test]
    fn test_get_unknown() {
        let manager = TransactionManager::new();
        assert!(manager.get(1).is_none());
        assert!(!manager.is_aborted(1));
    }

    #[test]
    fn test_abort_is_sticky() {
        let mut manager = TransactionManager::new();
        manager.register(1).unwrap().abort();
        manager.register(1).unwrap();
        assert!(manager.is_aborted(1));
    }

    #[test]
    fn test_deferred_queue_order() {
        let mut manager = TransactionManager::new();
        let txn = manager.register(1).unwrap();
        txn.defer(Operation::write(1, "x"));
        txn.defer(Operation::read(1, "x"));
        assert!(txn.has_deferred());
        let ops: Vec<_> = txn.take_deferred().into_iter().collect();
        assert_eq!(ops, vec![Operation::write(1, "x"), Operation::read(1, "x")]);
        assert!(!manager.get(1).unwrap().has_deferred());
    }

    #[test]
    fn test_register_overflow() {
        let mut manager = TransactionManager::with_timestamps(TimestampGenerator::with_start(
            u64::MAX,
        ));
        let err = manager.register(1).unwrap_err();
        assert_eq!(err, TransactionError::Register {
            txn: 1,
            source: TimestampError::Overflow(u64::MAX),
        });
        assert!(manager.is_empty());
    }
}
