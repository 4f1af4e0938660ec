use std::collections::VecDeque;

use minilock_common::types::TxnId;
use serde::Serialize;

use crate::operation::Operation;
use crate::timestamp::Timestamp;

/// Bookkeeping for one transaction.
///
/// Transactions live as long as the registry that created them. Aborting one only sets a
/// sticky flag; it stays registered so that its later operations can be recognized and
/// rejected.
#[derive(Debug, Clone, Serialize)]
pub struct Transaction {
    id: TxnId,
    timestamp: Timestamp,
    aborted: bool,
    /// Operations that could not be scheduled yet, in submission order.
    deferred: VecDeque<Operation>,
}

impl Transaction {
    #[inline]
    pub(crate) fn new(id: TxnId, timestamp: Timestamp) -> Self {
        Self {
            id,
            timestamp,
            aborted: false,
            deferred: VecDeque::new(),
        }
    }

    #[inline]
    pub fn id(&self) -> TxnId {
        self.id
    }

    #[inline]
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    #[inline]
    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    /// Marks the transaction as aborted. There is no way back.
    #[inline]
    pub fn abort(&mut self) {
        self.aborted = true;
    }

    #[inline]
    pub fn deferred(&self) -> &VecDeque<Operation> {
        &self.deferred
    }

    #[inline]
    pub fn has_deferred(&self) -> bool {
        !self.deferred.is_empty()
    }

    #[inline]
    pub fn defer(&mut self, op: Operation) {
        self.deferred.push_back(op);
    }

    /// Empties the deferred queue, yielding operations in submission order.
    #[inline]
    pub fn take_deferred(&mut self) -> VecDeque<Operation> {
        std::mem::take(&mut self.deferred)
    }
}
