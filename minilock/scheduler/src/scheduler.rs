//! The lock scheduler.
//!
//! Every operation is processed to completion on the caller's thread. An operation that cannot
//! be granted never blocks: its lock records are stored as waiting, the operation is parked in
//! the transaction's deferred queue, and it is replayed into the schedule once the transactions
//! it waits for have committed or been aborted.

use std::collections::BTreeSet;
use std::fmt;
use std::iter;

use minilock_catalog::provider::CatalogRef;
use minilock_catalog::{Table, TableRef};
use minilock_common::Granularity;
use minilock_common::types::TxnId;
use minilock_transaction::{Operation, OperationKind, Transaction, TransactionManager};
use serde::Serialize;
use smol_str::SmolStr;
use tracing::{debug, info};

use crate::error::{ScheduleError, ScheduleResult};
use crate::graph::WaitForGraph;
use crate::lock::{LockMode, LockObject, LockRecord, LockStatus};

/// Why a commit was not accepted. The caller may resubmit the commit later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CommitBlocker {
    /// The transaction still has waiting lock records.
    Waiting,
    /// The transaction still has deferred operations.
    Deferred,
    /// Some certify upgrades are blocked by readers of other transactions.
    Certify { pending: usize },
}

impl fmt::Display for CommitBlocker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Waiting => f.write_str("transaction has waiting locks"),
            Self::Deferred => f.write_str("transaction has deferred operations"),
            Self::Certify { pending } => write!(f, "{pending} certify locks pending"),
        }
    }
}

/// What happened to a submitted operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    /// Appended to the schedule.
    Scheduled,
    /// Parked in the transaction's deferred queue.
    Deferred,
    Committed,
    NotCommitted(CommitBlocker),
    /// The submitting transaction was chosen as a deadlock victim. The operation was dropped.
    Aborted,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scheduled => f.write_str("scheduled"),
            Self::Deferred => f.write_str("deferred"),
            Self::Committed => f.write_str("committed"),
            Self::NotCommitted(blocker) => write!(f, "not committed: {blocker}"),
            Self::Aborted => f.write_str("aborted"),
        }
    }
}

/// The result of scheduling one operation, with the side effects it had on other
/// transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleReport {
    pub outcome: Outcome,
    /// Transactions aborted to keep the wait-for graph acyclic, in abort order.
    pub aborted: Vec<TxnId>,
    /// Transactions whose waiting locks were granted and whose deferred operations were
    /// replayed into the schedule, in wake-up order.
    pub resumed: Vec<TxnId>,
}

impl ScheduleReport {
    #[inline]
    fn new(outcome: Outcome) -> Self {
        Self {
            outcome,
            aborted: Vec::new(),
            resumed: Vec::new(),
        }
    }
}

#[derive(Debug)]
pub struct Scheduler {
    catalog: CatalogRef,
    transactions: TransactionManager,
    /// Lock records in insertion order. Conflict checks scan them front to back.
    locks: Vec<LockRecord>,
    graph: WaitForGraph,
    scheduled: Vec<Operation>,
}

impl Scheduler {
    #[inline]
    pub fn new(catalog: CatalogRef) -> Self {
        Self::with_transactions(catalog, TransactionManager::new())
    }

    #[inline]
    pub fn with_transactions(catalog: CatalogRef, transactions: TransactionManager) -> Self {
        Self {
            catalog,
            transactions,
            locks: Vec::new(),
            graph: WaitForGraph::new(),
            scheduled: Vec::new(),
        }
    }

    /// Submits `op`.
    ///
    /// Fails without side effects if the table is unknown or if the transaction has been
    /// aborted. Otherwise the transaction is registered on first sight and the returned report
    /// describes what happened.
    pub fn schedule(&mut self, op: Operation) -> ScheduleResult<ScheduleReport> {
        let table = op.table().map(|name| self.resolve(name)).transpose()?;
        let txn = op.txn();
        if self.transactions.register(txn)?.is_aborted() {
            debug!(txn, %op, "rejected operation of aborted transaction");
            return Err(ScheduleError::TransactionAborted(txn));
        }

        let mut report = ScheduleReport::new(Outcome::Scheduled);
        let outcome = match (requested_mode(op.kind()), table) {
            (Some(mode), Some(table)) => self.acquire(op, mode, &table, &mut report),
            _ => self.commit(op, &mut report),
        };
        report.outcome = outcome;
        self.unwind_aborts(txn, &mut report);
        Ok(report)
    }

    /// Returns the catalog tables are resolved through.
    #[inline]
    pub fn catalog(&self) -> &CatalogRef {
        &self.catalog
    }

    /// Operations in the order they were scheduled.
    #[inline]
    pub fn scheduled(&self) -> &[Operation] {
        &self.scheduled
    }

    /// Lock records in insertion order.
    #[inline]
    pub fn locks(&self) -> &[LockRecord] {
        &self.locks
    }

    #[inline]
    pub fn locks_of(&self, txn: TxnId) -> impl Iterator<Item = &LockRecord> {
        self.locks.iter().filter(move |l| l.txn() == txn)
    }

    #[inline]
    pub fn wait_for_graph(&self) -> &WaitForGraph {
        &self.graph
    }

    #[inline]
    pub fn transactions(&self) -> &TransactionManager {
        &self.transactions
    }

    fn resolve(&self, name: &SmolStr) -> ScheduleResult<TableRef> {
        self.catalog
            .lookup(name)?
            .ok_or_else(|| ScheduleError::TableNotFound(name.clone()))
    }

    /// Requests the locks of a read or write, from the requested granularity out to the area.
    fn acquire(
        &mut self,
        op: Operation,
        mode: LockMode,
        table: &Table,
        report: &mut ScheduleReport,
    ) -> Outcome {
        let txn = op.txn();
        // Operations of a transaction never overtake its deferred ones.
        let queued = self
            .transactions
            .get(txn)
            .is_some_and(Transaction::has_deferred);
        let mut wait = queued;
        for granularity in op.granularity().up_to_area() {
            let mode = if granularity == op.granularity() {
                mode
            } else {
                mode.intent()
            };
            wait |= self.request(txn, table, granularity, mode, queued, report);
            if self.transactions.is_aborted(txn) {
                info!(txn, %op, "operation dropped, transaction aborted");
                return Outcome::Aborted;
            }
        }

        if wait {
            debug!(txn, %op, "operation deferred");
            if let Some(transaction) = self.transactions.get_mut(txn) {
                transaction.defer(op);
            }
            Outcome::Deferred
        } else {
            debug!(txn, %op, "operation scheduled");
            self.scheduled.push(op);
            Outcome::Scheduled
        }
    }

    /// Records the locks of one granularity level. Returns `true` if they have to wait.
    fn request(
        &mut self,
        txn: TxnId,
        table: &Table,
        granularity: Granularity,
        mode: LockMode,
        queued: bool,
        report: &mut ScheduleReport,
    ) -> bool {
        let conflict = self.conflicting_holder(txn, table.name(), mode);
        let status = if conflict.is_some() || queued {
            LockStatus::Waiting
        } else {
            LockStatus::Granted
        };
        let objects: Vec<_> = match granularity {
            Granularity::Row => table.rows().map(LockObject::Row).collect(),
            Granularity::Page => iter::repeat_n(LockObject::Granule, table.pages().len()).collect(),
            Granularity::Table | Granularity::Area => vec![LockObject::Granule],
        };
        debug!(
            txn,
            table = %table.name(),
            %granularity,
            %mode,
            %status,
            records = objects.len(),
            "requested locks"
        );
        self.locks.extend(objects.into_iter().map(|object| {
            LockRecord::new(txn, table.name().clone(), object, mode, status, granularity)
        }));

        if let Some(holder) = conflict {
            self.add_wait_for_edge(txn, holder, report);
        }
        status == LockStatus::Waiting
    }

    /// Returns the owner of the first non-waiting record of another transaction on `table`
    /// whose mode is incompatible with `mode`.
    fn conflicting_holder(&self, txn: TxnId, table: &str, mode: LockMode) -> Option<TxnId> {
        self.locks
            .iter()
            .find(|l| {
                l.txn() != txn
                    && !l.is_waiting()
                    && l.table() == table
                    && !mode.is_compatible_with(l.mode())
            })
            .map(LockRecord::txn)
    }

    /// Makes `waiter` wait for `holder`. If that would close a cycle, the younger of the two is
    /// aborted instead.
    fn add_wait_for_edge(&mut self, waiter: TxnId, holder: TxnId, report: &mut ScheduleReport) {
        if waiter == holder {
            return;
        }
        if self.graph.add_edge(waiter, holder) {
            debug!(waiter, holder, "added wait-for edge");
            return;
        }
        let timestamp = |txn| self.transactions.get(txn).map(Transaction::timestamp);
        let victim = if timestamp(waiter) > timestamp(holder) {
            waiter
        } else {
            holder
        };
        info!(waiter, holder, victim, "deadlock avoided, aborting transaction");
        self.abort(victim);
        report.aborted.push(victim);
    }

    /// Marks `txn` as aborted and drops all of its lock records. The wait-for graph and the
    /// deferred queue are left alone; see [`Self::unwind_aborts`].
    fn abort(&mut self, txn: TxnId) {
        if let Some(transaction) = self.transactions.get_mut(txn) {
            transaction.abort();
        }
        self.locks.retain(|l| l.txn() != txn);
    }

    /// Removes the victims of this operation from the wait-for graph, then resumes whoever
    /// no longer waits for anything.
    fn unwind_aborts(&mut self, requester: TxnId, report: &mut ScheduleReport) {
        if report.aborted.is_empty() {
            return;
        }
        let mut candidates = BTreeSet::new();
        for &victim in &report.aborted {
            candidates.extend(self.graph.remove_vertex(victim));
        }
        candidates.insert(requester);
        self.wake(candidates, report);
    }

    /// Runs the commit protocol: certify upgrade, release of read locks, wake-up.
    fn commit(&mut self, op: Operation, report: &mut ScheduleReport) -> Outcome {
        let txn = op.txn();
        if self.locks_of(txn).any(LockRecord::is_waiting) {
            debug!(txn, "commit rejected, transaction has waiting locks");
            return Outcome::NotCommitted(CommitBlocker::Waiting);
        }
        if self
            .transactions
            .get(txn)
            .is_some_and(Transaction::has_deferred)
        {
            debug!(txn, "commit rejected, transaction has deferred operations");
            return Outcome::NotCommitted(CommitBlocker::Deferred);
        }

        // Waiting readers count too.
        let read_tables: BTreeSet<_> = self
            .locks
            .iter()
            .filter(|l| l.txn() != txn && l.mode().is_read_family())
            .map(|l| l.table().clone())
            .collect();
        let mut pending = 0;
        for lock in self.locks.iter_mut().filter(|l| {
            l.txn() == txn && (l.mode().is_write_family() || l.status() == LockStatus::Converting)
        }) {
            lock.set_mode(lock.mode().certified());
            if read_tables.contains(lock.table()) {
                lock.set_status(LockStatus::Converting);
                pending += 1;
            } else {
                lock.set_status(LockStatus::Granted);
            }
        }
        if pending > 0 {
            info!(txn, pending, "commit rejected, certify locks pending");
            return Outcome::NotCommitted(CommitBlocker::Certify { pending });
        }

        self.locks
            .retain(|l| l.txn() != txn || !l.mode().is_read_family());
        let waiters = self.graph.remove_vertex(txn);
        info!(txn, waiters = waiters.len(), "transaction committed");
        self.scheduled.push(op);
        self.wake(waiters, report);
        Outcome::Committed
    }

    /// Resumes every candidate that is alive and no longer waits for anyone.
    fn wake(&mut self, candidates: impl IntoIterator<Item = TxnId>, report: &mut ScheduleReport) {
        for txn in candidates {
            if self.graph.has_outgoing_edge(txn) || self.transactions.is_aborted(txn) {
                continue;
            }
            let mut resumed = false;
            for lock in self
                .locks
                .iter_mut()
                .filter(|l| l.txn() == txn && l.is_waiting())
            {
                lock.set_status(LockStatus::Granted);
                resumed = true;
            }
            if let Some(transaction) = self.transactions.get_mut(txn) {
                let deferred = transaction.take_deferred();
                resumed |= !deferred.is_empty();
                self.scheduled.extend(deferred);
            }
            if resumed {
                info!(txn, "transaction resumed");
                report.resumed.push(txn);
            }
        }
    }
}

/// The base lock mode of a read or write. Commits take no new locks.
#[inline]
fn requested_mode(kind: &OperationKind) -> Option<LockMode> {
    match kind {
        OperationKind::Read { is_update, .. } => Some(LockMode::read(*is_update, false)),
        OperationKind::Write { .. } => Some(LockMode::write(false)),
        OperationKind::Commit => None,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use minilock_catalog::memory::MemoryCatalog;

    use super::*;

    fn scheduler() -> Scheduler {
        let catalog = MemoryCatalog::new();
        catalog.create_table("x", "A").unwrap();
        catalog.create_table("y", "A").unwrap();
        for row in 0..4 {
            catalog.insert_row("x", row, (row / 2) as usize);
            catalog.insert_row("y", row, (row / 2) as usize);
        }
        Scheduler::new(Arc::new(catalog))
    }

    #[test]
    fn test_requested_mode() {
        assert_eq!(
            requested_mode(Operation::read_for_update(1, "x").kind()),
            Some(LockMode::Update)
        );
        assert_eq!(requested_mode(Operation::commit(1).kind()), None);
    }

    #[test]
    fn test_abort_keeps_graph_and_queue() {
        let mut s = scheduler();
        s.schedule(Operation::write(1, "x")).unwrap();
        let report = s.schedule(Operation::write(2, "x")).unwrap();
        assert_eq!(report.outcome, Outcome::Deferred);

        s.abort(2);
        assert!(s.transactions().is_aborted(2));
        assert_eq!(s.locks_of(2).count(), 0);
        assert!(s.wait_for_graph().has_outgoing_edge(2));
        assert!(s.transactions().get(2).unwrap().has_deferred());
    }

    #[test]
    fn test_conflicting_holder_skips_waiting_and_own_records() {
        let mut s = scheduler();
        s.schedule(Operation::write(1, "x")).unwrap();
        s.schedule(Operation::write(2, "x")).unwrap();
        // T2's records are waiting, so only T1 is reported.
        assert_eq!(s.conflicting_holder(3, "x", LockMode::Write), Some(1));
        assert_eq!(s.conflicting_holder(1, "x", LockMode::Write), None);
        assert_eq!(s.conflicting_holder(3, "y", LockMode::Write), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Outcome::NotCommitted(CommitBlocker::Certify { pending: 2 }).to_string(),
            "not committed: 2 certify locks pending"
        );
        assert_eq!(Outcome::Deferred.to_string(), "deferred");
    }
}
