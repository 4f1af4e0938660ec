//! Wait-for graph used for deadlock avoidance.
//!
//! An edge `a -> b` means transaction `a` waits for a lock held by `b`. The graph refuses any
//! edge that would close a cycle, so it is acyclic at all times.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use itertools::Itertools;
use minilock_common::types::TxnId;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WaitForGraph {
    edges: BTreeMap<TxnId, BTreeSet<TxnId>>,
}

impl WaitForGraph {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the edge `waiter -> holder`.
    ///
    /// Returns `false` and leaves the graph unchanged if `waiter == holder` or if `holder`
    /// already reaches `waiter`. Both ends become vertices on success.
    pub fn add_edge(&mut self, waiter: TxnId, holder: TxnId) -> bool {
        if self.reaches(holder, waiter) {
            return false;
        }
        self.edges.entry(waiter).or_default().insert(holder);
        self.edges.entry(holder).or_default();
        true
    }

    /// Removes `txn` and every edge pointing at it. Returns the transactions that were waiting
    /// for `txn`, in ascending order.
    pub fn remove_vertex(&mut self, txn: TxnId) -> Vec<TxnId> {
        self.edges.remove(&txn);
        self.edges
            .iter_mut()
            .filter_map(|(&waiter, holders)| holders.remove(&txn).then_some(waiter))
            .collect()
    }

    #[inline]
    pub fn has_outgoing_edge(&self, txn: TxnId) -> bool {
        self.edges.get(&txn).is_some_and(|holders| !holders.is_empty())
    }

    #[inline]
    pub fn contains(&self, txn: TxnId) -> bool {
        self.edges.contains_key(&txn)
    }

    /// Returns `true` if a path leads from `from` to `to`. Every vertex reaches itself.
    pub fn reaches(&self, from: TxnId, to: TxnId) -> bool {
        let mut visited = BTreeSet::new();
        let mut stack = vec![from];
        while let Some(txn) = stack.pop() {
            if txn == to {
                return true;
            }
            if !visited.insert(txn) {
                continue;
            }
            if let Some(holders) = self.edges.get(&txn) {
                stack.extend(holders.iter().copied().filter(|h| !visited.contains(h)));
            }
        }
        false
    }

    /// Returns `true` if any cycle exists. Only reachable through a bug, since
    /// [`add_edge`](Self::add_edge) never closes one.
    pub fn has_cycle(&self) -> bool {
        self.edges
            .iter()
            .any(|(&waiter, holders)| holders.iter().any(|&h| self.reaches(h, waiter)))
    }

    /// The transactions `txn` waits for.
    #[inline]
    pub fn holders(&self, txn: TxnId) -> impl Iterator<Item = TxnId> + '_ {
        self.edges.get(&txn).into_iter().flatten().copied()
    }

    #[inline]
    pub fn adjacency(&self) -> &BTreeMap<TxnId, BTreeSet<TxnId>> {
        &self.edges
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.values().map(BTreeSet::len).sum()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

/// One `waiter -> holder...` line per vertex with outgoing edges.
impl fmt::Display for WaitForGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (waiter, holders) in self.edges.iter().filter(|(_, h)| !h.is_empty()) {
            writeln!(f, "{waiter} -> {}", holders.iter().join(" "))?;
        }
        Ok(())
    }
}
