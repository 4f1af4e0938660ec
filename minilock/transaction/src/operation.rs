use std::fmt;

use minilock_common::Granularity;
use minilock_common::types::TxnId;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// What an operation does. Tables are referenced by name and resolved through the catalog
/// when the operation is scheduled.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    /// Reads a table. With `is_update` set, the read announces a later write and takes update
    /// locks instead of read locks.
    Read { table: SmolStr, is_update: bool },
    Write { table: SmolStr },
    Commit,
}

/// An operation submitted by a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Operation {
    txn: TxnId,
    kind: OperationKind,
    granularity: Granularity,
}

impl Operation {
    #[inline]
    pub fn new(txn: TxnId, kind: OperationKind, granularity: Granularity) -> Self {
        Self {
            txn,
            kind,
            granularity,
        }
    }

    /// A row-level read.
    #[inline]
    pub fn read(txn: TxnId, table: impl Into<SmolStr>) -> Self {
        Self::new(
            txn,
            OperationKind::Read {
                table: table.into(),
                is_update: false,
            },
            Granularity::Row,
        )
    }

    /// A row-level read with update intent.
    #[inline]
    pub fn read_for_update(txn: TxnId, table: impl Into<SmolStr>) -> Self {
        Self::new(
            txn,
            OperationKind::Read {
                table: table.into(),
                is_update: true,
            },
            Granularity::Row,
        )
    }

    /// A row-level write.
    #[inline]
    pub fn write(txn: TxnId, table: impl Into<SmolStr>) -> Self {
        Self::new(
            txn,
            OperationKind::Write {
                table: table.into(),
            },
            Granularity::Row,
        )
    }

    #[inline]
    pub fn commit(txn: TxnId) -> Self {
        Self::new(txn, OperationKind::Commit, Granularity::Row)
    }

    #[inline]
    pub fn with_granularity(mut self, granularity: Granularity) -> Self {
        self.granularity = granularity;
        self
    }

    #[inline]
    pub fn txn(&self) -> TxnId {
        self.txn
    }

    #[inline]
    pub fn kind(&self) -> &OperationKind {
        &self.kind
    }

    #[inline]
    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// Returns the table this operation touches, if any.
    #[inline]
    pub fn table(&self) -> Option<&SmolStr> {
        match &self.kind {
            OperationKind::Read { table, .. } | OperationKind::Write { table } => Some(table),
            OperationKind::Commit => None,
        }
    }
}

/// Formats the operation in schedule notation, e.g. `r1(x)`, `r2(y updl tabl)`, `c1`.
impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (op, table, is_update) = match &self.kind {
            OperationKind::Read { table, is_update } => ('r', table, *is_update),
            OperationKind::Write { table } => ('w', table, false),
            OperationKind::Commit => return write!(f, "c{}", self.txn),
        };
        write!(f, "{op}{}({table}", self.txn)?;
        if is_update {
            f.write_str(" updl")?;
        }
        match self.granularity {
            Granularity::Row => (),
            Granularity::Page => f.write_str(" pagl")?,
            Granularity::Table => f.write_str(" tabl")?,
            Granularity::Area => f.write_str(" arel")?,
        }
        f.write_str(")")
    }
}
