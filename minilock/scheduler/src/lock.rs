use std::fmt;

use minilock_common::Granularity;
use minilock_common::types::{RowId, TxnId};
use serde::Serialize;
use smol_str::SmolStr;
use strum::{Display, EnumIter, VariantNames};

/// Lock modes of two-version two-phase locking, with their intent variants.
///
/// Modes render as the short codes used in lock tables: `r w u c ir iw iu ic`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, VariantNames, Serialize,
)]
pub enum LockMode {
    #[strum(serialize = "r")]
    Read,
    #[strum(serialize = "w")]
    Write,
    #[strum(serialize = "u")]
    Update,
    #[strum(serialize = "c")]
    Certify,
    #[strum(serialize = "ir")]
    IntentRead,
    #[strum(serialize = "iw")]
    IntentWrite,
    #[strum(serialize = "iu")]
    IntentUpdate,
    #[strum(serialize = "ic")]
    IntentCertify,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, VariantNames, Serialize,
)]
#[strum(serialize_all = "lowercase")]
pub enum LockStatus {
    Granted,
    /// A certify upgrade that is blocked by readers of another transaction.
    Converting,
    Waiting,
}

/// The object a lock record covers inside its table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LockObject {
    Row(RowId),
    /// The whole granule the record was taken at: a page, the table, or the area.
    Granule,
}

impl fmt::Display for LockObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Row(id) => write!(f, "{id}"),
            Self::Granule => f.write_str("*"),
        }
    }
}

/// A lock held or requested by a transaction.
///
/// Records are keyed by table name. Area locks are also recorded against the table they were
/// requested through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LockRecord {
    txn: TxnId,
    table: SmolStr,
    object: LockObject,
    mode: LockMode,
    status: LockStatus,
    granularity: Granularity,
}

impl LockRecord {
    #[inline]
    pub fn new(
        txn: TxnId,
        table: SmolStr,
        object: LockObject,
        mode: LockMode,
        status: LockStatus,
        granularity: Granularity,
    ) -> Self {
        Self {
            txn,
            table,
            object,
            mode,
            status,
            granularity,
        }
    }

    #[inline]
    pub fn txn(&self) -> TxnId {
        self.txn
    }

    #[inline]
    pub fn table(&self) -> &SmolStr {
        &self.table
    }

    #[inline]
    pub fn object(&self) -> LockObject {
        self.object
    }

    #[inline]
    pub fn mode(&self) -> LockMode {
        self.mode
    }

    #[inline]
    pub fn status(&self) -> LockStatus {
        self.status
    }

    #[inline]
    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    #[inline]
    pub fn is_waiting(&self) -> bool {
        self.status == LockStatus::Waiting
    }

    #[inline]
    pub(crate) fn set_mode(&mut self, mode: LockMode) {
        self.mode = mode;
    }

    #[inline]
    pub(crate) fn set_status(&mut self, status: LockStatus) {
        self.status = status;
    }
}
