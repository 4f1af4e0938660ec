use minilock_common::types::TxnId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimestampError {
    #[error("timestamp overflow, reached {0}")]
    Overflow(u64),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransactionError {
    #[error("cannot register transaction {txn}")]
    Register {
        txn: TxnId,
        #[source]
        source: TimestampError,
    },
}
