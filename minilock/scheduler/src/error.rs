use minilock_catalog::error::CatalogError;
use minilock_common::types::TxnId;
use minilock_transaction::TransactionError;
use smol_str::SmolStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("table {0} not found")]
    TableNotFound(SmolStr),

    #[error("transaction {0} has been aborted")]
    TransactionAborted(TxnId),

    #[error(transparent)]
    Transaction(#[from] TransactionError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
