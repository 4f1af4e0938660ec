//! Transaction bookkeeping for the minilock scheduler.
//!
//! This crate owns the pieces of transaction state that do not depend on locking: the
//! registry with its timestamp generator, the sticky abort flag, the deferred-operation queue,
//! and the [`Operation`] type submitted to the scheduler.

pub mod error;
pub mod manager;
pub mod operation;
pub mod timestamp;
pub mod transaction;

pub use error::{TimestampError, TransactionError};
pub use manager::TransactionManager;
pub use operation::{Operation, OperationKind};
pub use timestamp::{Timestamp, TimestampGenerator};
pub use transaction::Transaction;
