//! Multi-granularity two-version two-phase locking.
//!
//! The [`Scheduler`] grants locks from rows up to areas with intention locks at every coarser
//! level, upgrades write locks to certify locks at commit time, and keeps a [`WaitForGraph`]
//! acyclic by aborting the younger transaction whenever a wait would close a cycle.

pub mod compat;
pub mod error;
pub mod graph;
pub mod lock;
pub mod scheduler;

pub use compat::compatible;
pub use error::{ScheduleError, ScheduleResult};
pub use graph::WaitForGraph;
pub use lock::{LockMode, LockObject, LockRecord, LockStatus};
pub use scheduler::{CommitBlocker, Outcome, ScheduleReport, Scheduler};
