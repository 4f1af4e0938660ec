use std::fmt;
use std::sync::Arc;

use itertools::Itertools;
use minilock_catalog::TableRef;
use minilock_catalog::memory::MemoryCatalog;
use minilock_catalog::provider::CatalogProvider;
use minilock_parser::parse_schedule;
use minilock_scheduler::{Outcome, ScheduleError, ScheduleReport, ScheduleResult, Scheduler};
use minilock_transaction::Operation;
use tracing::debug;

use crate::error::Result;

/// The result of one operation of an executed schedule.
#[derive(Debug)]
pub struct Step {
    op: Operation,
    result: ScheduleResult<ScheduleReport>,
}

impl Step {
    #[inline]
    pub fn op(&self) -> &Operation {
        &self.op
    }

    #[inline]
    pub fn result(&self) -> &ScheduleResult<ScheduleReport> {
        &self.result
    }

    /// Returns the outcome, or `None` if the operation was rejected.
    #[inline]
    pub fn outcome(&self) -> Option<Outcome> {
        self.result.as_ref().ok().map(|report| report.outcome)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = match &self.result {
            Ok(report) => report,
            Err(e) => return write!(f, "{}: rejected, {e}", self.op),
        };
        write!(f, "{}: {}", self.op, report.outcome)?;
        if !report.aborted.is_empty() {
            write!(f, "; aborted {}", report.aborted.iter().join(", "))?;
        }
        if !report.resumed.is_empty() {
            write!(f, "; resumed {}", report.resumed.iter().join(", "))?;
        }
        Ok(())
    }
}

/// A scheduling session over the catalog of a [`Database`](crate::database::Database).
///
/// Each session owns its scheduler, so transactions of different sessions never see each
/// other's locks.
pub struct Session {
    catalog: Arc<MemoryCatalog>,
    scheduler: Scheduler,
}

impl Session {
    pub(crate) fn new(catalog: Arc<MemoryCatalog>) -> Self {
        let scheduler = Scheduler::new(catalog.clone());
        Self { catalog, scheduler }
    }

    /// Parses `schedule` and submits its operations in order.
    ///
    /// The whole schedule is rejected before anything is submitted if it does not parse or if
    /// it names an unknown table. Operations rejected by the scheduler afterwards, e.g. those
    /// of aborted transactions, are reported in their [`Step`] and do not stop the schedule.
    pub fn execute(&mut self, schedule: &str) -> Result<Vec<Step>> {
        let ops = parse_schedule(schedule)?;
        for table in ops.iter().filter_map(Operation::table) {
            if self.catalog.lookup(table)?.is_none() {
                return Err(ScheduleError::TableNotFound(table.clone()).into());
            }
        }
        debug!(operations = ops.len(), "executing schedule");
        Ok(ops
            .into_iter()
            .map(|op| {
                let result = self.scheduler.schedule(op.clone());
                Step { op, result }
            })
            .collect())
    }

    /// Submits a single operation.
    pub fn schedule(&mut self, op: Operation) -> Result<ScheduleReport> {
        Ok(self.scheduler.schedule(op)?)
    }

    #[inline]
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Returns every table of the catalog, sorted by name.
    pub fn tables(&self) -> Result<Vec<TableRef>> {
        let mut tables = Vec::new();
        for name in self.catalog.table_names()? {
            tables.extend(self.catalog.lookup(&name)?);
        }
        Ok(tables)
    }
}
