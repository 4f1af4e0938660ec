use std::fmt::Debug;
use std::sync::Arc;

use smol_str::SmolStr;

use crate::error::CatalogResult;
use crate::table::TableRef;

pub type CatalogRef = Arc<dyn CatalogProvider>;

/// Resolves table names for the scheduler.
///
/// Implementations hand out immutable snapshots ([`TableRef`]); the rows a lock request covers
/// are the rows of the snapshot returned at request time.
pub trait CatalogProvider: Debug + Send + Sync {
    /// Retrieves a table by its name.
    fn lookup(&self, name: &str) -> CatalogResult<Option<TableRef>>;

    /// Returns the names of all tables, sorted.
    fn table_names(&self) -> CatalogResult<Vec<SmolStr>>;
}
