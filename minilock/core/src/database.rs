use std::sync::Arc;

use minilock_catalog::memory::MemoryCatalog;
use minilock_common::types::RowId;
use tracing::debug;

use crate::error::Result;
use crate::session::Session;

/// Tables created by [`DatabaseConfig::demo_tables`], with the area each one belongs to.
pub const DEMO_TABLES: [(&str, &str); 5] = [
    ("x", "A"),
    ("y", "A"),
    ("z", "A"),
    ("u", "B"),
    ("v", "B"),
];

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub pages_per_table: usize,
    pub rows_per_page: usize,
    /// Whether to create [`DEMO_TABLES`] when the database is opened.
    pub demo_tables: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            pages_per_table: 2,
            rows_per_page: 5,
            demo_tables: true,
        }
    }
}

pub struct Database {
    catalog: Arc<MemoryCatalog>,
}

impl Database {
    pub fn open_in_memory(config: &DatabaseConfig) -> Result<Self> {
        let catalog = MemoryCatalog::new();
        if config.demo_tables {
            populate_demo_tables(&catalog, config)?;
        }
        Ok(Self {
            catalog: Arc::new(catalog),
        })
    }

    /// The catalog shared by every session of this database. New tables and rows are visible
    /// to operations scheduled afterwards.
    #[inline]
    pub fn catalog(&self) -> &Arc<MemoryCatalog> {
        &self.catalog
    }

    /// Creates a session with its own scheduler.
    pub fn session(&self) -> Result<Session> {
        Ok(Session::new(self.catalog.clone()))
    }
}

/// Numbers rows consecutively across pages, so with the default layout table `x` holds rows
/// `0..5` on page 0 and `5..10` on page 1.
fn populate_demo_tables(catalog: &MemoryCatalog, config: &DatabaseConfig) -> Result<()> {
    for (table, area) in DEMO_TABLES {
        catalog.create_table(table, area)?;
        for page in 0..config.pages_per_table {
            for slot in 0..config.rows_per_page {
                let row = (page * config.rows_per_page + slot) as RowId;
                catalog.insert_row(table, row, page);
            }
        }
    }
    debug!(
        tables = DEMO_TABLES.len(),
        pages = config.pages_per_table,
        rows = config.rows_per_page,
        "created demo tables"
    );
    Ok(())
}
