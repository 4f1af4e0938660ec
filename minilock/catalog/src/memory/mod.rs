use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Arc, RwLock};

use minilock_common::types::{PageIndex, RowId};
use smol_str::SmolStr;

use crate::error::{CatalogError, CatalogResult};
use crate::provider::CatalogProvider;
use crate::table::{Area, AreaRef, Table, TableRef};

#[derive(Debug, Default)]
pub struct MemoryCatalog {
    areas: RwLock<HashMap<SmolStr, AreaRef>>,
    tables: RwLock<HashMap<SmolStr, TableRef>>,
}

impl MemoryCatalog {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an area unless it already exists, and returns it.
    pub fn create_area(&self, name: &str) -> AreaRef {
        self.areas
            .write()
            .expect("the write lock should be acquired successfully")
            .entry(name.into())
            .or_insert_with(|| Arc::new(Area::new(name.into())))
            .clone()
    }

    /// Creates a table inside `area`, creating the area first if needed.
    ///
    /// Returns `false` if a table with the same name already exists in the same area. Fails if
    /// it exists in a different one.
    pub fn create_table(&self, name: &str, area: &str) -> CatalogResult<bool> {
        let area = self.create_area(area);
        match self
            .tables
            .write()
            .expect("the write lock should be acquired successfully")
            .entry(name.into())
        {
            Entry::Occupied(e) if e.get().area().name() == area.name() => Ok(false),
            Entry::Occupied(e) => Err(CatalogError::AreaMismatch {
                table: e.key().clone(),
                area: e.get().area().name().clone(),
            }),
            Entry::Vacant(e) => {
                e.insert(Arc::new(Table::new(name.into(), area)));
                Ok(true)
            }
        }
    }

    /// Appends a row to page `page` of `table`. Unknown tables are ignored and `false` is
    /// returned.
    ///
    /// Snapshots previously returned by [`CatalogProvider::lookup`] are not affected.
    pub fn insert_row(&self, table: &str, row: RowId, page: PageIndex) -> bool {
        let mut tables = self
            .tables
            .write()
            .expect("the write lock should be acquired successfully");
        match tables.get_mut(table) {
            Some(table) => {
                Arc::make_mut(table).insert_row(row, page);
                true
            }
            None => false,
        }
    }

    pub fn area_names(&self) -> Vec<SmolStr> {
        let mut names: Vec<_> = self
            .areas
            .read()
            .expect("the read lock should be acquired successfully")
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }
}

impl CatalogProvider for MemoryCatalog {
    #[inline]
    fn lookup(&self, name: &str) -> CatalogResult<Option<TableRef>> {
        Ok(self
            .tables
            .read()
            .expect("the read lock should be acquired successfully")
            .get(name)
            .cloned())
    }

    fn table_names(&self) -> CatalogResult<Vec<SmolStr>> {
        let mut names: Vec<_> = self
            .tables
            .read()
            .expect("the read lock should be acquired successfully")
            .keys()
            .cloned()
            .collect();
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_table_creates_area() {
        let catalog = MemoryCatalog::new();
        assert!(catalog.create_table("x", "A").unwrap());
        assert!(!catalog.create_table("x", "A").unwrap());
        assert_eq!(catalog.area_names(), vec!["A"]);
        let x = catalog.lookup("x").unwrap().unwrap();
        assert_eq!(x.area().name(), "A");
        assert!(x.pages().is_empty());
    }

    #[test]
    fn test_create_table_in_other_area() {
        let catalog = MemoryCatalog::new();
        catalog.create_table("x", "A").unwrap();
        let err = catalog.create_table("x", "B").unwrap_err();
        assert!(matches!(err, CatalogError::AreaMismatch { .. }));
        // The area is still created.
        assert_eq!(catalog.area_names(), vec!["A", "B"]);
    }

    #[test]
    fn test_insert_row() {
        let catalog = MemoryCatalog::new();
        catalog.create_table("x", "A").unwrap();
        let before = catalog.lookup("x").unwrap().unwrap();
        assert!(catalog.insert_row("x", 0, 0));
        assert!(catalog.insert_row("x", 1, 1));
        assert!(!catalog.insert_row("nope", 1, 1));
        let after = catalog.lookup("x").unwrap().unwrap();
        assert_eq!(before.num_rows(), 0);
        assert_eq!(after.pages().len(), 2);
        assert_eq!(after.rows().collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn test_lookup_missing() {
        let catalog = MemoryCatalog::new();
        catalog.create_table("y", "A").unwrap();
        catalog.create_table("u", "B").unwrap();
        assert!(catalog.lookup("x").unwrap().is_none());
        assert_eq!(catalog.table_names().unwrap(), vec!["u", "y"]);
    }
}
