use std::sync::Arc;

use minilock_common::types::{PageIndex, RowId};
use serde::Serialize;
use smol_str::SmolStr;

pub type AreaRef = Arc<Area>;
pub type TableRef = Arc<Table>;

/// A storage area, the coarsest lockable granule. Tables belong to exactly one area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Area {
    name: SmolStr,
}

impl Area {
    #[inline]
    pub fn new(name: SmolStr) -> Self {
        Self { name }
    }

    #[inline]
    pub fn name(&self) -> &SmolStr {
        &self.name
    }
}

/// An ordered list of rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Page {
    rows: Vec<RowId>,
}

impl Page {
    #[inline]
    pub fn new(rows: Vec<RowId>) -> Self {
        Self { rows }
    }

    #[inline]
    pub fn rows(&self) -> &[RowId] {
        &self.rows
    }

    #[inline]
    pub(crate) fn push(&mut self, row: RowId) {
        self.rows.push(row);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    name: SmolStr,
    area: AreaRef,
    pages: Vec<Page>,
}

impl Table {
    #[inline]
    pub fn new(name: SmolStr, area: AreaRef) -> Self {
        Self {
            name,
            area,
            pages: Vec::new(),
        }
    }

    #[inline]
    pub fn name(&self) -> &SmolStr {
        &self.name
    }

    /// Returns the area owning this table.
    #[inline]
    pub fn area(&self) -> &AreaRef {
        &self.area
    }

    #[inline]
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Iterates over every row of the table, page by page.
    #[inline]
    pub fn rows(&self) -> impl Iterator<Item = RowId> + '_ {
        self.pages.iter().flat_map(|p| p.rows().iter().copied())
    }

    #[inline]
    pub fn num_rows(&self) -> usize {
        self.pages.iter().map(|p| p.rows().len()).sum()
    }

    /// Appends `row` to page `page`, growing the page list with empty pages if needed.
    pub(crate) fn insert_row(&mut self, row: RowId, page: PageIndex) {
        if page >= self.pages.len() {
            self.pages.resize_with(page + 1, Page::default);
        }
        self.pages[page].push(row);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_row_grows_pages() {
        let area = Arc::new(Area::new("A".into()));
        let mut table = Table::new("x".into(), area);
        table.insert_row(7, 2);
        assert_eq!(table.pages().len(), 3);
        assert!(table.pages()[0].rows().is_empty());
        assert_eq!(table.pages()[2].rows(), &[7]);
        table.insert_row(8, 0);
        assert_eq!(table.rows().collect::<Vec<_>>(), vec![8, 7]);
        assert_eq!(table.num_rows(), 2);
    }
}
