//! Catalog of lockable resources.
//!
//! The scheduler never mutates the catalog. It only resolves table names into [`Table`]s and
//! walks their pages and rows when it has to lock them.

pub mod error;
pub mod memory;
pub mod provider;
pub mod table;

pub use table::{Area, AreaRef, Page, Table, TableRef};
