use std::error::Error;

use smol_str::SmolStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("table {table} already belongs to area {area}")]
    AreaMismatch { table: SmolStr, area: SmolStr },

    #[error(transparent)]
    External(#[from] Box<dyn Error + Send + Sync + 'static>),
}

pub type CatalogResult<T> = Result<T, CatalogError>;
