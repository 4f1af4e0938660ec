use miette::Diagnostic;
use minilock_catalog::error::CatalogError;
use minilock_parser::ParseError;
use minilock_scheduler::ScheduleError;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Parser(#[from] ParseError),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

pub type Result<T> = std::result::Result<T, Error>;
