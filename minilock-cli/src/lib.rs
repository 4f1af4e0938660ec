mod cli;
mod script_executor;
mod shell;

pub use cli::Cli;
