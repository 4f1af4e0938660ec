use std::fmt::Display;

use clap::Command;
use miette::{IntoDiagnostic, Result};
use minilock::database::Database;
use minilock::display::TableOptions;
use minilock::session::Session;
use rustyline::error::ReadlineError;
use tracing::info;

use super::OutputMode;
use super::command::ShellCommand;
use super::editor::ShellEditor;

const PROLOGUE: &str = r#"Enter ":help" for usage hints."#;

pub struct ShellContext {
    pub database: Database,
    pub session: Session,
    pub editor: ShellEditor,
    pub command: Command,
    pub should_quit: bool,
    pub mode: OutputMode,
}

impl ShellContext {
    pub fn run(mut self) -> Result<()> {
        println!("{}", PROLOGUE);
        while !self.should_quit {
            let result = match self.editor.readline("minilock> ") {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    } else if trimmed.starts_with(':') {
                        ShellCommand::execute_from_input(&mut self, trimmed)
                    } else {
                        self.execute_schedule(trimmed)
                    }
                }
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => return Ok(()),
                Err(e) => return Err(e).into_diagnostic(),
            };
            // Handle recoverable errors.
            if let Err(e) = result {
                println!("{e:?}");
            }
        }
        Ok(())
    }

    /// Submits `schedule` to the session and prints one line per operation.
    pub fn execute_schedule(&mut self, schedule: &str) -> Result<()> {
        for step in self.session.execute(schedule)? {
            println!("{step}");
        }
        Ok(())
    }

    /// Replaces the session, forgetting every transaction, lock and wait-for edge.
    pub fn reset(&mut self) -> Result<()> {
        self.session = self.database.session()?;
        info!("started a new session");
        Ok(())
    }

    #[inline]
    pub fn options(&self) -> TableOptions {
        TableOptions::new().with_style(self.mode.into())
    }

    pub fn print(&self, table: impl Display) {
        println!("{table}");
    }
}
