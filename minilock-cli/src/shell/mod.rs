mod command;
mod context;
mod editor;
mod output;

use clap::Args;
use command::build_command;
use context::ShellContext;
use editor::build_editor;
use miette::Result;
use output::OutputMode;

use crate::cli::DatabaseArgs;

/// Start local interactive shell.
#[derive(Debug, Args, Clone)]
pub struct ShellArgs {
    /// Set output mode.
    #[arg(long, default_value = "sharp")]
    mode: OutputMode,

    #[command(flatten)]
    database: DatabaseArgs,
}

impl ShellArgs {
    pub fn run(self) -> Result<()> {
        let db = self.database.open()?;
        let session = db.session()?;
        let tables = session
            .tables()?
            .iter()
            .map(|table| table.name().to_string())
            .collect();
        let editor = build_editor(tables)?;
        let command = build_command();
        let context = ShellContext {
            database: db,
            session,
            editor,
            command,
            should_quit: false,
            mode: self.mode,
        };
        context.run()
    }
}
