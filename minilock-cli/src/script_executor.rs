use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use itertools::Itertools;
use miette::{IntoDiagnostic, Result, WrapErr};
use minilock::session::Session;
use tracing::debug;

use crate::cli::DatabaseArgs;

#[derive(Debug, Args, Clone)]
pub struct ScriptExecutor {
    /// Path to the script. Lines starting with "#" are comments and ":quit" stops the script.
    file: PathBuf,

    #[command(flatten)]
    database: DatabaseArgs,
}

impl ScriptExecutor {
    pub fn run(self) -> Result<()> {
        let content = std::fs::read_to_string(&self.file)
            .into_diagnostic()
            .wrap_err_with(|| format!("cannot read script \"{}\"", self.file.display()))?;
        let db = self.database.open()?;
        let mut session = db.session()?;
        let mut stdout = std::io::stdout().lock();
        execute_script(&mut session, &content, &mut stdout)
    }
}

/// Runs `script` line by line, printing one line per scheduled operation and the final
/// schedule at the end.
pub(crate) fn execute_script<W: Write>(
    session: &mut Session,
    script: &str,
    out: &mut W,
) -> Result<()> {
    for (number, line) in script.lines().enumerate() {
        let line = line.trim();
        match line {
            "" => continue,
            ":quit" => break,
            line if line.starts_with('#') => continue,
            line => {
                debug!(line = number + 1, "executing script line");
                for step in session.execute(line)? {
                    writeln!(out, "{step}").into_diagnostic()?;
                }
            }
        }
    }
    let schedule = session.scheduler().scheduled().iter().join("");
    writeln!(out, "schedule: {schedule}").into_diagnostic()?;
    Ok(())
}
