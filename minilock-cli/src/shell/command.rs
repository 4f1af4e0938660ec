use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::{ColorChoice, Command, CommandFactory, FromArgMatches, Parser};
use itertools::Itertools;
use miette::{IntoDiagnostic, MietteDiagnostic, Result};
use minilock::demo::demo_schedule;
use minilock::display::{
    catalog_table, graph_table, lock_table, schedule_table, transaction_table,
};
use strum::VariantNames;

use super::context::ShellContext;
use crate::shell::output::OutputMode;

pub fn build_command() -> Command {
    ShellCommand::command()
        .multicall(true)
        .help_template("{before-help}{subcommands}{after-help}")
        .before_help("Usage hints:")
        .after_help(
            "Any other input is a schedule, e.g. \"r1(x) w2(y tabl) c1\".\n\
             Enter \":help <COMMAND>\" for more information about a command.",
        )
        .color(ColorChoice::Never)
        .disable_colored_help(true)
        .disable_help_flag(true)
        .disable_help_subcommand(true)
}

#[derive(Debug, Parser, VariantNames)]
#[strum(serialize_all = "kebab-case")]
pub enum ShellCommand {
    /// Show usage hints.
    #[command(name = ":help")]
    Help {
        /// The command to show help for.
        /// If not provided, the help for all commands will be shown.
        command: Option<String>,
    },

    /// Exit the shell.
    #[command(name = ":quit")]
    Quit,

    /// Show command history.
    #[command(name = ":history")]
    History,

    /// Set output mode.
    #[command(name = ":mode")]
    Mode {
        /// The output mode to change to.
        /// If not provided, the current output mode will be printed.
        mode_to_change: Option<OutputMode>,
    },

    /// Show the operations scheduled so far, in order.
    #[command(name = ":schedule")]
    Schedule,

    /// Show the lock table.
    #[command(name = ":locks")]
    Locks {
        /// Only show the locks of this transaction.
        txn: Option<u64>,
    },

    /// Show the wait-for graph.
    #[command(name = ":graph")]
    Graph,

    /// Show every transaction with its state and deferred operations.
    #[command(name = ":txns")]
    Txns,

    /// Show the tables of the catalog.
    #[command(name = ":tables")]
    Tables,

    /// Start a new session and run a demo schedule in it.
    #[command(name = ":demo")]
    Demo {
        /// The demo to run.
        #[arg(value_parser = clap::value_parser!(u8).range(1..=2))]
        number: u8,
    },

    /// Discard every transaction and start a new session.
    #[command(name = ":reset")]
    Reset,
}

impl ShellCommand {
    pub fn execute_from_input(ctx: &mut ShellContext, input: &str) -> Result<()> {
        let input = input.split_whitespace().collect_vec();
        let matches = ctx
            .command
            .try_get_matches_from_mut(input)
            .map_err(diagnose)?;
        let cmd = Self::from_arg_matches(&matches).into_diagnostic()?;

        match cmd {
            Self::Help { command } => help(ctx, command),
            Self::Quit => quit(ctx),
            Self::History => history(ctx),
            Self::Mode { mode_to_change } => mode(ctx, mode_to_change),
            Self::Schedule => {
                ctx.print(schedule_table(ctx.session.scheduler().scheduled(), ctx.options()));
                Ok(())
            }
            Self::Locks { txn } => {
                let scheduler = ctx.session.scheduler();
                let locks = match txn {
                    Some(txn) => scheduler.locks_of(txn).cloned().collect_vec(),
                    None => scheduler.locks().to_vec(),
                };
                ctx.print(lock_table(&locks, ctx.options()));
                Ok(())
            }
            Self::Graph => {
                ctx.print(graph_table(ctx.session.scheduler().wait_for_graph(), ctx.options()));
                Ok(())
            }
            Self::Txns => {
                ctx.print(transaction_table(ctx.session.scheduler(), ctx.options()));
                Ok(())
            }
            Self::Tables => {
                ctx.print(catalog_table(&ctx.session.tables()?, ctx.options()));
                Ok(())
            }
            Self::Demo { number } => demo(ctx, number),
            Self::Reset => ctx.reset(),
        }
    }
}

/// Turns a clap parse failure into a short diagnostic with a hint.
fn diagnose(e: clap::Error) -> MietteDiagnostic {
    match e.kind() {
        ErrorKind::InvalidSubcommand => {
            let invalid = e.get(ContextKind::InvalidSubcommand).map(ToString::to_string);
            let diag = miette::diagnostic!("unknown command: \"{}\"", invalid.unwrap_or_default());
            let help = match e.get(ContextKind::SuggestedSubcommand) {
                Some(ContextValue::Strings(s)) if s.len() == 1 => {
                    format!("did you mean \"{}\"?", s[0])
                }
                _ => "enter \":help\" for usage hints".into(),
            };
            diag.with_help(help)
        }
        ErrorKind::UnknownArgument => {
            let arg = e.get(ContextKind::InvalidArg).map(ToString::to_string);
            miette::diagnostic!("unknown argument: \"{}\"", arg.unwrap_or_default())
                .with_help("enter \":help\" for usage hints")
        }
        ErrorKind::InvalidValue | ErrorKind::ValueValidation => {
            let invalid_arg = e.get(ContextKind::InvalidArg).map(ToString::to_string);
            let invalid_value = e.get(ContextKind::InvalidValue).map(ToString::to_string);
            let diag = miette::diagnostic!(
                "invalid value for argument {}: \"{}\"",
                invalid_arg.unwrap_or_default(),
                invalid_value.unwrap_or_default()
            );
            let mut help = match e.get(ContextKind::ValidValue) {
                Some(ContextValue::Strings(s)) => {
                    let values = s.iter().map(|s| format!("\"{s}\"")).join(", ");
                    format!("possible values: {values}")
                }
                _ => String::new(),
            };
            if let Some(ContextValue::String(s)) = e.get(ContextKind::SuggestedValue) {
                help.push_str(&format!("\ndid you mean \"{s}\"?"));
            }
            if help.is_empty() {
                diag
            } else {
                diag.with_help(help)
            }
        }
        ErrorKind::MissingRequiredArgument => {
            miette::diagnostic!("missing argument").with_help("enter \":help\" for usage hints")
        }
        _ => miette::diagnostic!("{}", e.render().to_string().trim_end()),
    }
}

fn help(ctx: &mut ShellContext, command: Option<String>) -> Result<()> {
    if let Some(command) = command {
        let name = if command.starts_with(':') {
            command
        } else {
            format!(":{command}")
        };
        let subcommand = ctx
            .command
            .find_subcommand_mut(&name)
            .ok_or_else(|| miette::diagnostic!("unknown command: \"{}\"", name))?;
        println!("{}", subcommand.render_long_help());
    } else {
        println!("{}", ctx.command.render_help());
    }
    Ok(())
}

fn quit(ctx: &mut ShellContext) -> Result<()> {
    ctx.should_quit = true;
    Ok(())
}

fn history(ctx: &mut ShellContext) -> Result<()> {
    for (index, line) in ctx.editor.history().iter().enumerate() {
        println!("{}\t{}", index + 1, line);
    }
    Ok(())
}

fn mode(ctx: &mut ShellContext, mode_to_change: Option<OutputMode>) -> Result<()> {
    if let Some(mode_to_change) = mode_to_change {
        ctx.mode = mode_to_change;
    } else {
        println!("current output mode: {}", ctx.mode);
    }
    Ok(())
}

fn demo(ctx: &mut ShellContext, number: u8) -> Result<()> {
    let schedule = demo_schedule(number.into())
        .ok_or_else(|| miette::diagnostic!("unknown demo: {}", number))?;
    ctx.reset()?;
    println!("{schedule}");
    ctx.execute_schedule(schedule)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> std::result::Result<ShellCommand, MietteDiagnostic> {
        let matches = build_command()
            .try_get_matches_from(input.split_whitespace())
            .map_err(diagnose)?;
        Ok(ShellCommand::from_arg_matches(&matches).unwrap())
    }

    #[test]
    fn test_parse_commands() {
        assert!(matches!(parse(":locks").unwrap(), ShellCommand::Locks { txn: None }));
        assert!(matches!(parse(":locks 3").unwrap(), ShellCommand::Locks { txn: Some(3) }));
        assert!(matches!(parse(":demo 2").unwrap(), ShellCommand::Demo { number: 2 }));
        assert!(matches!(parse(":mode markdown").unwrap(), ShellCommand::Mode {
            mode_to_change: Some(OutputMode::Markdown)
        }));
    }

    #[test]
    fn test_unknown_command() {
        let diag = parse(":lock").unwrap_err();
        assert_eq!(diag.message, "unknown command: \":lock\"");
        assert_eq!(diag.help.as_deref(), Some("did you mean \":locks\"?"));
    }

    #[test]
    fn test_invalid_value() {
        let diag = parse(":mode csv").unwrap_err();
        assert!(diag.message.starts_with("invalid value for argument"));
        let help = diag.help.unwrap();
        assert!(help.contains("\"markdown\""));
        assert!(parse(":demo 3").is_err());
    }

    #[test]
    fn test_variant_names() {
        assert!(ShellCommand::VARIANTS.contains(&"txns"));
        assert!(ShellCommand::VARIANTS.contains(&"demo"));
    }
}
