use std::borrow::Cow;
use std::cell::RefCell;
use std::collections::HashSet;
use std::num::NonZeroUsize;

use lru::LruCache;
use miette::IntoDiagnostic;
use minilock_parser::lexer::{TokenKind, tokenize};
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::{CmdKind, Highlighter};
use rustyline::hint::HistoryHinter;
use rustyline::history::FileHistory;
use rustyline::validate::{ValidationContext, ValidationResult, Validator};
use rustyline::{
    Completer, CompletionType, Config, Context, Editor, Helper, Highlighter, Hinter, Result,
    Validator,
};
use strum::VariantNames;

use super::command::ShellCommand;

pub type ShellEditor = Editor<ShellHelper, FileHistory>;

/// Builds the line editor. `tables` are offered as completions inside parentheses.
pub fn build_editor(tables: Vec<String>) -> miette::Result<ShellEditor> {
    let config = Config::builder()
        .history_ignore_space(true)
        .auto_add_history(true)
        .completion_type(CompletionType::List)
        .build();
    let mut editor = Editor::with_config(config).into_diagnostic()?;
    let helper = ShellHelper {
        completer: ShellCompleter { tables },
        highlighter: ShellHighlighter::new(),
        hinter: HistoryHinter::new(),
        validator: ShellValidator,
    };
    editor.set_helper(Some(helper));
    Ok(editor)
}

#[derive(Helper, Completer, Highlighter, Hinter, Validator)]
pub struct ShellHelper {
    #[rustyline(Completer)]
    completer: ShellCompleter,

    #[rustyline(Highlighter)]
    highlighter: ShellHighlighter,

    #[rustyline(Hinter)]
    hinter: HistoryHinter,

    #[rustyline(Validator)]
    validator: ShellValidator,
}

struct ShellHighlighter {
    schedule_cache: RefCell<LruCache<String, String>>,
    command_cache: RefCell<LruCache<String, String>>,
    commands: HashSet<&'static str>,
}

const DEFAULT_CACHE_CAP: NonZeroUsize = NonZeroUsize::new(256).unwrap();

impl ShellHighlighter {
    fn new() -> Self {
        Self {
            schedule_cache: RefCell::new(LruCache::new(DEFAULT_CACHE_CAP)),
            command_cache: RefCell::new(LruCache::new(DEFAULT_CACHE_CAP)),
            commands: ShellCommand::VARIANTS.iter().copied().collect(),
        }
    }
}

fn highlight_command(line: &str) -> String {
    let start = line.len() - line.trim_start().len();
    let end = line[start..]
        .find(char::is_whitespace)
        .map_or(line.len(), |len| start + len);
    format!(
        "{}\x1b[1;33m{}\x1b[0m{}",
        &line[..start],
        &line[start..end],
        &line[end..]
    )
}

/// Operation letters are green and lock options are blue, both bold. Invalid tokens are red.
fn highlight_schedule(line: &str) -> String {
    let mut highlighted = String::new();
    let mut offset = 0;
    for (token, span) in tokenize(line) {
        let color = match token {
            Ok(kind) if kind.is_operation() => "1;32",
            Ok(kind) if kind.is_lock_option() => "1;34",
            Ok(_) => continue,
            Err(_) => "31",
        };
        highlighted.push_str(&line[offset..span.start]);
        highlighted.push_str(&format!("\x1b[{color}m{}\x1b[0m", &line[span.clone()]));
        offset = span.end;
    }
    highlighted.push_str(&line[offset..]);
    highlighted
}

impl Highlighter for ShellHighlighter {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.trim().is_empty() {
            return line.into();
        }
        if let Some(rest) = line.trim_start().strip_prefix(':') {
            let cmd = rest.split_whitespace().next().unwrap_or_default();
            if !self.commands.contains(cmd) {
                return line.into();
            }
            self.command_cache
                .borrow_mut()
                .get_or_insert_ref(line, || highlight_command(line))
                .clone()
                .into()
        } else {
            self.schedule_cache
                .borrow_mut()
                .get_or_insert_ref(line, || highlight_schedule(line))
                .clone()
                .into()
        }
    }

    fn highlight_prompt<'b, 's: 'b, 'p: 'b>(
        &'s self,
        prompt: &'p str,
        _default: bool,
    ) -> Cow<'b, str> {
        // Make the prompt bold.
        format!("\x1b[1m{prompt}\x1b[0m").into()
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        // Grey46.
        format!("\x1b[38;5;243m{hint}\x1b[0m").into()
    }

    fn highlight_char(&self, line: &str, _pos: usize, _kind: CmdKind) -> bool {
        !line.is_empty()
    }
}

/// Keeps reading lines while a parenthesis is left open, so one operation may span lines.
pub struct ShellValidator;

fn is_schedule_complete(input: &str) -> bool {
    let mut open = false;
    for (token, _) in tokenize(input) {
        match token {
            Ok(TokenKind::LeftParen) => open = true,
            Ok(TokenKind::RightParen) => open = false,
            _ => (),
        }
    }
    !open
}

impl Validator for ShellValidator {
    fn validate(&self, ctx: &mut ValidationContext) -> Result<ValidationResult> {
        if ctx.input().trim_start().starts_with(':') || is_schedule_complete(ctx.input()) {
            Ok(ValidationResult::Valid(None))
        } else {
            Ok(ValidationResult::Incomplete)
        }
    }
}

/// Completes command names after `:` and table names right after `(`.
pub struct ShellCompleter {
    tables: Vec<String>,
}

impl ShellCompleter {
    fn candidates(&self, line: &str, pos: usize) -> (usize, Vec<Pair>) {
        let line = &line[..pos];
        if let Some(cmd) = line.trim_start().strip_prefix(':') {
            if cmd.contains(char::is_whitespace) {
                return (pos, Vec::new());
            }
            let candidates = ShellCommand::VARIANTS
                .iter()
                .filter(|candidate| candidate.starts_with(cmd))
                .map(|candidate| Pair {
                    display: format!(":{candidate}"),
                    replacement: format!(":{candidate}"),
                })
                .collect();
            return (line.len() - line.trim_start().len(), candidates);
        }
        let start = line
            .rfind(|c: char| !(c.is_ascii_alphabetic() || c == '_'))
            .map_or(0, |i| i + 1);
        if !line[..start].trim_end().ends_with('(') {
            return (pos, Vec::new());
        }
        let prefix = &line[start..];
        let candidates = self
            .tables
            .iter()
            .filter(|table| table.starts_with(prefix))
            .map(|table| Pair {
                display: table.clone(),
                replacement: table.clone(),
            })
            .collect();
        (start, candidates)
    }
}

impl Completer for ShellCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context,
    ) -> Result<(usize, Vec<Self::Candidate>)> {
        Ok(self.candidates(line, pos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completer() -> ShellCompleter {
        ShellCompleter {
            tables: vec!["u".into(), "v".into(), "x".into(), "xs".into()],
        }
    }

    fn replacements(candidates: Vec<Pair>) -> Vec<String> {
        candidates.into_iter().map(|pair| pair.replacement).collect()
    }

    #[test]
    fn test_is_schedule_complete() {
        assert!(is_schedule_complete(""));
        assert!(is_schedule_complete("r1(x) c1"));
        assert!(!is_schedule_complete("r1(x updl"));
        assert!(is_schedule_complete("r1(x updl\ntabl)"));
        assert!(!is_schedule_complete("r1(x) w2("));
    }

    #[test]
    fn test_complete_commands() {
        let (start, candidates) = completer().candidates(":t", 2);
        assert_eq!(start, 0);
        assert_eq!(replacements(candidates), [":txns", ":tables"]);
        let (_, candidates) = completer().candidates(":mode ", 6);
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_complete_tables() {
        let (start, candidates) = completer().candidates("r1(y) w2(x", 10);
        assert_eq!(start, 9);
        assert_eq!(replacements(candidates), ["x", "xs"]);
        let (_, candidates) = completer().candidates("r1(y) w", 7);
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_highlight_schedule() {
        assert_eq!(
            highlight_schedule("r1(x tabl)"),
            "\x1b[1;32mr\x1b[0m1(x \x1b[1;34mtabl\x1b[0m)"
        );
        assert_eq!(highlight_schedule("c2;"), "\x1b[1;32mc\x1b[0m2\x1b[31m;\x1b[0m");
    }

    #[test]
    fn test_highlight_command() {
        assert_eq!(highlight_command(" :mode psql"), " \x1b[1;33m:mode\x1b[0m psql");
    }
}
