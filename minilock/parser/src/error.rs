use std::ops::Range;
use std::sync::Arc;

use miette::Diagnostic;
use smol_str::SmolStr;
use thiserror::Error;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum TokenErrorKind {
    #[default]
    InvalidToken,
    NumberOutOfRange,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("invalid token \"{0}\"")]
    InvalidToken(SmolStr),

    #[error("transaction id {0} is out of range")]
    NumberOutOfRange(SmolStr),

    #[error("expected {expected}, found \"{found}\"")]
    Unexpected {
        expected: &'static str,
        found: SmolStr,
    },

    #[error("expected {0}, found end of input")]
    UnexpectedEof(&'static str),
}

/// A syntax error, carrying the whole input so that it can be rendered as a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("syntax error at or near line {line}, column {column}: {kind}")]
pub struct ParseError {
    kind: ParseErrorKind,
    #[source_code]
    input: Arc<str>,
    #[label("here")]
    span: Range<usize>,
    line: usize,
    column: usize,
}

impl ParseError {
    pub fn new(input: &str, kind: ParseErrorKind, span: Range<usize>) -> Self {
        let (line, column) = translate_offset_to_line_column(input, span.start);
        Self {
            kind,
            input: input.into(),
            span,
            line,
            column,
        }
    }

    pub(crate) fn from_token_error(input: &str, kind: TokenErrorKind, span: Range<usize>) -> Self {
        let slice = SmolStr::new(&input[span.clone()]);
        let kind = match kind {
            TokenErrorKind::InvalidToken => ParseErrorKind::InvalidToken(slice),
            TokenErrorKind::NumberOutOfRange => ParseErrorKind::NumberOutOfRange(slice),
        };
        Self::new(input, kind, span)
    }

    #[inline]
    pub fn kind(&self) -> &ParseErrorKind {
        &self.kind
    }

    #[inline]
    pub fn input(&self) -> &Arc<str> {
        &self.input
    }

    #[inline]
    pub fn span(&self) -> &Range<usize> {
        &self.span
    }

    /// One-based line and column of the start of the span.
    #[inline]
    pub fn position(&self) -> (usize, usize) {
        (self.line, self.column)
    }
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Offsets at the end of a line or of the input map to the column right after its last
/// character.
fn translate_offset_to_line_column(input: &str, offset: usize) -> (usize, usize) {
    let before = &input[..offset];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let column = before[line_start..].chars().count() + 1;
    (line, column)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate() {
        let input = "r1(x)\nw2(y";
        assert_eq!(translate_offset_to_line_column(input, 0), (1, 1));
        assert_eq!(translate_offset_to_line_column(input, 4), (1, 5));
        assert_eq!(translate_offset_to_line_column(input, 8), (2, 3));
        assert_eq!(translate_offset_to_line_column(input, input.len()), (2, 5));
    }

    #[test]
    fn test_translate_multibyte() {
        let input = "r1(表)é";
        let offset = input.find('é').unwrap();
        assert_eq!(translate_offset_to_line_column(input, offset), (1, 6));
    }

    #[test]
    fn test_display() {
        let err = ParseError::new("c", ParseErrorKind::UnexpectedEof("a transaction id"), 1..1);
        assert_eq!(
            err.to_string(),
            "syntax error at or near line 1, column 2: expected a transaction id, found end of input"
        );
    }
}
