use std::iter::Peekable;
use std::ops::Range;

use logos::{Logos, SpannedIter};
use minilock_common::Granularity;
use minilock_transaction::Operation;

use crate::error::{ParseError, ParseErrorKind, ParseResult};
use crate::lexer::TokenKind;

/// Parses schedule text one operation at a time.
///
/// ```text
/// schedule    := operation*
/// operation   := "r" NUMBER "(" IDENT ["updl"] [granularity] ")"
///              | "w" NUMBER "(" IDENT [granularity] ")"
///              | "c" NUMBER
/// granularity := "rowl" | "pagl" | "tabl" | "arel"
/// ```
///
/// `IDENT` is any run of letters, keywords and operation letters included.
///
/// The iterator stops after the first error.
pub struct ScheduleParser<'a> {
    input: &'a str,
    tokens: Peekable<SpannedIter<'a, TokenKind<'a>>>,
    failed: bool,
}

impl<'a> ScheduleParser<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            tokens: TokenKind::lexer(input).spanned().peekable(),
            failed: false,
        }
    }

    fn next_operation(&mut self) -> ParseResult<Option<Operation>> {
        let Some((token, span)) = self.next_token()? else {
            return Ok(None);
        };
        if !token.is_operation() {
            return Err(self.unexpected("an operation", span));
        }
        let txn = match self.expect("a transaction id")? {
            (TokenKind::Number(txn), _) => txn,
            (_, span) => return Err(self.unexpected("a transaction id", span)),
        };
        let is_read = match token {
            TokenKind::Commit => return Ok(Some(Operation::commit(txn))),
            TokenKind::Read => true,
            _ => false,
        };

        match self.expect("\"(\"")? {
            (TokenKind::LeftParen, _) => (),
            (_, span) => return Err(self.unexpected("\"(\"", span)),
        }
        let input = self.input;
        let table = match self.expect("a table name")? {
            (token, span) if token.is_word() => &input[span],
            (_, span) => return Err(self.unexpected("a table name", span)),
        };
        let op = if !is_read {
            Operation::write(txn, table)
        } else if self.eat(TokenKind::UpdL) {
            Operation::read_for_update(txn, table)
        } else {
            Operation::read(txn, table)
        };
        let op = match self.granularity() {
            Some(granularity) => op.with_granularity(granularity),
            None => op,
        };
        match self.expect("\")\"")? {
            (TokenKind::RightParen, _) => Ok(Some(op)),
            (_, span) => Err(self.unexpected("\")\"", span)),
        }
    }

    fn next_token(&mut self) -> ParseResult<Option<(TokenKind<'a>, Range<usize>)>> {
        match self.tokens.next() {
            Some((Ok(token), span)) => Ok(Some((token, span))),
            Some((Err(kind), span)) => Err(ParseError::from_token_error(self.input, kind, span)),
            None => Ok(None),
        }
    }

    fn expect(&mut self, expected: &'static str) -> ParseResult<(TokenKind<'a>, Range<usize>)> {
        self.next_token()?.ok_or_else(|| {
            let end = self.input.len();
            ParseError::new(self.input, ParseErrorKind::UnexpectedEof(expected), end..end)
        })
    }

    /// Consumes the next token if it is `kind`.
    fn eat(&mut self, kind: TokenKind<'a>) -> bool {
        self.tokens
            .next_if(|(token, _)| token.as_ref() == Ok(&kind))
            .is_some()
    }

    fn granularity(&mut self) -> Option<Granularity> {
        let granularity = match self.tokens.peek() {
            Some((Ok(TokenKind::RowL), _)) => Granularity::Row,
            Some((Ok(TokenKind::PagL), _)) => Granularity::Page,
            Some((Ok(TokenKind::TabL), _)) => Granularity::Table,
            Some((Ok(TokenKind::AreL), _)) => Granularity::Area,
            _ => return None,
        };
        self.tokens.next();
        Some(granularity)
    }

    fn unexpected(&self, expected: &'static str, span: Range<usize>) -> ParseError {
        let found = self.input[span.clone()].into();
        ParseError::new(self.input, ParseErrorKind::Unexpected { expected, found }, span)
    }
}

impl Iterator for ScheduleParser<'_> {
    type Item = ParseResult<Operation>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let result = self.next_operation().transpose();
        self.failed = matches!(result, Some(Err(_)));
        result
    }
}
