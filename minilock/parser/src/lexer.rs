use std::ops::Range;

use logos::{Lexer, Logos};

use crate::error::TokenErrorKind;

/// Tokens of the schedule notation, e.g. `r1(x updl tabl) w2(y) c1`.
///
/// Identifiers consist of letters only, so that `c1w2(x)` splits into an operation letter, a
/// number, another operation letter and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Logos)]
#[logos(error = TokenErrorKind)]
// Whitespaces should be skipped.
#[logos(skip r"[\p{White_Space}]+")]
pub enum TokenKind<'a> {
    // Operation letters.
    #[token("r", priority = 3)]
    Read,
    #[token("w", priority = 3)]
    Write,
    #[token("c", priority = 3)]
    Commit,

    // Lock options.
    #[token("updl")]
    UpdL,
    #[token("rowl")]
    RowL,
    #[token("pagl")]
    PagL,
    #[token("tabl")]
    TabL,
    #[token("arel")]
    AreL,

    #[token("(")]
    LeftParen,
    #[token(")")]
    RightParen,

    #[regex(r"[0-9]+", parse_number)]
    Number(u64),
    #[regex(r"[a-zA-Z_]+")]
    Identifier(&'a str),
}

fn parse_number<'a>(lex: &mut Lexer<'a, TokenKind<'a>>) -> Result<u64, TokenErrorKind> {
    lex.slice()
        .parse()
        .map_err(|_| TokenErrorKind::NumberOutOfRange)
}

impl TokenKind<'_> {
    #[inline]
    pub fn is_operation(&self) -> bool {
        matches!(self, Self::Read | Self::Write | Self::Commit)
    }

    /// Whether the token is made of letters. Any such token names a table when it follows
    /// `(`, so tables may be called `r` or `tabl`.
    #[inline]
    pub fn is_word(&self) -> bool {
        self.is_operation() || self.is_lock_option() || matches!(self, Self::Identifier(_))
    }

    #[inline]
    pub fn is_lock_option(&self) -> bool {
        matches!(
            self,
            Self::UpdL | Self::RowL | Self::PagL | Self::TabL | Self::AreL
        )
    }
}

/// A lexed token with its byte range in the input.
pub type SpannedToken<'a> = (Result<TokenKind<'a>, TokenErrorKind>, Range<usize>);

/// Tokenizes the whole input, keeping invalid tokens instead of stopping at them.
pub fn tokenize(input: &str) -> Vec<SpannedToken<'_>> {
    TokenKind::lexer(input).spanned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operations_without_spaces() {
        let tokens: Vec<_> = TokenKind::lexer("r1(x)c1w22(yy)").collect();
        assert_eq!(tokens, vec![
            Ok(TokenKind::Read),
            Ok(TokenKind::Number(1)),
            Ok(TokenKind::LeftParen),
            Ok(TokenKind::Identifier("x")),
            Ok(TokenKind::RightParen),
            Ok(TokenKind::Commit),
            Ok(TokenKind::Number(1)),
            Ok(TokenKind::Write),
            Ok(TokenKind::Number(22)),
            Ok(TokenKind::LeftParen),
            Ok(TokenKind::Identifier("yy")),
            Ok(TokenKind::RightParen),
        ]);
    }

    #[test]
    fn test_keywords() {
        let tokens: Vec<_> = TokenKind::lexer(" updl\trowl pagl\ntabl arel rows").collect();
        assert_eq!(tokens, vec![
            Ok(TokenKind::UpdL),
            Ok(TokenKind::RowL),
            Ok(TokenKind::PagL),
            Ok(TokenKind::TabL),
            Ok(TokenKind::AreL),
            Ok(TokenKind::Identifier("rows")),
        ]);
    }

    #[test]
    fn test_invalid_tokens() {
        let tokens: Vec<_> = TokenKind::lexer("r1(x);").collect();
        assert_eq!(tokens.last(), Some(&Err(TokenErrorKind::InvalidToken)));

        let tokens: Vec<_> = TokenKind::lexer("c99999999999999999999").collect();
        assert_eq!(tokens, vec![
            Ok(TokenKind::Commit),
            Err(TokenErrorKind::NumberOutOfRange)
        ]);
    }

    #[test]
    fn test_tokenize_keeps_going() {
        let tokens = tokenize("r1(x; tabl)");
        assert_eq!(tokens.len(), 7);
        assert_eq!(tokens[4], (Err(TokenErrorKind::InvalidToken), 4..5));
        assert_eq!(tokens[5], (Ok(TokenKind::TabL), 6..10));
        assert!(tokens[5].0.as_ref().unwrap().is_lock_option());
    }
}
