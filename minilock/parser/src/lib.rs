//! Parser for the schedule notation.
//!
//! A schedule is a sequence of operations such as `r1(x)w2(y tabl)c1`: an operation letter, the
//! transaction id, and for reads and writes the table with optional lock options.
//!
//! ```
//! # use minilock_parser::parse_schedule;
//! let ops = parse_schedule("r1(x updl) c1").unwrap();
//! assert_eq!(ops[0].to_string(), "r1(x updl)");
//! assert_eq!(ops[1].to_string(), "c1");
//! ```

pub mod error;
pub mod lexer;
pub mod parser;

pub use error::{ParseError, ParseErrorKind, ParseResult};
pub use parser::ScheduleParser;
use minilock_transaction::Operation;

/// Parses a whole schedule. Nothing is returned unless every operation parses.
pub fn parse_schedule(input: &str) -> ParseResult<Vec<Operation>> {
    ScheduleParser::new(input).collect()
}
