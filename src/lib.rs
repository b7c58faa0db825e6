//! Front end of a source-to-source transpiler: tokenizer, backtracking
//! parser combinators, and an expression parser with operator precedence.
//!
//! # Quick start
//!
//! ## Parse an expression
//!
//! ```
//! use srcfront::{BinaryOp, Expression, parse_expression_str};
//!
//! let tree = parse_expression_str("1 + 2 * 3").unwrap();
//! assert_eq!(
//!     tree,
//!     Expression::binary(
//!         BinaryOp::Add,
//!         Expression::number("1"),
//!         Expression::binary(
//!             BinaryOp::Multiply,
//!             Expression::number("2"),
//!             Expression::number("3"),
//!         ),
//!     )
//! );
//! ```
//!
//! ## Parse and re-format a program
//!
//! ```
//! use srcfront::{format, parse_str};
//!
//! let nodes = parse_str("var total = price * (1 + rate);").unwrap();
//! assert_eq!(format(&nodes), "var total = price * (1 + rate);\n");
//! ```
//!
//! ## Compose your own parsers
//!
//! ```
//! use srcfront::combinator::{Parser, identifier, separated, structure};
//! use srcfront::{Context, Structure, tokenize};
//!
//! let names = separated(
//!     identifier().map(|name| name.value),
//!     structure(Structure::Comma),
//! );
//! let mut cx = Context::new(tokenize("a, b, c").unwrap());
//! assert_eq!(names.parse(&mut cx).unwrap(), vec!["a", "b", "c"]);
//! ```

// Allow noisy pedantic lints that don't add value for
// a library crate.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod ast;
pub mod combinator;
pub mod context;
pub mod formatter;
pub mod grammar;
pub mod lexer;
pub mod token;

pub use ast::{
    Argument, AssignOp, Associativity, BinaryOp, Definition, Expression, Infix, Modifiers, Node,
    Statement, StepOp, UnaryOp,
};
pub use combinator::{BoxedParser, Parser};
pub use context::{Context, ParseError, ParseErrorKind, ParseResult, Snapshot};
pub use formatter::{format, format_expression};
pub use grammar::{parse, parse_expression};
pub use lexer::{LexError, LexErrorKind, Tokenizer, tokenize, tokenize_file};
pub use token::{FileId, Keyword, Located, Location, Operator, Structure, Token};

/// Unified error type covering both lexing and parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A lexer error.
    #[error("{0}")]
    Lex(#[from] LexError),
    /// A parser error.
    #[error("{0}")]
    Parse(#[from] ParseError),
}

impl Error {
    /// Where in the source the error was detected.
    #[must_use]
    pub const fn location(&self) -> Location {
        match self {
            Self::Lex(err) => err.location,
            Self::Parse(err) => err.location,
        }
    }
}

/// Tokenize and parse a program in one step.
pub fn parse_str(input: &str) -> Result<Vec<Node>, Error> {
    let tokens = tokenize(input)?;
    Ok(parse(&tokens)?)
}

/// Tokenize and parse a single expression in one step.
pub fn parse_expression_str(input: &str) -> Result<Expression, Error> {
    let tokens = tokenize(input)?;
    Ok(parse_expression(&tokens)?)
}
