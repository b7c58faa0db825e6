//! Rewindable cursor over a located token sequence.
//!
//! Every parser in this crate reads tokens through a [`Context`]. Backtracking
//! is a [`Snapshot`] taken before an attempt and handed back to
//! [`Context::revert`] when the attempt fails.

use std::fmt;

use crate::token::{Located, Location, Token};

/// Classifies a parse failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A token of the wrong kind.
    UnexpectedToken { expected: String, found: String },
    /// Input ended while a token was still required.
    EndOfStream { expected: String },
    /// Operands resolved, but their shape is not allowed for the operator.
    IllegalConstruct { construct: String },
    /// A complete program was parsed but tokens remain.
    TrailingInput { found: String },
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedToken { expected, found } => {
                write!(f, "expected {expected}, got {found}")
            }
            Self::EndOfStream { expected } => {
                write!(f, "expected {expected}, reached end of input")
            }
            Self::IllegalConstruct { construct } => {
                write!(f, "not a legal operator here: {construct}")
            }
            Self::TrailingInput { found } => {
                write!(f, "unexpected {found} after end of program")
            }
        }
    }
}

/// Error produced during parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at {location}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub location: Location,
}

impl ParseError {
    #[must_use]
    pub fn unexpected(expected: impl Into<String>, found: &Located<Token>) -> Self {
        Self {
            kind: ParseErrorKind::UnexpectedToken {
                expected: expected.into(),
                found: found.value.describe(),
            },
            location: found.location,
        }
    }

    #[must_use]
    pub fn end_of_stream(expected: impl Into<String>, location: Location) -> Self {
        Self {
            kind: ParseErrorKind::EndOfStream {
                expected: expected.into(),
            },
            location,
        }
    }

    #[must_use]
    pub fn illegal(construct: impl Into<String>, location: Location) -> Self {
        Self {
            kind: ParseErrorKind::IllegalConstruct {
                construct: construct.into(),
            },
            location,
        }
    }

    /// Whether this failure is about operand shapes rather than token kinds.
    #[must_use]
    pub const fn is_illegal_construct(&self) -> bool {
        matches!(self.kind, ParseErrorKind::IllegalConstruct { .. })
    }
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Saved cursor position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Snapshot(usize);

impl Snapshot {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Cursor over a token sequence. Not shared between concurrent parses.
#[derive(Debug, Clone)]
pub struct Context {
    tokens: Vec<Located<Token>>,
    index: usize,
}

impl Context {
    #[must_use]
    pub const fn new(tokens: Vec<Located<Token>>) -> Self {
        Self { tokens, index: 0 }
    }

    pub fn advance(&mut self) -> Option<Located<Token>> {
        let token = self.tokens.get(self.index).cloned()?;
        self.index += 1;
        Some(token)
    }

    #[must_use]
    pub fn peek(&self) -> Option<&Located<Token>> {
        self.tokens.get(self.index)
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.index < self.tokens.len()
    }

    #[must_use]
    pub const fn snapshot(&self) -> Snapshot {
        Snapshot(self.index)
    }

    pub const fn revert(&mut self, snapshot: Snapshot) {
        self.index = snapshot.0;
    }

    /// Number of tokens consumed since `snapshot` was taken.
    #[must_use]
    pub const fn consumed_since(&self, snapshot: Snapshot) -> usize {
        self.index.saturating_sub(snapshot.0)
    }

    /// Location used for failures at the current position: the next
    /// token, or an empty range just past the last one at end of input.
    #[must_use]
    pub fn here(&self) -> Location {
        match (self.tokens.get(self.index), self.tokens.last()) {
            (Some(token), _) => token.location,
            (None, Some(last)) => Location::new(last.location.file, last.location.end(), 0),
            (None, None) => Location::default(),
        }
    }

    /// Failure for a parser that wanted `expected` at the current position.
    #[must_use]
    pub fn error_expected(&self, expected: impl Into<String>) -> ParseError {
        match self.peek() {
            Some(token) => ParseError::unexpected(expected, token),
            None => ParseError::end_of_stream(expected, self.here()),
        }
    }

    #[must_use]
    pub fn tokens(&self) -> &[Located<Token>] {
        &self.tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn context(input: &str) -> Context {
        Context::new(tokenize(input).expect("tokenize failed"))
    }

    #[test]
    fn revert_restores_index() {
        let mut cx = context("a b c");
        let start = cx.snapshot();
        cx.advance();
        cx.advance();
        assert_eq!(cx.consumed_since(start), 2);
        cx.revert(start);
        assert_eq!(cx.snapshot(), start);
        assert_eq!(
            cx.peek().map(|t| &t.value),
            Some(&Token::Identifier {
                name: "a".to_string()
            })
        );
    }

    #[test]
    fn advance_past_end_is_none() {
        let mut cx = context("a");
        assert!(cx.advance().is_some());
        assert!(cx.advance().is_none());
        assert!(!cx.has_next());
        assert_eq!(cx.snapshot().index(), 1);
    }

    #[test]
    fn here_at_end_points_past_last_token() {
        let mut cx = context("ab");
        cx.advance();
        assert_eq!(cx.here().offset, 2);
        assert_eq!(cx.here().length, 0);
    }

    #[test]
    fn error_display() {
        let err = ParseError::end_of_stream("')'", Location::default());
        assert_eq!(
            err.to_string(),
            "expected ')', reached end of input at offset 0"
        );
    }
}
