//! Backtracking parser combinators over a [`Context`].
//!
//! Contract shared by every parser here: on success the cursor has advanced
//! past what was consumed; on failure it is exactly where it was before the
//! attempt. [`BoxedParser::new`] enforces the failure half for any parser it
//! wraps, so hand-written closures only need to get the success path right.

use std::cell::OnceCell;
use std::rc::Rc;

use log::trace;

use crate::context::{Context, ParseError, ParseErrorKind, ParseResult, Snapshot};
use crate::token::{Keyword, Located, Location, Operator, Structure, Token};

/// A parser producing `T`.
pub trait Parser<T> {
    fn parse(&self, cx: &mut Context) -> ParseResult<T>;
}

impl<T, F: Fn(&mut Context) -> ParseResult<T>> Parser<T> for F {
    fn parse(&self, cx: &mut Context) -> ParseResult<T> {
        self(cx)
    }
}

type ParserFn<T> = Rc<dyn Fn(&mut Context) -> ParseResult<T>>;

/// Type-erased, cheaply clonable parser.
pub struct BoxedParser<T> {
    parser: ParserFn<T>,
}

impl<T> Clone for BoxedParser<T> {
    fn clone(&self) -> Self {
        Self {
            parser: Rc::clone(&self.parser),
        }
    }
}

impl<T> Parser<T> for BoxedParser<T> {
    fn parse(&self, cx: &mut Context) -> ParseResult<T> {
        (self.parser)(cx)
    }
}

impl<T: 'static> BoxedParser<T> {
    /// Wrap `parser`, rewinding the cursor whenever it fails.
    pub fn new<P: Parser<T> + 'static>(parser: P) -> Self {
        Self {
            parser: Rc::new(move |cx: &mut Context| {
                let start = cx.snapshot();
                let result = parser.parse(cx);
                if result.is_err() {
                    cx.revert(start);
                }
                result
            }),
        }
    }

    /// Wrap a parser that already leaves the cursor in place on failure.
    fn from_fn<P: Parser<T> + 'static>(parser: P) -> Self {
        Self {
            parser: Rc::new(move |cx: &mut Context| parser.parse(cx)),
        }
    }

    /// Transform the produced value.
    #[must_use]
    pub fn map<U: 'static, F: Fn(T) -> U + 'static>(self, f: F) -> BoxedParser<U> {
        BoxedParser::from_fn(move |cx: &mut Context| self.parse(cx).map(&f))
    }

    /// Transform the produced value with a step that may itself fail.
    #[must_use]
    pub fn and_then<U: 'static, F: Fn(T) -> ParseResult<U> + 'static>(
        self,
        f: F,
    ) -> BoxedParser<U> {
        BoxedParser::new(move |cx: &mut Context| self.parse(cx).and_then(&f))
    }

    /// Parse `self` then `other`; both or neither.
    #[must_use]
    pub fn then<U: 'static>(self, other: BoxedParser<U>) -> BoxedParser<(T, U)> {
        BoxedParser::new(move |cx: &mut Context| {
            let a = self.parse(cx)?;
            let b = other.parse(cx)?;
            Ok((a, b))
        })
    }

    /// Parse `self` then `other`, keeping only `self`'s value.
    #[must_use]
    pub fn skip<U: 'static>(self, other: BoxedParser<U>) -> Self {
        Self::new(move |cx: &mut Context| {
            let a = self.parse(cx)?;
            other.parse(cx)?;
            Ok(a)
        })
    }

    /// Parse `self` then `other`, keeping only `other`'s value.
    #[must_use]
    pub fn skip_left<U: 'static>(self, other: BoxedParser<U>) -> BoxedParser<U> {
        BoxedParser::new(move |cx: &mut Context| {
            self.parse(cx)?;
            other.parse(cx)
        })
    }

    /// Ordered choice: `other` runs only when `self` fails.
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        Self::from_fn(move |cx: &mut Context| match self.parse(cx) {
            Ok(value) => Ok(value),
            Err(err) => {
                trace!("or: falling back ({err})");
                other.parse(cx)
            }
        })
    }

    /// Report `name` as the expected construct when this parser fails on
    /// a token mismatch. Illegal-construct failures pass through as-is.
    #[must_use]
    pub fn label(self, name: &'static str) -> Self {
        Self::from_fn(move |cx: &mut Context| {
            self.parse(cx).map_err(|mut err| {
                match &mut err.kind {
                    ParseErrorKind::UnexpectedToken { expected, .. }
                    | ParseErrorKind::EndOfStream { expected } => *expected = name.to_string(),
                    ParseErrorKind::IllegalConstruct { .. }
                    | ParseErrorKind::TrailingInput { .. } => {}
                }
                err
            })
        })
    }
}

/// Run every parser in order. All must succeed; on any failure the whole
/// sequence rewinds to where it started.
#[must_use]
pub fn sequence<T: 'static>(parsers: Vec<BoxedParser<T>>) -> BoxedParser<Vec<T>> {
    BoxedParser::new(move |cx: &mut Context| {
        parsers
            .iter()
            .map(|parser| parser.parse(cx))
            .collect::<ParseResult<Vec<T>>>()
    })
}

/// Try every alternative from the same position and keep the one that
/// consumed the most tokens. Ties go to the earlier alternative. When none
/// match, the failure of the first alternative is reported.
#[must_use]
pub fn any_of<T: 'static>(alternatives: Vec<BoxedParser<T>>) -> BoxedParser<T> {
    BoxedParser::new(move |cx: &mut Context| {
        let start = cx.snapshot();
        let mut best: Option<(usize, T, Snapshot)> = None;
        let mut first_error = None;

        for (i, alternative) in alternatives.iter().enumerate() {
            cx.revert(start);
            match alternative.parse(cx) {
                Ok(value) => {
                    let end = cx.snapshot();
                    if best.as_ref().is_none_or(|(_, _, best_end)| end > *best_end) {
                        best = Some((i, value, end));
                    }
                }
                Err(err) => {
                    first_error.get_or_insert(err);
                }
            }
        }

        match best {
            Some((i, value, end)) => {
                trace!(
                    "any_of: alternative {i} won with {} token(s)",
                    end.index() - start.index()
                );
                cx.revert(end);
                Ok(value)
            }
            None => {
                cx.revert(start);
                Err(first_error.unwrap_or_else(|| cx.error_expected("an alternative")))
            }
        }
    })
}

/// Match every named parser exactly once, in whatever order the input
/// presents them. Each round commits the pending parser with the longest
/// match (earliest declared on ties). Values come back in declaration order.
#[must_use]
pub fn all_of<T: 'static>(parsers: Vec<(&'static str, BoxedParser<T>)>) -> BoxedParser<Vec<T>> {
    BoxedParser::new(move |cx: &mut Context| {
        let mut results: Vec<Option<T>> = parsers.iter().map(|_| None).collect();
        let mut pending = parsers.len();

        while pending > 0 {
            let round = cx.snapshot();
            let mut best: Option<(usize, T, Snapshot)> = None;
            let mut first_error = None;

            for (i, (_, parser)) in parsers.iter().enumerate() {
                if results[i].is_some() {
                    continue;
                }
                cx.revert(round);
                match parser.parse(cx) {
                    Ok(value) => {
                        let end = cx.snapshot();
                        if best.as_ref().is_none_or(|(_, _, best_end)| end > *best_end) {
                            best = Some((i, value, end));
                        }
                    }
                    Err(err) => {
                        first_error.get_or_insert(err);
                    }
                }
            }

            let Some((i, value, end)) = best else {
                cx.revert(round);
                return Err(first_error.unwrap_or_else(|| cx.error_expected("a required part")));
            };
            trace!("all_of: committed '{}'", parsers[i].0);
            cx.revert(end);
            results[i] = Some(value);
            pending -= 1;
        }

        Ok(results.into_iter().flatten().collect())
    })
}

/// Greedy `element (separator element)*`. Zero elements is a success.
/// Progress made before a failing separator or element is kept, so a
/// trailing separator is consumed.
#[must_use]
pub fn separated<T: 'static, S: 'static>(
    element: BoxedParser<T>,
    separator: BoxedParser<S>,
) -> BoxedParser<Vec<T>> {
    BoxedParser::new(move |cx: &mut Context| {
        let mut items = Vec::new();
        let Ok(first) = element.parse(cx) else {
            return Ok(items);
        };
        items.push(first);

        while separator.parse(cx).is_ok() {
            match element.parse(cx) {
                Ok(item) => items.push(item),
                Err(err) => {
                    trace!("separated: stopped after separator ({err})");
                    break;
                }
            }
        }

        Ok(items)
    })
}

/// Zero or more occurrences. Stops at the first failure or at a success
/// that consumed nothing.
#[must_use]
pub fn many<T: 'static>(parser: BoxedParser<T>) -> BoxedParser<Vec<T>> {
    BoxedParser::new(move |cx: &mut Context| {
        let mut items = Vec::new();
        loop {
            let before = cx.snapshot();
            match parser.parse(cx) {
                Ok(item) => {
                    items.push(item);
                    if cx.consumed_since(before) == 0 {
                        break;
                    }
                }
                Err(_) => break,
            }
        }
        Ok(items)
    })
}

/// Attempt `parser`; a failure becomes `None`. Never fails.
#[must_use]
pub fn optional<T: 'static>(parser: BoxedParser<T>) -> BoxedParser<Option<T>> {
    BoxedParser::new(move |cx: &mut Context| Ok(parser.parse(cx).ok()))
}

/// Build the parser on first use and reuse it afterwards. Breaks
/// construction-time recursion in self-referential grammars.
#[must_use]
pub fn lazy<T: 'static>(build: fn() -> BoxedParser<T>) -> BoxedParser<T> {
    let built = OnceCell::new();
    BoxedParser::from_fn(move |cx: &mut Context| built.get_or_init(build).parse(cx))
}

/// Succeeds only when no tokens remain.
#[must_use]
pub fn end_of_input() -> BoxedParser<()> {
    BoxedParser::new(|cx: &mut Context| match cx.peek() {
        None => Ok(()),
        Some(token) => Err(ParseError {
            kind: ParseErrorKind::TrailingInput {
                found: token.value.describe(),
            },
            location: token.location,
        }),
    })
}

/// Consume one token when `select` accepts it.
pub fn token_matching<U: 'static, F: Fn(&Token) -> Option<U> + 'static>(
    expected: impl Into<String>,
    select: F,
) -> BoxedParser<Located<U>> {
    let expected = expected.into();
    BoxedParser::new(move |cx: &mut Context| {
        let selected = cx
            .peek()
            .and_then(|token| select(&token.value).map(|value| (value, token.location)));
        match selected {
            Some((value, location)) => {
                cx.advance();
                Ok(Located::new(value, location))
            }
            None => Err(cx.error_expected(expected.as_str())),
        }
    })
}

#[must_use]
pub fn keyword(expected: Keyword) -> BoxedParser<Location> {
    token_matching(format!("'{}'", expected.text()), move |token| {
        matches!(token, Token::Keyword(k) if *k == expected).then_some(())
    })
    .map(|located| located.location)
}

#[must_use]
pub fn operator(expected: Operator) -> BoxedParser<Location> {
    token_matching(format!("'{}'", expected.text()), move |token| {
        matches!(token, Token::Operator(op) if *op == expected).then_some(())
    })
    .map(|located| located.location)
}

#[must_use]
pub fn structure(expected: Structure) -> BoxedParser<Location> {
    token_matching(format!("'{}'", expected.text()), move |token| {
        matches!(token, Token::Structure(s) if *s == expected).then_some(())
    })
    .map(|located| located.location)
}

#[must_use]
pub fn identifier() -> BoxedParser<Located<String>> {
    token_matching("identifier", |token| match token {
        Token::Identifier { name } => Some(name.clone()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn context(input: &str) -> Context {
        Context::new(tokenize(input).expect("tokenize failed"))
    }

    fn name() -> BoxedParser<String> {
        identifier().map(|located| located.value)
    }

    fn comma() -> BoxedParser<Location> {
        structure(Structure::Comma)
    }

    #[test]
    fn sequence_rewinds_entirely() {
        let mut cx = context("a b ,");
        let parser = sequence(vec![name(), name(), name()]);
        assert!(parser.parse(&mut cx).is_err());
        assert_eq!(cx.snapshot().index(), 0);
    }

    #[test]
    fn sequence_collects_in_order() {
        let mut cx = context("a b");
        let values = sequence(vec![name(), name()])
            .parse(&mut cx)
            .expect("should parse");
        assert_eq!(values, vec!["a", "b"]);
    }

    #[test]
    fn any_of_prefers_longest() {
        let mut cx = context("a b c");
        let one = name().map(|n| vec![n]);
        let two = sequence(vec![name(), name()]);
        let winner = any_of(vec![one, two]).parse(&mut cx).expect("should parse");
        assert_eq!(winner.len(), 2);
        assert_eq!(cx.snapshot().index(), 2);
    }

    #[test]
    fn any_of_tie_goes_to_first() {
        let mut cx = context("a");
        let first = name().map(|_| "first");
        let second = name().map(|_| "second");
        let winner = any_of(vec![first, second]).parse(&mut cx).expect("should parse");
        assert_eq!(winner, "first");
    }

    #[test]
    fn any_of_reports_first_failure() {
        let mut cx = context(",");
        let err = any_of(vec![
            keyword(Keyword::If).map(|_| ()),
            keyword(Keyword::While).map(|_| ()),
        ])
        .parse(&mut cx)
        .unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::UnexpectedToken {
                expected: "'if'".to_string(),
                found: "','".to_string(),
            }
        );
        assert_eq!(cx.snapshot().index(), 0);
    }

    #[test]
    fn all_of_accepts_any_order() {
        let mut cx = context("while if");
        let parser = all_of(vec![
            ("if", keyword(Keyword::If).map(|_| "if")),
            ("while", keyword(Keyword::While).map(|_| "while")),
        ]);
        let values = parser.parse(&mut cx).expect("should parse");
        assert_eq!(values, vec!["if", "while"]);
        assert!(!cx.has_next());
    }

    #[test]
    fn all_of_rewinds_when_one_is_missing() {
        let mut cx = context("while while");
        let parser = all_of(vec![
            ("if", keyword(Keyword::If).map(|_| ())),
            ("while", keyword(Keyword::While).map(|_| ())),
        ]);
        assert!(parser.parse(&mut cx).is_err());
        assert_eq!(cx.snapshot().index(), 0);
    }

    #[test]
    fn separated_tolerates_trailing_separator() {
        let mut cx = context("a, b, c, )");
        let values = separated(name(), comma())
            .parse(&mut cx)
            .expect("should parse");
        assert_eq!(values, vec!["a", "b", "c"]);
        assert_eq!(cx.snapshot().index(), 6);
    }

    #[test]
    fn separated_allows_zero_elements() {
        let mut cx = context(")");
        let values = separated(name(), comma())
            .parse(&mut cx)
            .expect("should parse");
        assert!(values.is_empty());
        assert_eq!(cx.snapshot().index(), 0);
    }

    #[test]
    fn optional_never_fails() {
        let mut cx = context(",");
        let value = optional(name()).parse(&mut cx).expect("should parse");
        assert_eq!(value, None);
        assert_eq!(cx.snapshot().index(), 0);
    }

    #[test]
    fn many_stops_on_empty_success() {
        let mut cx = context("a");
        let values = many(optional(comma())).parse(&mut cx).expect("should parse");
        assert_eq!(values.len(), 1);
    }

    #[test]
    fn label_replaces_expected() {
        let mut cx = context("1");
        let err = name().label("name").parse(&mut cx).unwrap_err();
        assert!(matches!(
            err.kind,
            ParseErrorKind::UnexpectedToken { ref expected, .. } if expected == "name"
        ));
    }

    #[test]
    fn end_of_input_reports_trailing_token() {
        let mut cx = context("a");
        let err = end_of_input().parse(&mut cx).unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::TrailingInput { .. }));
    }
}
