//! Grammar built on the combinator framework.

pub mod expression;
pub mod statement;

use log::debug;

use crate::ast::{Expression, Node};
use crate::combinator::{BoxedParser, Parser, end_of_input, lazy, many, optional};
use crate::context::{Context, ParseError, ParseResult};
use crate::token::{Located, Token};

pub use expression::expression;
pub use statement::{block, definition, item, statement};

/// program := item* expression? <end of input>
///
/// A trailing expression without `;` becomes a `Node::Expression`.
#[must_use]
pub fn program() -> BoxedParser<Vec<Node>> {
    BoxedParser::new(|cx: &mut Context| {
        let mut nodes = many(item()).parse(cx)?;
        let stop = cx.snapshot();
        if let Some(tail) = optional(lazy(expression)).parse(cx)? {
            nodes.push(Node::Expression(tail));
        }
        if let Err(trailing) = end_of_input().parse(cx) {
            cx.revert(stop);
            return Err(diagnose(cx).unwrap_or(trailing));
        }
        Ok(nodes)
    })
}

/// Explain why no item parses at the cursor: the failure of whichever
/// top-level construct got furthest, preferring illegal constructs on ties
/// and earlier constructs after that.
fn diagnose(cx: &mut Context) -> Option<ParseError> {
    let candidates = [
        statement::variable_definition().map(|_| ()),
        statement::function_definition().map(|_| ()),
        statement::expression_statement().map(|_| ()),
        statement::block().map(|_| ()),
        statement::if_statement().map(|_| ()),
        statement::while_statement().map(|_| ()),
        statement::return_statement().map(|_| ()),
    ];

    let mut furthest: Option<ParseError> = None;
    for candidate in candidates {
        let Err(err) = candidate.parse(cx) else {
            continue;
        };
        let further = furthest.as_ref().is_none_or(|best| {
            err.location.offset > best.location.offset
                || (err.location.offset == best.location.offset
                    && err.is_illegal_construct()
                    && !best.is_illegal_construct())
        });
        if further {
            furthest = Some(err);
        }
    }
    furthest
}

fn run<T>(parser: &BoxedParser<T>, tokens: &[Located<Token>]) -> ParseResult<T> {
    let mut cx = Context::new(tokens.to_vec());
    parser.parse(&mut cx).inspect_err(|err| {
        debug!("parse failed: {err}");
    })
}

/// Parse a token stream into a sequence of top-level nodes.
///
/// Nesting depth is bounded by the calling thread's stack.
///
/// # Errors
///
/// Returns `ParseError` on the first construct that does not parse.
pub fn parse(tokens: &[Located<Token>]) -> ParseResult<Vec<Node>> {
    run(&program(), tokens)
}

/// Parse a token stream that must hold exactly one expression.
///
/// # Errors
///
/// Returns `ParseError` when the tokens are not a single expression.
pub fn parse_expression(tokens: &[Located<Token>]) -> ParseResult<Expression> {
    run(&expression().skip(end_of_input()), tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Definition, Statement};
    use crate::context::ParseErrorKind;
    use crate::lexer::tokenize;

    fn parse_input(input: &str) -> ParseResult<Vec<Node>> {
        parse(&tokenize(input).expect("tokenize failed"))
    }

    #[test]
    fn trailing_expression_becomes_node() {
        let nodes = parse_input("var x = 1; x + 1").expect("parse failed");
        assert_eq!(nodes.len(), 2);
        assert!(matches!(nodes[0], Node::Definition(Definition::Variable { .. })));
        assert!(matches!(nodes[1], Node::Expression(_)));
    }

    #[test]
    fn statements_and_definitions() {
        let nodes = parse_input(
            "export fn inc(x) { return x + 1; }\n\
             while (i < 10) { i++; }\n",
        )
        .expect("parse failed");
        assert!(matches!(nodes[0], Node::Definition(Definition::Function { .. })));
        assert!(matches!(nodes[1], Node::Statement(Statement::While { .. })));
    }

    #[test]
    fn empty_program() {
        assert_eq!(parse_input("").expect("parse failed"), Vec::new());
    }

    #[test]
    fn illegal_construct_is_reported_from_statement() {
        let err = parse_input("x = 1;\n5++;").unwrap_err();
        assert!(err.is_illegal_construct());
    }

    #[test]
    fn two_bare_expressions_are_rejected() {
        let err = parse_input("a b").unwrap_err();
        assert!(matches!(
            err.kind,
            ParseErrorKind::UnexpectedToken { .. } | ParseErrorKind::TrailingInput { .. }
        ));
        assert_eq!(err.location.offset, 2);
    }

    #[test]
    fn expression_entry_rejects_trailing_tokens() {
        let tokens = tokenize("1 + 2 )").expect("tokenize failed");
        let err = parse_expression(&tokens).unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::TrailingInput { .. }));
    }
}
