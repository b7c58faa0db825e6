#![allow(dead_code)]

use srcfront::{Expression, Node, format, parse_expression_str, parse_str};

pub fn expr(input: &str) -> Expression {
    parse_expression_str(input).unwrap_or_else(|e| panic!("failed to parse {input:?}: {e}"))
}

pub fn nodes(input: &str) -> Vec<Node> {
    parse_str(input).unwrap_or_else(|e| panic!("failed to parse {input:?}: {e}"))
}

pub fn var(name: &str) -> Expression {
    Expression::variable(name)
}

pub fn num(value: &str) -> Expression {
    Expression::number(value)
}

/// Parse, format, and compare against the input.
pub fn roundtrip(input: &str) {
    let output = format(&nodes(input));
    assert_eq!(
        output, input,
        "round-trip mismatch:\n--- expected ---\n{input}\n--- got ---\n{output}"
    );
}
