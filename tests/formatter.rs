//! Formatter-specific tests.

mod common;

use common::{expr, nodes, roundtrip};
use srcfront::{format, format_expression};

fn reformat(input: &str) -> String {
    format_expression(&expr(input))
}

#[test]
fn format_trailing_newline() {
    let output = format(&nodes("x = 1;"));
    assert_eq!(output, "x = 1;\n");
}

#[test]
fn format_empty_program() {
    assert_eq!(format(&[]), "");
}

#[test]
fn format_four_space_indentation() {
    let output = format(&nodes("fn f(a) { while (a) { a--; } }"));
    assert_eq!(output, "fn f(a) {\n    while (a) {\n        a--;\n    }\n}\n");
}

#[test]
fn format_drops_redundant_parentheses() {
    assert_eq!(reformat("(a) + ((b * c))"), "a + b * c");
    assert_eq!(reformat("((a - b)) - c"), "a - b - c");
}

#[test]
fn format_keeps_required_parentheses() {
    assert_eq!(reformat("(a + b) * c"), "(a + b) * c");
    assert_eq!(reformat("a - (b - c)"), "a - (b - c)");
    assert_eq!(reformat("(a || b) && c"), "(a || b) && c");
    assert_eq!(reformat("(x = 1) + 2"), "(x = 1) + 2");
}

#[test]
fn format_normalizes_spacing() {
    assert_eq!(reformat("f(a,b=2,)"), "f(a, b = 2)");
    assert_eq!(reformat("x+=-y"), "x += -y");
}

#[test]
fn format_unary_over_group() {
    assert_eq!(reformat("-(a + b)"), "-(a + b)");
    assert_eq!(reformat("!(!a)"), "!(!a)");
}

#[test]
fn format_units_and_text() {
    assert_eq!(reformat("12px + 1.5em"), "12px + 1.5em");
    assert_eq!(reformat(r#""tab\there"ms"#), r#""tab\there"ms"#);
}

#[test]
fn format_quotes_keyword_names() {
    assert_eq!(reformat("`while` + `a b`"), "`while` + `a b`");
}

#[test]
fn format_strips_comments() {
    let output = format(&nodes("// leading\nvar a = 1; // trailing\n"));
    assert_eq!(output, "var a = 1;\n");
}

// -----------------------------------------------------------
// Programs that are already canonical survive unchanged.
// -----------------------------------------------------------

#[test]
fn roundtrip_definitions() {
    roundtrip("var limit = 10;\nvar count;\nexport fn reset();\n");
}

#[test]
fn roundtrip_if_chain() {
    roundtrip(
        "if (a <=> b < 0) {\n    low++;\n} else if (a == b) {} else {\n    high++;\n}\n",
    );
}

#[test]
fn roundtrip_calls() {
    roundtrip("print(\"total\", value = sum(a, b) * 2, (flag = true));\n");
}

#[test]
fn roundtrip_nested_function() {
    roundtrip(
        "inline fn clamp(v, lo, hi) {\n    if (v < lo) {\n        return lo;\n    }\n    return v > hi ^ false;\n}\nclamp(1, 0, 2)\n",
    );
}
