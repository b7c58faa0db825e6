//! Pretty-printer that serializes a syntax tree back into canonical source.
//!
//! Output re-parses to the same tree: infix expressions get exactly the
//! parentheses their precedence and associativity require, names that are
//! not plain identifiers are backtick-quoted, and text is re-escaped.

use std::fmt::Write as _;

use crate::ast::{
    Argument, Associativity, Definition, Expression, Infix, Modifiers, Node, Statement,
};
use crate::token::Keyword;

const INDENT: &str = "    ";

/// Format a program, one top-level item per line.
#[must_use]
pub fn format(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        format_node(&mut out, node, 0);
        out.push('\n');
    }
    out
}

/// Format a single expression without a trailing newline.
#[must_use]
pub fn format_expression(expression: &Expression) -> String {
    let mut out = String::new();
    format_expr(&mut out, expression);
    out
}

fn push_indent(out: &mut String, indent: usize) {
    for _ in 0..indent {
        out.push_str(INDENT);
    }
}

fn format_node(out: &mut String, node: &Node, indent: usize) {
    match node {
        Node::Expression(expression) => format_expr(out, expression),
        Node::Statement(statement) => format_statement(out, statement, indent),
        Node::Definition(definition) => format_definition(out, definition, indent),
    }
}

fn format_block(out: &mut String, items: &[Node], indent: usize) {
    if items.is_empty() {
        out.push_str("{}");
        return;
    }
    out.push_str("{\n");
    for item in items {
        push_indent(out, indent + 1);
        format_node(out, item, indent + 1);
        out.push('\n');
    }
    push_indent(out, indent);
    out.push('}');
}

fn format_statement(out: &mut String, statement: &Statement, indent: usize) {
    match statement {
        Statement::Expression(expression) => {
            format_expr(out, expression);
            out.push(';');
        }
        Statement::Block(items) => format_block(out, items, indent),
        Statement::If {
            condition,
            then_branch,
            else_branch,
        } => {
            out.push_str("if (");
            format_expr(out, condition);
            out.push_str(") ");
            format_block(out, then_branch, indent);
            if let Some(otherwise) = else_branch {
                out.push_str(" else ");
                format_statement(out, otherwise, indent);
            }
        }
        Statement::While { condition, body } => {
            out.push_str("while (");
            format_expr(out, condition);
            out.push_str(") ");
            format_block(out, body, indent);
        }
        Statement::Return(None) => out.push_str("return;"),
        Statement::Return(Some(value)) => {
            out.push_str("return ");
            format_expr(out, value);
            out.push(';');
        }
    }
}

fn format_definition(out: &mut String, definition: &Definition, indent: usize) {
    match definition {
        Definition::Variable { name, initializer } => {
            out.push_str("var ");
            format_name(out, name);
            if let Some(value) = initializer {
                out.push_str(" = ");
                format_expr(out, value);
            }
            out.push(';');
        }
        Definition::Function {
            name,
            modifiers,
            parameters,
            body,
        } => {
            format_modifiers(out, *modifiers);
            out.push_str("fn ");
            format_name(out, name);
            out.push('(');
            for (i, parameter) in parameters.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                format_name(out, parameter);
            }
            out.push(')');
            match body {
                Some(items) => {
                    out.push(' ');
                    format_block(out, items, indent);
                }
                None => out.push(';'),
            }
        }
    }
}

fn format_modifiers(out: &mut String, modifiers: Modifiers) {
    if modifiers.export {
        out.push_str("export ");
    }
    if modifiers.inline {
        out.push_str("inline ");
    }
}

/// Plain identifiers print as-is; keywords and anything else go in backticks.
fn format_name(out: &mut String, name: &str) {
    let mut chars = name.chars();
    let plain = chars
        .next()
        .is_some_and(|first| first.is_alphabetic() || first == '_')
        && chars.all(|ch| ch.is_alphanumeric() || ch == '_')
        && !Keyword::ALL.iter().any(|keyword| keyword.text() == name);
    if plain {
        out.push_str(name);
    } else {
        out.push('`');
        out.push_str(name);
        out.push('`');
    }
}

fn format_text(out: &mut String, value: &str) {
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            _ => out.push(ch),
        }
    }
    out.push('"');
}

fn format_expr(out: &mut String, expression: &Expression) {
    match expression {
        Expression::Boolean(value) => {
            let _ = write!(out, "{value}");
        }
        Expression::Numeric { value, unit } => {
            out.push_str(value);
            out.push_str(unit.as_deref().unwrap_or(""));
        }
        Expression::Textual { value, unit } => {
            format_text(out, value);
            out.push_str(unit.as_deref().unwrap_or(""));
        }
        Expression::Variable(name) => format_name(out, name),
        Expression::Call {
            function,
            arguments,
        } => {
            format_name(out, function);
            out.push('(');
            for (i, argument) in arguments.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                format_argument(out, argument);
            }
            out.push(')');
        }
        Expression::Unary { op, operand } => {
            out.push_str(op.symbol());
            // grouped so that `-(-a)` never lexes as `--a`
            let grouped = matches!(
                **operand,
                Expression::Unary { .. }
                    | Expression::Binary { .. }
                    | Expression::Assign { .. }
            ) || matches!(**operand, Expression::Step { op, .. } if op.is_prefix());
            format_grouped(out, operand, grouped);
        }
        Expression::Step { op, target } => {
            if op.is_prefix() {
                out.push_str(op.symbol());
                format_name(out, target);
            } else {
                format_name(out, target);
                out.push_str(op.symbol());
            }
        }
        Expression::Binary { op, left, right } => {
            let infix = Infix::Binary(*op);
            format_grouped(out, left, needs_group(infix, left, Associativity::Right));
            let _ = write!(out, " {} ", infix.symbol());
            format_grouped(out, right, needs_group(infix, right, Associativity::Left));
        }
        Expression::Assign { op, target, value } => {
            let infix = Infix::Assign(*op);
            format_name(out, target);
            let _ = write!(out, " {} ", infix.symbol());
            format_grouped(out, value, needs_group(infix, value, Associativity::Left));
        }
    }
}

/// A child of `parent` needs parentheses when it binds looser, or equally
/// tight and `parent` associates toward the other side (`against`).
fn needs_group(parent: Infix, child: &Expression, against: Associativity) -> bool {
    child.infix().is_some_and(|inner| {
        inner.precedence() > parent.precedence()
            || (inner.precedence() == parent.precedence()
                && parent.associativity() == against)
    })
}

fn format_grouped(out: &mut String, expression: &Expression, grouped: bool) {
    if grouped {
        out.push('(');
        format_expr(out, expression);
        out.push(')');
    } else {
        format_expr(out, expression);
    }
}

fn format_argument(out: &mut String, argument: &Argument) {
    match argument {
        Argument::Named { name, value } => {
            format_name(out, name);
            out.push_str(" = ");
            format_expr(out, value);
        }
        // a bare `x = v` would read back as a named argument
        Argument::Positional(value) => {
            format_grouped(out, value, matches!(value, Expression::Assign { .. }));
        }
    }
}
