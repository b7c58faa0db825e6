//! Statement and definition parsers.

use crate::ast::{Definition, Modifiers, Node, Statement};
use crate::combinator::{
    BoxedParser, Parser, all_of, any_of, identifier, keyword, lazy, many, operator, optional,
    separated, structure,
};
use crate::context::Context;
use crate::token::{Keyword, Operator, Structure};

use super::expression::expression;

/// item := definition | statement
pub fn item() -> BoxedParser<Node> {
    any_of(vec![
        definition().map(Node::Definition),
        statement().map(Node::Statement),
    ])
}

/// block := "{" item* "}"
pub fn block() -> BoxedParser<Vec<Node>> {
    BoxedParser::new(|cx: &mut Context| {
        structure(Structure::OpenBrace).parse(cx)?;
        let items = many(item()).parse(cx)?;
        structure(Structure::CloseBrace).parse(cx)?;
        Ok(items)
    })
}

/// statement := block | if | while | return | expression ";"
pub fn statement() -> BoxedParser<Statement> {
    any_of(vec![
        lazy(block).map(Statement::Block),
        if_statement(),
        while_statement(),
        return_statement(),
        expression_statement(),
    ])
}

pub fn expression_statement() -> BoxedParser<Statement> {
    lazy(expression)
        .skip(structure(Structure::Semicolon))
        .map(Statement::Expression)
}

fn condition() -> BoxedParser<crate::ast::Expression> {
    structure(Structure::OpenParen)
        .skip_left(lazy(expression))
        .skip(structure(Structure::CloseParen))
}

/// if := "if" "(" expression ")" block ("else" (if | block))?
pub fn if_statement() -> BoxedParser<Statement> {
    BoxedParser::new(|cx: &mut Context| {
        keyword(Keyword::If).parse(cx)?;
        let condition = condition().parse(cx)?;
        let then_branch = block().parse(cx)?;
        let else_branch = optional(keyword(Keyword::Else).skip_left(else_branch())).parse(cx)?;
        Ok(Statement::If {
            condition,
            then_branch,
            else_branch: else_branch.map(Box::new),
        })
    })
}

fn else_branch() -> BoxedParser<Statement> {
    any_of(vec![
        lazy(if_statement),
        lazy(block).map(Statement::Block),
    ])
}

/// while := "while" "(" expression ")" block
pub fn while_statement() -> BoxedParser<Statement> {
    keyword(Keyword::While)
        .skip_left(condition())
        .then(lazy(block))
        .map(|(condition, body)| Statement::While { condition, body })
}

/// return := "return" expression? ";"
pub fn return_statement() -> BoxedParser<Statement> {
    keyword(Keyword::Return)
        .skip_left(optional(lazy(expression)))
        .skip(structure(Structure::Semicolon))
        .map(Statement::Return)
}

/// definition := variable | function
pub fn definition() -> BoxedParser<Definition> {
    any_of(vec![variable_definition(), function_definition()])
}

/// variable := "var" identifier ("=" expression)? ";"
pub fn variable_definition() -> BoxedParser<Definition> {
    keyword(Keyword::Var)
        .skip_left(identifier().label("variable name"))
        .then(optional(
            operator(Operator::Assign).skip_left(lazy(expression)),
        ))
        .skip(structure(Structure::Semicolon))
        .map(|(name, initializer)| Definition::Variable {
            name: name.value,
            initializer,
        })
}

/// modifiers := { "export"?, "inline"? } in any order
pub fn modifiers() -> BoxedParser<Modifiers> {
    let flag = |word: Keyword, set: fn(&mut Modifiers)| {
        optional(keyword(word)).map(move |found| {
            let mut modifiers = Modifiers::default();
            if found.is_some() {
                set(&mut modifiers);
            }
            modifiers
        })
    };
    all_of(vec![
        ("export", flag(Keyword::Export, |m| m.export = true)),
        ("inline", flag(Keyword::Inline, |m| m.inline = true)),
    ])
    .map(|parts| {
        parts.iter().fold(Modifiers::default(), |acc, part| Modifiers {
            export: acc.export || part.export,
            inline: acc.inline || part.inline,
        })
    })
}

/// function := modifiers "fn" identifier "(" parameters ")" (block | ";")
pub fn function_definition() -> BoxedParser<Definition> {
    BoxedParser::new(|cx: &mut Context| {
        let modifiers = modifiers().parse(cx)?;
        keyword(Keyword::Fn).parse(cx)?;
        let name = identifier().label("function name").parse(cx)?.value;
        let parameters = structure(Structure::OpenParen)
            .skip_left(separated(
                identifier().map(|located| located.value),
                structure(Structure::Comma),
            ))
            .skip(structure(Structure::CloseParen))
            .parse(cx)?;
        let body = any_of(vec![
            block().map(Some),
            structure(Structure::Semicolon).map(|_| None),
        ])
        .parse(cx)?;
        Ok(Definition::Function {
            name,
            modifiers,
            parameters,
            body,
        })
    })
}
