//! Expression parsers: leaves, prefix/postfix operators, and precedence
//! climbing over infix operators.

use log::trace;

use crate::ast::{
    Argument, AssignOp, Associativity, BinaryOp, Expression, Infix, StepOp, UnaryOp,
};
use crate::combinator::{
    BoxedParser, Parser, any_of, identifier, operator, separated, structure, token_matching,
};
use crate::context::{Context, ParseError, ParseResult};
use crate::token::{Keyword, Located, Location, Operator, Structure, Token};

/// Loosest precedence level; every infix operator is accepted at this bound.
const LOOSEST: u8 = 7;

/// expression := operand (infix operand)*
pub fn expression() -> BoxedParser<Expression> {
    BoxedParser::new(|cx: &mut Context| {
        let left = operand().parse(cx)?;
        climb(cx, left, LOOSEST)
    })
}

/// leaf := boolean | numeric | textual | call | variable | "(" expression ")"
///
/// Alternatives compete on match length, so `f(x)` is a call rather than
/// the variable `f`.
pub fn leaf() -> BoxedParser<Expression> {
    any_of(vec![
        boolean(),
        numeric(),
        textual(),
        call(),
        variable(),
        parenthesized(),
    ])
    .label("expression")
}

pub fn boolean() -> BoxedParser<Expression> {
    token_matching("boolean", |token| match token {
        Token::Keyword(Keyword::True) => Some(true),
        Token::Keyword(Keyword::False) => Some(false),
        _ => None,
    })
    .map(|located| Expression::Boolean(located.value))
}

pub fn numeric() -> BoxedParser<Expression> {
    token_matching("number", |token| match token {
        Token::Numeric { value, unit } => Some(Expression::Numeric {
            value: value.clone(),
            unit: unit.clone(),
        }),
        _ => None,
    })
    .map(|located| located.value)
}

pub fn textual() -> BoxedParser<Expression> {
    token_matching("text", |token| match token {
        Token::Textual { value, unit } => Some(Expression::Textual {
            value: value.clone(),
            unit: unit.clone(),
        }),
        _ => None,
    })
    .map(|located| located.value)
}

pub fn variable() -> BoxedParser<Expression> {
    identifier().map(|located| Expression::Variable(located.value))
}

/// "(" expression ")", yielding the inner expression.
pub fn parenthesized() -> BoxedParser<Expression> {
    structure(Structure::OpenParen)
        .skip_left(expression())
        .skip(structure(Structure::CloseParen))
}

/// call := identifier arguments
pub fn call() -> BoxedParser<Expression> {
    identifier()
        .then(arguments())
        .map(|(function, arguments)| Expression::Call {
            function: function.value,
            arguments,
        })
}

/// arguments := "(" (argument ("," argument)* ","?)? ")"
pub fn arguments() -> BoxedParser<Vec<Argument>> {
    structure(Structure::OpenParen)
        .skip_left(separated(argument(), structure(Structure::Comma)))
        .skip(structure(Structure::CloseParen))
}

/// `name = value` is tried first; a positional argument is parsed only when
/// that fails.
fn argument() -> BoxedParser<Argument> {
    let named = identifier()
        .skip(operator(Operator::Assign))
        .then(expression())
        .map(|(name, value)| Argument::Named {
            name: name.value,
            value,
        });
    named.or(expression().map(Argument::Positional))
}

#[derive(Debug, Clone, Copy)]
enum Prefix {
    Unary(UnaryOp),
    Step(StepOp),
}

fn prefix_operator() -> BoxedParser<Located<Prefix>> {
    token_matching("prefix operator", |token| match token {
        Token::Operator(Operator::Plus) => Some(Prefix::Unary(UnaryOp::Plus)),
        Token::Operator(Operator::Minus) => Some(Prefix::Unary(UnaryOp::Minus)),
        Token::Operator(Operator::Bang) => Some(Prefix::Unary(UnaryOp::Not)),
        Token::Operator(Operator::PlusPlus) => Some(Prefix::Step(StepOp::PreIncrement)),
        Token::Operator(Operator::MinusMinus) => Some(Prefix::Step(StepOp::PreDecrement)),
        _ => None,
    })
}

fn postfix_operator() -> BoxedParser<Located<StepOp>> {
    token_matching("postfix operator", |token| match token {
        Token::Operator(Operator::PlusPlus) => Some(StepOp::PostIncrement),
        Token::Operator(Operator::MinusMinus) => Some(StepOp::PostDecrement),
        _ => None,
    })
}

/// operand := prefix operand | leaf postfix?
pub fn operand() -> BoxedParser<Expression> {
    BoxedParser::new(|cx: &mut Context| {
        if let Ok(prefix) = prefix_operator().parse(cx) {
            let inner = operand().parse(cx)?;
            return match prefix.value {
                Prefix::Unary(op) => Ok(Expression::unary(op, inner)),
                Prefix::Step(op) => step(op, inner, prefix.location),
            };
        }

        let leaf = leaf().parse(cx)?;
        match postfix_operator().parse(cx) {
            Ok(postfix) => step(postfix.value, leaf, postfix.location),
            Err(_) => Ok(leaf),
        }
    })
}

fn step(op: StepOp, operand: Expression, location: Location) -> ParseResult<Expression> {
    match operand {
        Expression::Variable(target) => Ok(Expression::Step { op, target }),
        _ => Err(ParseError::illegal(
            format!("'{}' requires a variable operand", op.symbol()),
            location,
        )),
    }
}

const fn infix_of(op: Operator) -> Option<Infix> {
    Some(match op {
        Operator::Star => Infix::Binary(BinaryOp::Multiply),
        Operator::Slash => Infix::Binary(BinaryOp::Divide),
        Operator::Percent => Infix::Binary(BinaryOp::Remainder),
        Operator::Plus => Infix::Binary(BinaryOp::Add),
        Operator::Minus => Infix::Binary(BinaryOp::Subtract),
        Operator::Spaceship => Infix::Binary(BinaryOp::Compare),
        Operator::Less => Infix::Binary(BinaryOp::Less),
        Operator::LessEqual => Infix::Binary(BinaryOp::LessEqual),
        Operator::Greater => Infix::Binary(BinaryOp::Greater),
        Operator::GreaterEqual => Infix::Binary(BinaryOp::GreaterEqual),
        Operator::Equal => Infix::Binary(BinaryOp::Equal),
        Operator::NotEqual => Infix::Binary(BinaryOp::NotEqual),
        Operator::AndAnd => Infix::Binary(BinaryOp::And),
        Operator::OrOr => Infix::Binary(BinaryOp::Or),
        Operator::Caret => Infix::Binary(BinaryOp::Xor),
        Operator::Assign => Infix::Assign(AssignOp::Assign),
        Operator::PlusAssign => Infix::Assign(AssignOp::Add),
        Operator::MinusAssign => Infix::Assign(AssignOp::Subtract),
        Operator::StarAssign => Infix::Assign(AssignOp::Multiply),
        Operator::SlashAssign => Infix::Assign(AssignOp::Divide),
        Operator::PercentAssign => Infix::Assign(AssignOp::Remainder),
        Operator::PlusPlus | Operator::MinusMinus | Operator::Bang => return None,
    })
}

fn peek_infix(cx: &Context) -> Option<Infix> {
    match cx.peek().map(|token| &token.value) {
        Some(Token::Operator(op)) => infix_of(*op),
        _ => None,
    }
}

/// Whether `pending` should be folded before `next` is considered: `next`
/// is left-associative and binds no tighter. A right-associative `next`
/// always takes the rest of the right-hand side, so `a + b = c` is
/// `a + (b = c)`.
fn folds_left(pending: Infix, next: Infix) -> bool {
    next.associativity() == Associativity::Left && pending.precedence() <= next.precedence()
}

/// Precedence climbing. Consumes infix operators no looser than `loosest`,
/// folding them onto `left`.
fn climb(cx: &mut Context, mut left: Expression, loosest: u8) -> ParseResult<Expression> {
    while let Some(pending) = peek_infix(cx).filter(|op| op.precedence() <= loosest) {
        let location = cx.here();
        cx.advance();
        let mut middle = operand().parse(cx)?;

        while let Some(next) = peek_infix(cx) {
            if folds_left(pending, next) {
                break;
            }
            trace!("climb: '{}' binds into the right of '{}'", next.symbol(), pending.symbol());
            middle = climb(cx, middle, next.precedence())?;
        }

        left = join(pending, left, middle, location)?;
    }
    Ok(left)
}

fn join(
    op: Infix,
    left: Expression,
    right: Expression,
    location: Location,
) -> ParseResult<Expression> {
    match op {
        Infix::Binary(op) => Ok(Expression::binary(op, left, right)),
        Infix::Assign(op) => match left {
            Expression::Variable(target) => Ok(Expression::Assign {
                op,
                target,
                value: Box::new(right),
            }),
            _ => Err(ParseError::illegal(
                format!("'{}' requires a variable on its left", op.symbol()),
                location,
            )),
        },
    }
}
