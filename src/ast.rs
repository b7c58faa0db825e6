//! Syntax tree produced by the grammar.
//!
//! Each composite node owns its children. Increment/decrement and
//! assignment hold their target as a plain name, so a tree with a
//! non-variable target cannot be built.

/// One top-level construct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Expression(Expression),
    Statement(Statement),
    Definition(Definition),
}

/// A value-producing expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    Boolean(bool),
    Numeric {
        value: String,
        unit: Option<String>,
    },
    Textual {
        value: String,
        unit: Option<String>,
    },
    /// Variable read.
    Variable(String),
    Call {
        function: String,
        arguments: Vec<Argument>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Self>,
    },
    /// `++`/`--` applied to a variable.
    Step {
        op: StepOp,
        target: String,
    },
    Binary {
        op: BinaryOp,
        left: Box<Self>,
        right: Box<Self>,
    },
    Assign {
        op: AssignOp,
        target: String,
        value: Box<Self>,
    },
}

/// Call argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Argument {
    Positional(Expression),
    /// `name = value`.
    Named { name: String, value: Expression },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Plus,
    Minus,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepOp {
    PreIncrement,
    PreDecrement,
    PostIncrement,
    PostDecrement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Multiply,
    Divide,
    Remainder,
    Add,
    Subtract,
    /// Three-way comparison `<=>`.
    Compare,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Equal,
    NotEqual,
    And,
    Or,
    Xor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignOp {
    Assign,
    Add,
    Subtract,
    Multiply,
    Divide,
    Remainder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Associativity {
    Left,
    Right,
}

/// Any infix operator: either a pure binary operator or an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Infix {
    Binary(BinaryOp),
    Assign(AssignOp),
}

impl Infix {
    /// Binding strength; lower binds tighter.
    #[must_use]
    pub const fn precedence(self) -> u8 {
        match self {
            Self::Binary(BinaryOp::Multiply | BinaryOp::Divide | BinaryOp::Remainder) => 0,
            Self::Binary(BinaryOp::Add | BinaryOp::Subtract) => 1,
            Self::Binary(BinaryOp::Compare) => 2,
            Self::Binary(
                BinaryOp::Less
                | BinaryOp::LessEqual
                | BinaryOp::Greater
                | BinaryOp::GreaterEqual
                | BinaryOp::Equal
                | BinaryOp::NotEqual,
            ) => 3,
            Self::Binary(BinaryOp::And) => 4,
            Self::Binary(BinaryOp::Or) => 5,
            Self::Binary(BinaryOp::Xor) => 6,
            Self::Assign(_) => 7,
        }
    }

    #[must_use]
    pub const fn associativity(self) -> Associativity {
        match self {
            Self::Binary(_) => Associativity::Left,
            Self::Assign(_) => Associativity::Right,
        }
    }

    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Binary(op) => op.symbol(),
            Self::Assign(op) => op.symbol(),
        }
    }
}

impl BinaryOp {
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Remainder => "%",
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Compare => "<=>",
            Self::Less => "<",
            Self::LessEqual => "<=",
            Self::Greater => ">",
            Self::GreaterEqual => ">=",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::And => "&&",
            Self::Or => "||",
            Self::Xor => "^",
        }
    }
}

impl AssignOp {
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Assign => "=",
            Self::Add => "+=",
            Self::Subtract => "-=",
            Self::Multiply => "*=",
            Self::Divide => "/=",
            Self::Remainder => "%=",
        }
    }
}

impl UnaryOp {
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Not => "!",
        }
    }
}

impl StepOp {
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::PreIncrement | Self::PostIncrement => "++",
            Self::PreDecrement | Self::PostDecrement => "--",
        }
    }

    #[must_use]
    pub const fn is_prefix(self) -> bool {
        matches!(self, Self::PreIncrement | Self::PreDecrement)
    }
}

/// A side-effecting or control-flow construct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// `expression;`
    Expression(Expression),
    Block(Vec<Node>),
    If {
        condition: Expression,
        then_branch: Vec<Node>,
        /// Either a `Block` or a nested `If`.
        else_branch: Option<Box<Self>>,
    },
    While {
        condition: Expression,
        body: Vec<Node>,
    },
    Return(Option<Expression>),
}

/// A named declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Definition {
    /// `var name;` or `var name = initializer;`
    Variable {
        name: String,
        initializer: Option<Expression>,
    },
    /// `fn name(params) { ... }`, or `fn name(params);` when only declared.
    Function {
        name: String,
        modifiers: Modifiers,
        parameters: Vec<String>,
        body: Option<Vec<Node>>,
    },
}

/// Function modifiers; each may appear once, in any order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub export: bool,
    pub inline: bool,
}

impl Definition {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Variable { name, .. } | Self::Function { name, .. } => name,
        }
    }

    /// Whether this is a declaration still waiting for its definition.
    #[must_use]
    pub const fn is_forward(&self) -> bool {
        match self {
            Self::Variable { initializer, .. } => initializer.is_none(),
            Self::Function { body, .. } => body.is_none(),
        }
    }
}

impl Expression {
    #[must_use]
    pub fn number(value: &str) -> Self {
        Self::Numeric {
            value: value.to_string(),
            unit: None,
        }
    }

    #[must_use]
    pub fn text(value: &str) -> Self {
        Self::Textual {
            value: value.to_string(),
            unit: None,
        }
    }

    #[must_use]
    pub fn variable(name: &str) -> Self {
        Self::Variable(name.to_string())
    }

    #[must_use]
    pub fn unary(op: UnaryOp, operand: Self) -> Self {
        Self::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    #[must_use]
    pub fn binary(op: BinaryOp, left: Self, right: Self) -> Self {
        Self::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    #[must_use]
    pub fn assign(op: AssignOp, target: &str, value: Self) -> Self {
        Self::Assign {
            op,
            target: target.to_string(),
            value: Box::new(value),
        }
    }

    #[must_use]
    pub fn call(function: &str, arguments: Vec<Argument>) -> Self {
        Self::Call {
            function: function.to_string(),
            arguments,
        }
    }

    /// The infix operator at the root of this expression, if any.
    #[must_use]
    pub const fn infix(&self) -> Option<Infix> {
        match self {
            Self::Binary { op, .. } => Some(Infix::Binary(*op)),
            Self::Assign { op, .. } => Some(Infix::Assign(*op)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignment_is_loosest_and_right_associative() {
        let assign = Infix::Assign(AssignOp::Add);
        assert!(Infix::Binary(BinaryOp::Xor).precedence() < assign.precedence());
        assert_eq!(assign.associativity(), Associativity::Right);
    }

    #[test]
    fn multiplicative_binds_tightest() {
        let mul = Infix::Binary(BinaryOp::Multiply).precedence();
        let add = Infix::Binary(BinaryOp::Add).precedence();
        assert!(mul < add);
    }

    #[test]
    fn forward_definitions() {
        let declared = Definition::Variable {
            name: "x".to_string(),
            initializer: None,
        };
        assert!(declared.is_forward());
        assert_eq!(declared.name(), "x");
    }
}
