use std::fmt;

/// Identifies the source unit a location belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(pub u32);

/// Byte range inside one source unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Location {
    pub file: FileId,
    pub offset: usize,
    pub length: usize,
}

impl Location {
    #[must_use]
    pub const fn new(file: FileId, offset: usize, length: usize) -> Self {
        Self {
            file,
            offset,
            length,
        }
    }

    /// Offset one past the last byte.
    #[must_use]
    pub const fn end(&self) -> usize {
        self.offset + self.length
    }

    /// 1-based line and column of the start of this location in `source`.
    #[must_use]
    pub fn line_col(&self, source: &str) -> (usize, usize) {
        let prefix = source.get(..self.offset).unwrap_or(source);
        let line = prefix.matches('\n').count() + 1;
        let column = prefix
            .rfind('\n')
            .map_or(prefix, |newline| &prefix[newline + 1..])
            .chars()
            .count()
            + 1;
        (line, column)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "offset {}", self.offset)
    }
}

/// A value paired with the source location it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located<T> {
    pub value: T,
    pub location: Location,
}

impl<T> Located<T> {
    pub const fn new(value: T, location: Location) -> Self {
        Self { value, location }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Located<U> {
        Located {
            value: f(self.value),
            location: self.location,
        }
    }
}

/// Reserved words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    True,
    False,
    Var,
    Fn,
    Return,
    If,
    Else,
    While,
    Export,
    Inline,
}

impl Keyword {
    pub const ALL: [Self; 10] = [
        Self::True,
        Self::False,
        Self::Var,
        Self::Fn,
        Self::Return,
        Self::If,
        Self::Else,
        Self::While,
        Self::Export,
        Self::Inline,
    ];

    #[must_use]
    pub const fn text(self) -> &'static str {
        match self {
            Self::True => "true",
            Self::False => "false",
            Self::Var => "var",
            Self::Fn => "fn",
            Self::Return => "return",
            Self::If => "if",
            Self::Else => "else",
            Self::While => "while",
            Self::Export => "export",
            Self::Inline => "inline",
        }
    }
}

/// Operator symbols. Whether an operator is prefix, postfix or infix is
/// decided by the expression grammar, not by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    PlusPlus,
    MinusMinus,
    Bang,
    Assign,
    PlusAssign,
    MinusAssign,
    StarAssign,
    SlashAssign,
    PercentAssign,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Spaceship,
    AndAnd,
    OrOr,
    Caret,
}

impl Operator {
    pub const ALL: [Self; 24] = [
        Self::Plus,
        Self::Minus,
        Self::Star,
        Self::Slash,
        Self::Percent,
        Self::PlusPlus,
        Self::MinusMinus,
        Self::Bang,
        Self::Assign,
        Self::PlusAssign,
        Self::MinusAssign,
        Self::StarAssign,
        Self::SlashAssign,
        Self::PercentAssign,
        Self::Equal,
        Self::NotEqual,
        Self::Less,
        Self::LessEqual,
        Self::Greater,
        Self::GreaterEqual,
        Self::Spaceship,
        Self::AndAnd,
        Self::OrOr,
        Self::Caret,
    ];

    #[must_use]
    pub const fn text(self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::Percent => "%",
            Self::PlusPlus => "++",
            Self::MinusMinus => "--",
            Self::Bang => "!",
            Self::Assign => "=",
            Self::PlusAssign => "+=",
            Self::MinusAssign => "-=",
            Self::StarAssign => "*=",
            Self::SlashAssign => "/=",
            Self::PercentAssign => "%=",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::Less => "<",
            Self::LessEqual => "<=",
            Self::Greater => ">",
            Self::GreaterEqual => ">=",
            Self::Spaceship => "<=>",
            Self::AndAnd => "&&",
            Self::OrOr => "||",
            Self::Caret => "^",
        }
    }
}

/// Structural punctuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Structure {
    OpenParen,
    CloseParen,
    OpenBrace,
    CloseBrace,
    Comma,
    Semicolon,
}

impl Structure {
    pub const ALL: [Self; 6] = [
        Self::OpenParen,
        Self::CloseParen,
        Self::OpenBrace,
        Self::CloseBrace,
        Self::Comma,
        Self::Semicolon,
    ];

    #[must_use]
    pub const fn text(self) -> &'static str {
        match self {
            Self::OpenParen => "(",
            Self::CloseParen => ")",
            Self::OpenBrace => "{",
            Self::CloseBrace => "}",
            Self::Comma => ",",
            Self::Semicolon => ";",
        }
    }
}

/// Tokens produced by the lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Identifier { name: String },
    /// Digits with an optional fractional part, kept as written.
    Numeric { value: String, unit: Option<String> },
    /// Unescaped content of a double-quoted literal.
    Textual { value: String, unit: Option<String> },
    Keyword(Keyword),
    Operator(Operator),
    Structure(Structure),
}

impl Token {
    /// Human-readable description used in diagnostics.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Identifier { name } => format!("identifier '{name}'"),
            Self::Numeric { value, unit } => {
                format!("number '{value}{}'", unit.as_deref().unwrap_or(""))
            }
            Self::Textual { value, .. } => format!("text {value:?}"),
            Self::Keyword(keyword) => format!("'{}'", keyword.text()),
            Self::Operator(operator) => format!("'{}'", operator.text()),
            Self::Structure(structure) => format!("'{}'", structure.text()),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_col_counts_from_one() {
        let source = "a\nbc d";
        assert_eq!(Location::new(FileId(0), 0, 1).line_col(source), (1, 1));
        assert_eq!(Location::new(FileId(0), 2, 2).line_col(source), (2, 1));
        assert_eq!(Location::new(FileId(0), 5, 1).line_col(source), (2, 4));
    }

    #[test]
    fn every_symbol_has_text() {
        assert!(Operator::ALL.iter().all(|op| !op.text().is_empty()));
        assert!(Structure::ALL.iter().all(|s| s.text().len() == 1));
        assert!(Keyword::ALL.iter().all(|k| k.text().is_ascii()));
    }

    #[test]
    fn describe_numeric_with_unit() {
        let token = Token::Numeric {
            value: "12".to_string(),
            unit: Some("px".to_string()),
        };
        assert_eq!(token.describe(), "number '12px'");
    }
}
