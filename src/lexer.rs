use std::fmt;
use std::iter::FusedIterator;

use log::{debug, trace};

use crate::token::{FileId, Keyword, Located, Location, Operator, Structure, Token};

/// Classifies a lexer error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexErrorKind {
    /// Double-quoted literal without a closing quote.
    UnterminatedText,
    /// Backtick identifier without a closing backtick.
    UnterminatedIdentifier,
    /// Character that cannot start any token.
    UnexpectedCharacter(char),
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnterminatedText => write!(f, "unterminated text literal"),
            Self::UnterminatedIdentifier => {
                write!(f, "unterminated backtick identifier")
            }
            Self::UnexpectedCharacter(ch) => {
                write!(f, "unexpected character: {ch}")
            }
        }
    }
}

/// Error produced during lexing. Fatal for the source unit.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at {location}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub location: Location,
}

/// Tokenize a whole source string.
///
/// # Errors
///
/// Returns the first `LexError` encountered.
pub fn tokenize(input: &str) -> Result<Vec<Located<Token>>, LexError> {
    tokenize_file(input, FileId::default())
}

/// Tokenize a source string, tagging every location with `file`.
///
/// # Errors
///
/// Returns the first `LexError` encountered.
pub fn tokenize_file(input: &str, file: FileId) -> Result<Vec<Located<Token>>, LexError> {
    Tokenizer::new(input, file).collect()
}

/// Lazy, single-pass token stream over one source unit.
///
/// Yields at most one error, after which it is exhausted.
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    source: &'a str,
    file: FileId,
    pos: usize,
    failed: bool,
}

impl<'a> Tokenizer<'a> {
    #[must_use]
    pub fn new(source: &'a str, file: FileId) -> Self {
        let pos = if source.starts_with('\u{FEFF}') {
            '\u{FEFF}'.len_utf8()
        } else {
            0
        };
        Self {
            source,
            file,
            pos,
            failed: false,
        }
    }

    fn skip_trivia(&mut self) {
        loop {
            let rest = &self.source[self.pos..];
            let whitespace = leading(rest, char::is_whitespace);
            if whitespace > 0 {
                self.pos += whitespace;
            } else if rest.starts_with("//") {
                self.pos += rest.find('\n').unwrap_or(rest.len());
            } else {
                break;
            }
        }
    }

    fn next_token(&mut self) -> Result<Located<Token>, LexError> {
        let rest = &self.source[self.pos..];
        let mut best: Option<(Token, usize)> = None;
        let mut first_error = None;

        for recognizer in Recognizer::PRIORITY {
            match recognizer.recognize(rest) {
                Ok(Some((token, len))) => {
                    // strictly longer only, so earlier recognizers keep ties
                    if best.as_ref().is_none_or(|(_, best_len)| len > *best_len) {
                        best = Some((token, len));
                    }
                }
                Ok(None) => {}
                Err(kind) => {
                    first_error.get_or_insert(kind);
                }
            }
        }

        if let Some((token, len)) = best {
            let location = Location::new(self.file, self.pos, len);
            self.pos += len;
            trace!("lexed {} at {location}", token.describe());
            return Ok(Located::new(token, location));
        }

        let length = match first_error {
            Some(_) => rest.len(),
            None => rest.chars().next().map_or(0, char::len_utf8),
        };
        let kind = first_error.unwrap_or_else(|| {
            LexErrorKind::UnexpectedCharacter(rest.chars().next().unwrap_or('\0'))
        });
        Err(LexError {
            kind,
            location: Location::new(self.file, self.pos, length),
        })
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Result<Located<Token>, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        self.skip_trivia();
        if self.pos >= self.source.len() {
            return None;
        }
        let result = self.next_token();
        if let Err(err) = &result {
            debug!("lexing stopped: {err}");
            self.failed = true;
        }
        Some(result)
    }
}

impl FusedIterator for Tokenizer<'_> {}

/// Token recognizers in tie-break priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Recognizer {
    Keyword,
    Operator,
    Structure,
    Numeric,
    Textual,
    Identifier,
}

impl Recognizer {
    const PRIORITY: [Self; 6] = [
        Self::Keyword,
        Self::Operator,
        Self::Structure,
        Self::Numeric,
        Self::Textual,
        Self::Identifier,
    ];

    /// Match at the start of `rest`, returning the token and its byte length.
    fn recognize(self, rest: &str) -> Result<Option<(Token, usize)>, LexErrorKind> {
        match self {
            Self::Keyword => Ok(longest_symbol(rest, &Keyword::ALL, Keyword::text)
                .map(|(keyword, len)| (Token::Keyword(keyword), len))),
            Self::Operator => Ok(longest_symbol(rest, &Operator::ALL, Operator::text)
                .map(|(operator, len)| (Token::Operator(operator), len))),
            Self::Structure => Ok(longest_symbol(rest, &Structure::ALL, Structure::text)
                .map(|(structure, len)| (Token::Structure(structure), len))),
            Self::Numeric => Ok(numeric(rest)),
            Self::Textual => textual(rest),
            Self::Identifier => identifier(rest),
        }
    }
}

fn longest_symbol<T: Copy>(
    rest: &str,
    candidates: &[T],
    text: fn(T) -> &'static str,
) -> Option<(T, usize)> {
    candidates
        .iter()
        .copied()
        .filter(|candidate| rest.starts_with(text(*candidate)))
        .max_by_key(|candidate| text(*candidate).len())
        .map(|candidate| (candidate, text(candidate).len()))
}

/// Byte length of the prefix of `s` whose chars satisfy `pred`.
fn leading(s: &str, pred: impl Fn(char) -> bool) -> usize {
    s.char_indices()
        .find(|(_, ch)| !pred(*ch))
        .map_or(s.len(), |(i, _)| i)
}

fn identifier_run(s: &str) -> usize {
    match s.chars().next() {
        Some(first) if first.is_alphabetic() || first == '_' => {
            leading(s, |ch| ch.is_alphanumeric() || ch == '_')
        }
        _ => 0,
    }
}

fn unit_suffix(s: &str) -> (Option<String>, usize) {
    match identifier_run(s) {
        0 => (None, 0),
        len => (Some(s[..len].to_string()), len),
    }
}

fn numeric(rest: &str) -> Option<(Token, usize)> {
    let digits = leading(rest, |ch| ch.is_ascii_digit());
    if digits == 0 {
        return None;
    }

    let mut end = digits;
    if let Some(after_point) = rest[end..].strip_prefix('.') {
        let fraction = leading(after_point, |ch| ch.is_ascii_digit());
        if fraction > 0 {
            end += 1 + fraction;
        }
    }

    let (unit, unit_len) = unit_suffix(&rest[end..]);
    let value = rest[..end].to_string();
    Some((Token::Numeric { value, unit }, end + unit_len))
}

fn textual(rest: &str) -> Result<Option<(Token, usize)>, LexErrorKind> {
    let Some(body) = rest.strip_prefix('"') else {
        return Ok(None);
    };

    let mut value = String::new();
    let mut chars = body.char_indices();
    while let Some((i, ch)) = chars.next() {
        match ch {
            '"' => {
                let end = 1 + i + 1;
                let (unit, unit_len) = unit_suffix(&rest[end..]);
                return Ok(Some((Token::Textual { value, unit }, end + unit_len)));
            }
            '\\' => match chars.next() {
                Some((_, 'n')) => value.push('\n'),
                Some((_, 't')) => value.push('\t'),
                Some((_, 'r')) => value.push('\r'),
                Some((_, '"')) => value.push('"'),
                Some((_, '\\')) => value.push('\\'),
                Some((_, other)) => {
                    value.push('\\');
                    value.push(other);
                }
                None => break,
            },
            _ => value.push(ch),
        }
    }

    Err(LexErrorKind::UnterminatedText)
}

fn identifier(rest: &str) -> Result<Option<(Token, usize)>, LexErrorKind> {
    if let Some(body) = rest.strip_prefix('`') {
        let close = body.find('`').ok_or(LexErrorKind::UnterminatedIdentifier)?;
        let name = body[..close].to_string();
        return Ok(Some((Token::Identifier { name }, close + 2)));
    }

    Ok(match identifier_run(rest) {
        0 => None,
        len => Some((
            Token::Identifier {
                name: rest[..len].to_string(),
            },
            len,
        )),
    })
}
