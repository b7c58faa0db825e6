//! Lexer edge cases and error tests.

use srcfront::{FileId, Keyword, LexErrorKind, Operator, Structure, Token, Tokenizer, tokenize};

fn kinds(input: &str) -> Vec<Token> {
    tokenize(input)
        .expect("tokenize")
        .into_iter()
        .map(|t| t.value)
        .collect()
}

// -----------------------------------------------------------
// Basic lexer behaviour.
// -----------------------------------------------------------

#[test]
fn lex_empty_input() {
    assert!(tokenize("").expect("tokenize").is_empty());
}

#[test]
fn lex_only_whitespace_and_comments() {
    assert!(tokenize("  \t\n // nothing here\n\r\n").expect("tokenize").is_empty());
}

#[test]
fn lex_less_equal_is_one_token() {
    assert_eq!(kinds("<="), vec![Token::Operator(Operator::LessEqual)]);
}

#[test]
fn lex_compound_assignment_over_prefix() {
    assert_eq!(
        kinds("a-=1"),
        vec![
            Token::Identifier {
                name: "a".to_string()
            },
            Token::Operator(Operator::MinusAssign),
            Token::Numeric {
                value: "1".to_string(),
                unit: None
            },
        ]
    );
}

#[test]
fn lex_increment_over_plus() {
    assert_eq!(
        kinds("+++"),
        vec![
            Token::Operator(Operator::PlusPlus),
            Token::Operator(Operator::Plus),
        ]
    );
}

#[test]
fn lex_call_shape() {
    assert_eq!(
        kinds("f(x, y = 2,)"),
        vec![
            Token::Identifier {
                name: "f".to_string()
            },
            Token::Structure(Structure::OpenParen),
            Token::Identifier {
                name: "x".to_string()
            },
            Token::Structure(Structure::Comma),
            Token::Identifier {
                name: "y".to_string()
            },
            Token::Operator(Operator::Assign),
            Token::Numeric {
                value: "2".to_string(),
                unit: None
            },
            Token::Structure(Structure::Comma),
            Token::Structure(Structure::CloseParen),
        ]
    );
}

#[test]
fn lex_keywords() {
    assert_eq!(
        kinds("export inline fn"),
        vec![
            Token::Keyword(Keyword::Export),
            Token::Keyword(Keyword::Inline),
            Token::Keyword(Keyword::Fn),
        ]
    );
}

#[test]
fn lex_decimal_with_unit() {
    assert_eq!(
        kinds("2.5kg"),
        vec![Token::Numeric {
            value: "2.5".to_string(),
            unit: Some("kg".to_string())
        }]
    );
}

#[test]
fn lex_unicode_identifier() {
    let tokens = tokenize("größe").expect("tokenize");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].location.length, "größe".len());
}

#[test]
fn lex_is_deterministic() {
    let input = "var x = f(a, b = \"s\"u) <=> 3.14px; // tail";
    assert_eq!(tokenize(input), tokenize(input));
}

#[test]
fn lex_spans_do_not_overlap() {
    let input = "while (i <= 10) { i += 1; }";
    let tokens = tokenize(input).expect("tokenize");
    for pair in tokens.windows(2) {
        assert!(pair[0].location.end() <= pair[1].location.offset);
    }
    let last = tokens.last().expect("tokens");
    assert_eq!(last.location.end(), input.len());
}

#[test]
fn lex_file_id_is_carried() {
    let tokens = srcfront::tokenize_file("a b", FileId(3)).expect("tokenize");
    assert!(tokens.iter().all(|t| t.location.file == FileId(3)));
}

// -----------------------------------------------------------
// Lexer errors.
// -----------------------------------------------------------

#[test]
fn lex_error_unterminated_text() {
    let err = tokenize("say(\"hello)").unwrap_err();
    assert_eq!(err.kind, LexErrorKind::UnterminatedText);
    assert_eq!(err.location.offset, 4);
}

#[test]
fn lex_error_unterminated_backtick() {
    let err = tokenize("x + `open").unwrap_err();
    assert_eq!(err.kind, LexErrorKind::UnterminatedIdentifier);
}

#[test]
fn lex_error_unexpected_character() {
    let err = tokenize("a # b").unwrap_err();
    assert_eq!(err.kind, LexErrorKind::UnexpectedCharacter('#'));
    assert_eq!(err.location.offset, 2);
    assert_eq!(err.to_string(), "unexpected character: # at offset 2");
}

#[test]
fn lex_lazy_tokenizer_stops_after_error() {
    let items: Vec<_> = Tokenizer::new("a b $ c d", FileId::default()).collect();
    assert_eq!(items.len(), 3);
    assert!(items[2].is_err());
}
