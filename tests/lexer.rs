//! Tokenizer tests

use justc::{tokenize, TokenKind};

fn kinds_and_text(source: &str) -> Vec<(TokenKind, String)> {
    tokenize(source)
        .expect("Lexer failed")
        .into_iter()
        .map(|t| (t.kind, t.text))
        .collect()
}

fn single(source: &str) -> (TokenKind, String) {
    let mut tokens = kinds_and_text(source);
    assert_eq!(tokens.len(), 1, "expected one token for {:?}: {:?}", source, tokens);
    tokens.remove(0)
}

// =============================================================================
// NUMERIC LITERALS
// =============================================================================

#[test]
fn test_decimal_number() {
    assert_eq!(single("12.5"), (TokenKind::Number, "12.5".to_string()));
}

#[test]
fn test_trailing_dot_is_terminator() {
    assert_eq!(
        kinds_and_text("1."),
        vec![(TokenKind::Number, "1".to_string()), (TokenKind::Dot, ".".to_string())]
    );
}

#[test]
fn test_radix_markers() {
    assert_eq!(single("#ff"), (TokenKind::Hex, "#ff".to_string()));
    assert_eq!(single("b101"), (TokenKind::Binary, "b101".to_string()));
    assert_eq!(single("B11"), (TokenKind::Binary, "B11".to_string()));
    assert_eq!(single("&aGk="), (TokenKind::Base64, "&aGk=".to_string()));
}

// =============================================================================
// WORDS
// =============================================================================

#[test]
fn test_aliases_resolve_to_canonical_keywords() {
    assert_eq!(single("SQRT"), (TokenKind::Keyword, "V".to_string()));
    assert_eq!(single("ABS"), (TokenKind::Keyword, "ABSOLUTE".to_string()));
    assert_eq!(single("OUT"), (TokenKind::Keyword, "OUTPUT".to_string()));
    assert_eq!(single("RETURN"), (TokenKind::Keyword, "RETURN".to_string()));
}

#[test]
fn test_control_words_are_verbatim() {
    assert_eq!(single("isn't"), (TokenKind::Keyword, "isn't".to_string()));
    assert_eq!(single("elseif"), (TokenKind::Keyword, "elseif".to_string()));
    assert_eq!(single("orn't"), (TokenKind::Keyword, "orn't".to_string()));
}

#[test]
fn test_literal_words_ignore_case() {
    assert_eq!(single("Yes"), (TokenKind::Boolean, "Yes".to_string()));
    assert_eq!(single("FALSE"), (TokenKind::Boolean, "FALSE".to_string()));
    assert_eq!(single("NIL"), (TokenKind::Null, "NIL".to_string()));
    assert_eq!(single("Undefined"), (TokenKind::Undefined, "Undefined".to_string()));
}

#[test]
fn test_identifiers() {
    assert_eq!(single("total_2"), (TokenKind::Identifier, "total_2".to_string()));
    assert_eq!(single("$TIME"), (TokenKind::Identifier, "$TIME".to_string()));
    assert_eq!(single("sqrt"), (TokenKind::Identifier, "sqrt".to_string()));
}

// =============================================================================
// STRINGS, LINKS AND OPERATORS
// =============================================================================

#[test]
fn test_string_text_is_verbatim() {
    assert_eq!(single(r#""a\"b""#), (TokenKind::String, r#"a\"b"#.to_string()));
}

#[test]
fn test_link_versus_less_than() {
    assert_eq!(single("<https://a.b>"), (TokenKind::Link, "https://a.b".to_string()));
    assert_eq!(
        kinds_and_text("a < b"),
        vec![
            (TokenKind::Identifier, "a".to_string()),
            (TokenKind::Operator, "<".to_string()),
            (TokenKind::Identifier, "b".to_string()),
        ]
    );
}

#[test]
fn test_punctuation_and_compound_operators() {
    let kinds: Vec<TokenKind> = kinds_and_text("a .. b - c == d ?= e, [f].")
        .into_iter()
        .map(|(kind, _)| kind)
        .collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Identifier,
            TokenKind::DotDot,
            TokenKind::Identifier,
            TokenKind::Minus,
            TokenKind::Identifier,
            TokenKind::Operator,
            TokenKind::Identifier,
            TokenKind::Operator,
            TokenKind::Identifier,
            TokenKind::Comma,
            TokenKind::LBracket,
            TokenKind::Identifier,
            TokenKind::RBracket,
            TokenKind::Dot,
        ]
    );
}

// =============================================================================
// OFFSETS, COMMENTS AND EDGE CASES
// =============================================================================

#[test]
fn test_comments_are_skipped_and_offsets_kept() {
    let tokens = tokenize("x -- comment\ny").unwrap();
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].offset, 0);
    assert_eq!(tokens[1].offset, 13);
}

#[test]
fn test_token_text_reproduces_source_literals() {
    let source = r#"name is "Hello, world" + 42.5"#;
    for token in tokenize(source).unwrap() {
        match token.kind {
            TokenKind::String => assert_eq!(&source[token.offset + 1..token.offset + 1 + token.text.len()], token.text),
            TokenKind::Number | TokenKind::Identifier => {
                assert_eq!(&source[token.offset..token.offset + token.text.len()], token.text)
            }
            _ => {}
        }
    }
}

#[test]
fn test_empty_input_is_rejected() {
    let err = tokenize("").unwrap_err();
    assert_eq!(err.message, "Invalid Input.");
}

#[test]
fn test_whitespace_only_input_has_no_tokens() {
    assert!(tokenize("  \n\t").unwrap().is_empty());
}
