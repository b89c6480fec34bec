use chumsky::prelude::*;
use std::fmt;

use crate::keywords;
use crate::token::{Token, TokenKind};

#[derive(Debug, Clone, PartialEq)]
pub struct LexError {
    pub message: String,
    pub offset: usize,
}

impl LexError {
    pub fn new(message: impl Into<String>, offset: usize) -> Self {
        Self {
            message: message.into(),
            offset,
        }
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for LexError {}

type Lexeme = (TokenKind, String);

fn compound_operator<'a>() -> impl Parser<'a, &'a str, Lexeme, extra::Err<Simple<'a, char>>> + Clone {
    choice((
        just("=="),
        just("!="),
        just(">="),
        just("<="),
        just("?="),
        just("??"),
        just("||"),
        just("!|"),
        just("!&"),
        just("=!"),
        just("?!"),
    ))
    .map(|op: &str| (TokenKind::Operator, op.to_string()))
}

pub fn lexer<'a>() -> impl Parser<'a, &'a str, Vec<Token>, extra::Err<Simple<'a, char>>> {
    let whitespace = any().filter(|c: &char| c.is_whitespace());

    let comment = just("--")
        .then(none_of('\n').repeated())
        .then(just('\n').or_not())
        .ignored();

    let trivia = choice((comment, whitespace.clone().ignored())).repeated();

    // `<` followed by whitespace compares; anything else opens a link
    let less_than = just('<')
        .then(whitespace)
        .to((TokenKind::Operator, "<".to_string()));

    let link = just('<')
        .ignore_then(none_of('>').repeated().to_slice())
        .then_ignore(just('>'))
        .map(|s: &str| (TokenKind::Link, s.to_string()));

    let string = just('"')
        .ignore_then(
            choice((just('\\').then(any()).ignored(), none_of("\\\"").ignored()))
                .repeated()
                .to_slice(),
        )
        .then_ignore(just('"'))
        .map(|s: &str| (TokenKind::String, s.to_string()));

    let digit = any().filter(|c: &char| c.is_ascii_digit());
    let numeric_tail = any()
        .filter(|c: &char| c.is_ascii_hexdigit() || matches!(c, '#' | '&'))
        .repeated();

    let number = digit
        .clone()
        .then(numeric_tail.clone())
        .then(just('.').then(digit).then(numeric_tail).or_not())
        .to_slice()
        .map(|s: &str| (TokenKind::Number, s.to_string()));

    let hex = just('#')
        .then(any().filter(|c: &char| c.is_ascii_hexdigit()).repeated().at_least(1))
        .to_slice()
        .map(|s: &str| (TokenKind::Hex, s.to_string()));

    let base64 = just('&')
        .then(
            any()
                .filter(|c: &char| c.is_ascii_alphanumeric() || matches!(c, '+' | '/' | '='))
                .repeated()
                .at_least(1),
        )
        .to_slice()
        .map(|s: &str| (TokenKind::Base64, s.to_string()));

    let word = any()
        .filter(|c: &char| c.is_ascii_alphabetic() || matches!(c, '_' | '$'))
        .then(
            any()
                .filter(|c: &char| c.is_ascii_alphanumeric() || matches!(c, '_' | '\''))
                .repeated(),
        )
        .to_slice()
        .map(keywords::classify);

    let punctuation = choice((
        just("..").to((TokenKind::DotDot, "..".to_string())),
        just(',').to((TokenKind::Comma, ",".to_string())),
        just('.').to((TokenKind::Dot, ".".to_string())),
        just('[').to((TokenKind::LBracket, "[".to_string())),
        just(']').to((TokenKind::RBracket, "]".to_string())),
        just('-').to((TokenKind::Minus, "-".to_string())),
    ));

    let single = any().to_slice().map(|s: &str| (TokenKind::Operator, s.to_string()));

    let token = choice((
        compound_operator(),
        less_than,
        link,
        string,
        number,
        hex,
        base64,
        word,
        punctuation,
        single,
    ))
    .map_with(|(kind, text), e| Token::new(kind, text, e.span().start));

    trivia
        .clone()
        .ignore_then(token.then_ignore(trivia).repeated().collect())
        .then_ignore(end())
}

/// Split source text into tokens. Empty input is rejected; whitespace-only
/// input yields an empty stream.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    if source.is_empty() {
        return Err(LexError::new("Invalid Input.", 0));
    }

    lexer().parse(source).into_result().map_err(|errors| {
        match errors.first() {
            Some(err) => {
                let message = match err.found() {
                    Some(c) => format!("Unexpected character '{}' at position {}", c, err.span().start),
                    None => format!("Unexpected end of input at position {}", err.span().start),
                };
                LexError::new(message, err.span().start)
            }
            None => LexError::new("Invalid Input.", 0),
        }
    })
}
