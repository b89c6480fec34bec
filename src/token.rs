use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Words
    Keyword,
    Identifier,

    // Literals
    String,
    Link,
    Number,
    Hex,
    Base64,
    Binary,
    Boolean,
    Null,
    Undefined,

    // Punctuation
    Comma,
    Dot,
    DotDot,
    LBracket,
    RBracket,
    Minus,

    /// Any other operator, including the compound ones (`==`, `?=`, `!|` ...)
    Operator,
}

impl TokenKind {
    /// Name used when a token stream is serialized.
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Keyword => "keyword",
            TokenKind::Identifier => "identifier",
            TokenKind::String => "string",
            TokenKind::Link => "link",
            TokenKind::Number => "number",
            TokenKind::Hex => "hex",
            TokenKind::Base64 => "base64",
            TokenKind::Binary => "binary",
            TokenKind::Boolean => "boolean",
            TokenKind::Null => "null",
            TokenKind::Undefined => "undefined",
            TokenKind::Comma => ",",
            TokenKind::Dot => ".",
            TokenKind::DotDot => "..",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::Minus => "minus",
            TokenKind::Operator => "operator",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    /// Byte offset of the first character of the token in the source.
    pub offset: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, offset: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            offset,
        }
    }

    pub fn is(&self, kind: TokenKind, text: &str) -> bool {
        self.kind == kind && self.text == text
    }

    pub fn is_keyword(&self, text: &str) -> bool {
        self.is(TokenKind::Keyword, text)
    }

    pub fn is_operator(&self, text: &str) -> bool {
        self.is(TokenKind::Operator, text)
    }
}
