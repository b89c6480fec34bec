pub mod ast;
pub mod cli;
pub mod config;
pub mod diagnostic;
pub mod format;
pub mod interpreter;
pub mod keywords;
pub mod lexer;
pub mod token;
pub mod value;

pub use config::ParseOptions;
pub use interpreter::{interpret, interpret_with, parse_tokens, JustcError, ParseResult};
pub use lexer::tokenize;
pub use token::{Token, TokenKind};
pub use value::Value;
