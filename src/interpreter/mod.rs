pub mod builtins;
pub mod capabilities;
pub mod environment;
pub mod error;
pub mod evaluator;
pub mod graph;
pub mod parser;
pub mod resolver;
pub mod result;

pub use capabilities::{Capabilities, DisabledCapabilities, FetchResponse, SystemCapabilities};
pub use environment::Environment;
pub use error::JustcError;
pub use graph::DependencyGraph;
pub use parser::TokenParser;
pub use resolver::{CallCache, Resolver};
pub use result::{LogBook, LogEntry, OutputMode, OutputPlan, ParseResult};

use crate::config::ParseOptions;
use crate::diagnostic::Diagnostic;
use crate::lexer::tokenize;
use crate::token::Token;

/// Parse an already tokenized program with every capability disabled.
pub fn parse_tokens(tokens: Vec<Token>, execute_side_effects: bool) -> ParseResult {
    let options = ParseOptions {
        execute_side_effects,
        ..ParseOptions::default()
    };
    TokenParser::new(tokens, options, &DisabledCapabilities).parse()
}

pub fn interpret(source: &str, options: &ParseOptions) -> ParseResult {
    interpret_with(source, options, &DisabledCapabilities)
}

pub fn interpret_with(source: &str, options: &ParseOptions, capabilities: &dyn Capabilities) -> ParseResult {
    match tokenize(source) {
        Ok(tokens) => TokenParser::new(tokens, options.clone(), capabilities).parse(),
        Err(err) => ParseResult::failed(err.into()),
    }
}

/// Like [`interpret_with`], but a failed run yields its diagnostic.
pub fn interpret_with_diagnostics(
    source: &str,
    options: &ParseOptions,
    capabilities: &dyn Capabilities,
) -> Result<ParseResult, (ParseResult, Vec<Diagnostic>)> {
    let result = interpret_with(source, options, capabilities);
    match &result.error {
        None => Ok(result),
        Some(err) => {
            let diagnostics = vec![err.to_diagnostic()];
            Err((result, diagnostics))
        }
    }
}
