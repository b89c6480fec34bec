#![allow(dead_code)]

use indexmap::IndexMap;
use justc::interpreter::{interpret_with, Capabilities, DisabledCapabilities, FetchResponse, JustcError, ParseResult};
use justc::{ParseOptions, Value};
use std::cell::Cell;

/// Run without side effects and with every capability disabled.
pub fn run(source: &str) -> ParseResult {
    interpret_with(source, &ParseOptions::quiet(), &DisabledCapabilities)
}

pub fn run_quiet(source: &str, capabilities: &dyn Capabilities) -> ParseResult {
    interpret_with(source, &ParseOptions::quiet(), capabilities)
}

pub fn run_with_http(source: &str, capabilities: &dyn Capabilities) -> ParseResult {
    let options = ParseOptions {
        allow_http: true,
        ..ParseOptions::quiet()
    };
    interpret_with(source, &options, capabilities)
}

/// Outputs of a run that must succeed.
pub fn outputs(source: &str) -> IndexMap<String, Value> {
    let result = run(source);
    assert!(result.is_ok(), "unexpected error for {:?}: {:?}", source, result.error);
    result.outputs
}

pub fn output(source: &str, name: &str) -> Value {
    outputs(source)
        .get(name)
        .cloned()
        .unwrap_or_else(|| panic!("no output named {} for {:?}", name, source))
}

/// The error of a run that must fail.
pub fn error_of(source: &str) -> JustcError {
    let result = run(source);
    assert!(result.outputs.is_empty(), "failed runs produce no outputs");
    result
        .error
        .unwrap_or_else(|| panic!("expected an error for {:?}", source))
}

pub fn log_messages(result: &ParseResult, kind: &str) -> Vec<String> {
    result
        .logs
        .iter()
        .filter(|entry| entry.kind == kind)
        .map(|entry| entry.message.clone())
        .collect()
}

/// In-memory capability provider that counts network calls.
#[derive(Default)]
pub struct MockCapabilities {
    pub files: IndexMap<String, String>,
    pub env: IndexMap<String, String>,
    pub config: IndexMap<String, Value>,
    pub responses: IndexMap<String, String>,
    pub fetches: Cell<usize>,
}

impl MockCapabilities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: &str, content: &str) -> Self {
        self.files.insert(path.to_string(), content.to_string());
        self
    }

    pub fn with_env(mut self, key: &str, value: &str) -> Self {
        self.env.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_config(mut self, key: &str, value: Value) -> Self {
        self.config.insert(key.to_string(), value);
        self
    }

    pub fn with_response(mut self, url: &str, body: &str) -> Self {
        self.responses.insert(url.to_string(), body.to_string());
        self
    }
}

impl Capabilities for MockCapabilities {
    fn fetch(
        &self,
        url: &str,
        _method: &str,
        _headers: &IndexMap<String, String>,
        _body: Option<&str>,
    ) -> Result<FetchResponse, JustcError> {
        self.fetches.set(self.fetches.get() + 1);
        match self.responses.get(url) {
            Some(text) => Ok(FetchResponse {
                text: text.clone(),
                status: 200,
                headers: IndexMap::new(),
            }),
            None => Err(JustcError::invalid_argument_at(format!("404 for {}", url), 0)),
        }
    }

    fn read_file(&self, path: &str) -> Result<String, JustcError> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| JustcError::invalid_argument_at(format!("No such file: {}", path), 0))
    }

    fn file_size(&self, path: &str) -> Result<u64, JustcError> {
        self.read_file(path).map(|content| content.len() as u64)
    }

    fn env(&self, key: &str) -> Result<Option<String>, JustcError> {
        Ok(self.env.get(key).cloned())
    }

    fn config(&self, key: &str) -> Result<Value, JustcError> {
        self.config
            .get(key)
            .cloned()
            .ok_or_else(|| JustcError::invalid_argument_at(format!("No configuration value for {}", key), 0))
    }
}
