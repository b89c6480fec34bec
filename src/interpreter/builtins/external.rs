//! Functions that reach outside the program through the capability
//! provider. Failures come back as `Error` values.

use indexmap::IndexMap;

use super::CallContext;
use crate::config::MAX_NESTING_DEPTH;
use crate::format::{json_to_value, value_to_json};
use crate::interpreter::error::JustcError;
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpShape {
    Json,
    Text,
    Justc,
}

impl HttpShape {
    pub fn function_name(self) -> &'static str {
        match self {
            HttpShape::Json => "HTTPJSON",
            HttpShape::Text => "HTTPTEXT",
            HttpShape::Justc => "HTTPJUSTC",
        }
    }
}

fn first_text(args: &[Value]) -> Option<String> {
    args.first().map(Value::to_string)
}

pub fn builtin_http(
    ctx: &mut dyn CallContext,
    shape: HttpShape,
    args: &[Value],
    offset: usize,
) -> Result<Value, JustcError> {
    if !ctx.options().allow_http {
        return Ok(Value::Error("HTTP requests are disabled".to_string()));
    }

    let url = match (shape, args.first()) {
        (HttpShape::Text, None) => {
            return Err(JustcError::invalid_argument_at(
                format!("Expected one argument at function HTTPTEXT at position {}.", offset),
                offset,
            ))
        }
        (HttpShape::Text, Some(Value::Link(url))) => url.clone(),
        (HttpShape::Text, Some(other)) => {
            return Err(JustcError::invalid_argument_at(
                format!(
                    "Expected TYPEOF( argument 0 )=\"Link\" at function HTTPTEXT at position {}, got \"{}\".",
                    offset,
                    other.data_type().name()
                ),
                offset,
            ))
        }
        (_, Some(arg)) => arg.to_string(),
        (_, None) => {
            return Ok(Value::Error(format!("{} requires a URL", shape.function_name())));
        }
    };

    let response = match ctx.capabilities().fetch(&url, "GET", &IndexMap::new(), None) {
        Ok(response) => response,
        Err(err) => return Ok(Value::Error(err.to_string())),
    };

    Ok(match shape {
        HttpShape::Text => Value::String(response.text),
        HttpShape::Json => parse_json_text(&response.text),
        HttpShape::Justc => evaluate_justc(ctx, &response.text, offset),
    })
}

pub fn builtin_file(ctx: &mut dyn CallContext, args: &[Value]) -> Value {
    let Some(path) = first_text(args) else {
        return Value::Error("FILE requires a path".to_string());
    };
    match ctx.capabilities().read_file(&path) {
        Ok(content) => Value::String(content),
        Err(err) => Value::Error(err.to_string()),
    }
}

pub fn builtin_size(ctx: &mut dyn CallContext, args: &[Value]) -> Value {
    let Some(path) = first_text(args) else {
        return Value::Error("SIZE requires a path".to_string());
    };
    match ctx.capabilities().file_size(&path) {
        Ok(size) => Value::Number(size as f64),
        Err(err) => Value::Error(err.to_string()),
    }
}

pub fn builtin_env(ctx: &mut dyn CallContext, args: &[Value]) -> Value {
    let Some(key) = first_text(args) else {
        return Value::Error("ENV requires a variable name".to_string());
    };
    match ctx.capabilities().env(&key) {
        Ok(Some(value)) => Value::String(value),
        Ok(None) => Value::Null,
        Err(err) => Value::Error(err.to_string()),
    }
}

pub fn builtin_config(ctx: &mut dyn CallContext, args: &[Value]) -> Value {
    let Some(key) = first_text(args) else {
        return Value::Error("CONFIG requires a key".to_string());
    };
    match ctx.capabilities().config(&key) {
        Ok(value) => value,
        Err(err) => Value::Error(err.to_string()),
    }
}

pub fn builtin_json(args: &[Value]) -> Value {
    let json = args.first().map(value_to_json).unwrap_or(serde_json::Value::Null);
    Value::String(json.to_string())
}

fn parse_json_text(text: &str) -> Value {
    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(json) => json_to_value(json),
        Err(err) => Value::Error(format!("Invalid JSON: {}", err)),
    }
}

pub fn builtin_parse_json(args: &[Value]) -> Value {
    match first_text(args) {
        Some(text) => parse_json_text(&text),
        None => Value::Null,
    }
}

pub fn builtin_parse_justc(ctx: &mut dyn CallContext, args: &[Value], offset: usize) -> Value {
    match first_text(args) {
        Some(source) => evaluate_justc(ctx, &source, offset),
        None => Value::JustcObject(IndexMap::new()),
    }
}

pub fn builtin_justc_file(ctx: &mut dyn CallContext, args: &[Value], offset: usize) -> Value {
    let Some(path) = first_text(args) else {
        return Value::Error("JUSTC requires a path".to_string());
    };
    match ctx.capabilities().read_file(&path) {
        Ok(source) => evaluate_justc(ctx, &source, offset),
        Err(err) => Value::Error(err.to_string()),
    }
}

/// Runs an embedded program one level deeper and returns its outputs as an
/// object. Its log entries are re-attributed to the call site.
fn evaluate_justc(ctx: &mut dyn CallContext, source: &str, offset: usize) -> Value {
    let options = ctx.options();
    if options.depth >= MAX_NESTING_DEPTH {
        return Value::Error(JustcError::NestingLimit { depth: MAX_NESTING_DEPTH }.to_string());
    }
    let nested = options.nested();

    let result = crate::interpreter::interpret_with(source, &nested, ctx.capabilities());
    // A nested failure becomes an error value, not a failure of this run
    for entry in &result.logs {
        let kind = if entry.kind == "ERROR" { "NESTED_ERROR" } else { entry.kind.as_str() };
        ctx.log(kind, entry.message.clone(), offset);
    }

    match result.error {
        Some(err) => Value::Error(err.to_string()),
        None => Value::JustcObject(result.outputs),
    }
}
