//! Variable lookup, link validation, `ECHO` and the `$` pseudo-variables.

use super::CallContext;
use crate::interpreter::error::JustcError;
use crate::value::Value;

/// `VALUE(name)` reads a declared variable; any other argument is returned
/// unchanged.
pub fn builtin_value(ctx: &mut dyn CallContext, args: &[Value], offset: usize) -> Result<Value, JustcError> {
    match args.first() {
        Some(Value::Variable(name)) | Some(Value::String(name)) => ctx.lookup(name, offset),
        Some(other) => Ok(other.clone()),
        None => Err(JustcError::invalid_argument_at(
            format!("VALUE requires one variable argument at position {}", offset),
            offset,
        )),
    }
}

pub fn is_valid_link(text: &str) -> bool {
    text.contains("://") || text.contains("www.") || (text.contains('.') && text.contains('/'))
}

pub fn builtin_link(args: &[Value], offset: usize) -> Result<Value, JustcError> {
    let text = match args.first() {
        Some(arg) => arg.to_string(),
        None => {
            return Err(JustcError::invalid_argument_at(
                format!("LINK requires one argument at position {}", offset),
                offset,
            ))
        }
    };
    if !is_valid_link(&text) {
        return Err(JustcError::invalid_argument_at(format!("Invalid link: {}", text), offset));
    }
    Ok(Value::Link(text))
}

/// Logs (and prints) each argument. Evaluates to null.
pub fn builtin_echo(ctx: &mut dyn CallContext, args: &[Value], offset: usize) -> Value {
    for arg in args {
        let message = arg.to_string();
        if ctx.options().execute_side_effects {
            println!("{}", message);
        }
        ctx.log("ECHO", message, offset);
    }
    Value::Null
}

/// Seconds since the Unix epoch, tagged hexadecimal.
pub fn builtin_time() -> Value {
    Value::Hexadecimal(chrono::Utc::now().timestamp() as f64)
}

/// Pseudo-variables supplied by the host, looked up as `$NAME`.
pub fn builtin_host_variable(ctx: &mut dyn CallContext, name: &str) -> Value {
    match ctx.capabilities().config(&format!("${}", name)) {
        Ok(value) => value,
        Err(err) => Value::Error(err.to_string()),
    }
}
