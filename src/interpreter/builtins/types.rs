//! Type introspection and conversion built-in functions.

use base64::{engine::general_purpose::STANDARD, Engine};

use crate::value::{format_number, DataType, Value};

pub fn builtin_string(args: &[Value]) -> Value {
    match args.first() {
        Some(arg) => Value::String(arg.to_string()),
        None => Value::string(""),
    }
}

pub fn builtin_number(args: &[Value]) -> Value {
    args.first()
        .map(|arg| Value::from_number(arg.to_number()))
        .unwrap_or(Value::Number(0.0))
}

fn whole(args: &[Value]) -> f64 {
    args.first().map(|arg| arg.to_number().trunc()).unwrap_or(0.0)
}

pub fn builtin_binary(args: &[Value]) -> Value {
    Value::Binary(whole(args))
}

pub fn builtin_octal(args: &[Value]) -> Value {
    Value::Octal(whole(args))
}

pub fn builtin_hexadecimal(args: &[Value]) -> Value {
    Value::Hexadecimal(whole(args))
}

/// Digits of a number in the given radix, without any marker.
pub fn radix_digits(n: f64, radix: u32) -> String {
    if radix == 10 {
        return format_number(n);
    }
    let magnitude = n.abs().trunc() as u64;
    let digits = match radix {
        2 => format!("{:b}", magnitude),
        8 => format!("{:o}", magnitude),
        _ => format!("{:x}", magnitude),
    };
    if n < 0.0 && magnitude != 0 {
        format!("-{}", digits)
    } else {
        digits
    }
}

pub fn builtin_string_radix(args: &[Value], radix: u32) -> Value {
    let n = args.first().map(Value::to_number).unwrap_or(0.0);
    if !n.is_finite() {
        return Value::String(Value::from_number(n).to_string());
    }
    Value::String(radix_digits(n, radix))
}

pub fn encode_base64(text: &str) -> String {
    STANDARD.encode(text.as_bytes())
}

pub fn decode_base64(text: &str) -> Result<String, String> {
    let bytes = STANDARD
        .decode(text.trim())
        .map_err(|e| format!("Invalid base64 '{}': {}", text, e))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

pub fn builtin_encode_base64(args: &[Value]) -> Value {
    let text = args.first().map(Value::to_string).unwrap_or_default();
    Value::String(encode_base64(&text))
}

pub fn builtin_decode_base64(args: &[Value]) -> Value {
    let text = args.first().map(Value::to_string).unwrap_or_default();
    match decode_base64(&text) {
        Ok(decoded) => Value::String(decoded),
        Err(message) => Value::Error(message),
    }
}

pub fn builtin_typeid(args: &[Value]) -> Value {
    let data_type = args.first().map(Value::data_type).unwrap_or(DataType::Unknown);
    Value::Number(data_type.id() as f64)
}

pub fn builtin_typeof(args: &[Value]) -> Value {
    let data_type = args.first().map(Value::data_type).unwrap_or(DataType::Unknown);
    Value::string(data_type.name())
}
