use indexmap::IndexMap;
use std::fmt;

/// A JUSTC value.
///
/// The numeric family (`Number`, `Hexadecimal`, `Binary`, `Octal`) shares one
/// `f64` payload and differs only in display radix. `Unknown` marks a value
/// that could not be computed yet; it never reaches a final result.
#[derive(Debug, Clone)]
pub enum Value {
    Number(f64),
    Hexadecimal(f64),
    Binary(f64),
    Octal(f64),
    String(String),
    Link(String),
    Path(String),
    /// Unresolved reference to a variable by name.
    Variable(String),
    Boolean(bool),
    Null,
    NotANumber,
    Infinite,
    Error(String),
    JustcObject(IndexMap<String, Value>),
    JsonObject(IndexMap<String, Value>),
    JsonArray(Vec<Value>),
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    JustcObject,
    Number,
    String,
    Link,
    Boolean,
    JsonObject,
    JsonArray,
    Null,
    Hexadecimal,
    Binary,
    Path,
    Error,
    Variable,
    Function,
    NotANumber,
    Infinite,
    SyntaxError,
    Octal,
    Unknown,
}

impl DataType {
    /// Integer tag reported by `TYPEID`.
    pub fn id(self) -> i64 {
        match self {
            DataType::JustcObject => 0,
            DataType::Number => 1,
            DataType::String => 2,
            DataType::Link => 3,
            DataType::Boolean => 4,
            DataType::JsonObject => 5,
            DataType::JsonArray => 6,
            DataType::Null => 7,
            DataType::Hexadecimal => 9,
            DataType::Binary => 11,
            DataType::Path => 12,
            DataType::Error => 13,
            DataType::Variable => 14,
            DataType::Function => 15,
            DataType::NotANumber => 17,
            DataType::Infinite => 18,
            DataType::SyntaxError => 19,
            DataType::Octal => 20,
            DataType::Unknown => -1,
        }
    }

    /// Symbolic name reported by `TYPEOF`.
    pub fn name(self) -> &'static str {
        match self {
            DataType::JustcObject => "justc_object",
            DataType::Number => "number",
            DataType::String => "string",
            DataType::Link => "link",
            DataType::Boolean => "boolean",
            DataType::JsonObject => "json_object",
            DataType::JsonArray => "json_array",
            DataType::Null => "null",
            DataType::Hexadecimal => "hexadecimal",
            DataType::Binary => "binary",
            DataType::Path => "path",
            DataType::Octal => "octal",
            DataType::Error => "error",
            DataType::Variable => "variable",
            DataType::Function => "function",
            DataType::NotANumber => "not_a_number",
            DataType::Infinite => "infinite",
            DataType::SyntaxError | DataType::Unknown => "unknown",
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        fn same_number(a: f64, b: f64) -> bool {
            a == b || (a.is_nan() && b.is_nan())
        }

        match (self, other) {
            (Value::Number(a), Value::Number(b))
            | (Value::Hexadecimal(a), Value::Hexadecimal(b))
            | (Value::Binary(a), Value::Binary(b))
            | (Value::Octal(a), Value::Octal(b)) => same_number(*a, *b),
            (Value::String(a), Value::String(b))
            | (Value::Link(a), Value::Link(b))
            | (Value::Path(a), Value::Path(b))
            | (Value::Variable(a), Value::Variable(b))
            | (Value::Error(a), Value::Error(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::JustcObject(a), Value::JustcObject(b))
            | (Value::JsonObject(a), Value::JsonObject(b)) => a == b,
            (Value::JsonArray(a), Value::JsonArray(b)) => a == b,
            (Value::Null, Value::Null)
            | (Value::NotANumber, Value::NotANumber)
            | (Value::Infinite, Value::Infinite)
            | (Value::Unknown, Value::Unknown) => true,
            _ => false,
        }
    }
}

impl Value {
    pub fn string(text: impl Into<String>) -> Self {
        Value::String(text.into())
    }

    /// Wrap an arithmetic result, mapping NaN and infinities onto their own kinds.
    pub fn from_number(n: f64) -> Self {
        if n.is_nan() {
            Value::NotANumber
        } else if n.is_infinite() {
            Value::Infinite
        } else {
            Value::Number(n)
        }
    }

    pub fn data_type(&self) -> DataType {
        match self {
            Value::Number(_) => DataType::Number,
            Value::Hexadecimal(_) => DataType::Hexadecimal,
            Value::Binary(_) => DataType::Binary,
            Value::Octal(_) => DataType::Octal,
            Value::String(_) => DataType::String,
            Value::Link(_) => DataType::Link,
            Value::Path(_) => DataType::Path,
            Value::Variable(_) => DataType::Variable,
            Value::Boolean(_) => DataType::Boolean,
            Value::Null => DataType::Null,
            Value::NotANumber => DataType::NotANumber,
            Value::Infinite => DataType::Infinite,
            Value::Error(_) => DataType::Error,
            Value::JustcObject(_) => DataType::JustcObject,
            Value::JsonObject(_) => DataType::JsonObject,
            Value::JsonArray(_) => DataType::JsonArray,
            Value::Unknown => DataType::Unknown,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Value::Unknown)
    }

    pub fn is_numeric(&self) -> bool {
        self.numeric_payload().is_some()
    }

    /// The shared payload of the numeric family.
    pub fn numeric_payload(&self) -> Option<f64> {
        match self {
            Value::Number(n) | Value::Hexadecimal(n) | Value::Binary(n) | Value::Octal(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric coercion used by arithmetic and comparisons.
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Number(n) | Value::Hexadecimal(n) | Value::Binary(n) | Value::Octal(n) => *n,
            Value::String(s) => parse_decimal(s),
            Value::Boolean(true) => 1.0,
            Value::NotANumber => f64::NAN,
            Value::Infinite => f64::INFINITY,
            _ => 0.0,
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Boolean(b) => *b,
            Value::Number(n) | Value::Hexadecimal(n) | Value::Binary(n) | Value::Octal(n) => *n != 0.0,
            Value::String(s) => {
                let lowered = s.to_lowercase();
                !(s.is_empty() || matches!(lowered.as_str(), "false" | "no" | "n" | "null" | "nil"))
            }
            Value::Null | Value::NotANumber | Value::Unknown => false,
            _ => true,
        }
    }

    /// Hexadecimal, binary and octal values become plain numbers.
    pub fn to_decimal(&self) -> Value {
        match self {
            Value::Hexadecimal(n) | Value::Binary(n) | Value::Octal(n) => Value::Number(*n),
            other => other.clone(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::Hexadecimal(n) => write_radix(f, *n, "x", |v| format!("{:x}", v)),
            Value::Binary(n) => write_radix(f, *n, "b", |v| format!("{:b}", v)),
            Value::Octal(n) => write_radix(f, *n, "o", |v| format!("{:o}", v)),
            Value::String(s) | Value::Link(s) | Value::Path(s) | Value::Variable(s) => f.write_str(s),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Null => f.write_str("null"),
            Value::NotANumber => f.write_str("NaN"),
            Value::Infinite => f.write_str("Infinity"),
            Value::Error(message) => write!(f, "Error: {}", message),
            Value::JustcObject(_) | Value::JsonObject(_) | Value::JsonArray(_) => {
                f.write_str(&crate::format::value_to_json(self).to_string())
            }
            Value::Unknown => f.write_str("unknown"),
        }
    }
}

fn write_radix(
    f: &mut fmt::Formatter<'_>,
    n: f64,
    prefix: &str,
    digits: impl Fn(u64) -> String,
) -> fmt::Result {
    let sign = if n < 0.0 { "-" } else { "" };
    write!(f, "{}{}{}", sign, prefix, digits(n.abs().trunc() as u64))
}

/// Whole numbers print without a fractional part.
pub fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{:.0}", n)
    } else {
        n.to_string()
    }
}

/// Lenient decimal parsing: the whole trimmed text if it is a number,
/// otherwise its longest numeric prefix, otherwise zero.
pub fn parse_decimal(text: &str) -> f64 {
    let trimmed = text.trim();
    if let Ok(n) = trimmed.parse::<f64>() {
        return n;
    }

    let mut end = 0;
    let mut seen_dot = false;
    for (i, c) in trimmed.char_indices() {
        let accepted = match c {
            '+' | '-' => i == 0,
            '0'..='9' => true,
            '.' if !seen_dot => {
                seen_dot = true;
                true
            }
            _ => false,
        };
        if !accepted {
            break;
        }
        end = i + c.len_utf8();
    }
    trimmed[..end].trim_end_matches('.').parse().unwrap_or(0.0)
}

/// Parse the digits of a radix literal, ignoring a leading marker such as
/// `#`, `b` or `o`. Invalid digits give zero.
pub fn parse_radix(text: &str, radix: u32) -> f64 {
    let digits = text
        .strip_prefix(|c: char| matches!(c, '#' | 'b' | 'B' | 'x' | 'o'))
        .unwrap_or(text);
    digits
        .chars()
        .try_fold(0.0, |acc: f64, c| c.to_digit(radix).map(|d| acc * radix as f64 + d as f64))
        .unwrap_or(0.0)
}
