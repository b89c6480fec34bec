//! JSON and XML rendering of results and token streams.

use indexmap::IndexMap;
use serde_json::json;

use crate::interpreter::{LogEntry, ParseResult};
use crate::token::Token;
use crate::value::Value;

/// Largest integer an `f64` holds exactly.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

fn number_to_json(n: f64) -> serde_json::Value {
    if n.fract() == 0.0 && n.abs() < MAX_EXACT_INTEGER {
        json!(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(serde_json::Value::Number)
            .unwrap_or_else(|| json!(Value::from_number(n).to_string()))
    }
}

pub fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Number(n) | Value::Hexadecimal(n) | Value::Binary(n) | Value::Octal(n) => number_to_json(*n),
        Value::String(s) | Value::Link(s) | Value::Path(s) | Value::Variable(s) => json!(s),
        Value::Boolean(b) => json!(b),
        Value::Null | Value::Unknown => serde_json::Value::Null,
        Value::NotANumber => json!("NaN"),
        Value::Infinite => json!("Infinity"),
        Value::Error(message) => json!({ "error": message }),
        Value::JustcObject(map) | Value::JsonObject(map) => map_to_json(map),
        Value::JsonArray(items) => serde_json::Value::Array(items.iter().map(value_to_json).collect()),
    }
}

fn map_to_json(map: &IndexMap<String, Value>) -> serde_json::Value {
    serde_json::Value::Object(
        map.iter()
            .map(|(key, value)| (key.clone(), value_to_json(value)))
            .collect(),
    )
}

pub fn json_to_value(json_val: serde_json::Value) -> Value {
    match json_val {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Boolean(b),
        serde_json::Value::Number(json_number) => Value::Number(json_number.as_f64().unwrap_or(0.0)),
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(array) => Value::JsonArray(array.into_iter().map(json_to_value).collect()),
        serde_json::Value::Object(object) => {
            let mut map = IndexMap::new();
            for (k, v) in object {
                map.insert(k, json_to_value(v));
            }
            Value::JsonObject(map)
        }
    }
}

fn log_to_json(entry: &LogEntry) -> serde_json::Value {
    json!({
        "type": entry.kind,
        "message": entry.message,
        "position": entry.offset,
        "time": entry.timestamp,
    })
}

pub fn result_to_json(result: &ParseResult) -> serde_json::Value {
    let logs: Vec<serde_json::Value> = result.logs.iter().map(log_to_json).collect();
    match &result.error {
        Some(err) => json!({
            "error": err.to_string(),
            "logs": logs,
        }),
        None => json!({
            "return": map_to_json(&result.outputs),
            "logs": logs,
            "logfile": {
                "file": result.log_file_path,
                "logs": result.log_file_content,
            },
        }),
    }
}

pub fn tokens_to_json(source: &str, tokens: &[Token]) -> serde_json::Value {
    let tokens: Vec<serde_json::Value> = tokens
        .iter()
        .map(|token| {
            json!({
                "type": token.kind.name(),
                "value": token.text,
                "start": token.offset,
            })
        })
        .collect();
    json!({ "input": source, "tokens": tokens })
}

pub fn to_json_string(value: &serde_json::Value, compact: bool) -> String {
    if compact {
        value.to_string()
    } else {
        format!("{:#}", value)
    }
}

// ===== XML =====

const XML_PROLOGUE: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>";

pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Keys become element names; characters XML does not allow there are
/// replaced with `_`.
fn element_name(key: &str) -> String {
    let mut name: String = key
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.') { c } else { '_' })
        .collect();
    if !name.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_') {
        name.insert(0, '_');
    }
    name
}

fn write_xml_value(out: &mut String, tag: &str, value: &Value, depth: usize) {
    let indent = "  ".repeat(depth);
    let tag = element_name(tag);
    match value {
        Value::JustcObject(map) | Value::JsonObject(map) => {
            out.push_str(&format!("{}<{}>\n", indent, tag));
            for (key, item) in map {
                write_xml_value(out, key, item, depth + 1);
            }
            out.push_str(&format!("{}</{}>\n", indent, tag));
        }
        Value::JsonArray(items) => {
            out.push_str(&format!("{}<{}>\n", indent, tag));
            for item in items {
                write_xml_value(out, "item", item, depth + 1);
            }
            out.push_str(&format!("{}</{}>\n", indent, tag));
        }
        Value::Null | Value::Unknown => out.push_str(&format!("{}<{}/>\n", indent, tag)),
        Value::Error(message) => out.push_str(&format!(
            "{}<{}><error>{}</error></{}>\n",
            indent,
            tag,
            escape_xml(message),
            tag
        )),
        scalar => {
            let text = match scalar.numeric_payload() {
                Some(n) => value_to_json(&Value::Number(n)).to_string(),
                None => scalar.to_string(),
            };
            out.push_str(&format!("{}<{}>{}</{}>\n", indent, tag, escape_xml(&text), tag));
        }
    }
}

fn write_xml_logs(out: &mut String, logs: &[LogEntry]) {
    if logs.is_empty() {
        out.push_str("  <logs/>\n");
        return;
    }
    out.push_str("  <logs>\n");
    for entry in logs {
        out.push_str(&format!(
            "    <log type=\"{}\" position=\"{}\" time=\"{}\">{}</log>\n",
            escape_xml(&entry.kind),
            entry.offset,
            escape_xml(&entry.timestamp),
            escape_xml(&entry.message)
        ));
    }
    out.push_str("  </logs>\n");
}

pub fn result_to_xml(result: &ParseResult) -> String {
    let mut out = String::from(XML_PROLOGUE);
    out.push_str("\n<justc>\n");

    match &result.error {
        Some(err) => out.push_str(&format!("  <error>{}</error>\n", escape_xml(&err.to_string()))),
        None => {
            out.push_str("  <return>\n");
            for (name, value) in &result.outputs {
                write_xml_value(&mut out, name, value, 2);
            }
            out.push_str("  </return>\n");
        }
    }
    write_xml_logs(&mut out, &result.logs);

    out.push_str("</justc>\n");
    out
}

pub fn tokens_to_xml(source: &str, tokens: &[Token]) -> String {
    let mut out = String::from(XML_PROLOGUE);
    out.push_str("\n<parser>\n");
    out.push_str(&format!("  <input>{}</input>\n", escape_xml(source)));
    out.push_str("  <tokens>\n");
    for token in tokens {
        out.push_str(&format!(
            "    <token><type>{}</type><value>{}</value><start>{}</start></token>\n",
            escape_xml(token.kind.name()),
            escape_xml(&token.text),
            token.offset
        ));
    }
    out.push_str("  </tokens>\n</parser>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenKind;

    #[test]
    fn test_whole_numbers_are_integers() {
        assert_eq!(value_to_json(&Value::Number(6.0)).to_string(), "6");
        assert_eq!(value_to_json(&Value::Number(2.5)).to_string(), "2.5");
        assert_eq!(value_to_json(&Value::Hexadecimal(255.0)).to_string(), "255");
    }

    #[test]
    fn test_special_values() {
        assert_eq!(value_to_json(&Value::NotANumber), json!("NaN"));
        assert_eq!(value_to_json(&Value::Infinite), json!("Infinity"));
        assert_eq!(value_to_json(&Value::Error("boom".into())), json!({"error": "boom"}));
    }

    #[test]
    fn test_json_round_trip_keeps_key_order() {
        let json: serde_json::Value = serde_json::from_str(r#"{"b":1,"a":[true,null]}"#).unwrap();
        let value = json_to_value(json.clone());
        assert_eq!(value_to_json(&value).to_string(), json.to_string());
    }

    #[test]
    fn test_token_stream_json() {
        let tokens = vec![Token::new(TokenKind::Identifier, "x", 0)];
        assert_eq!(
            tokens_to_json("x", &tokens),
            json!({"input": "x", "tokens": [{"type": "identifier", "value": "x", "start": 0}]})
        );
    }

    #[test]
    fn test_xml_escaping() {
        assert_eq!(escape_xml("a<b & \"c\""), "a&lt;b &amp; &quot;c&quot;");
        assert_eq!(element_name("1st key"), "_1st_key");
    }
}
