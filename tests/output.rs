//! OUTPUT modes, RETURN lists and result shaping

mod common;

use common::{error_of, outputs, run};
use justc::format::result_to_json;
use justc::interpreter::JustcError;
use justc::Value;
use serde_json::json;

// =============================================================================
// SPECIFIED
// =============================================================================

#[test]
fn test_specified_returns_only_listed_names() {
    let result = run("x is 2, y is x * 3, OUTPUT SPECIFIED, RETURN [y]");
    assert!(result.is_ok());
    assert_eq!(result_to_json(&result)["return"], json!({"y": 6}));
}

#[test]
fn test_return_aliases() {
    let outputs = outputs("a is 5, b is 6, OUTPUT SPECIFIED, RETURN [a, b] AS [first, _]");
    let keys: Vec<&str> = outputs.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["first", "b"]);
    assert_eq!(outputs.get("first"), Some(&Value::Number(5.0)));
}

#[test]
fn test_return_before_output_directive() {
    let outputs = outputs("RETURN [a], a is 1, OUTPUT SPECIFIED");
    assert_eq!(outputs.get("a"), Some(&Value::Number(1.0)));
}

#[test]
fn test_short_aliases_for_directives() {
    let outputs = outputs("a is 1, b is 2, OUT SP, RT [b]");
    assert_eq!(outputs.len(), 1);
    assert_eq!(outputs.get("b"), Some(&Value::Number(2.0)));
}

#[test]
fn test_specified_without_return() {
    let err = error_of("a is 1, OUTPUT SPECIFIED");
    assert_eq!(err, JustcError::MissingReturn);
    assert_eq!(err.to_string(), "OUTPUT SPECIFIED requires RETURN command with variables");
}

#[test]
fn test_return_of_undeclared_name() {
    let err = error_of("a is 1, OUTPUT SPECIFIED, RETURN [nope]");
    assert_eq!(err, JustcError::MissingOutputVariable { name: "nope".to_string() });
}

// =============================================================================
// EVERYTHING AND DISABLED
// =============================================================================

#[test]
fn test_everything_is_default() {
    let outputs = outputs("a is 1, b is 2");
    assert_eq!(outputs.len(), 2);
}

#[test]
fn test_return_conflicts_with_everything() {
    let err = error_of("a is 1, OUTPUT EVERYTHING, RETURN [a]");
    assert_eq!(err.to_string(), "RETURN command not allowed with OUTPUT EVERYTHING");
}

#[test]
fn test_disabled_output_is_empty_but_successful() {
    let result = run("a is 1, OUTPUT DISABLED");
    assert!(result.is_ok());
    assert!(result.outputs.is_empty());
    assert_eq!(result_to_json(&result)["return"], json!({}));
}

#[test]
fn test_return_conflicts_with_disabled() {
    let err = error_of("a is 1, OUTPUT DISABLED, RETURN [a]");
    assert_eq!(err.to_string(), "RETURN command not allowed with OUTPUT DISABLED");
}

#[test]
fn test_invalid_output_mode() {
    let err = error_of("OUTPUT loud");
    assert_eq!(err.to_string(), "Invalid OUTPUT mode: loud at position 7");
}

// =============================================================================
// VALUE NORMALIZATION
// =============================================================================

#[test]
fn test_radix_values_leave_as_decimal() {
    let outputs = outputs("h is #ff, b is HEXADECIMAL(16), c is TYPEOF(HEXADECIMAL(16))");
    assert_eq!(outputs.get("h"), Some(&Value::Number(255.0)));
    assert_eq!(outputs.get("b"), Some(&Value::Number(16.0)));
    assert_eq!(outputs.get("c"), Some(&Value::string("hexadecimal")));
}

#[test]
fn test_json_rendering_of_special_values() {
    let result = run(r#"inf is 1 / 0, nothing is NULL, ok is yes, s is "text""#);
    assert_eq!(
        result_to_json(&result)["return"],
        json!({"inf": "Infinity", "nothing": null, "ok": true, "s": "text"})
    );
}

#[test]
fn test_failed_run_renders_error_object() {
    let result = run("a is a");
    let json = result_to_json(&result);
    assert_eq!(json["error"], json!("Variable 'a' references itself"));
    assert!(json.get("return").is_none());
}
