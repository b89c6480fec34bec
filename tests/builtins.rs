//! Built-in functions and pseudo-variables

mod common;

use common::{error_of, log_messages, output, outputs, run};
use justc::interpreter::JustcError;
use justc::Value;

fn x(source: &str) -> Value {
    output(source, "x")
}

// =============================================================================
// MATH
// =============================================================================

#[test]
fn test_roots_and_powers() {
    assert_eq!(x("x is V(16)"), Value::Number(4.0));
    assert_eq!(x("x is SQRT(9)"), Value::Number(3.0));
    assert_eq!(x("x is D(4)"), Value::Number(8.0));
    assert_eq!(x("x is SQ(3)"), Value::Number(9.0));
    assert_eq!(x("x is CUBE(2)"), Value::Number(8.0));
}

#[test]
fn test_increment_and_decrement_defaults() {
    assert_eq!(x("x is P(4)"), Value::Number(5.0));
    assert_eq!(x("x is P()"), Value::Number(1.0));
    assert_eq!(x("x is M()"), Value::Number(-1.0));
}

#[test]
fn test_rounding_and_sign() {
    assert_eq!(x("x is N(5)"), Value::Number(-5.0));
    assert_eq!(x("x is ABS(-3)"), Value::Number(3.0));
    assert_eq!(x("x is CEIL(1.2)"), Value::Number(2.0));
    assert_eq!(x("x is FLOOR(1.8)"), Value::Number(1.0));
}

#[test]
fn test_trigonometry() {
    assert_eq!(x("x is C()"), Value::Number(1.0));
    assert_eq!(x("x is SIN(0)"), Value::Number(0.0));
}

#[test]
fn test_math_on_deferred_argument() {
    assert_eq!(x("x is V(y), y is 81"), Value::Number(9.0));
}

// =============================================================================
// CONVERSIONS
// =============================================================================

#[test]
fn test_string_and_number() {
    assert_eq!(x("x is STRING(12)"), Value::string("12"));
    assert_eq!(x(r#"x is NUMBER("42")"#), Value::Number(42.0));
}

#[test]
fn test_radix_strings() {
    assert_eq!(x("x is STRINGHEX(255)"), Value::string("ff"));
    assert_eq!(x("x is STRINGBIN(5)"), Value::string("101"));
    assert_eq!(x("x is STRINGOCT(8)"), Value::string("10"));
    assert_eq!(x("x is STRINGNUM(2.5)"), Value::string("2.5"));
}

#[test]
fn test_base64() {
    assert_eq!(x(r#"x is STRINGB64("hi")"#), Value::string("aGk="));
    assert_eq!(x(r#"x is BASE64("aGk=")"#), Value::string("hi"));
}

#[test]
fn test_invalid_base64_is_error_value() {
    assert!(matches!(x(r#"x is BASE64("***")"#), Value::Error(_)));
}

#[test]
fn test_type_introspection() {
    assert_eq!(x(r#"x is TYPEID("x")"#), Value::Number(2.0));
    assert_eq!(x("x is TYPEID()"), Value::Number(-1.0));
    assert_eq!(x("x is TYPEOF(<https://a.b>)"), Value::string("link"));
    assert_eq!(x("x is TYPEOF(1)"), Value::string("number"));
}

// =============================================================================
// LINKS, VALUE AND ECHO
// =============================================================================

#[test]
fn test_link_conversion() {
    assert_eq!(
        x(r#"x is LINK("https://example.com")"#),
        Value::Link("https://example.com".to_string())
    );
}

#[test]
fn test_invalid_link() {
    let err = error_of(r#"x is LINK("nope")"#);
    assert_eq!(err.to_string(), "Invalid link: nope");
}

#[test]
fn test_echo_function_logs_and_returns_null() {
    let result = run(r#"x is ECHO("hi")"#);
    assert_eq!(result.outputs.get("x"), Some(&Value::Null));
    assert_eq!(log_messages(&result, "ECHO"), vec!["hi".to_string()]);
}

#[test]
fn test_unknown_function() {
    let err = error_of("x is FOO(1)");
    assert_eq!(
        err,
        JustcError::UnknownFunction {
            name: "FOO".to_string(),
            offset: 5
        }
    );
    assert_eq!(err.to_string(), "Unknown function: FOO at position 5");
}

// =============================================================================
// JSON AND EMBEDDED JUSTC
// =============================================================================

#[test]
fn test_parse_json_and_back() {
    let outputs = outputs(r#"obj is PARSEJSON("{\"a\":1}"), text is JSON(obj)"#);
    assert!(matches!(outputs.get("obj"), Some(Value::JsonObject(_))));
    assert_eq!(outputs.get("text"), Some(&Value::string(r#"{"a":1}"#)));
}

#[test]
fn test_invalid_json_is_error_value() {
    match x(r#"x is PARSEJSON("{")"#) {
        Value::Error(message) => assert!(message.starts_with("Invalid JSON"), "{}", message),
        other => panic!("expected an error value, got {:?}", other),
    }
}

#[test]
fn test_parse_justc() {
    match x(r#"x is PARSEJUSTC("a is 1, b is a + 1")"#) {
        Value::JustcObject(map) => {
            assert_eq!(map.get("a"), Some(&Value::Number(1.0)));
            assert_eq!(map.get("b"), Some(&Value::Number(2.0)));
        }
        other => panic!("expected a JUSTC object, got {:?}", other),
    }
}

#[test]
fn test_parse_justc_failure_is_error_value() {
    assert!(matches!(x(r#"x is PARSEJUSTC("a is a")"#), Value::Error(_)));
}

#[test]
fn test_nested_failure_is_not_logged_as_error() {
    let result = run(r#"x is PARSEJUSTC("a is a")"#);
    assert!(result.is_ok(), "{:?}", result.error);
    assert!(log_messages(&result, "ERROR").is_empty());
    assert_eq!(
        log_messages(&result, "NESTED_ERROR"),
        vec!["Variable 'a' references itself".to_string()]
    );
}

// =============================================================================
// PSEUDO-VARIABLES
// =============================================================================

#[test]
fn test_constant_pseudo_variables() {
    assert_eq!(x("x is $PI"), Value::Number(std::f64::consts::PI));
    assert_eq!(x("x is $BACKSLASH"), Value::string("\\"));
    assert_eq!(x("x is $VERSION"), Value::string(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_time_is_positive() {
    match x("x is $TIME") {
        Value::Number(n) => assert!(n > 0.0),
        other => panic!("expected a number, got {:?}", other),
    }
}

#[test]
fn test_host_variables_without_configuration() {
    assert_eq!(
        x("x is $LATEST"),
        Value::Error("Configuration access is disabled".to_string())
    );
}
