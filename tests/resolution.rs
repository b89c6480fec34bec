//! Dependency resolution: ordering, cycles and the pass budget

mod common;

use common::{error_of, log_messages, outputs, run};
use justc::interpreter::{interpret_with, DisabledCapabilities, JustcError};
use justc::{ParseOptions, Value};

// =============================================================================
// ORDER INDEPENDENCE
// =============================================================================

#[test]
fn test_forward_references_resolve() {
    let before = outputs("a is b + 1, b is 2");
    let after = outputs("b is 2, a is b + 1");
    assert_eq!(before.get("a"), Some(&Value::Number(3.0)));
    assert_eq!(before.get("a"), after.get("a"));
    assert_eq!(before.get("b"), after.get("b"));
}

#[test]
fn test_everything_keeps_declaration_order() {
    let outputs = outputs("total is price * count, price is 4, count is 3");
    let names: Vec<&str> = outputs.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["total", "price", "count"]);
    assert_eq!(outputs.get("total"), Some(&Value::Number(12.0)));
}

#[test]
fn test_chain_of_dependencies() {
    let outputs = outputs("d is c * 2, c is b + 1, b is a + 1, a is 1");
    assert_eq!(outputs.get("d"), Some(&Value::Number(6.0)));
}

#[test]
fn test_last_declaration_wins() {
    let outputs = outputs("x is 1, y is x + 1, x is 2");
    assert_eq!(outputs.len(), 2);
    assert_eq!(outputs.get("x"), Some(&Value::Number(2.0)));
    assert_eq!(outputs.get("y"), Some(&Value::Number(3.0)));
}

#[test]
fn test_value_of_reference() {
    let outputs = outputs(r#"x is 5, y is VALUE(x), z is VALUE("x")"#);
    assert_eq!(outputs.get("y"), Some(&Value::Number(5.0)));
    assert_eq!(outputs.get("z"), Some(&Value::Number(5.0)));
}

// =============================================================================
// CYCLES AND SELF REFERENCES
// =============================================================================

#[test]
fn test_direct_cycle() {
    let err = error_of("a is b, b is a");
    assert_eq!(
        err,
        JustcError::CircularDependency {
            cycle: vec!["a".to_string(), "b".to_string(), "a".to_string()]
        }
    );
    assert_eq!(err.to_string(), "Circular dependency detected: a -> b -> a");
}

#[test]
fn test_longer_cycle() {
    let err = error_of("a is c + 1, b is a + 1, c is b + 1");
    match err {
        JustcError::CircularDependency { cycle } => {
            assert_eq!(cycle.len(), 4);
            assert_eq!(cycle.first(), cycle.last());
        }
        other => panic!("expected a cycle, got {:?}", other),
    }
}

#[test]
fn test_cycle_through_value_lookup() {
    let err = error_of(r#"a is VALUE("b"), b is VALUE("a")"#);
    assert!(matches!(err, JustcError::CircularDependency { .. }), "got {:?}", err);
}

#[test]
fn test_self_reference() {
    let err = error_of("a is a + 1");
    assert_eq!(
        err,
        JustcError::SelfReference {
            name: "a".to_string(),
            offset: 0
        }
    );
    assert_eq!(err.to_string(), "Variable 'a' references itself");
}

#[test]
fn test_self_reference_during_eager_command() {
    let result = run("x is x, ECHO(x)");
    assert_eq!(
        result.error,
        Some(JustcError::SelfReference {
            name: "x".to_string(),
            offset: 0
        })
    );
    assert!(result.outputs.is_empty());
}

#[test]
fn test_self_reference_through_value_lookup() {
    let err = error_of(r#"x is VALUE("x")"#);
    assert_eq!(
        err,
        JustcError::SelfReference {
            name: "x".to_string(),
            offset: 0
        }
    );
    assert_eq!(err.code(), "E0202");
}

#[test]
fn test_undefined_reference() {
    let err = error_of("a is missing + 1");
    assert_eq!(
        err,
        JustcError::UndefinedVariable {
            name: "missing".to_string(),
            offset: 5
        }
    );
}

#[test]
fn test_failure_is_logged() {
    let result = run("a is b, b is a");
    let errors = log_messages(&result, "ERROR");
    assert_eq!(errors, vec!["Circular dependency detected: a -> b -> a".to_string()]);
}

// =============================================================================
// PASS BUDGET
// =============================================================================

fn with_budget(source: &str, max_passes: usize) -> justc::ParseResult {
    let options = ParseOptions {
        max_passes,
        ..ParseOptions::quiet()
    };
    interpret_with(source, &options, &DisabledCapabilities)
}

#[test]
fn test_single_pass_never_converges() {
    let result = with_budget("a is 1", 1);
    assert_eq!(result.error, Some(JustcError::UnresolvedDependency { passes: 1 }));
    assert!(result.outputs.is_empty());
}

#[test]
fn test_two_passes_settle_literals() {
    let result = with_budget("a is 1, b is a + 1", 2);
    assert!(result.is_ok(), "{:?}", result.error);
    assert_eq!(result.outputs.get("b"), Some(&Value::Number(2.0)));
}

#[test]
fn test_unresolved_message_names_pass_count() {
    let result = with_budget("a is 1", 1);
    assert_eq!(
        result.error_message().as_deref(),
        Some("Could not resolve all variables after 1 passes (possible circular dependency)")
    );
}

// =============================================================================
// MEMOIZED CALLS
// =============================================================================

#[test]
fn test_deferred_call_runs_once() {
    let result = run("a is 1, x is ECHO(a)");
    assert!(result.is_ok());
    assert_eq!(log_messages(&result, "ECHO"), vec!["1".to_string()]);
}

#[test]
fn test_distinct_call_sites_each_run() {
    let result = run("a is 1, b is 2, x is ECHO(a), y is ECHO(b)");
    assert_eq!(log_messages(&result, "ECHO"), vec!["1".to_string(), "2".to_string()]);
}
