//! Operator semantics. Every function here is total: `Unknown` operands
//! propagate, and division by zero yields `Infinite`.

use crate::ast::{BinaryOp, UnaryOp};
use crate::value::Value;

pub fn evaluate_binary(left: &Value, op: BinaryOp, right: &Value) -> Value {
    if left.is_unknown() || right.is_unknown() {
        return Value::Unknown;
    }

    match op {
        BinaryOp::Add => match (left.numeric_payload(), right.numeric_payload()) {
            (Some(a), Some(b)) => Value::from_number(a + b),
            _ => Value::String(format!("{}{}", left, right)),
        },
        BinaryOp::Concat => Value::String(format!("{}{}", left, right)),
        BinaryOp::Sub => Value::from_number(left.to_number() - right.to_number()),
        BinaryOp::Mul => Value::from_number(left.to_number() * right.to_number()),
        BinaryOp::Div => {
            let divisor = right.to_number();
            if divisor == 0.0 {
                Value::Infinite
            } else {
                Value::from_number(left.to_number() / divisor)
            }
        }
        BinaryOp::Mod => Value::from_number(left.to_number() % right.to_number()),
        BinaryOp::Pow => Value::from_number(left.to_number().powf(right.to_number())),
        BinaryOp::Eq => Value::Boolean(left.to_number() == right.to_number()),
        BinaryOp::NotEq => Value::Boolean(left.to_number() != right.to_number()),
        BinaryOp::Less => Value::Boolean(left.to_number() < right.to_number()),
        BinaryOp::Greater => Value::Boolean(left.to_number() > right.to_number()),
        BinaryOp::LessEq => Value::Boolean(left.to_number() <= right.to_number()),
        BinaryOp::GreaterEq => Value::Boolean(left.to_number() >= right.to_number()),
        BinaryOp::And => Value::Boolean(left.is_truthy() && right.is_truthy()),
        BinaryOp::Or => Value::Boolean(left.is_truthy() || right.is_truthy()),
        BinaryOp::Nand => Value::Boolean(!(left.is_truthy() && right.is_truthy())),
        BinaryOp::Nor => Value::Boolean(!(left.is_truthy() || right.is_truthy())),
    }
}

pub fn evaluate_unary(op: UnaryOp, value: &Value) -> Value {
    if value.is_unknown() {
        return Value::Unknown;
    }

    match op {
        UnaryOp::Neg => Value::from_number(-value.to_number()),
        UnaryOp::Plus => Value::from_number(value.to_number()),
        UnaryOp::Not => Value::Boolean(!value.is_truthy()),
    }
}

/// The `isn't` transform: numbers become `n > 0`, links become plain
/// strings, booleans flip, anything else is `false`.
pub fn inequality(value: &Value) -> Value {
    match value {
        Value::Unknown => Value::Unknown,
        Value::Link(text) => Value::String(text.clone()),
        Value::Boolean(b) => Value::Boolean(!b),
        other => match other.numeric_payload() {
            Some(n) => Value::Boolean(n > 0.0),
            None => Value::Boolean(false),
        },
    }
}

/// Which branch a conditional takes. `None` while the condition is unknown.
pub fn takes_then_branch(condition: &Value, negate: bool) -> Option<bool> {
    if condition.is_unknown() {
        None
    } else {
        Some(condition.is_truthy() != negate)
    }
}
