//! Mathematical built-in functions.

use crate::value::Value;

/// One-argument numeric function with the value returned when called bare.
macro_rules! unary_math {
    ($name:ident, $default:expr, $op:expr) => {
        pub fn $name(args: &[Value]) -> Value {
            match args.first() {
                Some(arg) => {
                    let op: fn(f64) -> f64 = $op;
                    Value::from_number(op(arg.to_number()))
                }
                None => Value::Number($default),
            }
        }
    };
}

unary_math!(builtin_sqrt, 0.0, f64::sqrt);
unary_math!(builtin_double, 0.0, |n| n * 2.0);
unary_math!(builtin_square, 0.0, |n| n * n);
unary_math!(builtin_cube, 0.0, |n| n * n * n);
unary_math!(builtin_increment, 1.0, |n| n + 1.0);
unary_math!(builtin_decrement, -1.0, |n| n - 1.0);
unary_math!(builtin_sin, 0.0, f64::sin);
unary_math!(builtin_cos, 1.0, f64::cos);
unary_math!(builtin_tan, 0.0, f64::tan);
unary_math!(builtin_negate, 0.0, |n| -n);
unary_math!(builtin_abs, 0.0, f64::abs);
unary_math!(builtin_ceil, 0.0, f64::ceil);
unary_math!(builtin_floor, 0.0, f64::floor);
