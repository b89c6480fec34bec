//! Built-in functions of the JUSTC language.
//!
//! Functions are organized into categories:
//! - **Math**: `V`, `D`, `SQ`, `CU`, `P`, `M`, `S`, `C`, `T`, `N`, `ABSOLUTE`, `CEIL`, `FLOOR`
//! - **Types**: stringify, numberify, radix conversions, base64, `TYPEID`, `TYPEOF`
//! - **Lookup**: `VALUE`, `LINK`, `ECHO` and the `$` pseudo-variables
//! - **External**: HTTP, file, environment, configuration, JSON and nested JUSTC
//!
//! Every function takes zero or more arguments and ignores extras. Missing
//! arguments fall back to a neutral default.

mod external;
mod lookup;
mod math;
mod types;

pub use external::*;
pub use lookup::*;
pub use math::*;
pub use types::*;

use super::capabilities::Capabilities;
use super::error::JustcError;
use crate::config::ParseOptions;
use crate::value::Value;

/// What a built-in may ask of whoever is evaluating it.
pub trait CallContext {
    fn options(&self) -> &ParseOptions;

    fn capabilities(&self) -> &dyn Capabilities;

    fn log(&mut self, kind: &str, message: String, offset: usize);

    /// Current value of a declared variable.
    fn lookup(&mut self, name: &str, offset: usize) -> Result<Value, JustcError>;
}

/// Names reachable through `$NAME`.
pub const PSEUDO_VARIABLES: &[&str] = &[
    "TIME", "VERSION", "LATEST", "DBID", "SHA", "NAV", "PAGES", "CSS", "PI", "BACKSLASH",
];

pub fn is_pseudo_variable(name: &str) -> bool {
    PSEUDO_VARIABLES.contains(&name)
}

pub fn is_function(name: &str) -> bool {
    is_pseudo_variable(name)
        || matches!(
            name,
            "V" | "D"
                | "SQ"
                | "CU"
                | "P"
                | "M"
                | "S"
                | "C"
                | "T"
                | "N"
                | "ABSOLUTE"
                | "CEIL"
                | "FLOOR"
                | "STRING"
                | "NUMBER"
                | "BINARY"
                | "OCTAL"
                | "HEXADECIMAL"
                | "STRINGNUM"
                | "STRINGBIN"
                | "STRINGOCT"
                | "STRINGHEX"
                | "STRINGB64"
                | "BASE64"
                | "TYPEID"
                | "TYPEOF"
                | "VALUE"
                | "LINK"
                | "ECHO"
                | "HTTPJSON"
                | "HTTPTEXT"
                | "HTTPJUSTC"
                | "FILE"
                | "SIZE"
                | "STAT"
                | "ENV"
                | "CONFIG"
                | "JSON"
                | "PARSEJSON"
                | "PARSEJUSTC"
                | "JUSTC"
        )
}

pub fn dispatch(
    ctx: &mut dyn CallContext,
    name: &str,
    args: &[Value],
    offset: usize,
) -> Result<Value, JustcError> {
    match name {
        "V" => Ok(builtin_sqrt(args)),
        "D" => Ok(builtin_double(args)),
        "SQ" => Ok(builtin_square(args)),
        "CU" => Ok(builtin_cube(args)),
        "P" => Ok(builtin_increment(args)),
        "M" => Ok(builtin_decrement(args)),
        "S" => Ok(builtin_sin(args)),
        "C" => Ok(builtin_cos(args)),
        "T" => Ok(builtin_tan(args)),
        "N" => Ok(builtin_negate(args)),
        "ABSOLUTE" => Ok(builtin_abs(args)),
        "CEIL" => Ok(builtin_ceil(args)),
        "FLOOR" => Ok(builtin_floor(args)),
        "STRING" => Ok(builtin_string(args)),
        "NUMBER" => Ok(builtin_number(args)),
        "BINARY" => Ok(builtin_binary(args)),
        "OCTAL" => Ok(builtin_octal(args)),
        "HEXADECIMAL" => Ok(builtin_hexadecimal(args)),
        "STRINGNUM" => Ok(builtin_string_radix(args, 10)),
        "STRINGBIN" => Ok(builtin_string_radix(args, 2)),
        "STRINGOCT" => Ok(builtin_string_radix(args, 8)),
        "STRINGHEX" => Ok(builtin_string_radix(args, 16)),
        "STRINGB64" => Ok(builtin_encode_base64(args)),
        "BASE64" => Ok(builtin_decode_base64(args)),
        "TYPEID" => Ok(builtin_typeid(args)),
        "TYPEOF" => Ok(builtin_typeof(args)),
        "VALUE" => builtin_value(ctx, args, offset),
        "LINK" => builtin_link(args, offset),
        "ECHO" => Ok(builtin_echo(ctx, args, offset)),
        "TIME" => Ok(builtin_time()),
        "PI" => Ok(Value::Number(std::f64::consts::PI)),
        "BACKSLASH" => Ok(Value::string("\\")),
        "VERSION" => Ok(Value::string(env!("CARGO_PKG_VERSION"))),
        "LATEST" | "DBID" | "SHA" | "NAV" | "PAGES" | "CSS" => Ok(builtin_host_variable(ctx, name)),
        "HTTPJSON" => builtin_http(ctx, HttpShape::Json, args, offset),
        "HTTPTEXT" => builtin_http(ctx, HttpShape::Text, args, offset),
        "HTTPJUSTC" => builtin_http(ctx, HttpShape::Justc, args, offset),
        "FILE" => Ok(builtin_file(ctx, args)),
        "SIZE" | "STAT" => Ok(builtin_size(ctx, args)),
        "ENV" => Ok(builtin_env(ctx, args)),
        "CONFIG" => Ok(builtin_config(ctx, args)),
        "JSON" => Ok(builtin_json(args)),
        "PARSEJSON" => Ok(builtin_parse_json(args)),
        "PARSEJUSTC" => Ok(builtin_parse_justc(ctx, args, offset)),
        "JUSTC" => Ok(builtin_justc_file(ctx, args, offset)),
        _ => Err(JustcError::UnknownFunction {
            name: name.to_string(),
            offset,
        }),
    }
}
