//! Shared argument coercions for predicates.
//!
//! Predicates never check argument types up front. When a value cannot be used
//! the way a predicate needs it, these helpers raise a `TypeError` fault, which
//! the dispatcher reports as an evaluation fault.

use std::path::PathBuf;

use crate::fault::Fault;
use crate::value::{compare, Callable, Value};

/// Converts a scalar (or null) into a filesystem path.
#[track_caller]
pub fn path_arg(value: &Value, function: &str) -> Result<PathBuf, Fault> {
    let text = match value {
        Value::Null => String::new(),
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) => String::new(),
        Value::Int(_) | Value::Float(_) | Value::String(_) => value.to_string(),
        other => {
            return Err(Fault::type_error(format!(
                "{}(): Argument #1 ($filename) must be of type string, {} given",
                function,
                other.type_name()
            )))
        }
    };
    Ok(PathBuf::from(text))
}

/// Converts a number or numeric string into `f64`.
#[track_caller]
pub fn float_arg(value: &Value, function: &str) -> Result<f64, Fault> {
    match value {
        Value::Int(i) => Ok(*i as f64),
        Value::Float(f) => Ok(*f),
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => match compare::numeric_string(s) {
            Some(n) => Ok(n.as_f64()),
            None => Err(type_mismatch(function, "num", "float", value)),
        },
        other => Err(type_mismatch(function, "num", "float", other)),
    }
}

/// Reads a class name from a string, an object or a fault.
#[track_caller]
pub fn class_name_arg(value: &Value, function: &str) -> Result<String, Fault> {
    match value {
        Value::String(s) => Ok(s.clone()),
        other => match other.class() {
            Some(class) => Ok(class.name().to_string()),
            None => Err(type_mismatch(function, "class", "string", other)),
        },
    }
}

/// Reads a method name.
#[track_caller]
pub fn method_name_arg(value: &Value, function: &str) -> Result<String, Fault> {
    match value {
        Value::String(s) => Ok(s.clone()),
        other => Err(type_mismatch(function, "method", "string", other)),
    }
}

#[track_caller]
fn type_mismatch(function: &str, param: &str, expected: &str, given: &Value) -> Fault {
    Fault::type_error(format!(
        "{}(): Argument #1 (${}) must be of type {}, {} given",
        function,
        param,
        expected,
        given.type_name()
    ))
}

/// The callable held by a value, if it is directly invocable.
pub fn as_callable(value: &Value) -> Option<&Callable> {
    match value {
        Value::Callable(callable) => Some(callable),
        _ => None,
    }
}

/// What a value "produces" for the throwable predicates: the result of
/// invoking it when it is callable, otherwise the value itself. A raised fault
/// is produced as a value.
pub fn produce(value: &Value) -> Value {
    match as_callable(value) {
        Some(callable) => match callable.invoke() {
            Ok(v) => v,
            Err(fault) => Value::from(fault),
        },
        None => value.clone(),
    }
}
