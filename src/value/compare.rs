//! Loose (`==`) and strict (`===`) comparison.
//!
//! Loose comparison juggles types: numeric strings compare numerically with
//! numbers and with each other, booleans and null compare by truthiness, and
//! lists compare element-wise. Strict comparison never converts and compares
//! objects, callables and faults by identity.

use std::rc::Rc;

use once_cell::sync::Lazy;
use regex::Regex;

use super::{Value, ValueMap};

static NUMERIC_STRING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*[+-]?(\d+(\.\d*)?|\.\d+)([eE][+-]?\d+)?\s*$")
        .unwrap_or_else(|e| panic!("invalid numeric-string pattern: {e}"))
});

/// A number extracted from an `Int`, a `Float` or a numeric string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
        }
    }
}

/// Parses a string the way `is_numeric` accepts it.
///
/// ```rust
/// use assay::value::compare::{numeric_string, Number};
/// assert_eq!(numeric_string(" 12"), Some(Number::Int(12)));
/// assert_eq!(numeric_string("1e3"), Some(Number::Float(1000.0)));
/// assert_eq!(numeric_string("12abc"), None);
/// ```
pub fn numeric_string(s: &str) -> Option<Number> {
    if !NUMERIC_STRING.is_match(s) {
        return None;
    }
    let trimmed = s.trim();
    if let Ok(i) = trimmed.parse::<i64>() {
        return Some(Number::Int(i));
    }
    trimmed.parse::<f64>().ok().map(Number::Float)
}

fn numbers_equal(a: Number, b: Number) -> bool {
    match (a, b) {
        (Number::Int(x), Number::Int(y)) => x == y,
        _ => a.as_f64() == b.as_f64(),
    }
}

fn number_to_string(n: Number) -> String {
    match n {
        Number::Int(i) => i.to_string(),
        Number::Float(f) => Value::Float(f).to_string(),
    }
}

/// `a == b`
pub fn loose_eq(a: &Value, b: &Value) -> bool {
    use Value::*;
    match (a, b) {
        (Null, Null) => true,
        (Bool(x), other) | (other, Bool(x)) => *x == other.truthy(),
        (Null, String(s)) | (String(s), Null) => s.is_empty(),
        (Null, other) | (other, Null) => !other.truthy(),
        (String(x), String(y)) => match (numeric_string(x), numeric_string(y)) {
            (Some(nx), Some(ny)) => numbers_equal(nx, ny),
            _ => x == y,
        },
        (String(s), other) | (other, String(s)) => match other.as_number() {
            Some(n) => match numeric_string(s) {
                Some(ns) => numbers_equal(n, ns),
                None => number_to_string(n) == *s,
            },
            None => false,
        },
        (Int(_) | Float(_), Int(_) | Float(_)) => match (a.as_number(), b.as_number()) {
            (Some(x), Some(y)) => numbers_equal(x, y),
            _ => false,
        },
        (List(x), List(y)) => x.len() == y.len() && x.iter().zip(y).all(|(l, r)| loose_eq(l, r)),
        (Map(x), Map(y)) => maps_equal(x, y, loose_eq),
        (List(l), Map(m)) | (Map(m), List(l)) => maps_equal(&list_as_map(l), m, loose_eq),
        (Object(x), Object(y)) => {
            Rc::ptr_eq(x, y)
                || (x.class().name() == y.class().name()
                    && maps_equal(x.fields(), y.fields(), loose_eq))
        }
        (Fault(x), Fault(y)) => {
            Rc::ptr_eq(x, y) || (x.class_name() == y.class_name() && x.message() == y.message())
        }
        _ => strict_eq(a, b),
    }
}

/// `a === b`
pub fn strict_eq(a: &Value, b: &Value) -> bool {
    use Value::*;
    match (a, b) {
        (Null, Null) => true,
        (Bool(x), Bool(y)) => x == y,
        (Int(x), Int(y)) => x == y,
        (Float(x), Float(y)) => x == y,
        (String(x), String(y)) => x == y,
        (List(x), List(y)) => x.len() == y.len() && x.iter().zip(y).all(|(l, r)| strict_eq(l, r)),
        (Map(x), Map(y)) => maps_equal(x, y, strict_eq),
        (Object(x), Object(y)) => Rc::ptr_eq(x, y),
        (Callable(x), Callable(y)) => x.same_as(y),
        (Resource(x), Resource(y)) => x.id() == y.id(),
        (Fault(x), Fault(y)) => Rc::ptr_eq(x, y),
        _ => false,
    }
}

fn maps_equal(x: &ValueMap, y: &ValueMap, eq: fn(&Value, &Value) -> bool) -> bool {
    x.len() == y.len()
        && x.iter()
            .all(|(k, v)| y.get(k).is_some_and(|other| eq(v, other)))
}

fn list_as_map(items: &[Value]) -> ValueMap {
    items
        .iter()
        .enumerate()
        .map(|(i, v)| (i.to_string(), v.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn test_loose_juggling() {
        assert!(loose_eq(&Value::Int(1), &Value::from("1")));
        assert!(loose_eq(&Value::Int(1), &Value::Float(1.0)));
        assert!(loose_eq(&Value::from("1e1"), &Value::from("10")));
        assert!(loose_eq(&Value::Null, &Value::Bool(false)));
        assert!(loose_eq(&Value::Null, &Value::from("")));
        assert!(loose_eq(&Value::Null, &Value::Int(0)));
        assert!(!loose_eq(&Value::Null, &Value::from("0")));
        assert!(!loose_eq(&Value::Int(0), &Value::from("a")));
        assert!(loose_eq(&Value::Bool(true), &Value::from("a")));
    }

    #[test]
    fn test_strict_never_converts() {
        assert!(!strict_eq(&Value::Int(1), &Value::from("1")));
        assert!(!strict_eq(&Value::Int(1), &Value::Float(1.0)));
        assert!(strict_eq(&Value::from("a"), &Value::from("a")));
        assert!(!strict_eq(&Value::Float(f64::NAN), &Value::Float(f64::NAN)));
    }

    #[test]
    fn test_list_comparison() {
        let ints = Value::from(vec![Value::Int(1), Value::Int(2)]);
        let strings = Value::from(vec![Value::from("1"), Value::from("2")]);
        assert!(loose_eq(&ints, &strings));
        assert!(!strict_eq(&ints, &strings));
        assert!(strict_eq(&ints, &ints.clone()));
    }
}
