//! Type-membership predicates for non-numeric values.
//!
//! ## Predicates Provided
//!
//! - **Booleans**: `Bool`, `True`, `False`
//! - **Others**: `Null`, `String`, `Scalar`, `Empty`
//! - **Arrays**: `Array`, `ArrayHasKey`
//!
//! Lists and maps are both arrays. `True` and `False` are strict: `1` is not
//! `true`.

use crate::errors::Result;
use crate::fault::Fault;
use crate::predicates::{AssertionDefinition, PredicateFn, PredicateRegistry};
use crate::value::Value;

pub const PRED_BOOL: PredicateFn = |b| Ok(matches!(b.get("value")?, Value::Bool(_)));

pub const PRED_TRUE: PredicateFn = |b| Ok(matches!(b.get("value")?, Value::Bool(true)));

pub const PRED_FALSE: PredicateFn = |b| Ok(matches!(b.get("value")?, Value::Bool(false)));

pub const PRED_NULL: PredicateFn = |b| Ok(b.get("value")?.is_null());

pub const PRED_STRING: PredicateFn = |b| Ok(matches!(b.get("value")?, Value::String(_)));

pub const PRED_SCALAR: PredicateFn = |b| Ok(b.get("value")?.is_scalar());

/// Holds for `""`, an empty array or null; `0` and `"0"` are not empty here.
pub const PRED_EMPTY: PredicateFn = |b| {
    Ok(match b.get("value")? {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::List(items) => items.is_empty(),
        Value::Map(map) => map.is_empty(),
        _ => false,
    })
};

pub const PRED_ARRAY: PredicateFn =
    |b| Ok(matches!(b.get("value")?, Value::List(_) | Value::Map(_)));

/// True if `array` is an array holding `key`.
///
/// Usage: assertArrayHasKey(array, key)
///
/// Example:
///   assertArrayHasKey(["a" => 1], "a")   ; => passes
///   assertArrayHasKey([10, 20], 1)       ; => passes
///   assertArrayHasKey("abc", 0)          ; => fails, not an array
pub const PRED_ARRAY_HAS_KEY: PredicateFn = |b| {
    let key = b.get("key")?;
    match b.get("array")? {
        Value::List(items) => Ok(array_key(key)?
            .parse::<usize>()
            .is_ok_and(|i| i < items.len())),
        Value::Map(map) => Ok(map.contains_key(&array_key(key)?)),
        _ => Ok(false),
    }
};

/// Normalises an array key to its string form.
#[track_caller]
fn array_key(key: &Value) -> Result<String, Fault> {
    match key {
        Value::Null => Ok(String::new()),
        Value::Bool(flag) => Ok(if *flag { "1" } else { "0" }.to_string()),
        Value::Int(i) => Ok(i.to_string()),
        Value::Float(f) => Ok((f.trunc() as i64).to_string()),
        Value::String(s) => Ok(s.clone()),
        other => Err(Fault::type_error(format!(
            "Illegal offset type: {}",
            other.type_name()
        ))),
    }
}

pub fn register_type_predicates(registry: &mut PredicateRegistry) -> Result<()> {
    // boolean
    registry.register(AssertionDefinition::inferred("Bool", "is_bool($value)", PRED_BOOL))?;
    registry.register(AssertionDefinition::inferred("False", "$value === false", PRED_FALSE))?;
    registry.register(AssertionDefinition::inferred("True", "$value === true", PRED_TRUE))?;

    // other variable types
    registry.register(AssertionDefinition::inferred("Null", "is_null($value)", PRED_NULL))?;
    registry.register(AssertionDefinition::inferred("Scalar", "is_scalar($value)", PRED_SCALAR))?;
    registry.register(AssertionDefinition::inferred("Array", "is_array($value)", PRED_ARRAY))?;
    registry.register(AssertionDefinition::inferred(
        "ArrayHasKey",
        "is_array($array) && array_key_exists($key, $array)",
        PRED_ARRAY_HAS_KEY,
    ))?;
    registry.register(AssertionDefinition::inferred("String", "is_string($value)", PRED_STRING))?;
    registry.register(AssertionDefinition::inferred(
        "Empty",
        "$value === \"\" || $value === [] || $value === null",
        PRED_EMPTY,
    ))?;
    Ok(())
}
