//! Numeric predicates.
//!
//! ## Predicates Provided
//!
//! - **Integers**: `Int`, `Integer`, `Long`
//! - **Floats**: `Float`, `Double`, `Real`
//! - **Classification**: `Finite`, `Infinite`, `Nan` (raise on non-numbers)
//! - **Other**: `Zero`, `Numeric`

use crate::errors::Result;
use crate::predicates::{helpers::float_arg, AssertionDefinition, PredicateFn, PredicateRegistry};
use crate::value::Value;

/// Holds only for the integer `0` and the float `0.0`.
pub const PRED_ZERO: PredicateFn = |b| {
    Ok(match b.get("value")? {
        Value::Int(i) => *i == 0,
        Value::Float(f) => *f == 0.0,
        _ => false,
    })
};

pub const PRED_INT: PredicateFn = |b| Ok(matches!(b.get("value")?, Value::Int(_)));

pub const PRED_FLOAT: PredicateFn = |b| Ok(matches!(b.get("value")?, Value::Float(_)));

/// Numbers and numeric strings such as `"1e3"` or `" 12"`.
pub const PRED_NUMERIC: PredicateFn = |b| Ok(b.get("value")?.is_numeric());

/// Usage: assertFinite(value)
///
/// Raises a `TypeError` when `value` is not a number or numeric string.
pub const PRED_FINITE: PredicateFn = |b| Ok(float_arg(b.get("value")?, "is_finite")?.is_finite());

pub const PRED_INFINITE: PredicateFn =
    |b| Ok(float_arg(b.get("value")?, "is_infinite")?.is_infinite());

pub const PRED_NAN: PredicateFn = |b| Ok(float_arg(b.get("value")?, "is_nan")?.is_nan());

pub fn register_numeric_predicates(registry: &mut PredicateRegistry) -> Result<()> {
    registry.register(AssertionDefinition::inferred(
        "Zero",
        "$value === 0 || $value === 0.0",
        PRED_ZERO,
    ))?;

    registry.register(AssertionDefinition::inferred("Double", "is_double($value)", PRED_FLOAT))?;
    registry.register(AssertionDefinition::inferred("Float", "is_float($value)", PRED_FLOAT))?;
    registry.register(AssertionDefinition::inferred("Real", "is_real($value)", PRED_FLOAT))?;

    registry.register(AssertionDefinition::inferred("Int", "is_int($value)", PRED_INT))?;
    registry.register(AssertionDefinition::inferred("Integer", "is_int($value)", PRED_INT))?;
    registry.register(AssertionDefinition::inferred("Long", "is_long($value)", PRED_INT))?;

    registry.register(AssertionDefinition::inferred("Finite", "is_finite($value)", PRED_FINITE))?;
    registry.register(AssertionDefinition::inferred(
        "Infinite",
        "is_infinite($value)",
        PRED_INFINITE,
    ))?;
    registry.register(AssertionDefinition::inferred("Nan", "is_nan($value)", PRED_NAN))?;
    registry.register(AssertionDefinition::inferred("Numeric", "is_numeric($value)", PRED_NUMERIC))?;
    Ok(())
}
