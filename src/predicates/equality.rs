//! Equality predicates.
//!
//! ## Predicates Provided
//!
//! - **`Equals`**: loose equality, `1 == "1"` holds
//! - **`Same`**: strict equality, same type and value, identity for objects

use crate::errors::Result;
use crate::predicates::{AssertionDefinition, PredicateFn, PredicateRegistry};

/// Loose equality.
///
/// Usage: assertEquals(expected, returned)
///
/// Example:
///   assertEquals(1, "1")    ; => passes
///   assertNotEquals(1, 2)   ; => passes
pub const PRED_EQUALS: PredicateFn = |b| Ok(b.get("expected")?.loose_eq(b.get("returned")?));

/// Strict equality.
///
/// Usage: assertSame(expected, returned)
///
/// Example:
///   assertSame(1, 1)        ; => passes
///   assertSame(1, "1")      ; => fails
pub const PRED_SAME: PredicateFn = |b| Ok(b.get("expected")?.strict_eq(b.get("returned")?));

pub fn register_equality_predicates(registry: &mut PredicateRegistry) -> Result<()> {
    registry.register(AssertionDefinition::inferred(
        "Equals",
        "$expected == $returned",
        PRED_EQUALS,
    ))?;
    registry.register(AssertionDefinition::inferred(
        "Same",
        "$expected === $returned",
        PRED_SAME,
    ))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values;

    fn eval(pred: PredicateFn, args: Vec<crate::value::Value>) -> bool {
        let def = AssertionDefinition::inferred("T", "$expected $returned", pred);
        def.evaluate(&args).unwrap()
    }

    #[test]
    fn test_equals_is_loose() {
        assert!(eval(PRED_EQUALS, values![1, "1"]));
        assert!(eval(PRED_EQUALS, values![0, false]));
        assert!(!eval(PRED_EQUALS, values![1, 2]));
    }

    #[test]
    fn test_same_is_strict() {
        assert!(eval(PRED_SAME, values!["a", "a"]));
        assert!(!eval(PRED_SAME, values![1, "1"]));
        assert!(!eval(PRED_SAME, values![1, 1.0]));
    }
}
