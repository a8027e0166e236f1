//! Throwable classification and the `RaiseException` sentinel.
//!
//! ## Predicates Provided
//!
//! - **`Throwable`, `Exception`, `Error`**: what the callable produces (its
//!   return value, or the fault it raises) is of the named class. A
//!   non-callable value is classified directly.
//! - **`Thrown`, `ThrownException`, `ThrownError`**: invoking the callable
//!   raises a fault of the named class. Returning normally fails.
//! - **`RaiseException`**: invokes the callable and passes its result through
//!   truthiness. Any fault it raises surfaces as an evaluation fault, which is
//!   what the family exists for.

use crate::errors::Result;
use crate::fault::Fault;
use crate::predicates::{
    helpers::{as_callable, produce},
    AssertionDefinition, Bindings, PredicateFn, PredicateRegistry,
};

fn is_throwable(b: &Bindings, class: &str) -> Result<bool, Fault> {
    Ok(produce(b.get("callable")?).is_a(class))
}

fn is_thrown(b: &Bindings, class: &str) -> Result<bool, Fault> {
    match as_callable(b.get("callable")?) {
        Some(callable) => Ok(callable.invoke().is_err_and(|fault| fault.is_a(class))),
        None => Ok(false),
    }
}

/// Usage: assertThrowable(callable)
///
/// Example:
///   assertThrowable(fn() => throw new Exception)   ; => passes
///   assertThrowable(new TypeError)                 ; => passes
///   assertThrowable(fn() => 1)                     ; => fails
pub const PRED_THROWABLE: PredicateFn = |b| is_throwable(b, "Throwable");

pub const PRED_EXCEPTION: PredicateFn = |b| is_throwable(b, "Exception");

pub const PRED_ERROR: PredicateFn = |b| is_throwable(b, "Error");

/// Usage: assertThrown(callable)
pub const PRED_THROWN: PredicateFn = |b| is_thrown(b, "Throwable");

pub const PRED_THROWN_EXCEPTION: PredicateFn = |b| is_thrown(b, "Exception");

pub const PRED_THROWN_ERROR: PredicateFn = |b| is_thrown(b, "Error");

/// Usage: assertRaiseException(callable)
pub const PRED_RAISE_EXCEPTION: PredicateFn = |b| {
    let target = b.get("callable")?;
    match as_callable(target) {
        Some(callable) => Ok(callable.invoke()?.truthy()),
        None => Err(Fault::error(format!(
            "Value not callable: {}",
            target.type_name()
        ))),
    }
};

pub fn register_throwable_predicates(registry: &mut PredicateRegistry) -> Result<()> {
    registry.register(AssertionDefinition::inferred(
        "Throwable",
        "is_throwable($callable)",
        PRED_THROWABLE,
    ))?;
    registry.register(AssertionDefinition::inferred(
        "Exception",
        "is_throwable($callable, \"Exception\")",
        PRED_EXCEPTION,
    ))?;
    registry.register(AssertionDefinition::inferred(
        "Error",
        "is_throwable($callable, \"Error\")",
        PRED_ERROR,
    ))?;

    registry.register(AssertionDefinition::inferred(
        "Thrown",
        "is_thrown($callable)",
        PRED_THROWN,
    ))?;
    registry.register(AssertionDefinition::inferred(
        "ThrownException",
        "is_thrown($callable, \"Exception\")",
        PRED_THROWN_EXCEPTION,
    ))?;
    registry.register(AssertionDefinition::inferred(
        "ThrownError",
        "is_thrown($callable, \"Error\")",
        PRED_THROWN_ERROR,
    ))?;
    Ok(())
}

/// Registers the families whose only purpose is to surface evaluation faults.
pub fn register_sentinel_predicates(registry: &mut PredicateRegistry) -> Result<()> {
    registry.register(AssertionDefinition::inferred(
        "RaiseException",
        "$callable()",
        PRED_RAISE_EXCEPTION,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Callable, Value};

    fn eval(pred: PredicateFn, value: Value) -> Result<bool, Fault> {
        AssertionDefinition::inferred("T", "$callable", pred).evaluate(&[value])
    }

    fn raising(fault: fn() -> Fault) -> Value {
        Value::from(Callable::new("raising", move || Err(fault())))
    }

    #[test]
    fn test_throwable_classifies_raised_and_returned_values() {
        assert!(eval(PRED_THROWABLE, raising(|| Fault::exception("e"))).unwrap());
        assert!(eval(PRED_EXCEPTION, raising(|| Fault::runtime("e"))).unwrap());
        assert!(!eval(PRED_EXCEPTION, raising(|| Fault::type_error("e"))).unwrap());
        assert!(eval(PRED_ERROR, Value::from(Fault::type_error("e"))).unwrap());

        let returns_fault = Callable::new("factory", || Ok(Value::from(Fault::exception("e"))));
        assert!(eval(PRED_EXCEPTION, returns_fault.into()).unwrap());
        assert!(!eval(PRED_THROWABLE, Value::Int(1)).unwrap());
    }

    #[test]
    fn test_thrown_requires_raising() {
        assert!(eval(PRED_THROWN, raising(|| Fault::error("e"))).unwrap());
        assert!(eval(PRED_THROWN_ERROR, raising(|| Fault::argument_count("e"))).unwrap());
        assert!(!eval(PRED_THROWN_EXCEPTION, raising(|| Fault::error("e"))).unwrap());

        let returns_fault = Callable::new("factory", || Ok(Value::from(Fault::exception("e"))));
        assert!(!eval(PRED_THROWN, returns_fault.into()).unwrap());
        assert!(!eval(PRED_THROWN, Value::from(Fault::exception("e"))).unwrap());
    }

    #[test]
    fn test_panicking_callable_counts_as_error() {
        let panics = Callable::new("panics", || panic!("bad state"));
        assert!(eval(PRED_THROWN_ERROR, panics.into()).unwrap());
    }

    #[test]
    fn test_raise_exception_surfaces_faults() {
        let fault = eval(PRED_RAISE_EXCEPTION, raising(|| Fault::exception("boom"))).unwrap_err();
        assert_eq!(fault.message(), "boom");
        assert!(eval(PRED_RAISE_EXCEPTION, Value::Int(1)).is_err());
        let truthy = Callable::new("one", || Ok(Value::Int(1)));
        assert!(eval(PRED_RAISE_EXCEPTION, truthy.into()).unwrap());
    }
}
