//! Canonical construction of the predicate registry.
//!
//! ## Usage
//! ```rust
//! use assay::runtime::registry::build_default_predicate_registry;
//! let registry = build_default_predicate_registry().unwrap();
//! assert!(registry.has("Equals"));
//! assert!(registry.has("RaiseException"));
//! ```
//!
//! The registry is built once at the entry point and handed to the
//! [`Dispatcher`](crate::runtime::dispatch::Dispatcher); nothing else builds a
//! private copy.

use crate::errors::Result;
use crate::predicates::{self, PredicateRegistry};

/// Builds a registry holding every built-in assertion family.
#[inline]
pub fn build_default_predicate_registry() -> Result<PredicateRegistry> {
    let mut registry = PredicateRegistry::new();
    predicates::register_all_predicates(&mut registry)?;
    tracing::debug!(families = registry.len(), "built predicate registry");
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_is_complete() {
        let registry = build_default_predicate_registry().unwrap();
        let expected = [
            "Equals", "Same", "Throwable", "Exception", "Error", "Thrown", "ThrownException",
            "ThrownError", "Callable", "InstanceOf", "Implements", "Object", "Resource",
            "SubclassOf", "Method", "Bool", "False", "True", "Zero", "Double", "Finite", "Float",
            "Infinite", "Int", "Integer", "Long", "Nan", "Null", "Numeric", "Real", "Scalar",
            "Array", "ArrayHasKey", "String", "Empty", "Dir", "Executable", "File", "Link",
            "Readable", "Writable", "Writeable", "RaiseException",
        ];
        for name in expected {
            assert!(registry.has(name), "missing {name}");
        }
        assert_eq!(registry.len(), expected.len());
    }

    #[test]
    fn test_arity_table() {
        let registry = build_default_predicate_registry().unwrap();
        let arity = |name: &str| registry.lookup(name).map(|d| d.arity());
        assert_eq!(arity("Equals"), Some(2));
        assert_eq!(arity("InstanceOf"), Some(2));
        assert_eq!(arity("Method"), Some(2));
        assert_eq!(arity("ArrayHasKey"), Some(2));
        assert_eq!(arity("Null"), Some(1));
        assert_eq!(arity("RaiseException"), Some(1));
    }
}
