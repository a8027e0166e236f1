//! # Predicate Registry
//!
//! The table of named assertion families. One [`AssertionDefinition`] yields
//! both `assert<Key>` and `assertNot<Key>`; the dispatcher negates the result,
//! so no family is ever written twice.
//!
//! ## Module Structure
//!
//! - **`helpers`**: argument coercions shared by all predicates
//! - **`equality`**: `Equals`, `Same`
//! - **`types`**: booleans, null, strings, arrays, scalars
//! - **`numeric`**: integer/float classification, `Zero`, `Nan`, `Finite`
//! - **`objects`**: callables, objects, resources, class membership
//! - **`filesystem`**: `Dir`, `File`, `Link`, `Readable`, `Writable`, ...
//! - **`throwable`**: exception classification and the `RaiseException` sentinel
//!
//! ## Parameters
//!
//! A definition's parameters are either inferred from its expression text
//! (every distinct `$name`, in first-occurrence order) or listed explicitly
//! when the binding order must differ from the expression, as in
//! `InstanceOf(class, object)`. The parameter count is the only arity contract
//! the dispatcher checks; values are never type-checked before evaluation.

use std::fmt;

use im::HashMap;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{AssayError, Result};
use crate::fault::Fault;
use crate::value::Value;

// ============================================================================
// CORE TYPES
// ============================================================================

/// A predicate over bound parameters. Raising a fault is how a predicate
/// reports that it could not be evaluated.
pub type PredicateFn = fn(args: &Bindings) -> Result<bool, Fault>;

static PARAM_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$(\w+)").unwrap_or_else(|e| panic!("invalid parameter pattern: {e}"))
});

/// Arguments bound positionally to a definition's parameter names.
pub struct Bindings<'a> {
    params: &'a [String],
    values: &'a [Value],
}

impl<'a> Bindings<'a> {
    pub fn new(params: &'a [String], values: &'a [Value]) -> Self {
        Self { params, values }
    }

    /// The value bound to `name`.
    #[track_caller]
    pub fn get(&self, name: &str) -> Result<&'a Value, Fault> {
        self.params
            .iter()
            .position(|p| p == name)
            .and_then(|i| self.values.get(i))
            .ok_or_else(|| Fault::error(format!("Undefined variable ${}", name)))
    }
}

/// One assertion family.
#[derive(Clone)]
pub struct AssertionDefinition {
    name: String,
    expression: String,
    params: Vec<String>,
    predicate: PredicateFn,
}

impl AssertionDefinition {
    /// Parameters are taken from the `$name` markers in `expression`.
    ///
    /// ```rust
    /// use assay::predicates::AssertionDefinition;
    /// let def = AssertionDefinition::inferred(
    ///     "Method",
    ///     "is_object($object) && method_exists($object, $method_name)",
    ///     |_| Ok(true),
    /// );
    /// assert_eq!(def.params(), ["object", "method_name"]);
    /// ```
    pub fn inferred(name: &str, expression: &str, predicate: PredicateFn) -> Self {
        let mut params: Vec<String> = Vec::new();
        for cap in PARAM_MARKER.captures_iter(expression) {
            let param = &cap[1];
            if !params.iter().any(|p| p == param) {
                params.push(param.to_string());
            }
        }
        Self {
            name: name.to_string(),
            expression: expression.to_string(),
            params,
            predicate,
        }
    }

    /// Parameters are listed in binding order.
    pub fn explicit(name: &str, params: &[&str], expression: &str, predicate: PredicateFn) -> Self {
        Self {
            name: name.to_string(),
            expression: expression.to_string(),
            params: params.iter().map(|p| p.to_string()).collect(),
            predicate,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Evaluates the predicate. The caller has already matched the arity.
    pub fn evaluate(&self, args: &[Value]) -> Result<bool, Fault> {
        (self.predicate)(&Bindings::new(&self.params, args))
    }
}

impl fmt::Debug for AssertionDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssertionDefinition")
            .field("name", &self.name)
            .field("expression", &self.expression)
            .field("params", &self.params)
            .finish()
    }
}

/// Mapping from assertion key to definition.
#[derive(Debug, Default, Clone)]
pub struct PredicateRegistry {
    definitions: HashMap<String, AssertionDefinition>,
}

impl PredicateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a definition. Keys are unique.
    pub fn register(&mut self, definition: AssertionDefinition) -> Result<()> {
        if self.definitions.contains_key(definition.name()) {
            return Err(AssayError::DuplicateAssertion {
                name: definition.name().to_string(),
            });
        }
        self.definitions
            .insert(definition.name().to_string(), definition);
        Ok(())
    }

    /// Case-sensitive lookup by key.
    pub fn lookup(&self, name: &str) -> Option<&AssertionDefinition> {
        self.definitions.get(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    /// All keys, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.definitions.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

// ============================================================================
// PREDICATE FAMILIES
// ============================================================================

pub mod helpers;

pub mod equality;
pub mod filesystem;
pub mod numeric;
pub mod objects;
pub mod throwable;
pub mod types;

/// Registers every built-in family.
pub fn register_all_predicates(registry: &mut PredicateRegistry) -> Result<()> {
    equality::register_equality_predicates(registry)?;
    throwable::register_throwable_predicates(registry)?;
    objects::register_object_predicates(registry)?;
    types::register_type_predicates(registry)?;
    numeric::register_numeric_predicates(registry)?;
    filesystem::register_filesystem_predicates(registry)?;
    throwable::register_sentinel_predicates(registry)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALWAYS: PredicateFn = |_| Ok(true);

    #[test]
    fn test_inferred_params_dedup_in_order() {
        let def = AssertionDefinition::inferred("X", "$b == $a || $b === $c", ALWAYS);
        assert_eq!(def.params(), ["b", "a", "c"]);
        assert_eq!(def.arity(), 3);
    }

    #[test]
    fn test_explicit_params_keep_order() {
        let def = AssertionDefinition::explicit(
            "InstanceOf",
            &["class", "object"],
            "is_a($object, $class)",
            ALWAYS,
        );
        assert_eq!(def.params(), ["class", "object"]);
    }

    #[test]
    fn test_registry_rejects_duplicates() {
        let mut registry = PredicateRegistry::new();
        registry
            .register(AssertionDefinition::inferred("Null", "is_null($value)", ALWAYS))
            .unwrap();
        let err = registry
            .register(AssertionDefinition::inferred("Null", "$value === null", ALWAYS))
            .unwrap_err();
        assert!(matches!(err, AssayError::DuplicateAssertion { name } if name == "Null"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let mut registry = PredicateRegistry::new();
        register_all_predicates(&mut registry).unwrap();
        assert!(registry.lookup("Equals").is_some());
        assert!(registry.lookup("equals").is_none());
        assert!(registry.has("ArrayHasKey"));
    }

    #[test]
    fn test_bindings_lookup() {
        let params = vec!["expected".to_string(), "returned".to_string()];
        let values = vec![Value::Int(1), Value::Int(2)];
        let bindings = Bindings::new(&params, &values);
        assert_eq!(bindings.get("returned").unwrap(), &Value::Int(2));
        assert!(bindings.get("missing").is_err());
    }
}
