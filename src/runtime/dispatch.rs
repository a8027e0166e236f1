//! # Assertion Dispatcher
//!
//! Resolves an `assert...` call against the [`PredicateRegistry`], binds the
//! arguments, evaluates and classifies. Dispatch never fails: misuse and
//! evaluation faults are statuses like any other.
//!
//! 1. not starting with `assert`: `NotAnAssertionCall`
//! 2. `assertNot` is stripped before `assert`; the rest is the key
//! 3. unknown key: `UnknownAssertion`
//! 4. wrong argument count: `ArgumentCountMismatch`
//! 5. predicate raised (or panicked): `ExceptionDuringEvaluation`
//! 6. otherwise `Passed` or `Failed`, after negation
//!
//! The dispatcher itself has no side effects. Forwarding outcomes to the
//! run's sink is done by [`Assertions`](crate::testing::assertions::Assertions).

use std::panic::Location;

use crate::errors::Result;
use crate::fault::Fault;
use crate::predicates::PredicateRegistry;
use crate::runtime::outcome::{AssertionInvocation, AssertionOutcome, SourceLocation, Status};
use crate::runtime::registry::build_default_predicate_registry;
use crate::value::Value;

#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: PredicateRegistry,
}

impl Dispatcher {
    pub fn new(registry: PredicateRegistry) -> Self {
        Self { registry }
    }

    /// A dispatcher over every built-in assertion family.
    pub fn with_defaults() -> Result<Self> {
        Ok(Self::new(build_default_predicate_registry()?))
    }

    pub fn registry(&self) -> &PredicateRegistry {
        &self.registry
    }

    /// Dispatches a call, recording the caller as the assertion's location.
    ///
    /// ```rust
    /// use assay::runtime::{dispatch::Dispatcher, outcome::Status};
    /// use assay::values;
    /// let dispatcher = Dispatcher::with_defaults().unwrap();
    /// assert_eq!(dispatcher.dispatch("assertEquals", values![1, 1]).status, Status::Passed);
    /// assert_eq!(dispatcher.dispatch("assertNotEquals", values![1, 1]).status, Status::Failed);
    /// ```
    #[track_caller]
    pub fn dispatch(&self, called: &str, arguments: Vec<Value>) -> AssertionOutcome {
        self.dispatch_at(called, arguments, Location::caller())
    }

    pub fn dispatch_at(
        &self,
        called: &str,
        arguments: Vec<Value>,
        location: &Location<'_>,
    ) -> AssertionOutcome {
        let site = SourceLocation::from(location);

        let Some(call) = AssertionInvocation::parse(called, arguments) else {
            tracing::debug!(method = called, %site, "not an assertion call");
            return AssertionOutcome::new(Status::NotAnAssertionCall, site, called);
        };

        let Some(definition) = self.registry.lookup(&call.key) else {
            tracing::debug!(method = called, key = %call.key, "unknown assertion");
            return AssertionOutcome::new(Status::UnknownAssertion, site, called);
        };

        if call.arguments.len() != definition.arity() {
            tracing::debug!(
                method = called,
                expected = definition.arity(),
                supplied = call.arguments.len(),
                "argument count mismatch"
            );
            return AssertionOutcome::new(Status::ArgumentCountMismatch, site, called)
                .with_expected(definition.params());
        }

        match Fault::catch(|| definition.evaluate(&call.arguments)) {
            Err(fault) => {
                tracing::debug!(method = called, %fault, "predicate raised");
                AssertionOutcome::new(Status::ExceptionDuringEvaluation, site, called)
                    .with_message(fault.message())
            }
            Ok(value) if value != call.negate => {
                tracing::trace!(method = called, %site, "passed");
                AssertionOutcome::new(Status::Passed, site, called)
            }
            Ok(_) => {
                tracing::trace!(method = called, %site, "failed");
                AssertionOutcome::new(Status::Failed, site, called)
                    .with_expected(definition.params())
                    .with_arguments(call.arguments)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicates::{AssertionDefinition, PredicateFn};
    use crate::values;

    fn dispatcher() -> Dispatcher {
        Dispatcher::with_defaults().unwrap()
    }

    #[test]
    fn test_misuse_statuses() {
        let d = dispatcher();
        assert_eq!(d.dispatch("fooBar", values![1]).status, Status::NotAnAssertionCall);
        assert_eq!(d.dispatch("assertFoo", values![1]).status, Status::UnknownAssertion);
        let mismatch = d.dispatch("assertEquals", values![1]);
        assert_eq!(mismatch.status, Status::ArgumentCountMismatch);
        assert_eq!(
            mismatch.expected_params.as_deref(),
            Some(&["expected".to_string(), "returned".to_string()][..])
        );
        assert!(mismatch.arguments.is_none());
    }

    #[test]
    fn test_failed_outcome_carries_arguments() {
        let outcome = dispatcher().dispatch("assertEquals", values![1, 2]);
        assert_eq!(outcome.status, Status::Failed);
        assert_eq!(outcome.arguments, Some(values![1, 2]));
        assert_eq!(outcome.method, "assertEquals");
    }

    #[test]
    fn test_location_is_the_call_site() {
        let outcome = dispatcher().dispatch("assertTrue", values![true]);
        assert!(outcome.location.file.ends_with("dispatch.rs"));
        assert_eq!(outcome.location.line, line!() - 2);
    }

    #[test]
    fn test_evaluation_fault_is_contained() {
        const PANICS: PredicateFn = |_| panic!("predicate blew up");
        let mut registry = PredicateRegistry::new();
        registry
            .register(AssertionDefinition::inferred("Panics", "$value", PANICS))
            .unwrap();
        let d = Dispatcher::new(registry);
        for name in ["assertPanics", "assertNotPanics"] {
            let outcome = d.dispatch(name, values![1]);
            assert_eq!(outcome.status, Status::ExceptionDuringEvaluation);
            assert_eq!(outcome.message.as_deref(), Some("predicate blew up"));
        }
    }

    #[test]
    fn test_negation_inverts() {
        let d = dispatcher();
        assert_eq!(d.dispatch("assertNotNull", values![1]).status, Status::Passed);
        assert_eq!(d.dispatch("assertNotNull", values![Value::Null]).status, Status::Failed);
        assert_eq!(d.dispatch("assertNotSame", values![1, "1"]).status, Status::Passed);
    }
}
