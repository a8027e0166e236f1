//! # Test Executor
//!
//! Drives one test method through `Idle -> Setup -> Invoking -> {Completed,
//! MethodFaulted}`:
//!
//! 1. the setup hook runs once;
//! 2. without parameter bindings the method is invoked once with no
//!    arguments; with bindings it is invoked once per index into the
//!    (equal-length) source sequences;
//! 3. with an expected exception, every invocation is followed by an
//!    `assertInstanceOf(type, raised)` outcome and, when something was raised
//!    and a message template is set, by `assertEquals(message, raised message)`;
//! 4. without one, a raised fault aborts the method: outcomes recorded so far
//!    stay, and a `MethodFaulted` event is emitted.
//!
//! Faults from the setup hook or a parameter source, and sources of unequal
//! length, fault the method whether or not an exception is expected. Output
//! capture is held for the whole method and released on every path.

use std::panic::Location;

use crate::fault::Fault;
use crate::runtime::dispatch::Dispatcher;
use crate::runtime::outcome::SourceLocation;
use crate::runtime::sink::{Capture, Event, MethodFault, NotificationSink};
use crate::testing::assertions::Assertions;
use crate::testing::class::TestInstance;
use crate::testing::metadata::TestMethodSpec;
use crate::testing::summary::{MethodCounters, MethodState, MethodSummary};
use crate::value::Value;

/// Names starting with `test` (`testFoo`, `test_foo`) are test methods.
pub fn is_test_method(name: &str) -> bool {
    name.starts_with("test")
}

pub struct TestExecutor<'a> {
    dispatcher: &'a Dispatcher,
    sink: &'a mut dyn NotificationSink,
}

impl<'a> TestExecutor<'a> {
    pub fn new(dispatcher: &'a Dispatcher, sink: &'a mut dyn NotificationSink) -> Self {
        Self { dispatcher, sink }
    }

    /// Runs every test method of `instance` accepted by `select`, in
    /// registration order.
    pub fn run_instance(
        &mut self,
        instance: &mut dyn TestInstance,
        select: impl Fn(&str) -> bool,
    ) -> Vec<MethodSummary> {
        instance
            .method_names()
            .into_iter()
            .filter(|name| is_test_method(name) && select(name.as_str()))
            .map(|name| self.run_method(instance, &name))
            .collect()
    }

    pub fn run_method(&mut self, instance: &mut dyn TestInstance, method: &str) -> MethodSummary {
        let class = instance.class_name().to_string();
        let spec = instance.spec(method);
        let params = instance.params(method);
        tracing::debug!(%class, %method, ?spec, "running method");

        self.sink.notify(&Event::MethodStarted {
            class: class.clone(),
            method: method.to_string(),
        });

        let mut run = MethodRun {
            state: MethodState::Idle,
            invocations: 0,
            counters: MethodCounters::default(),
        };
        {
            let mut capture = Capture::acquire(&mut *self.sink);
            let mut cx = Assertions::new(self.dispatcher, &mut *capture);

            match run.drive(instance, method, &spec, &params, &mut cx) {
                Ok(()) => run.state = MethodState::Completed,
                Err(fault) => {
                    tracing::warn!(%class, %method, %fault, "method faulted");
                    run.state = MethodState::MethodFaulted;
                    cx.notify(&Event::MethodFaulted(MethodFault {
                        class: class.clone(),
                        method: method.to_string(),
                        fault_class: fault.class_name().to_string(),
                        message: fault.message().to_string(),
                        location: fault.location().map(SourceLocation::from),
                    }));
                }
            }
            run.counters = cx.counters();
        }

        let summary = MethodSummary {
            class,
            method: method.to_string(),
            counters: run.counters,
            invocations: run.invocations,
            state: run.state,
        };
        self.sink.notify(&Event::MethodFinished(summary.clone()));
        summary
    }
}

struct MethodRun {
    state: MethodState,
    invocations: usize,
    counters: MethodCounters,
}

impl MethodRun {
    fn drive(
        &mut self,
        instance: &mut dyn TestInstance,
        method: &str,
        spec: &TestMethodSpec,
        params: &[String],
        cx: &mut Assertions<'_>,
    ) -> Result<(), Fault> {
        self.state = MethodState::Setup;
        Fault::catch(|| instance.setup())?;

        self.state = MethodState::Invoking;
        if spec.bindings.is_empty() {
            self.invocations += 1;
            return invoke_once(instance, method, spec, cx, &[], &[]);
        }

        let columns = resolve_sources(instance, method, spec)?;
        let rows = columns.first().map_or(0, |(_, values)| values.len());
        for i in 0..rows {
            let bound: Vec<(String, Value)> = columns
                .iter()
                .map(|(param, values)| (param.clone(), values[i].clone()))
                .collect();
            let args = positional_args(params, &bound);
            self.invocations += 1;
            tracing::trace!(%method, invocation = i, ?args, "invoking");
            invoke_once(instance, method, spec, cx, &args, &bound)?;
        }
        Ok(())
    }
}

/// Produces each bound parameter's values. Sources must agree on length.
fn resolve_sources(
    instance: &mut dyn TestInstance,
    method: &str,
    spec: &TestMethodSpec,
) -> Result<Vec<(String, Vec<Value>)>, Fault> {
    let mut columns = Vec::with_capacity(spec.bindings.len());
    for binding in &spec.bindings {
        let values = Fault::catch(|| instance.source(&binding.source))?;
        columns.push((binding.param.clone(), values));
    }

    let lengths: Vec<usize> = columns.iter().map(|(_, values)| values.len()).collect();
    if lengths.windows(2).any(|w| w[0] != w[1]) {
        let detail = columns
            .iter()
            .map(|(param, values)| format!("{}={}", param, values.len()))
            .collect::<Vec<_>>()
            .join(", ");
        return Err(Fault::value_error(format!(
            "Parameter sources of {} have different lengths: {}",
            method, detail
        )));
    }
    Ok(columns)
}

/// Arguments in declaration order, stopping at the first unbound parameter.
fn positional_args(params: &[String], bound: &[(String, Value)]) -> Vec<Value> {
    params
        .iter()
        .map_while(|param| {
            bound
                .iter()
                .find(|(name, _)| name == param)
                .map(|(_, value)| value.clone())
        })
        .collect()
}

fn invoke_once(
    instance: &mut dyn TestInstance,
    method: &str,
    spec: &TestMethodSpec,
    cx: &mut Assertions<'_>,
    args: &[Value],
    bound: &[(String, Value)],
) -> Result<(), Fault> {
    let result = Fault::catch(|| instance.invoke(method, cx, args));
    let Some(expected) = &spec.expected_exception else {
        return result;
    };

    let raised = result.err();
    let site = raised
        .as_ref()
        .and_then(Fault::location)
        .unwrap_or_else(|| Location::caller());
    let raised_value = raised.clone().map_or(Value::Null, Value::from);
    cx.call_at(
        "assertInstanceOf",
        vec![Value::from(expected.as_str()), raised_value],
        site,
    );

    if let (Some(fault), Some(message)) = (&raised, spec.render_message(bound)) {
        cx.call_at(
            "assertEquals",
            vec![Value::from(message), Value::from(fault.message())],
            site,
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::runtime::outcome::Status;
    use crate::runtime::sink::EventLog;
    use crate::testing::class::TestClass;
    use crate::values;

    #[test]
    fn test_positional_args_stop_at_first_gap() {
        let params = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let bound = vec![("a".to_string(), Value::Int(1)), ("c".to_string(), Value::Int(3))];
        assert_eq!(positional_args(&params, &bound), values![1]);
    }

    #[test]
    fn test_unequal_sources_fault_the_method() {
        let class = TestClass::new("PairTest", || Ok(()))
            .test_with("testPairs", &["a", "b"], |_, cx, args| {
                cx.assert_not("Null", vec![args[0].clone()]);
                Ok(())
            })
            .source("three", |_| Ok(values![1, 2, 3]))
            .source("two", |_| Ok(values![1, 2]))
            .spec(
                "testPairs",
                TestMethodSpec::new()
                    .throws("Exception")
                    .bind("a", "three")
                    .bind("b", "two"),
            );
        let dispatcher = Dispatcher::with_defaults().unwrap();
        let mut log = EventLog::new();
        let mut instance = class.instantiate().unwrap();
        let summary = TestExecutor::new(&dispatcher, &mut log).run_method(instance.as_mut(), "testPairs");

        assert_eq!(summary.state, MethodState::MethodFaulted);
        assert_eq!(summary.invocations, 0);
        assert_eq!(log.statuses(), [Status::MethodFaulted]);
        assert_eq!((log.captures, log.releases), (1, 1));
    }

    #[test]
    fn test_equal_sources_pair_by_index() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let record = Rc::clone(&seen);
        let class = TestClass::new("PairTest", || Ok(()))
            .test_with("testPairs", &["a", "b"], move |_, cx, args| {
                record.borrow_mut().push(format!("{}{}", args[0], args[1]));
                cx.assert_not("Null", vec![args[1].clone()]);
                Ok(())
            })
            .source("xs", |_| Ok(values!["x1", "x2"]))
            .source("ys", |_| Ok(values!["y1", "y2"]))
            .spec("testPairs", TestMethodSpec::new().bind("b", "ys").bind("a", "xs"));
        let dispatcher = Dispatcher::with_defaults().unwrap();
        let mut log = EventLog::new();
        let mut instance = class.instantiate().unwrap();
        let summary = TestExecutor::new(&dispatcher, &mut log).run_method(instance.as_mut(), "testPairs");

        assert_eq!(*seen.borrow(), ["x1y1", "x2y2"]);
        assert_eq!(summary.invocations, 2);
        assert_eq!(summary.counters.passed, 2);
        assert_eq!(summary.state, MethodState::Completed);
    }

    #[test]
    fn test_setup_fault_is_a_method_fault() {
        let class = TestClass::new("SetupTest", || Ok(()))
            .setup(|_| Err(Fault::runtime("no database")))
            .test("testNever", |_, cx| {
                cx.is_true(true);
                Ok(())
            });
        let dispatcher = Dispatcher::with_defaults().unwrap();
        let mut log = EventLog::new();
        let mut instance = class.instantiate().unwrap();
        let summary = TestExecutor::new(&dispatcher, &mut log).run_method(instance.as_mut(), "testNever");

        assert!(summary.faulted());
        assert_eq!(summary.counters, MethodCounters::default());
        match &log.events[1] {
            Event::MethodFaulted(fault) => {
                assert_eq!(fault.message, "no database");
                assert_eq!(fault.fault_class, "RuntimeException");
                assert!(fault.location.as_ref().is_some_and(|l| l.file.ends_with("executor.rs")));
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn test_expected_exception_not_raised_fails_instance_check() {
        let class = TestClass::new("QuietTest", || Ok(()))
            .test("testQuiet", |_, _| Ok(()))
            .spec("testQuiet", TestMethodSpec::new().throws("Exception").message("never"));
        let dispatcher = Dispatcher::with_defaults().unwrap();
        let mut log = EventLog::new();
        let mut instance = class.instantiate().unwrap();
        let summary = TestExecutor::new(&dispatcher, &mut log).run_method(instance.as_mut(), "testQuiet");

        assert_eq!(summary.state, MethodState::Completed);
        assert_eq!(summary.counters.failed, 1);
        assert_eq!(log.statuses(), [Status::Failed]);
    }

    #[test]
    fn test_run_instance_selects_test_methods() {
        let class = TestClass::new("SelectTest", || Ok(()))
            .test("testOne", |_, _| Ok(()))
            .test("helper", |_, _| Ok(()))
            .test("test_two", |_, _| Ok(()));
        let dispatcher = Dispatcher::with_defaults().unwrap();
        let mut log = EventLog::new();
        let mut instance = class.instantiate().unwrap();
        let ran: Vec<String> = TestExecutor::new(&dispatcher, &mut log)
            .run_instance(instance.as_mut(), |_| true)
            .into_iter()
            .map(|s| s.method)
            .collect();
        assert_eq!(ran, ["testOne", "test_two"]);
    }
}
