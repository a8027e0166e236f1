//! The assertion handle test bodies receive.
//!
//! [`Assertions`] is the only way test code reaches the dispatcher. Every call
//! is classified, counted for the running method and forwarded to the run's
//! sink; the returned [`Status`] is informational and test bodies usually
//! ignore it.
//!
//! ```rust,ignore
//! cx.call("assertEquals", values![1, one()]);
//! cx.assert("InstanceOf", values!["Exception", err]);
//! cx.assert_not("Null", values![value]);
//! ```

use std::panic::Location;

use crate::runtime::dispatch::Dispatcher;
use crate::runtime::outcome::Status;
use crate::runtime::sink::{Event, NotificationSink};
use crate::testing::summary::MethodCounters;
use crate::value::Value;

pub struct Assertions<'a> {
    dispatcher: &'a Dispatcher,
    sink: &'a mut dyn NotificationSink,
    counters: MethodCounters,
}

impl<'a> Assertions<'a> {
    pub fn new(dispatcher: &'a Dispatcher, sink: &'a mut dyn NotificationSink) -> Self {
        Self {
            dispatcher,
            sink,
            counters: MethodCounters::default(),
        }
    }

    /// Dispatches a call by its full name, e.g. `"assertNotEquals"`.
    #[track_caller]
    pub fn call(&mut self, called: &str, arguments: Vec<Value>) -> Status {
        self.call_at(called, arguments, Location::caller())
    }

    /// `assert<key>`
    #[track_caller]
    pub fn assert(&mut self, key: &str, arguments: Vec<Value>) -> Status {
        self.call_at(&format!("assert{key}"), arguments, Location::caller())
    }

    /// `assertNot<key>`
    #[track_caller]
    pub fn assert_not(&mut self, key: &str, arguments: Vec<Value>) -> Status {
        self.call_at(&format!("assertNot{key}"), arguments, Location::caller())
    }

    #[track_caller]
    pub fn equals(&mut self, expected: impl Into<Value>, returned: impl Into<Value>) -> Status {
        let args = vec![expected.into(), returned.into()];
        self.call_at("assertEquals", args, Location::caller())
    }

    #[track_caller]
    pub fn same(&mut self, expected: impl Into<Value>, returned: impl Into<Value>) -> Status {
        let args = vec![expected.into(), returned.into()];
        self.call_at("assertSame", args, Location::caller())
    }

    #[track_caller]
    pub fn is_true(&mut self, value: impl Into<Value>) -> Status {
        self.call_at("assertTrue", vec![value.into()], Location::caller())
    }

    #[track_caller]
    pub fn is_false(&mut self, value: impl Into<Value>) -> Status {
        self.call_at("assertFalse", vec![value.into()], Location::caller())
    }

    /// Dispatches with an explicit call site.
    pub fn call_at(&mut self, called: &str, arguments: Vec<Value>, location: &Location<'_>) -> Status {
        let outcome = self.dispatcher.dispatch_at(called, arguments, location);
        let status = outcome.status;
        self.counters.record(status);
        self.sink.notify(&Event::Assertion(outcome));
        status
    }

    /// Counts recorded so far for the running method.
    pub fn counters(&self) -> MethodCounters {
        self.counters
    }

    pub(crate) fn notify(&mut self, event: &Event) {
        self.sink.notify(event);
    }
}
