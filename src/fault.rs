//! # Faults
//!
//! A [`Fault`] is a raised value: what a test body, a setup hook, a parameter
//! source or a user callable returns in its `Err` arm. Every fault carries a
//! class from [`crate::value::class`] so the executor and the throwable
//! predicates can classify it, and the location where it was constructed.
//!
//! [`Fault::catch`] is the single place where panics from user code are turned
//! into faults; the dispatcher, the executor and the file runner all contain
//! user code through it.

use std::any::Any;
use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe, Location};
use std::sync::{Arc, Once};

use thiserror::Error;

use crate::value::class::{
    self, Class, ARGUMENT_COUNT_ERROR, ERROR, EXCEPTION, RUNTIME_EXCEPTION, TYPE_ERROR,
    VALUE_ERROR,
};

thread_local! {
    static CONTAINING: Cell<usize> = const { Cell::new(0) };
}

/// Where a fault was raised or an assertion was called.
pub type CallSite = &'static Location<'static>;

/// A raised value with a class, a message and an optional origin.
#[derive(Debug, Clone, Error)]
#[error("{}: {}", .class.name(), .message)]
pub struct Fault {
    class: Arc<Class>,
    message: String,
    location: Option<CallSite>,
}

impl Fault {
    #[track_caller]
    pub fn new(class: &Arc<Class>, message: impl Into<String>) -> Self {
        Self {
            class: Arc::clone(class),
            message: message.into(),
            location: Some(Location::caller()),
        }
    }

    /// Raises an instance of a built-in class by name, falling back to
    /// `Exception` for names that are not built in.
    #[track_caller]
    pub fn named(class_name: &str, message: impl Into<String>) -> Self {
        let class = class::builtin(class_name).unwrap_or_else(|| Arc::clone(&EXCEPTION));
        Self::new(&class, message)
    }

    #[track_caller]
    pub fn exception(message: impl Into<String>) -> Self {
        Self::new(&EXCEPTION, message)
    }

    #[track_caller]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(&ERROR, message)
    }

    #[track_caller]
    pub fn type_error(message: impl Into<String>) -> Self {
        Self::new(&TYPE_ERROR, message)
    }

    #[track_caller]
    pub fn value_error(message: impl Into<String>) -> Self {
        Self::new(&VALUE_ERROR, message)
    }

    #[track_caller]
    pub fn argument_count(message: impl Into<String>) -> Self {
        Self::new(&ARGUMENT_COUNT_ERROR, message)
    }

    #[track_caller]
    pub fn runtime(message: impl Into<String>) -> Self {
        Self::new(&RUNTIME_EXCEPTION, message)
    }

    /// Replaces the recorded origin.
    pub fn at(mut self, location: CallSite) -> Self {
        self.location = Some(location);
        self
    }

    pub fn class(&self) -> &Arc<Class> {
        &self.class
    }

    pub fn class_name(&self) -> &str {
        self.class.name()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn location(&self) -> Option<CallSite> {
        self.location
    }

    pub fn is_a(&self, class_name: &str) -> bool {
        self.class.is_a(class_name)
    }

    /// Runs user code, converting a panic into an `Error` fault.
    pub fn catch<T>(f: impl FnOnce() -> Result<T, Fault>) -> Result<T, Fault> {
        CONTAINING.with(|depth| depth.set(depth.get() + 1));
        let caught = panic::catch_unwind(AssertUnwindSafe(f));
        CONTAINING.with(|depth| depth.set(depth.get() - 1));
        match caught {
            Ok(result) => result,
            Err(payload) => Err(Self::from_panic(payload.as_ref())),
        }
    }

    /// Sends panics raised inside [`Fault::catch`] to the log at debug level
    /// instead of stderr. Panics anywhere else still reach the previous hook.
    /// Installed once per process.
    pub fn quiet_contained_panics() {
        static INSTALL: Once = Once::new();
        INSTALL.call_once(|| {
            let previous = panic::take_hook();
            panic::set_hook(Box::new(move |info| {
                if Self::containing() {
                    tracing::debug!(panic = %info, "contained panic");
                } else {
                    previous(info);
                }
            }));
        });
    }

    /// Whether the current thread is inside [`Fault::catch`].
    pub fn containing() -> bool {
        CONTAINING.with(|depth| depth.get() > 0)
    }

    fn from_panic(payload: &(dyn Any + Send)) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "panic with a non-string payload".to_string()
        };
        Self {
            class: Arc::clone(&ERROR),
            message,
            location: None,
        }
    }
}
