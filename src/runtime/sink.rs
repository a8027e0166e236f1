//! # Notification sinks
//!
//! Everything the engine reports goes through one [`NotificationSink`] per
//! run: assertion outcomes, method and file lifecycle events. The console
//! reporter is one sink; [`EventLog`] collects events for inspection and
//! [`NullSink`] drops them.
//!
//! Progress output is captured per method. [`Capture`] acquires the capture
//! when created and releases it when dropped, so it is released on every exit
//! path of a method run.

use std::ops::{Deref, DerefMut};

use crate::runtime::outcome::{AssertionOutcome, SourceLocation, Status};
use crate::testing::summary::{FileSummary, MethodSummary};

/// A method that raised outside of an expected-exception contract.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodFault {
    pub class: String,
    pub method: String,
    pub fault_class: String,
    pub message: String,
    pub location: Option<SourceLocation>,
}

/// A file that could not be loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct FileFault {
    pub path: String,
    pub message: String,
    pub location: Option<SourceLocation>,
}

#[derive(Debug, Clone)]
pub enum Event {
    FileStarted { path: String },
    FileSkipped(FileFault),
    FileFinished(FileSummary),
    MethodStarted { class: String, method: String },
    Assertion(AssertionOutcome),
    MethodFaulted(MethodFault),
    MethodFinished(MethodSummary),
}

impl Event {
    /// The status carried by outcome events; `None` for pure lifecycle events.
    pub fn status(&self) -> Option<Status> {
        match self {
            Event::Assertion(outcome) => Some(outcome.status),
            Event::MethodFaulted(_) => Some(Status::MethodFaulted),
            Event::FileSkipped(_) => Some(Status::FileSkipped),
            _ => None,
        }
    }
}

/// Receives every event of a run.
pub trait NotificationSink {
    fn notify(&mut self, event: &Event);

    /// Start buffering per-method progress output.
    fn acquire_capture(&mut self) {}

    /// Flush what was buffered since [`NotificationSink::acquire_capture`].
    fn release_capture(&mut self) {}
}

impl<S: NotificationSink + ?Sized> NotificationSink for &mut S {
    fn notify(&mut self, event: &Event) {
        (**self).notify(event)
    }

    fn acquire_capture(&mut self) {
        (**self).acquire_capture()
    }

    fn release_capture(&mut self) {
        (**self).release_capture()
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl NotificationSink for NullSink {
    fn notify(&mut self, _event: &Event) {}
}

/// Records every event in order.
#[derive(Debug, Default)]
pub struct EventLog {
    pub events: Vec<Event>,
    pub captures: usize,
    pub releases: usize,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&Event> {
        self.events.last()
    }

    /// Assertion outcomes only.
    pub fn outcomes(&self) -> impl Iterator<Item = &AssertionOutcome> {
        self.events.iter().filter_map(|event| match event {
            Event::Assertion(outcome) => Some(outcome),
            _ => None,
        })
    }

    /// Statuses of all outcome events, in order.
    pub fn statuses(&self) -> Vec<Status> {
        self.events.iter().filter_map(Event::status).collect()
    }
}

impl NotificationSink for EventLog {
    fn notify(&mut self, event: &Event) {
        self.events.push(event.clone());
    }

    fn acquire_capture(&mut self) {
        self.captures += 1;
    }

    fn release_capture(&mut self) {
        self.releases += 1;
    }
}

/// Scoped output capture around a sink.
pub struct Capture<'a> {
    sink: &'a mut dyn NotificationSink,
}

impl<'a> Capture<'a> {
    pub fn acquire(sink: &'a mut dyn NotificationSink) -> Self {
        sink.acquire_capture();
        Self { sink }
    }
}

impl<'a> Deref for Capture<'a> {
    type Target = dyn NotificationSink + 'a;

    fn deref(&self) -> &Self::Target {
        &*self.sink
    }
}

impl<'a> DerefMut for Capture<'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.sink
    }
}

impl Drop for Capture<'_> {
    fn drop(&mut self) {
        self.sink.release_capture();
    }
}
