//! Counters and summaries at method, file and run level.

use serde::Serialize;

use crate::runtime::outcome::Status;

/// Per-method assertion counters, reset for every method.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MethodCounters {
    pub passed: usize,
    pub failed: usize,
    /// Misuse and evaluation faults.
    pub skipped: usize,
}

impl MethodCounters {
    pub fn record(&mut self, status: Status) {
        match status {
            Status::Passed => self.passed += 1,
            Status::Failed => self.failed += 1,
            Status::ExceptionDuringEvaluation
            | Status::ArgumentCountMismatch
            | Status::UnknownAssertion
            | Status::NotAnAssertionCall => self.skipped += 1,
            Status::FileSkipped | Status::MethodFaulted => {}
        }
    }
}

/// Where a method run is: `Idle -> Setup -> Invoking -> {Completed, MethodFaulted}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MethodState {
    Idle,
    Setup,
    Invoking,
    Completed,
    MethodFaulted,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodSummary {
    pub class: String,
    pub method: String,
    pub counters: MethodCounters,
    pub invocations: usize,
    pub state: MethodState,
}

impl MethodSummary {
    pub fn faulted(&self) -> bool {
        self.state == MethodState::MethodFaulted
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FileSummary {
    pub path: String,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub skipped_methods: usize,
    pub file_skipped: bool,
    pub methods: Vec<MethodSummary>,
}

impl FileSummary {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn skipped_file(path: impl Into<String>) -> Self {
        Self {
            file_skipped: true,
            ..Self::new(path)
        }
    }

    pub fn add(&mut self, method: MethodSummary) {
        self.passed += method.counters.passed;
        self.failed += method.counters.failed;
        self.skipped += method.counters.skipped;
        if method.faulted() {
            self.skipped_methods += 1;
        }
        self.methods.push(method);
    }
}

/// Totals over every file of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub files: usize,
    pub methods: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub skipped_methods: usize,
    pub skipped_files: usize,
}

impl Totals {
    /// Nothing failed and nothing was skipped.
    pub fn is_clean(&self) -> bool {
        self.failed == 0 && self.skipped == 0 && self.skipped_methods == 0 && self.skipped_files == 0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub files: Vec<FileSummary>,
}

impl RunSummary {
    pub fn totals(&self) -> Totals {
        self.files.iter().fold(Totals::default(), |mut t, file| {
            t.files += 1;
            t.methods += file.methods.len();
            t.passed += file.passed;
            t.failed += file.failed;
            t.skipped += file.skipped;
            t.skipped_methods += file.skipped_methods;
            if file.file_skipped {
                t.skipped_files += 1;
            }
            t
        })
    }
}
