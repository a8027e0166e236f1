//! Classified results of assertion calls.

use std::fmt;
use std::panic::Location;

use serde::Serialize;

use crate::value::Value;

/// Every classification an assertion, a method or a file can end in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Status {
    Passed,
    Failed,
    ExceptionDuringEvaluation,
    ArgumentCountMismatch,
    UnknownAssertion,
    NotAnAssertionCall,
    FileSkipped,
    MethodFaulted,
}

impl Status {
    /// Stable numeric code, as reported in JSON results.
    pub fn code(self) -> i8 {
        match self {
            Status::Passed => 1,
            Status::Failed => 0,
            Status::ExceptionDuringEvaluation => -1,
            Status::ArgumentCountMismatch => -2,
            Status::UnknownAssertion => -3,
            Status::NotAnAssertionCall => -4,
            Status::FileSkipped => -5,
            Status::MethodFaulted => -6,
        }
    }

    /// Misuse of the assertion API. Carries no pass/fail meaning.
    pub fn is_misuse(self) -> bool {
        matches!(
            self,
            Status::ArgumentCountMismatch | Status::UnknownAssertion | Status::NotAnAssertionCall
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Passed => "passed",
            Status::Failed => "failed",
            Status::ExceptionDuringEvaluation => "exception during evaluation",
            Status::ArgumentCountMismatch => "argument count mismatch",
            Status::UnknownAssertion => "unknown assertion",
            Status::NotAnAssertionCall => "not an assertion",
            Status::FileSkipped => "file skipped",
            Status::MethodFaulted => "method faulted",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// File and line of a call site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceLocation {
    pub file: String,
    pub line: u32,
}

impl SourceLocation {
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }
}

impl From<&Location<'_>> for SourceLocation {
    fn from(location: &Location<'_>) -> Self {
        Self::new(location.file(), location.line())
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// A parsed `assert<Key>` / `assertNot<Key>` call.
#[derive(Debug, Clone, PartialEq)]
pub struct AssertionInvocation {
    pub negate: bool,
    pub key: String,
    pub arguments: Vec<Value>,
}

impl AssertionInvocation {
    /// Splits a called name into negation flag and key. `None` if the name is
    /// not an assertion call at all.
    ///
    /// ```rust
    /// use assay::runtime::outcome::AssertionInvocation;
    /// let call = AssertionInvocation::parse("assertNotNull", vec![]).unwrap();
    /// assert!(call.negate);
    /// assert_eq!(call.key, "Null");
    /// assert!(AssertionInvocation::parse("fooBar", vec![]).is_none());
    /// ```
    pub fn parse(called: &str, arguments: Vec<Value>) -> Option<Self> {
        let (negate, key) = if let Some(key) = called.strip_prefix("assertNot") {
            (true, key)
        } else {
            (false, called.strip_prefix("assert")?)
        };
        Some(Self {
            negate,
            key: key.to_string(),
            arguments,
        })
    }
}

/// The classified result of one assertion call.
#[derive(Debug, Clone)]
pub struct AssertionOutcome {
    pub status: Status,
    pub location: SourceLocation,
    pub method: String,
    /// Parameter names, on `Failed` and `ArgumentCountMismatch`.
    pub expected_params: Option<Vec<String>>,
    /// Supplied arguments, on `Failed`.
    pub arguments: Option<Vec<Value>>,
    /// Fault message, on `ExceptionDuringEvaluation`.
    pub message: Option<String>,
}

impl AssertionOutcome {
    pub fn new(status: Status, location: SourceLocation, method: impl Into<String>) -> Self {
        Self {
            status,
            location,
            method: method.into(),
            expected_params: None,
            arguments: None,
            message: None,
        }
    }

    pub fn with_expected(mut self, params: &[String]) -> Self {
        self.expected_params = Some(params.to_vec());
        self
    }

    pub fn with_arguments(mut self, arguments: Vec<Value>) -> Self {
        self.arguments = Some(arguments);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn passed(&self) -> bool {
        self.status == Status::Passed
    }
}
