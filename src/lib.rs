//! # assay
//!
//! A small unit-testing engine. Assertions are table-driven: one named
//! predicate family answers both `assert<Key>` and `assertNot<Key>`, and every
//! call is classified into a [`Status`] instead of aborting the test. Test
//! methods can declare an expected exception, an expected message template and
//! parameter sources, either through the builder API or in doc-comment blocks
//! of annotated source text.
//!
//! ## Layout
//!
//! - **`predicates`**: the predicate registry and the built-in families
//! - **`runtime`**: assertion dispatch, outcomes, notification sinks
//! - **`testing`**: metadata parsing, test classes, the executor, the file runner
//! - **`value`** / **`fault`**: the values handed to assertions and raised by tests
//! - **`cli`** / **`config`**: the command-line runner and its console reporter

pub mod cli;
pub mod config;
pub mod errors;
pub mod fault;
pub mod predicates;
pub mod runtime;
pub mod testing;
pub mod value;

pub use crate::errors::{AssayError, ErrorKind, Result};
pub use crate::fault::Fault;
pub use crate::runtime::dispatch::Dispatcher;
pub use crate::runtime::outcome::{AssertionOutcome, Status};
pub use crate::runtime::sink::{Event, NotificationSink};
pub use crate::testing::assertions::Assertions;
pub use crate::testing::class::TestClass;
pub use crate::testing::metadata::TestMethodSpec;
pub use crate::testing::suite::{Suite, TestFile};
pub use crate::value::Value;
