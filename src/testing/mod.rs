//! # Testing
//!
//! Everything between a registered test class and the notification sink.
//!
//! ## Module Structure
//!
//! - **`metadata`**: the metadata parser and [`TestMethodSpec`](metadata::TestMethodSpec)
//! - **`assertions`**: the handle test bodies call assertions through
//! - **`class`**: test-class registration and the [`TestInstance`](class::TestInstance) seam
//! - **`executor`**: per-method state machine
//! - **`suite`**: test files and suites
//! - **`discovery`**: file and method selection
//! - **`runner`**: file-level containment and run summaries
//! - **`summary`**: counters and summaries

pub mod assertions;
pub mod class;
pub mod discovery;
pub mod executor;
pub mod metadata;
pub mod runner;
pub mod suite;
pub mod summary;
