//! The `assay` binary.
//!
//! Runs the bundled demonstration suite: `assay` runs `tests/`, where
//! everything passes; `assay demos -vv` shows how failures are reported.

use std::process::ExitCode;

mod demos;

fn main() -> ExitCode {
    assay::cli::run(&demos::suite())
}
