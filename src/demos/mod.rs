//! The suite bundled with the `assay` binary.
//!
//! - `tests/`: the assertion table checked against itself; everything passes
//! - `demos/`: what failures, misuse, faulted methods and skipped files look
//!   like in the report

use std::sync::Arc;

use assay::value::Class;
use assay::{Suite, TestFile};

mod exceptions;
mod my_class;

pub fn suite() -> Suite {
    Suite::new()
        .file(TestFile::new("tests/TheTestTest.rs", the_test::class))
        .file(TestFile::new("tests/ExceptionsTest.rs", exceptions::class))
        .file(TestFile::new("demos/MyClassTest.rs", my_class::class))
        .file(TestFile::new("demos/BrokenTest.rs", my_class::broken))
}

pub(crate) fn some_interface() -> Arc<Class> {
    Class::interface("SomeInterface").method("f").method("g").build()
}

pub(crate) fn some_class() -> Arc<Class> {
    Class::define("SomeClass")
        .implements(&some_interface())
        .method("f")
        .method("g")
        .build()
}

pub(crate) fn extended_class() -> Arc<Class> {
    Class::define("ExtendedClass")
        .extends(&some_class())
        .method("fg")
        .method("gf")
        .build()
}
