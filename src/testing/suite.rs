//! Test files and suites.
//!
//! A [`TestFile`] pairs a path with a loader that builds its test class. The
//! path is what the selection rules and the reporter see; loading happens
//! only when the file runs, and a loader that raises (or panics) skips the
//! file without affecting the others.

use std::fmt;
use std::path::Path;

use crate::fault::Fault;
use crate::testing::class::{TestClass, TestInstance};

type Loader = Box<dyn Fn() -> Result<Box<dyn TestInstance>, Fault>>;

pub struct TestFile {
    path: String,
    loader: Loader,
}

impl TestFile {
    /// A file whose class is built by `class`.
    pub fn new<T: 'static>(path: impl AsRef<str>, class: impl Fn() -> TestClass<T> + 'static) -> Self {
        Self::from_loader(path, move || class().instantiate())
    }

    /// A file with a custom loader, which may raise.
    pub fn from_loader(
        path: impl AsRef<str>,
        loader: impl Fn() -> Result<Box<dyn TestInstance>, Fault> + 'static,
    ) -> Self {
        Self {
            path: normalize_path(path.as_ref()),
            loader: Box::new(loader),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// File name without directory and extension, e.g. `MyClassTest`.
    pub fn stem(&self) -> &str {
        Path::new(&self.path)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&self.path)
    }

    /// File name with extension.
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// Directory part of the path; empty for top-level files.
    pub fn dir(&self) -> &str {
        self.path.rsplit_once('/').map_or("", |(dir, _)| dir)
    }

    pub fn load(&self) -> Result<Box<dyn TestInstance>, Fault> {
        Fault::catch(|| (self.loader)())
    }
}

impl fmt::Debug for TestFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestFile").field("path", &self.path).finish()
    }
}

/// `./tests//a.rs` becomes `tests/a.rs`.
pub fn normalize_path(path: &str) -> String {
    path.split('/')
        .filter(|part| !part.is_empty() && *part != ".")
        .collect::<Vec<_>>()
        .join("/")
}

/// Ordered list of test files.
#[derive(Debug, Default)]
pub struct Suite {
    files: Vec<TestFile>,
}

impl Suite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(mut self, file: TestFile) -> Self {
        self.files.push(file);
        self
    }

    pub fn add(&mut self, file: TestFile) {
        self.files.push(file);
    }

    pub fn files(&self) -> &[TestFile] {
        &self.files
    }

    pub fn get(&self, path: &str) -> Option<&TestFile> {
        let path = normalize_path(path);
        self.files.iter().find(|f| f.path == path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
