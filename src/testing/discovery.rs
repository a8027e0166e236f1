//! Selecting files and methods to run.
//!
//! ## File selection
//!
//! The path argument (default `tests`) is resolved against the suite's
//! registered paths:
//!
//! - a registered file path selects that file;
//! - a directory selects every file below it whose stem ends in `Test`;
//! - a pattern containing `*` selects the files of its directory whose names
//!   match (`*` matches anything);
//! - a file path (with an extension) that is not registered is reported as a
//!   skipped file.
//!
//! ## Method selection
//!
//! `--filter` keeps methods matching a case-insensitive regular expression,
//! so plain text acts as a substring filter. `--individual` keeps the single
//! method named, with or without its `test` prefix.

use regex::{Regex, RegexBuilder};

use crate::errors::{AssayError, Result};
use crate::testing::suite::{normalize_path, Suite, TestFile};

/// One entry of a resolved selection.
#[derive(Debug)]
pub enum Selected<'s> {
    File(&'s TestFile),
    /// An explicitly named file that is not in the suite.
    Missing(String),
}

/// Resolves the path argument to the files to run, in suite order.
pub fn select_files<'s>(suite: &'s Suite, path_arg: &str) -> Vec<Selected<'s>> {
    let target = normalize_path(path_arg);

    if target.contains('*') {
        let (dir, pattern) = target.rsplit_once('/').unwrap_or(("", target.as_str()));
        let Some(matcher) = glob_regex(pattern) else {
            return Vec::new();
        };
        return suite
            .files()
            .iter()
            .filter(|f| f.dir() == dir && matcher.is_match(f.file_name()))
            .map(Selected::File)
            .collect();
    }

    if let Some(file) = suite.get(&target) {
        return vec![Selected::File(file)];
    }

    let prefix = if target.is_empty() {
        String::new()
    } else {
        format!("{}/", target)
    };
    let below: Vec<Selected<'s>> = suite
        .files()
        .iter()
        .filter(|f| f.path().starts_with(&prefix) && f.stem().ends_with("Test"))
        .map(Selected::File)
        .collect();
    if !below.is_empty() {
        return below;
    }

    let names_a_file = target
        .rsplit('/')
        .next()
        .is_some_and(|name| name.contains('.'));
    if names_a_file {
        tracing::debug!(path = %target, "selected file is not registered");
        vec![Selected::Missing(target)]
    } else {
        Vec::new()
    }
}

fn glob_regex(pattern: &str) -> Option<Regex> {
    let body = pattern
        .split('*')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(".*");
    Regex::new(&format!("^{}$", body)).ok()
}

/// Method-name filter built from `--filter` and `--individual`.
#[derive(Debug, Default, Clone)]
pub struct MethodFilter {
    pattern: Option<Regex>,
    individual: Option<String>,
}

impl MethodFilter {
    /// Accepts every method.
    pub fn all() -> Self {
        Self::default()
    }

    /// Empty strings disable the corresponding filter.
    pub fn new(filter: Option<&str>, individual: Option<&str>) -> Result<Self> {
        let pattern = match filter.filter(|f| !f.is_empty()) {
            Some(f) => Some(
                RegexBuilder::new(f)
                    .case_insensitive(true)
                    .build()
                    .map_err(|source| AssayError::InvalidFilter {
                        pattern: f.to_string(),
                        source,
                    })?,
            ),
            None => None,
        };
        let individual = individual.filter(|i| !i.is_empty()).map(|i| {
            let lower = i.to_lowercase();
            lower.strip_prefix("test").unwrap_or(&lower).trim_start_matches('_').to_string()
        });
        Ok(Self {
            pattern,
            individual,
        })
    }

    pub fn accepts(&self, method: &str) -> bool {
        if let Some(wanted) = &self.individual {
            let lower = method.to_lowercase();
            let bare = lower.strip_prefix("test").unwrap_or(&lower).trim_start_matches('_');
            if bare != wanted {
                return false;
            }
        }
        self.pattern.as_ref().map_or(true, |p| p.is_match(method))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::class::TestClass;

    fn suite() -> Suite {
        let file = |path: &str| TestFile::new(path, || TestClass::new("T", || Ok(())));
        Suite::new()
            .file(file("tests/MyClassTest.rs"))
            .file(file("tests/TestTheTest.rs"))
            .file(file("tests/helpers.rs"))
            .file(file("tests/unit/DeepTest.rs"))
            .file(file("other/OtherTest.rs"))
    }

    fn paths(selection: &[Selected<'_>]) -> Vec<String> {
        selection
            .iter()
            .map(|s| match s {
                Selected::File(f) => f.path().to_string(),
                Selected::Missing(p) => format!("missing:{p}"),
            })
            .collect()
    }

    #[test]
    fn test_directory_selects_test_files_below() {
        let suite = suite();
        assert_eq!(
            paths(&select_files(&suite, "tests/")),
            ["tests/MyClassTest.rs", "tests/TestTheTest.rs", "tests/unit/DeepTest.rs"]
        );
    }

    #[test]
    fn test_exact_file_and_missing_file() {
        let suite = suite();
        assert_eq!(paths(&select_files(&suite, "./tests/helpers.rs")), ["tests/helpers.rs"]);
        assert_eq!(
            paths(&select_files(&suite, "tests/NopeTest.rs")),
            ["missing:tests/NopeTest.rs"]
        );
        assert!(select_files(&suite, "nowhere").is_empty());
    }

    #[test]
    fn test_glob_matches_within_directory() {
        let suite = suite();
        assert_eq!(paths(&select_files(&suite, "tests/My*")), ["tests/MyClassTest.rs"]);
        assert_eq!(
            paths(&select_files(&suite, "tests/*Test.rs")),
            ["tests/MyClassTest.rs", "tests/TestTheTest.rs"]
        );
    }

    #[test]
    fn test_method_filter() {
        let filter = MethodFilter::new(Some("EXCEP"), None).unwrap();
        assert!(filter.accepts("testException"));
        assert!(!filter.accepts("testSource"));

        let single = MethodFilter::new(None, Some("source")).unwrap();
        assert!(single.accepts("testSource"));
        assert!(single.accepts("test_source"));
        assert!(!single.accepts("testSourceTwo"));
        assert!(MethodFilter::new(None, Some("testSource")).unwrap().accepts("testsource"));

        assert!(MethodFilter::new(Some(""), Some("")).unwrap().accepts("anything"));
        let err = MethodFilter::new(Some("("), None).unwrap_err();
        assert!(matches!(err, AssayError::InvalidFilter { .. }));
    }
}
