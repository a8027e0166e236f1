//! Filesystem predicates.
//!
//! Each takes a `filename`. Scalars are converted to a path string; null and
//! `false` become the empty path, which never exists. Arrays, objects and other
//! non-scalars raise a `TypeError`.
//!
//! Symlinks are followed by every predicate except `Link`.

use std::fs;
use std::path::Path;

use crate::errors::Result;
use crate::predicates::{helpers::path_arg, AssertionDefinition, PredicateFn, PredicateRegistry};

pub const PRED_DIR: PredicateFn = |b| Ok(path_arg(b.get("filename")?, "is_dir")?.is_dir());

pub const PRED_FILE: PredicateFn = |b| Ok(path_arg(b.get("filename")?, "is_file")?.is_file());

pub const PRED_LINK: PredicateFn = |b| {
    let path = path_arg(b.get("filename")?, "is_link")?;
    Ok(fs::symlink_metadata(path).is_ok_and(|meta| meta.file_type().is_symlink()))
};

/// Regular files with an execute bit set. Directories are not executable.
///
/// Only the mode bits are consulted: a file with `u+x` owned by another user
/// still counts as executable for the current one.
pub const PRED_EXECUTABLE: PredicateFn =
    |b| Ok(is_executable(&path_arg(b.get("filename")?, "is_executable")?));

/// The file can be opened, or the directory listed.
pub const PRED_READABLE: PredicateFn = |b| {
    let path = path_arg(b.get("filename")?, "is_readable")?;
    Ok(if path.is_dir() {
        fs::read_dir(&path).is_ok()
    } else {
        fs::File::open(&path).is_ok()
    })
};

/// The file can be opened for writing (nothing is created or truncated).
/// Directories are judged by their read-only flag.
pub const PRED_WRITABLE: PredicateFn = |b| {
    let path = path_arg(b.get("filename")?, "is_writable")?;
    Ok(match fs::metadata(&path) {
        Ok(meta) if meta.is_dir() => !meta.permissions().readonly(),
        Ok(_) => fs::OpenOptions::new().write(true).open(&path).is_ok(),
        Err(_) => false,
    })
};

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    fs::metadata(path).is_ok_and(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ["exe", "bat", "cmd", "com"].contains(&ext.to_ascii_lowercase().as_str()))
}

pub fn register_filesystem_predicates(registry: &mut PredicateRegistry) -> Result<()> {
    registry.register(AssertionDefinition::inferred("Dir", "is_dir($filename)", PRED_DIR))?;
    registry.register(AssertionDefinition::inferred(
        "Executable",
        "is_executable($filename)",
        PRED_EXECUTABLE,
    ))?;
    registry.register(AssertionDefinition::inferred("File", "is_file($filename)", PRED_FILE))?;
    registry.register(AssertionDefinition::inferred("Link", "is_link($filename)", PRED_LINK))?;
    registry.register(AssertionDefinition::inferred(
        "Readable",
        "is_readable($filename)",
        PRED_READABLE,
    ))?;
    registry.register(AssertionDefinition::inferred(
        "Writable",
        "is_writable($filename)",
        PRED_WRITABLE,
    ))?;
    registry.register(AssertionDefinition::inferred(
        "Writeable",
        "is_writable($filename)",
        PRED_WRITABLE,
    ))?;
    Ok(())
}
