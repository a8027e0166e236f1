// Filesystem predicates against a scratch directory.

use std::fs::{self, OpenOptions};

use assay::runtime::dispatch::Dispatcher;
use assay::runtime::outcome::Status;
use assay::values;
use tempfile::tempdir;

fn status(d: &Dispatcher, called: &str, path: &std::path::Path) -> Status {
    d.dispatch(called, values![path.display().to_string()]).status
}

#[test]
fn files_and_directories() {
    let d = Dispatcher::with_defaults().unwrap();
    let dir = tempdir().unwrap();
    let file = dir.path().join("data.txt");
    fs::write(&file, "x").unwrap();
    let missing = dir.path().join("missing.txt");

    assert_eq!(status(&d, "assertDir", dir.path()), Status::Passed);
    assert_eq!(status(&d, "assertNotDir", &file), Status::Passed);
    assert_eq!(status(&d, "assertFile", &file), Status::Passed);
    assert_eq!(status(&d, "assertNotFile", dir.path()), Status::Passed);
    assert_eq!(status(&d, "assertFile", &missing), Status::Failed);
    assert_eq!(status(&d, "assertReadable", &file), Status::Passed);
    assert_eq!(status(&d, "assertReadable", dir.path()), Status::Passed);
    assert_eq!(status(&d, "assertNotReadable", &missing), Status::Passed);
}

#[test]
fn writable_follows_permissions() {
    let d = Dispatcher::with_defaults().unwrap();
    let dir = tempdir().unwrap();
    let file = dir.path().join("locked.txt");
    fs::write(&file, "x").unwrap();

    assert_eq!(status(&d, "assertWritable", &file), Status::Passed);
    assert_eq!(status(&d, "assertWriteable", &file), Status::Passed);

    let mut perms = fs::metadata(&file).unwrap().permissions();
    perms.set_readonly(true);
    fs::set_permissions(&file, perms).unwrap();
    // A privileged user may still open a read-only file for writing.
    let expected = if OpenOptions::new().write(true).open(&file).is_ok() {
        Status::Passed
    } else {
        Status::Failed
    };
    assert_eq!(status(&d, "assertWritable", &file), expected);
    assert_eq!(fs::read_to_string(&file).unwrap(), "x");
    assert_eq!(status(&d, "assertNotWriteable", &dir.path().join("missing")), Status::Passed);
}

#[cfg(unix)]
#[test]
fn links_and_executables() {
    use std::os::unix::fs::{symlink, PermissionsExt};

    let d = Dispatcher::with_defaults().unwrap();
    let dir = tempdir().unwrap();
    let script = dir.path().join("run.sh");
    fs::write(&script, "#!/bin/sh\n").unwrap();
    let link = dir.path().join("link");
    symlink(&script, &link).unwrap();

    assert_eq!(status(&d, "assertLink", &link), Status::Passed);
    assert_eq!(status(&d, "assertNotLink", &script), Status::Passed);
    assert_eq!(status(&d, "assertFile", &link), Status::Passed);

    assert_eq!(status(&d, "assertNotExecutable", &script), Status::Passed);
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
    assert_eq!(status(&d, "assertExecutable", &script), Status::Passed);
    assert_eq!(status(&d, "assertNotExecutable", dir.path()), Status::Passed);
}

#[test]
fn empty_and_invalid_filenames() {
    let d = Dispatcher::with_defaults().unwrap();
    assert_eq!(d.dispatch("assertFile", values![false]).status, Status::Failed);
    assert_eq!(d.dispatch("assertDir", values![assay::Value::Null]).status, Status::Failed);
    assert_eq!(
        d.dispatch("assertReadable", values![values!["a"]]).status,
        Status::ExceptionDuringEvaluation
    );
}
