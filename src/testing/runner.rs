//! File-level execution.
//!
//! [`SuiteRunner`] runs the selected files one after another. Loading a file
//! is contained like a method run: a loader that raises skips that file, is
//! reported as `FileSkipped`, and the next file runs.

use crate::runtime::dispatch::Dispatcher;
use crate::runtime::outcome::SourceLocation;
use crate::runtime::sink::{Event, FileFault, NotificationSink};
use crate::testing::discovery::{select_files, MethodFilter, Selected};
use crate::testing::executor::TestExecutor;
use crate::testing::suite::{Suite, TestFile};
use crate::testing::summary::{FileSummary, RunSummary};

pub struct SuiteRunner<'a> {
    dispatcher: &'a Dispatcher,
    sink: &'a mut dyn NotificationSink,
    filter: MethodFilter,
}

impl<'a> SuiteRunner<'a> {
    pub fn new(
        dispatcher: &'a Dispatcher,
        sink: &'a mut dyn NotificationSink,
        filter: MethodFilter,
    ) -> Self {
        Self {
            dispatcher,
            sink,
            filter,
        }
    }

    /// Runs the files of `suite` selected by `path_arg`.
    pub fn run(&mut self, suite: &Suite, path_arg: &str) -> RunSummary {
        let selection = select_files(suite, path_arg);
        tracing::debug!(path = path_arg, files = selection.len(), "running suite");

        let files = selection
            .into_iter()
            .map(|selected| match selected {
                Selected::File(file) => self.run_file(file),
                Selected::Missing(path) => {
                    let message = format!("File: {}, does not exist", path);
                    self.skip_file(&path, message, None)
                }
            })
            .collect();
        RunSummary { files }
    }

    pub fn run_file(&mut self, file: &TestFile) -> FileSummary {
        let mut instance = match file.load() {
            Ok(instance) => instance,
            Err(fault) => {
                let location = fault.location().map(SourceLocation::from);
                return self.skip_file(file.path(), fault.message().to_string(), location);
            }
        };

        self.sink.notify(&Event::FileStarted {
            path: file.path().to_string(),
        });

        let mut summary = FileSummary::new(file.path());
        let filter = &self.filter;
        let methods = TestExecutor::new(self.dispatcher, &mut *self.sink)
            .run_instance(instance.as_mut(), |name| filter.accepts(name));
        for method in methods {
            summary.add(method);
        }

        self.sink.notify(&Event::FileFinished(summary.clone()));
        summary
    }

    fn skip_file(
        &mut self,
        path: &str,
        message: String,
        location: Option<SourceLocation>,
    ) -> FileSummary {
        tracing::warn!(%path, %message, "file skipped");
        self.sink.notify(&Event::FileStarted {
            path: path.to_string(),
        });
        self.sink.notify(&Event::FileSkipped(FileFault {
            path: path.to_string(),
            message,
            location,
        }));
        let summary = FileSummary::skipped_file(path);
        self.sink.notify(&Event::FileFinished(summary.clone()));
        summary
    }
}
