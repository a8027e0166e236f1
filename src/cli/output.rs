//! Handles all user-facing output of a test run.
//!
//! [`ConsoleReporter`] is the notification sink behind the CLI. It prints the
//! file name, one line per method with its progress characters and counts,
//! and a totals line at the end:
//!
//! ```text
//! tests/MathTest.rs
//!   Addition                .... [  4]
//!   Division                ..F. [  3]
//!
//!     7 passed  1 failed
//! ```
//!
//! Progress characters: `.` passed, `F` failed, `S` skipped (assertion
//! misuse), `E` fault during evaluation, `M` method faulted, `X` file skipped.

use std::io;

use difference::{Changeset, Difference};
use termcolor::{Buffer, Color, ColorSpec, WriteColor};
use unicode_width::UnicodeWidthStr;

use crate::config::RunConfig;
use crate::runtime::outcome::{AssertionOutcome, SourceLocation, Status};
use crate::runtime::sink::{Event, NotificationSink};
use crate::testing::summary::{FileSummary, MethodSummary, Totals};
use crate::value::Value;

const NAME_WIDTH: usize = 24;

// ============================================================================
// OPTIONS AND MESSAGES
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportOptions {
    pub verbosity: u8,
    pub testdox: bool,
    pub quiet: bool,
}

impl From<&RunConfig> for ReportOptions {
    fn from(config: &RunConfig) -> Self {
        Self {
            verbosity: config.verbosity,
            testdox: config.testdox,
            quiet: config.quiet,
        }
    }
}

/// Progress character of a status.
pub fn progress_char(status: Status) -> char {
    match status {
        Status::Passed => '.',
        Status::Failed => 'F',
        Status::ExceptionDuringEvaluation => 'E',
        Status::ArgumentCountMismatch | Status::UnknownAssertion | Status::NotAnAssertionCall => 'S',
        Status::MethodFaulted => 'M',
        Status::FileSkipped => 'X',
    }
}

fn status_color(status: Status) -> Color {
    match status {
        Status::Passed => Color::Green,
        Status::Failed | Status::MethodFaulted => Color::Red,
        _ => Color::Yellow,
    }
}

/// One-line explanation of a non-passing outcome.
pub fn outcome_message(outcome: &AssertionOutcome) -> Option<String> {
    let method = &outcome.method;
    let text = match outcome.status {
        Status::Passed => return None,
        Status::Failed => format!("Assertion failed: {}", method),
        Status::ArgumentCountMismatch => format!("Bad number of arguments: {}", method),
        Status::UnknownAssertion => format!("Unknown assertion: {}", method),
        Status::NotAnAssertionCall => format!("Not an assertion: {}", method),
        Status::ExceptionDuringEvaluation => format!(
            "Exception: {} : {}",
            outcome.message.as_deref().unwrap_or_default(),
            method
        ),
        Status::FileSkipped | Status::MethodFaulted => return None,
    };
    Some(text)
}

/// Method name as shown: `testDivision` and `test_division` become
/// `Division` and `division`.
pub fn display_name(method: &str) -> &str {
    method
        .strip_prefix("test")
        .unwrap_or(method)
        .trim_start_matches('_')
}

fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{}{}", text, " ".repeat(fill))
}

fn located(location: Option<&SourceLocation>, message: &str) -> String {
    match location {
        Some(location) => format!(" line: {} >> {} ", location.line, message),
        None => format!(" {} ", message),
    }
}

/// A line printed below a method, optionally coloured.
#[derive(Debug, Clone, PartialEq)]
struct Note {
    text: String,
    color: Option<Color>,
}

impl Note {
    fn plain(text: String) -> Self {
        Self { text, color: None }
    }

    fn colored(text: String, color: Color) -> Self {
        Self {
            text,
            color: Some(color),
        }
    }
}

/// Parameter/argument pairs of a failed assertion; two differing strings
/// also get a line diff.
fn argument_dump(outcome: &AssertionOutcome) -> Vec<Note> {
    let (Some(params), Some(args)) = (&outcome.expected_params, &outcome.arguments) else {
        return Vec::new();
    };
    let width = params.iter().map(|p| p.width() + 1).max().unwrap_or(0);
    let mut notes: Vec<Note> = params
        .iter()
        .zip(args)
        .map(|(param, value)| {
            Note::plain(format!("      {} = {}", pad(&format!("${}", param), width), value.render()))
        })
        .collect();

    if let [Value::String(left), Value::String(right)] = args.as_slice() {
        if left != right {
            let changeset = Changeset::new(left, right, "\n");
            for diff in &changeset.diffs {
                notes.push(match diff {
                    Difference::Same(x) => Note::plain(format!("       {}", x)),
                    Difference::Add(x) => Note::colored(format!("      +{}", x), Color::Green),
                    Difference::Rem(x) => Note::colored(format!("      -{}", x), Color::Red),
                });
            }
        }
    }
    notes
}

// ============================================================================
// CONSOLE REPORTER
// ============================================================================

/// Prints a run as it happens. While a method's capture is held, output goes
/// to a buffer that is written out on release.
pub struct ConsoleReporter<W: WriteColor> {
    out: W,
    options: ReportOptions,
    buffer: Option<Buffer>,
    notes: Vec<Note>,
}

impl<W: WriteColor> ConsoleReporter<W> {
    pub fn new(out: W, options: ReportOptions) -> Self {
        Self {
            out,
            options,
            buffer: None,
            notes: Vec::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Prints the totals line.
    pub fn finish(&mut self, totals: &Totals) -> io::Result<()> {
        let out = &mut self.out;
        writeln!(out)?;
        out.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true))?;
        write!(out, "{:5} passed ", totals.passed)?;
        let parts = [
            (totals.failed, "failed", Color::Red),
            (totals.skipped, "skipped", Color::Yellow),
            (totals.skipped_methods, "method(s) skipped", Color::Red),
            (totals.skipped_files, "file(s) skipped", Color::Red),
        ];
        for (count, label, color) in parts {
            if count > 0 {
                out.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
                write!(out, " {} {} ", count, label)?;
            }
        }
        out.reset()?;
        writeln!(out)?;
        out.flush()
    }

    fn writer(&mut self) -> &mut dyn WriteColor {
        match self.buffer.as_mut() {
            Some(buffer) => buffer as &mut dyn WriteColor,
            None => &mut self.out,
        }
    }

    fn colored(&mut self, text: &str, color: Color) -> io::Result<()> {
        let w = self.writer();
        w.set_color(ColorSpec::new().set_fg(Some(color)))?;
        write!(w, "{}", text)?;
        w.reset()
    }

    fn progress(&mut self, status: Status) -> io::Result<()> {
        if self.options.testdox {
            return Ok(());
        }
        let mut buf = [0u8; 4];
        let mark = progress_char(status).encode_utf8(&mut buf);
        self.colored(mark, status_color(status))
    }

    fn handle(&mut self, event: &Event) -> io::Result<()> {
        if self.options.quiet {
            return Ok(());
        }
        let verbosity = self.options.verbosity;
        match event {
            Event::FileStarted { path } => {
                let w = self.writer();
                w.set_color(ColorSpec::new().set_bold(true))?;
                write!(w, "\n{}", path)?;
                w.reset()?;
                writeln!(w)?;
            }
            Event::FileSkipped(fault) => {
                self.colored("  X ", status_color(Status::FileSkipped))?;
                let text = located(fault.location.as_ref(), &fault.message);
                writeln!(self.writer(), "{}", text.trim_end())?;
            }
            Event::FileFinished(summary) => {
                if verbosity >= 1 && !summary.file_skipped {
                    self.file_summary(summary)?;
                }
            }
            Event::MethodStarted { method, .. } => {
                self.notes.clear();
                let name = display_name(method);
                let shown = if self.options.testdox {
                    name.to_string()
                } else {
                    pad(name, NAME_WIDTH)
                };
                write!(self.writer(), "  {} ", shown)?;
            }
            Event::Assertion(outcome) => {
                self.progress(outcome.status)?;
                if verbosity >= 2 {
                    if let Some(message) = outcome_message(outcome) {
                        self.notes
                            .push(Note::plain(located(Some(&outcome.location), &message)));
                    }
                }
                if verbosity >= 3 && outcome.status == Status::Failed {
                    self.notes.extend(argument_dump(outcome));
                }
            }
            Event::MethodFaulted(fault) => {
                self.progress(Status::MethodFaulted)?;
                if verbosity >= 2 {
                    let message = format!(
                        "Exception: {}: {} : {}",
                        fault.fault_class, fault.message, fault.method
                    );
                    self.notes.push(Note::colored(
                        located(fault.location.as_ref(), &message),
                        Color::Red,
                    ));
                }
            }
            Event::MethodFinished(summary) => self.method_line_end(summary)?,
        }
        Ok(())
    }

    fn method_line_end(&mut self, summary: &MethodSummary) -> io::Result<()> {
        let counters = summary.counters;
        if !self.options.testdox {
            self.colored(&format!(" [{:3}] ", counters.passed), Color::Green)?;
            if self.options.verbosity >= 1 {
                if counters.failed > 0 {
                    self.colored(&format!("[{:3}] ", counters.failed), Color::Red)?;
                }
                if counters.skipped > 0 {
                    self.colored(&format!("[{:3}] ", counters.skipped), Color::Yellow)?;
                }
            }
        }
        writeln!(self.writer())?;

        let notes = std::mem::take(&mut self.notes);
        for note in notes {
            match note.color {
                Some(color) => self.colored(&format!("    {}", note.text), color)?,
                None => write!(self.writer(), "    {}", note.text)?,
            }
            writeln!(self.writer())?;
        }
        Ok(())
    }

    fn file_summary(&mut self, summary: &FileSummary) -> io::Result<()> {
        writeln!(
            self.writer(),
            "  {} passed, {} failed, {} skipped, {} method(s) skipped",
            summary.passed,
            summary.failed,
            summary.skipped,
            summary.skipped_methods
        )
    }
}

impl<W: WriteColor> NotificationSink for ConsoleReporter<W> {
    fn notify(&mut self, event: &Event) {
        if let Err(error) = self.handle(event) {
            tracing::warn!(%error, "could not write report");
        }
    }

    fn acquire_capture(&mut self) {
        self.buffer = Some(if self.out.supports_color() {
            Buffer::ansi()
        } else {
            Buffer::no_color()
        });
    }

    fn release_capture(&mut self) {
        if let Some(buffer) = self.buffer.take() {
            let written = self
                .out
                .write_all(buffer.as_slice())
                .and_then(|()| self.out.flush());
            if let Err(error) = written {
                tracing::warn!(%error, "could not flush captured output");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::dispatch::Dispatcher;
    use crate::runtime::sink::MethodFault;
    use crate::testing::summary::{MethodCounters, MethodState};
    use crate::values;
    use termcolor::NoColor;

    fn reporter(verbosity: u8) -> ConsoleReporter<NoColor<Vec<u8>>> {
        ConsoleReporter::new(
            NoColor::new(Vec::new()),
            ReportOptions {
                verbosity,
                ..ReportOptions::default()
            },
        )
    }

    fn text(reporter: ConsoleReporter<NoColor<Vec<u8>>>) -> String {
        String::from_utf8(reporter.into_inner().into_inner()).unwrap()
    }

    fn finished(passed: usize, failed: usize) -> Event {
        Event::MethodFinished(MethodSummary {
            class: "MathTest".into(),
            method: "testDivision".into(),
            counters: MethodCounters {
                passed,
                failed,
                skipped: 0,
            },
            invocations: 1,
            state: MethodState::Completed,
        })
    }

    fn started() -> Event {
        Event::MethodStarted {
            class: "MathTest".into(),
            method: "testDivision".into(),
        }
    }

    #[test]
    fn test_method_line() {
        let dispatcher = Dispatcher::with_defaults().unwrap();
        let mut r = reporter(1);
        r.notify(&started());
        r.notify(&Event::Assertion(dispatcher.dispatch("assertEquals", values![1, 1])));
        r.notify(&Event::Assertion(dispatcher.dispatch("assertEquals", values![1, 2])));
        r.notify(&finished(1, 1));
        let out = text(r);
        assert!(out.starts_with("  Division"));
        assert!(out.contains(".F [  1] [  1]"), "{out}");
    }

    #[test]
    fn test_messages_at_verbosity_two() {
        let dispatcher = Dispatcher::with_defaults().unwrap();
        let mut r = reporter(2);
        r.notify(&started());
        let outcome = dispatcher.dispatch("assertFoo", values![1]);
        let line = outcome.location.line;
        r.notify(&Event::Assertion(outcome));
        r.notify(&finished(0, 0));
        let out = text(r);
        assert!(out.contains('S'));
        assert!(out.contains(&format!("line: {} >> Unknown assertion: assertFoo", line)));
    }

    #[test]
    fn test_argument_dump_with_diff() {
        let dispatcher = Dispatcher::with_defaults().unwrap();
        let outcome = dispatcher.dispatch("assertSame", values!["a\nb", "a\nc"]);
        let notes: Vec<String> = argument_dump(&outcome).into_iter().map(|n| n.text).collect();
        assert_eq!(notes[0], "      $expected = 'a\nb'");
        assert_eq!(notes[1], "      $returned = 'a\nc'");
        assert!(notes.contains(&"      -b".to_string()));
        assert!(notes.contains(&"      +c".to_string()));
    }

    #[test]
    fn test_capture_buffers_until_release() {
        let mut r = reporter(0);
        r.acquire_capture();
        r.notify(&started());
        assert!(r.out.get_ref().is_empty());
        r.release_capture();
        assert!(!r.out.get_ref().is_empty());
    }

    #[test]
    fn test_method_fault_message() {
        let mut r = reporter(2);
        r.notify(&started());
        r.notify(&Event::MethodFaulted(MethodFault {
            class: "MathTest".into(),
            method: "testDivision".into(),
            fault_class: "DivisionByZeroError".into(),
            message: "Division by zero".into(),
            location: Some(SourceLocation::new("tests/MathTest.rs", 12)),
        }));
        r.notify(&finished(0, 0));
        let out = text(r);
        assert!(out.contains("M [  0]"));
        assert!(out.contains("line: 12 >> Exception: DivisionByZeroError: Division by zero : testDivision"));
    }

    #[test]
    fn test_quiet_prints_totals_only() {
        let mut r = ConsoleReporter::new(
            NoColor::new(Vec::new()),
            ReportOptions {
                quiet: true,
                ..ReportOptions::default()
            },
        );
        r.notify(&started());
        r.notify(&finished(3, 0));
        r.finish(&Totals {
            passed: 3,
            failed: 1,
            skipped_files: 1,
            ..Totals::default()
        })
        .unwrap();
        assert_eq!(text(r), "\n    3 passed  1 failed  1 file(s) skipped \n");
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("testDivision"), "Division");
        assert_eq!(display_name("test_division"), "division");
        assert_eq!(display_name("helper"), "helper");
    }
}
