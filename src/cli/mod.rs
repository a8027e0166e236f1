//! The assay command-line interface.
//!
//! A test binary builds its [`Suite`] and hands it to [`run`]:
//!
//! ```rust,no_run
//! use assay::{Suite, TestClass, TestFile};
//!
//! fn main() -> std::process::ExitCode {
//!     let suite = Suite::new().file(TestFile::new("tests/MathTest.rs", || {
//!         TestClass::new("MathTest", || Ok(())).test("testAdd", |_, cx| {
//!             cx.equals(4, 2 + 2);
//!             Ok(())
//!         })
//!     }));
//!     assay::cli::run(&suite)
//! }
//! ```
//!
//! Exit status: 0 when every assertion passed and nothing was skipped, 1
//! otherwise, 2 when the run could not start (bad configuration or filter).

use std::io;
use std::process::ExitCode;

use clap::Parser;
use termcolor::{Color, ColorSpec, StandardStream, WriteColor};
use tracing_subscriber::EnvFilter;

use crate::cli::args::AssayArgs;
use crate::cli::output::{ConsoleReporter, ReportOptions};
use crate::config::RunConfig;
use crate::errors::{AssayError, Result};
use crate::fault::Fault;
use crate::predicates::PredicateRegistry;
use crate::runtime::dispatch::Dispatcher;
use crate::runtime::sink::NullSink;
use crate::testing::discovery::MethodFilter;
use crate::testing::runner::SuiteRunner;
use crate::testing::suite::Suite;
use crate::testing::summary::Totals;

pub mod args;
pub mod output;

/// Environment variable holding the log filter, e.g. `ASSAY_LOG=assay=debug`.
pub const LOG_ENV: &str = "ASSAY_LOG";

/// The main entry point for the CLI.
pub fn run(suite: &Suite) -> ExitCode {
    init_logging();
    Fault::quiet_contained_panics();
    let args = AssayArgs::parse();

    match execute(&args, suite) {
        Ok(totals) if totals.is_clean() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::from(1),
        Err(error) => {
            eprintln!("{:?}", miette::Report::new(error));
            ExitCode::from(2)
        }
    }
}

/// Installs the stderr log subscriber. Later calls are no-ops.
pub fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Runs `suite` as configured by `args` and returns the totals.
pub fn execute(args: &AssayArgs, suite: &Suite) -> Result<Totals> {
    let config = args.apply(RunConfig::discover(args.config.as_deref())?);
    tracing::debug!(?config, "starting run");
    let dispatcher = Dispatcher::with_defaults()?;

    if args.list {
        list_assertions(&dispatcher, &config)?;
        return Ok(Totals::default());
    }

    let filter = MethodFilter::new(config.filter.as_deref(), config.individual.as_deref())?;

    if config.results {
        let summary = SuiteRunner::new(&dispatcher, &mut NullSink, filter).run(suite, &config.path);
        let json = serde_json::to_string_pretty(&summary).map_err(|e| AssayError::Io {
            context: "could not serialize results".to_string(),
            source: e.into(),
        })?;
        println!("{}", json);
        return Ok(summary.totals());
    }

    let stdout = StandardStream::stdout(config.color.choice());
    let mut reporter = ConsoleReporter::new(stdout, ReportOptions::from(&config));
    let summary = SuiteRunner::new(&dispatcher, &mut reporter, filter).run(suite, &config.path);
    let totals = summary.totals();
    reporter.finish(&totals).map_err(|source| AssayError::Io {
        context: "could not write report".to_string(),
        source,
    })?;
    Ok(totals)
}

/// Prints every assertion key with its parameters.
fn list_assertions(dispatcher: &Dispatcher, config: &RunConfig) -> Result<()> {
    let mut stdout = StandardStream::stdout(config.color.choice());
    write_assertion_list(&mut stdout, dispatcher.registry()).map_err(|source| AssayError::Io {
        context: "could not write assertion list".to_string(),
        source,
    })
}

fn write_assertion_list(out: &mut impl WriteColor, registry: &PredicateRegistry) -> io::Result<()> {
    for name in registry.names() {
        let Some(definition) = registry.lookup(&name) else {
            continue;
        };
        out.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)))?;
        write!(out, "assert[Not]{}", name)?;
        out.reset()?;
        writeln!(out, "({})", definition.params().join(", "))?;
    }
    out.flush()
}
