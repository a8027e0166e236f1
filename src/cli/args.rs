//! Defines the command-line arguments of a test run.
//!
//! This module uses the `clap` crate with its "derive" feature. Flags left
//! unset fall back to the configuration file, then to the defaults.

use clap::Parser;
use std::path::PathBuf;

use crate::config::{ColorMode, RunConfig};

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(name = "assay", version, about = "and I test ....")]
pub struct AssayArgs {
    /// A test file, a directory, or a pattern with `*`. Defaults to `tests`.
    pub path: Option<String>,

    /// Increase verbosity (-v counts, -vv messages, -vvv argument dumps).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only run methods whose name matches this case-insensitive pattern.
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Only run this method (the `test` prefix is optional).
    #[arg(short, long)]
    pub individual: Option<String>,

    /// Method names only, no progress characters.
    #[arg(short, long)]
    pub testdox: bool,

    /// Print the totals line only.
    #[arg(short, long, conflicts_with = "results")]
    pub quiet: bool,

    /// Print the run summary as JSON instead of progress output.
    #[arg(short, long)]
    pub results: bool,

    #[arg(long, value_enum)]
    pub color: Option<ColorMode>,

    /// Read defaults from this YAML file instead of `assay.yaml`.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// List the registered assertion keys and exit.
    #[arg(long)]
    pub list: bool,
}

impl AssayArgs {
    /// Applies the flags given on the command line over `config`.
    pub fn apply(&self, mut config: RunConfig) -> RunConfig {
        if let Some(path) = &self.path {
            config.path = path.clone();
        }
        if self.verbose > 0 {
            config.verbosity = self.verbose;
        }
        if self.filter.is_some() {
            config.filter = self.filter.clone();
        }
        if self.individual.is_some() {
            config.individual = self.individual.clone();
        }
        config.testdox |= self.testdox;
        config.quiet |= self.quiet;
        config.results |= self.results;
        if let Some(color) = self.color {
            config.color = color;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_file() {
        let args = AssayArgs::parse_from(["assay", "tests/unit", "-vv", "-f", "parse"]);
        let file = RunConfig {
            verbosity: 1,
            filter: Some("other".into()),
            testdox: true,
            ..RunConfig::default()
        };
        let config = args.apply(file);
        assert_eq!(config.path, "tests/unit");
        assert_eq!(config.verbosity, 2);
        assert_eq!(config.filter.as_deref(), Some("parse"));
        assert!(config.testdox);
    }

    #[test]
    fn test_unset_flags_keep_defaults() {
        let config = AssayArgs::parse_from(["assay"]).apply(RunConfig::default());
        assert_eq!(config, RunConfig::default());
    }

    #[test]
    fn test_quiet_and_results_conflict() {
        assert!(AssayArgs::try_parse_from(["assay", "-q", "-r"]).is_err());
    }
}
