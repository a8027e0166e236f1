//! Run configuration.
//!
//! Defaults come from [`RunConfig::default`], then from an optional YAML file
//! (`assay.yaml` in the working directory, or the file given with
//! `--config`), then from command-line flags. Every field of the file is
//! optional:
//!
//! ```yaml
//! path: tests/unit
//! verbosity: 2
//! filter: parse
//! color: never
//! ```

use std::fs;
use std::path::Path;

use clap::ValueEnum;
use serde::Deserialize;
use termcolor::ColorChoice;

use crate::errors::{AssayError, Result};

/// Colour output mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Colour when stdout is a terminal.
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    pub fn choice(self) -> ColorChoice {
        match self {
            ColorMode::Auto if atty::is(atty::Stream::Stdout) => ColorChoice::Auto,
            ColorMode::Auto | ColorMode::Never => ColorChoice::Never,
            ColorMode::Always => ColorChoice::Always,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Path argument selecting the files to run.
    pub path: String,
    pub verbosity: u8,
    /// Case-insensitive pattern over method names.
    pub filter: Option<String>,
    /// Run only this method.
    pub individual: Option<String>,
    pub testdox: bool,
    pub quiet: bool,
    pub results: bool,
    pub color: ColorMode,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            path: "tests".to_string(),
            verbosity: 0,
            filter: None,
            individual: None,
            testdox: false,
            quiet: false,
            results: false,
            color: ColorMode::Auto,
        }
    }
}

impl RunConfig {
    /// Looked up in the working directory when no file is given.
    pub const FILE_NAME: &'static str = "assay.yaml";

    pub fn from_yaml(name: &str, text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).map_err(|e| AssayError::config_parse(name, text, &e))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| AssayError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Self::from_yaml(&path.display().to_string(), &text)
    }

    /// Reads `explicit` if given, otherwise `assay.yaml` when present,
    /// otherwise the defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let default = Path::new(Self::FILE_NAME);
                if default.is_file() {
                    Self::load(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = RunConfig::from_yaml("assay.yaml", "verbosity: 2\ncolor: never\n").unwrap();
        assert_eq!(config.verbosity, 2);
        assert_eq!(config.color, ColorMode::Never);
        assert_eq!(config.path, "tests");
        assert!(config.filter.is_none());
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(RunConfig::from_yaml("assay.yaml", "\n").unwrap(), RunConfig::default());
    }

    #[test]
    fn test_unknown_field_is_a_config_error() {
        let err = RunConfig::from_yaml("assay.yaml", "verbose: 3\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_missing_explicit_file() {
        let err = RunConfig::discover(Some(Path::new("does/not/exist.yaml"))).unwrap_err();
        assert!(matches!(err, AssayError::ConfigRead { .. }));
    }

    #[test]
    fn test_never_disables_colour() {
        assert_eq!(ColorMode::Never.choice(), ColorChoice::Never);
        assert_eq!(ColorMode::Always.choice(), ColorChoice::Always);
    }
}
