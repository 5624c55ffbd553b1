//! Configuration for the `mdproc` binary.
//!
//! Values come from an optional `mdproc.toml`, then CLI flags override them.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration filename looked up in the working directory.
pub(crate) const CONFIG_FILENAME: &str = "mdproc.toml";

/// Path value meaning stdin for input and stdout for output.
pub(crate) const STDIO_PATH: &str = "-";

/// CLI settings that override configuration file values.
#[derive(Debug, Default)]
pub(crate) struct CliSettings {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub parallel: Option<bool>,
}

/// Resolved configuration.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub(crate) struct Config {
    /// Markdown source, `-` for stdin.
    pub input: PathBuf,
    /// HTML destination, `-` for stdout.
    pub output: PathBuf,
    /// Render paragraphs on a thread pool.
    pub parallel: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: PathBuf::from("test.md"),
            output: PathBuf::from("test.html"),
            parallel: false,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ConfigError {
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Configuration error: {0}")]
    Validation(String),
}

impl Config {
    /// Loads configuration and applies CLI settings on top.
    ///
    /// An explicit `config_path` must exist. Otherwise `mdproc.toml` in
    /// `working_dir` is used when present, and defaults when it is not.
    pub(crate) fn load(
        config_path: Option<&Path>,
        working_dir: &Path,
        cli_settings: &CliSettings,
    ) -> Result<Self, ConfigError> {
        let mut config = match config_path {
            Some(path) => {
                if !path.is_file() {
                    return Err(ConfigError::NotFound(path.to_path_buf()));
                }
                Self::from_file(path)?
            }
            None => {
                let discovered = working_dir.join(CONFIG_FILENAME);
                if discovered.is_file() {
                    Self::from_file(&discovered)?
                } else {
                    tracing::debug!("No {} found, using defaults", CONFIG_FILENAME);
                    Self::default()
                }
            }
        };
        config.apply(cli_settings);
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        tracing::debug!(path = %path.display(), "Loading configuration");
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    fn apply(&mut self, settings: &CliSettings) {
        if let Some(input) = &settings.input {
            self.input.clone_from(input);
        }
        if let Some(output) = &settings.output {
            self.output.clone_from(output);
        }
        if let Some(parallel) = settings.parallel {
            self.parallel = parallel;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        require_path(&self.input, "input")?;
        require_path(&self.output, "output")
    }
}

fn require_path(path: &Path, field: &str) -> Result<(), ConfigError> {
    if path.as_os_str().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// True for the `-` placeholder.
pub(crate) fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == STDIO_PATH
}
