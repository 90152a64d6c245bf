//! Layered configuration.
//!
//! Values are merged with `figment`, later layers winning:
//!
//! 1. Built-in defaults ([`Config::default`])
//! 2. A TOML file: `--config PATH`, or `<library>/slurp.toml` when present
//! 3. Environment variables prefixed with `SLURP_` (e.g. `SLURP_RENAME_ON_MERGE=false`)
//! 4. Command-line flags ([`Config::apply_cli`])

use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::cli::{Cli, OutputFormat};
use crate::library::LibraryOptions;

/// Name of the per-library configuration file.
pub const LIBRARY_CONFIG_FILE: &str = "slurp.toml";

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "SLURP_";

/// Errors raised while loading configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// A configuration file named on the command line does not exist.
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    /// A layer could not be parsed or has the wrong shape.
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] Box<figment::Error>),
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Let a duplicate with a human-chosen name rename a camera-named item.
    pub rename_on_merge: bool,
    /// Report format.
    pub output: OutputFormat,
    /// Include every item and duplicate in the report.
    pub list: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rename_on_merge: true,
            output: OutputFormat::Text,
            list: false,
        }
    }
}

impl Config {
    /// Build the defaults < file < environment stack without extracting it.
    ///
    /// `file` is merged only if it exists; a missing file contributes nothing.
    #[must_use]
    pub fn figment(file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(file) = file {
            figment = figment.merge(Toml::file(file));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load configuration for the library at `library`.
    ///
    /// # Arguments
    ///
    /// * `explicit` - File given with `--config`; must exist
    /// * `library` - Library root, searched for `slurp.toml` when no file is given
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] if `explicit` does not exist and
    /// [`ConfigError::Invalid`] if any layer fails to parse.
    pub fn load(explicit: Option<&Path>, library: &Path) -> Result<Self, ConfigError> {
        let file = match explicit {
            Some(path) if !path.is_file() => {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Some(path) => Some(path.to_path_buf()),
            None => {
                let candidate = library.join(LIBRARY_CONFIG_FILE);
                candidate.is_file().then_some(candidate)
            }
        };

        if let Some(file) = &file {
            log::debug!("Loading configuration from {}", file.display());
        }
        let config = Self::figment(file.as_deref())
            .extract()
            .map_err(Box::new)?;
        Ok(config)
    }

    /// Apply command-line overrides. Flags only ever switch away from the
    /// defaults, so an absent flag leaves the lower layers in charge.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if cli.no_rename {
            self.rename_on_merge = false;
        }
        if let Some(output) = cli.output {
            self.output = output;
        }
        if cli.list {
            self.list = true;
        }
    }

    /// Library behavior derived from this configuration.
    #[must_use]
    pub fn library_options(&self) -> LibraryOptions {
        LibraryOptions {
            rename_on_merge: self.rename_on_merge,
        }
    }
}
