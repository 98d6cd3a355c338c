// SPDX-License-Identifier: MIT
//
// Configuration — `config.toml`.
//
// Looked up at `<config_dir>/keyano/config.toml` unless `--config` names a
// file. A missing default file means defaults; a missing `--config` file is
// an error. Unknown keys are rejected so typos do not pass silently.
//
//   default_selector = "line"   # char | word | number | line | parentheses
//   notices = false             # print "no left/right bound found" advisories
//   log = "keyano_core=debug"   # tracing filter, below KEYANO_LOG / RUST_LOG

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use keyano_core::Selector;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Selector for editors that have not picked one yet.
    pub default_selector: Selector,

    /// Whether advisory notices are printed.
    pub notices: bool,

    /// Tracing filter used when neither `KEYANO_LOG` nor `RUST_LOG` is set.
    pub log: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_selector: Selector::Word,
            notices: true,
            log: None,
        }
    }
}

impl Config {
    /// Read and deserialize a TOML config file.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or is not a valid configuration.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    /// `<config_dir>/keyano/config.toml`, if the platform has a config dir.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("keyano").join("config.toml"))
    }

    /// Load with priority: explicit path > default path if it exists >
    /// built-in defaults.
    ///
    /// # Errors
    ///
    /// Fails if the chosen file cannot be read or parsed.
    pub fn load_with_override(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }
}
