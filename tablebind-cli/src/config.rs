//! CLI configuration, read from `config.json` in the platform config
//! directory. Every field is optional; command line flags win.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use simplelog::LevelFilter;
use tablebind::TextOptions;

use crate::error::CliError;
use crate::paths;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// One of `off`, `error`, `warn`, `info`, `debug`, `trace`.
    pub log_level: String,

    /// Column keys used when the command line gives none.
    pub columns: Option<Vec<String>>,

    /// Text layout settings.
    pub text: TextOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            columns: None,
            text: TextOptions::default(),
        }
    }
}

impl Config {
    /// Load from `explicit`, or from the default location when it exists.
    pub fn load(explicit: Option<&Path>) -> Result<Self, CliError> {
        match explicit {
            Some(path) => Self::read(path),
            None => match paths::config_file() {
                Some(path) if path.exists() => Self::read(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    fn read(path: &Path) -> Result<Self, CliError> {
        let json = fs::read_to_string(path).map_err(|source| CliError::Io {
            path: PathBuf::from(path),
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| CliError::Config {
            path: PathBuf::from(path),
            source,
        })
    }

    pub fn level(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Info)
    }
}
