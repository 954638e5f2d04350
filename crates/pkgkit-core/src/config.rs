use crate::error::{Error, Result};
use pkgkit_util::winpath::CYGDRIVE_PREFIX;
use pkgkit_util::HashAlgorithm;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Process-name substring skipped when walking up to the parent shell.
pub const DEFAULT_SHELL_MARKER: &str = "conda";

/// Runtime configuration for pkgkit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Current working directory.
    #[serde(skip)]
    pub cwd: PathBuf,

    /// Whether to emit JSON logs.
    pub json_logs: bool,

    /// Verbosity level (0 = INFO, 1 = DEBUG, 2+ = TRACE).
    pub verbosity: u8,

    /// Ancestors whose process name contains this are skipped by shell detection.
    pub shell_marker: String,

    /// Algorithm used by `hash` when none is given.
    pub hash_algorithm: HashAlgorithm,

    /// Mount prefix for Cygwin drive paths.
    pub cygwin_prefix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cwd: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            json_logs: false,
            verbosity: 0,
            shell_marker: DEFAULT_SHELL_MARKER.to_string(),
            hash_algorithm: HashAlgorithm::default(),
            cygwin_prefix: CYGDRIVE_PREFIX.to_string(),
        }
    }
}

impl Config {
    /// Create a new config with the given working directory.
    #[must_use]
    pub fn new(cwd: PathBuf) -> Self {
        Self {
            cwd,
            ..Default::default()
        }
    }

    /// Load settings from a JSON file. Missing fields keep their defaults.
    ///
    /// The working directory is not part of the file and is left at the
    /// process's current directory.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Default location of the config file: `<config dir>/pkgkit/config.json`.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs_next::config_dir().map(|p| p.join("pkgkit").join("config.json"))
    }

    /// Set the working directory.
    #[must_use]
    pub fn with_cwd(mut self, cwd: PathBuf) -> Self {
        self.cwd = cwd;
        self
    }

    /// Set verbosity level.
    #[must_use]
    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Set JSON log output.
    #[must_use]
    pub fn with_json_logs(mut self, json: bool) -> Self {
        self.json_logs = json;
        self
    }

    #[must_use]
    pub fn with_shell_marker(mut self, marker: impl Into<String>) -> Self {
        self.shell_marker = marker.into();
        self
    }

    #[must_use]
    pub fn with_hash_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.hash_algorithm = algorithm;
        self
    }
}
