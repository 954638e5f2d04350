use std::path::PathBuf;
use thiserror::Error;

/// Core error type for pkgkit operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read config at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    UnknownHash(#[from] pkgkit_util::hash::UnknownHashAlgorithm),

    #[error("Process {pid} not found in the process table")]
    ProcessNotFound { pid: u32 },

    #[error("Process {pid} has no visible parent process")]
    NoParentProcess { pid: u32 },

    #[error("Executable path of process {name} is unknown")]
    ExecutableUnknown { name: String },

    #[error("Attribute {name} is not callable")]
    NotCallable { name: String },

    #[error("Module {module} has no attribute {name}")]
    AttributeNotFound { module: String, name: String },

    #[error("{0}")]
    Other(String),
}

impl Error {
    #[must_use]
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
