//! Error types for configuration loading and link creation.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading a configuration.
///
/// All of these are fatal for a run.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file does not exist.
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    /// Configuration file could not be read.
    #[error("Unable to read configuration file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is not valid JSON for the expected shape.
    #[error("Unable to parse configuration: {source}")]
    Parse {
        #[source]
        source: serde_json::Error,
    },

    /// No source directory was supplied.
    #[error("No source directory has been supplied")]
    MissingSource,

    /// No target directories were supplied.
    #[error("No target directories have been supplied")]
    MissingTargets,

    /// A link map entry is incomplete.
    #[error("Invalid link map at index {index}: {message}")]
    InvalidLinkMap { index: usize, message: String },

    /// A link map regex does not compile.
    #[error("Invalid link map regex {pattern:?}: {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Builder validation failed.
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },
}

impl ConfigError {
    /// Create a read error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Read { path, source },
        }
    }
}

/// Errors that can occur while creating a single symbolic link.
///
/// These are recoverable: the affected node stays in the residual tree and
/// the run continues.
#[derive(Debug, Error)]
pub enum LinkError {
    /// Link path has no parent directory.
    #[error("Unable to get parent directory from path {path}")]
    MissingParent { path: PathBuf },

    /// Parent directory could not be created.
    #[error("Unable to create parent directory {path}: {source}")]
    ParentDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The symlink itself could not be created.
    #[error("Unable to create symbolic link {path} -> {target}: {source}")]
    Symlink {
        path: PathBuf,
        target: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
