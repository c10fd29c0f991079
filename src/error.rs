use std::path::PathBuf;

use thiserror::Error;

/// The main error type for the `rotolog` library.
#[derive(Debug, Error)]
pub enum Error {
  #[error("failed to check existence of {path:?}: {source}")]
  Probe {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to create directory {path:?}: {source}")]
  CreateDir {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to open {path:?} for append: {source}")]
  Open {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to create exclusivity marker {path:?}: {source}")]
  Lock {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to create symlink {path:?}: {source}")]
  Symlink {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to move {from:?} over {to:?}: {source}")]
  Rename {
    from: PathBuf,
    to: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to append to {path:?}: {source}")]
  Append {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to resolve absolute path for {path:?}: {source}")]
  Resolve {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to sync {path:?} on close: {source}")]
  Close {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("invalid retention scan pattern '{pattern}': {source}")]
  Scan {
    pattern: String,
    #[source]
    source: glob::PatternError,
  },

  #[error("failed to read configuration file {path:?}: {source}")]
  ConfigRead {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to parse configuration: {0}")]
  ConfigParse(String),

  #[error("invalid configuration value for '{field}': {message}")]
  InvalidConfigValue { field: String, message: String },
}

/// A specialized `Result` type for `rotolog` operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
