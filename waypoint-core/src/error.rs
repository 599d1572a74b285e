//! Error types for waypoint-core.

use std::path::PathBuf;

use thiserror::Error;

/// Why a single run file could not be loaded during a reload.
///
/// Every variant carries the offending file path so a caller can log it
/// without extra context.
#[derive(Debug, Error)]
pub enum RunLoadError {
    /// The file stem is not a UUID.
    #[error("invalid run id in file name {path}: {source}")]
    InvalidId {
        path: PathBuf,
        #[source]
        source: uuid::Error,
    },

    /// The file stem is a UUID, but not in lowercase hyphenated form.
    #[error("run file name {path} is not a lowercase hyphenated uuid")]
    NonCanonicalId { path: PathBuf },

    /// Underlying I/O failure while reading the file body.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The body is not a JSON object.
    #[error("failed to parse run file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The document has no `position_timeline` object.
    #[error("run file {path} has no position_timeline object")]
    MissingTimeline { path: PathBuf },

    /// The `position_timeline` payload did not decode.
    #[error("failed to decode position timeline in {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl RunLoadError {
    /// The run file this error refers to.
    pub fn path(&self) -> &std::path::Path {
        match self {
            RunLoadError::InvalidId { path, .. }
            | RunLoadError::NonCanonicalId { path }
            | RunLoadError::Io { path, .. }
            | RunLoadError::Parse { path, .. }
            | RunLoadError::MissingTimeline { path }
            | RunLoadError::Decode { path, .. } => path,
        }
    }
}

/// Errors from loading `~/.waypoint/config.yaml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error, with the file path and serde_yaml's line context.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// `dirs::home_dir()` returned `None` — cannot locate `~/.waypoint/`.
    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,
}
