// src/error.rs
use std::path::PathBuf;
use thiserror::Error;

/// Misuse of the candidate tracker's start/push/finish bracketing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TrackerError {
    #[error("cannot start a search round; one is already open")]
    AlreadySearching,

    #[error("no search round is open")]
    NotSearching,
}

#[derive(Debug, Error)]
pub enum StyleFitError {
    #[error("{0}")]
    Precondition(String),

    #[error("unable to find {tool}: {detail}")]
    ToolNotFound { tool: String, detail: String },

    #[error("`{command}` exited with code {code}: {stderr}")]
    Tool {
        command: String,
        code: i32,
        stderr: String,
    },

    #[error("I/O error: {source} (path: {path})")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("unexpected {kind} output: {line:?}")]
    DiffParse { kind: &'static str, line: String },

    #[error("search state error: {0}")]
    Tracker(#[from] TrackerError),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, StyleFitError>;

// Allow `?` on std::io::Error by converting to StyleFitError::Io with unknown path.
impl From<std::io::Error> for StyleFitError {
    fn from(source: std::io::Error) -> Self {
        StyleFitError::Io {
            source,
            path: PathBuf::from("<unknown>"),
        }
    }
}

impl StyleFitError {
    /// Shorthand for a diff-parse failure on a given output line.
    #[must_use]
    pub fn diff_parse(kind: &'static str, line: &str) -> Self {
        StyleFitError::DiffParse {
            kind,
            line: line.to_string(),
        }
    }
}
