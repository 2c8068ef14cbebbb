use std::path::PathBuf;

use thiserror::Error;

/// Why a description cannot be stored.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DescriptionError {
    #[error("description must not be empty")]
    Empty,

    #[error("description must not contain '|'")]
    ContainsSeparator,

    #[error("description must fit on a single line")]
    ContainsLineBreak,
}

/// A single line of the backing file that could not be decoded.
#[derive(Debug, Error)]
pub enum LineError {
    #[error("expected 2 fields separated by '|', found {0}")]
    FieldCount(usize),

    #[error("invalid due date: {0}")]
    DueDate(#[from] chrono::ParseError),
}

/// Errors raised by the task store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed
    #[error("failed to access task file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The backing file holds a line that is not `description|YYYY-MM-DD HH:MM:SS`
    #[error("malformed task file {path} at line {line}: {source}")]
    Malformed {
        path: PathBuf,
        line: usize,
        source: LineError,
    },

    #[error("invalid task: {0}")]
    InvalidDescription(#[from] DescriptionError),
}

/// Errors raised by the task list when applying user input.
#[derive(Debug, Error)]
pub enum PanelError {
    #[error("Please enter the date in the format YYYY-MM-DD HH:MM:SS (got {input:?})")]
    InvalidDueDate {
        input: String,
        source: chrono::ParseError,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A countdown string that is not `{d}d {h}h {m}m {s}s`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid countdown {text:?}")]
pub struct CountdownParseError {
    pub text: String,
}
