//! Error types shared by the ingestion pipeline.
//!
//! Only [`LinesqlError::Line`] is ever recovered from locally, and only when
//! the run ignores wrong lines. Everything else halts the run.

use std::fmt;

use duckdb::arrow::error::ArrowError;

/// Which side of the schema a rejected line fell on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineErrorKind {
    TooLong,
    TooShort,
}

impl LineErrorKind {
    pub fn as_str(&self) -> &str {
        match self {
            LineErrorKind::TooLong => "long",
            LineErrorKind::TooShort => "short",
        }
    }
}

/// A line whose field count could not be reconciled with the schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineError {
    /// Physical line number, counted across every input consumed so far.
    pub line: usize,
    pub kind: LineErrorKind,
    pub observed: usize,
    pub expected: usize,
}

impl fmt::Display for LineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Line {} too {} ({}/{})",
            self.line,
            self.kind.as_str(),
            self.observed,
            self.expected
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LinesqlError {
    /// Bad column list, name collision, invalid delimiter pattern and friends.
    #[error("configuration error: {0}")]
    Config(String),

    /// Escalated line reconciliation failure.
    #[error("{0}")]
    Line(LineError),

    /// Any failure reported by the storage engine.
    #[error("storage error: {0}")]
    Storage(String),

    #[error("reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("schema file {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl LinesqlError {
    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config(detail.into())
    }

    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// `true` for the kinds that abort a run regardless of line policy.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, LinesqlError::Line(_))
    }
}

impl From<duckdb::Error> for LinesqlError {
    fn from(e: duckdb::Error) -> Self {
        LinesqlError::Storage(e.to_string())
    }
}

impl From<ArrowError> for LinesqlError {
    fn from(e: ArrowError) -> Self {
        LinesqlError::Storage(e.to_string())
    }
}

impl From<LineError> for LinesqlError {
    fn from(e: LineError) -> Self {
        LinesqlError::Line(e)
    }
}

pub type Result<T> = std::result::Result<T, LinesqlError>;
