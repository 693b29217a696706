use std::path::PathBuf;

use thiserror::Error;
use uuid::Uuid;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ToolError>;

/// Error type covering the different failure cases that can occur when the
/// tool ingests, transforms, persists, or publishes curricula.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when JSON parsing or serialization fails.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Raised when a CSV source cannot be decoded.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Errors bubbled up from the Excel writer implementation.
    #[error("Excel write error: {0}")]
    ExcelWrite(#[from] rust_xlsxwriter::XlsxError),

    /// Errors bubbled up from the workbook reader implementation.
    #[error("workbook read error: {0}")]
    ExcelRead(#[from] calamine::Error),

    /// Raised when a sheet does not follow the expected conventions.
    #[error("invalid workbook structure: {0}")]
    InvalidWorkbook(String),

    /// Raised when two units of one run would be written to the same file.
    #[error("output file {0} already written in this run")]
    OutputCollision(PathBuf),

    /// Raised when the document store rejects an operation.
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    /// Raised when the user provides a path that does not exist.
    #[error("source not found: {0}")]
    SourceNotFound(PathBuf),

    /// Raised when a named tech stack is not present in the store.
    #[error("tech stack '{0}' not found")]
    UnknownTechStack(String),

    /// Raised when a roadmap identifier does not resolve.
    #[error("roadmap {0} not found")]
    UnknownRoadmap(Uuid),

    /// Raised when a roadmap item identifier does not resolve inside a stack.
    #[error("roadmap item {item} not found in tech stack '{stack}'")]
    UnknownRoadmapItem { stack: String, item: Uuid },

    /// Raised when an edit would introduce a second item with the same topic.
    #[error("topic '{topic}' already exists in tech stack '{stack}'")]
    DuplicateTopic { stack: String, topic: String },

    /// Raised when a blob path is empty or escapes the publish root.
    #[error("invalid blob path '{0}'")]
    InvalidBlobPath(String),

    /// Raised when a required text field is blank.
    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}

/// Failures surfaced by a [`Store`](crate::store::Store) implementation.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// A unique key (tech stack name) is already owned by another record.
    #[error("conflict: {0}")]
    Conflict(String),

    /// A replace or delete targeted a record that does not exist.
    #[error("record {0} does not exist")]
    NotFound(Uuid),

    /// The backing medium could not be read or written.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
