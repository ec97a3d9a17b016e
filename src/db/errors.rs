//! Document store error types
//!
//! Error codes:
//! - JSONDB_METADATA_MISSING (FATAL)
//! - JSONDB_METADATA_INVALID (FATAL)
//! - JSONDB_SCHEMA_VIOLATION (ERROR)
//! - JSONDB_STATE_VIOLATION (ERROR)
//! - JSONDB_PARSE_FAILURE (ERROR)
//! - JSONDB_IO_FAILURE (ERROR)
//! - JSONDB_SEQUENCE_EXHAUSTED (ERROR)
//!
//! None of these are retried internally. After any failure the caller
//! re-opens the store with `begin()` before trying again.

use std::error::Error as StdError;
use std::fmt;
use std::io;
use std::path::Path;

use crate::json::ParseError;
use crate::schema::{SchemaError, SchemaErrorCode};

/// Severity levels for store errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The operation fails, the store stays usable
    Error,
    /// The store cannot be constructed
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Store error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbErrorCode {
    /// No metadata file
    MetadataMissing,
    /// Malformed entity/column declarations, missing or non-int key column
    MetadataInvalid,
    /// Record type or stored row disagrees with the metadata
    SchemaViolation,
    /// `begin` while open, `end` or CRUD while closed
    StateViolation,
    /// Malformed data document
    ParseFailure,
    /// File unreadable or unwritable
    IoFailure,
    /// A sequence counter would overflow
    SequenceExhausted,
}

impl DbErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            DbErrorCode::MetadataMissing => "JSONDB_METADATA_MISSING",
            DbErrorCode::MetadataInvalid => "JSONDB_METADATA_INVALID",
            DbErrorCode::SchemaViolation => "JSONDB_SCHEMA_VIOLATION",
            DbErrorCode::StateViolation => "JSONDB_STATE_VIOLATION",
            DbErrorCode::ParseFailure => "JSONDB_PARSE_FAILURE",
            DbErrorCode::IoFailure => "JSONDB_IO_FAILURE",
            DbErrorCode::SequenceExhausted => "JSONDB_SEQUENCE_EXHAUSTED",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            DbErrorCode::MetadataMissing | DbErrorCode::MetadataInvalid => Severity::Fatal,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for DbErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Store error with a human-readable cause
#[derive(Debug)]
pub struct DbError {
    code: DbErrorCode,
    message: String,
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl DbError {
    fn new(code: DbErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Metadata file does not exist
    pub fn metadata_missing(path: &Path) -> Self {
        Self::new(
            DbErrorCode::MetadataMissing,
            format!("Metadata file does not exist: {}", path.display()),
        )
    }

    /// Metadata file is not valid JSON
    pub fn metadata_unparsable(path: &Path, source: ParseError) -> Self {
        Self::new(
            DbErrorCode::MetadataInvalid,
            format!("Malformed metadata file '{}': {}", path.display(), source),
        )
        .with_source(source)
    }

    /// `begin` while a transaction is open
    pub fn already_open() -> Self {
        Self::new(
            DbErrorCode::StateViolation,
            "begin was called on an opened database",
        )
    }

    /// An operation that needs an open transaction ran while closed
    pub fn not_open(operation: &str) -> Self {
        Self::new(
            DbErrorCode::StateViolation,
            format!("{} called before begin: database must be opened first", operation),
        )
    }

    /// Data file is not valid JSON
    pub fn data_unparsable(path: &Path, source: ParseError) -> Self {
        Self::new(
            DbErrorCode::ParseFailure,
            format!("Malformed data file '{}': {}", path.display(), source),
        )
        .with_source(source)
    }

    /// Data file parsed but its root is not an object
    pub fn data_not_object(path: &Path) -> Self {
        Self::new(
            DbErrorCode::ParseFailure,
            format!("Data file '{}' must contain a JSON object", path.display()),
        )
    }

    pub fn read_failed(path: &Path, source: io::Error) -> Self {
        Self::new(
            DbErrorCode::IoFailure,
            format!("Failed to read '{}': {}", path.display(), source),
        )
        .with_source(source)
    }

    pub fn write_failed(path: &Path, source: io::Error) -> Self {
        Self::new(
            DbErrorCode::IoFailure,
            format!("Failed to write '{}': {}", path.display(), source),
        )
        .with_source(source)
    }

    /// Sequence counter for an entity cannot grow further
    pub fn sequence_exhausted(entity: &str) -> Self {
        Self::new(
            DbErrorCode::SequenceExhausted,
            format!("Sequence for entity {} is exhausted", entity),
        )
    }

    pub fn code(&self) -> DbErrorCode {
        self.code
    }

    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }

    /// Returns the underlying schema error, if this wraps one
    pub fn schema_error(&self) -> Option<&SchemaError> {
        self.source.as_ref().and_then(|s| s.downcast_ref())
    }

    /// Returns the underlying parse error, if this wraps one
    pub fn parse_error(&self) -> Option<&ParseError> {
        self.source.as_ref().and_then(|s| s.downcast_ref())
    }
}

impl fmt::Display for DbError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )
    }
}

impl StdError for DbError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn StdError + 'static))
    }
}

impl From<SchemaError> for DbError {
    fn from(e: SchemaError) -> Self {
        let code = match e.code() {
            SchemaErrorCode::MetadataInvalid => DbErrorCode::MetadataInvalid,
            SchemaErrorCode::SchemaViolation => DbErrorCode::SchemaViolation,
        };
        Self::new(code, e.message().to_string()).with_source(e)
    }
}

impl From<ParseError> for DbError {
    fn from(e: ParseError) -> Self {
        Self::new(DbErrorCode::ParseFailure, e.to_string()).with_source(e)
    }
}

/// Result type for store operations
pub type DbResult<T> = Result<T, DbError>;
