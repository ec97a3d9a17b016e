//! Schema error types
//!
//! Error codes:
//! - JSONDB_METADATA_INVALID (FATAL): malformed entity/column declarations
//! - JSONDB_SCHEMA_VIOLATION (REJECT): a record type or stored row disagrees
//!   with its entity metadata

use std::fmt;

/// Severity levels for schema errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The operation is rejected, the store stays usable
    Reject,
    /// The store cannot be constructed
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Schema-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// Metadata document is structurally wrong
    MetadataInvalid,
    /// Record type or stored row does not match its metadata
    SchemaViolation,
}

impl SchemaErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::MetadataInvalid => "JSONDB_METADATA_INVALID",
            SchemaErrorCode::SchemaViolation => "JSONDB_SCHEMA_VIOLATION",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            SchemaErrorCode::MetadataInvalid => Severity::Fatal,
            SchemaErrorCode::SchemaViolation => Severity::Reject,
        }
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Field-level detail for a schema violation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDetails {
    /// Field or column name
    pub field: String,
    /// Expected type or condition
    pub expected: String,
    /// What was found instead
    pub actual: String,
}

impl ValidationDetails {
    pub fn new(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn missing_column(field: impl Into<String>) -> Self {
        Self::new(field, "a declared column", "no column metadata")
    }

    pub fn type_mismatch(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::new(field, expected, actual)
    }
}

impl fmt::Display for ValidationDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "field '{}': expected {}, got {}",
            self.field, self.expected, self.actual
        )
    }
}

/// Schema error with entity context
#[derive(Debug, Clone)]
pub struct SchemaError {
    code: SchemaErrorCode,
    message: String,
    entity: Option<String>,
    details: Option<ValidationDetails>,
}

impl SchemaError {
    fn new(code: SchemaErrorCode, message: String, entity: Option<String>) -> Self {
        Self {
            code,
            message,
            entity,
            details: None,
        }
    }

    fn with_details(mut self, details: ValidationDetails) -> Self {
        self.details = Some(details);
        self
    }

    /// Malformed metadata document
    pub fn metadata_invalid(reason: impl Into<String>) -> Self {
        Self::new(SchemaErrorCode::MetadataInvalid, reason.into(), None)
    }

    /// Entity declares no key column
    pub fn missing_key_column(entity: impl Into<String>) -> Self {
        let entity = entity.into();
        Self::new(
            SchemaErrorCode::MetadataInvalid,
            format!("Entity does not have a key column: {}", entity),
            Some(entity),
        )
    }

    /// Entity declares more than one key column
    pub fn multiple_key_columns(entity: impl Into<String>) -> Self {
        let entity = entity.into();
        Self::new(
            SchemaErrorCode::MetadataInvalid,
            format!("Entity declares more than one key column: {}", entity),
            Some(entity),
        )
    }

    /// Key column is not an int column
    pub fn key_not_int(entity: impl Into<String>, column: &str, actual: &str) -> Self {
        let entity = entity.into();
        Self::new(
            SchemaErrorCode::MetadataInvalid,
            format!("Key column can only be of type int: {}", entity),
            Some(entity),
        )
        .with_details(ValidationDetails::type_mismatch(column, "int", actual))
    }

    /// Column declares a type tag with no codec
    pub fn unsupported_column_type(entity: impl Into<String>, column: &str, tag: &str) -> Self {
        let entity = entity.into();
        Self::new(
            SchemaErrorCode::MetadataInvalid,
            format!("Unsupported column type '{}' in entity {}", tag, entity),
            Some(entity),
        )
        .with_details(ValidationDetails::type_mismatch(
            column,
            "int, string, boolean or decimal",
            tag,
        ))
    }

    /// Record type is not marked as an entity
    pub fn not_an_entity(type_name: &str) -> Self {
        Self::new(
            SchemaErrorCode::SchemaViolation,
            format!("Object is not an entity: {}", type_name),
            None,
        )
    }

    /// No metadata entry for the record type
    pub fn unknown_entity(entity: impl Into<String>) -> Self {
        let entity = entity.into();
        Self::new(
            SchemaErrorCode::SchemaViolation,
            format!("No metadata was found for entity: {}", entity),
            Some(entity),
        )
    }

    /// A record field, row cell or key binding disagrees with the metadata
    pub fn violation(entity: impl Into<String>, details: ValidationDetails) -> Self {
        let entity = entity.into();
        Self::new(
            SchemaErrorCode::SchemaViolation,
            format!("Schema violation in entity {}: {}", entity, details),
            Some(entity),
        )
        .with_details(details)
    }

    /// Declared field count differs from the column count
    pub fn field_count_mismatch(entity: impl Into<String>, columns: usize, fields: usize) -> Self {
        let entity = entity.into();
        Self::new(
            SchemaErrorCode::SchemaViolation,
            format!(
                "Number of declared fields and metadata fields do not match in entity {}: \
                 {} columns, {} fields",
                entity, columns, fields
            ),
            Some(entity),
        )
    }

    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the entity name if applicable
    pub fn entity(&self) -> Option<&str> {
        self.entity.as_deref()
    }

    /// Returns validation details if applicable
    pub fn details(&self) -> Option<&ValidationDetails> {
        self.details.as_ref()
    }

    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for SchemaError {
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

impl std::error::Error for SchemaError {}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;
