//! Schema metadata, validation and column codecs
//!
//! Entity metadata is loaded once, when the store is constructed, and never
//! changes afterwards. Every record access is checked against it first.
//!
//! # Rules
//!
//! - Exactly one key column per entity, of type int
//! - A record type maps to the entity named after it, decapitalized
//! - Column fields and declared columns match one-to-one by name and type
//! - Decimal columns widen integer leaves; every codec maps unset to null

pub mod codec;
mod errors;
mod loader;
mod types;
mod validator;

pub use codec::{codec_for, ColumnCodec, Scalar};
pub use errors::{SchemaError, SchemaErrorCode, SchemaResult, Severity, ValidationDetails};
pub use loader::EntityRegistry;
pub use types::{ColumnMeta, ColumnType, EntityMeta};
pub use validator::SchemaValidator;
