//! Record type validation against entity metadata
//!
//! Runs before every read or write of a record type:
//! - the type is marked as an entity
//! - metadata exists under the type's decapitalized name
//! - every column field has a column of the same name and type
//! - the key field and the key column coincide
//! - the number of column fields equals the number of columns

use super::errors::{SchemaError, SchemaResult, ValidationDetails};
use super::loader::EntityRegistry;
use super::types::EntityMeta;
use crate::record::RecordDescriptor;

/// Checks record descriptors against a registry.
///
/// The validator does not mutate anything and is deterministic.
pub struct SchemaValidator<'a> {
    registry: &'a EntityRegistry,
}

impl<'a> SchemaValidator<'a> {
    pub fn new(registry: &'a EntityRegistry) -> Self {
        Self { registry }
    }

    /// Validates a record type and returns its entity metadata.
    ///
    /// # Errors
    ///
    /// Returns a `SchemaViolation` naming the entity and, where applicable,
    /// the offending field.
    pub fn validate(&self, descriptor: &RecordDescriptor) -> SchemaResult<&'a EntityMeta> {
        if !descriptor.entity {
            return Err(SchemaError::not_an_entity(descriptor.type_name));
        }

        let entity_name = descriptor.entity_name();
        let meta = self
            .registry
            .get(&entity_name)
            .ok_or_else(|| SchemaError::unknown_entity(&entity_name))?;

        let mut matched = 0;
        for field in descriptor.columns() {
            let column = meta.column(field.name).ok_or_else(|| {
                SchemaError::violation(&entity_name, ValidationDetails::missing_column(field.name))
            })?;

            if column.column_type() != field.field_type {
                return Err(SchemaError::violation(
                    &entity_name,
                    ValidationDetails::type_mismatch(
                        field.name,
                        column.column_type().tag(),
                        field.field_type.tag(),
                    ),
                ));
            }

            if column.is_key() != field.key {
                let (expected, actual) = if column.is_key() {
                    ("key field", "non-key field")
                } else {
                    ("non-key field", "key field")
                };
                return Err(SchemaError::violation(
                    &entity_name,
                    ValidationDetails::new(field.name, expected, actual),
                ));
            }

            matched += 1;
        }

        if matched != meta.column_count() {
            return Err(SchemaError::field_count_mismatch(
                &entity_name,
                meta.column_count(),
                matched,
            ));
        }

        Ok(meta)
    }
}
