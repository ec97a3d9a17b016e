//! Entity registry built from the metadata document
//!
//! Metadata layout:
//!
//! ```text
//! {"entities":[{"name":"student","columns":[{"name":"id","type":"int","id":true}, ...]}, ...]}
//! ```
//!
//! Every entity must declare exactly one key column, and it must be an int
//! column. Any violation fails the whole load.

use std::collections::HashMap;

use super::errors::{SchemaError, SchemaResult};
use super::types::{ColumnMeta, ColumnType, EntityMeta};
use crate::json::{Map, Value};

/// Immutable set of entity metadata, keyed by entity name
#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
    entities: HashMap<String, EntityMeta>,
}

impl EntityRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the registry from a parsed metadata document.
    ///
    /// # Errors
    ///
    /// Returns a fatal `SchemaError` if the document shape is wrong, a column
    /// type is unsupported, or an entity's key column is missing, repeated or
    /// not an int.
    pub fn from_document(document: &Value) -> SchemaResult<Self> {
        let root = document
            .as_object()
            .ok_or_else(|| SchemaError::metadata_invalid("Metadata document must be an object"))?;

        let entities = root
            .get("entities")
            .and_then(Value::as_array)
            .ok_or_else(|| SchemaError::metadata_invalid("Missing 'entities' array"))?;

        let mut registry = Self::new();
        for entity in entities {
            let entity = entity.as_object().ok_or_else(|| {
                SchemaError::metadata_invalid("Entity declaration must be an object")
            })?;
            registry.register(Self::entity_meta(entity)?)?;
        }

        Ok(registry)
    }

    /// Registers one entity after checking its key column.
    pub fn register(&mut self, meta: EntityMeta) -> SchemaResult<()> {
        Self::check_key_column(&meta)?;

        if self.entities.contains_key(meta.name()) {
            return Err(SchemaError::metadata_invalid(format!(
                "Entity declared more than once: {}",
                meta.name()
            )));
        }

        self.entities.insert(meta.name().to_string(), meta);
        Ok(())
    }

    /// Gets entity metadata by entity name
    pub fn get(&self, name: &str) -> Option<&EntityMeta> {
        self.entities.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entities.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Entity names in sorted order
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.entities.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    fn entity_meta(entity: &Map) -> SchemaResult<EntityMeta> {
        let name = required_str(entity, "name", "entity")?;
        let columns = entity
            .get("columns")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                SchemaError::metadata_invalid(format!("Missing 'columns' array in entity {}", name))
            })?;

        let columns = columns
            .iter()
            .map(|column| {
                let column = column.as_object().ok_or_else(|| {
                    SchemaError::metadata_invalid(format!(
                        "Column declaration must be an object in entity {}",
                        name
                    ))
                })?;
                Self::column_meta(name, column)
            })
            .collect::<SchemaResult<Vec<_>>>()?;

        Ok(EntityMeta::new(name, columns))
    }

    fn column_meta(entity: &str, column: &Map) -> SchemaResult<ColumnMeta> {
        let name = required_str(column, "name", entity)?;
        let tag = required_str(column, "type", entity)?;
        let column_type = ColumnType::from_tag(tag)
            .ok_or_else(|| SchemaError::unsupported_column_type(entity, name, tag))?;

        let key = match column.get("id") {
            None | Some(Value::Null) => false,
            Some(Value::Bool(flag)) => *flag,
            Some(other) => {
                return Err(SchemaError::metadata_invalid(format!(
                    "Column '{}' in entity {} has a non-boolean 'id' flag: {}",
                    name, entity, other
                )))
            }
        };

        Ok(ColumnMeta::new(name, column_type, key))
    }

    fn check_key_column(meta: &EntityMeta) -> SchemaResult<()> {
        match meta.key_column_count() {
            0 => return Err(SchemaError::missing_key_column(meta.name())),
            1 => {}
            _ => return Err(SchemaError::multiple_key_columns(meta.name())),
        }

        if let Some(key) = meta.key_column() {
            if key.codec().column_type() != ColumnType::Int {
                return Err(SchemaError::key_not_int(
                    meta.name(),
                    key.name(),
                    key.column_type().tag(),
                ));
            }
        }
        Ok(())
    }
}

fn required_str<'a>(object: &'a Map, property: &str, owner: &str) -> SchemaResult<&'a str> {
    object
        .get(property)
        .and_then(Value::as_str)
        .ok_or_else(|| {
            SchemaError::metadata_invalid(format!(
                "Missing string property '{}' in {}",
                property, owner
            ))
        })
}
