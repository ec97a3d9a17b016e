//! Static record descriptors
//!
//! A record type describes its own persistent shape: whether it is an entity,
//! and which of its fields are columns, with their types and the key flag.
//! The store consults the descriptor instead of inspecting the type at runtime.

use crate::schema::{ColumnType, Scalar};

/// One field of a record type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub field_type: ColumnType,
    /// Persisted as a column
    pub column: bool,
    /// Holds the entity key
    pub key: bool,
}

impl FieldDescriptor {
    /// A persisted column
    pub const fn column(name: &'static str, field_type: ColumnType) -> Self {
        Self {
            name,
            field_type,
            column: true,
            key: false,
        }
    }

    /// The key column
    pub const fn key(name: &'static str) -> Self {
        Self {
            name,
            field_type: ColumnType::Int,
            column: true,
            key: true,
        }
    }

    /// A field the store ignores
    pub const fn transient(name: &'static str, field_type: ColumnType) -> Self {
        Self {
            name,
            field_type,
            column: false,
            key: false,
        }
    }
}

/// Persistent shape of a record type
#[derive(Debug, Clone, Copy)]
pub struct RecordDescriptor {
    /// Simple type name, e.g. `Student`
    pub type_name: &'static str,
    /// Marker: only entity types may be stored
    pub entity: bool,
    pub fields: &'static [FieldDescriptor],
}

impl RecordDescriptor {
    /// Entity name used in metadata and data documents
    pub fn entity_name(&self) -> String {
        decapitalize(self.type_name)
    }

    /// Fields persisted as columns
    pub fn columns(&self) -> impl Iterator<Item = &'static FieldDescriptor> {
        self.fields.iter().filter(|f| f.column)
    }

    /// The key field, if declared
    pub fn key_field(&self) -> Option<&'static FieldDescriptor> {
        self.fields.iter().find(|f| f.column && f.key)
    }
}

/// A caller-owned value the store can read and write column by column.
///
/// The store never keeps a record past a single operation.
pub trait Record: Default {
    fn descriptor() -> &'static RecordDescriptor;

    /// Current value of a column field; `None` when unset or unknown
    fn get(&self, field: &str) -> Option<Scalar>;

    /// Sets a column field; `None` clears it. Unknown names and values of the
    /// wrong type are ignored, since the validator runs first.
    fn set(&mut self, field: &str, value: Option<Scalar>);
}

/// Lowercases the first character, unless the first two are both uppercase
/// (`Student` -> `student`, `URLEntry` -> `URLEntry`).
pub fn decapitalize(name: &str) -> String {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    if let Some(second) = chars.clone().next() {
        if first.is_uppercase() && second.is_uppercase() {
            return name.to_string();
        }
    }
    first.to_lowercase().chain(chars).collect()
}
