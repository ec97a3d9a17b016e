//! Entity and column metadata
//!
//! Supported column types:
//! - int: 32-bit signed integer (the only type allowed for key columns)
//! - string: UTF-8 string
//! - boolean: Boolean
//! - decimal: 64-bit floating point

use std::collections::HashMap;
use std::fmt;

use super::codec::{codec_for, ColumnCodec};

/// Declared column type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Int,
    String,
    Boolean,
    Decimal,
}

impl ColumnType {
    /// Resolves a metadata type tag
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "int" => Some(ColumnType::Int),
            "string" => Some(ColumnType::String),
            "boolean" => Some(ColumnType::Boolean),
            "decimal" => Some(ColumnType::Decimal),
            _ => None,
        }
    }

    /// Returns the tag as written in metadata documents
    pub fn tag(&self) -> &'static str {
        match self {
            ColumnType::Int => "int",
            ColumnType::String => "string",
            ColumnType::Boolean => "boolean",
            ColumnType::Decimal => "decimal",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// One declared column of an entity
#[derive(Clone)]
pub struct ColumnMeta {
    name: String,
    column_type: ColumnType,
    key: bool,
    codec: &'static dyn ColumnCodec,
}

impl ColumnMeta {
    pub fn new(name: impl Into<String>, column_type: ColumnType, key: bool) -> Self {
        Self {
            name: name.into(),
            column_type,
            key,
            codec: codec_for(column_type),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }

    pub fn is_key(&self) -> bool {
        self.key
    }

    /// Converter between native values and JSON leaves for this column
    pub fn codec(&self) -> &'static dyn ColumnCodec {
        self.codec
    }
}

impl fmt::Debug for ColumnMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnMeta")
            .field("name", &self.name)
            .field("column_type", &self.column_type)
            .field("key", &self.key)
            .finish()
    }
}

/// Declared schema of one entity.
///
/// Built once when metadata is loaded and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct EntityMeta {
    name: String,
    columns: HashMap<String, ColumnMeta>,
    /// Positional row layout
    ordered_columns: Vec<String>,
}

impl EntityMeta {
    /// Creates entity metadata from columns in declared order.
    ///
    /// A repeated column name keeps its first position and its last declaration.
    pub fn new(name: impl Into<String>, columns: Vec<ColumnMeta>) -> Self {
        let mut ordered_columns = Vec::with_capacity(columns.len());
        let mut by_name = HashMap::with_capacity(columns.len());
        for column in columns {
            if !by_name.contains_key(column.name()) {
                ordered_columns.push(column.name().to_string());
            }
            by_name.insert(column.name().to_string(), column);
        }

        Self {
            name: name.into(),
            columns: by_name,
            ordered_columns,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column(&self, name: &str) -> Option<&ColumnMeta> {
        self.columns.get(name)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Column names in positional row order
    pub fn ordered_columns(&self) -> &[String] {
        &self.ordered_columns
    }

    /// Columns in positional row order
    pub fn columns_in_order(&self) -> impl Iterator<Item = &ColumnMeta> {
        self.ordered_columns
            .iter()
            .filter_map(move |name| self.columns.get(name))
    }

    /// Returns the first key column, if any
    pub fn key_column(&self) -> Option<&ColumnMeta> {
        self.columns_in_order().find(|c| c.is_key())
    }

    /// Position of the key column in a row
    pub fn key_position(&self) -> Option<usize> {
        self.columns_in_order().position(|c| c.is_key())
    }

    pub(crate) fn key_column_count(&self) -> usize {
        self.columns.values().filter(|c| c.is_key()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student_meta() -> EntityMeta {
        EntityMeta::new(
            "student",
            vec![
                ColumnMeta::new("id", ColumnType::Int, true),
                ColumnMeta::new("name", ColumnType::String, false),
                ColumnMeta::new("passed", ColumnType::Boolean, false),
                ColumnMeta::new("average", ColumnType::Decimal, false),
            ],
        )
    }

    #[test]
    fn test_type_tags() {
        for tag in ["int", "string", "boolean", "decimal"] {
            assert_eq!(ColumnType::from_tag(tag).unwrap().tag(), tag);
        }
        assert_eq!(ColumnType::from_tag("float"), None);
    }

    #[test]
    fn test_ordered_layout() {
        let meta = student_meta();
        assert_eq!(meta.ordered_columns(), ["id", "name", "passed", "average"]);
        assert_eq!(meta.column_count(), 4);
    }

    #[test]
    fn test_key_column_lookup() {
        let meta = student_meta();
        assert_eq!(meta.key_column().unwrap().name(), "id");
        assert_eq!(meta.key_position(), Some(0));
        assert_eq!(meta.key_column_count(), 1);
    }

    #[test]
    fn test_codec_follows_type() {
        let meta = student_meta();
        let average = meta.column("average").unwrap();
        assert_eq!(average.codec().column_type(), ColumnType::Decimal);
    }
}
