//! File-backed JSON document store
//!
//! Data document layout:
//!
//! ```text
//! {"data":{"<entity>":[[col0,col1,...], ...], ...},"seq":{"<entity>":<int>, ...}}
//! ```
//!
//! Rows are positional arrays in the entity's declared column order. `seq`
//! holds the last key handed out per entity; a new key is `seq + 1`.
//!
//! # Transaction cycle
//!
//! Closed -> `begin()` -> Open -> `end(persist)` -> Closed.
//!
//! `begin` reparses the whole data file. `end(true)` rewrites the whole file;
//! `end(false)` drops every change. Nothing survives across cycles in memory.
//! Lookups are linear scans over the entity's rows.

use std::fs;
use std::path::Path;

use tracing::{debug, info, warn};

use super::errors::{DbError, DbResult};
use super::paths::DbPaths;
use crate::json::{self, Value};
use crate::record::Record;
use crate::schema::{
    EntityMeta, EntityRegistry, Scalar, SchemaError, SchemaValidator, ValidationDetails,
};

/// Contents written to a data file created on construction
const EMPTY_DOCUMENT: &str = "{}";

enum TxState {
    Closed,
    Open { root: Value },
}

/// Embedded document store over one metadata file and one data file.
///
/// One logical caller at a time; there is no internal locking.
pub struct JsonDb {
    paths: DbPaths,
    registry: EntityRegistry,
    state: TxState,
}

impl JsonDb {
    /// Opens the database in directory `base`, following the naming convention
    /// in [`DbPaths::from_base`].
    pub fn from_path(base: impl AsRef<Path>) -> DbResult<Self> {
        Self::new(DbPaths::from_base(base))
    }

    /// Loads metadata and makes sure the data file exists.
    ///
    /// The store starts Closed; no data is read until `begin`.
    ///
    /// # Errors
    ///
    /// - `MetadataMissing` if the metadata file does not exist
    /// - `IoFailure` if the data file cannot be created or metadata cannot be read
    /// - `MetadataInvalid` if metadata is malformed or an entity lacks an int key
    pub fn new(paths: DbPaths) -> DbResult<Self> {
        if !paths.meta_file().exists() {
            return Err(DbError::metadata_missing(paths.meta_file()));
        }

        let registry = Self::load_metadata(paths.meta_file())?;
        info!(
            path = %paths.meta_file().display(),
            entities = registry.len(),
            "loaded metadata"
        );

        if !paths.data_file().exists() {
            fs::write(paths.data_file(), EMPTY_DOCUMENT)
                .map_err(|e| DbError::write_failed(paths.data_file(), e))?;
            info!(path = %paths.data_file().display(), "created empty data file");
        }

        Ok(Self {
            paths,
            registry,
            state: TxState::Closed,
        })
    }

    fn load_metadata(path: &Path) -> DbResult<EntityRegistry> {
        let text = fs::read_to_string(path).map_err(|e| DbError::read_failed(path, e))?;
        let document = json::parse(&text).map_err(|e| DbError::metadata_unparsable(path, e))?;
        Ok(EntityRegistry::from_document(&document)?)
    }

    pub fn paths(&self) -> &DbPaths {
        &self.paths
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, TxState::Open { .. })
    }

    /// Reads and parses the data file, opening a transaction.
    ///
    /// On failure the store stays Closed.
    pub fn begin(&mut self) -> DbResult<()> {
        if self.is_open() {
            return Err(DbError::already_open());
        }

        let path = self.paths.data_file();
        let text = fs::read_to_string(path).map_err(|e| DbError::read_failed(path, e))?;
        let root = json::parse(&text).map_err(|e| DbError::data_unparsable(path, e))?;
        if root.as_object().is_none() {
            return Err(DbError::data_not_object(path));
        }

        debug!(path = %path.display(), bytes = text.len(), "begin");
        self.state = TxState::Open { root };
        Ok(())
    }

    /// Closes the transaction, rewriting the data file first when `persist`.
    ///
    /// The store is Closed afterwards even if the write fails. A failed write
    /// may leave a partially written file.
    pub fn end(&mut self, persist: bool) -> DbResult<()> {
        let root = match std::mem::replace(&mut self.state, TxState::Closed) {
            TxState::Open { root } => root,
            TxState::Closed => return Err(DbError::not_open("end")),
        };

        if persist {
            let path = self.paths.data_file();
            fs::write(path, root.to_json_string()).map_err(|e| DbError::write_failed(path, e))?;
        }

        debug!(persist, "end");
        Ok(())
    }

    /// Runs `f` inside `begin` / `end(persist)`.
    ///
    /// If `f` fails, the transaction is discarded and the error returned.
    pub fn transaction<T>(
        &mut self,
        persist: bool,
        f: impl FnOnce(&mut Self) -> DbResult<T>,
    ) -> DbResult<T> {
        self.begin()?;
        match f(self) {
            Ok(value) => {
                self.end(persist)?;
                Ok(value)
            }
            Err(e) => {
                warn!(error = %e, "discarding transaction");
                if self.is_open() {
                    self.end(false)?;
                }
                Err(e)
            }
        }
    }

    /// The in-memory data document of the open transaction
    pub fn document(&self) -> DbResult<&Value> {
        Self::root(&self.state, "document")
    }

    /// Returns every stored record of type `R`, in stored order.
    pub fn get_all<R: Record>(&self) -> DbResult<Vec<R>> {
        let root = Self::root(&self.state, "get_all")?;
        let meta = SchemaValidator::new(&self.registry).validate(R::descriptor())?;

        let records = match stored_rows(root, meta)? {
            Some(rows) => rows
                .iter()
                .map(|row| decode_row::<R>(meta, row))
                .collect::<DbResult<Vec<_>>>()?,
            None => Vec::new(),
        };

        debug!(entity = meta.name(), rows = records.len(), "get_all");
        Ok(records)
    }

    /// Returns the record whose key equals `id`, scanning every row.
    pub fn find<R: Record>(&self, id: i32) -> DbResult<Option<R>> {
        let records = self.get_all::<R>()?;
        let key = key_name::<R>(&self.registry)?;
        Ok(records
            .into_iter()
            .find(|record| record_key(record, &key) == Some(id)))
    }

    /// Inserts or replaces a record.
    ///
    /// An unset key is filled from the entity's sequence. Any stored row with
    /// the same key is removed and the new row appended, so an update moves the
    /// record to the end. If a column cannot be encoded, the sequence is left
    /// alone and a generated key is cleared again.
    pub fn save<R: Record>(&mut self, record: &mut R) -> DbResult<()> {
        let root = Self::root_mut(&mut self.state, "save")?;
        let meta = SchemaValidator::new(&self.registry).validate(R::descriptor())?;
        let key_name = key_column_name(meta)?;

        let generated = match record.get(&key_name) {
            None => Some(next_sequence(root, meta.name())?),
            Some(_) => None,
        };
        if let Some(next) = generated {
            record.set(&key_name, Some(Scalar::Int(next)));
        }
        let key = record_key(record, &key_name).ok_or_else(|| {
            SchemaError::violation(
                meta.name(),
                ValidationDetails::new(key_name.as_str(), "int key value", "unset"),
            )
        })?;

        let row = match encode_row(meta, record) {
            Ok(row) => row,
            Err(e) => {
                if generated.is_some() {
                    record.set(&key_name, None);
                }
                return Err(e);
            }
        };
        if let Some(next) = generated {
            store_sequence(root, meta.name(), next)?;
        }
        let rows = rows_mut(root, meta.name())?;
        if let Some(index) = position_of_key::<R>(meta, rows, &key_name, key)? {
            rows.remove(index);
        }
        rows.push(row);

        debug!(entity = meta.name(), key, rows = rows.len(), "save");
        Ok(())
    }

    /// Removes the stored row with the record's key.
    ///
    /// `None`, an unset key, or a key with no stored row are all no-ops.
    pub fn delete<R: Record>(&mut self, record: Option<&R>) -> DbResult<()> {
        let root = Self::root_mut(&mut self.state, "delete")?;
        let Some(record) = record else {
            return Ok(());
        };

        let meta = SchemaValidator::new(&self.registry).validate(R::descriptor())?;
        let key_name = key_column_name(meta)?;
        let Some(key) = record_key(record, &key_name) else {
            return Ok(());
        };

        let has_rows = stored_rows(root, meta)?.is_some();
        if !has_rows {
            return Ok(());
        }

        let rows = rows_mut(root, meta.name())?;
        if let Some(index) = position_of_key::<R>(meta, rows, &key_name, key)? {
            rows.remove(index);
            debug!(entity = meta.name(), key, "delete");
        }
        Ok(())
    }

    /// Number of stored rows for an entity in the open transaction
    pub fn row_count(&self, entity: &str) -> DbResult<usize> {
        let root = Self::root(&self.state, "row_count")?;
        Ok(root
            .get("data")
            .and_then(|data| data.get(entity))
            .and_then(Value::as_array)
            .map_or(0, <[Value]>::len))
    }

    fn root<'s>(state: &'s TxState, operation: &str) -> DbResult<&'s Value> {
        match state {
            TxState::Open { root } => Ok(root),
            TxState::Closed => Err(DbError::not_open(operation)),
        }
    }

    fn root_mut<'s>(state: &'s mut TxState, operation: &str) -> DbResult<&'s mut Value> {
        match state {
            TxState::Open { root } => Ok(root),
            TxState::Closed => Err(DbError::not_open(operation)),
        }
    }
}

fn key_column_name(meta: &EntityMeta) -> DbResult<String> {
    meta.key_column()
        .map(|c| c.name().to_string())
        .ok_or_else(|| SchemaError::missing_key_column(meta.name()).into())
}

fn key_name<R: Record>(registry: &EntityRegistry) -> DbResult<String> {
    let meta = SchemaValidator::new(registry).validate(R::descriptor())?;
    key_column_name(meta)
}

fn record_key<R: Record>(record: &R, key_name: &str) -> Option<i32> {
    record.get(key_name).and_then(|v| v.as_int())
}

fn row_violation(entity: &str, field: &str, expected: &str, actual: impl Into<String>) -> DbError {
    SchemaError::violation(entity, ValidationDetails::new(field, expected, actual)).into()
}

/// The entity's row array, or `None` when `data` or the entity entry is absent
fn stored_rows<'r>(root: &'r Value, meta: &EntityMeta) -> DbResult<Option<&'r [Value]>> {
    let Some(data) = root.get("data") else {
        return Ok(None);
    };
    if data.as_object().is_none() {
        return Err(row_violation(meta.name(), "data", "object", data.kind().name()));
    }
    match data.get(meta.name()) {
        None => Ok(None),
        Some(Value::Array(rows)) => Ok(Some(rows.as_slice())),
        Some(other) => Err(row_violation(
            meta.name(),
            meta.name(),
            "array of rows",
            other.kind().name(),
        )),
    }
}

/// The entity's row array, creating `data` and the entry when absent
fn rows_mut<'r>(root: &'r mut Value, entity: &str) -> DbResult<&'r mut Vec<Value>> {
    let data = root
        .as_object_mut()
        .map(|r| r.get_or_insert_with("data", Value::object))
        .and_then(Value::as_object_mut)
        .ok_or_else(|| row_violation(entity, "data", "object", "non-object"))?;

    data.get_or_insert_with(entity, Value::array)
        .as_array_mut()
        .ok_or_else(|| row_violation(entity, entity, "array of rows", "non-array"))
}

/// The key `seq.<entity>` would advance to; an absent counter counts as 0
fn next_sequence(root: &Value, entity: &str) -> DbResult<i32> {
    let current = match root.get("seq") {
        None => 0,
        Some(Value::Object(seq)) => match seq.get(entity) {
            None | Some(Value::Null) => 0,
            Some(Value::Int(v)) => *v,
            Some(other) => return Err(row_violation(entity, "seq", "int", other.kind().name())),
        },
        Some(other) => return Err(row_violation(entity, "seq", "object", other.kind().name())),
    };
    current
        .checked_add(1)
        .ok_or_else(|| DbError::sequence_exhausted(entity))
}

/// Records `value` as the last key handed out for `entity`
fn store_sequence(root: &mut Value, entity: &str, value: i32) -> DbResult<()> {
    let seq = root
        .as_object_mut()
        .map(|r| r.get_or_insert_with("seq", Value::object))
        .and_then(Value::as_object_mut)
        .ok_or_else(|| row_violation(entity, "seq", "object", "non-object"))?;
    seq.insert(entity, Value::Int(value));
    Ok(())
}

fn decode_row<R: Record>(meta: &EntityMeta, row: &Value) -> DbResult<R> {
    let cells = row
        .as_array()
        .ok_or_else(|| row_violation(meta.name(), "row", "array", row.kind().name()))?;

    let columns = meta.ordered_columns();
    if cells.len() > columns.len() {
        return Err(row_violation(
            meta.name(),
            "row",
            format!("at most {} cells", columns.len()).as_str(),
            format!("{} cells", cells.len()),
        ));
    }

    let mut record = R::default();
    for (cell, column) in cells.iter().zip(meta.columns_in_order()) {
        let value = column.codec().decode(cell).map_err(|mut details| {
            details.field = column.name().to_string();
            DbError::from(SchemaError::violation(meta.name(), details))
        })?;
        record.set(column.name(), value);
    }
    Ok(record)
}

fn encode_row<R: Record>(meta: &EntityMeta, record: &R) -> DbResult<Value> {
    meta.columns_in_order()
        .map(|column| {
            column
                .codec()
                .encode(record.get(column.name()).as_ref())
                .map_err(|mut details| {
                    details.field = column.name().to_string();
                    DbError::from(SchemaError::violation(meta.name(), details))
                })
        })
        .collect::<DbResult<Vec<_>>>()
        .map(Value::Array)
}

/// Index of the first row whose decoded key equals `key`
fn position_of_key<R: Record>(
    meta: &EntityMeta,
    rows: &[Value],
    key_name: &str,
    key: i32,
) -> DbResult<Option<usize>> {
    for (index, row) in rows.iter().enumerate() {
        let stored = decode_row::<R>(meta, row)?;
        if record_key(&stored, key_name) == Some(key) {
            return Ok(Some(index));
        }
    }
    Ok(None)
}
