//! Admissions domain: students, their exams, and the database layout for them

mod dao;
mod model;

use std::fs;
use std::path::Path;

use tracing::info;

use crate::db::{DbError, DbPaths, DbResult};

pub use dao::{ExamDao, StudentDao};
pub use model::{Exam, Student};

/// Metadata document declaring the `student` and `exam` entities
pub const DEFAULT_METADATA: &str = r#"{"entities":[{"name":"student","columns":[{"name":"id","type":"int","id":true},{"name":"name","type":"string"},{"name":"passed","type":"boolean"},{"name":"average","type":"decimal"}]},{"name":"exam","columns":[{"name":"id","type":"int","id":true},{"name":"mark","type":"decimal"},{"name":"studentId","type":"int"}]}]}"#;

/// Data document with no rows and both sequences at zero
pub const EMPTY_DATA: &str = r#"{"data":{"student":[],"exam":[]},"seq":{"student":0,"exam":0}}"#;

/// Creates the database directory with the default metadata and empty data.
///
/// Existing files are left alone; returns whether anything was written.
pub fn init_database(base: &Path) -> DbResult<bool> {
    let paths = DbPaths::from_base(base);
    fs::create_dir_all(paths.dir()).map_err(|e| DbError::write_failed(paths.dir(), e))?;

    let mut created = false;
    for (path, contents) in [
        (paths.meta_file(), DEFAULT_METADATA),
        (paths.data_file(), EMPTY_DATA),
    ] {
        if !path.exists() {
            fs::write(path, contents).map_err(|e| DbError::write_failed(path, e))?;
            info!(path = %path.display(), "created database file");
            created = true;
        }
    }
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::JsonDb;
    use tempfile::TempDir;

    #[test]
    fn test_default_documents_parse() {
        assert!(crate::json::parse(DEFAULT_METADATA).is_ok());
        assert!(crate::json::parse(EMPTY_DATA).is_ok());
    }

    #[test]
    fn test_init_creates_usable_database() {
        let tmp = TempDir::new().unwrap();
        let base = tmp.path().join("student");

        assert!(init_database(&base).unwrap());
        assert!(!init_database(&base).unwrap());

        let db = JsonDb::from_path(&base).unwrap();
        assert_eq!(db.registry().names(), vec!["exam", "student"]);
    }
}
