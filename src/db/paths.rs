//! Database file naming
//!
//! A database lives in a directory `<base>`. With `name` the last component
//! of `<base>`:
//! - metadata: `<base>/<name>.meta.json`
//! - data: `<base>/<name>.json`

use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbPaths {
    dir: PathBuf,
    meta_file: PathBuf,
    data_file: PathBuf,
}

impl DbPaths {
    /// Derives both file paths from the database directory
    pub fn from_base(base: impl AsRef<Path>) -> Self {
        let dir = base.as_ref().to_path_buf();
        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "db".to_string());

        Self {
            meta_file: dir.join(format!("{}.meta.json", name)),
            data_file: dir.join(format!("{}.json", name)),
            dir,
        }
    }

    /// Uses explicit file locations
    pub fn new(meta_file: impl Into<PathBuf>, data_file: impl Into<PathBuf>) -> Self {
        let data_file = data_file.into();
        let dir = data_file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Self {
            dir,
            meta_file: meta_file.into(),
            data_file,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn meta_file(&self) -> &Path {
        &self.meta_file
    }

    pub fn data_file(&self) -> &Path {
        &self.data_file
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_naming_convention() {
        let paths = DbPaths::from_base("db/student");
        assert_eq!(paths.meta_file(), Path::new("db/student/student.meta.json"));
        assert_eq!(paths.data_file(), Path::new("db/student/student.json"));
        assert_eq!(paths.dir(), Path::new("db/student"));
    }

    #[test]
    fn test_explicit_files() {
        let paths = DbPaths::new("/tmp/a.meta.json", "/tmp/a.json");
        assert_eq!(paths.dir(), Path::new("/tmp"));
        assert_eq!(paths.data_file(), Path::new("/tmp/a.json"));
    }
}
