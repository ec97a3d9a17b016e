//! CLI command implementations
//!
//! Every command resolves the configuration, opens the database at
//! `db_path` and returns one JSON document for stdout.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map as JsonMap, Value as JsonValue};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::admissions::{self, Exam, ExamDao, Student, StudentDao};
use crate::db::JsonDb;

use super::args::{Cli, Command, ExamAction, StudentAction};
use super::errors::{CliError, CliResult};
use super::io::{write_output, Output};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Database base path (required)
    pub db_path: String,

    /// Log level for stderr output (optional, default "warn")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Config file if present, with `--db` taking precedence over `db_path`.
    ///
    /// Without a config file, `--db` alone is enough.
    pub fn resolve(path: &Path, db_override: Option<&Path>) -> CliResult<Self> {
        let mut config = match db_override {
            Some(_) if !path.exists() => Config {
                db_path: String::new(),
                log_level: default_log_level(),
            },
            _ => Self::load(path)?,
        };

        if let Some(db) = db_override {
            config.db_path = db.to_string_lossy().into_owned();
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.db_path.trim().is_empty() {
            return Err(CliError::config_error("db_path must not be empty"));
        }

        if !LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(CliError::config_error(format!(
                "Invalid log_level: '{}'. Must be one of {}.",
                self.log_level,
                LOG_LEVELS.join(", ")
            )));
        }

        Ok(())
    }

    pub fn db_path(&self) -> &Path {
        Path::new(&self.db_path)
    }
}

/// Parse arguments, run the command and print its output
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cli: Cli) -> CliResult<()> {
    let config = Config::resolve(&cli.config, cli.db.as_deref())?;
    init_tracing(&config.log_level);
    debug!(db_path = %config.db_path, "configuration resolved");

    let output = match cli.command {
        Command::Init => init(&config)?,
        Command::Check => check(&config)?,
        Command::Dump => dump(&config)?,
        Command::Students { action } => students(&config, action)?,
        Command::Exams { action } => exams(&config, action)?,
    };

    write_output(&output)
}

/// `RUST_LOG` wins over the configured level
fn init_tracing(level: &str) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn open(config: &Config) -> CliResult<JsonDb> {
    Ok(JsonDb::from_path(config.db_path())?)
}

/// Create the metadata and data files under `db_path`
pub fn init(config: &Config) -> CliResult<Output> {
    let created = admissions::init_database(config.db_path())?;
    Ok(Output::Json(json!({
        "initialized": created,
        "db_path": config.db_path,
    })))
}

/// Load metadata and data, reporting row counts per entity
pub fn check(config: &Config) -> CliResult<Output> {
    let mut db = open(config)?;
    let counts = db.transaction(false, |db| {
        let mut counts = JsonMap::new();
        for name in db.registry().names() {
            let rows = db.row_count(name)?;
            counts.insert(name.to_string(), JsonValue::from(rows));
        }
        Ok(counts)
    })?;

    Ok(Output::Json(json!({ "ok": true, "entities": counts })))
}

/// Canonical serialization of the whole data document
pub fn dump(config: &Config) -> CliResult<Output> {
    let mut db = open(config)?;
    let text = db.transaction(false, |db| Ok(db.document()?.to_json_string()))?;
    Ok(Output::Raw(text))
}

pub fn students(config: &Config, action: StudentAction) -> CliResult<Output> {
    let mut db = open(config)?;
    let mut dao = StudentDao::new(&mut db);

    let value = match action {
        StudentAction::List => serde_json::to_value(dao.students()?)?,
        StudentAction::Add {
            name,
            passed,
            average,
        } => {
            let mut student = Student {
                name: Some(name),
                average,
                ..Student::default()
            };
            if passed.is_some() {
                student.passed = passed;
            }
            dao.add_student(&mut student)?;
            serde_json::to_value(student)?
        }
        StudentAction::Update {
            id,
            name,
            passed,
            average,
        } => {
            let mut student = dao
                .find_student(id)?
                .ok_or_else(|| CliError::not_found("student", id))?;
            if name.is_some() {
                student.name = name;
            }
            if passed.is_some() {
                student.passed = passed;
            }
            if average.is_some() {
                student.average = average;
            }
            dao.update_student(&mut student)?;
            serde_json::to_value(student)?
        }
        StudentAction::Delete { id } => {
            let student = dao
                .find_student(id)?
                .ok_or_else(|| CliError::not_found("student", id))?;
            dao.delete_student(&student)?;
            json!({ "deleted": id })
        }
    };

    Ok(Output::Json(value))
}

pub fn exams(config: &Config, action: ExamAction) -> CliResult<Output> {
    let mut db = open(config)?;

    let value = match action {
        ExamAction::Add { mark, student_id } => {
            let mut exam = Exam::new(mark, student_id);
            ExamDao::new(&mut db).add_exam(&mut exam)?;
            serde_json::to_value(exam)?
        }
        ExamAction::Update {
            id,
            mark,
            student_id,
        } => {
            let mut dao = ExamDao::new(&mut db);
            let mut exam = dao
                .find_exam(id)?
                .ok_or_else(|| CliError::not_found("exam", id))?;
            if mark.is_some() {
                exam.mark = mark;
            }
            if student_id.is_some() {
                exam.student_id = student_id;
            }
            dao.update_exam(&mut exam)?;
            serde_json::to_value(exam)?
        }
        ExamAction::Delete { id } => {
            let mut dao = ExamDao::new(&mut db);
            let exam = dao
                .find_exam(id)?
                .ok_or_else(|| CliError::not_found("exam", id))?;
            dao.delete_exam(&exam)?;
            json!({ "deleted": id })
        }
        ExamAction::ForStudent { student_id } => {
            let student = StudentDao::new(&mut db)
                .find_student(student_id)?
                .ok_or_else(|| CliError::not_found("student", student_id))?;
            let exam = ExamDao::new(&mut db).exam_for_student(&student)?;
            serde_json::to_value(exam)?
        }
    };

    Ok(Output::Json(value))
}

#[cfg(test)]
mod tests {
    use super::super::errors::CliErrorCode;
    use super::*;
    use tempfile::TempDir;

    fn config_for(temp_dir: &TempDir) -> Config {
        Config {
            db_path: temp_dir
                .path()
                .join("student")
                .to_string_lossy()
                .into_owned(),
            log_level: default_log_level(),
        }
    }

    fn json_of(output: Output) -> JsonValue {
        match output {
            Output::Json(value) => value,
            Output::Raw(text) => serde_json::from_str(&text).unwrap(),
        }
    }

    fn add_student(config: &Config, name: &str) -> JsonValue {
        json_of(
            students(
                config,
                StudentAction::Add {
                    name: name.to_string(),
                    passed: None,
                    average: Some(8.5),
                },
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_load_config_defaults_log_level() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("admissions.json");
        fs::write(&path, r#"{"db_path": "data/student"}"#).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.db_path(), Path::new("data/student"));
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("admissions.json");
        fs::write(&path, r#"{"db_path": "db", "log_level": "loud"}"#).unwrap();

        let err = Config::load(&path).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::ConfigError);
    }

    #[test]
    fn test_db_override_without_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("absent.json");

        let config = Config::resolve(&missing, Some(Path::new("/srv/student"))).unwrap();
        assert_eq!(config.db_path, "/srv/student");

        let err = Config::resolve(&missing, None).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::ConfigError);
    }

    #[test]
    fn test_db_override_beats_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("admissions.json");
        fs::write(&path, r#"{"db_path": "db", "log_level": "debug"}"#).unwrap();

        let config = Config::resolve(&path, Some(Path::new("other"))).unwrap();
        assert_eq!(config.db_path, "other");
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_init_then_check() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_for(&temp_dir);

        let out = json_of(init(&config).unwrap());
        assert_eq!(out["initialized"], true);

        add_student(&config, "Ana");
        let out = json_of(check(&config).unwrap());
        assert_eq!(out["entities"]["student"], 1);
        assert_eq!(out["entities"]["exam"], 0);
    }

    #[test]
    fn test_check_without_metadata_fails() {
        let temp_dir = TempDir::new().unwrap();
        let err = check(&config_for(&temp_dir)).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::DatabaseError);
        assert!(err.message().contains("JSONDB_METADATA_MISSING"));
    }

    #[test]
    fn test_dump_is_canonical() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_for(&temp_dir);
        init(&config).unwrap();
        add_student(&config, "Ana");

        match dump(&config).unwrap() {
            Output::Raw(text) => assert_eq!(
                text,
                concat!(
                    r#"{"data":{"student":[[1,"Ana",true,8.5]],"exam":[]},"#,
                    r#""seq":{"student":1,"exam":0}}"#
                )
            ),
            other => panic!("expected raw output, got {:?}", other),
        }
    }

    #[test]
    fn test_students_list_highest_id_first() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_for(&temp_dir);
        init(&config).unwrap();
        add_student(&config, "Ana");
        add_student(&config, "Ben");

        let out = json_of(students(&config, StudentAction::List).unwrap());
        let names: Vec<&str> = out
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Ben", "Ana"]);
    }

    #[test]
    fn test_update_missing_student_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_for(&temp_dir);
        init(&config).unwrap();

        let err = students(
            &config,
            StudentAction::Update {
                id: 42,
                name: Some("x".to_string()),
                passed: None,
                average: None,
            },
        )
        .unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::NotFound);
    }

    #[test]
    fn test_exam_for_student() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_for(&temp_dir);
        init(&config).unwrap();
        let student = add_student(&config, "Ana");
        let id = student["id"].as_i64().unwrap() as i32;

        let none = json_of(exams(&config, ExamAction::ForStudent { student_id: id }).unwrap());
        assert!(none.is_null());

        exams(
            &config,
            ExamAction::Add {
                mark: 9.25,
                student_id: id,
            },
        )
        .unwrap();
        let exam = json_of(exams(&config, ExamAction::ForStudent { student_id: id }).unwrap());
        assert_eq!(exam["mark"], 9.25);
        assert_eq!(exam["studentId"], id);
    }
}
