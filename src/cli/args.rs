//! CLI argument definitions using clap
//!
//! Commands:
//! - admissions init
//! - admissions check
//! - admissions dump
//! - admissions students list|add|update|delete
//! - admissions exams add|update|delete|for-student

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Admissions - student and exam records in a JSON file database
#[derive(Parser, Debug)]
#[command(name = "admissions")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, global = true, default_value = "./admissions.json")]
    pub config: PathBuf,

    /// Database base path, overrides `db_path` from the configuration
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the metadata and data files if they do not exist
    Init,

    /// Load metadata, parse data and report row counts per entity
    Check,

    /// Print the data document in canonical form
    Dump,

    /// Manage students
    Students {
        #[command(subcommand)]
        action: StudentAction,
    },

    /// Manage exams
    Exams {
        #[command(subcommand)]
        action: ExamAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum StudentAction {
    /// List students, highest id first
    List,

    /// Add a student
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        passed: Option<bool>,
        #[arg(long)]
        average: Option<f64>,
    },

    /// Change fields of an existing student
    Update {
        #[arg(long)]
        id: i32,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        passed: Option<bool>,
        #[arg(long)]
        average: Option<f64>,
    },

    /// Delete a student
    Delete {
        #[arg(long)]
        id: i32,
    },
}

#[derive(Subcommand, Debug)]
pub enum ExamAction {
    /// Record an exam for a student
    Add {
        #[arg(long)]
        mark: f64,
        #[arg(long)]
        student_id: i32,
    },

    /// Change fields of an existing exam
    Update {
        #[arg(long)]
        id: i32,
        #[arg(long)]
        mark: Option<f64>,
        #[arg(long)]
        student_id: Option<i32>,
    },

    /// Delete an exam
    Delete {
        #[arg(long)]
        id: i32,
    },

    /// Show the exam taken by a student
    ForStudent {
        #[arg(long)]
        student_id: i32,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
