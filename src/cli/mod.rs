//! CLI module for the admissions database
//!
//! Provides command-line interface for:
//! - init: Create the metadata and data files
//! - check: Validate the database and count rows
//! - dump: Print the canonical data document
//! - students / exams: Record maintenance through the DAOs

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command, ExamAction, StudentAction};
pub use commands::{check, dump, exams, init, run, run_command, students, Config};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_output, Output};
