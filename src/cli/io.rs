//! JSON output for CLI commands
//!
//! Each command prints exactly one JSON document followed by a newline.

use std::io::{self, Write};

use serde_json::Value;

use super::errors::CliResult;

/// What a command prints on success
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    /// Encoded with serde_json
    Json(Value),
    /// Already-serialized JSON, printed as is
    Raw(String),
}

/// Write a command result to stdout
pub fn write_output(output: &Output) -> CliResult<()> {
    let mut stdout = io::stdout().lock();
    write_to(&mut stdout, output)?;
    stdout.flush()?;
    Ok(())
}

fn write_to(writer: &mut impl Write, output: &Output) -> CliResult<()> {
    match output {
        Output::Json(value) => serde_json::to_writer(&mut *writer, value)?,
        Output::Raw(json) => writer.write_all(json.as_bytes())?,
    }
    writeln!(writer)?;
    Ok(())
}
