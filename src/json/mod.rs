//! JSON value model and parser for the document store
//!
//! The parser is a priority-ordered chain of recognizers. Each recognizer
//! inspects the text at the current position only and either claims it or
//! passes. The first recognizer that claims the input builds the value.
//!
//! # Recognizer order
//!
//! Null, Object, Array, Double, Int, String, Boolean.
//!
//! Double is tried before Int: the integer pattern is a textual prefix of the
//! decimal pattern, so the reverse order would truncate `1.5` to `1`.
//!
//! # Limitations
//!
//! - No string escape sequences. A string ends at the next `"`.
//! - No exponent form for numbers.
//! - Integers are 32-bit signed.

mod errors;
mod parser;
mod value;

pub use errors::{ParseError, ParseResult};
pub use parser::{parse, Parser, MAX_DEPTH};
pub use value::{Map, Value, ValueKind};
