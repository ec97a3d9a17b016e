//! admissions - a schema-checked JSON file database and the student
//! admissions records kept in it

pub mod admissions;
pub mod cli;
pub mod db;
pub mod json;
pub mod record;
pub mod schema;
