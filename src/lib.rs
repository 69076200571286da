//! unidb - university schema and query catalogue library.
//!
//! Creates the schema, loads the seed rows and runs the read and write
//! catalogues against an embedded SQLite file.

pub mod cli;
pub mod core;
