//! Core logic for unidb.
//!
//! Schema and seed loading, the read and write catalogues, and the ordered
//! demonstration sections built from them.

pub mod catalogue;
pub mod config;
pub mod db;
pub mod error;
pub mod queries;
pub mod seed;
pub mod writes;

pub use error::{Result, UniError};
