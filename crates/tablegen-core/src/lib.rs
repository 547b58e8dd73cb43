//! Core contracts shared across the tablegen crates.
//!
//! This crate defines the normalized table/column descriptor model,
//! the generation configuration, the SQL-type to target-type mapping
//! table, and the parameterized CRUD statement generators.

pub mod config;
pub mod descriptor;
pub mod error;
pub mod statements;
pub mod typemap;

pub use config::{GenConfig, NameCase};
pub use descriptor::{ColumnDescriptor, TableDescriptor};
pub use error::{Error, Result};
pub use statements::{
    delete_statement, insert_statement, quote_ident, select_many_statement, select_one_statement,
    update_statement,
};
pub use typemap::TypeMap;
