//! Dialect adapters that normalize engine-specific schema metadata.
//!
//! Each adapter reconciles one database family's metadata surface
//! (driver introspection, information-schema queries, or DDL text
//! mining) into the shared [`tablegen_core::TableDescriptor`] model.

pub mod adapter;
mod base;
pub mod defaults;
pub mod fallback;
pub mod listing;
pub mod mysql;
pub mod postgres;
pub mod sqlite;

pub use adapter::{DialectAdapter, Engine, adapter_for};
pub use listing::list_tables;

pub use tablegen_core::TableDescriptor;
