//! File-backed SQLite store for ingested datasets.
//!
//! Three concerns live here: replacing a dataset wholesale from a parsed
//! [`tabular::Frame`], describing what the store holds, and running arbitrary
//! statements with every failure reported as an [`ExecutionFailure`].

mod error;
pub mod exec;
pub mod ingest;
pub mod schema;
pub mod store;
pub mod value;

pub use error::{Result, StoreError};
pub use exec::*;
pub use ingest::*;
pub use schema::*;
pub use store::*;
pub use value::*;
