//! Spreadsheet loading for ingestion.
//!
//! Reads csv / xlsx / xls files into an in-memory [`Frame`] with normalized
//! column names, ready to be written to the store.

mod error;
pub mod frame;
pub mod naming;
pub mod reader;

pub use error::{Result, TabularError};
pub use frame::*;
pub use naming::*;
pub use reader::*;
