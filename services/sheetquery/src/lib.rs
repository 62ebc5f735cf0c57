//! Spreadsheet upload, schema introspection and natural-language querying
//! over one SQLite file.

pub mod app;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod preload;
pub mod routes_health;
pub mod routes_query;
pub mod routes_schema;
pub mod routes_upload;
pub mod staging;
pub mod state;

pub use app::build_router;
pub use config::AppConfig;
pub use error::ApiError;
pub use pipeline::{get_schema, ingest_file, run_nl_query, IngestReport, QueryOutcome};
pub use state::{AppContext, SharedState};
