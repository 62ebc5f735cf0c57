//! Natural language -> SQL.
//!
//! A [`QuerySynthesizer`] renders a deterministic prompt from the request and
//! the store's [`sqlstore::SchemaDescription`], sends it to a
//! [`CompletionProvider`], and pulls the statement out of the completion.

mod error;
pub mod extract;
pub mod prompt;
pub mod provider;
pub mod provider_groq;
pub mod synth;

pub use error::{Result, SynthError};
pub use extract::extract_sql;
pub use prompt::*;
pub use provider::*;
pub use provider_groq::GroqProvider;
pub use synth::*;
