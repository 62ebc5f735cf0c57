use thiserror::Error;

#[derive(Debug, Error)]
pub enum SynthError {
    /// No credential for the completion endpoint. Raised before any request is made.
    #[error("{0} not found in environment variables")]
    MissingCredential(String),

    #[error("completion request failed: {0}")]
    Transport(String),

    #[error("completion endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed completion response: {0}")]
    Malformed(String),
}

pub type Result<T> = std::result::Result<T, SynthError>;
