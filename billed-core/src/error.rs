use thiserror::Error;

/// Errors raised by the store collaborators, the session capability and the
/// listing pipeline.
#[derive(Error, Debug)]
pub enum BilledError {
    #[error("{0}")]
    Store(String),

    #[error("Store operation not supported: {0}")]
    Unsupported(&'static str),

    #[error("Invalid date: {0:?}")]
    InvalidDate(String),

    #[error("No user in session")]
    SessionMissing,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[cfg(feature = "http")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, BilledError>;

/// Failure of one submission attempt, tagged with the step that failed.
#[derive(Error, Debug)]
pub enum SubmissionError {
    #[error("Could not read submitter from session: {0}")]
    Session(#[source] BilledError),

    #[error("Attachment upload failed: {0}")]
    Upload(#[source] BilledError),

    #[error("Bill update failed: {0}")]
    Update(#[source] BilledError),

    #[error("Could not encode bill: {0}")]
    Encode(#[from] serde_json::Error),
}
