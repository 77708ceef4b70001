use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Backend returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Decoding notifications failed: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{0}")]
    Custom(String),
}

#[derive(Error, Debug)]
pub enum AcknowledgeError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Backend returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("{0}")]
    Custom(String),
}

/// A `createdAt` value that could not be turned into a point in time.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Malformed timestamp: {raw}")]
pub struct MalformedTimestamp {
    pub raw: String,
}
