use thiserror::Error;

/// Errors that can occur when reading from the launch catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The request never produced a response (connect failure, timeout).
    #[error("Catalog transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The catalog answered with a non-success status.
    #[error("Catalog returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body was not the expected JSON.
    #[error("Catalog decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The catalog URL could not be built.
    #[error("Invalid catalog URL: {0}")]
    InvalidUrl(String),

    /// The catalog is unavailable.
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
