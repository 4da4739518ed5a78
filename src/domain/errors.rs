use thiserror::Error;

/// Failures of a key-value store adapter.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Failures of the remote storefront API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Remote API returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("Could not decode response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Status { status: 404, .. })
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Status { status: 401 | 403, .. })
    }
}
