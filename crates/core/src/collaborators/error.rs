use thiserror::Error;

/// Failure of an external managed service.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CollaboratorError {
    #[error("{service} is unavailable: {message}")]
    Unavailable {
        service: &'static str,
        message: String,
    },
    #[error("{service} rejected the request ({status}): {message}")]
    Rejected {
        service: &'static str,
        status: u16,
        message: String,
    },
    #[error("{service} returned an unexpected response: {message}")]
    InvalidResponse {
        service: &'static str,
        message: String,
    },
}

impl CollaboratorError {
    /// Name of the failing service.
    pub fn service(&self) -> &'static str {
        match self {
            CollaboratorError::Unavailable { service, .. }
            | CollaboratorError::Rejected { service, .. }
            | CollaboratorError::InvalidResponse { service, .. } => service,
        }
    }
}

/// Result type for collaborator calls.
pub type Result<T> = std::result::Result<T, CollaboratorError>;
