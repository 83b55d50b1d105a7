use thiserror::Error;

use crate::applications::ApplicationError;
use crate::jobs::JobError;
use crate::lifecycle::TransitionError;
use crate::users::UserError;

/// Errors that can occur during repository operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    #[error("{entity_type} already exists: {id}")]
    AlreadyExists {
        entity_type: &'static str,
        id: String,
    },
    #[error("{entity_type} {id} was modified concurrently (expected version {expected}, found {actual})")]
    VersionConflict {
        entity_type: &'static str,
        id: String,
        expected: u64,
        actual: u64,
    },
    #[error(transparent)]
    InvalidTransition(#[from] TransitionError),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl RepositoryError {
    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }

    pub fn already_exists(entity_type: &'static str, id: impl ToString) -> Self {
        Self::AlreadyExists {
            entity_type,
            id: id.to_string(),
        }
    }

    pub fn version_conflict(
        entity_type: &'static str,
        id: impl ToString,
        expected: u64,
        actual: u64,
    ) -> Self {
        Self::VersionConflict {
            entity_type,
            id: id.to_string(),
            expected,
            actual,
        }
    }
}

impl From<JobError> for RepositoryError {
    fn from(error: JobError) -> Self {
        match error {
            JobError::Transition(e) => Self::InvalidTransition(e),
            other => Self::Validation(other.to_string()),
        }
    }
}

impl From<ApplicationError> for RepositoryError {
    fn from(error: ApplicationError) -> Self {
        match error {
            ApplicationError::Transition(e) => Self::InvalidTransition(e),
            other => Self::Validation(other.to_string()),
        }
    }
}

impl From<UserError> for RepositoryError {
    fn from(error: UserError) -> Self {
        match error {
            UserError::ResumeNotFound(id) => Self::not_found("Resume", id),
            UserError::DuplicateResume(id) => Self::already_exists("Resume", id),
            other => Self::Validation(other.to_string()),
        }
    }
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;
