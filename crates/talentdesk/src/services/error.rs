use thiserror::Error;

use talentdesk_core::applications::ApplicationError;
use talentdesk_core::collaborators::CollaboratorError;
use talentdesk_core::http_mapping::{repository_error_kind, ErrorKind};
use talentdesk_core::jobs::JobError;
use talentdesk_core::storage::RepositoryError;
use talentdesk_core::users::UserError;

/// Error raised by the service layer. Every variant has a stable [`ErrorKind`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{message}")]
    VersionConflict {
        message: String,
        expected: u64,
        actual: u64,
    },
    #[error("{0}")]
    InvalidTransition(String),
    #[error("{0}")]
    Unauthenticated(String),
    #[error("{0}")]
    Forbidden(String),
    #[error(transparent)]
    Dependency(#[from] CollaboratorError),
    #[error("{0}")]
    Store(String),
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::Validation(_) => ErrorKind::Validation,
            ServiceError::NotFound(_) => ErrorKind::NotFound,
            ServiceError::Conflict(_) => ErrorKind::Conflict,
            ServiceError::VersionConflict { .. } => ErrorKind::VersionConflict,
            ServiceError::InvalidTransition(_) => ErrorKind::InvalidTransition,
            ServiceError::Unauthenticated(_) => ErrorKind::Unauthenticated,
            ServiceError::Forbidden(_) => ErrorKind::Forbidden,
            ServiceError::Dependency(_) => ErrorKind::Dependency,
            ServiceError::Store(_) => ErrorKind::Store,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ServiceError::Validation(message.into())
    }

    pub fn not_found(entity_type: &str, id: impl std::fmt::Display) -> Self {
        ServiceError::NotFound(format!("{} not found: {}", entity_type, id))
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ServiceError::Forbidden(message.into())
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(error: RepositoryError) -> Self {
        let message = error.to_string();
        if let RepositoryError::VersionConflict {
            expected, actual, ..
        } = error
        {
            return ServiceError::VersionConflict {
                message,
                expected,
                actual,
            };
        }

        match repository_error_kind(&error) {
            ErrorKind::Validation => ServiceError::Validation(message),
            ErrorKind::NotFound => ServiceError::NotFound(message),
            ErrorKind::Conflict => ServiceError::Conflict(message),
            ErrorKind::InvalidTransition => ServiceError::InvalidTransition(message),
            _ => ServiceError::Store(message),
        }
    }
}

impl From<JobError> for ServiceError {
    fn from(error: JobError) -> Self {
        match error {
            JobError::Transition(e) => ServiceError::InvalidTransition(e.to_string()),
            other => ServiceError::Validation(other.to_string()),
        }
    }
}

impl From<ApplicationError> for ServiceError {
    fn from(error: ApplicationError) -> Self {
        match error {
            ApplicationError::Transition(e) => ServiceError::InvalidTransition(e.to_string()),
            other => ServiceError::Validation(other.to_string()),
        }
    }
}

impl From<UserError> for ServiceError {
    fn from(error: UserError) -> Self {
        RepositoryError::from(error).into()
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;
    use talentdesk_core::lifecycle::TransitionError;

    #[test]
    fn test_repository_errors_keep_their_kind() {
        let cases = [
            (RepositoryError::not_found("Job", "J1"), ErrorKind::NotFound),
            (
                RepositoryError::already_exists("Application", "a1"),
                ErrorKind::Conflict,
            ),
            (
                RepositoryError::version_conflict("Job", "J1", 1, 3),
                ErrorKind::VersionConflict,
            ),
            (
                RepositoryError::Validation("bad cursor".to_string()),
                ErrorKind::Validation,
            ),
            (
                RepositoryError::QueryFailed("throttled".to_string()),
                ErrorKind::Store,
            ),
        ];

        for (error, kind) in cases {
            assert_eq!(ServiceError::from(error).kind(), kind);
        }
    }

    #[test]
    fn test_version_conflict_keeps_versions() {
        let error = ServiceError::from(RepositoryError::version_conflict("Job", "J1", 1, 3));
        assert!(matches!(
            error,
            ServiceError::VersionConflict {
                expected: 1,
                actual: 3,
                ..
            }
        ));
    }

    #[test]
    fn test_domain_errors() {
        let transition = TransitionError {
            entity_type: "Application",
            from: "hired".to_string(),
            to: "pending".to_string(),
        };
        assert_eq!(
            ServiceError::from(ApplicationError::Transition(transition)).kind(),
            ErrorKind::InvalidTransition
        );
        assert_eq!(
            ServiceError::from(JobError::EmptyTitle).kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            ServiceError::from(UserError::ResumeNotFound(uuid::Uuid::nil())).kind(),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn test_collaborator_errors_are_dependency_failures() {
        let error = ServiceError::from(CollaboratorError::Unavailable {
            service: "email",
            message: "down".to_string(),
        });
        assert_eq!(error.kind(), ErrorKind::Dependency);
    }
}
