//! Machine-usable error kinds and their HTTP status codes.
//!
//! Pure functions only. The service layer tags every failure with an
//! [`ErrorKind`]; the route layer turns that into a status code.

use std::fmt;

use crate::storage::RepositoryError;

/// Error taxonomy surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    VersionConflict,
    InvalidTransition,
    Unauthenticated,
    Forbidden,
    Dependency,
    Store,
}

impl ErrorKind {
    /// Stable identifier sent in error bodies.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation_error",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Conflict => "conflict",
            ErrorKind::VersionConflict => "version_conflict",
            ErrorKind::InvalidTransition => "invalid_transition",
            ErrorKind::Unauthenticated => "unauthenticated",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::Dependency => "dependency_failure",
            ErrorKind::Store => "store_failure",
        }
    }

    /// Whether the message may carry infrastructure details.
    pub fn is_internal(self) -> bool {
        matches!(self, ErrorKind::Dependency | ErrorKind::Store)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps an [`ErrorKind`] to an HTTP status code.
///
/// - `Validation` -> 400
/// - `NotFound` -> 404
/// - `Conflict`, `VersionConflict` -> 409
/// - `InvalidTransition` -> 422
/// - `Unauthenticated` -> 401
/// - `Forbidden` -> 403
/// - `Dependency` -> 502
/// - `Store` -> 503
///
/// # Examples
///
/// ```
/// use talentdesk_core::http_mapping::{error_kind_to_status_code, ErrorKind};
///
/// assert_eq!(error_kind_to_status_code(ErrorKind::VersionConflict), 409);
/// ```
pub fn error_kind_to_status_code(kind: ErrorKind) -> u16 {
    match kind {
        ErrorKind::Validation => 400,
        ErrorKind::NotFound => 404,
        ErrorKind::Conflict => 409,
        ErrorKind::VersionConflict => 409,
        ErrorKind::InvalidTransition => 422,
        ErrorKind::Unauthenticated => 401,
        ErrorKind::Forbidden => 403,
        ErrorKind::Dependency => 502,
        ErrorKind::Store => 503,
    }
}

/// Classifies a [`RepositoryError`].
///
/// Malformed stored items count as store failures: the caller cannot fix them.
pub fn repository_error_kind(error: &RepositoryError) -> ErrorKind {
    match error {
        RepositoryError::NotFound { .. } => ErrorKind::NotFound,
        RepositoryError::AlreadyExists { .. } => ErrorKind::Conflict,
        RepositoryError::VersionConflict { .. } => ErrorKind::VersionConflict,
        RepositoryError::InvalidTransition(_) => ErrorKind::InvalidTransition,
        RepositoryError::Validation(_) => ErrorKind::Validation,
        RepositoryError::ConnectionFailed(_)
        | RepositoryError::QueryFailed(_)
        | RepositoryError::Serialization(_)
        | RepositoryError::InvalidData(_) => ErrorKind::Store,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(error_kind_to_status_code(ErrorKind::Validation), 400);
        assert_eq!(error_kind_to_status_code(ErrorKind::NotFound), 404);
        assert_eq!(error_kind_to_status_code(ErrorKind::Conflict), 409);
        assert_eq!(error_kind_to_status_code(ErrorKind::InvalidTransition), 422);
        assert_eq!(error_kind_to_status_code(ErrorKind::Unauthenticated), 401);
        assert_eq!(error_kind_to_status_code(ErrorKind::Forbidden), 403);
        assert_eq!(error_kind_to_status_code(ErrorKind::Dependency), 502);
        assert_eq!(error_kind_to_status_code(ErrorKind::Store), 503);
    }

    #[test]
    fn test_kind_names_are_stable() {
        assert_eq!(ErrorKind::Validation.as_str(), "validation_error");
        assert_eq!(ErrorKind::Store.to_string(), "store_failure");
        assert!(ErrorKind::Dependency.is_internal());
        assert!(!ErrorKind::NotFound.is_internal());
    }

    #[test]
    fn test_repository_error_kinds() {
        assert_eq!(
            repository_error_kind(&RepositoryError::not_found("Job", "J1")),
            ErrorKind::NotFound
        );
        assert_eq!(
            repository_error_kind(&RepositoryError::already_exists("Application", "a1")),
            ErrorKind::Conflict
        );
        assert_eq!(
            repository_error_kind(&RepositoryError::version_conflict("Job", "J1", 1, 2)),
            ErrorKind::VersionConflict
        );
        assert_eq!(
            repository_error_kind(&RepositoryError::ConnectionFailed("timeout".to_string())),
            ErrorKind::Store
        );
        assert_eq!(
            repository_error_kind(&RepositoryError::InvalidData("bad date".to_string())),
            ErrorKind::Store
        );
    }
}
