use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur when validating or editing an account.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UserError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),
    #[error("Unknown role: {0}")]
    InvalidRole(String),
    #[error("Unknown verification status: {0}")]
    InvalidVerificationStatus(String),
    #[error("Unknown account status: {0}")]
    InvalidAccountStatus(String),
    #[error("Resume not found: {0}")]
    ResumeNotFound(Uuid),
    #[error("Resume already attached: {0}")]
    DuplicateResume(Uuid),
    #[error("Resume file name cannot be empty")]
    EmptyFileName,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_error_display() {
        assert_eq!(
            UserError::MissingFields(vec!["firstName"]).to_string(),
            "Missing required fields: firstName"
        );
        assert_eq!(
            UserError::InvalidRole("owner".to_string()).to_string(),
            "Unknown role: owner"
        );
    }
}
