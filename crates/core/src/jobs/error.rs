use thiserror::Error;

use crate::lifecycle::TransitionError;

/// Errors that can occur when validating or changing a job posting.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JobError {
    #[error("Job title cannot be empty")]
    EmptyTitle,
    #[error("Job title too long (max 200 characters)")]
    TitleTooLong,
    #[error("Job title must contain at least one ASCII letter or digit")]
    EmptySlug,
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error("Expiry date must be on or after the posted date")]
    InvalidExpiry,
    #[error("Unknown job status: {0}")]
    InvalidStatus(String),
    #[error("Unknown priority: {0}")]
    InvalidPriority(String),
    #[error(transparent)]
    Transition(#[from] TransitionError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_error_display() {
        assert_eq!(JobError::EmptyTitle.to_string(), "Job title cannot be empty");
        assert_eq!(
            JobError::MissingField("company").to_string(),
            "Missing required field: company"
        );
    }

    #[test]
    fn test_transition_error_is_transparent() {
        let err = JobError::from(TransitionError {
            entity_type: "Job",
            from: "draft".to_string(),
            to: "paused".to_string(),
        });
        assert_eq!(err.to_string(), "Job cannot move from 'draft' to 'paused'");
    }
}
