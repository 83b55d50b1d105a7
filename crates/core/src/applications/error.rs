use thiserror::Error;

use crate::lifecycle::TransitionError;

/// Errors that can occur when validating or progressing an application.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApplicationError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),
    #[error("Unknown application status: {0}")]
    InvalidStatus(String),
    #[error(transparent)]
    Transition(#[from] TransitionError),
}
