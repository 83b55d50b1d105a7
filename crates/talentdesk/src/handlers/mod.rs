pub mod applications;
pub mod error;
pub mod health;
pub mod jobs;
pub mod resumes;
pub mod users;

pub use error::{reveal_error_details, ApiError};
