//! Job postings: types, request payloads, validation and the status machine.

mod error;
mod operations;
mod requests;
mod status;
mod types;

pub use error::JobError;
pub use operations::{apply_job_update, new_job, validate_job, INITIAL_VERSION};
pub use requests::{CreateJobRequest, UpdateJobRequest};
pub use status::JobStatus;
pub use types::{Job, Priority};
