//! Job applications: types, submission validation and the pipeline state machine.

mod error;
mod operations;
mod requests;
mod status;
mod types;

pub use error::ApplicationError;
pub use operations::{apply_status_change, new_application, DEFAULT_SOURCE};
pub use requests::{ChangeApplicationStatusRequest, SubmitApplicationRequest};
pub use status::ApplicationStatus;
pub use types::{Application, ResumeReference};
