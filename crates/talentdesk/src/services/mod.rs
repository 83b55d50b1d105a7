//! Service-boundary workflows.
//!
//! Services validate inputs, enforce role gates, drive the repositories and
//! external collaborators, and decide which failures abort a workflow. Route
//! handlers call into these and only translate the result to HTTP.

mod accounts;
mod applications;
mod authz;
mod error;
#[cfg(test)]
pub(crate) mod fixtures;
mod jobs;
mod notify;
mod resumes;

pub use accounts::AccountService;
pub use applications::ApplicationService;
pub use error::{Result, ServiceError};
pub use jobs::JobService;
pub use notify::Notifier;
pub use resumes::{ResumeDownload, ResumeService, ResumeUploadRequest};
