//! Accounts, profiles and the resumes they own.

mod error;
mod operations;
mod requests;
mod resumes;
mod types;

pub use error::UserError;
pub use operations::{apply_user_update, new_user, with_resumes};
pub use requests::{CreateUserRequest, UpdateUserRequest};
pub use resumes::{
    add_resume, remove_resume, resume_storage_key, set_default_resume, NewResume,
};
pub use types::{AccountStatus, Resume, Role, User, VerificationStatus};
