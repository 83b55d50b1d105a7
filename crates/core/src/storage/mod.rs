mod error;
mod traits;
mod types;

pub use error::{RepositoryError, Result};
pub use traits::{ApplicationRepository, JobRepository, ResumeRepository, UserRepository};
pub use types::{
    DeletedJob, Page, PageLimits, PageQuery, PageRequest, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
