use async_trait::async_trait;
use uuid::Uuid;

use crate::applications::{Application, ApplicationStatus};
use crate::jobs::{Job, JobStatus, UpdateJobRequest};
use crate::users::{Resume, UpdateUserRequest, User};

use super::{DeletedJob, Page, PageRequest, Result};

/// Repository for job postings.
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Gets a job by its ID.
    async fn get_job(&self, job_id: &str) -> Result<Option<Job>>;

    /// Lists jobs, most recently created first.
    ///
    /// With a status this reads the status index. Without one it falls back
    /// to a paged scan over every job.
    async fn list_jobs(&self, status: Option<JobStatus>, page: PageRequest) -> Result<Page<Job>>;

    /// Creates a job. Fails with `AlreadyExists` if the ID is taken.
    async fn create_job(&self, job: &Job) -> Result<()>;

    /// Merges `update` into the stored job if its version is still
    /// `expected_version`, returning the new state.
    async fn update_job(
        &self,
        job_id: &str,
        update: UpdateJobRequest,
        expected_version: u64,
    ) -> Result<Job>;

    /// Hard-deletes a job and reports how many applications still reference it.
    async fn delete_job(&self, job_id: &str) -> Result<DeletedJob>;
}

/// Repository for job applications.
#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// Gets an application by its ID.
    async fn get_application(&self, application_id: Uuid) -> Result<Option<Application>>;

    /// Applications for one job, newest first.
    async fn list_applications_by_job(
        &self,
        job_id: &str,
        page: PageRequest,
    ) -> Result<Page<Application>>;

    /// Applications by applicant email (case-insensitive), newest first.
    async fn list_applications_by_applicant(
        &self,
        email: &str,
        page: PageRequest,
    ) -> Result<Page<Application>>;

    /// Every application, paged.
    async fn list_applications(&self, page: PageRequest) -> Result<Page<Application>>;

    /// Number of applications referencing a job.
    async fn count_applications_for_job(&self, job_id: &str) -> Result<usize>;

    /// Creates an application. Fails with `AlreadyExists` if the ID is taken.
    async fn create_application(&self, application: &Application) -> Result<()>;

    /// Moves an application to `status` if its version is still `expected_version`.
    async fn update_application_status(
        &self,
        application_id: Uuid,
        status: ApplicationStatus,
        expected_version: u64,
    ) -> Result<Application>;
}

/// Repository for accounts.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Gets a user by their ID.
    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>>;

    /// Gets a user by email address (case-insensitive).
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Every user, paged.
    async fn list_users(&self, page: PageRequest) -> Result<Page<User>>;

    /// Creates a user. Fails with `AlreadyExists` if the ID or email is taken.
    async fn create_user(&self, user: &User) -> Result<()>;

    /// Merges `update` into the stored user if its version is still `expected_version`.
    async fn update_user(
        &self,
        user_id: Uuid,
        update: UpdateUserRequest,
        expected_version: u64,
    ) -> Result<User>;
}

/// Repository for the resumes owned by a user.
///
/// Every write rewrites the user's resume list, conditioned on the version read.
#[async_trait]
pub trait ResumeRepository: Send + Sync {
    /// Resumes of a user, in upload order.
    async fn list_resumes(&self, user_id: Uuid) -> Result<Vec<Resume>>;

    /// Attaches a resume, returning the new list.
    async fn add_resume(&self, user_id: Uuid, resume: Resume) -> Result<Vec<Resume>>;

    /// Detaches a resume, returning the removed record.
    async fn remove_resume(&self, user_id: Uuid, resume_id: Uuid) -> Result<Resume>;

    /// Makes `resume_id` the only default, returning the new list.
    async fn set_default_resume(&self, user_id: Uuid, resume_id: Uuid) -> Result<Vec<Resume>>;
}
