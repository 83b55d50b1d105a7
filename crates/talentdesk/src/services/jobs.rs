use std::sync::Arc;

use chrono::Utc;

use talentdesk_core::jobs::{apply_job_update, new_job, CreateJobRequest, Job, JobStatus, UpdateJobRequest};
use talentdesk_core::storage::{DeletedJob, JobRepository, Page, PageLimits, PageQuery};
use talentdesk_core::users::User;

use super::authz::{require_admin, require_consultant};
use super::{Result, ServiceError};

/// Job board reads and admin job management.
///
/// Anonymous visitors and applicants only ever see `active` postings.
#[derive(Clone)]
pub struct JobService {
    jobs: Arc<dyn JobRepository>,
    limits: PageLimits,
}

fn sees_unpublished(actor: Option<&User>) -> bool {
    actor.is_some_and(|user| require_consultant(user).is_ok())
}

impl JobService {
    pub fn new(jobs: Arc<dyn JobRepository>, limits: PageLimits) -> Self {
        Self { jobs, limits }
    }

    pub async fn get(&self, actor: Option<&User>, job_id: &str) -> Result<Job> {
        let job = self
            .jobs
            .get_job(job_id)
            .await?
            .filter(|job| job.status.is_public() || sees_unpublished(actor))
            .ok_or_else(|| ServiceError::not_found("Job", job_id))?;
        Ok(job)
    }

    /// Lists jobs newest first.
    ///
    /// Without a status, consultants get every job and everyone else gets the
    /// public board.
    pub async fn list(
        &self,
        actor: Option<&User>,
        status: Option<JobStatus>,
        query: PageQuery,
    ) -> Result<Page<Job>> {
        let status = if sees_unpublished(actor) {
            status
        } else {
            match status {
                None | Some(JobStatus::Active) => Some(JobStatus::Active),
                Some(other) => {
                    return Err(ServiceError::forbidden(format!(
                        "Listing {} jobs requires consultant role",
                        other
                    )))
                }
            }
        };

        let page = self.jobs.list_jobs(status, self.limits.resolve(query)).await?;
        Ok(page)
    }

    pub async fn create(&self, actor: &User, request: CreateJobRequest) -> Result<Job> {
        require_admin(actor)?;

        let job = new_job(request, Utc::now())?;
        self.jobs.create_job(&job).await?;

        tracing::info!(job_id = %job.job_id, status = %job.status, actor = %actor.user_id, "job created");
        Ok(job)
    }

    /// Applies a partial update conditioned on `expected_version`.
    ///
    /// The update is checked against the current snapshot first so that bad
    /// fields and illegal status moves fail before any write.
    pub async fn update(
        &self,
        actor: &User,
        job_id: &str,
        update: UpdateJobRequest,
        expected_version: u64,
    ) -> Result<Job> {
        require_admin(actor)?;
        if update.is_empty() {
            return Err(ServiceError::validation("No fields to update"));
        }

        let current = self
            .jobs
            .get_job(job_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Job", job_id))?;
        if current.version != expected_version {
            return Err(ServiceError::VersionConflict {
                message: format!(
                    "Job {} was modified concurrently (expected version {}, found {})",
                    job_id, expected_version, current.version
                ),
                expected: expected_version,
                actual: current.version,
            });
        }
        apply_job_update(&current, update.clone(), Utc::now())?;

        let job = self.jobs.update_job(job_id, update, expected_version).await?;
        tracing::info!(job_id = %job_id, version = job.version, actor = %actor.user_id, "job updated");
        Ok(job)
    }

    /// Hard-deletes a job. Applications referencing it are kept and counted.
    pub async fn delete(&self, actor: &User, job_id: &str) -> Result<DeletedJob> {
        require_admin(actor)?;

        let deleted = self.jobs.delete_job(job_id).await?;
        if deleted.dependent_application_count > 0 {
            tracing::warn!(
                job_id = %job_id,
                dependents = deleted.dependent_application_count,
                "deleted job still referenced by applications"
            );
        } else {
            tracing::info!(job_id = %job_id, "job deleted");
        }
        Ok(deleted)
    }
}
