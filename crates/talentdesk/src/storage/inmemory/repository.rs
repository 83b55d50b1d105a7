//! In-memory repository implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use talentdesk_core::applications::{apply_status_change, Application, ApplicationStatus};
use talentdesk_core::email::normalize_email;
use talentdesk_core::jobs::{apply_job_update, Job, JobStatus, UpdateJobRequest};
use talentdesk_core::storage::{
    ApplicationRepository, DeletedJob, JobRepository, Page, PageRequest, RepositoryError, Result,
    ResumeRepository, UserRepository,
};
use talentdesk_core::users::{
    add_resume, apply_user_update, remove_resume, set_default_resume, with_resumes, Resume,
    UpdateUserRequest, User,
};

use super::paging::{paginate, sort_key};

/// In-memory storage backend.
///
/// Uses HashMaps wrapped in `Arc<RwLock<_>>` for thread-safe access.
/// Data is not persisted and will be lost when the repository is dropped.
#[derive(Debug, Clone)]
pub struct InMemoryRepository {
    jobs: Arc<RwLock<HashMap<String, Job>>>,
    applications: Arc<RwLock<HashMap<Uuid, Application>>>,
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self {
            jobs: Arc::new(RwLock::new(HashMap::new())),
            applications: Arc::new(RwLock::new(HashMap::new())),
            users: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Applies `edit` to a user's resume list under the write lock.
    async fn edit_resumes<T: Send>(
        &self,
        user_id: Uuid,
        edit: impl FnOnce(&[Resume]) -> Result<(Vec<Resume>, T)> + Send,
    ) -> Result<T> {
        let mut users = self.users.write().await;
        let current = users
            .get(&user_id)
            .ok_or_else(|| RepositoryError::not_found("User", user_id))?;

        let (resumes, output) = edit(&current.resumes)?;
        let updated = with_resumes(current, resumes, Utc::now());
        users.insert(user_id, updated);
        Ok(output)
    }
}

fn job_sort_key(job: &Job) -> String {
    sort_key(job.created_at, &job.job_id)
}

fn application_sort_key(application: &Application) -> String {
    sort_key(application.created_at, &application.application_id.to_string())
}

#[async_trait]
impl JobRepository for InMemoryRepository {
    async fn get_job(&self, job_id: &str) -> Result<Option<Job>> {
        let jobs = self.jobs.read().await;
        Ok(jobs.get(job_id).cloned())
    }

    async fn list_jobs(&self, status: Option<JobStatus>, page: PageRequest) -> Result<Page<Job>> {
        let jobs = self.jobs.read().await;
        let keyed = jobs
            .values()
            .filter(|job| status.is_none_or(|s| job.status == s))
            .map(|job| (job_sort_key(job), job.clone()))
            .collect();
        Ok(paginate(keyed, &page))
    }

    async fn create_job(&self, job: &Job) -> Result<()> {
        let mut jobs = self.jobs.write().await;
        if jobs.contains_key(&job.job_id) {
            return Err(RepositoryError::already_exists("Job", &job.job_id));
        }
        jobs.insert(job.job_id.clone(), job.clone());
        Ok(())
    }

    async fn update_job(
        &self,
        job_id: &str,
        update: UpdateJobRequest,
        expected_version: u64,
    ) -> Result<Job> {
        let mut jobs = self.jobs.write().await;
        let current = jobs
            .get(job_id)
            .ok_or_else(|| RepositoryError::not_found("Job", job_id))?;

        if current.version != expected_version {
            return Err(RepositoryError::version_conflict(
                "Job",
                job_id,
                expected_version,
                current.version,
            ));
        }

        let updated = apply_job_update(current, update, Utc::now())?;
        jobs.insert(job_id.to_string(), updated.clone());
        Ok(updated)
    }

    async fn delete_job(&self, job_id: &str) -> Result<DeletedJob> {
        let job = self
            .jobs
            .write()
            .await
            .remove(job_id)
            .ok_or_else(|| RepositoryError::not_found("Job", job_id))?;

        let dependent_application_count = self.count_applications_for_job(job_id).await?;

        Ok(DeletedJob {
            job,
            dependent_application_count,
        })
    }
}

#[async_trait]
impl ApplicationRepository for InMemoryRepository {
    async fn get_application(&self, application_id: Uuid) -> Result<Option<Application>> {
        let applications = self.applications.read().await;
        Ok(applications.get(&application_id).cloned())
    }

    async fn list_applications_by_job(
        &self,
        job_id: &str,
        page: PageRequest,
    ) -> Result<Page<Application>> {
        let applications = self.applications.read().await;
        let keyed = applications
            .values()
            .filter(|a| a.job_id == job_id)
            .map(|a| (application_sort_key(a), a.clone()))
            .collect();
        Ok(paginate(keyed, &page))
    }

    async fn list_applications_by_applicant(
        &self,
        email: &str,
        page: PageRequest,
    ) -> Result<Page<Application>> {
        let email = normalize_email(email);
        let applications = self.applications.read().await;
        let keyed = applications
            .values()
            .filter(|a| a.email == email)
            .map(|a| (application_sort_key(a), a.clone()))
            .collect();
        Ok(paginate(keyed, &page))
    }

    async fn list_applications(&self, page: PageRequest) -> Result<Page<Application>> {
        let applications = self.applications.read().await;
        let keyed = applications
            .values()
            .map(|a| (application_sort_key(a), a.clone()))
            .collect();
        Ok(paginate(keyed, &page))
    }

    async fn count_applications_for_job(&self, job_id: &str) -> Result<usize> {
        let applications = self.applications.read().await;
        Ok(applications.values().filter(|a| a.job_id == job_id).count())
    }

    async fn create_application(&self, application: &Application) -> Result<()> {
        let mut applications = self.applications.write().await;
        if applications.contains_key(&application.application_id) {
            return Err(RepositoryError::already_exists(
                "Application",
                application.application_id,
            ));
        }

        let mut stored = application.clone();
        stored.email = normalize_email(&stored.email);
        applications.insert(stored.application_id, stored);
        Ok(())
    }

    async fn update_application_status(
        &self,
        application_id: Uuid,
        status: ApplicationStatus,
        expected_version: u64,
    ) -> Result<Application> {
        let mut applications = self.applications.write().await;
        let current = applications
            .get(&application_id)
            .ok_or_else(|| RepositoryError::not_found("Application", application_id))?;

        if current.version != expected_version {
            return Err(RepositoryError::version_conflict(
                "Application",
                application_id,
                expected_version,
                current.version,
            ));
        }

        let updated = apply_status_change(current, status, Utc::now())?;
        applications.insert(application_id, updated.clone());
        Ok(updated)
    }
}

#[async_trait]
impl UserRepository for InMemoryRepository {
    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&user_id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let email = normalize_email(email);
        let users = self.users.read().await;
        Ok(users.values().find(|user| user.email == email).cloned())
    }

    async fn list_users(&self, page: PageRequest) -> Result<Page<User>> {
        let users = self.users.read().await;
        let keyed = users
            .values()
            .map(|u| (sort_key(u.created_at, &u.user_id.to_string()), u.clone()))
            .collect();
        Ok(paginate(keyed, &page))
    }

    async fn create_user(&self, user: &User) -> Result<()> {
        let mut users = self.users.write().await;
        let email = normalize_email(&user.email);

        if users.contains_key(&user.user_id) {
            return Err(RepositoryError::already_exists("User", user.user_id));
        }
        if users.values().any(|existing| existing.email == email) {
            return Err(RepositoryError::already_exists("User", email));
        }

        let mut stored = user.clone();
        stored.email = email;
        users.insert(stored.user_id, stored);
        Ok(())
    }

    async fn update_user(
        &self,
        user_id: Uuid,
        update: UpdateUserRequest,
        expected_version: u64,
    ) -> Result<User> {
        let mut users = self.users.write().await;
        let current = users
            .get(&user_id)
            .ok_or_else(|| RepositoryError::not_found("User", user_id))?;

        if current.version != expected_version {
            return Err(RepositoryError::version_conflict(
                "User",
                user_id,
                expected_version,
                current.version,
            ));
        }

        let updated = apply_user_update(current, update, Utc::now());
        users.insert(user_id, updated.clone());
        Ok(updated)
    }
}

#[async_trait]
impl ResumeRepository for InMemoryRepository {
    async fn list_resumes(&self, user_id: Uuid) -> Result<Vec<Resume>> {
        let users = self.users.read().await;
        users
            .get(&user_id)
            .map(|user| user.resumes.clone())
            .ok_or_else(|| RepositoryError::not_found("User", user_id))
    }

    async fn add_resume(&self, user_id: Uuid, resume: Resume) -> Result<Vec<Resume>> {
        self.edit_resumes(user_id, |resumes| {
            let next = add_resume(resumes, resume)?;
            Ok((next.clone(), next))
        })
        .await
    }

    async fn remove_resume(&self, user_id: Uuid, resume_id: Uuid) -> Result<Resume> {
        self.edit_resumes(user_id, |resumes| Ok(remove_resume(resumes, resume_id)?))
            .await
    }

    async fn set_default_resume(&self, user_id: Uuid, resume_id: Uuid) -> Result<Vec<Resume>> {
        self.edit_resumes(user_id, |resumes| {
            let next = set_default_resume(resumes, resume_id)?;
            Ok((next.clone(), next))
        })
        .await
    }
}
