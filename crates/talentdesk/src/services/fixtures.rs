//! Shared setup for service tests.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use talentdesk_core::jobs::{new_job, CreateJobRequest, Job, JobStatus, UpdateJobRequest};
use talentdesk_core::storage::{
    JobRepository, Page, PageRequest, RepositoryError, Result as RepoResult, UserRepository,
};
use talentdesk_core::users::{new_user, CreateUserRequest, Role, UpdateUserRequest, User};
use uuid::Uuid;

use crate::collaborators::{MockEmailSender, MockIdentityProvider, MockObjectStorage};
use crate::storage::inmemory::InMemoryRepository;

use super::Notifier;

pub struct Fixture {
    pub repo: Arc<InMemoryRepository>,
    pub identity: MockIdentityProvider,
    pub storage: MockObjectStorage,
    pub email: MockEmailSender,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            repo: Arc::new(InMemoryRepository::new()),
            identity: MockIdentityProvider::new(),
            storage: MockObjectStorage::new(),
            email: MockEmailSender::new(),
        }
    }

    pub fn notifier(&self) -> Notifier {
        Notifier::new(
            Arc::new(self.email.clone()),
            "jobs@talentdesk.test",
            "https://talentdesk.test",
        )
    }

    pub async fn user(&self, email: &str, role: Role) -> User {
        let user = new_user(
            Uuid::new_v4(),
            CreateUserRequest::new(email, "Test", "User").with_role(role),
            Utc::now(),
        )
        .unwrap();
        self.repo.create_user(&user).await.unwrap();
        user
    }

    pub async fn job(&self, job_id: &str, status: JobStatus) -> Job {
        let job = new_job(
            CreateJobRequest::new("Cloud Engineer", "Acme", "Cloud", "Remote", "Full-time")
                .with_job_id(job_id)
                .with_status(JobStatus::Draft),
            Utc::now(),
        )
        .unwrap();
        self.repo.create_job(&job).await.unwrap();
        if status == JobStatus::Draft {
            return job;
        }

        let mut job = job;
        for step in route_to(status) {
            job = self
                .repo
                .update_job(
                    &job.job_id,
                    UpdateJobRequest::new().with_status(*step),
                    job.version,
                )
                .await
                .unwrap();
        }
        job
    }
}

fn route_to(status: JobStatus) -> &'static [JobStatus] {
    match status {
        JobStatus::Draft => &[],
        JobStatus::Active => &[JobStatus::Active],
        JobStatus::Paused => &[JobStatus::Active, JobStatus::Paused],
        JobStatus::Closed => &[JobStatus::Closed],
    }
}

/// User store that cannot be reached.
pub struct UnreachableUsers;

fn unreachable<T>() -> RepoResult<T> {
    Err(RepositoryError::ConnectionFailed("user table unreachable".to_string()))
}

#[async_trait]
impl UserRepository for UnreachableUsers {
    async fn get_user(&self, _user_id: Uuid) -> RepoResult<Option<User>> {
        unreachable()
    }

    async fn get_user_by_email(&self, _email: &str) -> RepoResult<Option<User>> {
        unreachable()
    }

    async fn list_users(&self, _page: PageRequest) -> RepoResult<Page<User>> {
        unreachable()
    }

    async fn create_user(&self, _user: &User) -> RepoResult<()> {
        unreachable()
    }

    async fn update_user(
        &self,
        _user_id: Uuid,
        _update: UpdateUserRequest,
        _expected_version: u64,
    ) -> RepoResult<User> {
        unreachable()
    }
}
