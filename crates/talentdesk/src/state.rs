//! Application state shared by every request handler.
//!
//! Holds the service-boundary workflows, built over repository and collaborator
//! trait objects. The storage backend is chosen at compile time via feature
//! flags; collaborators are chosen at runtime from configuration.

use std::sync::Arc;

use talentdesk_core::collaborators::{EmailSender, IdentityProvider, ObjectStorage};
use talentdesk_core::storage::{
    ApplicationRepository, JobRepository, ResumeRepository, UserRepository,
};

use crate::collaborators::{GatewayClient, MockEmailSender, MockIdentityProvider, MockObjectStorage};
use crate::config::Config;
use crate::services::{AccountService, ApplicationService, JobService, Notifier, ResumeService};

/// External managed services used by the workflows.
#[derive(Clone)]
pub struct Collaborators {
    pub identity: Arc<dyn IdentityProvider>,
    pub storage: Arc<dyn ObjectStorage>,
    pub email: Arc<dyn EmailSender>,
}

impl Collaborators {
    /// Gateway-backed collaborators when `GATEWAY_URL` is set, mocks otherwise.
    /// Resume storage moves to S3 when `RESUME_BUCKET` is set.
    pub async fn from_config(config: &Config) -> Self {
        let base = match &config.gateway_url {
            Some(url) => {
                tracing::info!(gateway = %url, "using managed-services gateway");
                let gateway = Arc::new(GatewayClient::new(url.clone(), config.gateway_api_key.clone()));
                Self {
                    identity: gateway.clone(),
                    storage: gateway.clone(),
                    email: gateway,
                }
            }
            None => {
                tracing::warn!("GATEWAY_URL not set, using mock collaborators");
                Self::mock()
            }
        };

        let storage = resume_storage(config, base.storage.clone()).await;
        Self { storage, ..base }
    }

    pub fn mock() -> Self {
        Self {
            identity: Arc::new(MockIdentityProvider::new()),
            storage: Arc::new(MockObjectStorage::new()),
            email: Arc::new(MockEmailSender::new()),
        }
    }
}

#[cfg(feature = "s3")]
async fn resume_storage(
    config: &Config,
    fallback: Arc<dyn ObjectStorage>,
) -> Arc<dyn ObjectStorage> {
    match &config.resume_bucket {
        Some(bucket) => {
            tracing::info!(bucket = %bucket, "using S3 resume storage");
            Arc::new(crate::collaborators::S3ObjectStorage::from_config(config, bucket).await)
        }
        None => fallback,
    }
}

#[cfg(not(feature = "s3"))]
async fn resume_storage(
    config: &Config,
    fallback: Arc<dyn ObjectStorage>,
) -> Arc<dyn ObjectStorage> {
    if config.resume_bucket.is_some() {
        tracing::warn!("RESUME_BUCKET is set but S3 support is not compiled in");
    }
    fallback
}

/// Shared application state.
///
/// Cloned for each request; everything inside is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub jobs: JobService,
    pub applications: ApplicationService,
    pub accounts: AccountService,
    pub resumes: ResumeService,
    /// Used to resolve the acting user from request headers.
    pub users: Arc<dyn UserRepository>,
    /// Include internal failure details in error responses.
    pub expose_error_details: bool,
}

impl AppState {
    /// Wires the services over one storage backend.
    pub fn build<R>(repo: Arc<R>, collaborators: Collaborators, config: &Config) -> Self
    where
        R: JobRepository + ApplicationRepository + UserRepository + ResumeRepository + 'static,
    {
        let limits = config.page_limits();
        let notifier = Notifier::new(
            collaborators.email.clone(),
            config.mail_from.clone(),
            config.site_url.clone(),
        );

        Self {
            jobs: JobService::new(repo.clone(), limits),
            applications: ApplicationService::new(repo.clone(), repo.clone(), limits)
                .with_notifier(notifier),
            accounts: AccountService::new(repo.clone(), collaborators.identity.clone(), limits),
            resumes: ResumeService::new(
                repo.clone(),
                repo.clone(),
                repo.clone(),
                collaborators.storage.clone(),
            ),
            users: repo,
            expose_error_details: config.expose_error_details,
        }
    }
}

// ============================================================================
// Factory functions for the storage backends
// ============================================================================

#[cfg(any(feature = "inmemory", test))]
mod inmemory {
    use super::*;
    use crate::storage::inmemory::InMemoryRepository;

    impl AppState {
        /// Creates AppState over process-local storage.
        pub fn in_memory(collaborators: Collaborators, config: &Config) -> Self {
            Self::build(Arc::new(InMemoryRepository::new()), collaborators, config)
        }
    }
}

#[cfg(feature = "inmemory")]
mod inmemory_factory {
    use super::*;

    impl AppState {
        /// Creates AppState with in-memory storage.
        /// Useful for development without any external dependencies.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            tracing::info!("using in-memory storage");
            Ok(Self::in_memory(Collaborators::from_config(config).await, config))
        }
    }
}

#[cfg(feature = "dynamodb")]
mod dynamodb_factory {
    use super::*;
    use crate::storage::dynamodb::{ensure_table, DynamoDbRepository};
    use talentdesk_core::schema::TABLE_LAYOUT;

    impl AppState {
        /// Creates AppState with DynamoDB storage.
        ///
        /// With an endpoint override (local DynamoDB) the table is created
        /// when missing.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
            if let Some(endpoint) = &config.aws_endpoint_url {
                loader = loader.endpoint_url(endpoint.clone());
            }
            let aws_config = loader.load().await;
            let dynamodb_client = aws_sdk_dynamodb::Client::new(&aws_config);

            if config.aws_endpoint_url.is_some() {
                let created =
                    ensure_table(&dynamodb_client, &config.table_name, &TABLE_LAYOUT).await?;
                if created {
                    tracing::info!(table = %config.table_name, "created local table");
                }
            }

            tracing::info!(table = %config.table_name, "using DynamoDB storage");
            let dynamodb_repo = Arc::new(DynamoDbRepository::new(
                dynamodb_client,
                config.table_name.clone(),
            ));

            Ok(Self::build(
                dynamodb_repo,
                Collaborators::from_config(config).await,
                config,
            ))
        }
    }
}
