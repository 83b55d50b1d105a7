//! DynamoDB repository implementation.
//!
//! Implements the repository traits from `talentdesk_core::storage` over a single
//! table. Versioned writes put the whole item back under a condition on the
//! stored version, so the status and email index keys always follow the data.

use async_trait::async_trait;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValuesOnConditionCheckFailure, Select};
use aws_sdk_dynamodb::Client;
use chrono::Utc;
use uuid::Uuid;

use talentdesk_core::applications::{apply_status_change, Application, ApplicationStatus};
use talentdesk_core::email::normalize_email;
use talentdesk_core::jobs::{apply_job_update, Job, JobStatus, UpdateJobRequest};
use talentdesk_core::schema::{
    application_index_sk_prefix, application_key, applications_by_applicant_partition,
    applications_by_job_partition, job_key, job_status_index_sk_prefix, job_status_partition,
    user_email_partition, user_index_sk_prefix, user_key, EntityType, Index, PrimaryKey,
    ENTITY_TYPE_ATTRIBUTE, VERSION_ATTRIBUTE,
};
use talentdesk_core::storage::{
    ApplicationRepository, DeletedJob, JobRepository, Page, PageRequest, RepositoryError, Result,
    ResumeRepository, UserRepository,
};
use talentdesk_core::users::{
    add_resume, apply_user_update, remove_resume, set_default_resume, with_resumes, Resume,
    UpdateUserRequest, User,
};

use super::conversions::{
    application_to_item, item_to_application, item_to_job, item_to_user, job_to_item,
    key_attributes, user_to_item, Item,
};
use super::cursor::{decode_cursor, encode_cursor};
use super::error::{
    map_delete_item_error, map_get_item_error, map_put_item_error, map_query_error,
    map_scan_error, map_versioned_put_error,
};

/// DynamoDB-based repository implementation.
///
/// Provides async access to DynamoDB storage for all entity types.
#[derive(Debug, Clone)]
pub struct DynamoDbRepository {
    client: Client,
    table_name: String,
}

/// One page of raw items plus the encoded cursor for the next one.
struct RawPage {
    items: Vec<Item>,
    next_cursor: Option<String>,
}

impl RawPage {
    fn convert<T>(self, f: impl Fn(&Item) -> Result<T>) -> Result<Page<T>> {
        let items = self.items.iter().map(f).collect::<Result<Vec<_>>>()?;
        Ok(Page::new(items, self.next_cursor))
    }
}

fn page_limit(page: &PageRequest) -> i32 {
    i32::try_from(page.limit.max(1)).unwrap_or(i32::MAX)
}

impl DynamoDbRepository {
    /// Creates a new repository with the given DynamoDB client and table name.
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    /// Get the table name.
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Underlying client, for table bootstrap.
    pub fn client(&self) -> &Client {
        &self.client
    }

    async fn get_item(
        &self,
        key: &PrimaryKey,
        entity_type: &'static str,
        id: &str,
    ) -> Result<Option<Item>> {
        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .set_key(Some(key_attributes(key)))
            .consistent_read(true)
            .send()
            .await
            .map_err(|e| map_get_item_error(e, entity_type, id))?;

        Ok(result.item)
    }

    /// Newest-first query over one partition of an index.
    async fn query_index(
        &self,
        index: Index,
        partition: String,
        sk_prefix: &str,
        page: &PageRequest,
    ) -> Result<RawPage> {
        let start_key = page.cursor.as_deref().map(decode_cursor).transpose()?;

        let result = self
            .client
            .query()
            .table_name(&self.table_name)
            .index_name(index.name())
            .key_condition_expression("#pk = :pk AND begins_with(#sk, :prefix)")
            .expression_attribute_names("#pk", index.pk_attribute())
            .expression_attribute_names("#sk", index.sk_attribute())
            .expression_attribute_values(":pk", AttributeValue::S(partition))
            .expression_attribute_values(":prefix", AttributeValue::S(sk_prefix.to_string()))
            .scan_index_forward(false)
            .limit(page_limit(page))
            .set_exclusive_start_key(start_key)
            .send()
            .await
            .map_err(map_query_error)?;

        let next_cursor = encode_cursor(result.last_evaluated_key())?;
        Ok(RawPage {
            items: result.items.unwrap_or_default(),
            next_cursor,
        })
    }

    /// Paged scan over one entity type.
    ///
    /// The limit applies before the entity filter, so a page may come back
    /// short (even empty) while still carrying a cursor. Items are unordered.
    async fn scan_entities(&self, entity_type: EntityType, page: &PageRequest) -> Result<RawPage> {
        let start_key = page.cursor.as_deref().map(decode_cursor).transpose()?;

        let result = self
            .client
            .scan()
            .table_name(&self.table_name)
            .filter_expression("#type = :type")
            .expression_attribute_names("#type", ENTITY_TYPE_ATTRIBUTE)
            .expression_attribute_values(
                ":type",
                AttributeValue::S(entity_type.as_str().to_string()),
            )
            .limit(page_limit(page))
            .set_exclusive_start_key(start_key)
            .send()
            .await
            .map_err(map_scan_error)?;

        let next_cursor = encode_cursor(result.last_evaluated_key())?;
        Ok(RawPage {
            items: result.items.unwrap_or_default(),
            next_cursor,
        })
    }

    async fn put_new(&self, item: Item, entity_type: &'static str, id: &str) -> Result<()> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .condition_expression("attribute_not_exists(PK)")
            .send()
            .await
            .map_err(|e| map_put_item_error(e, entity_type, id))?;

        Ok(())
    }

    /// Replaces an item only if its stored version is still `expected`.
    async fn put_versioned(
        &self,
        item: Item,
        entity_type: &'static str,
        id: &str,
        expected: u64,
    ) -> Result<()> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .condition_expression("attribute_exists(PK) AND #version = :expected")
            .expression_attribute_names("#version", VERSION_ATTRIBUTE)
            .expression_attribute_values(":expected", AttributeValue::N(expected.to_string()))
            .return_values_on_condition_check_failure(ReturnValuesOnConditionCheckFailure::AllOld)
            .send()
            .await
            .map_err(|e| map_versioned_put_error(e, entity_type, id, expected))?;

        Ok(())
    }

    async fn load_user(&self, user_id: Uuid) -> Result<User> {
        self.get_user(user_id)
            .await?
            .ok_or_else(|| RepositoryError::not_found("User", user_id))
    }

    /// Read-modify-write of a user's resume list, guarded by the user version.
    async fn edit_resumes<T: Send>(
        &self,
        user_id: Uuid,
        edit: impl FnOnce(&[Resume]) -> Result<(Vec<Resume>, T)> + Send,
    ) -> Result<T> {
        let current = self.load_user(user_id).await?;
        let (resumes, output) = edit(&current.resumes)?;
        let updated = with_resumes(&current, resumes, Utc::now());

        self.put_versioned(
            user_to_item(&updated),
            "User",
            &user_id.to_string(),
            current.version,
        )
        .await?;

        Ok(output)
    }
}

// ============================================================================
// JobRepository implementation
// ============================================================================

#[async_trait]
impl JobRepository for DynamoDbRepository {
    async fn get_job(&self, job_id: &str) -> Result<Option<Job>> {
        let item = self.get_item(&job_key(job_id), "Job", job_id).await?;
        item.as_ref().map(item_to_job).transpose()
    }

    async fn list_jobs(&self, status: Option<JobStatus>, page: PageRequest) -> Result<Page<Job>> {
        let raw = match status {
            Some(status) => {
                self.query_index(
                    Index::Gsi1,
                    job_status_partition(status),
                    job_status_index_sk_prefix(),
                    &page,
                )
                .await?
            }
            None => self.scan_entities(EntityType::Job, &page).await?,
        };
        raw.convert(item_to_job)
    }

    async fn create_job(&self, job: &Job) -> Result<()> {
        self.put_new(job_to_item(job), "Job", &job.job_id).await
    }

    async fn update_job(
        &self,
        job_id: &str,
        update: UpdateJobRequest,
        expected_version: u64,
    ) -> Result<Job> {
        let current = self
            .get_job(job_id)
            .await?
            .ok_or_else(|| RepositoryError::not_found("Job", job_id))?;

        if current.version != expected_version {
            return Err(RepositoryError::version_conflict(
                "Job",
                job_id,
                expected_version,
                current.version,
            ));
        }

        let updated = apply_job_update(&current, update, Utc::now())?;
        self.put_versioned(job_to_item(&updated), "Job", job_id, expected_version)
            .await?;

        tracing::debug!(job_id = %job_id, version = updated.version, status = %updated.status, "job updated");
        Ok(updated)
    }

    async fn delete_job(&self, job_id: &str) -> Result<DeletedJob> {
        let key = job_key(job_id);
        let job = self
            .get_job(job_id)
            .await?
            .ok_or_else(|| RepositoryError::not_found("Job", job_id))?;

        self.client
            .delete_item()
            .table_name(&self.table_name)
            .set_key(Some(key_attributes(&key)))
            .condition_expression("attribute_exists(PK)")
            .send()
            .await
            .map_err(|e| map_delete_item_error(e, "Job", job_id))?;

        let dependent_application_count = self.count_applications_for_job(job_id).await?;

        Ok(DeletedJob {
            job,
            dependent_application_count,
        })
    }
}

// ============================================================================
// ApplicationRepository implementation
// ============================================================================

#[async_trait]
impl ApplicationRepository for DynamoDbRepository {
    async fn get_application(&self, application_id: Uuid) -> Result<Option<Application>> {
        let item = self
            .get_item(
                &application_key(application_id),
                "Application",
                &application_id.to_string(),
            )
            .await?;
        item.as_ref().map(item_to_application).transpose()
    }

    async fn list_applications_by_job(
        &self,
        job_id: &str,
        page: PageRequest,
    ) -> Result<Page<Application>> {
        self.query_index(
            Index::Gsi2,
            applications_by_job_partition(job_id),
            application_index_sk_prefix(),
            &page,
        )
        .await?
        .convert(item_to_application)
    }

    async fn list_applications_by_applicant(
        &self,
        email: &str,
        page: PageRequest,
    ) -> Result<Page<Application>> {
        self.query_index(
            Index::Gsi3,
            applications_by_applicant_partition(&normalize_email(email)),
            application_index_sk_prefix(),
            &page,
        )
        .await?
        .convert(item_to_application)
    }

    async fn list_applications(&self, page: PageRequest) -> Result<Page<Application>> {
        self.scan_entities(EntityType::Application, &page)
            .await?
            .convert(item_to_application)
    }

    async fn count_applications_for_job(&self, job_id: &str) -> Result<usize> {
        let index = Index::Gsi2;
        let mut count = 0usize;
        let mut start_key = None;

        loop {
            let result = self
                .client
                .query()
                .table_name(&self.table_name)
                .index_name(index.name())
                .key_condition_expression("#pk = :pk AND begins_with(#sk, :prefix)")
                .expression_attribute_names("#pk", index.pk_attribute())
                .expression_attribute_names("#sk", index.sk_attribute())
                .expression_attribute_values(
                    ":pk",
                    AttributeValue::S(applications_by_job_partition(job_id)),
                )
                .expression_attribute_values(
                    ":prefix",
                    AttributeValue::S(application_index_sk_prefix().to_string()),
                )
                .select(Select::Count)
                .set_exclusive_start_key(start_key)
                .send()
                .await
                .map_err(map_query_error)?;

            count += usize::try_from(result.count).unwrap_or_default();
            match result.last_evaluated_key {
                Some(key) if !key.is_empty() => start_key = Some(key),
                _ => break,
            }
        }

        Ok(count)
    }

    async fn create_application(&self, application: &Application) -> Result<()> {
        let mut stored = application.clone();
        stored.email = normalize_email(&stored.email);

        self.put_new(
            application_to_item(&stored),
            "Application",
            &stored.application_id.to_string(),
        )
        .await
    }

    async fn update_application_status(
        &self,
        application_id: Uuid,
        status: ApplicationStatus,
        expected_version: u64,
    ) -> Result<Application> {
        let current = self
            .get_application(application_id)
            .await?
            .ok_or_else(|| RepositoryError::not_found("Application", application_id))?;

        if current.version != expected_version {
            return Err(RepositoryError::version_conflict(
                "Application",
                application_id,
                expected_version,
                current.version,
            ));
        }

        let updated = apply_status_change(&current, status, Utc::now())?;
        self.put_versioned(
            application_to_item(&updated),
            "Application",
            &application_id.to_string(),
            expected_version,
        )
        .await?;

        Ok(updated)
    }
}

// ============================================================================
// UserRepository implementation
// ============================================================================

#[async_trait]
impl UserRepository for DynamoDbRepository {
    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>> {
        let item = self
            .get_item(&user_key(user_id), "User", &user_id.to_string())
            .await?;
        item.as_ref().map(item_to_user).transpose()
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let page = self
            .query_index(
                Index::Gsi2,
                user_email_partition(&normalize_email(email)),
                user_index_sk_prefix(),
                &PageRequest::first(1),
            )
            .await?;

        page.items.first().map(item_to_user).transpose()
    }

    async fn list_users(&self, page: PageRequest) -> Result<Page<User>> {
        self.scan_entities(EntityType::User, &page)
            .await?
            .convert(item_to_user)
    }

    /// Email uniqueness is checked through the email index before the put.
    /// Two concurrent sign-ups with the same email can both pass the check.
    async fn create_user(&self, user: &User) -> Result<()> {
        let mut stored = user.clone();
        stored.email = normalize_email(&stored.email);

        if self.get_user_by_email(&stored.email).await?.is_some() {
            return Err(RepositoryError::already_exists("User", &stored.email));
        }

        self.put_new(user_to_item(&stored), "User", &stored.user_id.to_string())
            .await
    }

    async fn update_user(
        &self,
        user_id: Uuid,
        update: UpdateUserRequest,
        expected_version: u64,
    ) -> Result<User> {
        let current = self.load_user(user_id).await?;

        if current.version != expected_version {
            return Err(RepositoryError::version_conflict(
                "User",
                user_id,
                expected_version,
                current.version,
            ));
        }

        let updated = apply_user_update(&current, update, Utc::now());
        self.put_versioned(
            user_to_item(&updated),
            "User",
            &user_id.to_string(),
            expected_version,
        )
        .await?;

        Ok(updated)
    }
}

// ============================================================================
// ResumeRepository implementation
// ============================================================================

#[async_trait]
impl ResumeRepository for DynamoDbRepository {
    async fn list_resumes(&self, user_id: Uuid) -> Result<Vec<Resume>> {
        Ok(self.load_user(user_id).await?.resumes)
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
