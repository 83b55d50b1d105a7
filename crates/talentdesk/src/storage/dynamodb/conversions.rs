//! DynamoDB attribute conversion functions.
//!
//! Pure functions for converting between DynamoDB AttributeValue maps and domain types.
//! These are testable in isolation without DynamoDB access.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use talentdesk_core::applications::{Application, ApplicationStatus};
use talentdesk_core::jobs::{Job, JobStatus, Priority};
use talentdesk_core::schema::{
    application_by_applicant_index_key, application_by_job_index_key, application_key, job_key,
    job_status_index_key, user_by_email_index_key, user_key, EntityType, IndexKey, PrimaryKey,
    ENTITY_TYPE_ATTRIBUTE, PK_ATTRIBUTE, SK_ATTRIBUTE, VERSION_ATTRIBUTE,
};
use talentdesk_core::storage::RepositoryError;
use talentdesk_core::users::{AccountStatus, Resume, Role, User, VerificationStatus};

pub type Item = HashMap<String, AttributeValue>;

// ============================================================================
// Keys
// ============================================================================

/// Key attributes for a GetItem/DeleteItem call.
pub fn key_attributes(key: &PrimaryKey) -> Item {
    HashMap::from([
        (PK_ATTRIBUTE.to_string(), AttributeValue::S(key.pk.clone())),
        (SK_ATTRIBUTE.to_string(), AttributeValue::S(key.sk.clone())),
    ])
}

fn insert_keys(item: &mut Item, key: PrimaryKey, entity_type: EntityType) {
    item.insert(PK_ATTRIBUTE.to_string(), AttributeValue::S(key.pk));
    item.insert(SK_ATTRIBUTE.to_string(), AttributeValue::S(key.sk));
    item.insert(
        ENTITY_TYPE_ATTRIBUTE.to_string(),
        AttributeValue::S(entity_type.as_str().to_string()),
    );
}

fn insert_index_key(item: &mut Item, key: IndexKey) {
    item.insert(
        key.index.pk_attribute().to_string(),
        AttributeValue::S(key.pk),
    );
    item.insert(
        key.index.sk_attribute().to_string(),
        AttributeValue::S(key.sk),
    );
}

/// Reads the version counter off a stored item.
pub fn item_version(item: &Item) -> Option<u64> {
    item.get(VERSION_ATTRIBUTE)
        .and_then(|v| v.as_n().ok())
        .and_then(|n| n.parse().ok())
}

// ============================================================================
// Job conversions
// ============================================================================

/// Convert a Job to DynamoDB item.
pub fn job_to_item(job: &Job) -> Item {
    let mut item = HashMap::new();

    insert_keys(&mut item, job_key(&job.job_id), EntityType::Job);
    insert_index_key(&mut item, job_status_index_key(job.status, job.created_at));

    put_string(&mut item, "jobId", &job.job_id);
    put_string(&mut item, "slug", &job.slug);
    put_string(&mut item, "title", &job.title);
    put_string(&mut item, "company", &job.company);
    put_string(&mut item, "category", &job.category);
    put_string(&mut item, "location", &job.location);
    put_string(&mut item, "employmentType", &job.employment_type);
    put_string(&mut item, "description", &job.description);
    put_optional_string(&mut item, "descriptionHtml", job.description_html.as_deref());
    put_string_list(&mut item, "requirements", &job.requirements);
    put_string_list(&mut item, "qualifications", &job.qualifications);
    put_string_list(&mut item, "preferredSkills", &job.preferred_skills);
    put_string_list(&mut item, "skills", &job.skills);
    put_optional_string(&mut item, "experienceLevel", job.experience_level.as_deref());
    put_string_list(&mut item, "benefits", &job.benefits);
    put_optional_string(&mut item, "salary", job.salary.as_deref());
    put_string(&mut item, "priority", job.priority.as_str());
    item.insert("featured".to_string(), AttributeValue::Bool(job.featured));
    put_string(&mut item, "status", job.status.as_str());
    put_optional_string(&mut item, "externalApplyUrl", job.external_apply_url.as_deref());
    put_string(
        &mut item,
        "postedDate",
        &job.posted_date.format("%Y-%m-%d").to_string(),
    );
    if let Some(expiry) = job.expiry_date {
        put_string(&mut item, "expiryDate", &expiry.format("%Y-%m-%d").to_string());
    }
    put_string(&mut item, "createdAt", &job.created_at.to_rfc3339());
    put_string(&mut item, "updatedAt", &job.updated_at.to_rfc3339());
    put_number(&mut item, VERSION_ATTRIBUTE, job.version);

    item
}

/// Convert a DynamoDB item to Job.
pub fn item_to_job(item: &Item) -> Result<Job, RepositoryError> {
    Ok(Job {
        job_id: get_string(item, "jobId")?,
        slug: get_string(item, "slug")?,
        title: get_string(item, "title")?,
        company: get_string(item, "company")?,
        category: get_string(item, "category")?,
        location: get_string(item, "location")?,
        employment_type: get_string(item, "employmentType")?,
        description: get_optional_string(item, "description").unwrap_or_default(),
        description_html: get_optional_string(item, "descriptionHtml"),
        requirements: get_string_list(item, "requirements"),
        qualifications: get_string_list(item, "qualifications"),
        preferred_skills: get_string_list(item, "preferredSkills"),
        skills: get_string_list(item, "skills"),
        experience_level: get_optional_string(item, "experienceLevel"),
        benefits: get_string_list(item, "benefits"),
        salary: get_optional_string(item, "salary"),
        priority: parse_field::<Priority>(item, "priority")?.unwrap_or_default(),
        featured: get_bool(item, "featured"),
        status: parse_field::<JobStatus>(item, "status")?
            .ok_or_else(|| missing_field("status"))?,
        external_apply_url: get_optional_string(item, "externalApplyUrl"),
        posted_date: get_date(item, "postedDate")?,
        expiry_date: get_optional_string(item, "expiryDate")
            .map(|_| get_date(item, "expiryDate"))
            .transpose()?,
        created_at: get_datetime(item, "createdAt")?,
        updated_at: get_datetime(item, "updatedAt")?,
        version: get_version(item)?,
    })
}

// ============================================================================
// Application conversions
// ============================================================================

/// Convert an Application to DynamoDB item.
///
/// The email is expected to be normalized already; it feeds the GSI3 key.
pub fn application_to_item(application: &Application) -> Item {
    let mut item = HashMap::new();

    insert_keys(
        &mut item,
        application_key(application.application_id),
        EntityType::Application,
    );
    insert_index_key(
        &mut item,
        application_by_job_index_key(&application.job_id, application.created_at),
    );
    insert_index_key(
        &mut item,
        application_by_applicant_index_key(&application.email, application.created_at),
    );

    put_string(
        &mut item,
        "applicationId",
        &application.application_id.to_string(),
    );
    put_string(&mut item, "jobId", &application.job_id);
    put_string(&mut item, "firstName", &application.first_name);
    put_string(&mut item, "lastName", &application.last_name);
    put_string(&mut item, "email", &application.email);
    put_string(&mut item, "phone", &application.phone);
    put_optional_string(&mut item, "linkedinUrl", application.linkedin_url.as_deref());
    put_string(&mut item, "coverLetter", &application.cover_letter);
    put_string(&mut item, "resumeKey", &application.resume_key);
    put_string(&mut item, "status", application.status.as_str());
    put_string(&mut item, "appliedAt", &application.applied_at.to_rfc3339());
    put_string(&mut item, "createdAt", &application.created_at.to_rfc3339());
    put_string(&mut item, "updatedAt", &application.updated_at.to_rfc3339());
    put_string(&mut item, "source", &application.source);
    put_number(&mut item, VERSION_ATTRIBUTE, application.version);

    item
}

/// Convert a DynamoDB item to Application.
pub fn item_to_application(item: &Item) -> Result<Application, RepositoryError> {
    Ok(Application {
        application_id: get_uuid(item, "applicationId")?,
        job_id: get_string(item, "jobId")?,
        first_name: get_string(item, "firstName")?,
        last_name: get_string(item, "lastName")?,
        email: get_string(item, "email")?,
        phone: get_optional_string(item, "phone").unwrap_or_default(),
        linkedin_url: get_optional_string(item, "linkedinUrl"),
        cover_letter: get_optional_string(item, "coverLetter").unwrap_or_default(),
        resume_key: get_optional_string(item, "resumeKey").unwrap_or_default(),
        status: parse_field::<ApplicationStatus>(item, "status")?
            .ok_or_else(|| missing_field("status"))?,
        applied_at: get_datetime(item, "appliedAt")?,
        created_at: get_datetime(item, "createdAt")?,
        updated_at: get_datetime(item, "updatedAt")?,
        source: get_optional_string(item, "source").unwrap_or_default(),
        version: get_version(item)?,
    })
}

// ============================================================================
// User conversions
// ============================================================================

/// Convert a User to DynamoDB item. Resumes are stored inline as a list of maps.
pub fn user_to_item(user: &User) -> Item {
    let mut item = HashMap::new();

    insert_keys(&mut item, user_key(user.user_id), EntityType::User);
    insert_index_key(&mut item, user_by_email_index_key(&user.email, user.user_id));

    put_string(&mut item, "userId", &user.user_id.to_string());
    put_string(&mut item, "email", &user.email);
    put_string(&mut item, "firstName", &user.first_name);
    put_string(&mut item, "lastName", &user.last_name);
    put_string(&mut item, "role", user.role.as_str());
    put_optional_string(&mut item, "bio", user.bio.as_deref());
    put_string_list(&mut item, "skills", &user.skills);
    put_optional_string(&mut item, "experience", user.experience.as_deref());
    put_optional_string(&mut item, "phone", user.phone.as_deref());
    put_optional_string(&mut item, "location", user.location.as_deref());
    put_optional_string(&mut item, "linkedinUrl", user.linkedin_url.as_deref());
    put_optional_string(&mut item, "githubUrl", user.github_url.as_deref());
    put_optional_string(&mut item, "portfolioUrl", user.portfolio_url.as_deref());
    item.insert(
        "resumes".to_string(),
        AttributeValue::L(
            user.resumes
                .iter()
                .map(|r| AttributeValue::M(resume_to_map(r)))
                .collect(),
        ),
    );
    put_string(
        &mut item,
        "verificationStatus",
        user.verification_status.as_str(),
    );
    if let Some(verified_at) = user.verified_at {
        put_string(&mut item, "verifiedAt", &verified_at.to_rfc3339());
    }
    put_string(&mut item, "accountStatus", user.account_status.as_str());
    put_string(&mut item, "createdAt", &user.created_at.to_rfc3339());
    put_string(&mut item, "updatedAt", &user.updated_at.to_rfc3339());
    put_number(&mut item, VERSION_ATTRIBUTE, user.version);

    item
}

/// Convert a DynamoDB item to User.
pub fn item_to_user(item: &Item) -> Result<User, RepositoryError> {
    let resumes = match item.get("resumes").and_then(|v| v.as_l().ok()) {
        Some(list) => list
            .iter()
            .map(|v| {
                v.as_m()
                    .map_err(|_| RepositoryError::InvalidData("Invalid resume entry".to_string()))
                    .and_then(map_to_resume)
            })
            .collect::<Result<Vec<_>, _>>()?,
        None => Vec::new(),
    };

    Ok(User {
        user_id: get_uuid(item, "userId")?,
        email: get_string(item, "email")?,
        first_name: get_string(item, "firstName")?,
        last_name: get_string(item, "lastName")?,
        role: parse_field::<Role>(item, "role")?.unwrap_or_default(),
        bio: get_optional_string(item, "bio"),
        skills: get_string_list(item, "skills"),
        experience: get_optional_string(item, "experience"),
        phone: get_optional_string(item, "phone"),
        location: get_optional_string(item, "location"),
        linkedin_url: get_optional_string(item, "linkedinUrl"),
        github_url: get_optional_string(item, "githubUrl"),
        portfolio_url: get_optional_string(item, "portfolioUrl"),
        resumes,
        verification_status: parse_field::<VerificationStatus>(item, "verificationStatus")?
            .unwrap_or_default(),
        verified_at: get_optional_string(item, "verifiedAt")
            .map(|_| get_datetime(item, "verifiedAt"))
            .transpose()?,
        account_status: parse_field::<AccountStatus>(item, "accountStatus")?.unwrap_or_default(),
        created_at: get_datetime(item, "createdAt")?,
        updated_at: get_datetime(item, "updatedAt")?,
        version: get_version(item)?,
    })
}

fn resume_to_map(resume: &Resume) -> Item {
    let mut map = HashMap::new();
    put_string(&mut map, "resumeId", &resume.resume_id.to_string());
    put_string(&mut map, "fileName", &resume.file_name);
    put_string(&mut map, "storageKey", &resume.storage_key);
    put_string(&mut map, "uploadedAt", &resume.uploaded_at.to_rfc3339());
    map.insert("isDefault".to_string(), AttributeValue::Bool(resume.is_default));
    if let Some(size) = resume.file_size {
        put_number(&mut map, "fileSize", size);
    }
    put_optional_string(&mut map, "mimeType", resume.mime_type.as_deref());
    map
}

fn map_to_resume(map: &Item) -> Result<Resume, RepositoryError> {
    Ok(Resume {
        resume_id: get_uuid(map, "resumeId")?,
        file_name: get_string(map, "fileName")?,
        storage_key: get_string(map, "storageKey")?,
        uploaded_at: get_datetime(map, "uploadedAt")?,
        is_default: get_bool(map, "isDefault"),
        file_size: map
            .get("fileSize")
            .and_then(|v| v.as_n().ok())
            .and_then(|n| n.parse().ok()),
        mime_type: get_optional_string(map, "mimeType"),
    })
}

// ============================================================================
// Helper functions
// ============================================================================

fn put_string(item: &mut Item, key: &str, value: &str) {
    item.insert(key.to_string(), AttributeValue::S(value.to_string()));
}

fn put_optional_string(item: &mut Item, key: &str, value: Option<&str>) {
    if let Some(value) = value {
        put_string(item, key, value);
    }
}

fn put_string_list(item: &mut Item, key: &str, values: &[String]) {
    item.insert(
        key.to_string(),
        AttributeValue::L(values.iter().cloned().map(AttributeValue::S).collect()),
    );
}

fn put_number(item: &mut Item, key: &str, value: u64) {
    item.insert(key.to_string(), AttributeValue::N(value.to_string()));
}

fn missing_field(key: &str) -> RepositoryError {
    RepositoryError::InvalidData(format!("Missing or invalid field: {}", key))
}

/// Get a required string attribute.
fn get_string(item: &Item, key: &str) -> Result<String, RepositoryError> {
    item.get(key)
        .and_then(|v| v.as_s().ok())
        .map(|s| s.to_string())
        .ok_or_else(|| missing_field(key))
}

/// Get an optional string attribute.
fn get_optional_string(item: &Item, key: &str) -> Option<String> {
    item.get(key)
        .and_then(|v| v.as_s().ok())
        .map(|s| s.to_string())
}

/// Get a string list; absent means empty.
fn get_string_list(item: &Item, key: &str) -> Vec<String> {
    item.get(key)
        .and_then(|v| v.as_l().ok())
        .map(|list| {
            list.iter()
                .filter_map(|v| v.as_s().ok().cloned())
                .collect()
        })
        .unwrap_or_default()
}

fn get_bool(item: &Item, key: &str) -> bool {
    item.get(key)
        .and_then(|v| v.as_bool().ok())
        .copied()
        .unwrap_or(false)
}

fn get_version(item: &Item) -> Result<u64, RepositoryError> {
    item_version(item).ok_or_else(|| missing_field(VERSION_ATTRIBUTE))
}

/// Parse an optional string attribute with `FromStr`.
fn parse_field<T>(item: &Item, key: &str) -> Result<Option<T>, RepositoryError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_optional_string(item, key)
        .map(|s| {
            s.parse::<T>()
                .map_err(|e| RepositoryError::InvalidData(format!("Invalid {}: {}", key, e)))
        })
        .transpose()
}

/// Get a required UUID attribute.
fn get_uuid(item: &Item, key: &str) -> Result<Uuid, RepositoryError> {
    let s = get_string(item, key)?;
    Uuid::parse_str(&s)
        .map_err(|e| RepositoryError::InvalidData(format!("Invalid UUID {}: {}", key, e)))
}

/// Get a required date attribute (YYYY-MM-DD format).
fn get_date(item: &Item, key: &str) -> Result<NaiveDate, RepositoryError> {
    let s = get_string(item, key)?;
    NaiveDate::parse_from_str(&s, "%Y-%m-%d")
        .map_err(|e| RepositoryError::InvalidData(format!("Invalid date {}: {}", key, e)))
}

/// Get a required datetime attribute (RFC 3339 format).
fn get_datetime(item: &Item, key: &str) -> Result<DateTime<Utc>, RepositoryError> {
    let s = get_string(item, key)?;
    DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::InvalidData(format!("Invalid datetime {}: {}", key, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use talentdesk_core::applications::{new_application, SubmitApplicationRequest};
    use talentdesk_core::jobs::{new_job, CreateJobRequest};
    use talentdesk_core::users::{add_resume, new_user, CreateUserRequest, NewResume};

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn sample_job() -> Job {
        let mut job = new_job(
            CreateJobRequest::new("Senior Cloud Engineer", "Acme", "Engineering", "Remote", "Full-time")
                .with_job_id("engineering-abc12345")
                .with_description("Build things"),
            at("2024-01-15T10:30:00Z"),
        )
        .unwrap();
        job.skills = vec!["rust".to_string(), "aws".to_string()];
        job.salary = Some("120k".to_string());
        job.expiry_date = NaiveDate::from_ymd_opt(2024, 3, 1);
        job
    }

    fn sample_application() -> Application {
        new_application(
            Uuid::parse_str("550e8400-e29b-41d4-a716-446655440003").unwrap(),
            SubmitApplicationRequest::new(
                "engineering-abc12345",
                "Jane",
                "Doe",
                "Jane@Example.COM",
                "555-0100",
                "Hello",
                "resumes/jane.pdf",
            ),
            at("2024-01-16T08:00:00Z"),
        )
        .unwrap()
    }

    fn sample_user() -> User {
        let mut user = new_user(
            Uuid::parse_str("550e8400-e29b-41d4-a716-446655440001").unwrap(),
            CreateUserRequest::new("john@example.com", "John", "Doe"),
            at("2024-01-15T10:30:00Z"),
        )
        .unwrap();
        let resume = NewResume::new("cv.pdf", "resumes/cv.pdf")
            .into_resume(Uuid::new_v4(), at("2024-01-15T11:00:00Z"));
        user.resumes = add_resume(&user.resumes, resume).unwrap();
        user
    }

    #[test]
    fn test_job_round_trip() {
        let job = sample_job();
        let parsed = item_to_job(&job_to_item(&job)).unwrap();
        assert_eq!(job, parsed);
    }

    #[test]
    fn test_job_item_has_correct_keys() {
        let item = job_to_item(&sample_job());

        assert_eq!(
            item.get("PK").unwrap().as_s().unwrap(),
            "JOB#engineering-abc12345"
        );
        assert_eq!(
            item.get("SK").unwrap().as_s().unwrap(),
            "META#engineering-abc12345"
        );
        assert_eq!(
            item.get("GSI1PK").unwrap().as_s().unwrap(),
            "JOBSTATUS#draft"
        );
        assert!(item
            .get("GSI1SK")
            .unwrap()
            .as_s()
            .unwrap()
            .starts_with("CREATED#2024-01-15T10:30:00"));
        assert_eq!(item.get("entityType").unwrap().as_s().unwrap(), "JOB");
        assert_eq!(item.get("version").unwrap().as_n().unwrap(), "1");
    }

    #[test]
    fn test_application_item_indexes() {
        let application = sample_application();
        let item = application_to_item(&application);

        assert_eq!(
            item.get("GSI2PK").unwrap().as_s().unwrap(),
            "JOB#engineering-abc12345"
        );
        assert_eq!(
            item.get("GSI3PK").unwrap().as_s().unwrap(),
            "APPLICANT#jane@example.com"
        );
        assert_eq!(item_to_application(&item).unwrap(), application);
    }

    #[test]
    fn test_user_round_trip_with_resumes() {
        let user = sample_user();
        let item = user_to_item(&user);

        assert_eq!(
            item.get("GSI2PK").unwrap().as_s().unwrap(),
            "EMAIL#john@example.com"
        );
        assert_eq!(
            item.get("GSI2SK").unwrap().as_s().unwrap(),
            "USER#550e8400-e29b-41d4-a716-446655440001"
        );

        let parsed = item_to_user(&item).unwrap();
        assert_eq!(parsed, user);
        assert!(parsed.resumes[0].is_default);
    }

    #[test]
    fn test_bad_status_is_invalid_data() {
        let mut item = job_to_item(&sample_job());
        item.insert("status".to_string(), AttributeValue::S("archived".to_string()));

        assert!(matches!(
            item_to_job(&item),
            Err(RepositoryError::InvalidData(_))
        ));
    }

    #[test]
    fn test_missing_version() {
        let mut item = user_to_item(&sample_user());
        item.remove("version");
        assert!(item_version(&item).is_none());
        assert!(item_to_user(&item).is_err());
    }

    #[test]
    fn test_get_string_missing_field() {
        let item = HashMap::new();
        assert!(get_string(&item, "missing").is_err());
    }
}
