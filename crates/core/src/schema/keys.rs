//! Key generation functions for the single-table layout.
//!
//! Pure functions for generating partition and sort keys. Repository code never
//! formats key strings by hand; every key goes through this module so that a
//! lookup issued twice with the same inputs always hits the same item.

use chrono::{DateTime, SecondsFormat, Utc};
use uuid::Uuid;

use crate::jobs::JobStatus;

use super::table::Index;

// ============================================================================
// Key prefixes
// ============================================================================

pub const JOB_PREFIX: &str = "JOB#";
pub const JOB_META_PREFIX: &str = "META#";
pub const JOB_STATUS_PREFIX: &str = "JOBSTATUS#";
pub const CREATED_PREFIX: &str = "CREATED#";
pub const APPLICATION_PREFIX: &str = "APPLICATION#";
pub const APPLICANT_PREFIX: &str = "APPLICANT#";
pub const USER_PREFIX: &str = "USER#";
pub const EMAIL_PREFIX: &str = "EMAIL#";
pub const METADATA_SK: &str = "METADATA";

/// Primary key of an item in the table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PrimaryKey {
    pub pk: String,
    pub sk: String,
}

/// Key of an item inside one of the global secondary indexes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndexKey {
    pub index: Index,
    pub pk: String,
    pub sk: String,
}

/// Formats a timestamp for use inside a sort key.
///
/// Fixed millisecond precision with a `Z` suffix keeps the strings
/// lexicographically ordered in the same order as the instants.
pub fn sortable_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

// ============================================================================
// Job keys
// ============================================================================

/// Primary key for a Job.
///
/// Pattern: `JOB#<job_id>` / `META#<job_id>`
pub fn job_key(job_id: &str) -> PrimaryKey {
    PrimaryKey {
        pk: format!("{JOB_PREFIX}{job_id}"),
        sk: format!("{JOB_META_PREFIX}{job_id}"),
    }
}

/// GSI1 partition holding every job in a given status.
///
/// Pattern: `JOBSTATUS#<status>`
pub fn job_status_partition(status: JobStatus) -> String {
    format!("{JOB_STATUS_PREFIX}{}", status.as_str())
}

/// GSI1 key for a Job, derived from its current status.
///
/// Pattern: `JOBSTATUS#<status>` / `CREATED#<created_at>`
pub fn job_status_index_key(status: JobStatus, created_at: DateTime<Utc>) -> IndexKey {
    IndexKey {
        index: Index::Gsi1,
        pk: job_status_partition(status),
        sk: format!("{CREATED_PREFIX}{}", sortable_timestamp(created_at)),
    }
}

/// Sort key prefix of the job status index.
pub fn job_status_index_sk_prefix() -> &'static str {
    CREATED_PREFIX
}

// ============================================================================
// Application keys
// ============================================================================

/// Primary key for an Application.
///
/// Pattern: `APPLICATION#<application_id>` / `METADATA`
pub fn application_key(application_id: Uuid) -> PrimaryKey {
    PrimaryKey {
        pk: format!("{APPLICATION_PREFIX}{application_id}"),
        sk: METADATA_SK.to_string(),
    }
}

/// GSI2 partition holding every application for a job.
///
/// Pattern: `JOB#<job_id>`
pub fn applications_by_job_partition(job_id: &str) -> String {
    format!("{JOB_PREFIX}{job_id}")
}

/// GSI2 key for an Application (lookup by job).
///
/// Pattern: `JOB#<job_id>` / `APPLICATION#<created_at>`
pub fn application_by_job_index_key(job_id: &str, created_at: DateTime<Utc>) -> IndexKey {
    IndexKey {
        index: Index::Gsi2,
        pk: applications_by_job_partition(job_id),
        sk: format!("{APPLICATION_PREFIX}{}", sortable_timestamp(created_at)),
    }
}

/// GSI3 partition holding every application submitted with an email.
///
/// Pattern: `APPLICANT#<email>`
pub fn applications_by_applicant_partition(email: &str) -> String {
    format!("{APPLICANT_PREFIX}{email}")
}

/// GSI3 key for an Application (lookup by applicant email).
///
/// Pattern: `APPLICANT#<email>` / `APPLICATION#<created_at>`
pub fn application_by_applicant_index_key(email: &str, created_at: DateTime<Utc>) -> IndexKey {
    IndexKey {
        index: Index::Gsi3,
        pk: applications_by_applicant_partition(email),
        sk: format!("{APPLICATION_PREFIX}{}", sortable_timestamp(created_at)),
    }
}

/// Sort key prefix shared by both application indexes.
pub fn application_index_sk_prefix() -> &'static str {
    APPLICATION_PREFIX
}

// ============================================================================
// User keys
// ============================================================================

/// Primary key for a User.
///
/// Pattern: `USER#<user_id>` / `METADATA`
pub fn user_key(user_id: Uuid) -> PrimaryKey {
    PrimaryKey {
        pk: format!("{USER_PREFIX}{user_id}"),
        sk: METADATA_SK.to_string(),
    }
}

/// GSI2 partition for the user registered with an email.
///
/// Pattern: `EMAIL#<email>`
pub fn user_email_partition(email: &str) -> String {
    format!("{EMAIL_PREFIX}{email}")
}

/// GSI2 key for a User (lookup by email).
///
/// Pattern: `EMAIL#<email>` / `USER#<user_id>`
pub fn user_by_email_index_key(email: &str, user_id: Uuid) -> IndexKey {
    IndexKey {
        index: Index::Gsi2,
        pk: user_email_partition(email),
        sk: format!("{USER_PREFIX}{user_id}"),
    }
}

/// Sort key prefix of user entries in the email index.
pub fn user_index_sk_prefix() -> &'static str {
    USER_PREFIX
}

#[cfg(test)]
mod tests {
    use super::*;

    fn created_at() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-03-01T09:30:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_job_key() {
        let key = job_key("engineering-k3j9x0aa");
        assert_eq!(key.pk, "JOB#engineering-k3j9x0aa");
        assert_eq!(key.sk, "META#engineering-k3j9x0aa");
    }

    #[test]
    fn test_job_key_is_deterministic() {
        assert_eq!(job_key("sales-1"), job_key("sales-1"));
    }

    #[test]
    fn test_job_status_index_key() {
        let key = job_status_index_key(JobStatus::Active, created_at());
        assert_eq!(key.index, Index::Gsi1);
        assert_eq!(key.pk, "JOBSTATUS#active");
        assert_eq!(key.sk, "CREATED#2024-03-01T09:30:00.000Z");
    }

    #[test]
    fn test_application_key() {
        let id = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440003").unwrap();
        let key = application_key(id);
        assert_eq!(key.pk, "APPLICATION#550e8400-e29b-41d4-a716-446655440003");
        assert_eq!(key.sk, "METADATA");
    }

    #[test]
    fn test_application_index_keys() {
        let by_job = application_by_job_index_key("ops-7", created_at());
        assert_eq!(by_job.index, Index::Gsi2);
        assert_eq!(by_job.pk, "JOB#ops-7");
        assert_eq!(by_job.sk, "APPLICATION#2024-03-01T09:30:00.000Z");

        let by_applicant = application_by_applicant_index_key("jane@example.com", created_at());
        assert_eq!(by_applicant.index, Index::Gsi3);
        assert_eq!(by_applicant.pk, "APPLICANT#jane@example.com");
        assert!(by_applicant.sk.starts_with(application_index_sk_prefix()));
    }

    #[test]
    fn test_user_keys() {
        let id = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440001").unwrap();
        assert_eq!(
            user_key(id).pk,
            "USER#550e8400-e29b-41d4-a716-446655440001"
        );
        assert_eq!(user_key(id).sk, "METADATA");

        let by_email = user_by_email_index_key("jane@example.com", id);
        assert_eq!(by_email.pk, "EMAIL#jane@example.com");
        assert_eq!(by_email.sk, "USER#550e8400-e29b-41d4-a716-446655440001");
    }

    #[test]
    fn test_sortable_timestamp_orders_lexicographically() {
        let earlier = created_at();
        let later = earlier + chrono::Duration::milliseconds(5);
        assert!(sortable_timestamp(earlier) < sortable_timestamp(later));
    }
}
