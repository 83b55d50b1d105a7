use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ApplicationStatus;

/// Where an application's resume lives when no registered profile supplies one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ResumeReference {
    /// Key of an object in the resume bucket.
    StorageKey(String),
    /// Link hosted elsewhere, handed out as-is.
    ExternalUrl(String),
}

impl ResumeReference {
    /// Classifies a raw `resumeKey` value. Blank values yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            None
        } else if raw.starts_with("http://") || raw.starts_with("https://") {
            Some(ResumeReference::ExternalUrl(raw.to_string()))
        } else {
            Some(ResumeReference::StorageKey(raw.to_string()))
        }
    }
}

/// A job application submitted by a (possibly unregistered) applicant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub application_id: Uuid,
    /// Reference to the job; the job may since have been deleted.
    pub job_id: String,
    pub first_name: String,
    pub last_name: String,
    /// Always lowercase.
    pub email: String,
    pub phone: String,
    pub linkedin_url: Option<String>,
    pub cover_letter: String,
    /// Storage key or external URL of the resume submitted with the form.
    pub resume_key: String,
    pub status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Channel the application came through (e.g. "website").
    pub source: String,
    pub version: u64,
}

impl Application {
    /// Applicant display name.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Resume reference carried by the application itself.
    pub fn resume_reference(&self) -> Option<ResumeReference> {
        ResumeReference::parse(&self.resume_key)
    }
}
