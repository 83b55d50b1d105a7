//! Request types for application operations.

use serde::{Deserialize, Serialize};

use crate::serde::deserialize_optional_string;

use super::ApplicationStatus;

/// Application form as submitted by an applicant.
///
/// Every field is optional at the type level so that missing fields can be
/// reported together instead of failing on the first one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitApplicationRequest {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub job_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub linkedin_url: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub cover_letter: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub resume_key: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub source: Option<String>,
}

impl SubmitApplicationRequest {
    /// Create a fully populated request (LinkedIn and source left empty).
    pub fn new(
        job_id: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        cover_letter: impl Into<String>,
        resume_key: impl Into<String>,
    ) -> Self {
        Self {
            job_id: Some(job_id.into()),
            first_name: Some(first_name.into()),
            last_name: Some(last_name.into()),
            email: Some(email.into()),
            phone: Some(phone.into()),
            linkedin_url: None,
            cover_letter: Some(cover_letter.into()),
            resume_key: Some(resume_key.into()),
            source: None,
        }
    }

    /// Names of required fields that are absent, in form order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("jobId", &self.job_id),
            ("firstName", &self.first_name),
            ("lastName", &self.last_name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("coverLetter", &self.cover_letter),
            ("resumeKey", &self.resume_key),
        ]
        .into_iter()
        .filter(|(_, value)| value.as_deref().is_none_or(|v| v.trim().is_empty()))
        .map(|(name, _)| name)
        .collect()
    }
}

/// Admin request to move an application to another status.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeApplicationStatusRequest {
    pub status: ApplicationStatus,
    pub expected_version: u64,
}
