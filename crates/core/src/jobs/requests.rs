//! Request types for job operations.
//!
//! Pure data types with no I/O, shared between the API layer and the
//! repositories. Conversions to and from `Job` live in `operations`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::serde::{
    deserialize_clearable_date, deserialize_clearable_string, deserialize_optional_date,
    deserialize_optional_list, deserialize_optional_string,
};

use super::{JobStatus, Priority};

/// Request payload for creating a job posting.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobRequest {
    /// Caller-supplied ID; generated from the category when absent.
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub job_id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub employment_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub description_html: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_list")]
    pub requirements: Option<Vec<String>>,
    #[serde(default, deserialize_with = "deserialize_optional_list")]
    pub qualifications: Option<Vec<String>>,
    #[serde(default, deserialize_with = "deserialize_optional_list")]
    pub preferred_skills: Option<Vec<String>>,
    #[serde(default, deserialize_with = "deserialize_optional_list")]
    pub skills: Option<Vec<String>>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub experience_level: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_list")]
    pub benefits: Option<Vec<String>>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub salary: Option<String>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub featured: bool,
    /// Only `draft` and `active` are accepted at creation. Defaults to `draft`.
    #[serde(default)]
    pub status: Option<JobStatus>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub external_apply_url: Option<String>,
    /// Defaults to the creation date.
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub posted_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub expiry_date: Option<NaiveDate>,
}

impl CreateJobRequest {
    /// Create a request with the required fields set.
    pub fn new(
        title: impl Into<String>,
        company: impl Into<String>,
        category: impl Into<String>,
        location: impl Into<String>,
        employment_type: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            company: company.into(),
            category: category.into(),
            location: location.into(),
            employment_type: employment_type.into(),
            ..Self::default()
        }
    }

    /// Use a specific job ID instead of a generated one.
    pub fn with_job_id(mut self, job_id: impl Into<String>) -> Self {
        self.job_id = Some(job_id.into());
        self
    }

    /// Set the initial status.
    pub fn with_status(mut self, status: JobStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Partial update of a job posting. Omitted fields are left untouched.
///
/// `descriptionHtml`, `salary`, `externalApplyUrl` and `expiryDate` can be
/// cleared with `null` (or an empty string); they are `Some(None)` then.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateJobRequest {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub company: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub employment_type: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub description: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_clearable_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub description_html: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_optional_list")]
    pub requirements: Option<Vec<String>>,
    #[serde(default, deserialize_with = "deserialize_optional_list")]
    pub qualifications: Option<Vec<String>>,
    #[serde(default, deserialize_with = "deserialize_optional_list")]
    pub preferred_skills: Option<Vec<String>>,
    #[serde(default, deserialize_with = "deserialize_optional_list")]
    pub skills: Option<Vec<String>>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub experience_level: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_list")]
    pub benefits: Option<Vec<String>>,
    #[serde(
        default,
        deserialize_with = "deserialize_clearable_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub salary: Option<Option<String>>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub featured: Option<bool>,
    #[serde(default)]
    pub status: Option<JobStatus>,
    #[serde(
        default,
        deserialize_with = "deserialize_clearable_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub external_apply_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub posted_date: Option<NaiveDate>,
    #[serde(
        default,
        deserialize_with = "deserialize_clearable_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub expiry_date: Option<Option<NaiveDate>>,
}

impl UpdateJobRequest {
    /// Create an empty update request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title (the slug follows).
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the status.
    pub fn with_status(mut self, status: JobStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Set the salary text.
    pub fn with_salary(mut self, salary: impl Into<String>) -> Self {
        self.salary = Some(Some(salary.into()));
        self
    }

    /// Remove the salary text.
    pub fn clear_salary(mut self) -> Self {
        self.salary = Some(None);
        self
    }

    /// Remove the expiry date.
    pub fn clear_expiry_date(mut self) -> Self {
        self.expiry_date = Some(None);
        self
    }

    /// Returns true if the request changes nothing.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.company.is_none()
            && self.category.is_none()
            && self.location.is_none()
            && self.employment_type.is_none()
            && self.description.is_none()
            && self.description_html.is_none()
            && self.requirements.is_none()
            && self.qualifications.is_none()
            && self.preferred_skills.is_none()
            && self.skills.is_none()
            && self.experience_level.is_none()
            && self.benefits.is_none()
            && self.salary.is_none()
            && self.priority.is_none()
            && self.featured.is_none()
            && self.status.is_none()
            && self.external_apply_url.is_none()
            && self.posted_date.is_none()
            && self.expiry_date.is_none()
    }
}
