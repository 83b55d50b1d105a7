use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{JobError, JobStatus};

/// Hiring priority shown to consultants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = JobError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(JobError::InvalidPriority(s.to_string())),
        }
    }
}

/// A job posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    /// Immutable once created.
    pub job_id: String,
    /// Always `slugify(title)`.
    pub slug: String,
    pub title: String,
    pub company: String,
    pub category: String,
    pub location: String,
    pub employment_type: String,
    pub description: String,
    pub description_html: Option<String>,
    pub requirements: Vec<String>,
    pub qualifications: Vec<String>,
    pub preferred_skills: Vec<String>,
    pub skills: Vec<String>,
    pub experience_level: Option<String>,
    pub benefits: Vec<String>,
    pub salary: Option<String>,
    pub priority: Priority,
    pub featured: bool,
    pub status: JobStatus,
    /// Applications are taken on this URL instead of the built-in flow.
    pub external_apply_url: Option<String>,
    pub posted_date: NaiveDate,
    pub expiry_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: u64,
}

impl Job {
    /// Returns true if the posting has an expiry date before `today`.
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.expiry_date.is_some_and(|expiry| expiry < today)
    }

    /// Returns true if applicants can currently apply through the site.
    pub fn accepts_applications(&self, today: NaiveDate) -> bool {
        self.status.is_public() && !self.is_expired(today) && self.external_apply_url.is_none()
    }
}
