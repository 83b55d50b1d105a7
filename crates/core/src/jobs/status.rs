use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::lifecycle::Lifecycle;

use super::JobError;

/// Publication status of a job posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Draft,
    #[serde(alias = "open")]
    Active,
    Paused,
    #[serde(alias = "inactive")]
    Closed,
}

impl JobStatus {
    pub const ALL: [JobStatus; 4] = [
        JobStatus::Draft,
        JobStatus::Active,
        JobStatus::Paused,
        JobStatus::Closed,
    ];

    /// Canonical name, as stored and as used in index keys.
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Draft => "draft",
            JobStatus::Active => "active",
            JobStatus::Paused => "paused",
            JobStatus::Closed => "closed",
        }
    }

    /// Whether the job is visible on the public job board.
    pub fn is_public(self) -> bool {
        matches!(self, JobStatus::Active)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = JobError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "draft" => Ok(JobStatus::Draft),
            "active" | "open" => Ok(JobStatus::Active),
            "paused" => Ok(JobStatus::Paused),
            "closed" | "inactive" => Ok(JobStatus::Closed),
            _ => Err(JobError::InvalidStatus(s.to_string())),
        }
    }
}

impl Lifecycle for JobStatus {
    const ENTITY: &'static str = "Job";

    fn successors(self) -> &'static [Self] {
        match self {
            JobStatus::Draft => &[JobStatus::Active, JobStatus::Closed],
            JobStatus::Active => &[JobStatus::Paused, JobStatus::Closed],
            JobStatus::Paused => &[JobStatus::Active, JobStatus::Closed],
            JobStatus::Closed => &[JobStatus::Draft, JobStatus::Active],
        }
    }
}
