use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserError;

/// Access role of an account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Applicant,
    #[default]
    Consultant,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Applicant => "applicant",
            Role::Consultant => "consultant",
            Role::Admin => "admin",
        }
    }

    /// Admin back office access.
    pub fn is_admin(self) -> bool {
        matches!(self, Role::Admin)
    }

    /// Consultant dashboard access (admins included).
    pub fn is_consultant(self) -> bool {
        matches!(self, Role::Consultant | Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UserError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "applicant" => Ok(Role::Applicant),
            "consultant" => Ok(Role::Consultant),
            "admin" => Ok(Role::Admin),
            _ => Err(UserError::InvalidRole(s.to_string())),
        }
    }
}

/// Identity verification state of an account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    #[default]
    NotStarted,
    Pending,
    Verified,
    Failed,
}

impl VerificationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            VerificationStatus::NotStarted => "not_started",
            VerificationStatus::Pending => "pending",
            VerificationStatus::Verified => "verified",
            VerificationStatus::Failed => "failed",
        }
    }
}

impl FromStr for VerificationStatus {
    type Err = UserError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "not_started" => Ok(VerificationStatus::NotStarted),
            "pending" => Ok(VerificationStatus::Pending),
            "verified" => Ok(VerificationStatus::Verified),
            "failed" => Ok(VerificationStatus::Failed),
            _ => Err(UserError::InvalidVerificationStatus(s.to_string())),
        }
    }
}

/// Whether an account may sign in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    #[default]
    Active,
    Suspended,
}

impl AccountStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AccountStatus::Active => "active",
            AccountStatus::Suspended => "suspended",
        }
    }
}

impl FromStr for AccountStatus {
    type Err = UserError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(AccountStatus::Active),
            "suspended" => Ok(AccountStatus::Suspended),
            _ => Err(UserError::InvalidAccountStatus(s.to_string())),
        }
    }
}

/// Metadata of an uploaded resume. The file itself lives in object storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resume {
    pub resume_id: Uuid,
    pub file_name: String,
    pub storage_key: String,
    pub uploaded_at: DateTime<Utc>,
    pub is_default: bool,
    pub file_size: Option<u64>,
    pub mime_type: Option<String>,
}

/// A registered account with its profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: Uuid,
    /// Unique across users, always lowercase.
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub bio: Option<String>,
    pub skills: Vec<String>,
    pub experience: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
    pub portfolio_url: Option<String>,
    /// At most one entry has `is_default` set.
    pub resumes: Vec<Resume>,
    pub verification_status: VerificationStatus,
    pub verified_at: Option<DateTime<Utc>>,
    pub account_status: AccountStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: u64,
}

impl User {
    /// Display name.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// The default resume, else the first one.
    pub fn preferred_resume(&self) -> Option<&Resume> {
        self.resumes
            .iter()
            .find(|r| r.is_default)
            .or_else(|| self.resumes.first())
    }
}
