//! Request types for account operations.

use serde::{Deserialize, Serialize};

use crate::serde::{deserialize_optional_list, deserialize_optional_string};

use super::{AccountStatus, Role, VerificationStatus};

/// Sign-up form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub last_name: Option<String>,
    /// Defaults to `consultant`.
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub location: Option<String>,
}

impl CreateUserRequest {
    pub fn new(
        email: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            email: Some(email.into()),
            first_name: Some(first_name.into()),
            last_name: Some(last_name.into()),
            ..Self::default()
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    /// Names of required fields that are absent.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("email", &self.email),
            ("firstName", &self.first_name),
            ("lastName", &self.last_name),
        ]
        .into_iter()
        .filter(|(_, value)| value.as_deref().is_none_or(|v| v.trim().is_empty()))
        .map(|(name, _)| name)
        .collect()
    }
}

/// Partial profile edit. Omitted fields are left untouched.
///
/// Email and resumes are not editable here: email is the account's lookup key
/// and resumes have their own operations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub last_name: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub bio: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_list")]
    pub skills: Option<Vec<String>>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub experience: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub linkedin_url: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub github_url: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub portfolio_url: Option<String>,
    #[serde(default)]
    pub verification_status: Option<VerificationStatus>,
    #[serde(default)]
    pub account_status: Option<AccountStatus>,
}

impl UpdateUserRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_first_name(mut self, first_name: impl Into<String>) -> Self {
        self.first_name = Some(first_name.into());
        self
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    pub fn with_skills(mut self, skills: Vec<String>) -> Self {
        self.skills = Some(skills);
        self
    }

    pub fn with_verification_status(mut self, status: VerificationStatus) -> Self {
        self.verification_status = Some(status);
        self
    }

    /// Fields only an admin may change.
    pub fn touches_privileged_fields(&self) -> bool {
        self.role.is_some() || self.verification_status.is_some() || self.account_status.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.role.is_none()
            && self.bio.is_none()
            && self.skills.is_none()
            && self.experience.is_none()
            && self.phone.is_none()
            && self.location.is_none()
            && self.linkedin_url.is_none()
            && self.github_url.is_none()
            && self.portfolio_url.is_none()
            && self.verification_status.is_none()
            && self.account_status.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_missing_fields() {
        let request = CreateUserRequest {
            email: Some("jane@example.com".to_string()),
            ..Default::default()
        };
        assert_eq!(request.missing_fields(), vec!["firstName", "lastName"]);
    }

    #[test]
    fn test_update_request_parses_skill_text() {
        let json = r#"{"skills": "Rust\nAWS\n\n", "bio": "  "}"#;
        let request: UpdateUserRequest = serde_json::from_str(json).unwrap();
        assert_eq!(
            request.skills,
            Some(vec!["Rust".to_string(), "AWS".to_string()])
        );
        assert_eq!(request.bio, None);
        assert!(!request.is_empty());
        assert!(!request.touches_privileged_fields());
    }

    #[test]
    fn test_privileged_fields() {
        assert!(UpdateUserRequest::new()
            .with_role(Role::Admin)
            .touches_privileged_fields());
        assert!(UpdateUserRequest::new().is_empty());
    }
}
