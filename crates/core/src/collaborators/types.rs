use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Data handed to the passwordless identity provider at sign-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityRegistration {
    pub email: String,
    pub given_name: String,
    pub family_name: String,
}

/// Identity created by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredIdentity {
    /// Provider-side subject identifier.
    pub subject: String,
}

/// Time-limited pointer to an object in storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresignedTarget {
    pub url: String,
    pub storage_key: String,
    pub expires_at: DateTime<Utc>,
}

/// Upload parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    pub storage_key: String,
    pub content_type: Option<String>,
}

/// An outbound transactional email. Bodies are pre-rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub text_body: String,
    pub html_body: Option<String>,
}
