//! Recording collaborators for tests and local development.
//!
//! Each mock keeps what it was asked to do so tests can assert on it, and can
//! be switched into a failing mode to exercise error paths.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::Mutex;

use talentdesk_core::collaborators::{
    CollaboratorError, EmailMessage, EmailSender, IdentityProvider, IdentityRegistration,
    ObjectStorage, PresignedTarget, RegisteredIdentity, Result, UploadRequest,
};

/// Lifetime of presigned targets handed out by [`MockObjectStorage`].
const TARGET_TTL_MINUTES: i64 = 15;

fn injected(service: &'static str) -> CollaboratorError {
    CollaboratorError::Unavailable {
        service,
        message: "injected failure".to_string(),
    }
}

// ==================== Identity ====================

#[derive(Debug, Default)]
struct IdentityState {
    registrations: Vec<IdentityRegistration>,
    sign_in_links: Vec<String>,
    fail_registration: bool,
    fail_sign_in: bool,
}

/// Identity provider that records registrations and sign-in links.
#[derive(Debug, Clone, Default)]
pub struct MockIdentityProvider {
    state: Arc<Mutex<IdentityState>>,
}

impl MockIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent registration fail.
    pub async fn fail_registration(&self, fail: bool) {
        self.state.lock().await.fail_registration = fail;
    }

    /// Makes every subsequent sign-in link send fail.
    pub async fn fail_sign_in(&self, fail: bool) {
        self.state.lock().await.fail_sign_in = fail;
    }

    pub async fn registrations(&self) -> Vec<IdentityRegistration> {
        self.state.lock().await.registrations.clone()
    }

    pub async fn sign_in_links(&self) -> Vec<String> {
        self.state.lock().await.sign_in_links.clone()
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn register_identity(
        &self,
        registration: &IdentityRegistration,
    ) -> Result<RegisteredIdentity> {
        let mut state = self.state.lock().await;
        if state.fail_registration {
            return Err(injected("identity"));
        }

        state.registrations.push(registration.clone());
        Ok(RegisteredIdentity {
            subject: format!("mock-{}", state.registrations.len()),
        })
    }

    async fn send_sign_in_link(&self, email: &str) -> Result<()> {
        let mut state = self.state.lock().await;
        if state.fail_sign_in {
            return Err(injected("identity"));
        }

        tracing::debug!(%email, "mock sign-in link sent");
        state.sign_in_links.push(email.to_string());
        Ok(())
    }
}

// ==================== Object Storage ====================

#[derive(Debug, Default)]
struct StorageState {
    uploads: Vec<UploadRequest>,
    downloads: Vec<String>,
    deleted: Vec<String>,
    fail_download: bool,
    fail_delete: bool,
}

/// Object storage that issues fake presigned URLs.
#[derive(Debug, Clone)]
pub struct MockObjectStorage {
    base_url: String,
    state: Arc<Mutex<StorageState>>,
}

impl Default for MockObjectStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl MockObjectStorage {
    pub fn new() -> Self {
        Self {
            base_url: "https://storage.local".to_string(),
            state: Arc::new(Mutex::new(StorageState::default())),
        }
    }

    fn target(&self, storage_key: &str, action: &str) -> PresignedTarget {
        let expires_at = Utc::now() + Duration::minutes(TARGET_TTL_MINUTES);
        PresignedTarget {
            url: format!(
                "{}/{}?action={}&expires={}",
                self.base_url,
                storage_key,
                action,
                expires_at.timestamp()
            ),
            storage_key: storage_key.to_string(),
            expires_at,
        }
    }

    pub async fn fail_download(&self, fail: bool) {
        self.state.lock().await.fail_download = fail;
    }

    pub async fn fail_delete(&self, fail: bool) {
        self.state.lock().await.fail_delete = fail;
    }

    pub async fn uploads(&self) -> Vec<UploadRequest> {
        self.state.lock().await.uploads.clone()
    }

    /// Keys for which a download target was issued.
    pub async fn downloads(&self) -> Vec<String> {
        self.state.lock().await.downloads.clone()
    }

    pub async fn deleted(&self) -> Vec<String> {
        self.state.lock().await.deleted.clone()
    }
}

#[async_trait]
impl ObjectStorage for MockObjectStorage {
    async fn upload_target(&self, request: &UploadRequest) -> Result<PresignedTarget> {
        self.state.lock().await.uploads.push(request.clone());
        Ok(self.target(&request.storage_key, "put"))
    }

    async fn download_target(&self, storage_key: &str) -> Result<PresignedTarget> {
        let mut state = self.state.lock().await;
        if state.fail_download {
            return Err(injected("storage"));
        }

        state.downloads.push(storage_key.to_string());
        Ok(self.target(storage_key, "get"))
    }

    async fn delete_object(&self, storage_key: &str) -> Result<()> {
        let mut state = self.state.lock().await;
        if state.fail_delete {
            return Err(injected("storage"));
        }

        state.deleted.push(storage_key.to_string());
        Ok(())
    }
}

// ==================== Email ====================

#[derive(Debug, Default)]
struct EmailState {
    sent: Vec<EmailMessage>,
    fail: bool,
}

/// Email sender that keeps every message instead of delivering it.
#[derive(Debug, Clone, Default)]
pub struct MockEmailSender {
    state: Arc<Mutex<EmailState>>,
}

impl MockEmailSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn fail(&self, fail: bool) {
        self.state.lock().await.fail = fail;
    }

    pub async fn sent(&self) -> Vec<EmailMessage> {
        self.state.lock().await.sent.clone()
    }
}

#[async_trait]
impl EmailSender for MockEmailSender {
    async fn send(&self, message: &EmailMessage) -> Result<()> {
        let mut state = self.state.lock().await;
        if state.fail {
            return Err(injected("email"));
        }

        tracing::debug!(to = %message.to, subject = %message.subject, "mock email captured");
        state.sent.push(message.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_identity_records_and_fails_on_demand() {
        let identity = MockIdentityProvider::new();
        let registration = IdentityRegistration {
            email: "jane@example.com".to_string(),
            given_name: "Jane".to_string(),
            family_name: "Doe".to_string(),
        };

        let registered = identity.register_identity(&registration).await.unwrap();
        assert_eq!(registered.subject, "mock-1");
        assert_eq!(identity.registrations().await, vec![registration.clone()]);

        identity.fail_registration(true).await;
        assert!(identity.register_identity(&registration).await.is_err());
        assert_eq!(identity.registrations().await.len(), 1);
    }

    #[tokio::test]
    async fn test_storage_targets() {
        let storage = MockObjectStorage::new();

        let target = storage.download_target("resumes/a.pdf").await.unwrap();
        assert!(target.url.starts_with("https://storage.local/resumes/a.pdf?action=get"));
        assert!(target.expires_at > Utc::now());
        assert_eq!(storage.downloads().await, vec!["resumes/a.pdf".to_string()]);

        storage.fail_delete(true).await;
        assert!(storage.delete_object("resumes/a.pdf").await.is_err());
        assert!(storage.deleted().await.is_empty());
    }

    #[tokio::test]
    async fn test_email_capture() {
        let email = MockEmailSender::new();
        let message = EmailMessage {
            from: "jobs@example.com".to_string(),
            to: "jane@example.com".to_string(),
            subject: "Thanks".to_string(),
            text_body: "We got it".to_string(),
            html_body: None,
        };

        email.send(&message).await.unwrap();
        email.fail(true).await;
        assert!(email.send(&message).await.is_err());
        assert_eq!(email.sent().await, vec![message]);
    }
}
