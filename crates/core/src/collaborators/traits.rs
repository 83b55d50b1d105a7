use async_trait::async_trait;

use super::{
    EmailMessage, IdentityRegistration, PresignedTarget, RegisteredIdentity, Result,
    UploadRequest,
};

/// Passwordless identity provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Registers a new identity.
    async fn register_identity(
        &self,
        registration: &IdentityRegistration,
    ) -> Result<RegisteredIdentity>;

    /// Sends a sign-in link to `email`.
    async fn send_sign_in_link(&self, email: &str) -> Result<()>;
}

/// Object storage issuing presigned targets.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Issues a target the client uploads to directly.
    async fn upload_target(&self, request: &UploadRequest) -> Result<PresignedTarget>;

    /// Issues a time-limited download target for an existing object.
    async fn download_target(&self, storage_key: &str) -> Result<PresignedTarget>;

    /// Deletes an object. Deleting a missing object succeeds.
    async fn delete_object(&self, storage_key: &str) -> Result<()>;
}

/// Transactional email delivery. Sends are not retried.
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<()>;
}
