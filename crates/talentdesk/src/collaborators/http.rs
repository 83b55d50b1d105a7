//! Gateway-backed collaborators.
//!
//! Identity, object storage and email are reached through one HTTP gateway
//! that fronts the managed services. Every call is a JSON request with a
//! bearer API key. Non-2xx answers become [`CollaboratorError::Rejected`],
//! transport failures become [`CollaboratorError::Unavailable`].

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;

use talentdesk_core::collaborators::{
    CollaboratorError, EmailMessage, EmailSender, IdentityProvider, IdentityRegistration,
    ObjectStorage, PresignedTarget, RegisteredIdentity, Result, UploadRequest,
};

const IDENTITY: &str = "identity";
const STORAGE: &str = "storage";
const EMAIL: &str = "email";

/// HTTP client for the managed-services gateway.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GatewayClient {
    /// Create a new client for the gateway at `base_url`.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a URL for an endpoint.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn execute(
        &self,
        service: &'static str,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response> {
        let response = request
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| CollaboratorError::Unavailable {
                service,
                message: e.to_string(),
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        tracing::warn!(service, status = status.as_u16(), %message, "gateway rejected request");
        Err(CollaboratorError::Rejected {
            service,
            status: status.as_u16(),
            message,
        })
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        service: &'static str,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self
            .execute(service, self.client.post(self.url(path)).json(body))
            .await?;

        response
            .json()
            .await
            .map_err(|e| CollaboratorError::InvalidResponse {
                service,
                message: e.to_string(),
            })
    }

    async fn post_ignoring_body<B: Serialize + ?Sized>(
        &self,
        service: &'static str,
        path: &str,
        body: &B,
    ) -> Result<()> {
        self.execute(service, self.client.post(self.url(path)).json(body))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl IdentityProvider for GatewayClient {
    async fn register_identity(
        &self,
        registration: &IdentityRegistration,
    ) -> Result<RegisteredIdentity> {
        self.post_json(IDENTITY, "/identity/users", registration)
            .await
    }

    async fn send_sign_in_link(&self, email: &str) -> Result<()> {
        self.post_ignoring_body(IDENTITY, "/identity/sign-in-links", &json!({ "email": email }))
            .await
    }
}

#[async_trait]
impl ObjectStorage for GatewayClient {
    async fn upload_target(&self, request: &UploadRequest) -> Result<PresignedTarget> {
        self.post_json(STORAGE, "/storage/upload-targets", request)
            .await
    }

    async fn download_target(&self, storage_key: &str) -> Result<PresignedTarget> {
        self.post_json(
            STORAGE,
            "/storage/download-targets",
            &json!({ "storageKey": storage_key }),
        )
        .await
    }

    async fn delete_object(&self, storage_key: &str) -> Result<()> {
        self.execute(
            STORAGE,
            self.client
                .delete(self.url("/storage/objects"))
                .json(&json!({ "storageKey": storage_key })),
        )
        .await?;
        Ok(())
    }
}

#[async_trait]
impl EmailSender for GatewayClient {
    async fn send(&self, message: &EmailMessage) -> Result<()> {
        self.post_ignoring_body(EMAIL, "/email/messages", message)
            .await
    }
}
