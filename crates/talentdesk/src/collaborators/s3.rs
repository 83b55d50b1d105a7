//! S3-backed resume storage.
//!
//! Upload and download targets are presigned URLs; the file bytes never pass
//! through the service. Presigning is local (no request is sent), so only
//! `delete_object` talks to S3.

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::error::SdkError;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::Client;
use chrono::{DateTime, TimeDelta, Utc};

use talentdesk_core::collaborators::{
    CollaboratorError, ObjectStorage, PresignedTarget, Result, UploadRequest,
};

use crate::config::Config;

const SERVICE: &str = "storage";

/// Presigns resume URLs against one bucket.
#[derive(Clone)]
pub struct S3ObjectStorage {
    client: Client,
    bucket: String,
    expires_in_secs: u64,
}

impl Debug for S3ObjectStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3ObjectStorage")
            .field("bucket", &self.bucket)
            .field("expires_in_secs", &self.expires_in_secs)
            .finish()
    }
}

impl S3ObjectStorage {
    pub fn new(client: Client, bucket: impl Into<String>, expires_in_secs: u64) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            expires_in_secs,
        }
    }

    /// Builds the client from the ambient AWS configuration.
    ///
    /// With `AWS_ENDPOINT_URL` set (LocalStack, MinIO) path-style addressing
    /// is forced.
    pub async fn from_config(config: &Config, bucket: &str) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(endpoint) = &config.aws_endpoint_url {
            loader = loader.endpoint_url(endpoint.clone());
        }
        let sdk_config = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config);
        if config.aws_endpoint_url.is_some() {
            builder = builder.force_path_style(true);
        }

        Self::new(
            Client::from_conf(builder.build()),
            bucket,
            config.presign_ttl_secs,
        )
    }

    fn presigning(&self) -> Result<(PresigningConfig, DateTime<Utc>)> {
        let presigning = PresigningConfig::expires_in(Duration::from_secs(self.expires_in_secs))
            .map_err(|e| CollaboratorError::Unavailable {
                service: SERVICE,
                message: format!("invalid presigning window: {}", e),
            })?;
        let window =
            TimeDelta::try_seconds(self.expires_in_secs as i64).unwrap_or(TimeDelta::zero());
        Ok((presigning, Utc::now() + window))
    }
}

/// Map an SDK error to a collaborator failure, keeping the HTTP status of
/// service errors.
fn map_s3_error<E: Debug>(err: SdkError<E>, key: &str) -> CollaboratorError {
    match &err {
        SdkError::ServiceError(service_err) => CollaboratorError::Rejected {
            service: SERVICE,
            status: service_err.raw().status().as_u16(),
            message: format!("key '{}': {:?}", key, err),
        },
        SdkError::TimeoutError(_) | SdkError::DispatchFailure(_) => {
            CollaboratorError::Unavailable {
                service: SERVICE,
                message: format!("key '{}': {:?}", key, err),
            }
        }
        _ => CollaboratorError::InvalidResponse {
            service: SERVICE,
            message: format!("key '{}': {:?}", key, err),
        },
    }
}

#[async_trait]
impl ObjectStorage for S3ObjectStorage {
    async fn upload_target(&self, request: &UploadRequest) -> Result<PresignedTarget> {
        let (presigning, expires_at) = self.presigning()?;
        let presigned = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(&request.storage_key)
            .set_content_type(request.content_type.clone())
            .presigned(presigning)
            .await
            .map_err(|e| map_s3_error(e, &request.storage_key))?;

        Ok(PresignedTarget {
            url: presigned.uri().to_string(),
            storage_key: request.storage_key.clone(),
            expires_at,
        })
    }

    async fn download_target(&self, storage_key: &str) -> Result<PresignedTarget> {
        let (presigning, expires_at) = self.presigning()?;
        let presigned = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(storage_key)
            .presigned(presigning)
            .await
            .map_err(|e| map_s3_error(e, storage_key))?;

        Ok(PresignedTarget {
            url: presigned.uri().to_string(),
            storage_key: storage_key.to_string(),
            expires_at,
        })
    }

    async fn delete_object(&self, storage_key: &str) -> Result<()> {
        match self
            .client
            .delete_object()
            .bucket(&self.bucket)
            .key(storage_key)
            .send()
            .await
        {
            Ok(_) => Ok(()),
            Err(SdkError::ServiceError(e)) if e.raw().status().as_u16() == 404 => Ok(()),
            Err(e) => Err(map_s3_error(e, storage_key)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};

    fn storage(expires_in_secs: u64) -> S3ObjectStorage {
        let config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .credentials_provider(Credentials::new("AKIDTEST", "secret", None, None, "test"))
            .endpoint_url("http://localhost:4566")
            .force_path_style(true)
            .build();
        S3ObjectStorage::new(Client::from_conf(config), "resumes-test", expires_in_secs)
    }

    #[tokio::test]
    async fn test_upload_target_is_presigned_put() {
        let before = Utc::now();

        let target = storage(600)
            .upload_target(&UploadRequest {
                storage_key: "resumes/u1/r1/cv.pdf".to_string(),
                content_type: Some("application/pdf".to_string()),
            })
            .await
            .unwrap();

        assert!(target.url.contains("/resumes-test/resumes/u1/r1/cv.pdf?"));
        assert!(target.url.contains("X-Amz-Expires=600"));
        assert!(target.url.contains("X-Amz-Signature="));
        assert_eq!(target.storage_key, "resumes/u1/r1/cv.pdf");
        assert!(target.expires_at >= before + TimeDelta::seconds(600));
    }

    #[tokio::test]
    async fn test_download_target_is_presigned_get() {
        let target = storage(300)
            .download_target("applications/jane/cv.pdf")
            .await
            .unwrap();

        assert!(target.url.contains("/resumes-test/applications/jane/cv.pdf?"));
        assert!(target.url.contains("X-Amz-Expires=300"));
    }

    #[tokio::test]
    async fn test_window_longer_than_a_week_is_rejected() {
        let err = storage(8 * 24 * 60 * 60)
            .download_target("applications/jane/cv.pdf")
            .await
            .unwrap_err();

        assert_eq!(err.service(), "storage");
    }
}
