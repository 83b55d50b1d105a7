//! Resume uploads and resume resolution for applications.
//!
//! An application's applicant may or may not have an account. When the
//! applicant's email matches a user, that user's own resumes win over the
//! `resumeKey` submitted with the form; otherwise the form's reference is used
//! as-is. When neither yields anything the result is an explicit
//! [`ResolvedResume::Unavailable`], not an error.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use talentdesk_core::applications::{Application, ResumeReference};
use talentdesk_core::collaborators::{ObjectStorage, PresignedTarget, UploadRequest};
use talentdesk_core::storage::{ApplicationRepository, ResumeRepository, UserRepository};
use talentdesk_core::users::{resume_storage_key, NewResume, Resume, User};

use super::authz::{require_consultant, require_self_or_admin};
use super::{Result, ServiceError};

/// Metadata for a resume the client is about to upload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeUploadRequest {
    pub file_name: String,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub file_size: Option<u64>,
    #[serde(default)]
    pub make_default: bool,
}

/// The stored record plus where to PUT the file.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeUpload {
    pub resume: Resume,
    pub upload: PresignedTarget,
}

/// Outcome of resolving the resume behind an application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedResume {
    /// A resume owned by the applicant's account.
    Profile { user_id: Uuid, resume: Resume },
    /// The reference submitted with the application form.
    Application(ResumeReference),
    Unavailable { reason: String },
}

/// Which record a download link was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResumeSource {
    Profile,
    Application,
}

/// A link to a resume file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeLink {
    pub url: String,
    /// Absent for external URLs, which do not expire.
    pub expires_at: Option<DateTime<Utc>>,
    pub file_name: Option<String>,
    pub source: ResumeSource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ResumeDownload {
    Available(ResumeLink),
    Unavailable { reason: String },
}

#[derive(Clone)]
pub struct ResumeService {
    users: Arc<dyn UserRepository>,
    resumes: Arc<dyn ResumeRepository>,
    applications: Arc<dyn ApplicationRepository>,
    storage: Arc<dyn ObjectStorage>,
}

impl ResumeService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        resumes: Arc<dyn ResumeRepository>,
        applications: Arc<dyn ApplicationRepository>,
        storage: Arc<dyn ObjectStorage>,
    ) -> Self {
        Self {
            users,
            resumes,
            applications,
            storage,
        }
    }

    // ==================== Profile resumes ====================

    pub async fn list(&self, actor: &User, user_id: Uuid) -> Result<Vec<Resume>> {
        if actor.user_id != user_id {
            require_consultant(actor)?;
        }
        Ok(self.resumes.list_resumes(user_id).await?)
    }

    /// Issues an upload target and records the resume.
    ///
    /// The record is only written once the target was issued. If the client
    /// never uploads, the record points at a missing object.
    pub async fn issue_upload(
        &self,
        actor: &User,
        user_id: Uuid,
        request: ResumeUploadRequest,
    ) -> Result<ResumeUpload> {
        require_self_or_admin(actor, user_id)?;
        if request.file_name.trim().is_empty() {
            return Err(ServiceError::validation("Missing required fields: fileName"));
        }
        if self.users.get_user(user_id).await?.is_none() {
            return Err(ServiceError::not_found("User", user_id));
        }

        let resume_id = Uuid::new_v4();
        let storage_key = resume_storage_key(user_id, resume_id, &request.file_name);
        let upload = self
            .storage
            .upload_target(&UploadRequest {
                storage_key: storage_key.clone(),
                content_type: request.content_type.clone(),
            })
            .await?;

        let mut new_resume = NewResume::new(request.file_name.trim(), storage_key);
        new_resume.file_size = request.file_size;
        new_resume.mime_type = request.content_type;
        new_resume.make_default = request.make_default;

        let resumes = self
            .resumes
            .add_resume(user_id, new_resume.into_resume(resume_id, Utc::now()))
            .await?;
        let resume = resumes
            .into_iter()
            .find(|r| r.resume_id == resume_id)
            .ok_or_else(|| ServiceError::Store(format!("Resume {} missing after write", resume_id)))?;

        tracing::info!(user_id = %user_id, resume_id = %resume_id, is_default = resume.is_default, "resume recorded");
        Ok(ResumeUpload { resume, upload })
    }

    pub async fn set_default(&self, actor: &User, user_id: Uuid, resume_id: Uuid) -> Result<Vec<Resume>> {
        require_self_or_admin(actor, user_id)?;
        Ok(self.resumes.set_default_resume(user_id, resume_id).await?)
    }

    /// Removes the record, then the stored file.
    ///
    /// A failed object delete leaves the file orphaned and is only logged.
    pub async fn delete(&self, actor: &User, user_id: Uuid, resume_id: Uuid) -> Result<Resume> {
        require_self_or_admin(actor, user_id)?;

        let removed = self.resumes.remove_resume(user_id, resume_id).await?;
        if let Err(e) = self.storage.delete_object(&removed.storage_key).await {
            tracing::warn!(
                user_id = %user_id,
                resume_id = %resume_id,
                storage_key = %removed.storage_key,
                error = %e,
                "resume object orphaned"
            );
        }
        Ok(removed)
    }

    // ==================== Application resumes ====================

    /// Picks the resume for an application.
    ///
    /// A failing account lookup fails the resolution; the form's reference is
    /// only used when the applicant has no account or no resumes.
    pub async fn resolve_for_application(&self, application: &Application) -> Result<ResolvedResume> {
        if let Some(user) = self.users.get_user_by_email(&application.email).await? {
            if let Some(resume) = user.preferred_resume() {
                return Ok(ResolvedResume::Profile {
                    user_id: user.user_id,
                    resume: resume.clone(),
                });
            }
        }

        Ok(match application.resume_reference() {
            Some(reference) => ResolvedResume::Application(reference),
            None => ResolvedResume::Unavailable {
                reason: format!(
                    "No resume on file for application {}",
                    application.application_id
                ),
            },
        })
    }

    /// Resolves and issues a download link for an application's resume.
    pub async fn download_for_application(
        &self,
        actor: &User,
        application_id: Uuid,
    ) -> Result<ResumeDownload> {
        require_consultant(actor)?;
        let application = self
            .applications
            .get_application(application_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Application", application_id))?;

        let link = match self.resolve_for_application(&application).await? {
            ResolvedResume::Profile { resume, .. } => {
                let target = self.storage.download_target(&resume.storage_key).await?;
                ResumeLink {
                    url: target.url,
                    expires_at: Some(target.expires_at),
                    file_name: Some(resume.file_name),
                    source: ResumeSource::Profile,
                }
            }
            ResolvedResume::Application(ResumeReference::StorageKey(key)) => {
                let target = self.storage.download_target(&key).await?;
                ResumeLink {
                    url: target.url,
                    expires_at: Some(target.expires_at),
                    file_name: None,
                    source: ResumeSource::Application,
                }
            }
            ResolvedResume::Application(ResumeReference::ExternalUrl(url)) => ResumeLink {
                url,
                expires_at: None,
                file_name: None,
                source: ResumeSource::Application,
            },
            ResolvedResume::Unavailable { reason } => {
                tracing::info!(application_id = %application_id, %reason, "resume not available");
                return Ok(ResumeDownload::Unavailable { reason });
            }
        };

        tracing::debug!(application_id = %application_id, source = ?link.source, actor = %actor.user_id, "resume link issued");
        Ok(ResumeDownload::Available(link))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fixtures::{Fixture, UnreachableUsers};
    use talentdesk_core::applications::{new_application, SubmitApplicationRequest};
    use talentdesk_core::http_mapping::ErrorKind;
    use talentdesk_core::users::Role;

    fn service(fixture: &Fixture) -> ResumeService {
        ResumeService::new(
            fixture.repo.clone(),
            fixture.repo.clone(),
            fixture.repo.clone(),
            Arc::new(fixture.storage.clone()),
        )
    }

    fn upload(file_name: &str, make_default: bool) -> ResumeUploadRequest {
        ResumeUploadRequest {
            file_name: file_name.to_string(),
            content_type: Some("application/pdf".to_string()),
            file_size: Some(1024),
            make_default,
        }
    }

    async fn application(fixture: &Fixture, email: &str, resume_key: &str) -> Application {
        let mut application = new_application(
            Uuid::new_v4(),
            SubmitApplicationRequest::new(
                "J1",
                "Alex",
                "Smith",
                email,
                "555-0100",
                "Hello",
                "placeholder",
            ),
            Utc::now(),
        )
        .unwrap();
        application.resume_key = resume_key.to_string();
        fixture.repo.create_application(&application).await.unwrap();
        application
    }

    fn link(download: ResumeDownload) -> ResumeLink {
        match download {
            ResumeDownload::Available(link) => link,
            other => panic!("expected a link, got {:?}", other),
        }
    }

    // ==================== Upload Tests ====================

    #[tokio::test]
    async fn test_first_upload_becomes_default() {
        let fixture = Fixture::new();
        let jane = fixture.user("jane@example.com", Role::Applicant).await;

        let first = service(&fixture)
            .issue_upload(&jane, jane.user_id, upload("My CV.pdf", false))
            .await
            .unwrap();

        assert!(first.resume.is_default);
        assert_eq!(
            first.resume.storage_key,
            format!("resumes/{}/{}/My_CV.pdf", jane.user_id, first.resume.resume_id)
        );
        assert_eq!(first.upload.storage_key, first.resume.storage_key);
        assert!(first.upload.url.contains("action=put"));

        let uploads = fixture.storage.uploads().await;
        assert_eq!(uploads[0].content_type.as_deref(), Some("application/pdf"));
    }

    #[tokio::test]
    async fn test_upload_checks_owner_and_name() {
        let fixture = Fixture::new();
        let service = service(&fixture);
        let jane = fixture.user("jane@example.com", Role::Applicant).await;
        let john = fixture.user("john@example.com", Role::Applicant).await;

        let err = service
            .issue_upload(&john, jane.user_id, upload("cv.pdf", false))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);

        let err = service
            .issue_upload(&jane, jane.user_id, upload("  ", false))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(fixture.storage.uploads().await.is_empty());
    }

    #[tokio::test]
    async fn test_set_default_keeps_single_default() {
        let fixture = Fixture::new();
        let service = service(&fixture);
        let jane = fixture.user("jane@example.com", Role::Applicant).await;

        let a = service.issue_upload(&jane, jane.user_id, upload("a.pdf", false)).await.unwrap();
        let b = service.issue_upload(&jane, jane.user_id, upload("b.pdf", false)).await.unwrap();
        let c = service.issue_upload(&jane, jane.user_id, upload("c.pdf", true)).await.unwrap();
        assert!(c.resume.is_default);

        let resumes = service
            .set_default(&jane, jane.user_id, b.resume.resume_id)
            .await
            .unwrap();

        let defaults: Vec<_> = resumes.iter().filter(|r| r.is_default).collect();
        assert_eq!(defaults.len(), 1);
        assert_eq!(defaults[0].resume_id, b.resume.resume_id);
        assert!(!resumes
            .iter()
            .any(|r| r.resume_id == a.resume.resume_id && r.is_default));
    }

    #[tokio::test]
    async fn test_delete_removes_record_and_object() {
        let fixture = Fixture::new();
        let service = service(&fixture);
        let jane = fixture.user("jane@example.com", Role::Applicant).await;
        let a = service.issue_upload(&jane, jane.user_id, upload("a.pdf", false)).await.unwrap();
        let b = service.issue_upload(&jane, jane.user_id, upload("b.pdf", false)).await.unwrap();

        let removed = service
            .delete(&jane, jane.user_id, a.resume.resume_id)
            .await
            .unwrap();

        assert_eq!(removed.resume_id, a.resume.resume_id);
        assert_eq!(fixture.storage.deleted().await, vec![a.resume.storage_key.clone()]);
        let remaining = service.list(&jane, jane.user_id).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].resume_id, b.resume.resume_id);
        assert!(remaining[0].is_default);
    }

    #[tokio::test]
    async fn test_delete_orphans_object_when_storage_fails() {
        let fixture = Fixture::new();
        let service = service(&fixture);
        let jane = fixture.user("jane@example.com", Role::Applicant).await;
        let a = service.issue_upload(&jane, jane.user_id, upload("a.pdf", false)).await.unwrap();
        fixture.storage.fail_delete(true).await;

        service
            .delete(&jane, jane.user_id, a.resume.resume_id)
            .await
            .unwrap();

        assert!(service.list(&jane, jane.user_id).await.unwrap().is_empty());
        assert!(fixture.storage.deleted().await.is_empty());
    }

    // ==================== Resolution Tests ====================

    #[tokio::test]
    async fn test_download_follows_account_once_registered() {
        let fixture = Fixture::new();
        let service = service(&fixture);
        let admin = fixture.user("admin@talentdesk.test", Role::Admin).await;
        let application = application(&fixture, "a@b.com", "applications/a-b/cv.pdf").await;

        let first = link(
            service
                .download_for_application(&admin, application.application_id)
                .await
                .unwrap(),
        );
        assert_eq!(first.source, ResumeSource::Application);
        assert!(first.url.contains("applications/a-b/cv.pdf"));

        let applicant = fixture.user("A@B.com", Role::Applicant).await;
        service
            .issue_upload(&applicant, applicant.user_id, upload("old.pdf", false))
            .await
            .unwrap();
        let preferred = service
            .issue_upload(&applicant, applicant.user_id, upload("new.pdf", true))
            .await
            .unwrap();

        let second = link(
            service
                .download_for_application(&admin, application.application_id)
                .await
                .unwrap(),
        );
        assert_eq!(second.source, ResumeSource::Profile);
        assert_eq!(second.file_name.as_deref(), Some("new.pdf"));
        assert!(second.url.contains(&preferred.resume.storage_key));
        assert_eq!(
            fixture.storage.downloads().await,
            vec![
                "applications/a-b/cv.pdf".to_string(),
                preferred.resume.storage_key.clone()
            ]
        );
    }

    #[tokio::test]
    async fn test_account_without_resumes_falls_back() {
        let fixture = Fixture::new();
        fixture.user("a@b.com", Role::Applicant).await;
        let application = application(&fixture, "a@b.com", "applications/cv.pdf").await;

        let resolved = service(&fixture)
            .resolve_for_application(&application)
            .await
            .unwrap();

        assert_eq!(
            resolved,
            ResolvedResume::Application(ResumeReference::StorageKey(
                "applications/cv.pdf".to_string()
            ))
        );
    }

    #[tokio::test]
    async fn test_account_lookup_failure_fails_download() {
        let fixture = Fixture::new();
        let admin = fixture.user("admin@talentdesk.test", Role::Admin).await;
        let application = application(&fixture, "a@b.com", "applications/old.pdf").await;
        let service = ResumeService::new(
            Arc::new(UnreachableUsers),
            fixture.repo.clone(),
            fixture.repo.clone(),
            Arc::new(fixture.storage.clone()),
        );

        let err = service
            .resolve_for_application(&application)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Store);

        let err = service
            .download_for_application(&admin, application.application_id)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Store);
        assert!(fixture.storage.downloads().await.is_empty());
    }

    #[tokio::test]
    async fn test_external_url_is_returned_as_is() {
        let fixture = Fixture::new();
        let consultant = fixture.user("c@talentdesk.test", Role::Consultant).await;
        let application =
            application(&fixture, "a@b.com", "https://drive.example.com/cv.pdf").await;

        let link = link(
            service(&fixture)
                .download_for_application(&consultant, application.application_id)
                .await
                .unwrap(),
        );

        assert_eq!(link.url, "https://drive.example.com/cv.pdf");
        assert_eq!(link.expires_at, None);
        assert!(fixture.storage.downloads().await.is_empty());
    }

    #[tokio::test]
    async fn test_nothing_on_file_is_unavailable() {
        let fixture = Fixture::new();
        let admin = fixture.user("admin@talentdesk.test", Role::Admin).await;
        let application = application(&fixture, "a@b.com", "  ").await;

        let download = service(&fixture)
            .download_for_application(&admin, application.application_id)
            .await
            .unwrap();

        assert!(matches!(download, ResumeDownload::Unavailable { .. }));
    }

    #[tokio::test]
    async fn test_applicants_cannot_download() {
        let fixture = Fixture::new();
        let applicant = fixture.user("a@b.com", Role::Applicant).await;
        let application = application(&fixture, "a@b.com", "applications/cv.pdf").await;

        let err = service(&fixture)
            .download_for_application(&applicant, application.application_id)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
    }
}
