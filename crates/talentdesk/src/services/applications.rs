use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use talentdesk_core::applications::{
    new_application, Application, ChangeApplicationStatusRequest, SubmitApplicationRequest,
};
use talentdesk_core::email::normalize_email;
use talentdesk_core::storage::{
    ApplicationRepository, JobRepository, Page, PageLimits, PageQuery,
};
use talentdesk_core::users::User;

use super::authz::{require_admin, require_consultant};
use super::{Notifier, Result, ServiceError};

/// Application intake and the back-office pipeline.
#[derive(Clone)]
pub struct ApplicationService {
    applications: Arc<dyn ApplicationRepository>,
    jobs: Arc<dyn JobRepository>,
    notifier: Option<Notifier>,
    limits: PageLimits,
}

impl ApplicationService {
    pub fn new(
        applications: Arc<dyn ApplicationRepository>,
        jobs: Arc<dyn JobRepository>,
        limits: PageLimits,
    ) -> Self {
        Self {
            applications,
            jobs,
            notifier: None,
            limits,
        }
    }

    /// Sends a confirmation email after each stored submission.
    pub fn with_notifier(mut self, notifier: Notifier) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Validates and stores a submission under a fresh identity.
    pub async fn submit(&self, request: SubmitApplicationRequest) -> Result<Application> {
        self.submit_with_id(Uuid::new_v4(), request).await
    }

    /// Validates and stores a submission under `application_id`.
    ///
    /// Fails with `Conflict` if that identity is already taken; the stored
    /// record is left as it was.
    pub async fn submit_with_id(
        &self,
        application_id: Uuid,
        request: SubmitApplicationRequest,
    ) -> Result<Application> {
        let application = new_application(application_id, request, Utc::now())?;
        self.applications.create_application(&application).await?;

        tracing::info!(
            application_id = %application.application_id,
            job_id = %application.job_id,
            "application submitted"
        );

        if let Some(notifier) = &self.notifier {
            let job_title = match self.jobs.get_job(&application.job_id).await {
                Ok(job) => job.map(|job| job.title),
                Err(e) => {
                    tracing::warn!(job_id = %application.job_id, error = %e, "job lookup for confirmation failed");
                    None
                }
            };
            match notifier.application_received(&application, job_title.as_deref()) {
                Ok(message) => {
                    notifier.send_best_effort(&message).await;
                }
                Err(e) => tracing::warn!(
                    application_id = %application.application_id,
                    error = %e,
                    "confirmation email not rendered"
                ),
            }
        }

        Ok(application)
    }

    /// Back office lookup, or an applicant reading their own application.
    pub async fn get(&self, actor: &User, application_id: Uuid) -> Result<Application> {
        let application = self
            .applications
            .get_application(application_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Application", application_id))?;

        if actor.role.is_consultant() {
            require_consultant(actor)?;
        } else if actor.email != application.email {
            // Hide existence from other applicants.
            return Err(ServiceError::not_found("Application", application_id));
        }

        Ok(application)
    }

    pub async fn list_by_job(
        &self,
        actor: &User,
        job_id: &str,
        query: PageQuery,
    ) -> Result<Page<Application>> {
        require_consultant(actor)?;
        let page = self
            .applications
            .list_applications_by_job(job_id, self.limits.resolve(query))
            .await?;
        Ok(page)
    }

    /// Applications by applicant email. Applicants may only list their own.
    pub async fn list_by_applicant(
        &self,
        actor: &User,
        email: &str,
        query: PageQuery,
    ) -> Result<Page<Application>> {
        let email = normalize_email(email);
        if actor.email != email {
            require_consultant(actor)?;
        }

        let page = self
            .applications
            .list_applications_by_applicant(&email, self.limits.resolve(query))
            .await?;
        Ok(page)
    }

    pub async fn list_all(&self, actor: &User, query: PageQuery) -> Result<Page<Application>> {
        require_admin(actor)?;
        let page = self
            .applications
            .list_applications(self.limits.resolve(query))
            .await?;
        Ok(page)
    }

    /// Moves an application through the pipeline. Admin only.
    pub async fn change_status(
        &self,
        actor: &User,
        application_id: Uuid,
        request: ChangeApplicationStatusRequest,
    ) -> Result<Application> {
        require_admin(actor)?;

        let application = self
            .applications
            .update_application_status(application_id, request.status, request.expected_version)
            .await?;

        tracing::info!(
            application_id = %application_id,
            status = %application.status,
            version = application.version,
            actor = %actor.user_id,
            "application status changed"
        );
        Ok(application)
    }
}
