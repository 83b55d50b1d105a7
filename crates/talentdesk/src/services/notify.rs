//! Transactional email sent by the workflows.

use std::sync::Arc;

use askama::Template;
use uuid::Uuid;

use talentdesk_core::applications::Application;
use talentdesk_core::collaborators::{EmailMessage, EmailSender};

#[derive(Template)]
#[template(path = "email/application_received.txt")]
struct ApplicationReceivedText<'a> {
    first_name: &'a str,
    position: &'a str,
    reference: Uuid,
    job_url: &'a str,
}

#[derive(Template)]
#[template(path = "email/application_received.html")]
struct ApplicationReceivedHtml<'a> {
    first_name: &'a str,
    position: &'a str,
    reference: Uuid,
    job_url: &'a str,
}

/// Builds and sends workflow notifications.
#[derive(Clone)]
pub struct Notifier {
    sender: Arc<dyn EmailSender>,
    from: String,
    site_url: String,
}

impl Notifier {
    pub fn new(
        sender: Arc<dyn EmailSender>,
        from: impl Into<String>,
        site_url: impl Into<String>,
    ) -> Self {
        Self {
            sender,
            from: from.into(),
            site_url: site_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Confirmation for an applicant whose submission was stored.
    pub fn application_received(
        &self,
        application: &Application,
        job_title: Option<&str>,
    ) -> Result<EmailMessage, askama::Error> {
        let position = job_title.unwrap_or(application.job_id.as_str());
        let job_url = format!("{}/jobs/{}", self.site_url, application.job_id);

        let text_body = ApplicationReceivedText {
            first_name: &application.first_name,
            position,
            reference: application.application_id,
            job_url: &job_url,
        }
        .render()?;
        let html_body = ApplicationReceivedHtml {
            first_name: &application.first_name,
            position,
            reference: application.application_id,
            job_url: &job_url,
        }
        .render()?;

        Ok(EmailMessage {
            from: self.from.clone(),
            to: application.email.clone(),
            subject: format!("Application received: {}", position),
            text_body,
            html_body: Some(html_body),
        })
    }

    /// Sends `message`. Failures are logged, never returned.
    pub async fn send_best_effort(&self, message: &EmailMessage) -> bool {
        match self.sender.send(message).await {
            Ok(()) => {
                tracing::debug!(to = %message.to, subject = %message.subject, "notification sent");
                true
            }
            Err(e) => {
                tracing::warn!(to = %message.to, error = %e, "notification failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::MockEmailSender;
    use chrono::Utc;
    use talentdesk_core::applications::{new_application, SubmitApplicationRequest};
    use uuid::Uuid;

    fn application() -> Application {
        new_application(
            Uuid::new_v4(),
            SubmitApplicationRequest::new(
                "cloud-abc12345",
                "<Jane>",
                "Doe",
                "Jane@Example.com",
                "555-0100",
                "Hello",
                "resumes/jane.pdf",
            ),
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn test_confirmation_content() {
        let notifier = Notifier::new(
            Arc::new(MockEmailSender::new()),
            "jobs@talentdesk.test",
            "https://talentdesk.test/",
        );
        let message = notifier
            .application_received(&application(), Some("Cloud Engineer"))
            .unwrap();

        assert_eq!(message.to, "jane@example.com");
        assert_eq!(message.subject, "Application received: Cloud Engineer");
        assert!(message
            .text_body
            .contains("https://talentdesk.test/jobs/cloud-abc12345"));
        assert!(message.text_body.starts_with("Hi <Jane>,"));
        let html = message.html_body.unwrap();
        assert!(html.contains("&lt;Jane&gt;"));
        assert!(!html.contains("<Jane>"));
    }

    #[tokio::test]
    async fn test_send_failure_is_swallowed() {
        let sender = MockEmailSender::new();
        sender.fail(true).await;
        let notifier = Notifier::new(Arc::new(sender.clone()), "jobs@talentdesk.test", "");

        let message = notifier.application_received(&application(), None).unwrap();
        assert!(!notifier.send_best_effort(&message).await);
        assert!(sender.sent().await.is_empty());
    }
}
