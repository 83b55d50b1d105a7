use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::email::{is_valid_email, normalize_email};
use crate::lifecycle::Lifecycle;

use super::{Application, ApplicationError, ApplicationStatus, SubmitApplicationRequest};

/// Source tag used when the form does not supply one.
pub const DEFAULT_SOURCE: &str = "website";

/// Builds a new application from a submitted form.
///
/// Fails with every missing field at once, then with a malformed email. The
/// stored email is lowercased.
pub fn new_application(
    application_id: Uuid,
    request: SubmitApplicationRequest,
    now: DateTime<Utc>,
) -> Result<Application, ApplicationError> {
    let missing = request.missing_fields();
    if !missing.is_empty() {
        return Err(ApplicationError::MissingFields(missing));
    }

    let email = normalize_email(request.email.as_deref().unwrap_or_default());
    if !is_valid_email(&email) {
        return Err(ApplicationError::InvalidEmail(email));
    }

    Ok(Application {
        application_id,
        job_id: request.job_id.unwrap_or_default(),
        first_name: request.first_name.unwrap_or_default(),
        last_name: request.last_name.unwrap_or_default(),
        email,
        phone: request.phone.unwrap_or_default(),
        linkedin_url: request.linkedin_url,
        cover_letter: request.cover_letter.unwrap_or_default(),
        resume_key: request.resume_key.unwrap_or_default(),
        status: ApplicationStatus::Pending,
        applied_at: now,
        created_at: now,
        updated_at: now,
        source: request
            .source
            .unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
        version: 1,
    })
}

/// Moves an application to `status` through the pipeline state machine.
pub fn apply_status_change(
    current: &Application,
    status: ApplicationStatus,
    now: DateTime<Utc>,
) -> Result<Application, ApplicationError> {
    let mut application = current.clone();
    application.status = current.status.transition_to(status)?;
    application.version = current.version + 1;
    application.updated_at = now;
    Ok(application)
}
