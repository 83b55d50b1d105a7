use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::email::{is_valid_email, normalize_email};

use super::{
    AccountStatus, CreateUserRequest, Resume, UpdateUserRequest, User, UserError,
    VerificationStatus,
};

/// Builds a new account from a sign-up form. Role defaults to `consultant`.
pub fn new_user(
    user_id: Uuid,
    request: CreateUserRequest,
    now: DateTime<Utc>,
) -> Result<User, UserError> {
    let missing = request.missing_fields();
    if !missing.is_empty() {
        return Err(UserError::MissingFields(missing));
    }

    let email = normalize_email(request.email.as_deref().unwrap_or_default());
    if !is_valid_email(&email) {
        return Err(UserError::InvalidEmail(email));
    }

    Ok(User {
        user_id,
        email,
        first_name: request.first_name.unwrap_or_default(),
        last_name: request.last_name.unwrap_or_default(),
        role: request.role.unwrap_or_default(),
        bio: None,
        skills: Vec::new(),
        experience: None,
        phone: request.phone,
        location: request.location,
        linkedin_url: None,
        github_url: None,
        portfolio_url: None,
        resumes: Vec::new(),
        verification_status: VerificationStatus::NotStarted,
        verified_at: None,
        account_status: AccountStatus::Active,
        created_at: now,
        updated_at: now,
        version: 1,
    })
}

/// Merges the supplied fields into `current` and bumps the version.
///
/// Moving to `verified` stamps `verified_at`; moving away from it clears it.
pub fn apply_user_update(current: &User, update: UpdateUserRequest, now: DateTime<Utc>) -> User {
    let mut user = current.clone();

    if let Some(first_name) = update.first_name {
        user.first_name = first_name;
    }
    if let Some(last_name) = update.last_name {
        user.last_name = last_name;
    }
    if let Some(role) = update.role {
        user.role = role;
    }
    if let Some(bio) = update.bio {
        user.bio = Some(bio);
    }
    if let Some(skills) = update.skills {
        user.skills = skills;
    }
    if let Some(experience) = update.experience {
        user.experience = Some(experience);
    }
    if let Some(phone) = update.phone {
        user.phone = Some(phone);
    }
    if let Some(location) = update.location {
        user.location = Some(location);
    }
    if let Some(url) = update.linkedin_url {
        user.linkedin_url = Some(url);
    }
    if let Some(url) = update.github_url {
        user.github_url = Some(url);
    }
    if let Some(url) = update.portfolio_url {
        user.portfolio_url = Some(url);
    }
    if let Some(status) = update.verification_status {
        if status != user.verification_status {
            user.verified_at = (status == VerificationStatus::Verified).then_some(now);
        }
        user.verification_status = status;
    }
    if let Some(status) = update.account_status {
        user.account_status = status;
    }

    user.version = current.version + 1;
    user.updated_at = now;
    user
}

/// Replaces the resume list and bumps the version.
pub fn with_resumes(current: &User, resumes: Vec<Resume>, now: DateTime<Utc>) -> User {
    User {
        resumes,
        version: current.version + 1,
        updated_at: now,
        ..current.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::Role;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-06-01T08:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn user() -> User {
        new_user(
            Uuid::new_v4(),
            CreateUserRequest::new("Jane@Example.com", "Jane", "Doe"),
            now(),
        )
        .unwrap()
    }

    #[test]
    fn test_new_user_defaults() {
        let user = user();
        assert_eq!(user.email, "jane@example.com");
        assert_eq!(user.role, Role::Consultant);
        assert_eq!(user.verification_status, VerificationStatus::NotStarted);
        assert_eq!(user.account_status, AccountStatus::Active);
        assert!(user.resumes.is_empty());
        assert_eq!(user.version, 1);
    }

    #[test]
    fn test_new_user_validation() {
        let err = new_user(Uuid::new_v4(), CreateUserRequest::default(), now()).unwrap_err();
        assert_eq!(
            err,
            UserError::MissingFields(vec!["email", "firstName", "lastName"])
        );

        let err = new_user(
            Uuid::new_v4(),
            CreateUserRequest::new("not-an-email", "A", "B"),
            now(),
        )
        .unwrap_err();
        assert!(matches!(err, UserError::InvalidEmail(_)));
    }

    #[test]
    fn test_update_merges_only_supplied_fields() {
        let original = user();
        let later = now() + chrono::Duration::hours(1);
        let update = UpdateUserRequest::new()
            .with_first_name("Janet")
            .with_skills(vec!["Rust".to_string()]);

        let updated = apply_user_update(&original, update, later);

        assert_eq!(updated.first_name, "Janet");
        assert_eq!(updated.last_name, "Doe");
        assert_eq!(updated.skills, vec!["Rust".to_string()]);
        assert_eq!(updated.email, original.email);
        assert_eq!(updated.version, 2);
        assert_eq!(updated.updated_at, later);
    }

    #[test]
    fn test_verification_stamps_verified_at() {
        let original = user();
        let later = now() + chrono::Duration::hours(1);

        let verified = apply_user_update(
            &original,
            UpdateUserRequest::new().with_verification_status(VerificationStatus::Verified),
            later,
        );
        assert_eq!(verified.verified_at, Some(later));

        let failed = apply_user_update(
            &verified,
            UpdateUserRequest::new().with_verification_status(VerificationStatus::Failed),
            later,
        );
        assert_eq!(failed.verified_at, None);
    }
}
