//! Role checks for the acting user.
//!
//! Admin-only operations call [`require_admin`]; back-office reads call
//! [`require_consultant`], which admins also pass. Suspended accounts pass
//! neither.

use talentdesk_core::users::{AccountStatus, User};

use super::{Result, ServiceError};

fn require_active(actor: &User) -> Result<()> {
    if actor.account_status == AccountStatus::Suspended {
        tracing::warn!(user_id = %actor.user_id, "Authorization denied: account suspended");
        return Err(ServiceError::forbidden("Account is suspended"));
    }
    Ok(())
}

/// Requires the `admin` role.
pub fn require_admin(actor: &User) -> Result<()> {
    require_active(actor)?;
    if !actor.role.is_admin() {
        tracing::warn!(
            user_id = %actor.user_id,
            role = %actor.role,
            required = "admin",
            "Authorization denied: insufficient role"
        );
        return Err(ServiceError::forbidden("Requires admin role"));
    }
    Ok(())
}

/// Requires the `consultant` or `admin` role.
pub fn require_consultant(actor: &User) -> Result<()> {
    require_active(actor)?;
    if !actor.role.is_consultant() {
        tracing::warn!(
            user_id = %actor.user_id,
            role = %actor.role,
            required = "consultant",
            "Authorization denied: insufficient role"
        );
        return Err(ServiceError::forbidden("Requires consultant role"));
    }
    Ok(())
}

/// Allows the user themselves or an admin.
pub fn require_self_or_admin(actor: &User, user_id: uuid::Uuid) -> Result<()> {
    require_active(actor)?;
    if actor.user_id == user_id || actor.role.is_admin() {
        return Ok(());
    }
    tracing::warn!(user_id = %actor.user_id, target = %user_id, "Authorization denied: not owner");
    Err(ServiceError::forbidden("Cannot act on another user's account"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use talentdesk_core::http_mapping::ErrorKind;
    use talentdesk_core::users::{new_user, CreateUserRequest, Role};
    use uuid::Uuid;

    fn user(role: Role) -> User {
        new_user(
            Uuid::new_v4(),
            CreateUserRequest::new("a@b.com", "A", "B").with_role(role),
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn test_admin_gate() {
        assert!(require_admin(&user(Role::Admin)).is_ok());
        let err = require_admin(&user(Role::Consultant)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
    }

    #[test]
    fn test_consultant_gate() {
        assert!(require_consultant(&user(Role::Consultant)).is_ok());
        assert!(require_consultant(&user(Role::Admin)).is_ok());
        assert!(require_consultant(&user(Role::Applicant)).is_err());
    }

    #[test]
    fn test_suspended_admin_denied() {
        let mut admin = user(Role::Admin);
        admin.account_status = AccountStatus::Suspended;
        assert!(require_admin(&admin).is_err());
    }

    #[test]
    fn test_self_or_admin() {
        let applicant = user(Role::Applicant);
        assert!(require_self_or_admin(&applicant, applicant.user_id).is_ok());
        assert!(require_self_or_admin(&applicant, Uuid::new_v4()).is_err());
        assert!(require_self_or_admin(&user(Role::Admin), applicant.user_id).is_ok());
    }
}
