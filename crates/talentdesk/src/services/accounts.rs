use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use talentdesk_core::collaborators::{IdentityProvider, IdentityRegistration};
use talentdesk_core::storage::{Page, PageLimits, PageQuery, RepositoryError, UserRepository};
use talentdesk_core::users::{new_user, CreateUserRequest, Role, UpdateUserRequest, User};

use super::authz::{require_admin, require_consultant, require_self_or_admin};
use super::{Result, ServiceError};

const DUPLICATE_ACCOUNT_MESSAGE: &str =
    "An account with this email already exists. Please sign in instead.";

/// What the sign-up workflow managed to do.
///
/// The identity is always registered when this is returned. The profile write
/// may have failed without aborting the workflow.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountOutcome {
    /// The stored profile, when it was written.
    pub user: Option<User>,
    pub profile_created: bool,
    pub sign_in_link_sent: bool,
}

/// Sign-up and profile management.
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    identity: Arc<dyn IdentityProvider>,
    limits: PageLimits,
}

impl AccountService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        identity: Arc<dyn IdentityProvider>,
        limits: PageLimits,
    ) -> Self {
        Self {
            users,
            identity,
            limits,
        }
    }

    /// Registers the identity, stores the profile, then sends a sign-in link.
    ///
    /// A duplicate profile aborts with `Conflict`. Any other profile write
    /// failure is logged and the link is still sent; the identity registration
    /// is never rolled back.
    pub async fn create_account(&self, request: CreateUserRequest) -> Result<AccountOutcome> {
        if request.role == Some(Role::Admin) {
            return Err(ServiceError::forbidden("Admin accounts cannot be self-registered"));
        }
        let user = new_user(Uuid::new_v4(), request, Utc::now())?;

        let registration = IdentityRegistration {
            email: user.email.clone(),
            given_name: user.first_name.clone(),
            family_name: user.last_name.clone(),
        };
        let identity = self.identity.register_identity(&registration).await?;
        tracing::debug!(user_id = %user.user_id, subject = %identity.subject, "identity registered");

        let profile_created = match self.users.create_user(&user).await {
            Ok(()) => true,
            Err(RepositoryError::AlreadyExists { .. }) => {
                tracing::info!(email = %user.email, "sign-up for existing account");
                return Err(ServiceError::Conflict(DUPLICATE_ACCOUNT_MESSAGE.to_string()));
            }
            Err(e) => {
                tracing::error!(
                    user_id = %user.user_id,
                    subject = %identity.subject,
                    error = %e,
                    "profile write failed after identity registration"
                );
                false
            }
        };

        self.identity.send_sign_in_link(&user.email).await?;

        tracing::info!(user_id = %user.user_id, role = %user.role, profile_created, "account created");
        Ok(AccountOutcome {
            user: profile_created.then_some(user),
            profile_created,
            sign_in_link_sent: true,
        })
    }

    /// Re-sends a sign-in link when `email` belongs to an account.
    ///
    /// Unknown addresses succeed without sending anything, so the caller
    /// cannot tell which emails are registered.
    pub async fn send_sign_in_link(&self, email: &str) -> Result<()> {
        match self.users.get_user_by_email(email).await? {
            Some(user) => {
                self.identity.send_sign_in_link(&user.email).await?;
                tracing::debug!(user_id = %user.user_id, "sign-in link sent");
            }
            None => tracing::debug!("sign-in link requested for unknown email"),
        }
        Ok(())
    }

    /// The user themselves, or back office staff.
    pub async fn get(&self, actor: &User, user_id: Uuid) -> Result<User> {
        if actor.user_id != user_id {
            require_consultant(actor)?;
        }
        let user = self
            .users
            .get_user(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", user_id))?;
        Ok(user)
    }

    pub async fn list(&self, actor: &User, query: PageQuery) -> Result<Page<User>> {
        require_admin(actor)?;
        let page = self.users.list_users(self.limits.resolve(query)).await?;
        Ok(page)
    }

    /// Partial profile edit conditioned on `expected_version`.
    ///
    /// Role, verification and account status are admin-only fields.
    pub async fn update_profile(
        &self,
        actor: &User,
        user_id: Uuid,
        update: UpdateUserRequest,
        expected_version: u64,
    ) -> Result<User> {
        require_self_or_admin(actor, user_id)?;
        if update.touches_privileged_fields() {
            require_admin(actor)?;
        }
        if update.is_empty() {
            return Err(ServiceError::validation("No fields to update"));
        }

        let user = self
            .users
            .update_user(user_id, update, expected_version)
            .await?;
        tracing::info!(user_id = %user_id, version = user.version, actor = %actor.user_id, "profile updated");
        Ok(user)
    }
}
