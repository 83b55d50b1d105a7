//! Pure types for request-scoped context.

use talentdesk_core::users::User;

/// The authenticated user making the request.
///
/// Rejects the request with `unauthenticated` when no user can be resolved.
#[derive(Debug, Clone)]
pub struct Actor(pub User);

/// Like [`Actor`], but anonymous requests are allowed.
///
/// A present but unusable user header is still rejected.
#[derive(Debug, Clone)]
pub struct OptionalActor(pub Option<User>);

impl OptionalActor {
    pub fn user(&self) -> Option<&User> {
        self.0.as_ref()
    }
}
