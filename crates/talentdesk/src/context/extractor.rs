//! Axum extractors for the acting user.
//!
//! The upstream identity layer authenticates the caller and forwards the
//! account's ID in the `x-user-id` header; the user is then loaded from the
//! store on every request.

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};
use uuid::Uuid;

use talentdesk_core::users::User;

use super::types::{Actor, OptionalActor};
use crate::handlers::ApiError;
use crate::services::ServiceError;
use crate::state::AppState;

pub const USER_ID_HEADER: &str = "x-user-id";

fn unauthenticated(message: &str) -> ServiceError {
    ServiceError::Unauthenticated(message.to_string())
}

/// Reads the user ID header. `Ok(None)` when it is absent.
fn extract_user_id(headers: &HeaderMap) -> Result<Option<Uuid>, ServiceError> {
    let Some(value) = headers.get(USER_ID_HEADER) else {
        return Ok(None);
    };

    value
        .to_str()
        .ok()
        .and_then(|s| Uuid::parse_str(s.trim()).ok())
        .map(Some)
        .ok_or_else(|| unauthenticated("Malformed user identity"))
}

async fn resolve(parts: &Parts, state: &AppState) -> Result<Option<User>, ServiceError> {
    let Some(user_id) = extract_user_id(&parts.headers)? else {
        return Ok(None);
    };

    match state.users.get_user(user_id).await? {
        Some(user) => Ok(Some(user)),
        None => {
            tracing::warn!(%user_id, "request for unknown user");
            Err(unauthenticated("Unknown user"))
        }
    }
}

impl FromRequestParts<AppState> for Actor {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        resolve(parts, state)
            .await?
            .map(Actor)
            .ok_or_else(|| ApiError(unauthenticated("Sign in required")))
    }
}

impl FromRequestParts<AppState> for OptionalActor {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(OptionalActor(resolve(parts, state).await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use talentdesk_core::http_mapping::ErrorKind;

    #[test]
    fn test_extract_user_id_from_header() {
        let mut headers = HeaderMap::new();
        let id = "550e8400-e29b-41d4-a716-446655440000";
        headers.insert(USER_ID_HEADER, id.parse().unwrap());

        let user_id = extract_user_id(&headers).unwrap();
        assert_eq!(user_id.unwrap().to_string(), id);
    }

    #[test]
    fn test_extract_user_id_absent() {
        assert_eq!(extract_user_id(&HeaderMap::new()).unwrap(), None);
    }

    #[test]
    fn test_extract_user_id_rejects_garbage() {
        let mut headers = HeaderMap::new();
        headers.insert(USER_ID_HEADER, "not-a-uuid".parse().unwrap());

        let err = extract_user_id(&headers).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthenticated);
    }
}
