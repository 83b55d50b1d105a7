use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use talentdesk_core::storage::{Page, PageQuery};
use talentdesk_core::users::{CreateUserRequest, UpdateUserRequest, User};

use crate::context::Actor;
use crate::handlers::ApiError;
use crate::state::AppState;

/// Body of PATCH /api/users/{id}.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserBody {
    pub expected_version: u64,
    #[serde(flatten)]
    pub update: UpdateUserRequest,
}

/// Body of POST /api/users/sign-in-link.
#[derive(Debug, Deserialize)]
pub struct SignInLinkBody {
    pub email: String,
}

/// Sign up (POST /api/users).
///
/// Answers 201 when the profile was stored and 202 when only the identity
/// was registered.
pub async fn create_account(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = state.accounts.create_account(payload).await?;
    let status = if outcome.profile_created {
        StatusCode::CREATED
    } else {
        StatusCode::ACCEPTED
    };
    Ok((status, Json(outcome)))
}

/// Send a new sign-in link (POST /api/users/sign-in-link).
pub async fn send_sign_in_link(
    State(state): State<AppState>,
    Json(payload): Json<SignInLinkBody>,
) -> Result<StatusCode, ApiError> {
    state.accounts.send_sign_in_link(&payload.email).await?;
    Ok(StatusCode::ACCEPTED)
}

/// List all users (GET /api/users).
pub async fn list_users(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<User>>, ApiError> {
    let page = state.accounts.list(&actor, query).await?;
    Ok(Json(page))
}

/// The acting user (GET /api/users/me).
pub async fn current_user(Actor(actor): Actor) -> Json<User> {
    Json(actor)
}

/// Get a single user by ID (GET /api/users/{id}).
pub async fn get_user(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
) -> Result<Json<User>, ApiError> {
    let user = state.accounts.get(&actor, id).await?;
    Ok(Json(user))
}

/// Edit a profile (PATCH /api/users/{id}).
pub async fn update_user(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserBody>,
) -> Result<Json<User>, ApiError> {
    let user = state
        .accounts
        .update_profile(&actor, id, payload.update, payload.expected_version)
        .await?;
    Ok(Json(user))
}
