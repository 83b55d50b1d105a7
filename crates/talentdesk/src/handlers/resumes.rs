use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use talentdesk_core::users::Resume;

use crate::context::Actor;
use crate::handlers::ApiError;
use crate::services::ResumeUploadRequest;
use crate::state::AppState;

/// List a user's resumes (GET /api/users/{id}/resumes).
pub async fn list_resumes(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<Resume>>, ApiError> {
    let resumes = state.resumes.list(&actor, user_id).await?;
    Ok(Json(resumes))
}

/// Start a resume upload (POST /api/users/{id}/resumes).
///
/// Returns the stored record and a presigned upload target.
pub async fn upload_resume(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<ResumeUploadRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let upload = state.resumes.issue_upload(&actor, user_id, payload).await?;
    Ok((StatusCode::CREATED, Json(upload)))
}

/// Make a resume the default (PUT /api/users/{id}/resumes/{resume_id}/default).
pub async fn set_default_resume(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path((user_id, resume_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Vec<Resume>>, ApiError> {
    let resumes = state
        .resumes
        .set_default(&actor, user_id, resume_id)
        .await?;
    Ok(Json(resumes))
}

/// Delete a resume and its file (DELETE /api/users/{id}/resumes/{resume_id}).
pub async fn delete_resume(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path((user_id, resume_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Resume>, ApiError> {
    let removed = state.resumes.delete(&actor, user_id, resume_id).await?;
    Ok(Json(removed))
}
