use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use talentdesk_core::applications::{
    Application, ChangeApplicationStatusRequest, SubmitApplicationRequest,
};
use talentdesk_core::storage::{Page, PageQuery};

use crate::context::Actor;
use crate::handlers::ApiError;
use crate::services::ResumeDownload;
use crate::state::AppState;

/// Query parameters for GET /api/applications.
#[derive(Debug, Default, Deserialize)]
pub struct ApplicationListQuery {
    /// Applicant email; without it every application is listed (admin only).
    pub email: Option<String>,
    pub limit: Option<u32>,
    pub cursor: Option<String>,
}

/// Submit an application (POST /api/applications).
///
/// Open to anonymous applicants.
pub async fn submit_application(
    State(state): State<AppState>,
    Json(payload): Json<SubmitApplicationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let application = state.applications.submit(payload).await?;
    Ok((StatusCode::CREATED, Json(application)))
}

/// List applications (GET /api/applications).
pub async fn list_applications(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Query(query): Query<ApplicationListQuery>,
) -> Result<Json<Page<Application>>, ApiError> {
    let page_query = PageQuery {
        limit: query.limit,
        cursor: query.cursor,
    };
    let page = match query.email.as_deref().filter(|e| !e.trim().is_empty()) {
        Some(email) => {
            state
                .applications
                .list_by_applicant(&actor, email, page_query)
                .await?
        }
        None => state.applications.list_all(&actor, page_query).await?,
    };
    Ok(Json(page))
}

/// List applications for a job (GET /api/jobs/{id}/applications).
pub async fn list_job_applications(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(job_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<Application>>, ApiError> {
    let page = state
        .applications
        .list_by_job(&actor, &job_id, query)
        .await?;
    Ok(Json(page))
}

/// Get a single application (GET /api/applications/{id}).
pub async fn get_application(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
) -> Result<Json<Application>, ApiError> {
    let application = state.applications.get(&actor, id).await?;
    Ok(Json(application))
}

/// Move an application through the pipeline (PATCH /api/applications/{id}/status).
pub async fn change_application_status(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
    Json(payload): Json<ChangeApplicationStatusRequest>,
) -> Result<Json<Application>, ApiError> {
    let application = state
        .applications
        .change_status(&actor, id, payload)
        .await?;
    Ok(Json(application))
}

/// Resume download link for an application (GET /api/applications/{id}/resume).
///
/// Answers 404 with `{"status": "unavailable", "reason"}` when no resume can
/// be found.
pub async fn application_resume(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let download = state.resumes.download_for_application(&actor, id).await?;
    let status = match download {
        ResumeDownload::Available(_) => StatusCode::OK,
        ResumeDownload::Unavailable { .. } => StatusCode::NOT_FOUND,
    };
    Ok((status, Json(download)).into_response())
}
