use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use talentdesk_core::jobs::{CreateJobRequest, Job, JobStatus, UpdateJobRequest};
use talentdesk_core::storage::{DeletedJob, Page, PageQuery};

use crate::context::{Actor, OptionalActor};
use crate::handlers::ApiError;
use crate::services::ServiceError;
use crate::state::AppState;

/// Query parameters for GET /api/jobs.
#[derive(Debug, Default, Deserialize)]
pub struct JobListQuery {
    /// Accepts the aliases `open` and `inactive`.
    pub status: Option<String>,
    pub limit: Option<u32>,
    pub cursor: Option<String>,
}

impl JobListQuery {
    fn status(&self) -> Result<Option<JobStatus>, ServiceError> {
        self.status
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.parse::<JobStatus>().map_err(ServiceError::from))
            .transpose()
    }
}

/// Body of PATCH /api/jobs/{id}.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateJobBody {
    pub expected_version: u64,
    #[serde(flatten)]
    pub update: UpdateJobRequest,
}

/// List jobs (GET /api/jobs).
pub async fn list_jobs(
    State(state): State<AppState>,
    actor: OptionalActor,
    Query(query): Query<JobListQuery>,
) -> Result<Json<Page<Job>>, ApiError> {
    let status = query.status()?;
    let page = state
        .jobs
        .list(
            actor.user(),
            status,
            PageQuery {
                limit: query.limit,
                cursor: query.cursor,
            },
        )
        .await?;
    Ok(Json(page))
}

/// Create a job (POST /api/jobs).
pub async fn create_job(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Json(payload): Json<CreateJobRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let job = state.jobs.create(&actor, payload).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

/// Get a single job by ID (GET /api/jobs/{id}).
pub async fn get_job(
    State(state): State<AppState>,
    actor: OptionalActor,
    Path(id): Path<String>,
) -> Result<Json<Job>, ApiError> {
    let job = state.jobs.get(actor.user(), &id).await?;
    Ok(Json(job))
}

/// Update a job (PATCH /api/jobs/{id}).
pub async fn update_job(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<String>,
    Json(payload): Json<UpdateJobBody>,
) -> Result<Json<Job>, ApiError> {
    let job = state
        .jobs
        .update(&actor, &id, payload.update, payload.expected_version)
        .await?;
    Ok(Json(job))
}

/// Delete a job (DELETE /api/jobs/{id}).
///
/// Applications referencing the job are kept; their count is returned.
pub async fn delete_job(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<String>,
) -> Result<Json<DeletedJob>, ApiError> {
    let deleted = state.jobs.delete(&actor, &id).await?;
    Ok(Json(deleted))
}
