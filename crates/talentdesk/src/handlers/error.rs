//! JSON error responses.
//!
//! Every failure leaves the API as `{ "kind", "message" }` with the status
//! code of its [`ErrorKind`]. Dependency and store failures get a generic
//! message; the real one is logged and attached as an [`ErrorDetail`]
//! extension, which [`reveal_error_details`] swaps in when the deployment
//! opts in.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use talentdesk_core::http_mapping::{error_kind_to_status_code, ErrorKind};

use crate::services::ServiceError;
use crate::state::AppState;

/// Error body returned by every endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub kind: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_version: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_version: Option<u64>,
}

/// Full message of an internal failure, kept out of the body by default.
#[derive(Debug, Clone)]
pub struct ErrorDetail(pub ErrorBody);

pub struct ApiError(pub ServiceError);

fn generic_message(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::Dependency => "An external service failed. Please try again later.",
        _ => "The request could not be completed. Please try again later.",
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.0.kind();
        let status = StatusCode::from_u16(error_kind_to_status_code(kind))
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let (expected_version, actual_version) = match &self.0 {
            ServiceError::VersionConflict {
                expected, actual, ..
            } => (Some(*expected), Some(*actual)),
            _ => (None, None),
        };
        let body = ErrorBody {
            kind: kind.as_str(),
            message: self.0.to_string(),
            expected_version,
            actual_version,
        };

        if !kind.is_internal() {
            return (status, Json(body)).into_response();
        }

        tracing::error!(kind = %kind, error = %self.0, "request failed");
        let public = ErrorBody {
            message: generic_message(kind).to_string(),
            ..body.clone()
        };
        let mut response = (status, Json(public)).into_response();
        response.extensions_mut().insert(ErrorDetail(body));
        response
    }
}

impl<E> From<E> for ApiError
where
    E: Into<ServiceError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

/// Replaces generic internal error bodies with the detailed ones when
/// `EXPOSE_ERROR_DETAILS` is on.
pub async fn reveal_error_details(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    if !state.expose_error_details {
        return response;
    }

    match response.extensions_mut().remove::<ErrorDetail>() {
        Some(ErrorDetail(body)) => (response.status(), Json(body)).into_response(),
        None => response,
    }
}
