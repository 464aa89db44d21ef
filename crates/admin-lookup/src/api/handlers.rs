//! HTTP request handlers.

use super::types::{CallableRequest, CallableResponse, HealthResponse};
use super::AppState;
use crate::error::CheckError;
use crate::resolver::AdminLookup;
use axum::{extract::rejection::JsonRejection, extract::State, Json};
use tracing::{debug, warn};

/// Health check endpoint.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        function: state.function_name.clone(),
        store: state.resolver.backend().to_string(),
    })
}

/// Callable `checkAdminExists`: does the phone number belong to an admin?
pub async fn check_admin_exists(
    State(state): State<AppState>,
    payload: Result<Json<CallableRequest>, JsonRejection>,
) -> Result<Json<CallableResponse<AdminLookup>>, CheckError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "Rejected malformed callable request");
        CheckError::MalformedRequest(rejection.body_text())
    })?;

    debug!("Admin check request received");

    let result = state.resolver.check(&request.data).await?;
    Ok(Json(CallableResponse { result }))
}
