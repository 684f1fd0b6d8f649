use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use attune_shared::errors::{AppError, AppResult, ErrorCode};
use attune_shared::types::auth::AuthUser;
use attune_shared::types::ApiResponse;

use crate::matching::scorer::{self, CompatibilityScore};
use crate::store::ProfileStore;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct CompatibilityResponse {
    pub target_id: Uuid,
    /// Null when the pair shares no scorable dimension; the client shows the
    /// candidate without a percentage badge instead of inventing one.
    pub score: Option<CompatibilityScore>,
}

/// GET /compatibility/:target_id
pub async fn get_compatibility(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(target_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<CompatibilityResponse>>> {
    let viewer = state
        .profiles
        .get(user.id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ProfileNotFound, "profile not found"))?;

    let target = state
        .profiles
        .get(target_id)
        .await?
        .ok_or_else(|| AppError::not_found("candidate profile not found"))?;

    Ok(Json(ApiResponse::ok(CompatibilityResponse {
        target_id,
        score: scorer::score(&viewer, &target),
    })))
}
