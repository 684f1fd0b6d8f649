use axum::extract::State;
use axum::Json;
use std::sync::Arc;

use attune_shared::errors::{AppError, AppResult, ErrorCode};
use attune_shared::types::auth::AuthUser;
use attune_shared::types::ApiResponse;

use crate::matching::quota::QuotaStatus;
use crate::store::ProfileStore;
use crate::AppState;

/// GET /quota - current allotment, lazily reset on day rollover.
pub async fn get_quota(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ApiResponse<QuotaStatus>>> {
    let profile = state
        .profiles
        .get(user.id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ProfileNotFound, "profile not found"))?;

    let status = state
        .quota
        .check_and_reset(user.id, profile.utc_offset_minutes, user.is_unlimited())
        .await?;

    Ok(Json(ApiResponse::ok(status)))
}
