use axum::extract::{Query, State};
use axum::Json;
use std::sync::Arc;

use attune_shared::errors::AppResult;
use attune_shared::types::auth::AuthUser;
use attune_shared::types::{ApiResponse, Paginated, PaginationParams};

use crate::matching::swipe::MatchRecord;
use crate::AppState;

/// GET /matches?page=1&per_page=20 - the caller's matches, newest first.
pub async fn list_matches(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<ApiResponse<Paginated<MatchRecord>>>> {
    let all = state.swipe_service.matches_for(user.id).await?;
    let total = all.len() as u64;

    let items: Vec<MatchRecord> = all
        .into_iter()
        .skip(params.offset() as usize)
        .take(params.limit() as usize)
        .collect();

    Ok(Json(ApiResponse::ok(Paginated::new(items, total, &params))))
}
