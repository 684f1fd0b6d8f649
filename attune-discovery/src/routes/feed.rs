use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

use attune_shared::errors::{AppError, AppResult, ErrorCode};
use attune_shared::types::auth::AuthUser;
use attune_shared::types::ApiResponse;

use crate::matching::feed::{build_feed, RankedCandidate};
use crate::store::{ProfileStore, SwipeStore};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct FeedParams {
    #[serde(default = "default_limit")]
    limit: usize,
}

fn default_limit() -> usize {
    25
}

/// GET /feed?limit=25
pub async fn get_feed(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Query(params): Query<FeedParams>,
) -> AppResult<Json<ApiResponse<Vec<RankedCandidate>>>> {
    let viewer = state
        .profiles
        .get(user.id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ProfileNotFound, "complete your profile first"))?;

    let pool = state
        .profiles
        .candidate_pool(user.id, state.config.feed_pool_size)
        .await?;
    let seen: HashSet<Uuid> = state
        .swipes
        .seen_target_ids(user.id)
        .await?
        .into_iter()
        .collect();

    let mut feed = build_feed(&viewer, &pool, &seen);
    feed.truncate(params.limit.clamp(1, 100));

    tracing::debug!(user_id = %user.id, feed_len = feed.len(), "feed built");
    Ok(Json(ApiResponse::ok(feed)))
}
