use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use attune_shared::errors::AppResult;
use attune_shared::types::auth::AuthUser;
use attune_shared::types::ApiResponse;

use crate::events::publisher;
use crate::matching::quota::QuotaStatus;
use crate::matching::swipe::{SwipeAction, SwipeOutcome};
use crate::store::ProfileStore;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct RecordSwipeRequest {
    pub target_id: Uuid,
    pub action: SwipeAction,
}

/// Tagged union so quota exhaustion is a branchable result, not an error:
/// the client routes `quota_exhausted` straight to the upgrade prompt.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SwipeResponse {
    Recorded {
        action: SwipeAction,
        is_match: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        match_id: Option<Uuid>,
        #[serde(skip_serializing_if = "Option::is_none")]
        compatibility_score: Option<i32>,
        quota: QuotaStatus,
    },
    QuotaExhausted {
        quota: QuotaStatus,
    },
}

/// POST /swipes
pub async fn record_swipe(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(req): Json<RecordSwipeRequest>,
) -> AppResult<Json<ApiResponse<SwipeResponse>>> {
    let outcome = state
        .swipe_service
        .record_swipe(user.id, req.target_id, req.action, user.is_unlimited())
        .await?;

    let utc_offset = state
        .profiles
        .get(user.id)
        .await?
        .map(|p| p.utc_offset_minutes)
        .unwrap_or(0);

    let response = match outcome {
        SwipeOutcome::Recorded { swipe, matched } => {
            if let Some(rabbitmq) = &state.rabbitmq {
                publisher::publish_swipe_recorded(rabbitmq, user.id, req.target_id, req.action)
                    .await;
                if let Some(m) = matched.as_ref().filter(|m| m.created) {
                    publisher::publish_match_created(
                        rabbitmq,
                        m.record.id,
                        m.record.user_a_id,
                        m.record.user_b_id,
                        m.record.compatibility_score,
                    )
                    .await;
                }
            }

            let quota = state
                .quota
                .check_and_reset(user.id, utc_offset, user.is_unlimited())
                .await?;

            SwipeResponse::Recorded {
                action: swipe.action,
                is_match: matched.is_some(),
                match_id: matched.as_ref().map(|m| m.record.id),
                compatibility_score: matched.as_ref().and_then(|m| m.record.compatibility_score),
                quota,
            }
        }
        SwipeOutcome::QuotaExhausted { status } => {
            if let Some(rabbitmq) = &state.rabbitmq {
                publisher::publish_quota_exhausted(
                    rabbitmq,
                    user.id,
                    &req.action.to_string(),
                    &status.date_key,
                )
                .await;
            }
            SwipeResponse::QuotaExhausted { quota: status }
        }
    };

    Ok(Json(ApiResponse::ok(response)))
}
