pub mod memory;
pub mod postgres;
pub mod redis_quota;

use async_trait::async_trait;
use uuid::Uuid;

use attune_shared::errors::AppError;

use crate::matching::profile::DiscoveryProfile;
use crate::matching::quota::{QuotaKind, QuotaUsage};
use crate::matching::swipe::{MatchRecord, SwipeAction, SwipeRecord};

/// Persistence failure, kept distinct from domain outcomes so callers can
/// apply their own retry policy. The stores never retry internally.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("connection pool error: {0}")]
    Pool(String),

    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("corrupt stored data: {0}")]
    Corrupt(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        tracing::error!(error = %err, "storage backend failure");
        AppError::storage(err.to_string())
    }
}

/// Read model of user psychological profiles.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get(&self, user_id: Uuid) -> Result<Option<DiscoveryProfile>, StoreError>;

    async fn upsert(&self, profile: &DiscoveryProfile) -> Result<(), StoreError>;

    /// Candidate pool for a feed request, excluding the viewer, bounded by
    /// `limit`. Finer filtering (seen ids, seeking preference) happens in
    /// the feed builder.
    async fn candidate_pool(
        &self,
        viewer_id: Uuid,
        limit: i64,
    ) -> Result<Vec<DiscoveryProfile>, StoreError>;
}

/// Result of the atomic match find-or-create.
#[derive(Debug, Clone)]
pub struct MatchInsert {
    pub record: MatchRecord,
    /// False when the match already existed (idempotent retry or the other
    /// side of a concurrent reciprocal swipe won the insert).
    pub created: bool,
}

/// Swipe records and matches. Implementations must provide:
/// - at most one record per ordered (actor, target) pair, later actions
///   overwriting earlier ones;
/// - atomic find-or-create on the unordered pair for matches, so concurrent
///   reciprocal swipes can never produce two match rows.
#[async_trait]
pub trait SwipeStore: Send + Sync {
    async fn upsert_swipe(
        &self,
        actor_id: Uuid,
        target_id: Uuid,
        action: SwipeAction,
    ) -> Result<SwipeRecord, StoreError>;

    async fn get_swipe(
        &self,
        actor_id: Uuid,
        target_id: Uuid,
    ) -> Result<Option<SwipeRecord>, StoreError>;

    async fn seen_target_ids(&self, actor_id: Uuid) -> Result<Vec<Uuid>, StoreError>;

    /// Find-or-create the match for the unordered pair. Creation also marks
    /// both swipe records consumed, in the same atomic step.
    async fn create_match(
        &self,
        user_a: Uuid,
        user_b: Uuid,
        compatibility_score: Option<i32>,
    ) -> Result<MatchInsert, StoreError>;

    async fn get_match(
        &self,
        user_a: Uuid,
        user_b: Uuid,
    ) -> Result<Option<MatchRecord>, StoreError>;

    async fn matches_for(&self, user_id: Uuid) -> Result<Vec<MatchRecord>, StoreError>;
}

/// Daily quota counters keyed by (user, date key). Counters for a date key
/// that was never written read as zero, which is what makes the lazy
/// day-rollover reset work.
#[async_trait]
pub trait QuotaStore: Send + Sync {
    async fn usage(&self, user_id: Uuid, date_key: &str) -> Result<QuotaUsage, StoreError>;

    /// Atomically consume one unit if the counter is below `limit`. Updates
    /// for the same user are serialized; the counter can neither go negative
    /// nor exceed the limit under concurrent calls.
    async fn try_consume(
        &self,
        user_id: Uuid,
        date_key: &str,
        kind: QuotaKind,
        limit: u32,
    ) -> Result<bool, StoreError>;
}
