use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::{QuotaStore, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuotaKind {
    Like,
    Superlike,
}

impl std::fmt::Display for QuotaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuotaKind::Like => write!(f, "like"),
            QuotaKind::Superlike => write!(f, "superlike"),
        }
    }
}

/// Raw counters read back from the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuotaUsage {
    pub likes_used: u32,
    pub superlikes_used: u32,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct QuotaLimits {
    pub daily_likes: u32,
    pub daily_superlikes: u32,
}

/// Remaining allotment for the current date key. `None` remaining means the
/// user is on the unlimited tier and is never decremented.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuotaStatus {
    pub date_key: String,
    pub likes_remaining: Option<u32>,
    pub superlikes_remaining: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsumeOutcome {
    Granted,
    /// First-class result, not an error: callers branch to the upsell flow.
    Exhausted,
}

/// Calendar day at the user's reference timezone. A new key simply reads as
/// zero usage, so rollover needs no scheduled job.
pub fn date_key(now: DateTime<Utc>, utc_offset_minutes: i32) -> String {
    let offset = FixedOffset::east_opt(utc_offset_minutes * 60)
        .unwrap_or_else(|| FixedOffset::east_opt(0).expect("zero offset is valid"));
    now.with_timezone(&offset).format("%Y-%m-%d").to_string()
}

/// Stateless manager over the quota store; all state lives behind the store
/// so the service scales horizontally.
#[derive(Clone)]
pub struct QuotaManager {
    store: Arc<dyn QuotaStore>,
    limits: QuotaLimits,
}

impl QuotaManager {
    pub fn new(store: Arc<dyn QuotaStore>, limits: QuotaLimits) -> Self {
        Self { store, limits }
    }

    pub fn limits(&self) -> QuotaLimits {
        self.limits
    }

    pub async fn check_and_reset(
        &self,
        user_id: Uuid,
        utc_offset_minutes: i32,
        unlimited: bool,
    ) -> Result<QuotaStatus, StoreError> {
        self.check_and_reset_at(Utc::now(), user_id, utc_offset_minutes, unlimited)
            .await
    }

    pub async fn check_and_reset_at(
        &self,
        now: DateTime<Utc>,
        user_id: Uuid,
        utc_offset_minutes: i32,
        unlimited: bool,
    ) -> Result<QuotaStatus, StoreError> {
        let key = date_key(now, utc_offset_minutes);
        if unlimited {
            return Ok(QuotaStatus {
                date_key: key,
                likes_remaining: None,
                superlikes_remaining: None,
            });
        }

        let usage = self.store.usage(user_id, &key).await?;
        Ok(QuotaStatus {
            likes_remaining: Some(self.limits.daily_likes.saturating_sub(usage.likes_used)),
            superlikes_remaining: Some(
                self.limits
                    .daily_superlikes
                    .saturating_sub(usage.superlikes_used),
            ),
            date_key: key,
        })
    }

    /// Consume one unit of the given kind. Unlimited-tier users bypass the
    /// store entirely; the tier itself is decided upstream and only passed
    /// in here.
    pub async fn consume(
        &self,
        user_id: Uuid,
        utc_offset_minutes: i32,
        kind: QuotaKind,
        unlimited: bool,
    ) -> Result<ConsumeOutcome, StoreError> {
        self.consume_at(Utc::now(), user_id, utc_offset_minutes, kind, unlimited)
            .await
    }

    pub async fn consume_at(
        &self,
        now: DateTime<Utc>,
        user_id: Uuid,
        utc_offset_minutes: i32,
        kind: QuotaKind,
        unlimited: bool,
    ) -> Result<ConsumeOutcome, StoreError> {
        if unlimited {
            return Ok(ConsumeOutcome::Granted);
        }

        let key = date_key(now, utc_offset_minutes);
        let limit = match kind {
            QuotaKind::Like => self.limits.daily_likes,
            QuotaKind::Superlike => self.limits.daily_superlikes,
        };

        if self.store.try_consume(user_id, &key, kind, limit).await? {
            Ok(ConsumeOutcome::Granted)
        } else {
            tracing::debug!(user_id = %user_id, kind = %kind, date_key = %key, "quota exhausted");
            Ok(ConsumeOutcome::Exhausted)
        }
    }
}
