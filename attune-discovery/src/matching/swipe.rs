use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use attune_shared::errors::{AppError, AppResult, ErrorCode};

use super::quota::{ConsumeOutcome, QuotaKind, QuotaManager, QuotaStatus};
use super::scorer;
use crate::store::{MatchInsert, ProfileStore, SwipeStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeAction {
    Like,
    Pass,
    Superlike,
}

impl SwipeAction {
    pub fn is_positive(&self) -> bool {
        matches!(self, SwipeAction::Like | SwipeAction::Superlike)
    }

    /// Which daily allotment the action draws from; passes are free.
    pub fn quota_kind(&self) -> Option<QuotaKind> {
        match self {
            SwipeAction::Like => Some(QuotaKind::Like),
            SwipeAction::Superlike => Some(QuotaKind::Superlike),
            SwipeAction::Pass => None,
        }
    }
}

impl std::fmt::Display for SwipeAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SwipeAction::Like => write!(f, "like"),
            SwipeAction::Pass => write!(f, "pass"),
            SwipeAction::Superlike => write!(f, "superlike"),
        }
    }
}

impl std::str::FromStr for SwipeAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "like" => Ok(SwipeAction::Like),
            "pass" => Ok(SwipeAction::Pass),
            "superlike" => Ok(SwipeAction::Superlike),
            _ => Err(format!("unknown swipe action: {s}")),
        }
    }
}

/// One directional action. At most one record exists per ordered
/// (actor, target) pair; a later action supersedes the stored one in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SwipeRecord {
    pub actor_id: Uuid,
    pub target_id: Uuid,
    pub action: SwipeAction,
    /// Set once the record has been consumed by a match.
    pub matched: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A mutual positive swipe. Created exactly once per unordered pair and
/// immutable afterwards; `id` doubles as the conversation key for the
/// external chat service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchRecord {
    pub id: Uuid,
    pub user_a_id: Uuid,
    pub user_b_id: Uuid,
    pub compatibility_score: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// Canonical ordering for the unordered pair key.
pub fn pair_key(a: Uuid, b: Uuid) -> (Uuid, Uuid) {
    if a < b { (a, b) } else { (b, a) }
}

#[derive(Debug, Clone)]
pub enum SwipeOutcome {
    Recorded {
        swipe: SwipeRecord,
        /// Present when this swipe completed a mutual match; carries the
        /// existing record (with `created: false`) on idempotent retries.
        matched: Option<MatchInsert>,
    },
    QuotaExhausted {
        status: QuotaStatus,
    },
}

/// Swipe recording and match detection over the injected stores.
///
/// Designed idempotent-by-construction: clients resend swipes after
/// timeouts, so replays must converge on the same state instead of being
/// deduplicated by the caller.
#[derive(Clone)]
pub struct SwipeService {
    profiles: Arc<dyn ProfileStore>,
    swipes: Arc<dyn SwipeStore>,
    quota: QuotaManager,
}

impl SwipeService {
    pub fn new(
        profiles: Arc<dyn ProfileStore>,
        swipes: Arc<dyn SwipeStore>,
        quota: QuotaManager,
    ) -> Self {
        Self {
            profiles,
            swipes,
            quota,
        }
    }

    /// Record a swipe from `actor_id` toward `target_id`.
    ///
    /// Validation happens before any state mutation. Quota is consumed
    /// before the record is written, so an exhausted user changes nothing.
    /// Match detection only runs for positive actions; a pass never matches
    /// regardless of what the other side has recorded.
    pub async fn record_swipe(
        &self,
        actor_id: Uuid,
        target_id: Uuid,
        action: SwipeAction,
        unlimited: bool,
    ) -> AppResult<SwipeOutcome> {
        if actor_id == target_id {
            return Err(AppError::new(
                ErrorCode::SelfSwipe,
                "cannot swipe on yourself",
            ));
        }

        let actor = self
            .profiles
            .get(actor_id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::ProfileNotFound, "profile not found"))?;

        let target = self
            .profiles
            .get(target_id)
            .await?
            .ok_or_else(|| {
                AppError::new(ErrorCode::SwipeTargetNotFound, "swipe target not found")
            })?;

        if let Some(kind) = action.quota_kind() {
            let outcome = self
                .quota
                .consume(actor_id, actor.utc_offset_minutes, kind, unlimited)
                .await?;
            if outcome == ConsumeOutcome::Exhausted {
                let status = self
                    .quota
                    .check_and_reset(actor_id, actor.utc_offset_minutes, unlimited)
                    .await?;
                return Ok(SwipeOutcome::QuotaExhausted { status });
            }
        }

        let swipe = self.swipes.upsert_swipe(actor_id, target_id, action).await?;

        let matched = if action.is_positive() {
            self.detect_match(&actor, &target).await?
        } else {
            None
        };

        tracing::info!(
            actor_id = %actor_id,
            target_id = %target_id,
            action = %action,
            is_match = matched.is_some(),
            "swipe recorded"
        );

        Ok(SwipeOutcome::Recorded { swipe, matched })
    }

    /// Check the reciprocal record and find-or-create the match. The store
    /// serializes creation on the unordered pair key, so two sides racing
    /// through here still end up with exactly one match row.
    async fn detect_match(
        &self,
        actor: &super::profile::DiscoveryProfile,
        target: &super::profile::DiscoveryProfile,
    ) -> AppResult<Option<MatchInsert>> {
        let reciprocal = self
            .swipes
            .get_swipe(target.user_id, actor.user_id)
            .await?;

        match reciprocal {
            Some(record) if record.action.is_positive() => {
                let score = scorer::score(actor, target).map(|s| s.total);
                let insert = self
                    .swipes
                    .create_match(actor.user_id, target.user_id, score)
                    .await?;
                if insert.created {
                    tracing::info!(
                        match_id = %insert.record.id,
                        user_a_id = %insert.record.user_a_id,
                        user_b_id = %insert.record.user_b_id,
                        "match created"
                    );
                }
                Ok(Some(insert))
            }
            _ => Ok(None),
        }
    }

    pub async fn matches_for(&self, user_id: Uuid) -> AppResult<Vec<MatchRecord>> {
        Ok(self.swipes.matches_for(user_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::profile::*;
    use crate::matching::quota::QuotaLimits;
    use crate::store::memory::MemoryStore;
    use std::collections::BTreeSet;

    fn profile(n: u128) -> DiscoveryProfile {
        DiscoveryProfile {
            user_id: Uuid::from_u128(n),
            age: 30,
            gender: Gender::Female,
            seeking: SeekingPreference {
                gender: SeekingGender::Everyone,
                age_min: 18,
                age_max: 99,
            },
            attachment_style: Some(AttachmentStyle::Secure),
            personality_type: None,
            love_languages: vec![],
            values: BTreeSet::new(),
            big_five: None,
            conflict_style: None,
            communication_frequency: None,
            affection_level: None,
            financial_attitude: None,
            relationship_goal: None,
            utc_offset_minutes: 0,
        }
    }

    async fn service_with_users(ids: &[u128]) -> (SwipeService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        for &id in ids {
            crate::store::ProfileStore::upsert(store.as_ref(), &profile(id))
                .await
                .unwrap();
        }
        let quota = QuotaManager::new(
            store.clone(),
            QuotaLimits {
                daily_likes: 10,
                daily_superlikes: 3,
            },
        );
        (
            SwipeService::new(store.clone(), store.clone(), quota),
            store,
        )
    }

    fn assert_recorded(outcome: &SwipeOutcome) -> (&SwipeRecord, &Option<MatchInsert>) {
        match outcome {
            SwipeOutcome::Recorded { swipe, matched } => (swipe, matched),
            SwipeOutcome::QuotaExhausted { .. } => panic!("unexpected quota exhaustion"),
        }
    }

    #[tokio::test]
    async fn self_swipe_is_rejected() {
        let (svc, _) = service_with_users(&[1]).await;
        let err = svc
            .record_swipe(Uuid::from_u128(1), Uuid::from_u128(1), SwipeAction::Like, false)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Known { code: ErrorCode::SelfSwipe, .. }
        ));
    }

    #[tokio::test]
    async fn unknown_target_is_rejected() {
        let (svc, _) = service_with_users(&[1]).await;
        let err = svc
            .record_swipe(Uuid::from_u128(1), Uuid::from_u128(42), SwipeAction::Like, false)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Known { code: ErrorCode::SwipeTargetNotFound, .. }
        ));
    }

    #[tokio::test]
    async fn one_sided_like_does_not_match() {
        let (svc, _) = service_with_users(&[1, 2]).await;
        let out = svc
            .record_swipe(Uuid::from_u128(1), Uuid::from_u128(2), SwipeAction::Like, false)
            .await
            .unwrap();
        let (swipe, matched) = assert_recorded(&out);
        assert_eq!(swipe.action, SwipeAction::Like);
        assert!(matched.is_none());
    }

    #[tokio::test]
    async fn reciprocal_likes_create_exactly_one_match() {
        let (svc, store) = service_with_users(&[1, 2]).await;
        let a = Uuid::from_u128(1);
        let b = Uuid::from_u128(2);

        let out = svc.record_swipe(a, b, SwipeAction::Like, false).await.unwrap();
        assert!(assert_recorded(&out).1.is_none());

        let out = svc.record_swipe(b, a, SwipeAction::Like, false).await.unwrap();
        let matched = assert_recorded(&out).1.clone().expect("match expected");
        assert!(matched.created);

        // both swipe records were consumed
        let sa = store.get_swipe(a, b).await.unwrap().unwrap();
        let sb = store.get_swipe(b, a).await.unwrap().unwrap();
        assert!(sa.matched && sb.matched);

        // scores were captured at match time (secure/secure = 95)
        assert_eq!(matched.record.compatibility_score, Some(95));
    }

    #[tokio::test]
    async fn retried_swipes_return_the_same_match() {
        let (svc, _) = service_with_users(&[1, 2]).await;
        let a = Uuid::from_u128(1);
        let b = Uuid::from_u128(2);

        svc.record_swipe(a, b, SwipeAction::Like, false).await.unwrap();
        let first = svc.record_swipe(b, a, SwipeAction::Like, false).await.unwrap();
        let first_id = assert_recorded(&first).1.clone().unwrap().record.id;

        // the client times out and replays both calls
        let retry_a = svc.record_swipe(a, b, SwipeAction::Like, false).await.unwrap();
        let retry_b = svc.record_swipe(b, a, SwipeAction::Like, false).await.unwrap();
        let ra = assert_recorded(&retry_a).1.clone().unwrap();
        let rb = assert_recorded(&retry_b).1.clone().unwrap();
        assert_eq!(ra.record.id, first_id);
        assert_eq!(rb.record.id, first_id);
        assert!(!ra.created && !rb.created);

        let matches = svc.matches_for(a).await.unwrap();
        assert_eq!(matches.len(), 1);
    }

    #[tokio::test]
    async fn pass_suppresses_match_in_either_order() {
        let (svc, _) = service_with_users(&[1, 2, 3, 4]).await;
        let a = Uuid::from_u128(1);
        let b = Uuid::from_u128(2);

        svc.record_swipe(a, b, SwipeAction::Like, false).await.unwrap();
        let out = svc.record_swipe(b, a, SwipeAction::Pass, false).await.unwrap();
        assert!(assert_recorded(&out).1.is_none());

        // opposite order
        let c = Uuid::from_u128(3);
        let d = Uuid::from_u128(4);
        svc.record_swipe(c, d, SwipeAction::Pass, false).await.unwrap();
        let out = svc.record_swipe(d, c, SwipeAction::Like, false).await.unwrap();
        assert!(assert_recorded(&out).1.is_none());
    }

    #[tokio::test]
    async fn later_action_supersedes_without_duplicating() {
        let (svc, store) = service_with_users(&[1, 2]).await;
        let a = Uuid::from_u128(1);
        let b = Uuid::from_u128(2);

        svc.record_swipe(a, b, SwipeAction::Like, false).await.unwrap();
        svc.record_swipe(a, b, SwipeAction::Pass, false).await.unwrap();

        let stored = store.get_swipe(a, b).await.unwrap().unwrap();
        assert_eq!(stored.action, SwipeAction::Pass);
        assert!(store.seen_target_ids(a).await.unwrap().len() == 1);
    }

    #[tokio::test]
    async fn pass_then_changed_mind_still_matches() {
        // The stored pass suppresses matching only while it is current; a
        // later like from the same actor re-evaluates.
        let (svc, _) = service_with_users(&[1, 2]).await;
        let a = Uuid::from_u128(1);
        let b = Uuid::from_u128(2);

        svc.record_swipe(a, b, SwipeAction::Like, false).await.unwrap();
        svc.record_swipe(b, a, SwipeAction::Pass, false).await.unwrap();
        let out = svc.record_swipe(b, a, SwipeAction::Like, false).await.unwrap();
        assert!(assert_recorded(&out).1.is_some());
    }

    #[tokio::test]
    async fn superlike_matches_against_like() {
        let (svc, _) = service_with_users(&[1, 2]).await;
        let a = Uuid::from_u128(1);
        let b = Uuid::from_u128(2);

        svc.record_swipe(a, b, SwipeAction::Superlike, false).await.unwrap();
        let out = svc.record_swipe(b, a, SwipeAction::Like, false).await.unwrap();
        assert!(assert_recorded(&out).1.is_some());
    }

    #[tokio::test]
    async fn exhausted_quota_blocks_the_swipe() {
        let (svc, store) = service_with_users(&[1, 2]).await;
        let a = Uuid::from_u128(1);
        let b = Uuid::from_u128(2);

        // burn the whole daily allotment on other targets
        for n in 100..110u128 {
            crate::store::ProfileStore::upsert(store.as_ref(), &profile(n))
                .await
                .unwrap();
            let out = svc
                .record_swipe(a, Uuid::from_u128(n), SwipeAction::Like, false)
                .await
                .unwrap();
            assert_recorded(&out);
        }

        let out = svc.record_swipe(a, b, SwipeAction::Like, false).await.unwrap();
        match out {
            SwipeOutcome::QuotaExhausted { status } => {
                assert_eq!(status.likes_remaining, Some(0));
            }
            SwipeOutcome::Recorded { .. } => panic!("expected exhaustion"),
        }

        // nothing was recorded for the blocked swipe
        assert!(store.get_swipe(a, b).await.unwrap().is_none());

        // passes are still free, and unlimited users are unaffected
        assert_recorded(
            &svc.record_swipe(a, b, SwipeAction::Pass, false).await.unwrap(),
        );
        assert_recorded(
            &svc.record_swipe(a, b, SwipeAction::Like, true).await.unwrap(),
        );
    }
}
