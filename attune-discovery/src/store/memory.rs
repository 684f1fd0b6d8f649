use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::matching::profile::DiscoveryProfile;
use crate::matching::quota::{QuotaKind, QuotaUsage};
use crate::matching::swipe::{pair_key, MatchRecord, SwipeAction, SwipeRecord};

use super::{MatchInsert, ProfileStore, QuotaStore, StoreError, SwipeStore};

#[derive(Default)]
struct Interactions {
    swipes: HashMap<(Uuid, Uuid), SwipeRecord>,
    matches: HashMap<(Uuid, Uuid), MatchRecord>,
}

#[derive(Default)]
struct QuotaEntry {
    date_key: String,
    likes_used: u32,
    superlikes_used: u32,
}

/// In-memory backend for local development and the test suites.
///
/// Swipes and matches live behind a single mutex so that the reciprocal
/// check and the match find-or-create serialize per process, matching the
/// unordered-pair uniqueness the Postgres backend gets from its constraint.
/// Quota entries serialize the same way per user.
#[derive(Default)]
pub struct MemoryStore {
    profiles: Mutex<HashMap<Uuid, DiscoveryProfile>>,
    interactions: Mutex<Interactions>,
    quotas: Mutex<HashMap<Uuid, QuotaEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn get(&self, user_id: Uuid) -> Result<Option<DiscoveryProfile>, StoreError> {
        let profiles = self.profiles.lock().expect("profiles lock poisoned");
        Ok(profiles.get(&user_id).cloned())
    }

    async fn upsert(&self, profile: &DiscoveryProfile) -> Result<(), StoreError> {
        let mut profiles = self.profiles.lock().expect("profiles lock poisoned");
        profiles.insert(profile.user_id, profile.clone());
        Ok(())
    }

    async fn candidate_pool(
        &self,
        viewer_id: Uuid,
        limit: i64,
    ) -> Result<Vec<DiscoveryProfile>, StoreError> {
        let profiles = self.profiles.lock().expect("profiles lock poisoned");
        let mut pool: Vec<DiscoveryProfile> = profiles
            .values()
            .filter(|p| p.user_id != viewer_id)
            .cloned()
            .collect();
        // deterministic pool order regardless of map iteration
        pool.sort_by_key(|p| p.user_id);
        pool.truncate(limit.max(0) as usize);
        Ok(pool)
    }
}

#[async_trait]
impl SwipeStore for MemoryStore {
    async fn upsert_swipe(
        &self,
        actor_id: Uuid,
        target_id: Uuid,
        action: SwipeAction,
    ) -> Result<SwipeRecord, StoreError> {
        let mut state = self.interactions.lock().expect("interactions lock poisoned");
        let now = Utc::now();
        let record = state
            .swipes
            .entry((actor_id, target_id))
            .and_modify(|r| {
                r.action = action;
                r.updated_at = now;
            })
            .or_insert_with(|| SwipeRecord {
                actor_id,
                target_id,
                action,
                matched: false,
                created_at: now,
                updated_at: now,
            });
        Ok(record.clone())
    }

    async fn get_swipe(
        &self,
        actor_id: Uuid,
        target_id: Uuid,
    ) -> Result<Option<SwipeRecord>, StoreError> {
        let state = self.interactions.lock().expect("interactions lock poisoned");
        Ok(state.swipes.get(&(actor_id, target_id)).cloned())
    }

    async fn seen_target_ids(&self, actor_id: Uuid) -> Result<Vec<Uuid>, StoreError> {
        let state = self.interactions.lock().expect("interactions lock poisoned");
        Ok(state
            .swipes
            .keys()
            .filter(|(a, _)| *a == actor_id)
            .map(|(_, t)| *t)
            .collect())
    }

    async fn create_match(
        &self,
        user_a: Uuid,
        user_b: Uuid,
        compatibility_score: Option<i32>,
    ) -> Result<MatchInsert, StoreError> {
        let mut state = self.interactions.lock().expect("interactions lock poisoned");
        let key = pair_key(user_a, user_b);

        if let Some(existing) = state.matches.get(&key) {
            return Ok(MatchInsert {
                record: existing.clone(),
                created: false,
            });
        }

        let record = MatchRecord {
            id: Uuid::new_v4(),
            user_a_id: key.0,
            user_b_id: key.1,
            compatibility_score,
            created_at: Utc::now(),
        };
        state.matches.insert(key, record.clone());

        // consume both swipe records in the same atomic step
        for ordered in [(user_a, user_b), (user_b, user_a)] {
            if let Some(swipe) = state.swipes.get_mut(&ordered) {
                swipe.matched = true;
            }
        }

        Ok(MatchInsert {
            record,
            created: true,
        })
    }

    async fn get_match(
        &self,
        user_a: Uuid,
        user_b: Uuid,
    ) -> Result<Option<MatchRecord>, StoreError> {
        let state = self.interactions.lock().expect("interactions lock poisoned");
        Ok(state.matches.get(&pair_key(user_a, user_b)).cloned())
    }

    async fn matches_for(&self, user_id: Uuid) -> Result<Vec<MatchRecord>, StoreError> {
        let state = self.interactions.lock().expect("interactions lock poisoned");
        let mut matches: Vec<MatchRecord> = state
            .matches
            .values()
            .filter(|m| m.user_a_id == user_id || m.user_b_id == user_id)
            .cloned()
            .collect();
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(matches)
    }
}

#[async_trait]
impl QuotaStore for MemoryStore {
    async fn usage(&self, user_id: Uuid, date_key: &str) -> Result<QuotaUsage, StoreError> {
        let quotas = self.quotas.lock().expect("quotas lock poisoned");
        Ok(match quotas.get(&user_id) {
            Some(entry) if entry.date_key == date_key => QuotaUsage {
                likes_used: entry.likes_used,
                superlikes_used: entry.superlikes_used,
            },
            _ => QuotaUsage::default(),
        })
    }

    async fn try_consume(
        &self,
        user_id: Uuid,
        date_key: &str,
        kind: QuotaKind,
        limit: u32,
    ) -> Result<bool, StoreError> {
        let mut quotas = self.quotas.lock().expect("quotas lock poisoned");
        let entry = quotas.entry(user_id).or_default();

        // lazy day-rollover reset
        if entry.date_key != date_key {
            entry.date_key = date_key.to_string();
            entry.likes_used = 0;
            entry.superlikes_used = 0;
        }

        let counter = match kind {
            QuotaKind::Like => &mut entry.likes_used,
            QuotaKind::Superlike => &mut entry.superlikes_used,
        };
        if *counter >= limit {
            return Ok(false);
        }
        *counter += 1;
        Ok(true)
    }
}
