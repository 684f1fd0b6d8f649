use async_trait::async_trait;
use uuid::Uuid;

use attune_shared::clients::redis::RedisClient;

use crate::matching::quota::{QuotaKind, QuotaUsage};

use super::{QuotaStore, StoreError};

const QUOTA_PREFIX: &str = "discovery:quota";
// Counters only matter for the current day; two days covers every UTC offset.
const QUOTA_TTL_SECS: i64 = 172_800;

/// Daily quota counters as per-user-per-day Redis keys. A fresh date key is
/// simply a key that does not exist yet, so day rollover costs nothing.
pub struct RedisQuotaStore {
    redis: RedisClient,
}

impl RedisQuotaStore {
    pub fn new(redis: RedisClient) -> Self {
        Self { redis }
    }
}

fn quota_key(user_id: &Uuid, date_key: &str, kind: QuotaKind) -> String {
    format!("{QUOTA_PREFIX}:{user_id}:{date_key}:{kind}")
}

#[async_trait]
impl QuotaStore for RedisQuotaStore {
    async fn usage(&self, user_id: Uuid, date_key: &str) -> Result<QuotaUsage, StoreError> {
        let keys = vec![
            quota_key(&user_id, date_key, QuotaKind::Like),
            quota_key(&user_id, date_key, QuotaKind::Superlike),
        ];
        let values = self.redis.mget(&keys).await?;

        let parse = |v: Option<&String>| -> u32 {
            v.and_then(|s| s.parse::<u32>().ok()).unwrap_or(0)
        };
        Ok(QuotaUsage {
            likes_used: parse(values.first().and_then(|v| v.as_ref())),
            superlikes_used: parse(values.get(1).and_then(|v| v.as_ref())),
        })
    }

    async fn try_consume(
        &self,
        user_id: Uuid,
        date_key: &str,
        kind: QuotaKind,
        limit: u32,
    ) -> Result<bool, StoreError> {
        let key = quota_key(&user_id, date_key, kind);

        // INCR is atomic, so concurrent consumers each observe a distinct
        // count; whoever lands above the limit rolls back their own unit.
        let count = self.redis.incr(&key).await?;
        if count == 1 {
            self.redis.expire(&key, QUOTA_TTL_SECS).await?;
        }
        if count > limit as i64 {
            self.redis.decr(&key).await?;
            return Ok(false);
        }
        Ok(true)
    }
}
