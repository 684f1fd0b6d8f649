use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use attune_shared::clients::db::DbPool;

use crate::matching::profile::DiscoveryProfile;
use crate::matching::swipe::{pair_key, MatchRecord, SwipeAction, SwipeRecord};
use crate::models::{MatchRow, NewMatchRow, NewSwipeRow, ProfileRow, SwipeRow, UpsertProfileRow};
use crate::schema::{discovery_profiles, matches, swipes};

use super::{MatchInsert, ProfileStore, StoreError, SwipeStore};

/// Durable store for profiles, swipes, and matches.
///
/// Uniqueness is enforced by the database: one swipe row per ordered
/// (actor_id, target_id) and one match row per ordered (user_a_id,
/// user_b_id) pair, so concurrent writers serialize on the constraints.
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(
        &self,
    ) -> Result<
        diesel::r2d2::PooledConnection<diesel::r2d2::ConnectionManager<diesel::PgConnection>>,
        StoreError,
    > {
        self.pool.get().map_err(|e| StoreError::Pool(e.to_string()))
    }
}

#[async_trait]
impl ProfileStore for PgStore {
    async fn get(&self, user_id: Uuid) -> Result<Option<DiscoveryProfile>, StoreError> {
        let mut conn = self.conn()?;
        let row = discovery_profiles::table
            .find(user_id)
            .first::<ProfileRow>(&mut conn)
            .optional()?;
        row.map(DiscoveryProfile::try_from).transpose()
    }

    async fn upsert(&self, profile: &DiscoveryProfile) -> Result<(), StoreError> {
        let mut conn = self.conn()?;
        let row = UpsertProfileRow::from_profile(profile)?;
        diesel::insert_into(discovery_profiles::table)
            .values(&row)
            .on_conflict(discovery_profiles::user_id)
            .do_update()
            .set(&row)
            .execute(&mut conn)?;
        Ok(())
    }

    async fn candidate_pool(
        &self,
        viewer_id: Uuid,
        limit: i64,
    ) -> Result<Vec<DiscoveryProfile>, StoreError> {
        let mut conn = self.conn()?;
        let rows = discovery_profiles::table
            .filter(discovery_profiles::user_id.ne(viewer_id))
            .order(discovery_profiles::user_id.asc())
            .limit(limit)
            .load::<ProfileRow>(&mut conn)?;
        rows.into_iter()
            .map(DiscoveryProfile::try_from)
            .collect()
    }
}

#[async_trait]
impl SwipeStore for PgStore {
    async fn upsert_swipe(
        &self,
        actor_id: Uuid,
        target_id: Uuid,
        action: SwipeAction,
    ) -> Result<SwipeRecord, StoreError> {
        let mut conn = self.conn()?;
        let row = diesel::insert_into(swipes::table)
            .values(&NewSwipeRow {
                actor_id,
                target_id,
                action: action.to_string(),
            })
            .on_conflict((swipes::actor_id, swipes::target_id))
            .do_update()
            .set((
                swipes::action.eq(action.to_string()),
                swipes::updated_at.eq(Utc::now()),
            ))
            .get_result::<SwipeRow>(&mut conn)?;
        SwipeRecord::try_from(row)
    }

    async fn get_swipe(
        &self,
        actor_id: Uuid,
        target_id: Uuid,
    ) -> Result<Option<SwipeRecord>, StoreError> {
        let mut conn = self.conn()?;
        let row = swipes::table
            .filter(swipes::actor_id.eq(actor_id))
            .filter(swipes::target_id.eq(target_id))
            .first::<SwipeRow>(&mut conn)
            .optional()?;
        row.map(SwipeRecord::try_from).transpose()
    }

    async fn seen_target_ids(&self, actor_id: Uuid) -> Result<Vec<Uuid>, StoreError> {
        let mut conn = self.conn()?;
        Ok(swipes::table
            .filter(swipes::actor_id.eq(actor_id))
            .select(swipes::target_id)
            .load::<Uuid>(&mut conn)?)
    }

    async fn create_match(
        &self,
        user_a: Uuid,
        user_b: Uuid,
        compatibility_score: Option<i32>,
    ) -> Result<MatchInsert, StoreError> {
        let mut conn = self.conn()?;
        let (lo, hi) = pair_key(user_a, user_b);

        let result = conn.transaction::<(MatchRow, bool), diesel::result::Error, _>(|conn| {
            let inserted = diesel::insert_into(matches::table)
                .values(&NewMatchRow {
                    user_a_id: lo,
                    user_b_id: hi,
                    compatibility_score,
                })
                .on_conflict((matches::user_a_id, matches::user_b_id))
                .do_nothing()
                .get_result::<MatchRow>(conn)
                .optional()?;

            match inserted {
                Some(row) => {
                    // consume both directions in the same transaction
                    diesel::update(
                        swipes::table.filter(
                            swipes::actor_id
                                .eq(lo)
                                .and(swipes::target_id.eq(hi))
                                .or(swipes::actor_id.eq(hi).and(swipes::target_id.eq(lo))),
                        ),
                    )
                    .set(swipes::matched.eq(true))
                    .execute(conn)?;
                    Ok((row, true))
                }
                None => {
                    let row = matches::table
                        .filter(matches::user_a_id.eq(lo))
                        .filter(matches::user_b_id.eq(hi))
                        .first::<MatchRow>(conn)?;
                    Ok((row, false))
                }
            }
        })?;

        Ok(MatchInsert {
            record: result.0.into(),
            created: result.1,
        })
    }

    async fn get_match(
        &self,
        user_a: Uuid,
        user_b: Uuid,
    ) -> Result<Option<MatchRecord>, StoreError> {
        let mut conn = self.conn()?;
        let (lo, hi) = pair_key(user_a, user_b);
        let row = matches::table
            .filter(matches::user_a_id.eq(lo))
            .filter(matches::user_b_id.eq(hi))
            .first::<MatchRow>(&mut conn)
            .optional()?;
        Ok(row.map(MatchRecord::from))
    }

    async fn matches_for(&self, user_id: Uuid) -> Result<Vec<MatchRecord>, StoreError> {
        let mut conn = self.conn()?;
        let rows = matches::table
            .filter(
                matches::user_a_id
                    .eq(user_id)
                    .or(matches::user_b_id.eq(user_id)),
            )
            .order(matches::created_at.desc())
            .load::<MatchRow>(&mut conn)?;
        Ok(rows.into_iter().map(MatchRecord::from).collect())
    }
}
