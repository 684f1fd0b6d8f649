use std::str::FromStr;

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::matching::profile::{
    DiscoveryProfile, Gender, SeekingGender, SeekingPreference,
};
use crate::matching::swipe::{MatchRecord, SwipeAction, SwipeRecord};
use crate::schema::{discovery_profiles, matches, swipes};
use crate::store::StoreError;

// --- DiscoveryProfile ---

#[derive(Debug, Queryable, Identifiable, Clone)]
#[diesel(table_name = discovery_profiles, primary_key(user_id))]
pub struct ProfileRow {
    pub user_id: Uuid,
    pub age: i32,
    pub gender: String,
    pub seeking_gender: String,
    pub seeking_age_min: i32,
    pub seeking_age_max: i32,
    pub attachment_style: Option<String>,
    pub personality_type: Option<String>,
    pub love_languages: serde_json::Value,
    pub values: serde_json::Value,
    pub big_five: Option<serde_json::Value>,
    pub conflict_style: Option<String>,
    pub communication_frequency: Option<String>,
    pub affection_level: Option<String>,
    pub financial_attitude: Option<String>,
    pub relationship_goal: Option<String>,
    pub utc_offset_minutes: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Full-row upsert payload. `treat_none_as_null` so clearing a dimension in
/// the domain actually clears the column instead of silently keeping the old
/// value.
#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = discovery_profiles, treat_none_as_null = true)]
pub struct UpsertProfileRow {
    pub user_id: Uuid,
    pub age: i32,
    pub gender: String,
    pub seeking_gender: String,
    pub seeking_age_min: i32,
    pub seeking_age_max: i32,
    pub attachment_style: Option<String>,
    pub personality_type: Option<String>,
    pub love_languages: serde_json::Value,
    pub values: serde_json::Value,
    pub big_five: Option<serde_json::Value>,
    pub conflict_style: Option<String>,
    pub communication_frequency: Option<String>,
    pub affection_level: Option<String>,
    pub financial_attitude: Option<String>,
    pub relationship_goal: Option<String>,
    pub utc_offset_minutes: i32,
    pub updated_at: DateTime<Utc>,
}

/// Parse an optional stored dimension. Unknown values (left behind by an
/// older or newer deploy) degrade to absence rather than failing the row.
fn parse_dimension<T: FromStr>(field: &'static str, value: Option<&String>) -> Option<T> {
    let raw = value?;
    match raw.parse::<T>() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            tracing::warn!(field, value = %raw, "unrecognized profile dimension, treating as unset");
            None
        }
    }
}

fn from_json<T: DeserializeOwned>(field: &'static str, value: serde_json::Value) -> Result<T, StoreError> {
    serde_json::from_value(value)
        .map_err(|e| StoreError::Corrupt(format!("{field}: {e}")))
}

fn to_json<T: Serialize>(field: &'static str, value: &T) -> Result<serde_json::Value, StoreError> {
    serde_json::to_value(value)
        .map_err(|e| StoreError::Corrupt(format!("{field}: {e}")))
}

impl TryFrom<ProfileRow> for DiscoveryProfile {
    type Error = StoreError;

    fn try_from(row: ProfileRow) -> Result<Self, StoreError> {
        let gender = row
            .gender
            .parse::<Gender>()
            .map_err(StoreError::Corrupt)?;
        let seeking_gender = row
            .seeking_gender
            .parse::<SeekingGender>()
            .map_err(StoreError::Corrupt)?;

        Ok(DiscoveryProfile {
            user_id: row.user_id,
            age: row.age,
            gender,
            seeking: SeekingPreference {
                gender: seeking_gender,
                age_min: row.seeking_age_min,
                age_max: row.seeking_age_max,
            },
            attachment_style: parse_dimension("attachment_style", row.attachment_style.as_ref()),
            personality_type: parse_dimension("personality_type", row.personality_type.as_ref()),
            love_languages: from_json("love_languages", row.love_languages)?,
            values: from_json("values", row.values)?,
            big_five: row
                .big_five
                .map(|v| from_json("big_five", v))
                .transpose()?,
            conflict_style: parse_dimension("conflict_style", row.conflict_style.as_ref()),
            communication_frequency: parse_dimension(
                "communication_frequency",
                row.communication_frequency.as_ref(),
            ),
            affection_level: parse_dimension("affection_level", row.affection_level.as_ref()),
            financial_attitude: parse_dimension("financial_attitude", row.financial_attitude.as_ref()),
            relationship_goal: parse_dimension("relationship_goal", row.relationship_goal.as_ref()),
            utc_offset_minutes: row.utc_offset_minutes,
        })
    }
}

impl UpsertProfileRow {
    pub fn from_profile(profile: &DiscoveryProfile) -> Result<Self, StoreError> {
        Ok(Self {
            user_id: profile.user_id,
            age: profile.age,
            gender: profile.gender.to_string(),
            seeking_gender: profile.seeking.gender.to_string(),
            seeking_age_min: profile.seeking.age_min,
            seeking_age_max: profile.seeking.age_max,
            attachment_style: profile.attachment_style.map(|v| v.to_string()),
            personality_type: profile.personality_type.map(|v| v.to_string()),
            love_languages: to_json("love_languages", &profile.love_languages)?,
            values: to_json("values", &profile.values)?,
            big_five: profile
                .big_five
                .as_ref()
                .map(|v| to_json("big_five", v))
                .transpose()?,
            conflict_style: profile.conflict_style.map(|v| v.to_string()),
            communication_frequency: profile.communication_frequency.map(|v| v.to_string()),
            affection_level: profile.affection_level.map(|v| v.to_string()),
            financial_attitude: profile.financial_attitude.map(|v| v.to_string()),
            relationship_goal: profile.relationship_goal.map(|v| v.to_string()),
            utc_offset_minutes: profile.utc_offset_minutes,
            updated_at: Utc::now(),
        })
    }
}

// --- Swipe ---

#[derive(Debug, Queryable, Identifiable, Clone)]
#[diesel(table_name = swipes)]
pub struct SwipeRow {
    pub id: Uuid,
    pub actor_id: Uuid,
    pub target_id: Uuid,
    pub action: String,
    pub matched: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = swipes)]
pub struct NewSwipeRow {
    pub actor_id: Uuid,
    pub target_id: Uuid,
    pub action: String,
}

impl TryFrom<SwipeRow> for SwipeRecord {
    type Error = StoreError;

    fn try_from(row: SwipeRow) -> Result<Self, StoreError> {
        let action = row
            .action
            .parse::<SwipeAction>()
            .map_err(StoreError::Corrupt)?;
        Ok(SwipeRecord {
            actor_id: row.actor_id,
            target_id: row.target_id,
            action,
            matched: row.matched,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

// --- Match ---

#[derive(Debug, Queryable, Identifiable, Clone)]
#[diesel(table_name = matches)]
pub struct MatchRow {
    pub id: Uuid,
    pub user_a_id: Uuid,
    pub user_b_id: Uuid,
    pub compatibility_score: Option<i32>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = matches)]
pub struct NewMatchRow {
    pub user_a_id: Uuid,
    pub user_b_id: Uuid,
    pub compatibility_score: Option<i32>,
}

impl From<MatchRow> for MatchRecord {
    fn from(row: MatchRow) -> Self {
        MatchRecord {
            id: row.id,
            user_a_id: row.user_a_id,
            user_b_id: row.user_b_id,
            compatibility_score: row.compatibility_score,
            created_at: row.created_at,
        }
    }
}
