use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;
use validator::{Validate, ValidationError};

use attune_shared::errors::{AppError, AppResult, ErrorCode};
use attune_shared::types::auth::AuthUser;
use attune_shared::types::ApiResponse;

use crate::matching::profile::{
    AttachmentStyle, BigFive, ConflictStyle, CommunicationFrequency, AffectionLevel,
    DiscoveryProfile, FinancialAttitude, Gender, LoveLanguage, PersonalityType,
    RelationshipGoal, SeekingGender, SeekingPreference,
};
use crate::store::ProfileStore;
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
#[validate(schema(function = "validate_profile_request"))]
pub struct UpsertProfileRequest {
    #[validate(range(min = 18, max = 120))]
    pub age: i32,
    pub gender: Gender,
    pub seeking_gender: SeekingGender,
    #[validate(range(min = 18, max = 120))]
    pub seeking_age_min: i32,
    #[validate(range(min = 18, max = 120))]
    pub seeking_age_max: i32,
    pub attachment_style: Option<AttachmentStyle>,
    pub personality_type: Option<PersonalityType>,
    #[serde(default)]
    #[validate(length(max = 5))]
    pub love_languages: Vec<LoveLanguage>,
    #[serde(default)]
    #[validate(length(max = 20))]
    pub values: Vec<String>,
    #[validate(custom = "validate_big_five")]
    pub big_five: Option<BigFive>,
    pub conflict_style: Option<ConflictStyle>,
    pub communication_frequency: Option<CommunicationFrequency>,
    pub affection_level: Option<AffectionLevel>,
    pub financial_attitude: Option<FinancialAttitude>,
    pub relationship_goal: Option<RelationshipGoal>,
    #[serde(default)]
    #[validate(range(min = -840, max = 840))]
    pub utc_offset_minutes: i32,
}

fn validate_profile_request(req: &UpsertProfileRequest) -> Result<(), ValidationError> {
    if req.seeking_age_min > req.seeking_age_max {
        return Err(ValidationError::new("seeking_age_range_inverted"));
    }
    let mut seen = std::collections::HashSet::new();
    if !req.love_languages.iter().all(|l| seen.insert(*l)) {
        return Err(ValidationError::new("duplicate_love_language"));
    }
    Ok(())
}

fn validate_big_five(scores: &BigFive) -> Result<(), ValidationError> {
    let in_range = scores
        .as_vector()
        .iter()
        .all(|v| (0.0..=100.0).contains(v));
    if in_range {
        Ok(())
    } else {
        Err(ValidationError::new("big_five_out_of_range"))
    }
}

impl UpsertProfileRequest {
    fn into_profile(self, user_id: uuid::Uuid) -> DiscoveryProfile {
        DiscoveryProfile {
            user_id,
            age: self.age,
            gender: self.gender,
            seeking: SeekingPreference {
                gender: self.seeking_gender,
                age_min: self.seeking_age_min,
                age_max: self.seeking_age_max,
            },
            attachment_style: self.attachment_style,
            personality_type: self.personality_type,
            love_languages: self.love_languages,
            values: self.values.into_iter().collect(),
            big_five: self.big_five,
            conflict_style: self.conflict_style,
            communication_frequency: self.communication_frequency,
            affection_level: self.affection_level,
            financial_attitude: self.financial_attitude,
            relationship_goal: self.relationship_goal,
            utc_offset_minutes: self.utc_offset_minutes,
        }
    }
}

/// GET /me/profile
pub async fn get_profile(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ApiResponse<DiscoveryProfile>>> {
    let profile = state
        .profiles
        .get(user.id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ProfileNotFound, "profile not found"))?;

    Ok(Json(ApiResponse::ok(profile)))
}

/// PUT /me/profile - full upsert, used at signup and on every edit or
/// assessment retake coming through the API.
pub async fn upsert_profile(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(req): Json<UpsertProfileRequest>,
) -> AppResult<Json<ApiResponse<DiscoveryProfile>>> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let profile = req.into_profile(user.id);
    state.profiles.upsert(&profile).await?;

    tracing::info!(user_id = %user.id, "profile upserted");
    Ok(Json(ApiResponse::ok(profile)))
}
