use std::str::FromStr;
use std::sync::Arc;

use futures_lite::StreamExt;
use lapin::options::BasicAckOptions;

use attune_shared::types::event::{payloads, routing_keys, Event};

use crate::matching::profile::{BigFive, DiscoveryProfile};
use crate::store::ProfileStore;
use crate::AppState;

/// Listen for assessment.completed events and merge the freshly measured
/// dimensions into the discovery read model.
pub async fn listen_assessment_completed(state: Arc<AppState>) -> anyhow::Result<()> {
    let Some(rabbitmq) = &state.rabbitmq else {
        return Ok(());
    };

    let consumer = rabbitmq
        .subscribe(
            "attune-discovery.profile.assessment.completed",
            &[routing_keys::PROFILE_ASSESSMENT_COMPLETED],
        )
        .await?;

    tracing::info!("listening for profile.assessment.completed events");

    let mut consumer = consumer;
    while let Some(delivery) = consumer.next().await {
        match delivery {
            Ok(delivery) => {
                match serde_json::from_slice::<Event<payloads::AssessmentCompleted>>(&delivery.data)
                {
                    Ok(event) => {
                        let data = &event.data;
                        match state.profiles.get(data.user_id).await {
                            Ok(Some(mut profile)) => {
                                apply_assessment(&mut profile, data);
                                if let Err(e) = state.profiles.upsert(&profile).await {
                                    tracing::error!(
                                        error = %e,
                                        user_id = %data.user_id,
                                        "failed to store assessment results"
                                    );
                                } else {
                                    tracing::info!(
                                        user_id = %data.user_id,
                                        "assessment results merged into profile"
                                    );
                                }
                            }
                            Ok(None) => {
                                tracing::warn!(
                                    user_id = %data.user_id,
                                    "assessment completed for unknown profile, skipping"
                                );
                            }
                            Err(e) => {
                                tracing::error!(
                                    error = %e,
                                    user_id = %data.user_id,
                                    "failed to load profile for assessment merge"
                                );
                            }
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "failed to deserialize assessment.completed event");
                    }
                }
                let _ = delivery.ack(BasicAckOptions::default()).await;
            }
            Err(e) => {
                tracing::error!(error = %e, "consumer error");
            }
        }
    }

    Ok(())
}

fn parse_field<T: FromStr>(field: &'static str, value: &Option<String>) -> Option<T> {
    let raw = value.as_ref()?;
    match raw.parse::<T>() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            tracing::warn!(field, value = %raw, "unrecognized assessment value, ignoring");
            None
        }
    }
}

/// Merge assessment results into a profile. Fields absent from the payload
/// belong to assessments the user did not just take and stay untouched.
fn apply_assessment(profile: &mut DiscoveryProfile, data: &payloads::AssessmentCompleted) {
    if let Some(style) = parse_field("attachment_style", &data.attachment_style) {
        profile.attachment_style = Some(style);
    }
    if let Some(code) = parse_field("personality_type", &data.personality_type) {
        profile.personality_type = Some(code);
    }
    if !data.love_languages.is_empty() {
        profile.love_languages = data
            .love_languages
            .iter()
            .filter_map(|s| parse_field("love_languages", &Some(s.clone())))
            .collect();
    }
    if !data.values.is_empty() {
        profile.values = data.values.iter().cloned().collect();
    }
    if let Some(scores) = &data.big_five {
        profile.big_five = Some(BigFive {
            openness: scores.openness,
            conscientiousness: scores.conscientiousness,
            extraversion: scores.extraversion,
            agreeableness: scores.agreeableness,
            neuroticism: scores.neuroticism,
        });
    }
    if let Some(style) = parse_field("conflict_style", &data.conflict_style) {
        profile.conflict_style = Some(style);
    }
    if let Some(freq) = parse_field("communication_frequency", &data.communication_frequency) {
        profile.communication_frequency = Some(freq);
    }
    if let Some(level) = parse_field("affection_level", &data.affection_level) {
        profile.affection_level = Some(level);
    }
    if let Some(attitude) = parse_field("financial_attitude", &data.financial_attitude) {
        profile.financial_attitude = Some(attitude);
    }
    if let Some(goal) = parse_field("relationship_goal", &data.relationship_goal) {
        profile.relationship_goal = Some(goal);
    }
}
