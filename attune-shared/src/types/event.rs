use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// RabbitMQ Event envelope wrapping all domain events.
///
/// Routing key format: `attune.{domain}.{entity}.{action}`
/// Example: `attune.discovery.match.created`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event<T: Serialize> {
    pub id: Uuid,
    pub source: String,
    pub event_type: String,
    pub timestamp: DateTime<Utc>,
    pub correlation_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub data: T,
}

impl<T: Serialize> Event<T> {
    pub fn new(source: impl Into<String>, event_type: impl Into<String>, data: T) -> Self {
        Self {
            id: Uuid::now_v7(),
            source: source.into(),
            event_type: event_type.into(),
            timestamp: Utc::now(),
            correlation_id: None,
            user_id: None,
            data,
        }
    }

    pub fn with_user(mut self, user_id: Uuid) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn with_correlation(mut self, correlation_id: Uuid) -> Self {
        self.correlation_id = Some(correlation_id);
        self
    }
}

/// RabbitMQ routing keys
pub mod routing_keys {
    // Profile events (published by the assessment pipeline)
    pub const PROFILE_ASSESSMENT_COMPLETED: &str = "attune.profile.assessment.completed";

    // Discovery events
    pub const DISCOVERY_SWIPE_RECORDED: &str = "attune.discovery.swipe.recorded";
    pub const DISCOVERY_MATCH_CREATED: &str = "attune.discovery.match.created";
    pub const DISCOVERY_QUOTA_EXHAUSTED: &str = "attune.discovery.quota.exhausted";
}

/// Common event data payloads
pub mod payloads {
    use serde::{Deserialize, Serialize};
    use uuid::Uuid;

    /// Emitted by the assessment pipeline whenever a user finishes (or
    /// retakes) a questionnaire. Fields left `None` were not part of the
    /// assessment that just completed and must not overwrite stored data.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct AssessmentCompleted {
        pub user_id: Uuid,
        pub attachment_style: Option<String>,
        pub personality_type: Option<String>,
        #[serde(default)]
        pub love_languages: Vec<String>,
        #[serde(default)]
        pub values: Vec<String>,
        pub big_five: Option<BigFiveScores>,
        pub conflict_style: Option<String>,
        pub communication_frequency: Option<String>,
        pub affection_level: Option<String>,
        pub financial_attitude: Option<String>,
        pub relationship_goal: Option<String>,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct BigFiveScores {
        pub openness: f64,
        pub conscientiousness: f64,
        pub extraversion: f64,
        pub agreeableness: f64,
        pub neuroticism: f64,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct SwipeRecorded {
        pub actor_id: Uuid,
        pub target_id: Uuid,
        pub action: String,
    }

    /// Consumed by the referral-rewards and chat services; `match_id` becomes
    /// the conversation key on the chat side.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct MatchCreated {
        pub match_id: Uuid,
        pub user_a_id: Uuid,
        pub user_b_id: Uuid,
        pub compatibility_score: Option<i32>,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct QuotaExhausted {
        pub user_id: Uuid,
        pub kind: String,
        pub date_key: String,
    }
}
