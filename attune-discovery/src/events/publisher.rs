use uuid::Uuid;

use attune_shared::clients::rabbitmq::RabbitMQClient;
use attune_shared::types::event::{payloads, routing_keys, Event};

use crate::matching::swipe::SwipeAction;

pub async fn publish_swipe_recorded(
    rabbitmq: &RabbitMQClient,
    actor_id: Uuid,
    target_id: Uuid,
    action: SwipeAction,
) {
    let event = Event::new(
        "attune-discovery",
        routing_keys::DISCOVERY_SWIPE_RECORDED,
        payloads::SwipeRecorded {
            actor_id,
            target_id,
            action: action.to_string(),
        },
    )
    .with_user(actor_id);

    if let Err(e) = rabbitmq
        .publish(routing_keys::DISCOVERY_SWIPE_RECORDED, &event)
        .await
    {
        tracing::error!(error = %e, "failed to publish swipe.recorded event");
    }
}

/// The referral-rewards service counts these toward referral tiers, and the
/// chat service opens a conversation keyed by `match_id`.
pub async fn publish_match_created(
    rabbitmq: &RabbitMQClient,
    match_id: Uuid,
    user_a_id: Uuid,
    user_b_id: Uuid,
    compatibility_score: Option<i32>,
) {
    let event = Event::new(
        "attune-discovery",
        routing_keys::DISCOVERY_MATCH_CREATED,
        payloads::MatchCreated {
            match_id,
            user_a_id,
            user_b_id,
            compatibility_score,
        },
    )
    .with_user(user_a_id);

    if let Err(e) = rabbitmq
        .publish(routing_keys::DISCOVERY_MATCH_CREATED, &event)
        .await
    {
        tracing::error!(error = %e, "failed to publish match.created event");
    }
}

pub async fn publish_quota_exhausted(
    rabbitmq: &RabbitMQClient,
    user_id: Uuid,
    kind: &str,
    date_key: &str,
) {
    let event = Event::new(
        "attune-discovery",
        routing_keys::DISCOVERY_QUOTA_EXHAUSTED,
        payloads::QuotaExhausted {
            user_id,
            kind: kind.to_string(),
            date_key: date_key.to_string(),
        },
    )
    .with_user(user_id);

    if let Err(e) = rabbitmq
        .publish(routing_keys::DISCOVERY_QUOTA_EXHAUSTED, &event)
        .await
    {
        tracing::error!(error = %e, "failed to publish quota.exhausted event");
    }
}
