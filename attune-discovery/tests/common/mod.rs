use std::collections::BTreeSet;
use std::sync::Arc;

use uuid::Uuid;

use attune_discovery::matching::profile::*;
use attune_discovery::matching::quota::{QuotaLimits, QuotaManager};
use attune_discovery::matching::swipe::SwipeService;
use attune_discovery::store::memory::MemoryStore;
use attune_discovery::store::ProfileStore;

pub fn user_id(n: u128) -> Uuid {
    Uuid::from_u128(n)
}

pub fn profile(n: u128) -> DiscoveryProfile {
    DiscoveryProfile {
        user_id: user_id(n),
        age: 30,
        gender: Gender::Female,
        seeking: SeekingPreference {
            gender: SeekingGender::Everyone,
            age_min: 18,
            age_max: 99,
        },
        attachment_style: Some(AttachmentStyle::Secure),
        personality_type: None,
        love_languages: vec![LoveLanguage::QualityTime],
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

pub fn limits() -> QuotaLimits {
    QuotaLimits {
        daily_likes: 10,
        daily_superlikes: 3,
    }
}

pub async fn seeded_service(ids: &[u128]) -> (SwipeService, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    for &id in ids {
        store.upsert(&profile(id)).await.unwrap();
    }
    let quota = QuotaManager::new(store.clone(), limits());
    (
        SwipeService::new(store.clone(), store.clone(), quota),
        store,
    )
}
