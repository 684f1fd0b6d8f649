//! End-to-end discovery flows over the in-memory backend: feed building,
//! swiping, match detection, and quota enforcement working together.

mod common;

use std::collections::HashSet;

use pretty_assertions::assert_eq;
use uuid::Uuid;

use attune_discovery::matching::feed::build_feed;
use attune_discovery::matching::profile::{AttachmentStyle, LoveLanguage};
use attune_discovery::matching::scorer;
use attune_discovery::matching::swipe::{SwipeAction, SwipeOutcome};
use attune_discovery::store::{ProfileStore, SwipeStore};

use common::{profile, seeded_service, user_id};

fn recorded(outcome: SwipeOutcome) -> bool {
    match outcome {
        SwipeOutcome::Recorded { matched, .. } => matched.is_some(),
        SwipeOutcome::QuotaExhausted { .. } => panic!("unexpected quota exhaustion"),
    }
}

#[tokio::test]
async fn feed_swipe_match_flow() {
    let (svc, store) = seeded_service(&[1, 2, 3, 4]).await;
    let me = user_id(1);

    // The feed ranks the other three; nobody has been swiped yet.
    let viewer = store.get(me).await.unwrap().unwrap();
    let pool = store.candidate_pool(me, 100).await.unwrap();
    let feed = build_feed(&viewer, &pool, &HashSet::new());
    assert_eq!(feed.len(), 3);
    assert!(feed.iter().all(|c| c.profile.user_id != me));

    // Swipe on the top candidate; the next feed no longer contains them.
    let top = feed[0].profile.user_id;
    assert!(!recorded(
        svc.record_swipe(me, top, SwipeAction::Like, false).await.unwrap()
    ));

    let seen: HashSet<Uuid> = store
        .seen_target_ids(me)
        .await
        .unwrap()
        .into_iter()
        .collect();
    let feed = build_feed(&viewer, &pool, &seen);
    assert_eq!(feed.len(), 2);
    assert!(feed.iter().all(|c| c.profile.user_id != top));

    // The liked user likes back: match, visible to both sides.
    assert!(recorded(
        svc.record_swipe(top, me, SwipeAction::Like, false).await.unwrap()
    ));
    let mine = svc.matches_for(me).await.unwrap();
    let theirs = svc.matches_for(top).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].id, theirs[0].id);
}

#[tokio::test]
async fn richer_profiles_rank_higher() {
    let (_, store) = seeded_service(&[1]).await;
    let me = user_id(1);

    // One candidate shares everything with the viewer, one clashes, one is a
    // blank profile with nothing to score.
    let mut soulmate = profile(20);
    soulmate.love_languages = vec![LoveLanguage::QualityTime];
    let mut clash = profile(21);
    clash.attachment_style = Some(AttachmentStyle::Disorganized);
    clash.love_languages = vec![LoveLanguage::ReceivingGifts];
    let mut blank = profile(22);
    blank.attachment_style = None;
    blank.love_languages = vec![];

    for p in [&soulmate, &clash, &blank] {
        store.upsert(p).await.unwrap();
    }

    let viewer = store.get(me).await.unwrap().unwrap();
    let pool = store.candidate_pool(me, 100).await.unwrap();
    let feed = build_feed(&viewer, &pool, &HashSet::new());

    assert_eq!(feed[0].profile.user_id, soulmate.user_id);
    assert_eq!(feed[1].profile.user_id, clash.user_id);
    // the unscored candidate is shown last, without a score
    assert_eq!(feed[2].profile.user_id, blank.user_id);
    assert!(feed[2].score.is_none());
    assert!(feed[0].score.unwrap().total > feed[1].score.unwrap().total);
}

#[tokio::test]
async fn compatibility_preview_matches_match_score() {
    let (svc, store) = seeded_service(&[1, 2]).await;
    let a = store.get(user_id(1)).await.unwrap().unwrap();
    let b = store.get(user_id(2)).await.unwrap().unwrap();

    let preview = scorer::score(&a, &b).unwrap();
    assert_eq!(preview, scorer::score(&b, &a).unwrap());

    svc.record_swipe(a.user_id, b.user_id, SwipeAction::Like, false)
        .await
        .unwrap();
    svc.record_swipe(b.user_id, a.user_id, SwipeAction::Like, false)
        .await
        .unwrap();

    let matches = svc.matches_for(a.user_id).await.unwrap();
    assert_eq!(matches[0].compatibility_score, Some(preview.total));
}

#[tokio::test]
async fn daily_limit_exhausts_and_reports_zero() {
    let ids: Vec<u128> = (1..=12).collect();
    let (svc, _) = seeded_service(&ids).await;
    let me = user_id(1);

    // ten likes succeed
    for n in 2..=11u128 {
        match svc
            .record_swipe(me, user_id(n), SwipeAction::Like, false)
            .await
            .unwrap()
        {
            SwipeOutcome::Recorded { .. } => {}
            SwipeOutcome::QuotaExhausted { .. } => panic!("exhausted too early at {n}"),
        }
    }

    // the eleventh is a first-class exhausted result, not an error
    match svc
        .record_swipe(me, user_id(12), SwipeAction::Like, false)
        .await
        .unwrap()
    {
        SwipeOutcome::QuotaExhausted { status } => {
            assert_eq!(status.likes_remaining, Some(0));
            assert_eq!(status.superlikes_remaining, Some(3));
        }
        SwipeOutcome::Recorded { .. } => panic!("expected quota exhaustion"),
    }

    // superlikes draw from their own allotment
    match svc
        .record_swipe(me, user_id(12), SwipeAction::Superlike, false)
        .await
        .unwrap()
    {
        SwipeOutcome::Recorded { .. } => {}
        SwipeOutcome::QuotaExhausted { .. } => panic!("superlike should still be available"),
    }
}
