use std::collections::HashSet;

use serde::Serialize;
use uuid::Uuid;

use super::profile::DiscoveryProfile;
use super::scorer::{self, CompatibilityScore};

/// One feed entry: a candidate plus the score against the viewer, or no
/// score when the pair shares no scorable dimension. Unscored candidates are
/// still shown (without a percentage badge), never hidden.
#[derive(Debug, Clone, Serialize)]
pub struct RankedCandidate {
    pub profile: DiscoveryProfile,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<CompatibilityScore>,
}

/// Filter and rank a candidate pool for a viewer.
///
/// The pool is supplied by the caller; nothing is fabricated when it runs
/// dry. Exclusions (self, already seen, outside the viewer's seeking
/// preference) are preconditions, not scoring factors. Ordering is fully
/// deterministic: score descending, candidate id ascending on ties, and
/// unscored candidates after all scored ones in stable pool order.
pub fn build_feed(
    viewer: &DiscoveryProfile,
    pool: &[DiscoveryProfile],
    seen: &HashSet<Uuid>,
) -> Vec<RankedCandidate> {
    let mut scored: Vec<RankedCandidate> = Vec::new();
    let mut unscored: Vec<RankedCandidate> = Vec::new();

    for candidate in pool {
        if candidate.user_id == viewer.user_id || seen.contains(&candidate.user_id) {
            continue;
        }
        if !viewer.seeking.accepts(candidate) {
            continue;
        }

        let entry = RankedCandidate {
            score: scorer::score(viewer, candidate),
            profile: candidate.clone(),
        };
        if entry.score.is_some() {
            scored.push(entry);
        } else {
            unscored.push(entry);
        }
    }

    scored.sort_by(|a, b| {
        let sa = a.score.map(|s| s.total).unwrap_or(0);
        let sb = b.score.map(|s| s.total).unwrap_or(0);
        sb.cmp(&sa).then(a.profile.user_id.cmp(&b.profile.user_id))
    });

    scored.extend(unscored);
    scored
}
