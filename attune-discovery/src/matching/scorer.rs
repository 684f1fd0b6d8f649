use serde::{Deserialize, Serialize};

use super::profile::{
    AttachmentStyle, ConflictStyle, DiscoveryProfile, PersonalityType,
};

// -- Dimension weights --
// Renormalized over the dimensions actually present on both profiles, so a
// missing assessment is excluded rather than penalized.
const W_ATTACHMENT: f64 = 0.25;
const W_PERSONALITY: f64 = 0.20;
const W_LOVE_LANGUAGE: f64 = 0.15;
const W_VALUES: f64 = 0.15;
const W_BIG_FIVE: f64 = 0.15;
const W_LIFESTYLE: f64 = 0.10;

// -- Personality tier bands --
const TIER_BEST: f64 = 95.0;
const TIER_GOOD: f64 = 78.0;
const TIER_CHALLENGING: f64 = 40.0;
const TIER_NEUTRAL: f64 = 60.0;

/// Per-dimension sub-scores, 0-100 each. A dimension missing on either side
/// is omitted entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personality: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub love_language: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub big_five: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lifestyle: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatibilityScore {
    /// Weighted aggregate, rounded and clamped to 0-100.
    pub total: i32,
    pub breakdown: ScoreBreakdown,
}

/// Score compatibility between two profiles.
///
/// Pure and deterministic: no I/O, no randomness, identical inputs always
/// produce identical output, and `score(a, b) == score(b, a)`. Returns `None`
/// when the pair shares no scorable dimension at all; callers must handle
/// that case explicitly instead of substituting a number.
pub fn score(a: &DiscoveryProfile, b: &DiscoveryProfile) -> Option<CompatibilityScore> {
    let mut breakdown = ScoreBreakdown::default();
    let mut weighted = 0.0;
    let mut weight_sum = 0.0;

    let mut apply = |sub: Option<f64>, weight: f64, slot: &mut Option<i32>| {
        if let Some(value) = sub {
            *slot = Some(value.round() as i32);
            weighted += value * weight;
            weight_sum += weight;
        }
    };

    apply(attachment_score(a, b), W_ATTACHMENT, &mut breakdown.attachment);
    apply(personality_score(a, b), W_PERSONALITY, &mut breakdown.personality);
    apply(love_language_score(a, b), W_LOVE_LANGUAGE, &mut breakdown.love_language);
    apply(values_score(a, b), W_VALUES, &mut breakdown.values);
    apply(big_five_score(a, b), W_BIG_FIVE, &mut breakdown.big_five);
    apply(lifestyle_score(a, b), W_LIFESTYLE, &mut breakdown.lifestyle);

    if weight_sum == 0.0 {
        return None;
    }

    let total = (weighted / weight_sum).round().clamp(0.0, 100.0) as i32;
    Some(CompatibilityScore { total, breakdown })
}

// ---------------------------------------------------------------------------
// Attachment
// ---------------------------------------------------------------------------

fn attachment_score(a: &DiscoveryProfile, b: &DiscoveryProfile) -> Option<f64> {
    Some(attachment_table(a.attachment_style?, b.attachment_style?))
}

/// Fixed symmetric table. Secure pairs well with everything; a pair of
/// disorganized styles sits at the bottom.
fn attachment_table(a: AttachmentStyle, b: AttachmentStyle) -> f64 {
    use AttachmentStyle::*;
    match (a, b) {
        (Secure, Secure) => 95.0,
        (Secure, Anxious) | (Anxious, Secure) => 85.0,
        (Secure, Avoidant) | (Avoidant, Secure) => 85.0,
        (Secure, Disorganized) | (Disorganized, Secure) => 80.0,
        (Anxious, Anxious) => 55.0,
        (Anxious, Avoidant) | (Avoidant, Anxious) => 35.0,
        (Anxious, Disorganized) | (Disorganized, Anxious) => 40.0,
        (Avoidant, Avoidant) => 45.0,
        (Avoidant, Disorganized) | (Disorganized, Avoidant) => 40.0,
        (Disorganized, Disorganized) => 25.0,
    }
}

// ---------------------------------------------------------------------------
// Personality
// ---------------------------------------------------------------------------

type Pair = (PersonalityType, PersonalityType);

use PersonalityType::*;

const BEST_PAIRS: &[Pair] = &[
    (INTJ, ENFP), (INTP, ENTJ), (INFJ, ENTP), (INFP, ENFJ),
    (ISTJ, ESFP), (ISTP, ESFJ), (ISFJ, ESTP), (ISFP, ESTJ),
];

const GOOD_PAIRS: &[Pair] = &[
    (INTJ, INFJ), (INTP, INFP), (ENTJ, ENFJ), (ENTP, ENFP),
    (ISTJ, ISFJ), (ISTP, ISFP), (ESTJ, ESFJ), (ESTP, ESFP),
    (INTJ, ENTP), (INFJ, ENFP),
];

const CHALLENGING_PAIRS: &[Pair] = &[
    (INTJ, ESFP), (INTP, ESFJ), (INFJ, ESTP), (INFP, ESTJ),
    (ENTJ, ISFP), (ENTP, ISFJ), (ENFJ, ISTP), (ENFP, ISTJ),
];

fn contains_pair(table: &[Pair], a: PersonalityType, b: PersonalityType) -> bool {
    table
        .iter()
        .any(|&(x, y)| (x == a && y == b) || (x == b && y == a))
}

fn personality_score(a: &DiscoveryProfile, b: &DiscoveryProfile) -> Option<f64> {
    Some(personality_table(a.personality_type?, b.personality_type?))
}

fn personality_table(a: PersonalityType, b: PersonalityType) -> f64 {
    if contains_pair(BEST_PAIRS, a, b) {
        TIER_BEST
    } else if a == b || contains_pair(GOOD_PAIRS, a, b) {
        TIER_GOOD
    } else if contains_pair(CHALLENGING_PAIRS, a, b) {
        TIER_CHALLENGING
    } else {
        TIER_NEUTRAL
    }
}

// ---------------------------------------------------------------------------
// Love languages
// ---------------------------------------------------------------------------

/// Highest when both primaries match; otherwise graded by whether each
/// party's primary appears anywhere in the other's ranked list.
fn love_language_score(a: &DiscoveryProfile, b: &DiscoveryProfile) -> Option<f64> {
    let primary_a = a.primary_love_language()?;
    let primary_b = b.primary_love_language()?;

    if primary_a == primary_b {
        return Some(100.0);
    }

    let a_heard = b.love_languages.contains(&primary_a);
    let b_heard = a.love_languages.contains(&primary_b);

    Some(match (a_heard, b_heard) {
        (true, true) => 85.0,
        (true, false) | (false, true) => 60.0,
        (false, false) => 30.0,
    })
}

// ---------------------------------------------------------------------------
// Values
// ---------------------------------------------------------------------------

fn values_score(a: &DiscoveryProfile, b: &DiscoveryProfile) -> Option<f64> {
    if a.values.is_empty() || b.values.is_empty() {
        return None;
    }
    let intersection = a.values.intersection(&b.values).count();
    let union = a.values.union(&b.values).count();
    Some(intersection as f64 / union as f64 * 100.0)
}

// ---------------------------------------------------------------------------
// Big Five
// ---------------------------------------------------------------------------

fn big_five_score(a: &DiscoveryProfile, b: &DiscoveryProfile) -> Option<f64> {
    let va = a.big_five?.as_vector();
    let vb = b.big_five?.as_vector();

    let dist: f64 = va
        .iter()
        .zip(vb.iter())
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt();

    // Maximum distance: all five traits at opposite extremes.
    let max_dist = (5.0f64 * 100.0 * 100.0).sqrt();
    Some(((1.0 - dist / max_dist) * 100.0).clamp(0.0, 100.0))
}

// ---------------------------------------------------------------------------
// Lifestyle
// ---------------------------------------------------------------------------

/// Equal-weight agreement across conflict style, communication frequency,
/// affection level, financial attitude, and relationship goal. Identical
/// values get full credit, adjacent categories half credit, the rest zero.
/// Factors missing on either side do not count.
fn lifestyle_score(a: &DiscoveryProfile, b: &DiscoveryProfile) -> Option<f64> {
    let mut credits = Vec::with_capacity(5);

    if let (Some(x), Some(y)) = (a.conflict_style, b.conflict_style) {
        credits.push(conflict_credit(x, y));
    }
    if let (Some(x), Some(y)) = (a.communication_frequency, b.communication_frequency) {
        credits.push(ordinal_credit(x as i32, y as i32));
    }
    if let (Some(x), Some(y)) = (a.affection_level, b.affection_level) {
        credits.push(ordinal_credit(x as i32, y as i32));
    }
    if let (Some(x), Some(y)) = (a.financial_attitude, b.financial_attitude) {
        credits.push(ordinal_credit(x as i32, y as i32));
    }
    if let (Some(x), Some(y)) = (a.relationship_goal, b.relationship_goal) {
        credits.push(ordinal_credit(x as i32, y as i32));
    }

    if credits.is_empty() {
        return None;
    }
    Some(credits.iter().sum::<f64>() / credits.len() as f64)
}

fn ordinal_credit(x: i32, y: i32) -> f64 {
    match (x - y).abs() {
        0 => 100.0,
        1 => 50.0,
        _ => 0.0,
    }
}

/// Conflict styles are categorical, not ordinal; adjacency is a fixed list
/// of workable combinations.
fn conflict_credit(a: ConflictStyle, b: ConflictStyle) -> f64 {
    use ConflictStyle::*;
    if a == b {
        return 100.0;
    }
    const WORKABLE: &[(ConflictStyle, ConflictStyle)] = &[
        (Collaborating, Compromising),
        (Collaborating, Accommodating),
        (Collaborating, Competing),
        (Compromising, Accommodating),
        (Compromising, Avoiding),
        (Accommodating, Avoiding),
    ];
    if WORKABLE
        .iter()
        .any(|&(x, y)| (x == a && y == b) || (x == b && y == a))
    {
        50.0
    } else {
        0.0
    }
}
