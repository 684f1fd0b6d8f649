use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Psychological dimensions
// ---------------------------------------------------------------------------
// Every dimension is an explicit Option (or possibly-empty collection) on the
// profile. A missing dimension is excluded from scoring, never guessed.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentStyle {
    Secure,
    Anxious,
    Avoidant,
    Disorganized,
}

impl std::fmt::Display for AttachmentStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AttachmentStyle::Secure => "secure",
            AttachmentStyle::Anxious => "anxious",
            AttachmentStyle::Avoidant => "avoidant",
            AttachmentStyle::Disorganized => "disorganized",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for AttachmentStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "secure" => Ok(AttachmentStyle::Secure),
            "anxious" => Ok(AttachmentStyle::Anxious),
            "avoidant" => Ok(AttachmentStyle::Avoidant),
            "disorganized" => Ok(AttachmentStyle::Disorganized),
            _ => Err(format!("unknown attachment style: {s}")),
        }
    }
}

/// The 16 four-letter personality codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(clippy::upper_case_acronyms)]
pub enum PersonalityType {
    INTJ, INTP, ENTJ, ENTP,
    INFJ, INFP, ENFJ, ENFP,
    ISTJ, ISFJ, ESTJ, ESFJ,
    ISTP, ISFP, ESTP, ESFP,
}

impl PersonalityType {
    pub const ALL: [PersonalityType; 16] = [
        PersonalityType::INTJ, PersonalityType::INTP, PersonalityType::ENTJ, PersonalityType::ENTP,
        PersonalityType::INFJ, PersonalityType::INFP, PersonalityType::ENFJ, PersonalityType::ENFP,
        PersonalityType::ISTJ, PersonalityType::ISFJ, PersonalityType::ESTJ, PersonalityType::ESFJ,
        PersonalityType::ISTP, PersonalityType::ISFP, PersonalityType::ESTP, PersonalityType::ESFP,
    ];
}

impl std::fmt::Display for PersonalityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl std::str::FromStr for PersonalityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.to_uppercase();
        PersonalityType::ALL
            .iter()
            .find(|t| format!("{t:?}") == code)
            .copied()
            .ok_or_else(|| format!("unknown personality type: {s}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoveLanguage {
    WordsOfAffirmation,
    QualityTime,
    ReceivingGifts,
    ActsOfService,
    PhysicalTouch,
}

impl std::fmt::Display for LoveLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            LoveLanguage::WordsOfAffirmation => "words_of_affirmation",
            LoveLanguage::QualityTime => "quality_time",
            LoveLanguage::ReceivingGifts => "receiving_gifts",
            LoveLanguage::ActsOfService => "acts_of_service",
            LoveLanguage::PhysicalTouch => "physical_touch",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for LoveLanguage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "words_of_affirmation" => Ok(LoveLanguage::WordsOfAffirmation),
            "quality_time" => Ok(LoveLanguage::QualityTime),
            "receiving_gifts" => Ok(LoveLanguage::ReceivingGifts),
            "acts_of_service" => Ok(LoveLanguage::ActsOfService),
            "physical_touch" => Ok(LoveLanguage::PhysicalTouch),
            _ => Err(format!("unknown love language: {s}")),
        }
    }
}

/// Big Five trait scores, each 0-100. Unmeasured traits default to the
/// neutral midpoint so a partially answered questionnaire still produces a
/// usable vector; a profile with no questionnaire at all carries `None`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BigFive {
    #[serde(default = "neutral_trait")]
    pub openness: f64,
    #[serde(default = "neutral_trait")]
    pub conscientiousness: f64,
    #[serde(default = "neutral_trait")]
    pub extraversion: f64,
    #[serde(default = "neutral_trait")]
    pub agreeableness: f64,
    #[serde(default = "neutral_trait")]
    pub neuroticism: f64,
}

fn neutral_trait() -> f64 {
    50.0
}

impl BigFive {
    pub fn as_vector(&self) -> [f64; 5] {
        [
            self.openness,
            self.conscientiousness,
            self.extraversion,
            self.agreeableness,
            self.neuroticism,
        ]
    }
}

impl Default for BigFive {
    fn default() -> Self {
        Self {
            openness: 50.0,
            conscientiousness: 50.0,
            extraversion: 50.0,
            agreeableness: 50.0,
            neuroticism: 50.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Lifestyle factors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictStyle {
    Collaborating,
    Compromising,
    Accommodating,
    Avoiding,
    Competing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommunicationFrequency {
    Constant,
    Daily,
    FewTimesAWeek,
    Weekly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AffectionLevel {
    Reserved,
    Moderate,
    Expressive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinancialAttitude {
    Saver,
    Balanced,
    Spender,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipGoal {
    Casual,
    Exploring,
    LongTerm,
    Marriage,
}

macro_rules! snake_case_str_impls {
    ($ty:ty { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                let s = match self {
                    $(Self::$variant => $text,)+
                };
                write!(f, "{s}")
            }
        }

        impl std::str::FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($text => Ok(Self::$variant),)+
                    _ => Err(format!("unknown value for {}: {s}", stringify!($ty))),
                }
            }
        }
    };
}

snake_case_str_impls!(ConflictStyle {
    Collaborating => "collaborating",
    Compromising => "compromising",
    Accommodating => "accommodating",
    Avoiding => "avoiding",
    Competing => "competing",
});

snake_case_str_impls!(CommunicationFrequency {
    Constant => "constant",
    Daily => "daily",
    FewTimesAWeek => "few_times_a_week",
    Weekly => "weekly",
});

snake_case_str_impls!(AffectionLevel {
    Reserved => "reserved",
    Moderate => "moderate",
    Expressive => "expressive",
});

snake_case_str_impls!(FinancialAttitude {
    Saver => "saver",
    Balanced => "balanced",
    Spender => "spender",
});

snake_case_str_impls!(RelationshipGoal {
    Casual => "casual",
    Exploring => "exploring",
    LongTerm => "long_term",
    Marriage => "marriage",
});

// ---------------------------------------------------------------------------
// Identity and seeking preference
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    NonBinary,
}

snake_case_str_impls!(Gender {
    Male => "male",
    Female => "female",
    NonBinary => "non_binary",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeekingGender {
    Men,
    Women,
    Everyone,
}

snake_case_str_impls!(SeekingGender {
    Men => "men",
    Women => "women",
    Everyone => "everyone",
});

impl SeekingGender {
    pub fn accepts(&self, gender: Gender) -> bool {
        match self {
            SeekingGender::Men => gender == Gender::Male,
            SeekingGender::Women => gender == Gender::Female,
            SeekingGender::Everyone => true,
        }
    }
}

/// Who the user wants to see in their feed. A precondition filter, not a
/// scoring factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeekingPreference {
    pub gender: SeekingGender,
    pub age_min: i32,
    pub age_max: i32,
}

impl SeekingPreference {
    pub fn accepts(&self, candidate: &DiscoveryProfile) -> bool {
        self.gender.accepts(candidate.gender)
            && candidate.age >= self.age_min
            && candidate.age <= self.age_max
    }
}

// ---------------------------------------------------------------------------
// DiscoveryProfile
// ---------------------------------------------------------------------------

/// A user's psychological attributes as discovery sees them. Created at
/// signup, updated on every profile edit or assessment retake, never deleted
/// while the account exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryProfile {
    pub user_id: Uuid,
    pub age: i32,
    pub gender: Gender,
    pub seeking: SeekingPreference,
    pub attachment_style: Option<AttachmentStyle>,
    pub personality_type: Option<PersonalityType>,
    /// Ranked, primary first. Empty when the assessment was never taken.
    pub love_languages: Vec<LoveLanguage>,
    pub values: BTreeSet<String>,
    pub big_five: Option<BigFive>,
    pub conflict_style: Option<ConflictStyle>,
    pub communication_frequency: Option<CommunicationFrequency>,
    pub affection_level: Option<AffectionLevel>,
    pub financial_attitude: Option<FinancialAttitude>,
    pub relationship_goal: Option<RelationshipGoal>,
    /// Reference timezone for quota date keys, as minutes east of UTC.
    pub utc_offset_minutes: i32,
}

impl DiscoveryProfile {
    pub fn primary_love_language(&self) -> Option<LoveLanguage> {
        self.love_languages.first().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn personality_codes_round_trip() {
        for t in PersonalityType::ALL {
            assert_eq!(PersonalityType::from_str(&t.to_string()).unwrap(), t);
        }
    }

    #[test]
    fn personality_parse_is_case_insensitive() {
        assert_eq!(PersonalityType::from_str("enfp").unwrap(), PersonalityType::ENFP);
    }

    #[test]
    fn lifestyle_round_trip() {
        assert_eq!(
            CommunicationFrequency::from_str("few_times_a_week").unwrap(),
            CommunicationFrequency::FewTimesAWeek
        );
        assert_eq!(RelationshipGoal::LongTerm.to_string(), "long_term");
    }

    #[test]
    fn seeking_gender_filters() {
        assert!(SeekingGender::Everyone.accepts(Gender::NonBinary));
        assert!(SeekingGender::Men.accepts(Gender::Male));
        assert!(!SeekingGender::Women.accepts(Gender::Male));
    }

    #[test]
    fn big_five_defaults_to_midpoint() {
        let b: BigFive = serde_json::from_str("{\"openness\": 80.0}").unwrap();
        assert_eq!(b.openness, 80.0);
        assert_eq!(b.neuroticism, 50.0);
    }
}
