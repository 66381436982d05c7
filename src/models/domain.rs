use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Score assumed for an appearance dimension the AI did not rate
pub const DEFAULT_AI_SCORE: f64 = 5.0;

/// Membership tier every profile starts on
pub const NORMAL_TIER: &str = "normal";

/// Immutable snapshot of a member's questionnaire answers and attributes.
///
/// Interests and social needs are ordered: earlier entries carry more weight
/// in the interest scorer and drive the order of generated match reasons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(rename = "socialNeeds", default)]
    pub social_needs: Vec<String>,
    /// Value dimension name -> selected option
    #[serde(default)]
    pub values: BTreeMap<String, String>,
    /// Appearance dimension name -> AI score on a 0-10 scale
    #[serde(rename = "aiScores", default)]
    pub ai_scores: HashMap<String, f64>,
    #[serde(rename = "appearancePref", default)]
    pub appearance_pref: AppearancePreference,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub schedule: String,
    #[serde(default)]
    pub role: String,
    #[serde(rename = "assetVerified", default)]
    pub asset_verified: bool,
    #[serde(rename = "membershipTier", default = "default_tier")]
    pub membership_tier: String,
}

impl UserProfile {
    /// Profile with the given id and every optional attribute at its default
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            interests: Vec::new(),
            social_needs: Vec::new(),
            values: BTreeMap::new(),
            ai_scores: HashMap::new(),
            appearance_pref: AppearancePreference::default(),
            city: String::new(),
            schedule: String::new(),
            role: String::new(),
            asset_verified: false,
            membership_tier: default_tier(),
        }
    }

    /// AI score for a dimension, falling back to [`DEFAULT_AI_SCORE`]
    pub fn ai_score(&self, dimension: &str) -> f64 {
        self.ai_scores
            .get(dimension)
            .copied()
            .unwrap_or(DEFAULT_AI_SCORE)
    }

    /// Preferred style, treating an empty string as unset
    pub fn style(&self) -> Option<&str> {
        self.appearance_pref
            .style
            .as_deref()
            .filter(|style| !style.is_empty())
    }

    pub fn is_premium(&self) -> bool {
        self.membership_tier != NORMAL_TIER
    }
}

fn default_tier() -> String {
    NORMAL_TIER.to_string()
}

/// Appearance preferences stated in the questionnaire
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppearancePreference {
    #[serde(default)]
    pub style: Option<String>,
}

/// Weighted contribution of each sub-score to the total
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub interest: f64,
    pub needs: f64,
    pub values: f64,
    pub appearance: f64,
}

impl ScoreBreakdown {
    pub fn sum(&self) -> f64 {
        self.interest + self.needs + self.values + self.appearance
    }
}

/// Result of scoring one viewer/viewee pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Clamped to [0, 100]
    #[serde(rename = "totalScore")]
    pub total_score: f64,
    #[serde(rename = "detailScores")]
    pub breakdown: ScoreBreakdown,
    pub bonus: f64,
    /// At most three, in priority order
    #[serde(rename = "matchReasons")]
    pub reasons: Vec<String>,
}

impl MatchResult {
    /// Total before clamping: weighted contributions plus bonus
    pub fn unclamped_total(&self) -> f64 {
        self.breakdown.sum() + self.bonus
    }
}

/// Scoring weights
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub interest: f64,
    pub needs: f64,
    pub values: f64,
    pub appearance: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            interest: 0.4,
            needs: 0.3,
            values: 0.2,
            appearance: 0.1,
        }
    }
}
