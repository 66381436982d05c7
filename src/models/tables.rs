use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Lookup tables and fixed amounts used by the scorers.
///
/// Everything here is plain configuration: the defaults mirror the
/// questionnaire shipped with the app, and any of it can be replaced from
/// `config/*.toml` or built by hand in tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineTables {
    /// Need -> needs on the other side that satisfy it
    #[serde(default = "default_needs_complements")]
    pub needs_complements: BTreeMap<String, Vec<String>>,
    /// Value dimension -> ordered option scale
    #[serde(default = "default_value_dimensions")]
    pub value_dimensions: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub values_metric: ValuesMetric,
    /// Style -> styles it gets along with
    #[serde(default = "default_style_compatibility")]
    pub style_compatibility: BTreeMap<String, Vec<String>>,
    #[serde(default = "default_appearance_dimensions")]
    pub appearance_dimensions: Vec<String>,
    #[serde(default)]
    pub bonus: BonusTable,
    /// Weighted values contribution above which a reason is emitted
    #[serde(default = "default_values_reason_threshold")]
    pub values_reason_threshold: f64,
    #[serde(default = "default_role_pairings")]
    pub role_pairings: Vec<RolePairing>,
}

impl Default for EngineTables {
    fn default() -> Self {
        Self {
            needs_complements: default_needs_complements(),
            value_dimensions: default_value_dimensions(),
            values_metric: ValuesMetric::default(),
            style_compatibility: default_style_compatibility(),
            appearance_dimensions: default_appearance_dimensions(),
            bonus: BonusTable::default(),
            values_reason_threshold: default_values_reason_threshold(),
            role_pairings: default_role_pairings(),
        }
    }
}

/// How per-dimension value similarities are folded into one score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValuesMetric {
    /// Cosine of the similarity vector against itself. Scores 100 unless
    /// every dimension is at zero similarity; kept as the default so scores
    /// stay comparable with those already shown to members.
    #[default]
    MirroredCosine,
    /// Mean per-dimension similarity.
    MeanSimilarity,
}

/// Additive bonus amounts for categorical matches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BonusTable {
    #[serde(default = "default_same_city")]
    pub same_city: f64,
    #[serde(default = "default_same_schedule")]
    pub same_schedule: f64,
    /// Awarded when the viewee has this role and is asset-verified
    #[serde(default = "default_verified_asset")]
    pub verified_asset: f64,
    #[serde(default = "default_verified_asset_role")]
    pub verified_asset_role: String,
    /// Awarded once per side that is on a non-normal tier
    #[serde(default = "default_premium_member")]
    pub premium_member: f64,
    #[serde(default = "default_bonus_cap")]
    pub cap: f64,
}

impl Default for BonusTable {
    fn default() -> Self {
        Self {
            same_city: default_same_city(),
            same_schedule: default_same_schedule(),
            verified_asset: default_verified_asset(),
            verified_asset_role: default_verified_asset_role(),
            premium_member: default_premium_member(),
            cap: default_bonus_cap(),
        }
    }
}

/// Two roles that may be matched with each other, in either direction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolePairing {
    pub left: String,
    pub right: String,
}

impl RolePairing {
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
        }
    }

    /// Role the given role is paired with, if it takes part in this pairing
    pub fn counterpart(&self, role: &str) -> Option<&str> {
        if role == self.left {
            Some(&self.right)
        } else if role == self.right {
            Some(&self.left)
        } else {
            None
        }
    }
}

fn table(entries: &[(&str, &[&str])]) -> BTreeMap<String, Vec<String>> {
    entries
        .iter()
        .map(|(key, items)| {
            (
                key.to_string(),
                items.iter().map(|item| item.to_string()).collect(),
            )
        })
        .collect()
}

fn default_needs_complements() -> BTreeMap<String, Vec<String>> {
    table(&[
        ("companionship_chat", &["companionship_chat", "offline_activity"]),
        ("offline_activity", &["offline_activity", "interest_group"]),
        ("career_networking", &["career_networking", "resource_matching"]),
        ("interest_group", &["interest_group", "offline_activity"]),
    ])
}

fn default_value_dimensions() -> BTreeMap<String, Vec<String>> {
    table(&[
        ("consumption", &["rational", "moderate", "indulgent"]),
        ("boundary", &["strict", "moderate", "open"]),
        ("communication", &["direct", "tactful", "flexible"]),
    ])
}

fn default_style_compatibility() -> BTreeMap<String, Vec<String>> {
    table(&[
        ("casual", &["casual", "sporty"]),
        ("formal", &["formal", "business"]),
        ("sporty", &["sporty", "casual"]),
    ])
}

fn default_appearance_dimensions() -> Vec<String> {
    vec![
        "temperament_match".to_string(),
        "style_fit".to_string(),
        "overall_harmony".to_string(),
    ]
}

fn default_values_reason_threshold() -> f64 { 70.0 }

fn default_role_pairings() -> Vec<RolePairing> {
    vec![RolePairing::new("female", "male")]
}

fn default_same_city() -> f64 { 5.0 }
fn default_same_schedule() -> f64 { 3.0 }
fn default_verified_asset() -> f64 { 2.0 }
fn default_verified_asset_role() -> String { "female".to_string() }
fn default_premium_member() -> f64 { 2.0 }
fn default_bonus_cap() -> f64 { 10.0 }
