use std::collections::BTreeMap;

use crate::core::reasons::generate_reasons;
use crate::core::similarity::{as_set, cosine, tag_jaccard};
use crate::models::{
    BonusTable, EngineTables, MatchResult, ScoreBreakdown, ScoringWeights, UserProfile,
    ValuesMetric,
};

/// Position weights for the first interests of the viewer
const INTEREST_POSITION_WEIGHTS: [f64; 3] = [3.0, 2.0, 1.0];
const INTEREST_JACCARD_SHARE: f64 = 0.7;
const INTEREST_POSITION_SHARE: f64 = 0.3;

const NEEDS_DIRECT_SHARE: f64 = 0.6;
const NEEDS_COMPLEMENT_SHARE: f64 = 0.4;

/// Similarity for a value dimension where an option is missing or unknown
const UNKNOWN_VALUE_SIMILARITY: f64 = 0.5;

/// Largest possible gap between two AI scores
const AI_SCORE_RANGE: f64 = 10.0;
const APPEARANCE_AI_SHARE: f64 = 0.7;
const APPEARANCE_PREFERENCE_SHARE: f64 = 0.3;
const STYLE_EXACT: f64 = 1.0;
const STYLE_COMPATIBLE: f64 = 0.8;
const STYLE_DEFAULT: f64 = 0.5;

/// Calculate the compatibility of `viewee` for `viewer` (0-100)
///
/// Argument order matters: needs complementarity is read from the viewer's
/// side and the verified-asset bonus only looks at the viewee.
///
/// Scoring formula:
/// total = (
///     interest * w.interest +
///     needs * w.needs +
///     values * w.values +
///     appearance * w.appearance
/// ) + bonus, clamped to [0, 100]
pub fn calculate_match_score(
    viewer: &UserProfile,
    viewee: &UserProfile,
    weights: &ScoringWeights,
    tables: &EngineTables,
) -> MatchResult {
    let interest = interest_overlap(&viewer.interests, &viewee.interests);
    let needs = needs_compatibility(
        &viewer.social_needs,
        &viewee.social_needs,
        &tables.needs_complements,
    );
    let values = values_similarity(
        &viewer.values,
        &viewee.values,
        &tables.value_dimensions,
        tables.values_metric,
    );
    let appearance = appearance_match(viewer, viewee, tables);

    let breakdown = ScoreBreakdown {
        interest: interest * weights.interest,
        needs: needs * weights.needs,
        values: values * weights.values,
        appearance: appearance * weights.appearance,
    };

    let bonus = base_bonus(viewer, viewee, &tables.bonus);
    let total = breakdown.sum() + bonus;
    let total_score = if total.is_nan() { 0.0 } else { total.clamp(0.0, 100.0) };
    let reasons = generate_reasons(&breakdown, viewer, viewee, tables.values_reason_threshold);

    MatchResult {
        total_score,
        breakdown,
        bonus,
        reasons,
    }
}

/// Interest overlap score (0-100)
///
/// 70% Jaccard similarity, 30% position-weighted hits: the viewer's first
/// three interests are worth 3, 2 and 1 points when the viewee shares them.
pub fn interest_overlap(viewer: &[String], viewee: &[String]) -> f64 {
    let jaccard = tag_jaccard(viewer, viewee);

    let other = as_set(viewee);
    let hit_weight: f64 = viewer
        .iter()
        .zip(INTEREST_POSITION_WEIGHTS)
        .filter(|(interest, _)| other.contains(interest.as_str()))
        .map(|(_, weight)| weight)
        .sum();
    let max_weight: f64 = INTEREST_POSITION_WEIGHTS.iter().sum();
    let position_ratio = hit_weight / max_weight;

    (jaccard * INTEREST_JACCARD_SHARE + position_ratio * INTEREST_POSITION_SHARE) * 100.0
}

/// Social needs compatibility score (0-100)
///
/// 60% direct Jaccard overlap, 40% complementarity. Complementarity counts
/// the viewer's needs whose complement set intersects the viewee's needs, so
/// the score is not symmetric.
pub fn needs_compatibility(
    viewer: &[String],
    viewee: &[String],
    complements: &BTreeMap<String, Vec<String>>,
) -> f64 {
    let direct = tag_jaccard(viewer, viewee);

    let other = as_set(viewee);
    let satisfied = viewer
        .iter()
        .filter(|need| {
            complements
                .get(need.as_str())
                .is_some_and(|wanted| wanted.iter().any(|w| other.contains(w.as_str())))
        })
        .count();

    let complement_ratio = if viewer.is_empty() {
        0.0
    } else {
        satisfied as f64 / viewer.len() as f64
    };

    (direct * NEEDS_DIRECT_SHARE + complement_ratio * NEEDS_COMPLEMENT_SHARE) * 100.0
}

/// Values similarity score (0-100) over the configured dimensions
pub fn values_similarity(
    viewer: &BTreeMap<String, String>,
    viewee: &BTreeMap<String, String>,
    dimensions: &BTreeMap<String, Vec<String>>,
    metric: ValuesMetric,
) -> f64 {
    let similarities: Vec<f64> = dimensions
        .iter()
        .map(|(dimension, scale)| {
            dimension_similarity(answer(viewer, dimension), answer(viewee, dimension), scale)
        })
        .collect();

    let score = match metric {
        ValuesMetric::MirroredCosine => cosine(&similarities, &similarities),
        ValuesMetric::MeanSimilarity => {
            if similarities.is_empty() {
                0.0
            } else {
                similarities.iter().sum::<f64>() / similarities.len() as f64
            }
        }
    };

    score * 100.0
}

/// A blank answer counts as unanswered
fn answer<'a>(values: &'a BTreeMap<String, String>, dimension: &str) -> Option<&'a str> {
    values
        .get(dimension)
        .map(String::as_str)
        .filter(|answer| !answer.is_empty())
}

/// Similarity of two answers on one value dimension (0-1)
///
/// Identical answers (including both unanswered) are 1.0. Answers on the
/// scale lose similarity with ordinal distance. Anything else is 0.5.
pub fn dimension_similarity(a: Option<&str>, b: Option<&str>, scale: &[String]) -> f64 {
    if a == b {
        return 1.0;
    }

    let position = |answer: Option<&str>| answer.and_then(|v| scale.iter().position(|o| o == v));

    match (position(a), position(b)) {
        (Some(ia), Some(ib)) => {
            let max_distance = scale.len().saturating_sub(1);
            if max_distance == 0 {
                return 0.0;
            }
            1.0 - ia.abs_diff(ib) as f64 / max_distance as f64
        }
        _ => UNKNOWN_VALUE_SIMILARITY,
    }
}

/// Appearance match score (0-100)
///
/// 70% closeness of the AI appearance scores, 30% style preference.
pub fn appearance_match(viewer: &UserProfile, viewee: &UserProfile, tables: &EngineTables) -> f64 {
    let dimensions = &tables.appearance_dimensions;

    let ai_match = if dimensions.is_empty() {
        0.0
    } else {
        let total: f64 = dimensions
            .iter()
            .map(|dimension| {
                let diff = (viewer.ai_score(dimension) - viewee.ai_score(dimension)).abs();
                (1.0 - diff / AI_SCORE_RANGE).max(0.0)
            })
            .sum();
        total / dimensions.len() as f64
    };

    let preference = style_preference_match(
        viewer.style(),
        viewee.style(),
        &tables.style_compatibility,
    );

    (ai_match * APPEARANCE_AI_SHARE + preference * APPEARANCE_PREFERENCE_SHARE) * 100.0
}

/// Style preference match (0-1)
///
/// Incompatible styles and missing styles both land on the 0.5 default.
pub fn style_preference_match(
    viewer: Option<&str>,
    viewee: Option<&str>,
    compatibility: &BTreeMap<String, Vec<String>>,
) -> f64 {
    let (Some(a), Some(b)) = (viewer, viewee) else {
        return STYLE_DEFAULT;
    };

    if a == b {
        return STYLE_EXACT;
    }

    let compatible = compatibility
        .get(a)
        .is_some_and(|styles| styles.iter().any(|s| s == b));

    if compatible {
        STYLE_COMPATIBLE
    } else {
        STYLE_DEFAULT
    }
}

/// Additive bonus from categorical matches, capped at `table.cap`
pub fn base_bonus(viewer: &UserProfile, viewee: &UserProfile, table: &BonusTable) -> f64 {
    let mut bonus = 0.0;

    if viewer.city == viewee.city {
        bonus += table.same_city;
    }

    if viewer.schedule == viewee.schedule {
        bonus += table.same_schedule;
    }

    // Only the viewee's verification counts
    if viewee.role == table.verified_asset_role && viewee.asset_verified {
        bonus += table.verified_asset;
    }

    for profile in [viewer, viewee] {
        if profile.is_premium() {
            bonus += table.premium_member;
        }
    }

    bonus.clamp(0.0, table.cap)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn values(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn create_test_profile(id: &str, city: &str) -> UserProfile {
        UserProfile {
            interests: tags(&["hiking", "coffee", "reading"]),
            social_needs: tags(&["companionship_chat"]),
            city: city.to_string(),
            schedule: "early_bird".to_string(),
            role: "male".to_string(),
            ..UserProfile::new(id)
        }
    }

    #[test]
    fn test_interest_overlap_weighted() {
        let score = interest_overlap(
            &tags(&["hiking", "coffee", "reading"]),
            &tags(&["coffee", "hiking", "movies"]),
        );
        // 0.7 * 2/4 + 0.3 * 5/6
        assert!((score - 60.0).abs() < 1e-9, "got {}", score);
    }

    #[test]
    fn test_interest_order_matters() {
        let viewee = tags(&["reading"]);
        let first = interest_overlap(&tags(&["reading", "hiking", "coffee"]), &viewee);
        let last = interest_overlap(&tags(&["hiking", "coffee", "reading"]), &viewee);
        assert!(first > last);
    }

    #[test]
    fn test_interest_empty() {
        assert_eq!(interest_overlap(&[], &[]), 0.0);
    }

    #[test]
    fn test_needs_complement_direction() {
        let complements = EngineTables::default().needs_complements;
        let a = tags(&["companionship_chat"]);
        let b = tags(&["offline_activity"]);

        // companionship_chat is satisfied by offline_activity
        let forward = needs_compatibility(&a, &b, &complements);
        assert!((forward - 40.0).abs() < 1e-9);

        // offline_activity is not satisfied by companionship_chat
        let backward = needs_compatibility(&b, &a, &complements);
        assert_eq!(backward, 0.0);
    }

    #[test]
    fn test_needs_identical() {
        let complements = EngineTables::default().needs_complements;
        let needs = tags(&["companionship_chat", "career_networking"]);
        assert!((needs_compatibility(&needs, &needs, &complements) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_dimension_similarity() {
        let scale = tags(&["rational", "moderate", "indulgent"]);
        assert_eq!(dimension_similarity(Some("moderate"), Some("moderate"), &scale), 1.0);
        assert_eq!(dimension_similarity(None, None, &scale), 1.0);
        assert_eq!(dimension_similarity(Some("rational"), Some("moderate"), &scale), 0.5);
        assert_eq!(dimension_similarity(Some("rational"), Some("indulgent"), &scale), 0.0);
        assert_eq!(dimension_similarity(Some("lavish"), Some("rational"), &scale), 0.5);
        assert_eq!(dimension_similarity(None, Some("rational"), &scale), 0.5);
    }

    #[test]
    fn test_values_mirrored_cosine() {
        let dimensions = EngineTables::default().value_dimensions;
        let a = values(&[("consumption", "rational")]);
        let b = values(&[("consumption", "indulgent")]);

        let score = values_similarity(&a, &b, &dimensions, ValuesMetric::MirroredCosine);
        assert!((score - 100.0).abs() < 1e-9);

        let a = values(&[("consumption", "rational"), ("boundary", "strict"), ("communication", "direct")]);
        let b = values(&[("consumption", "indulgent"), ("boundary", "open"), ("communication", "flexible")]);
        let score = values_similarity(&a, &b, &dimensions, ValuesMetric::MirroredCosine);
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_values_mean_similarity() {
        let dimensions = EngineTables::default().value_dimensions;
        let a = values(&[("consumption", "rational")]);
        let b = values(&[("consumption", "indulgent")]);

        let score = values_similarity(&a, &b, &dimensions, ValuesMetric::MeanSimilarity);
        assert!((score - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_appearance_match() {
        let tables = EngineTables::default();
        let mut a = create_test_profile("a", "shanghai");
        let mut b = create_test_profile("b", "shanghai");
        a.ai_scores.insert("temperament_match".to_string(), 8.0);
        b.ai_scores.insert("temperament_match".to_string(), 6.0);
        a.appearance_pref.style = Some("casual".to_string());
        b.appearance_pref.style = Some("sporty".to_string());

        let expected = ((0.8 + 1.0 + 1.0) / 3.0 * 0.7 + 0.8 * 0.3) * 100.0;
        assert!((appearance_match(&a, &b, &tables) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_appearance_defaults() {
        let tables = EngineTables::default();
        let a = UserProfile::new("a");
        let b = UserProfile::new("b");
        assert!((appearance_match(&a, &b, &tables) - 85.0).abs() < 1e-9);
    }

    #[test]
    fn test_appearance_large_gap_floors_at_zero() {
        let tables = EngineTables {
            appearance_dimensions: vec!["style_fit".to_string()],
            ..EngineTables::default()
        };
        let mut a = UserProfile::new("a");
        let mut b = UserProfile::new("b");
        a.ai_scores.insert("style_fit".to_string(), 0.0);
        b.ai_scores.insert("style_fit".to_string(), 12.0);

        assert!((appearance_match(&a, &b, &tables) - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_style_preference() {
        let compatibility = EngineTables::default().style_compatibility;
        assert_eq!(style_preference_match(Some("formal"), Some("formal"), &compatibility), 1.0);
        assert_eq!(style_preference_match(Some("formal"), Some("business"), &compatibility), 0.8);
        assert_eq!(style_preference_match(Some("casual"), Some("formal"), &compatibility), 0.5);
        assert_eq!(style_preference_match(None, Some("formal"), &compatibility), 0.5);
    }

    #[test]
    fn test_base_bonus_capped() {
        let table = BonusTable::default();
        let mut a = create_test_profile("a", "shanghai");
        let mut b = create_test_profile("b", "shanghai");
        a.membership_tier = "gold".to_string();
        b.membership_tier = "gold".to_string();
        b.role = "female".to_string();
        b.asset_verified = true;

        assert_eq!(base_bonus(&a, &b, &table), 10.0);
    }

    #[test]
    fn test_base_bonus_checks_viewee_only() {
        let table = BonusTable::default();
        let mut a = create_test_profile("a", "shanghai");
        let b = create_test_profile("b", "beijing");
        a.role = "female".to_string();
        a.asset_verified = true;

        // Only the shared schedule counts
        assert_eq!(base_bonus(&a, &b, &table), 3.0);
        assert_eq!(base_bonus(&b, &a, &table), 5.0);
    }

    #[test]
    fn test_calculate_match_score() {
        let a = create_test_profile("a", "shanghai");
        let b = create_test_profile("b", "shanghai");

        let result = calculate_match_score(&a, &b, &ScoringWeights::default(), &EngineTables::default());

        assert!(result.total_score >= 0.0 && result.total_score <= 100.0);
        assert!((result.breakdown.interest - 40.0).abs() < 1e-9);
        assert!((result.breakdown.needs - 30.0).abs() < 1e-9);
        assert!(result.reasons.len() <= 3);
    }

    #[test]
    fn test_breakdown_sums_to_total() {
        let mut a = create_test_profile("a", "shanghai");
        let b = create_test_profile("b", "beijing");
        a.interests = tags(&["chess"]);

        let result = calculate_match_score(&a, &b, &ScoringWeights::default(), &EngineTables::default());

        assert!(result.unclamped_total() < 100.0);
        assert!((result.unclamped_total() - result.total_score).abs() < 1e-9);
    }

    #[test]
    fn test_blank_value_answer_counts_as_unanswered() {
        let tables = EngineTables::default();
        let a = values(&[("boundary", "")]);

        let score = values_similarity(&a, &BTreeMap::new(), &tables.value_dimensions, ValuesMetric::MeanSimilarity);

        assert!((score - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_nan_weight_scores_zero() {
        let a = create_test_profile("a", "shanghai");
        let b = create_test_profile("b", "beijing");
        let weights = ScoringWeights {
            interest: f64::NAN,
            ..ScoringWeights::default()
        };

        let result = calculate_match_score(&a, &b, &weights, &EngineTables::default());

        assert_eq!(result.total_score, 0.0);
    }
}
