use crate::core::similarity::shared_in_order;
use crate::models::{ScoreBreakdown, UserProfile};

/// Most reasons attached to a single match
pub const MAX_REASONS: usize = 3;
const MAX_LISTED_INTERESTS: usize = 3;
const MAX_LISTED_NEEDS: usize = 2;

pub const VALUES_ALIGNMENT_REASON: &str = "High values alignment";
pub const SAME_CITY_REASON: &str = "Same city";

/// Build human-readable reasons for a match in fixed priority order:
/// shared interests, shared needs, values alignment, same city.
pub fn generate_reasons(
    breakdown: &ScoreBreakdown,
    viewer: &UserProfile,
    viewee: &UserProfile,
    values_threshold: f64,
) -> Vec<String> {
    let mut reasons = Vec::with_capacity(MAX_REASONS);

    let interests = shared_in_order(&viewer.interests, &viewee.interests);
    if !interests.is_empty() {
        let listed: Vec<&str> = interests.into_iter().take(MAX_LISTED_INTERESTS).collect();
        reasons.push(format!("Shared interests: {}", listed.join(", ")));
    }

    let needs = shared_in_order(&viewer.social_needs, &viewee.social_needs);
    if !needs.is_empty() {
        let listed: Vec<&str> = needs.into_iter().take(MAX_LISTED_NEEDS).collect();
        reasons.push(format!("Shared needs: {}", listed.join(", ")));
    }

    if breakdown.values > values_threshold {
        reasons.push(VALUES_ALIGNMENT_REASON.to_string());
    }

    if viewer.city == viewee.city {
        reasons.push(SAME_CITY_REASON.to_string());
    }

    reasons.truncate(MAX_REASONS);
    reasons
}
