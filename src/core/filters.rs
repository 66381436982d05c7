use crate::models::{RolePairing, UserProfile};

/// Roles the given role may be matched with
pub fn counterpart_roles<'a>(role: &str, pairings: &'a [RolePairing]) -> Vec<&'a str> {
    pairings
        .iter()
        .filter_map(|pairing| pairing.counterpart(role))
        .collect()
}

/// Check if a pool member may be shown to the target at all
///
/// The candidate must not be the target and must hold a role paired with
/// the target's role.
#[inline]
pub fn is_eligible(
    target: &UserProfile,
    candidate: &UserProfile,
    pairings: &[RolePairing],
) -> bool {
    // Skip self
    if candidate.user_id == target.user_id {
        return false;
    }

    pairings
        .iter()
        .filter_map(|pairing| pairing.counterpart(&target.role))
        .any(|role| role == candidate.role)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_profile(id: &str, role: &str) -> UserProfile {
        UserProfile {
            role: role.to_string(),
            ..UserProfile::new(id)
        }
    }

    fn pairings() -> Vec<RolePairing> {
        vec![RolePairing::new("female", "male")]
    }

    #[test]
    fn test_opposite_role_eligible() {
        let target = create_test_profile("t", "female");
        let candidate = create_test_profile("c", "male");
        assert!(is_eligible(&target, &candidate, &pairings()));
        assert!(is_eligible(&candidate, &target, &pairings()));
    }

    #[test]
    fn test_same_role_filtered() {
        let target = create_test_profile("t", "female");
        let candidate = create_test_profile("c", "female");
        assert!(!is_eligible(&target, &candidate, &pairings()));
    }

    #[test]
    fn test_unknown_role_filtered() {
        let target = create_test_profile("t", "female");
        let candidate = create_test_profile("c", "");
        assert!(!is_eligible(&target, &candidate, &pairings()));
        assert!(counterpart_roles("admin", &pairings()).is_empty());
    }

    #[test]
    fn test_self_filtered() {
        let target = create_test_profile("t", "female");
        let mut clone = target.clone();
        clone.role = "male".to_string();
        assert!(!is_eligible(&target, &clone, &pairings()));
    }
}
