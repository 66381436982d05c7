use std::sync::Arc;

use rayon::prelude::*;
use serde_json::{Map, Value};

use crate::core::{
    filters::{counterpart_roles, is_eligible},
    rerank::{descending, DiversityReranker},
    scoring::calculate_match_score,
};
use crate::models::{
    Candidate, EngineTables, FindMatchesResponse, MatchResult, RankedCandidate, ScoredProfile,
    ScoringWeights, UserProfile,
};

/// Main matching orchestrator
///
/// # Pipeline Stages
/// 1. Role pairing filter
/// 2. Parallel pairwise scoring against the target
/// 3. Ranking by total score
/// 4. Optional diversity reranking
///
/// Cloning is cheap: the lookup tables are shared.
#[derive(Debug, Clone)]
pub struct Matcher {
    weights: ScoringWeights,
    tables: Arc<EngineTables>,
    reranker: DiversityReranker,
}

impl Matcher {
    pub fn new(weights: ScoringWeights, tables: EngineTables) -> Self {
        Self {
            weights,
            tables: Arc::new(tables),
            reranker: DiversityReranker::default(),
        }
    }

    pub fn with_default_weights() -> Self {
        Self::new(ScoringWeights::default(), EngineTables::default())
    }

    pub fn with_reranker(mut self, reranker: DiversityReranker) -> Self {
        self.reranker = reranker;
        self
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    pub fn tables(&self) -> &EngineTables {
        &self.tables
    }

    pub fn reranker(&self) -> &DiversityReranker {
        &self.reranker
    }

    /// Score `viewee` as seen by `viewer`
    ///
    /// Not symmetric: see [`calculate_match_score`].
    pub fn score(&self, viewer: &UserProfile, viewee: &UserProfile) -> MatchResult {
        calculate_match_score(viewer, viewee, &self.weights, &self.tables)
    }

    /// Rerank an already-scored batch for diversity
    pub fn rerank(&self, candidates: Vec<Candidate>, requesting_user_id: &str) -> Vec<RankedCandidate> {
        self.reranker.rerank(candidates, requesting_user_id)
    }

    /// Find matches for a target member among a pre-fetched pool
    ///
    /// # Arguments
    /// * `target` - The member matches are computed for (the viewer)
    /// * `candidates` - Pool of potential matches
    /// * `limit` - Maximum number of matches to return
    ///
    /// # Returns
    /// Scored matches sorted by total score, best first
    pub fn find_matches(
        &self,
        target: &UserProfile,
        candidates: Vec<UserProfile>,
        limit: usize,
    ) -> FindMatchesResponse {
        let total_candidates = candidates.len();

        if counterpart_roles(&target.role, &self.tables.role_pairings).is_empty() {
            tracing::warn!(
                "User {} has role {:?} with no configured pairing, returning no matches",
                target.user_id,
                target.role
            );
            return FindMatchesResponse {
                matches: Vec::new(),
                total_candidates,
            };
        }

        let mut matches: Vec<ScoredProfile> = candidates
            .into_par_iter()
            // Stage 1: role pairing
            .filter(|profile| is_eligible(target, profile, &self.tables.role_pairings))
            // Stage 2: scoring
            .map(|profile| {
                let result = self.score(target, &profile);
                ScoredProfile {
                    user_id: profile.user_id,
                    result,
                    tags: profile.interests,
                }
            })
            .collect();

        // Stage 3: rank by score (descending), keeping pool order on ties
        matches.sort_by(|a, b| descending(a.result.total_score, b.result.total_score));

        tracing::debug!(
            "Scored {} of {} candidates for {}",
            matches.len(),
            total_candidates,
            target.user_id
        );

        matches.truncate(limit);

        FindMatchesResponse {
            matches,
            total_candidates,
        }
    }

    /// Find matches, then rerank them for diversity using interests as tags
    pub fn recommend(
        &self,
        target: &UserProfile,
        candidates: Vec<UserProfile>,
        limit: usize,
    ) -> Vec<RankedCandidate> {
        let found = self.find_matches(target, candidates, limit);

        let batch = found
            .matches
            .into_iter()
            .map(scored_to_candidate)
            .collect();

        self.rerank(batch, &target.user_id)
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_weights()
    }
}

/// Convert a scored profile into a reranker candidate, keeping the score
/// details in the payload
fn scored_to_candidate(scored: ScoredProfile) -> Candidate {
    let mut payload = Map::new();
    if let Ok(detail) = serde_json::to_value(scored.result.breakdown) {
        payload.insert("detailScores".to_string(), detail);
    }
    payload.insert(
        "matchReasons".to_string(),
        Value::from(scored.result.reasons),
    );

    Candidate {
        id: scored.user_id,
        match_score: scored.result.total_score,
        tags: scored.tags.into_iter().collect(),
        payload,
    }
}
