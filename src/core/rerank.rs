//! Diversity-aware reranking of an already-scored candidate batch.
//!
//! The pass runs in three phases so each one can be checked on its own:
//! 1. stable sort by raw `match_score`
//! 2. one forward walk that penalises tags already seen higher up
//! 3. stable sort by the penalised `final_score`
//!
//! Phase 2 is inherently sequential: every penalty depends on the tags of
//! all candidates ranked above it.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::models::{Candidate, RankedCandidate};

pub const DEFAULT_PENALTY_PER_TAG: f64 = 0.1;
pub const DEFAULT_TOP_N: usize = 10;

const FINAL_SCORE_FIELD: &str = "final_score";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiversityReranker {
    penalty_per_tag: f64,
    top_n: usize,
}

impl DiversityReranker {
    pub fn new(penalty_per_tag: f64, top_n: usize) -> Self {
        Self {
            penalty_per_tag,
            top_n,
        }
    }

    pub fn penalty_per_tag(&self) -> f64 {
        self.penalty_per_tag
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    /// Rerank candidates and keep the top N by penalised score
    ///
    /// `requesting_user_id` is accepted for personalisation but does not
    /// influence the penalty yet.
    pub fn rerank(&self, candidates: Vec<Candidate>, requesting_user_id: &str) -> Vec<RankedCandidate> {
        let total = candidates.len();

        let candidates = candidates
            .into_iter()
            .map(|mut candidate| {
                if candidate.match_score.is_nan() {
                    candidate.match_score = 0.0;
                }
                candidate
            })
            .collect();

        let ranked = sort_by_match_score(candidates);
        let penalised = self.apply_diversity_penalty(ranked);
        let mut reranked = sort_by_final_score(penalised);
        reranked.truncate(self.top_n);

        tracing::debug!(
            "Reranked {} candidates for {} (kept {})",
            total,
            requesting_user_id,
            reranked.len()
        );

        reranked
    }

    /// Attach a final score to each candidate in the given order
    ///
    /// Each candidate loses `penalty_per_tag` for every tag that appeared on
    /// any candidate before it. A `final_score` left over from an earlier
    /// pass is replaced.
    pub fn apply_diversity_penalty(&self, ranked: Vec<Candidate>) -> Vec<RankedCandidate> {
        let mut seen_tags: HashSet<String> = HashSet::new();

        ranked
            .into_iter()
            .map(|mut candidate| {
                candidate.payload.remove(FINAL_SCORE_FIELD);

                let overlap = candidate
                    .tags
                    .iter()
                    .filter(|tag| seen_tags.contains(tag.as_str()))
                    .count();
                let final_score = candidate.match_score - overlap as f64 * self.penalty_per_tag;

                seen_tags.extend(candidate.tags.iter().cloned());

                RankedCandidate {
                    candidate,
                    final_score,
                }
            })
            .collect()
    }
}

impl Default for DiversityReranker {
    fn default() -> Self {
        Self::new(DEFAULT_PENALTY_PER_TAG, DEFAULT_TOP_N)
    }
}

/// Stable sort by raw match score (descending)
pub fn sort_by_match_score(mut candidates: Vec<Candidate>) -> Vec<Candidate> {
    candidates.sort_by(|a, b| descending(a.match_score, b.match_score));
    candidates
}

/// Stable sort by final score (descending)
pub fn sort_by_final_score(mut ranked: Vec<RankedCandidate>) -> Vec<RankedCandidate> {
    ranked.sort_by(|a, b| descending(a.final_score, b.final_score));
    ranked
}

/// Descending order over scores; NaN ranks as 0
#[inline]
pub(crate) fn descending(a: f64, b: f64) -> Ordering {
    let key = |score: f64| if score.is_nan() { 0.0 } else { score };
    key(b).total_cmp(&key(a))
}
