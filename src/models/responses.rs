use serde::{Deserialize, Serialize};

use crate::models::domain::MatchResult;
use crate::models::requests::Candidate;

/// Candidate after diversity reranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCandidate {
    #[serde(flatten)]
    pub candidate: Candidate,
    pub final_score: f64,
}

/// One pool member scored against the target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredProfile {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(flatten)]
    pub result: MatchResult,
    /// Interests of the scored member, used as diversity tags
    pub tags: Vec<String>,
}

/// Response for a batch match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindMatchesResponse {
    pub matches: Vec<ScoredProfile>,
    pub total_candidates: usize,
}
