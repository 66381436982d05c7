// Model exports
pub mod domain;
pub mod requests;
pub mod responses;
pub mod tables;

pub use domain::{UserProfile, AppearancePreference, MatchResult, ScoreBreakdown, ScoringWeights, DEFAULT_AI_SCORE, NORMAL_TIER};
pub use requests::{Candidate, RerankRequest, RecommendRequest};
pub use responses::{RankedCandidate, ScoredProfile, FindMatchesResponse};
pub use tables::{EngineTables, BonusTable, RolePairing, ValuesMetric};
