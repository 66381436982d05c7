//! Match Engine - compatibility scoring for a matchmaking platform
//!
//! This library scores how well two members fit together, ranks a pool of
//! candidates for one member, and reranks scored batches so near-duplicate
//! profiles do not crowd the top of the list. It also ships the chat content
//! auditor and the field protection helpers used alongside the engine.

pub mod config;
pub mod core;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use core::{Matcher, DiversityReranker, calculate_match_score};
pub use models::{UserProfile, MatchResult, ScoreBreakdown, ScoringWeights, EngineTables, Candidate, RankedCandidate};
