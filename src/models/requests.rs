use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use validator::Validate;

use crate::models::domain::UserProfile;

/// Candidate handed to the diversity reranker.
///
/// Only `match_score` and `tags` are read; every other field of the incoming
/// record is carried through untouched in `payload`. Missing or null scores
/// and tags fall back to 0 and the empty set so one bad record cannot sink a
/// batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub match_score: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: BTreeSet<String>,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl Candidate {
    pub fn new<I, S>(id: impl Into<String>, match_score: f64, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            match_score,
            tags: tags.into_iter().map(Into::into).collect(),
            payload: Map::new(),
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Request to rerank an already-scored batch
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RerankRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

/// Request to score a pool against one member and rerank the result
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecommendRequest {
    pub target: UserProfile,
    #[serde(default)]
    pub pool: Vec<UserProfile>,
    #[validate(range(min = 1, max = 100))]
    #[serde(default = "default_limit")]
    pub limit: u16,
}

fn default_limit() -> u16 {
    20
}
