// Core algorithm exports
pub mod filters;
pub mod matcher;
pub mod reasons;
pub mod rerank;
pub mod scoring;
pub mod similarity;

pub use filters::{counterpart_roles, is_eligible};
pub use matcher::Matcher;
pub use reasons::generate_reasons;
pub use rerank::DiversityReranker;
pub use scoring::calculate_match_score;
pub use similarity::{cosine, jaccard, tag_jaccard};
