// Core algorithm exports
pub mod filters;
pub mod matcher;
pub mod scoring;

pub use filters::{normalize_preferences, preference_catalog, sharing_preferences};
pub use matcher::{MatchResult, Matcher};
pub use scoring::{match_score, shared_preferences};
