//! Mentor Match - mentorship matching backend
//!
//! Accounts, preference profiles, private notes and profile pictures for
//! mentors and mentees, plus a greedy pairing pass that assigns each mentor
//! at most one mentee by shared preferences.

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{match_score, MatchResult, Matcher};
pub use crate::error::ApiError;
pub use crate::models::{MatchedPair, Participant, Role};
