use crate::core::scoring::match_score;
use crate::models::{MatchedPair, Participant};

/// Result of one pairing run
///
/// Every input participant ends up in exactly one place: a pair or one of
/// the residual lists. Residuals keep their input order.
#[derive(Debug, Default)]
pub struct MatchResult {
    pub pairs: Vec<MatchedPair>,
    pub unmatched_mentors: Vec<Participant>,
    pub unmatched_mentees: Vec<Participant>,
}

/// Greedy mentor-priority pairing
///
/// # Algorithm
/// 1. Mentors are visited in input order.
/// 2. Each mentor scans the mentees still in the pool, in input order, and
///    scores each by shared preference count.
/// 3. The first mentee with the strictly highest score wins; later ties
///    never replace it.
/// 4. Any remaining mentee is acceptable, including one with score 0.
/// 5. The chosen mentee leaves the pool for good. There is no backtracking,
///    so an early mentor can claim a mentee a later mentor fits better.
///
/// Cost is O(M·N) score evaluations.
#[derive(Debug, Clone, Default)]
pub struct Matcher;

impl Matcher {
    pub fn new() -> Self {
        Self
    }

    /// Pair mentors with mentees
    ///
    /// # Arguments
    /// * `mentors` - Mentors in priority order
    /// * `mentees` - Candidate mentees in scan order
    pub fn match_pairs(&self, mentors: Vec<Participant>, mentees: Vec<Participant>) -> MatchResult {
        // Claimed mentees are taken out of their slot so indices stay stable
        let mut pool: Vec<Option<Participant>> = mentees.into_iter().map(Some).collect();
        let mut remaining = pool.len();

        let mut pairs = Vec::with_capacity(mentors.len().min(remaining));
        let mut unmatched_mentors = Vec::new();

        for mentor in mentors {
            if remaining == 0 {
                unmatched_mentors.push(mentor);
                continue;
            }

            let mut best: Option<(usize, usize)> = None;
            for (idx, slot) in pool.iter().enumerate() {
                let Some(mentee) = slot else { continue };
                let score = match_score(&mentor.preferences, &mentee.preferences);
                if best.map_or(true, |(_, best_score)| score > best_score) {
                    best = Some((idx, score));
                }
            }

            match best.and_then(|(idx, score)| pool[idx].take().map(|mentee| (mentee, score))) {
                Some((mentee, score)) => {
                    remaining -= 1;
                    tracing::trace!("Paired mentor {} with mentee {} (score {})", mentor.id, mentee.id, score);
                    pairs.push(MatchedPair { mentor, mentee, score });
                }
                None => unmatched_mentors.push(mentor),
            }
        }

        MatchResult {
            pairs,
            unmatched_mentors,
            unmatched_mentees: pool.into_iter().flatten().collect(),
        }
    }
}
