//! Scoring protocol between the candidate store and ranking strategies.
//!
//! The store does no ranking of its own. A [`CandidateScorer`] receives a
//! consistent snapshot of every candidate and returns at most one winner.

use std::sync::Arc;

use crate::candidate::Candidate;
use crate::key::CandidateKey;

/// A ranking strategy.
pub trait CandidateScorer {
    /// The scorer's name, and perhaps important parameterization/version.
    fn identifier(&self) -> &str;

    /// Pick the best of `candidates`, or `None` if nothing is acceptable.
    fn score_candidates(&self, candidates: &[Arc<Candidate>]) -> Option<ScoredCandidate>;
}

/// A chosen candidate with a real-valued score and an error estimate.
///
/// Larger values are more desirable. The scale is local to the scorer that
/// produced it; scores from different scorers are not comparable. `err` is
/// on the same scale as `value` (a standard deviation, say) and is strictly
/// positive for a real choice.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub value: f64,
    pub err: f64,
    pub candidate_key: Option<CandidateKey>,
    /// The result reflects a user connect choice rather than a computed score.
    pub user_connect_choice_override: bool,
}

impl ScoredCandidate {
    /// No score.
    pub const NONE: ScoredCandidate = ScoredCandidate {
        value: f64::NEG_INFINITY,
        err: f64::INFINITY,
        candidate_key: None,
        user_connect_choice_override: false,
    };

    pub fn new(
        value: f64,
        err: f64,
        user_connect_choice_override: bool,
        candidate: Option<&Candidate>,
    ) -> Self {
        Self {
            value,
            err,
            candidate_key: candidate.map(|c| c.key().clone()),
            user_connect_choice_override,
        }
    }

    pub fn is_none(&self) -> bool {
        self.candidate_key.is_none()
    }
}

impl Default for ScoredCandidate {
    fn default() -> Self {
        Self::NONE
    }
}
