//! Candidate store configuration.

use crate::constants::{
    DEFAULT_INTERNET_AVAILABILITY_PERCENT, EXPECTED_LINKS_PER_NETWORK,
    MAX_INTERNET_AVAILABILITY_PERCENT,
};

/// Configuration for a [`CandidateStore`](crate::candidates::CandidateStore).
#[derive(Debug, Clone, PartialEq)]
pub struct CandidatesConfig {
    /// Return soft faults to the caller as errors instead of only recording them.
    pub picky: bool,
    /// Internet availability (percent) used when no scorecard handle exists.
    pub default_internet_availability: u8,
    /// Initial capacity of each per-network group.
    pub expected_links_per_network: usize,
}

impl Default for CandidatesConfig {
    fn default() -> Self {
        Self {
            picky: false,
            default_internet_availability: DEFAULT_INTERNET_AVAILABILITY_PERCENT,
            expected_links_per_network: EXPECTED_LINKS_PER_NETWORK,
        }
    }
}

impl CandidatesConfig {
    /// Best-effort ingestion: faults are recorded and skipped.
    pub fn lenient() -> Self {
        Self::default()
    }

    /// Fail-fast ingestion for tests and strict callers.
    pub fn strict() -> Self {
        Self {
            picky: true,
            ..Self::default()
        }
    }

    /// Default internet availability clamped into `0..=100`.
    pub fn default_internet_availability(&self) -> u8 {
        self.default_internet_availability
            .min(MAX_INTERNET_AVAILABILITY_PERCENT)
    }
}
