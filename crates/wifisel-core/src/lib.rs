//! # wifisel-core
//! Candidate bookkeeping for one Wi-Fi network-selection pass.
//!
//! The ingestion pipeline feeds scan results and configurations into a
//! [`CandidateStore`], which deduplicates them by [`CandidateKey`], applies
//! nominator-priority replacement, groups multi-link access points, and
//! finally hands a snapshot to a pluggable [`CandidateScorer`].

pub mod bridge;
pub mod candidate;
pub mod candidates;
pub mod config;
pub mod constants;
pub mod error;
pub mod faults;
pub mod key;
pub mod multi_link;
pub mod scoring;
pub mod signal;
pub mod traits;
pub mod types;

pub use bridge::NullScoreCard;
pub use candidate::{Candidate, CandidateParams};
pub use candidates::CandidateStore;
pub use config::CandidatesConfig;
pub use error::{CandidateError, MacAddressError};
pub use key::{CandidateKey, MatchInfo};
pub use multi_link::{MultiLinkThroughputEstimator, SummedLinkThroughput};
pub use scoring::{CandidateScorer, ScoredCandidate};
pub use traits::{PerBssid, ScoreCard};
