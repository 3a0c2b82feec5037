//! Throughput estimation for multi-link (MLO) access points.
//!
//! Links that share an AP MLD address can be used simultaneously, so the
//! grouping step assigns every link of a group one aggregate estimate.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::candidate::Candidate;
use crate::types::Band;

/// Aggregate throughput for the links of one AP MLD.
pub trait MultiLinkThroughputEstimator {
    /// `links` is non-empty and shares one AP MLD address.
    fn estimate(&self, links: &[Arc<Candidate>]) -> u32;
}

/// Sum of the best single-link prediction on each band.
///
/// At most one link per band is active at a time, so duplicates on a band
/// contribute only their best member.
#[derive(Debug, Default, Clone, Copy)]
pub struct SummedLinkThroughput;

impl MultiLinkThroughputEstimator for SummedLinkThroughput {
    fn estimate(&self, links: &[Arc<Candidate>]) -> u32 {
        let mut best: BTreeMap<Band, u32> = BTreeMap::new();
        for link in links {
            let slot = best.entry(Band::from_frequency(link.frequency())).or_insert(0);
            *slot = (*slot).max(link.predicted_throughput_mbps());
        }
        best.values().fold(0u32, |acc, mbps| acc.saturating_add(*mbps))
    }
}
