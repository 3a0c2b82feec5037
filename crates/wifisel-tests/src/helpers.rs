//! Shared builders and reference scorers for integration tests.

use std::sync::Arc;

use wifisel_core::types::{
    ChannelWidth, MacAddress, NetworkId, ScanDetail, SecurityType, Ssid, WifiConfiguration,
};
use wifisel_core::{Candidate, CandidateScorer, ScoredCandidate};

/// BSSID `02:00:00:00:<hi>:<lo>`.
pub fn bssid(seed: u16) -> MacAddress {
    let [hi, lo] = seed.to_be_bytes();
    MacAddress([0x02, 0, 0, 0, hi, lo])
}

/// AP MLD address `0a:00:00:00:00:<seed>`.
pub fn mld(seed: u8) -> MacAddress {
    MacAddress([0x0a, 0, 0, 0, 0, seed])
}

/// A PSK/SAE scan result on 5 GHz.
pub fn make_scan(ssid: &str, bssid_seed: u16, rssi: i32) -> ScanDetail {
    ScanDetail {
        bssid: bssid(bssid_seed).to_string(),
        ssid: Ssid::from(ssid),
        security_types: vec![SecurityType::Psk, SecurityType::Sae],
        rssi,
        frequency: 5180,
        channel_width: ChannelWidth::Mhz80,
        ap_mld_mac_address: None,
    }
}

/// A saved PSK configuration.
pub fn make_config(network_id: i32, ssid: &str) -> WifiConfiguration {
    WifiConfiguration::new(NetworkId(network_id), Ssid::from(ssid), SecurityType::Psk)
}

/// Picks the candidate with the highest predicted throughput.
pub struct ThroughputScorer;

impl CandidateScorer for ThroughputScorer {
    fn identifier(&self) -> &str {
        "throughput-v1"
    }

    fn score_candidates(&self, candidates: &[Arc<Candidate>]) -> Option<ScoredCandidate> {
        candidates
            .iter()
            .map(|c| {
                let mbps = c
                    .predicted_multi_link_throughput_mbps()
                    .max(c.predicted_throughput_mbps());
                (mbps, c)
            })
            .max_by_key(|(mbps, _)| *mbps)
            .map(|(mbps, c)| ScoredCandidate::new(f64::from(mbps), 1.0, false, Some(c)))
    }
}

/// Honours a user choice when one exists, otherwise declines.
pub struct UserChoiceScorer;

impl CandidateScorer for UserChoiceScorer {
    fn identifier(&self) -> &str {
        "user-choice-v1"
    }

    fn score_candidates(&self, candidates: &[Arc<Candidate>]) -> Option<ScoredCandidate> {
        candidates
            .iter()
            .filter(|c| c.is_user_selected())
            .max_by(|a, b| a.last_selection_weight().total_cmp(&b.last_selection_weight()))
            .map(|c| ScoredCandidate::new(c.last_selection_weight(), 0.1, true, Some(c)))
    }
}
