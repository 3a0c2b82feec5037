//! Scorecard backed by a concurrent in-process map.
//!
//! Internet availability follows Laplace's rule of succession: each BSSID
//! starts from one success in two trials, every IP configuration success
//! adds a trial, and every validation success adds a success. An unseen
//! BSSID therefore estimates 50%.

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use wifisel_core::constants::MAX_INTERNET_AVAILABILITY_PERCENT;
use wifisel_core::signal::{SignalEvent, SignalStats};
use wifisel_core::types::{MacAddress, NetworkId, SecurityType, Ssid};
use wifisel_core::{PerBssid, ScoreCard};

/// Prior successes before any observation.
const PRIOR_SUCCESSES: u64 = 1;
/// Prior trials before any observation.
const PRIOR_TRIALS: u64 = 2;

/// One measurement taken when an event was observed.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct SignalSample {
    /// dBm.
    pub rssi: i32,
    pub link_speed_mbps: u32,
    /// Time since the start of the connection attempt.
    pub elapsed_ms: u64,
}

#[derive(Debug, Default)]
struct BssidState {
    security_type: Option<SecurityType>,
    network_id: Option<NetworkId>,
    signals: HashMap<(SignalEvent, u32), SignalStats>,
}

/// History for one `(ssid, bssid)` pair.
#[derive(Debug)]
pub struct PerBssidRecord {
    ssid: Ssid,
    bssid: MacAddress,
    state: Mutex<BssidState>,
}

impl PerBssidRecord {
    fn new(ssid: Ssid, bssid: MacAddress) -> Self {
        Self {
            ssid,
            bssid,
            state: Mutex::new(BssidState::default()),
        }
    }

    pub fn ssid(&self) -> &Ssid {
        &self.ssid
    }

    pub fn bssid(&self) -> MacAddress {
        self.bssid
    }

    pub fn security_type(&self) -> Option<SecurityType> {
        self.state.lock().security_type
    }

    pub fn network_id(&self) -> Option<NetworkId> {
        self.state.lock().network_id
    }

    /// Fold one observation of `event` on `frequency` into the history.
    pub fn record(&self, event: SignalEvent, frequency: u32, sample: SignalSample) {
        let mut state = self.state.lock();
        let stats = state
            .signals
            .entry((event, frequency))
            .or_insert_with(|| SignalStats::new(event, frequency));
        stats.rssi.update(f64::from(sample.rssi));
        stats.link_speed.update(f64::from(sample.link_speed_mbps));
        stats.elapsed_ms.update(sample.elapsed_ms as f64);
    }

    fn snapshot(&self) -> BssidSnapshot {
        let state = self.state.lock();
        let mut signals: Vec<SignalStats> = state.signals.values().cloned().collect();
        signals.sort_by_key(|s| (s.event, s.frequency));
        BssidSnapshot {
            ssid: self.ssid.clone(),
            bssid: self.bssid,
            security_type: state.security_type,
            network_id: state.network_id,
            signals,
        }
    }
}

impl PerBssid for PerBssidRecord {
    fn set_security_type(&self, security_type: SecurityType) {
        self.state.lock().security_type = Some(security_type);
    }

    fn set_network_config_id(&self, network_id: NetworkId) {
        self.state.lock().network_id = Some(network_id);
    }

    fn estimate_percent_internet_availability(&self) -> u8 {
        let state = self.state.lock();
        let mut trials = PRIOR_TRIALS;
        let mut successes = PRIOR_SUCCESSES;
        for stats in state.signals.values() {
            match stats.event {
                SignalEvent::IpConfigurationSuccess => trials += stats.elapsed_ms.count,
                SignalEvent::ValidationSuccess => successes += stats.elapsed_ms.count,
                _ => {}
            }
        }
        // Roaming can produce validations without a matching IP configuration.
        let percent = (successes as f64 * 100.0 / trials as f64).round();
        percent.clamp(0.0, f64::from(MAX_INTERNET_AVAILABILITY_PERCENT)) as u8
    }

    fn lookup_signal(&self, event: SignalEvent, frequency: u32) -> Option<SignalStats> {
        self.state.lock().signals.get(&(event, frequency)).cloned()
    }
}

/// Serializable view of one BSSID's history.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct BssidSnapshot {
    pub ssid: Ssid,
    pub bssid: MacAddress,
    pub security_type: Option<SecurityType>,
    pub network_id: Option<NetworkId>,
    pub signals: Vec<SignalStats>,
}

/// Scorecard holding per-BSSID history in memory.
///
/// Shared across selection passes; all methods take `&self`.
#[derive(Debug, Default)]
pub struct MemoryScoreCard {
    bssids: DashMap<(Ssid, MacAddress), Arc<PerBssidRecord>>,
}

impl MemoryScoreCard {
    pub fn new() -> Self {
        Self::default()
    }

    /// The record for `(ssid, bssid)`, created on first use.
    pub fn lookup(&self, ssid: &Ssid, bssid: &MacAddress) -> Arc<PerBssidRecord> {
        let entry = self
            .bssids
            .entry((ssid.clone(), *bssid))
            .or_insert_with(|| {
                debug!(%ssid, %bssid, "scorecard: new bssid record");
                Arc::new(PerBssidRecord::new(ssid.clone(), *bssid))
            });
        Arc::clone(entry.value())
    }

    /// The record for `(ssid, bssid)` if one exists.
    pub fn get(&self, ssid: &Ssid, bssid: &MacAddress) -> Option<Arc<PerBssidRecord>> {
        self.bssids
            .get(&(ssid.clone(), *bssid))
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Record a connection event for `(ssid, bssid)`.
    pub fn record_event(
        &self,
        ssid: &Ssid,
        bssid: &MacAddress,
        event: SignalEvent,
        frequency: u32,
        sample: SignalSample,
    ) {
        self.lookup(ssid, bssid).record(event, frequency, sample);
    }

    /// Number of tracked BSSIDs.
    pub fn len(&self) -> usize {
        self.bssids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bssids.is_empty()
    }

    /// Snapshot of every BSSID, ordered by `(ssid, bssid)`.
    pub fn snapshot(&self) -> Vec<BssidSnapshot> {
        let mut out: Vec<BssidSnapshot> =
            self.bssids.iter().map(|entry| entry.value().snapshot()).collect();
        out.sort_by(|a, b| (&a.ssid, a.bssid).cmp(&(&b.ssid, b.bssid)));
        out
    }
}

impl ScoreCard for MemoryScoreCard {
    fn lookup_bssid(&self, ssid: &Ssid, bssid: &MacAddress) -> Option<Arc<dyn PerBssid>> {
        let record: Arc<dyn PerBssid> = self.lookup(ssid, bssid);
        Some(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const IP_OK: SignalEvent = SignalEvent::IpConfigurationSuccess;
    const VALIDATED: SignalEvent = SignalEvent::ValidationSuccess;

    fn bssid(last: u8) -> MacAddress {
        MacAddress([0x02, 0, 0, 0, 0, last])
    }

    fn sample() -> SignalSample {
        SignalSample {
            rssi: -55,
            link_speed_mbps: 433,
            elapsed_ms: 1200,
        }
    }

    #[test]
    fn lookup_creates_once() {
        let card = MemoryScoreCard::new();
        let ssid = Ssid::from("home");
        let a = card.lookup(&ssid, &bssid(1));
        let b = card.lookup(&ssid, &bssid(1));
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(card.len(), 1);
        assert!(card.get(&ssid, &bssid(2)).is_none());
    }

    #[test]
    fn unseen_bssid_estimates_fifty() {
        let card = MemoryScoreCard::new();
        let record = card.lookup(&"home".into(), &bssid(1));
        assert_eq!(record.estimate_percent_internet_availability(), 50);
    }

    #[test]
    fn validations_raise_estimate() {
        let card = MemoryScoreCard::new();
        let ssid = Ssid::from("home");
        for _ in 0..8 {
            card.record_event(&ssid, &bssid(1), IP_OK, 5180, sample());
            card.record_event(&ssid, &bssid(1), VALIDATED, 5180, sample());
        }
        // (1 + 8) / (2 + 8)
        assert_eq!(card.lookup(&ssid, &bssid(1)).estimate_percent_internet_availability(), 90);
    }

    #[test]
    fn failed_validations_lower_estimate() {
        let card = MemoryScoreCard::new();
        let ssid = Ssid::from("cafe");
        for _ in 0..3 {
            card.record_event(&ssid, &bssid(1), IP_OK, 2437, sample());
        }
        // 1 / 5
        assert_eq!(card.lookup(&ssid, &bssid(1)).estimate_percent_internet_availability(), 20);
    }

    #[test]
    fn roaming_validations_are_capped() {
        let card = MemoryScoreCard::new();
        let ssid = Ssid::from("corp");
        for _ in 0..10 {
            card.record_event(&ssid, &bssid(1), VALIDATED, 5180, sample());
        }
        assert_eq!(card.lookup(&ssid, &bssid(1)).estimate_percent_internet_availability(), 100);
    }

    #[test]
    fn signals_keyed_by_event_and_frequency() {
        let card = MemoryScoreCard::new();
        let ssid = Ssid::from("home");
        card.record_event(&ssid, &bssid(1), SignalEvent::SignalPoll, 5180, sample());
        card.record_event(
            &ssid,
            &bssid(1),
            SignalEvent::SignalPoll,
            5180,
            SignalSample { rssi: -65, ..sample() },
        );
        let record = card.lookup(&ssid, &bssid(1));
        let stats = record.lookup_signal(SignalEvent::SignalPoll, 5180).unwrap();
        assert_eq!(stats.rssi.count, 2);
        assert_eq!(stats.rssi.mean(), Some(-60.0));
        assert!(record.lookup_signal(SignalEvent::SignalPoll, 2437).is_none());
        assert!(record.lookup_signal(SignalEvent::RoamSuccess, 5180).is_none());
    }

    #[test]
    fn annotations_recorded() {
        let card = MemoryScoreCard::new();
        let handle = card.lookup_bssid(&"home".into(), &bssid(1)).unwrap();
        handle.set_security_type(SecurityType::Sae);
        handle.set_network_config_id(NetworkId(4));
        let record = card.get(&"home".into(), &bssid(1)).unwrap();
        assert_eq!(record.security_type(), Some(SecurityType::Sae));
        assert_eq!(record.network_id(), Some(NetworkId(4)));
    }

    #[test]
    fn snapshot_serializes() {
        let card = MemoryScoreCard::new();
        card.record_event(&"b".into(), &bssid(2), SignalEvent::SignalPoll, 5180, sample());
        card.record_event(&"a".into(), &bssid(1), SignalEvent::SignalPoll, 2437, sample());
        let snap = card.snapshot();
        assert_eq!(snap.len(), 2);
        assert_eq!(snap[0].ssid, Ssid::from("a"));
        let json = serde_json::to_string(&snap).unwrap();
        let back: Vec<BssidSnapshot> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snap);
    }

    proptest! {
        #[test]
        fn estimate_stays_in_range(trials in 0u32..200, validations in 0u32..200) {
            let card = MemoryScoreCard::new();
            let ssid = Ssid::from("p");
            for _ in 0..trials {
                card.record_event(&ssid, &bssid(1), IP_OK, 5180, sample());
            }
            for _ in 0..validations {
                card.record_event(&ssid, &bssid(1), VALIDATED, 5180, sample());
            }
            let estimate = card.lookup(&ssid, &bssid(1)).estimate_percent_internet_availability();
            prop_assert!(estimate <= 100);
        }
    }
}
