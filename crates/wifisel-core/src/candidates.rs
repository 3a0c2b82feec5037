//! Candidate store for one network-selection pass.
//!
//! The store provides:
//! - At most one candidate per [`CandidateKey`], with nominator-priority
//!   replacement (a lower nominator id is never displaced by a higher one)
//! - A multi-link index: AP MLD address → candidates in insertion order
//! - Grouping by network configuration id
//! - The [`choose`](CandidateStore::choose) handoff to a [`CandidateScorer`]
//!
//! Validation failures go through the store's [`FaultLedger`]. In lenient mode
//! they are recorded and the operation returns its empty result; in picky mode
//! the error is also returned.
//!
//! Not thread-safe. A store belongs to one selection pass on one thread;
//! callers must synchronize externally if they share it.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::bridge;
use crate::candidate::{Candidate, CandidateParams};
use crate::config::CandidatesConfig;
use crate::error::CandidateError;
use crate::faults::FaultLedger;
use crate::key::{self, CandidateKey};
use crate::multi_link::MultiLinkThroughputEstimator;
use crate::scoring::{CandidateScorer, ScoredCandidate};
use crate::traits::ScoreCard;
use crate::types::{MacAddress, NetworkId, NominatorId, ScanDetail, WifiConfiguration};

/// Candidates considered during one selection pass.
pub struct CandidateStore {
    scorecard: Arc<dyn ScoreCard>,
    config: CandidatesConfig,
    /// Primary storage: key → candidate.
    candidates: BTreeMap<CandidateKey, Arc<Candidate>>,
    /// AP MLD address → affiliated candidates, in insertion order.
    ///
    /// Every candidate listed here is also in `candidates`, and every
    /// multi-link capable candidate in `candidates` is listed here exactly once.
    multi_link: BTreeMap<MacAddress, Vec<Arc<Candidate>>>,
    current_network_id: NetworkId,
    current_bssid: Option<MacAddress>,
    faults: FaultLedger,
}

impl CandidateStore {
    /// Create an empty store.
    pub fn new(scorecard: Arc<dyn ScoreCard>, config: CandidatesConfig) -> Self {
        let faults = FaultLedger::new(config.picky);
        Self {
            scorecard,
            config,
            candidates: BTreeMap::new(),
            multi_link: BTreeMap::new(),
            current_network_id: NetworkId::INVALID,
            current_bssid: None,
            faults,
        }
    }

    /// Create a store pre-seeded with existing candidates.
    ///
    /// Seeds are indexed as-is; replacement policy does not apply between
    /// them, so a later seed with an equal key wins.
    pub fn with_candidates(
        scorecard: Arc<dyn ScoreCard>,
        config: CandidatesConfig,
        seeds: impl IntoIterator<Item = Arc<Candidate>>,
    ) -> Self {
        let mut store = Self::new(scorecard, config);
        for candidate in seeds {
            if let Some(old) = store.candidates.get(candidate.key()).cloned() {
                store.remove(&old);
            }
            store.insert_indexed(candidate);
        }
        store
    }

    /// Toggle picky mode.
    pub fn set_picky(&mut self, picky: bool) -> &mut Self {
        self.config.picky = picky;
        self.faults.set_picky(picky);
        self
    }

    pub fn config(&self) -> &CandidatesConfig {
        &self.config
    }

    /// Record the currently connected network.
    ///
    /// The current-network and current-BSSID flags of candidates are computed
    /// from this at insertion time and are not revisited afterwards. An
    /// unparseable BSSID is a fault and leaves the current BSSID unset.
    pub fn set_current(
        &mut self,
        network_id: NetworkId,
        bssid: Option<&str>,
    ) -> Result<(), CandidateError> {
        self.current_network_id = network_id;
        self.current_bssid = None;
        let Some(bssid) = bssid else {
            return Ok(());
        };
        match MacAddress::parse(bssid) {
            Ok(mac) => {
                self.current_bssid = Some(mac);
                Ok(())
            }
            Err(source) => self.faults.record(CandidateError::InvalidCurrentBssid {
                bssid: bssid.to_string(),
                source,
            }),
        }
    }

    pub fn current_network_id(&self) -> NetworkId {
        self.current_network_id
    }

    pub fn current_bssid(&self) -> Option<MacAddress> {
        self.current_bssid
    }

    /// Resolve the key for a scan result, recording any failure.
    ///
    /// Returns `Ok(None)` for a recorded fault in lenient mode.
    pub fn key_from_scan_detail(
        &mut self,
        scan: &ScanDetail,
        config: Option<&WifiConfiguration>,
    ) -> Result<Option<CandidateKey>, CandidateError> {
        match key::key_from_scan_detail(scan, config) {
            Ok(key) => Ok(Some(key)),
            Err(fault) => {
                debug!(
                    bssid = %scan.bssid,
                    ssid = %scan.ssid,
                    "candidates: key resolution failed"
                );
                self.faults.record(fault).map(|()| None)
            }
        }
    }

    /// Add a candidate straight from a scan result.
    ///
    /// Returns `Ok(true)` if added or replaced, `Ok(false)` if the key did not
    /// resolve (lenient mode) or a higher-priority nominator already holds it.
    pub fn add_scan(
        &mut self,
        scan: &ScanDetail,
        config: Option<&WifiConfiguration>,
        nominator_id: NominatorId,
        last_selection_weight: f64,
        metered: bool,
        predicted_throughput_mbps: u32,
    ) -> Result<bool, CandidateError> {
        let Some(key) = self.key_from_scan_detail(scan, config)? else {
            return Ok(false);
        };
        // Key resolution succeeded, so the configuration is present.
        let Some(config) = config else {
            return Ok(false);
        };
        let params = CandidateParams {
            last_selection_weight,
            metered,
            predicted_throughput_mbps,
            ..CandidateParams::from_scan(scan, nominator_id)
        };
        Ok(self.add(key, config, params))
    }

    /// Add a candidate under an already-resolved key.
    ///
    /// If a candidate with the same key exists and `params.nominator_id` is
    /// strictly greater (lower priority), nothing changes and `false` is
    /// returned. Otherwise the old candidate is removed and the new one takes
    /// its place. Equal nominator ids replace.
    pub fn add(
        &mut self,
        key: CandidateKey,
        config: &WifiConfiguration,
        params: CandidateParams,
    ) -> bool {
        if let Some(old) = self.candidates.get(&key).cloned() {
            if params.nominator_id > old.nominator_id() {
                debug!(
                    %key,
                    nominator = %params.nominator_id,
                    existing = %old.nominator_id(),
                    "candidates: lower-priority nominator rejected"
                );
                return false;
            }
            debug!(%key, nominator = %params.nominator_id, "candidates: replacing candidate");
            self.remove(&old);
        }

        let per_bssid = bridge::attach(self.scorecard.as_ref(), &key, config.network_id);
        let current_network = config.network_id == self.current_network_id;
        let current_bssid = self.current_bssid == Some(key.bssid);
        let candidate = Candidate::new(
            key,
            config,
            params,
            per_bssid,
            current_network,
            current_bssid,
            self.config.default_internet_availability(),
        );
        trace!(%candidate, "candidates: added");
        self.insert_indexed(Arc::new(candidate));
        true
    }

    /// Insert into the primary map and, if multi-link capable, the MLD index.
    fn insert_indexed(&mut self, candidate: Arc<Candidate>) {
        if let Some(mld) = candidate.ap_mld_mac_address() {
            self.multi_link
                .entry(mld)
                .or_default()
                .push(Arc::clone(&candidate));
        }
        self.candidates.insert(candidate.key().clone(), candidate);
    }

    /// Remove a candidate.
    ///
    /// Succeeds only if `candidate` is the very record stored under its key;
    /// a record from another store (or a stale copy) returns `false` and is
    /// not a fault.
    pub fn remove(&mut self, candidate: &Arc<Candidate>) -> bool {
        let key = candidate.key();
        match self.candidates.get(key) {
            Some(stored) if Arc::ptr_eq(stored, candidate) => {}
            _ => return false,
        }
        self.candidates.remove(key);
        if let Some(mld) = candidate.ap_mld_mac_address() {
            if let Some(group) = self.multi_link.get_mut(&mld) {
                group.retain(|c| !Arc::ptr_eq(c, candidate));
                if group.is_empty() {
                    self.multi_link.remove(&mld);
                }
            }
        }
        true
    }

    /// Number of candidates (at the BSSID level).
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn get(&self, key: &CandidateKey) -> Option<&Arc<Candidate>> {
        self.candidates.get(key)
    }

    /// Snapshot of all candidates, ordered by key.
    pub fn candidates(&self) -> Vec<Arc<Candidate>> {
        self.candidates.values().cloned().collect()
    }

    /// Candidates partitioned by network configuration id.
    ///
    /// Rebuilt on every call.
    pub fn grouped_candidates(&self) -> Vec<Vec<Arc<Candidate>>> {
        let mut by_network: BTreeMap<NetworkId, Vec<Arc<Candidate>>> = BTreeMap::new();
        for candidate in self.candidates.values() {
            by_network
                .entry(candidate.network_config_id())
                .or_insert_with(|| Vec::with_capacity(self.config.expected_links_per_network))
                .push(Arc::clone(candidate));
        }
        by_network.into_values().collect()
    }

    /// All multi-link groups.
    pub fn multi_link_candidates(&self) -> impl Iterator<Item = &[Arc<Candidate>]> + '_ {
        self.multi_link.values().map(Vec::as_slice)
    }

    /// The multi-link group of one AP MLD, or `None` if it has no candidates.
    pub fn multi_link_candidates_for(&self, mld: &MacAddress) -> Option<&[Arc<Candidate>]> {
        self.multi_link.get(mld).map(Vec::as_slice)
    }

    /// Fill in the multi-link throughput of every grouped candidate.
    ///
    /// Each record is replaced by an updated copy in both indices; group order
    /// is preserved. Returns the number of candidates updated.
    pub fn update_multi_link_throughput(
        &mut self,
        estimator: &dyn MultiLinkThroughputEstimator,
    ) -> usize {
        let mut updated = 0;
        for (mld, group) in self.multi_link.iter_mut() {
            let mbps = estimator.estimate(group.as_slice());
            debug!(%mld, links = group.len(), mbps, "candidates: multi-link throughput");
            for slot in group.iter_mut() {
                let next = Arc::new(slot.with_predicted_multi_link_throughput_mbps(mbps));
                self.candidates.insert(next.key().clone(), Arc::clone(&next));
                *slot = next;
                updated += 1;
            }
        }
        updated
    }

    /// Choose among the candidates with `scorer`.
    ///
    /// Returns the scorer's choice, or [`ScoredCandidate::NONE`].
    pub fn choose(&self, scorer: &dyn CandidateScorer) -> ScoredCandidate {
        let snapshot = self.candidates();
        trace!(scorer = scorer.identifier(), count = snapshot.len(), "candidates: choosing");
        let choice = scorer
            .score_candidates(&snapshot)
            .unwrap_or(ScoredCandidate::NONE);
        if let Some(key) = &choice.candidate_key {
            if choice.err.is_nan() || choice.err <= 0.0 {
                warn!(
                    scorer = scorer.identifier(),
                    %key,
                    err = choice.err,
                    "candidates: non-positive error estimate"
                );
            }
        }
        choice
    }

    /// The most recently recorded fault.
    pub fn last_fault(&self) -> Option<&CandidateError> {
        self.faults.last_fault()
    }

    pub fn fault_count(&self) -> u32 {
        self.faults.fault_count()
    }

    pub fn clear_faults(&mut self) {
        self.faults.clear();
    }
}
