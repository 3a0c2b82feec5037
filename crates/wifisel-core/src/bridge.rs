//! Adapter between candidate records and the scorecard.

use std::sync::Arc;

use tracing::trace;

use crate::constants::MAX_INTERNET_AVAILABILITY_PERCENT;
use crate::key::CandidateKey;
use crate::signal::{SignalEvent, SignalStats};
use crate::traits::{PerBssid, ScoreCard};
use crate::types::{MacAddress, NetworkId, Ssid};

/// Look up (or create) the handle for `key` and annotate it with the
/// negotiated security type and configuration id.
///
/// The annotation is a side effect on the shared scorecard that outlives the
/// selection pass.
pub(crate) fn attach(
    scorecard: &dyn ScoreCard,
    key: &CandidateKey,
    network_id: NetworkId,
) -> Option<Arc<dyn PerBssid>> {
    let handle = scorecard.lookup_bssid(&key.match_info.ssid, &key.bssid)?;
    handle.set_security_type(key.security_type);
    handle.set_network_config_id(network_id);
    trace!(%key, %network_id, "scorecard: handle attached");
    Some(handle)
}

pub(crate) fn internet_availability(handle: Option<&Arc<dyn PerBssid>>, default: u8) -> u8 {
    handle
        .map(|h| h.estimate_percent_internet_availability())
        .unwrap_or(default)
        .min(MAX_INTERNET_AVAILABILITY_PERCENT)
}

pub(crate) fn event_statistics(
    handle: Option<&Arc<dyn PerBssid>>,
    event: SignalEvent,
    frequency: u32,
) -> Option<SignalStats> {
    handle?.lookup_signal(event, frequency)
}

/// A scorecard that keeps no history.
///
/// Every candidate built against it reports the default internet
/// availability and no event statistics.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullScoreCard;

impl ScoreCard for NullScoreCard {
    fn lookup_bssid(&self, _ssid: &Ssid, _bssid: &MacAddress) -> Option<Arc<dyn PerBssid>> {
        None
    }
}
