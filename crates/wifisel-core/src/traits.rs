//! Contracts with the historical signal statistics service (scorecard).
//!
//! - [`ScoreCard`] — per-BSSID handle lookup (wifisel-scorecard implements)
//! - [`PerBssid`] — annotate and query one BSSID's history
//!
//! The scorecard is shared across selection passes, so both traits take
//! `&self` and implementations synchronize internally.

use std::fmt;
use std::sync::Arc;

use crate::signal::{SignalEvent, SignalStats};
use crate::types::{MacAddress, NetworkId, SecurityType, Ssid};

/// Lookup service for per-BSSID history.
pub trait ScoreCard: Send + Sync {
    /// Return the handle for `(ssid, bssid)`, creating it on first use.
    ///
    /// `None` means the scorecard keeps no history for this BSSID (for
    /// example because it is disabled); candidates then fall back to
    /// default estimates.
    fn lookup_bssid(&self, ssid: &Ssid, bssid: &MacAddress) -> Option<Arc<dyn PerBssid>>;
}

/// History of a single BSSID, owned by the scorecard.
pub trait PerBssid: Send + Sync + fmt::Debug {
    /// Record the security type the BSSID was last nominated with.
    fn set_security_type(&self, security_type: SecurityType);

    /// Record the configuration the BSSID was last nominated under.
    fn set_network_config_id(&self, network_id: NetworkId);

    /// Estimated probability (percent, `0..=100`) of reaching the internet.
    fn estimate_percent_internet_availability(&self) -> u8;

    /// Statistics for one event type observed on `frequency` (MHz).
    fn lookup_signal(&self, event: SignalEvent, frequency: u32) -> Option<SignalStats>;
}
