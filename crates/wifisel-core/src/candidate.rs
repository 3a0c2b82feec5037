//! Candidate records: one access-point observation per selection pass.
//!
//! A [`Candidate`] is immutable once built by the store. The one derived field,
//! the predicted multi-link throughput, is filled in by producing an updated
//! copy (see [`Candidate::with_predicted_multi_link_throughput_mbps`]) rather
//! than by mutating a shared record.

use std::fmt;
use std::sync::Arc;

use crate::bridge;
use crate::constants::WEIGHT_DISPLAY_SCALE;
use crate::key::CandidateKey;
use crate::signal::{SignalEvent, SignalStats};
use crate::traits::PerBssid;
use crate::types::{ChannelWidth, MacAddress, NetworkId, NominatorId, ScanDetail, WifiConfiguration};

/// Per-observation inputs to [`CandidateStore::add`](crate::candidates::CandidateStore::add).
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateParams {
    pub nominator_id: NominatorId,
    /// Signal strength in dBm.
    pub rssi: i32,
    /// Center frequency in MHz.
    pub frequency: u32,
    pub channel_width: ChannelWidth,
    /// Recency of the last user/app selection; clamped into `[0, 1]` on insert.
    pub last_selection_weight: f64,
    pub metered: bool,
    pub carrier_or_privileged: bool,
    pub predicted_throughput_mbps: u32,
    pub ap_mld_mac_address: Option<MacAddress>,
}

impl CandidateParams {
    /// Radio measurements taken from a scan result; everything else zeroed.
    pub fn from_scan(scan: &ScanDetail, nominator_id: NominatorId) -> Self {
        Self {
            nominator_id,
            rssi: scan.rssi,
            frequency: scan.frequency,
            channel_width: scan.channel_width,
            last_selection_weight: 0.0,
            metered: false,
            carrier_or_privileged: false,
            predicted_throughput_mbps: 0,
            ap_mld_mac_address: scan.ap_mld_mac_address,
        }
    }
}

/// Clamp into `[0, 1]`; NaN counts as "never selected".
pub(crate) fn clamp_weight(weight: f64) -> f64 {
    if weight.is_nan() { 0.0 } else { weight.clamp(0.0, 1.0) }
}

/// A connectable candidate.
#[derive(Debug, Clone)]
pub struct Candidate {
    key: CandidateKey,
    nominator_id: NominatorId,
    rssi: i32,
    frequency: u32,
    channel_width: ChannelWidth,
    last_selection_weight: f64,
    per_bssid: Option<Arc<dyn PerBssid>>,
    user_selected: bool,
    current_network: bool,
    current_bssid: bool,
    metered: bool,
    has_no_internet_access: bool,
    no_internet_access_expected: bool,
    open_network: bool,
    passpoint: bool,
    ephemeral: bool,
    trusted: bool,
    restricted: bool,
    oem_paid: bool,
    oem_private: bool,
    carrier_or_privileged: bool,
    ip_provisioning_timed_out: bool,
    predicted_throughput_mbps: u32,
    predicted_multi_link_throughput_mbps: u32,
    num_reboots_since_last_use: u32,
    estimated_percent_internet_availability: u8,
    ap_mld_mac_address: Option<MacAddress>,
}

impl Candidate {
    pub(crate) fn new(
        key: CandidateKey,
        config: &WifiConfiguration,
        params: CandidateParams,
        per_bssid: Option<Arc<dyn PerBssid>>,
        current_network: bool,
        current_bssid: bool,
        default_internet_availability: u8,
    ) -> Self {
        let estimated_percent_internet_availability =
            bridge::internet_availability(per_bssid.as_ref(), default_internet_availability);
        Self {
            key,
            nominator_id: params.nominator_id,
            rssi: params.rssi,
            frequency: params.frequency,
            channel_width: params.channel_width,
            last_selection_weight: clamp_weight(params.last_selection_weight),
            per_bssid,
            user_selected: config.user_selected,
            current_network,
            current_bssid,
            metered: params.metered,
            has_no_internet_access: config.has_no_internet_access,
            no_internet_access_expected: config.no_internet_access_expected,
            open_network: config.is_open_network(),
            passpoint: config.passpoint,
            ephemeral: config.ephemeral,
            trusted: config.trusted,
            restricted: config.restricted,
            oem_paid: config.oem_paid,
            oem_private: config.oem_private,
            carrier_or_privileged: params.carrier_or_privileged,
            ip_provisioning_timed_out: config.ip_provisioning_timed_out,
            predicted_throughput_mbps: params.predicted_throughput_mbps,
            predicted_multi_link_throughput_mbps: 0,
            num_reboots_since_last_use: config.num_reboots_since_last_use,
            estimated_percent_internet_availability,
            ap_mld_mac_address: params.ap_mld_mac_address,
        }
    }

    /// Copy of this record with the multi-link throughput estimate set.
    pub fn with_predicted_multi_link_throughput_mbps(&self, mbps: u32) -> Self {
        Self {
            predicted_multi_link_throughput_mbps: mbps,
            ..self.clone()
        }
    }

    pub fn key(&self) -> &CandidateKey {
        &self.key
    }

    pub fn network_config_id(&self) -> NetworkId {
        self.key.network_id
    }

    pub fn bssid(&self) -> MacAddress {
        self.key.bssid
    }

    pub fn nominator_id(&self) -> NominatorId {
        self.nominator_id
    }

    pub fn rssi(&self) -> i32 {
        self.rssi
    }

    pub fn frequency(&self) -> u32 {
        self.frequency
    }

    pub fn channel_width(&self) -> ChannelWidth {
        self.channel_width
    }

    /// 1.0 when the network was just selected by the user or an app, decaying
    /// towards 0.0.
    pub fn last_selection_weight(&self) -> f64 {
        self.last_selection_weight
    }

    pub fn is_user_selected(&self) -> bool {
        self.user_selected
    }

    /// Same configuration as the current connection.
    pub fn is_current_network(&self) -> bool {
        self.current_network
    }

    /// Same BSSID as the current connection.
    pub fn is_current_bssid(&self) -> bool {
        self.current_bssid
    }

    pub fn is_metered(&self) -> bool {
        self.metered
    }

    pub fn has_no_internet_access(&self) -> bool {
        self.has_no_internet_access
    }

    pub fn is_no_internet_access_expected(&self) -> bool {
        self.no_internet_access_expected
    }

    pub fn is_open_network(&self) -> bool {
        self.open_network
    }

    pub fn is_passpoint(&self) -> bool {
        self.passpoint
    }

    pub fn is_ephemeral(&self) -> bool {
        self.ephemeral
    }

    pub fn is_trusted(&self) -> bool {
        self.trusted
    }

    pub fn is_restricted(&self) -> bool {
        self.restricted
    }

    pub fn is_oem_paid(&self) -> bool {
        self.oem_paid
    }

    pub fn is_oem_private(&self) -> bool {
        self.oem_private
    }

    /// Suggested by a carrier or a privileged app.
    pub fn is_carrier_or_privileged(&self) -> bool {
        self.carrier_or_privileged
    }

    /// Network was marked local-only after IP provisioning timed out.
    pub fn is_ip_provisioning_timed_out(&self) -> bool {
        self.ip_provisioning_timed_out
    }

    pub fn predicted_throughput_mbps(&self) -> u32 {
        self.predicted_throughput_mbps
    }

    /// Aggregate throughput across the AP MLD's links; 0 until grouped.
    pub fn predicted_multi_link_throughput_mbps(&self) -> u32 {
        self.predicted_multi_link_throughput_mbps
    }

    pub fn num_reboots_since_last_use(&self) -> u32 {
        self.num_reboots_since_last_use
    }

    /// Percent `0..=100`.
    pub fn estimated_percent_internet_availability(&self) -> u8 {
        self.estimated_percent_internet_availability
    }

    pub fn ap_mld_mac_address(&self) -> Option<MacAddress> {
        self.ap_mld_mac_address
    }

    pub fn is_multi_link_capable(&self) -> bool {
        self.ap_mld_mac_address.is_some()
    }

    /// Scorecard statistics for `event` on this candidate's frequency.
    pub fn event_statistics(&self, event: SignalEvent) -> Option<SignalStats> {
        bridge::event_statistics(self.per_bssid.as_ref(), event, self.frequency)
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Candidate {{ config = {}, bssid = {}, freq = {}, channelWidth = {}, rssi = {}, \
             Mbps = {}, nominator = {}, pInternet = {}, numRebootsSinceLastUse = {}, ",
            self.network_config_id(),
            self.key.bssid,
            self.frequency,
            self.channel_width,
            self.rssi,
            self.predicted_throughput_mbps,
            self.nominator_id,
            self.estimated_percent_internet_availability,
            self.num_reboots_since_last_use,
        )?;
        if self.last_selection_weight != 0.0 {
            let rounded =
                (self.last_selection_weight * WEIGHT_DISPLAY_SCALE).round() / WEIGHT_DISPLAY_SCALE;
            write!(f, "lastSelectionWeight = {rounded}, ")?;
        }
        let flags = [
            (self.current_bssid, "connected, "),
            (self.current_network, "current, "),
        ];
        for (set, label) in flags {
            if set {
                f.write_str(label)?;
            }
        }
        f.write_str(if self.ephemeral { "ephemeral, " } else { "saved, " })?;
        let flags = [
            (self.trusted, "trusted, "),
            (self.restricted, "restricted, "),
            (self.oem_paid, "oemPaid, "),
            (self.oem_private, "oemPrivate, "),
            (self.carrier_or_privileged, "priv, "),
            (self.metered, "metered, "),
            (self.has_no_internet_access, "noInternet, "),
            (self.no_internet_access_expected, "noInternetExpected, "),
            (self.passpoint, "passpoint, "),
        ];
        for (set, label) in flags {
            if set {
                f.write_str(label)?;
            }
        }
        f.write_str(if self.open_network { "open }" } else { "secure }" })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::MatchInfo;
    use crate::types::{SecurityType, Ssid};

    fn key() -> CandidateKey {
        CandidateKey::new(
            MatchInfo {
                ssid: Ssid::from("home"),
                security_type: SecurityType::Psk,
            },
            MacAddress([0, 1, 2, 3, 4, 5]),
            NetworkId(7),
        )
    }

    fn params() -> CandidateParams {
        CandidateParams {
            nominator_id: NominatorId::SAVED,
            rssi: -55,
            frequency: 5180,
            channel_width: ChannelWidth::Mhz80,
            last_selection_weight: 0.0,
            metered: false,
            carrier_or_privileged: false,
            predicted_throughput_mbps: 400,
            ap_mld_mac_address: None,
        }
    }

    fn config() -> WifiConfiguration {
        WifiConfiguration::new(NetworkId(7), "home".into(), SecurityType::Psk)
    }

    #[test]
    fn weight_clamping() {
        assert_eq!(clamp_weight(1.5), 1.0);
        assert_eq!(clamp_weight(-0.3), 0.0);
        assert_eq!(clamp_weight(0.25), 0.25);
        assert_eq!(clamp_weight(f64::NAN), 0.0);
    }

    #[test]
    fn flags_copied_from_config() {
        let mut cfg = config();
        cfg.ephemeral = true;
        cfg.oem_paid = true;
        cfg.num_reboots_since_last_use = 3;
        let c = Candidate::new(key(), &cfg, params(), None, false, false, 50);
        assert!(c.is_ephemeral());
        assert!(c.is_oem_paid());
        assert!(!c.is_open_network());
        assert_eq!(c.num_reboots_since_last_use(), 3);
        assert_eq!(c.estimated_percent_internet_availability(), 50);
        assert!(c.event_statistics(SignalEvent::SignalPoll).is_none());
    }

    #[test]
    fn multi_link_update_is_a_copy() {
        let c = Candidate::new(key(), &config(), params(), None, false, false, 50);
        let updated = c.with_predicted_multi_link_throughput_mbps(1200);
        assert_eq!(c.predicted_multi_link_throughput_mbps(), 0);
        assert_eq!(updated.predicted_multi_link_throughput_mbps(), 1200);
        assert_eq!(updated.key(), c.key());
    }

    #[test]
    fn display_lists_set_flags() {
        let mut p = params();
        p.last_selection_weight = 0.12345;
        p.metered = true;
        let c = Candidate::new(key(), &config(), p, None, true, true, 50);
        let s = c.to_string();
        assert!(s.starts_with("Candidate { config = 7, bssid = 00:01:02:03:04:05"));
        assert!(s.contains("lastSelectionWeight = 0.123, "));
        assert!(s.contains("connected, current, saved, trusted, metered, "));
        assert!(s.ends_with("secure }"));
    }

    #[test]
    fn display_omits_zero_weight() {
        let c = Candidate::new(key(), &config(), params(), None, false, false, 50);
        assert!(!c.to_string().contains("lastSelectionWeight"));
    }
}
