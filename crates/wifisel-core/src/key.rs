//! Candidate identity keys and their resolution from scan results.
//!
//! A key is the 4-tuple (match info, BSSID, network id, security type). Two
//! observations of the same radio under the same configuration and security
//! type resolve to equal keys and therefore compete for one store slot.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CandidateError;
use crate::types::{MacAddress, NetworkId, ScanDetail, SecurityType, Ssid, WifiConfiguration};

/// Network-level identity: SSID plus the security type it is reached with.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MatchInfo {
    pub ssid: Ssid,
    pub security_type: SecurityType,
}

impl fmt::Display for MatchInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.ssid, self.security_type)
    }
}

/// Identity of one candidate within a selection pass.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CandidateKey {
    pub match_info: MatchInfo,
    pub bssid: MacAddress,
    pub network_id: NetworkId,
    pub security_type: SecurityType,
}

impl CandidateKey {
    /// Key whose security type is taken from the match info.
    pub fn new(match_info: MatchInfo, bssid: MacAddress, network_id: NetworkId) -> Self {
        let security_type = match_info.security_type;
        Self {
            match_info,
            bssid,
            network_id,
            security_type,
        }
    }

    /// Key with an explicitly negotiated security type.
    pub fn with_security_type(
        match_info: MatchInfo,
        bssid: MacAddress,
        network_id: NetworkId,
        security_type: SecurityType,
    ) -> Self {
        Self {
            match_info,
            bssid,
            network_id,
            security_type,
        }
    }
}

impl fmt::Display for CandidateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{}#{}:{}",
            self.match_info, self.bssid, self.network_id, self.security_type
        )
    }
}

/// Pick the security type a connection to `scan` under `config` would use.
///
/// The configuration's enabled options are tried in preference order; the
/// first one the access point advertises wins.
pub fn negotiate_security(scan: &ScanDetail, config: &WifiConfiguration) -> Option<SecurityType> {
    config
        .enabled_security_types()
        .find(|t| scan.security_types.contains(t))
}

/// Resolve the candidate key for a scan result under a configuration.
///
/// Fails when the configuration is missing, the BSSID does not parse, the
/// SSIDs disagree (skipped for Passpoint, which matches by provider), or the
/// two sides share no security type.
pub fn key_from_scan_detail(
    scan: &ScanDetail,
    config: Option<&WifiConfiguration>,
) -> Result<CandidateKey, CandidateError> {
    let config = config.ok_or(CandidateError::MissingConfig)?;
    let bssid = MacAddress::parse(&scan.bssid).map_err(|source| CandidateError::InvalidBssid {
        bssid: scan.bssid.clone(),
        source,
    })?;

    if !config.passpoint && scan.ssid != config.ssid {
        return Err(CandidateError::IdentityMismatch {
            scan: scan.ssid.clone(),
            config: config.ssid.clone(),
        });
    }

    let security_type =
        negotiate_security(scan, config).ok_or_else(|| CandidateError::NoCompatibleSecurity {
            scan: scan.security_types.clone(),
            config: config.enabled_security_types().collect(),
        })?;

    let match_info = MatchInfo {
        ssid: scan.ssid.clone(),
        security_type,
    };
    Ok(CandidateKey::with_security_type(
        match_info,
        bssid,
        config.network_id,
        security_type,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MacAddressError;
    use crate::types::{ChannelWidth, SecurityParams};

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    fn scan(ssid: &str, bssid: &str, security: &[SecurityType]) -> ScanDetail {
        ScanDetail {
            bssid: bssid.to_string(),
            ssid: ssid.into(),
            security_types: security.to_vec(),
            rssi: -60,
            frequency: 5180,
            channel_width: ChannelWidth::Mhz80,
            ap_mld_mac_address: None,
        }
    }

    fn config(id: i32, ssid: &str, security: SecurityType) -> WifiConfiguration {
        WifiConfiguration::new(NetworkId(id), ssid.into(), security)
    }

    // ------------------------------------------------------------------
    // Resolution
    // ------------------------------------------------------------------

    #[test]
    fn resolves_matching_pair() {
        let s = scan("home", "00:11:22:33:44:55", &[SecurityType::Psk]);
        let c = config(7, "home", SecurityType::Psk);
        let key = key_from_scan_detail(&s, Some(&c)).unwrap();
        assert_eq!(key.bssid.to_string(), "00:11:22:33:44:55");
        assert_eq!(key.network_id, NetworkId(7));
        assert_eq!(key.security_type, SecurityType::Psk);
        assert_eq!(key.match_info.ssid, Ssid::from("home"));
    }

    #[test]
    fn missing_config_fails() {
        let s = scan("home", "00:11:22:33:44:55", &[SecurityType::Psk]);
        assert_eq!(
            key_from_scan_detail(&s, None),
            Err(CandidateError::MissingConfig)
        );
    }

    #[test]
    fn bad_bssid_fails() {
        let s = scan("home", "00:11:22", &[SecurityType::Psk]);
        let c = config(7, "home", SecurityType::Psk);
        assert_eq!(
            key_from_scan_detail(&s, Some(&c)),
            Err(CandidateError::InvalidBssid {
                bssid: "00:11:22".into(),
                source: MacAddressError::WrongOctetCount(3),
            })
        );
    }

    #[test]
    fn ssid_mismatch_fails() {
        let s = scan("home", "00:11:22:33:44:55", &[SecurityType::Psk]);
        let c = config(7, "work", SecurityType::Psk);
        assert!(matches!(
            key_from_scan_detail(&s, Some(&c)),
            Err(CandidateError::IdentityMismatch { .. })
        ));
    }

    #[test]
    fn passpoint_skips_identity_check() {
        let s = scan("hotspot-x", "00:11:22:33:44:55", &[SecurityType::PasspointR3]);
        let mut c = config(3, "provider.example", SecurityType::PasspointR3);
        c.passpoint = true;
        let key = key_from_scan_detail(&s, Some(&c)).unwrap();
        assert_eq!(key.match_info.ssid, Ssid::from("hotspot-x"));
    }

    #[test]
    fn no_common_security_fails() {
        let s = scan("home", "00:11:22:33:44:55", &[SecurityType::Sae]);
        let c = config(7, "home", SecurityType::Psk);
        assert_eq!(
            key_from_scan_detail(&s, Some(&c)),
            Err(CandidateError::NoCompatibleSecurity {
                scan: vec![SecurityType::Sae],
                config: vec![SecurityType::Psk],
            })
        );
    }

    #[test]
    fn negotiation_follows_config_preference() {
        let s = scan("home", "00:11:22:33:44:55", &[SecurityType::Psk, SecurityType::Sae]);
        let mut c = config(7, "home", SecurityType::Sae);
        c.security_params.push(SecurityParams::new(SecurityType::Psk));
        assert_eq!(negotiate_security(&s, &c), Some(SecurityType::Sae));

        c.security_params[0].enabled = false;
        assert_eq!(negotiate_security(&s, &c), Some(SecurityType::Psk));
    }

    // ------------------------------------------------------------------
    // Equality
    // ------------------------------------------------------------------

    #[test]
    fn keys_differ_by_any_component() {
        let s = scan("home", "00:11:22:33:44:55", &[SecurityType::Psk, SecurityType::Sae]);
        let resolve = |id: i32, security: SecurityType| {
            key_from_scan_detail(&s, Some(&config(id, "home", security))).unwrap()
        };
        let base = resolve(7, SecurityType::Psk);
        assert_ne!(base, resolve(8, SecurityType::Psk));
        assert_ne!(base, resolve(7, SecurityType::Sae));
        assert_eq!(base, resolve(7, SecurityType::Psk));
    }
}
