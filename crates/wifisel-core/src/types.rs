//! Value types shared by the candidate store and its collaborators.
//!
//! Radio measurements use the units the scan pipeline reports them in:
//! RSSI in dBm, frequencies in MHz, throughput in Mbps.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::MacAddressError;

/// A 48-bit IEEE 802 MAC address.
///
/// Used both for BSSIDs and for AP MLD addresses. Parses the colon-separated
/// hex form (`aa:bb:cc:dd:ee:ff`, case-insensitive) and always displays
/// lowercase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct MacAddress(pub [u8; 6]);

impl MacAddress {
    /// The all-zero address.
    pub const ZERO: Self = Self([0u8; 6]);

    /// Create a MacAddress from raw octets.
    pub fn from_bytes(bytes: [u8; 6]) -> Self {
        Self(bytes)
    }

    /// Return the underlying octets.
    pub fn as_bytes(&self) -> &[u8; 6] {
        &self.0
    }

    /// Parse the colon-separated textual form.
    pub fn parse(s: &str) -> Result<Self, MacAddressError> {
        if s.is_empty() {
            return Err(MacAddressError::Empty);
        }
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() != 6 {
            return Err(MacAddressError::WrongOctetCount(parts.len()));
        }
        let mut bytes = [0u8; 6];
        for (slot, part) in bytes.iter_mut().zip(&parts) {
            if part.len() != 2 {
                return Err(MacAddressError::InvalidOctet(part.to_string()));
            }
            let mut octet = [0u8; 1];
            hex::decode_to_slice(part, &mut octet)
                .map_err(|_| MacAddressError::InvalidOctet(part.to_string()))?;
            *slot = octet[0];
        }
        Ok(Self(bytes))
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = &self.0;
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            b[0], b[1], b[2], b[3], b[4], b[5]
        )
    }
}

impl FromStr for MacAddress {
    type Err = MacAddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<[u8; 6]> for MacAddress {
    fn from(bytes: [u8; 6]) -> Self {
        Self(bytes)
    }
}

impl Serialize for MacAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MacAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Network name as advertised in beacons and stored in configurations.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[serde(transparent)]
pub struct Ssid(pub String);

impl Ssid {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ssid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.0)
    }
}

impl From<&str> for Ssid {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

/// Saved-network configuration id. Negative values mean "no configuration".
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct NetworkId(pub i32);

impl NetworkId {
    /// Sentinel for "not associated with any configuration".
    pub const INVALID: Self = Self(-1);

    pub fn is_valid(&self) -> bool {
        self.0 >= 0
    }
}

impl Default for NetworkId {
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies the nominator that proposed a candidate.
///
/// Ordering encodes priority: a lower id outranks a higher one when two
/// nominators report the same candidate.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[serde(transparent)]
pub struct NominatorId(pub u8);

impl NominatorId {
    /// Saved networks.
    pub const SAVED: Self = Self(0);
    /// App-provided network suggestions.
    pub const SUGGESTION: Self = Self(1);
    /// Networks surfaced by an external network scorer.
    pub const SCORED: Self = Self(4);
    /// The currently connected network. Always lowest priority.
    pub const CURRENT: Self = Self(5);
}

impl fmt::Display for NominatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Security type negotiated between a scan result and a configuration.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum SecurityType {
    Open,
    Wep,
    Psk,
    Eap,
    Sae,
    Owe,
    WapiPsk,
    WapiCert,
    EapWpa3Enterprise,
    EapWpa3Enterprise192,
    PasspointR1R2,
    PasspointR3,
    Dpp,
}

impl SecurityType {
    /// Whether traffic on this network is unauthenticated.
    ///
    /// OWE encrypts but does not authenticate, so it counts as open.
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open | Self::Owe)
    }
}

impl fmt::Display for SecurityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Open => "OPEN",
            Self::Wep => "WEP",
            Self::Psk => "PSK",
            Self::Eap => "EAP",
            Self::Sae => "SAE",
            Self::Owe => "OWE",
            Self::WapiPsk => "WAPI_PSK",
            Self::WapiCert => "WAPI_CERT",
            Self::EapWpa3Enterprise => "EAP_WPA3_ENTERPRISE",
            Self::EapWpa3Enterprise192 => "EAP_WPA3_ENTERPRISE_192_BIT",
            Self::PasspointR1R2 => "PASSPOINT_R1_R2",
            Self::PasspointR3 => "PASSPOINT_R3",
            Self::Dpp => "DPP",
        };
        f.write_str(name)
    }
}

/// Operating channel width.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum ChannelWidth {
    #[default]
    Mhz20,
    Mhz40,
    Mhz80,
    Mhz160,
    Mhz80Plus80,
    Mhz320,
}

impl fmt::Display for ChannelWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Mhz20 => "20MHz",
            Self::Mhz40 => "40MHz",
            Self::Mhz80 => "80MHz",
            Self::Mhz160 => "160MHz",
            Self::Mhz80Plus80 => "80+80MHz",
            Self::Mhz320 => "320MHz",
        };
        f.write_str(name)
    }
}

/// Radio band a center frequency falls in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Band {
    Ghz2_4,
    Ghz5,
    Ghz6,
    Ghz60,
    Unknown,
}

impl Band {
    /// Classify a center frequency in MHz.
    pub fn from_frequency(frequency: u32) -> Self {
        match frequency {
            2400..=2500 => Self::Ghz2_4,
            4900..=5900 => Self::Ghz5,
            5925..=7125 => Self::Ghz6,
            58320..=70200 => Self::Ghz60,
            _ => Self::Unknown,
        }
    }
}

/// One access point as reported by a scan.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ScanDetail {
    /// BSSID exactly as reported by the driver; parsed during key resolution.
    pub bssid: String,
    pub ssid: Ssid,
    /// Security types advertised in the beacon.
    pub security_types: Vec<SecurityType>,
    /// Signal strength in dBm.
    pub rssi: i32,
    /// Center frequency in MHz.
    pub frequency: u32,
    #[serde(default)]
    pub channel_width: ChannelWidth,
    /// AP MLD address, present iff the AP is multi-link capable.
    #[serde(default)]
    pub ap_mld_mac_address: Option<MacAddress>,
}

fn default_true() -> bool {
    true
}

/// One security option of a saved configuration.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct SecurityParams {
    pub security_type: SecurityType,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl SecurityParams {
    pub fn new(security_type: SecurityType) -> Self {
        Self {
            security_type,
            enabled: true,
        }
    }
}

/// A saved or suggested network configuration.
///
/// Only the fields network selection consults are modelled here.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct WifiConfiguration {
    pub network_id: NetworkId,
    pub ssid: Ssid,
    /// Security options in preference order.
    pub security_params: Vec<SecurityParams>,
    #[serde(default = "default_true")]
    pub trusted: bool,
    #[serde(default)]
    pub oem_paid: bool,
    #[serde(default)]
    pub oem_private: bool,
    #[serde(default)]
    pub restricted: bool,
    #[serde(default)]
    pub ephemeral: bool,
    /// Passpoint networks are matched by provider, not SSID.
    #[serde(default)]
    pub passpoint: bool,
    #[serde(default)]
    pub user_selected: bool,
    /// No internet access was observed during the last connection.
    #[serde(default)]
    pub has_no_internet_access: bool,
    /// Network is not expected to provide internet (printer, hotspot).
    #[serde(default)]
    pub no_internet_access_expected: bool,
    #[serde(default)]
    pub ip_provisioning_timed_out: bool,
    #[serde(default)]
    pub num_reboots_since_last_use: u32,
}

impl WifiConfiguration {
    /// A trusted configuration with a single enabled security type and all
    /// other flags cleared.
    pub fn new(network_id: NetworkId, ssid: Ssid, security_type: SecurityType) -> Self {
        Self {
            network_id,
            ssid,
            security_params: vec![SecurityParams::new(security_type)],
            trusted: true,
            oem_paid: false,
            oem_private: false,
            restricted: false,
            ephemeral: false,
            passpoint: false,
            user_selected: false,
            has_no_internet_access: false,
            no_internet_access_expected: false,
            ip_provisioning_timed_out: false,
            num_reboots_since_last_use: 0,
        }
    }

    /// Enabled security types in preference order.
    pub fn enabled_security_types(&self) -> impl Iterator<Item = SecurityType> + '_ {
        self.security_params
            .iter()
            .filter(|p| p.enabled)
            .map(|p| p.security_type)
    }

    /// True when every enabled security option is unauthenticated.
    pub fn is_open_network(&self) -> bool {
        let mut types = self.enabled_security_types().peekable();
        types.peek().is_some() && types.all(|t| t.is_open())
    }
}
