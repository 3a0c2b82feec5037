//! Error types for candidate ingestion.
use thiserror::Error;

use crate::types::{SecurityType, Ssid};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MacAddressError {
    #[error("empty MAC address")] Empty,
    #[error("expected 6 octets, got {0}")] WrongOctetCount(usize),
    #[error("invalid octet: {0:?}")] InvalidOctet(String),
}

/// Soft faults raised while ingesting candidates.
///
/// In lenient mode these are recorded in the store's fault ledger and the
/// operation returns its empty result; in picky mode they are also returned
/// to the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CandidateError {
    #[error("no configuration supplied")] MissingConfig,
    #[error("invalid bssid {bssid:?}: {source}")] InvalidBssid { bssid: String, source: MacAddressError },
    #[error("scan identity {scan} does not match configuration identity {config}")] IdentityMismatch { scan: Ssid, config: Ssid },
    #[error("no compatible security type: scan {scan:?}, config {config:?}")] NoCompatibleSecurity { scan: Vec<SecurityType>, config: Vec<SecurityType> },
    #[error("invalid current bssid {bssid:?}: {source}")] InvalidCurrentBssid { bssid: String, source: MacAddressError },
}
