//! Selection constants.

/// Estimated internet availability (percent) assumed for a BSSID without any
/// scorecard history.
pub const DEFAULT_INTERNET_AVAILABILITY_PERCENT: u8 = 50;

/// Upper bound of any internet availability estimate.
pub const MAX_INTERNET_AVAILABILITY_PERCENT: u8 = 100;

/// Capacity guess for the per-network candidate groups (BSSIDs per network).
pub const EXPECTED_LINKS_PER_NETWORK: usize = 2;

/// Decimal places kept when rendering the last-selection weight.
pub const WEIGHT_DISPLAY_SCALE: f64 = 1000.0;
