//! Historical signal statistics exchanged with the scorecard.

use serde::{Deserialize, Serialize};

/// Connection lifecycle events the scorecard keeps statistics for.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum SignalEvent {
    SignalPoll,
    ScanBeforeConnect,
    FirstPollAfterConnection,
    IpConfigurationSuccess,
    ValidationSuccess,
    ConnectionFailure,
    IpReachabilityLost,
    LastPollBeforeRoam,
    RoamSuccess,
    WifiDisabled,
    RoamFailure,
    LastPollBeforeSwitch,
    Disconnection,
}

/// Running count, sum, sum of squares, min and max of a sample stream.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Default)]
pub struct UnivariateStats {
    pub count: u64,
    pub sum: f64,
    pub sum_of_squares: f64,
    pub min: f64,
    pub max: f64,
}

impl UnivariateStats {
    /// Fold one sample in.
    pub fn update(&mut self, value: f64) {
        if self.count == 0 {
            self.min = value;
            self.max = value;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);
        }
        self.count += 1;
        self.sum += value;
        self.sum_of_squares += value * value;
    }

    /// Sample mean, or `None` when no samples were seen.
    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

/// Statistics for one (event, frequency) pair of a BSSID.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SignalStats {
    pub event: SignalEvent,
    /// Center frequency in MHz.
    pub frequency: u32,
    pub rssi: UnivariateStats,
    pub link_speed: UnivariateStats,
    pub elapsed_ms: UnivariateStats,
}

impl SignalStats {
    pub fn new(event: SignalEvent, frequency: u32) -> Self {
        Self {
            event,
            frequency,
            rssi: UnivariateStats::default(),
            link_speed: UnivariateStats::default(),
            elapsed_ms: UnivariateStats::default(),
        }
    }
}
