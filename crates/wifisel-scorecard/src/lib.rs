//! # wifisel-scorecard
//! In-memory historical signal statistics for network selection.
//!
//! [`MemoryScoreCard`] implements the [`ScoreCard`](wifisel_core::ScoreCard)
//! contract: per-BSSID handles are created lazily on lookup, annotated by the
//! candidate store, and fed with connection events by whoever observes them.

pub mod memory;

pub use memory::{BssidSnapshot, MemoryScoreCard, PerBssidRecord, SignalSample};
