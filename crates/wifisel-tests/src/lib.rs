//! Integration test suite for wifisel.
//!
//! Exercises the candidate store against the in-memory scorecard, JSON
//! fixtures of whole selection passes, and randomized insertion sequences.

pub mod helpers;
