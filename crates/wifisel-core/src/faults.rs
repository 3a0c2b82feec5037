//! Soft-failure accounting for the candidate store.
//!
//! Every validation or parse failure inside the store funnels through
//! [`FaultLedger::record`]. The fault is remembered (last fault plus a running
//! count) and, in picky mode, handed back to the caller as an error.

use tracing::warn;

use crate::error::CandidateError;

/// Last fault and fault count, with optional escalation.
#[derive(Debug, Clone, Default)]
pub struct FaultLedger {
    picky: bool,
    last_fault: Option<CandidateError>,
    fault_count: u32,
}

impl FaultLedger {
    pub fn new(picky: bool) -> Self {
        Self {
            picky,
            last_fault: None,
            fault_count: 0,
        }
    }

    /// Record a fault.
    ///
    /// Returns `Ok(())` in lenient mode so the caller can produce its empty
    /// result, or `Err(fault)` in picky mode.
    pub fn record(&mut self, fault: CandidateError) -> Result<(), CandidateError> {
        self.fault_count = self.fault_count.saturating_add(1);
        warn!(count = self.fault_count, picky = self.picky, %fault, "candidates: fault recorded");
        self.last_fault = Some(fault.clone());
        if self.picky { Err(fault) } else { Ok(()) }
    }

    pub fn last_fault(&self) -> Option<&CandidateError> {
        self.last_fault.as_ref()
    }

    pub fn fault_count(&self) -> u32 {
        self.fault_count
    }

    pub fn clear(&mut self) {
        self.last_fault = None;
        self.fault_count = 0;
    }

    pub fn is_picky(&self) -> bool {
        self.picky
    }

    pub fn set_picky(&mut self, picky: bool) {
        self.picky = picky;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lenient_records_and_swallows() {
        let mut ledger = FaultLedger::new(false);
        assert_eq!(ledger.record(CandidateError::MissingConfig), Ok(()));
        assert_eq!(ledger.fault_count(), 1);
        assert_eq!(ledger.last_fault(), Some(&CandidateError::MissingConfig));
    }

    #[test]
    fn picky_records_and_returns() {
        let mut ledger = FaultLedger::new(true);
        assert_eq!(
            ledger.record(CandidateError::MissingConfig),
            Err(CandidateError::MissingConfig)
        );
        assert_eq!(ledger.fault_count(), 1);
    }

    #[test]
    fn last_fault_is_most_recent() {
        let mut ledger = FaultLedger::default();
        ledger.record(CandidateError::MissingConfig).unwrap();
        let mismatch = CandidateError::IdentityMismatch {
            scan: "a".into(),
            config: "b".into(),
        };
        ledger.record(mismatch.clone()).unwrap();
        assert_eq!(ledger.last_fault(), Some(&mismatch));
        assert_eq!(ledger.fault_count(), 2);
    }

    #[test]
    fn picky_toggle() {
        let mut ledger = FaultLedger::new(false);
        assert!(!ledger.is_picky());
        ledger.set_picky(true);
        assert!(ledger.is_picky());
        assert!(ledger.record(CandidateError::MissingConfig).is_err());
        ledger.set_picky(false);
        assert!(ledger.record(CandidateError::MissingConfig).is_ok());
        assert_eq!(ledger.fault_count(), 2);
    }

    #[test]
    fn clear_resets() {
        let mut ledger = FaultLedger::default();
        ledger.record(CandidateError::MissingConfig).unwrap();
        ledger.clear();
        assert_eq!(ledger.fault_count(), 0);
        assert!(ledger.last_fault().is_none());
    }
}
