//! Test ledger — an in-memory `ProgressLedger` that records every call.

use std::sync::Mutex;

use glam::Vec3;
use mathgate_core::collaborators::ProgressLedger;

/// Point-in-time copy of the ledger's counters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LedgerSnapshot {
    /// Accumulated score.
    pub score: u64,
    /// Remaining currency.
    pub currency: u32,
    /// Wrong or timed-out answers.
    pub wrong_answers: u32,
    /// Every checkpoint recorded, oldest first.
    pub checkpoints: Vec<Vec3>,
    /// Successful currency deductions, oldest first.
    pub deductions: Vec<u32>,
}

/// A `ProgressLedger` backed by a mutex-guarded snapshot.
#[derive(Debug, Default)]
pub struct RecordingLedger {
    state: Mutex<LedgerSnapshot>,
}

impl RecordingLedger {
    /// Creates a ledger holding `currency` coins.
    #[must_use]
    pub fn with_currency(currency: u32) -> Self {
        Self {
            state: Mutex::new(LedgerSnapshot {
                currency,
                ..LedgerSnapshot::default()
            }),
        }
    }

    /// Returns a copy of the current counters.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn snapshot(&self) -> LedgerSnapshot {
        self.state.lock().unwrap().clone()
    }
}

impl ProgressLedger for RecordingLedger {
    fn add_score(&self, amount: u32) {
        self.state.lock().unwrap().score += u64::from(amount);
    }

    fn deduct_currency(&self, amount: u32) -> bool {
        let mut state = self.state.lock().unwrap();
        if state.currency < amount {
            return false;
        }
        state.currency -= amount;
        state.deductions.push(amount);
        true
    }

    fn record_checkpoint(&self, position: Vec3) {
        self.state.lock().unwrap().checkpoints.push(position);
    }

    fn increment_wrong_answer_count(&self) {
        self.state.lock().unwrap().wrong_answers += 1;
    }
}
