//! The simulated player's progress ledger.

use std::sync::{Mutex, MutexGuard, PoisonError};

use glam::Vec3;
use mathgate_core::collaborators::ProgressLedger;
use serde::Serialize;
use tracing::{debug, warn};

/// Counters at the end of a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Totals {
    pub score: u64,
    pub currency: u32,
    pub currency_spent: u32,
    pub wrong_answers: u32,
    pub checkpoint: Option<[f32; 3]>,
}

/// A `ProgressLedger` holding one player's counters.
#[derive(Debug, Default)]
pub struct SessionLedger {
    totals: Mutex<Totals>,
}

impl SessionLedger {
    /// Creates a ledger with `currency` to spend.
    #[must_use]
    pub fn new(currency: u32) -> Self {
        Self {
            totals: Mutex::new(Totals {
                currency,
                ..Totals::default()
            }),
        }
    }

    /// Current counters.
    #[must_use]
    pub fn totals(&self) -> Totals {
        Totals::clone(&self.guard())
    }

    fn guard(&self) -> MutexGuard<'_, Totals> {
        self.totals.lock().unwrap_or_else(|poisoned| {
            warn!("ledger lock poisoned, keeping last totals");
            PoisonError::into_inner(poisoned)
        })
    }

    fn update(&self, apply: impl FnOnce(&mut Totals)) {
        apply(&mut self.guard());
    }
}

impl ProgressLedger for SessionLedger {
    fn add_score(&self, amount: u32) {
        self.update(|totals| totals.score += u64::from(amount));
    }

    fn deduct_currency(&self, amount: u32) -> bool {
        let mut totals = self.guard();
        let Some(left) = totals.currency.checked_sub(amount) else {
            debug!(amount, balance = totals.currency, "currency deduction refused");
            return false;
        };
        totals.currency = left;
        totals.currency_spent += amount;
        true
    }

    fn record_checkpoint(&self, position: Vec3) {
        self.update(|totals| totals.checkpoint = Some(position.to_array()));
    }

    fn increment_wrong_answer_count(&self) {
        self.update(|totals| totals.wrong_answers += 1);
    }
}
