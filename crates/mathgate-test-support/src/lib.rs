//! Shared test doubles for the Mathgate quiz encounter engine.

mod clock;
mod ledger;
mod rng;
mod sound;

pub use clock::FixedClock;
pub use ledger::{LedgerSnapshot, RecordingLedger};
pub use rng::{MockRng, SequenceRng};
pub use sound::{Cue, RecordingSoundCues};
