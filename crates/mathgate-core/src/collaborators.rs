//! Seams to the host game.
//!
//! The encounter core never owns score, currency, audio or the minimap. It
//! calls into these traits, which the host implements and injects at
//! construction. Methods take `&self`; implementations that mutate state
//! must serialize writes themselves.

use std::fmt;
use std::sync::Arc;

use glam::Vec3;

use crate::id::ZoneId;

/// Score, currency and checkpoint bookkeeping.
pub trait ProgressLedger: Send + Sync {
    /// Adds `amount` to the player's score.
    fn add_score(&self, amount: u32);

    /// Deducts `amount` currency. Returns `false`, leaving the balance
    /// unchanged, when the player cannot afford it.
    fn deduct_currency(&self, amount: u32) -> bool;

    /// Records `position` as the respawn checkpoint.
    fn record_checkpoint(&self, position: Vec3);

    /// Counts one more wrong (or timed-out) answer.
    fn increment_wrong_answer_count(&self);
}

/// Fire-and-forget audio cues.
pub trait SoundCuePlayer: Send + Sync {
    /// A correct answer was resolved.
    fn on_correct(&self);

    /// A wrong answer was resolved.
    fn on_wrong(&self);

    /// The countdown expired without an answer.
    fn on_timeout(&self);
}

/// Tracks which zones are resolved so an objective indicator can skip them.
pub trait ProximityIndicator: Send + Sync {
    /// Marks a zone as resolved.
    fn mark_resolved(&self, zone_id: ZoneId);

    /// Returns whether the zone has been resolved.
    fn is_resolved(&self, zone_id: ZoneId) -> bool;

    /// Forgets every resolved zone (level reload).
    fn reset(&self);
}

/// The collaborator set handed to every zone.
#[derive(Clone)]
pub struct Collaborators {
    /// Score / currency / checkpoint sink.
    pub ledger: Arc<dyn ProgressLedger>,
    /// Audio cue sink.
    pub sound: Arc<dyn SoundCuePlayer>,
    /// Resolved-zone registry.
    pub proximity: Arc<dyn ProximityIndicator>,
}

impl Collaborators {
    /// Bundles the three collaborators.
    #[must_use]
    pub fn new(
        ledger: Arc<dyn ProgressLedger>,
        sound: Arc<dyn SoundCuePlayer>,
        proximity: Arc<dyn ProximityIndicator>,
    ) -> Self {
        Self {
            ledger,
            sound,
            proximity,
        }
    }
}

impl fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}

/// A sound player that plays nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentCues;

impl SoundCuePlayer for SilentCues {
    fn on_correct(&self) {}

    fn on_wrong(&self) {}

    fn on_timeout(&self) {}
}
