//! The presentation arbiter: one question surface shared by every zone.
//!
//! At most one zone owns the surface. A new `open` wins over the current
//! owner, which is released back to a non-displayed state without being
//! resolved. The arbiter only stores the owner's `ZoneId`; zones are reached
//! through a `ZoneDirectory` handed in on each call.

use mathgate_core::error::DomainError;
use mathgate_core::id::ZoneId;
use mathgate_core::rng::DeterministicRng;
use mathgate_generator::Question;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::events::Outcome;
use super::zone::{HINT_HIDES, OPTION_COUNT};

/// What the arbiter needs from a zone that can own the surface.
pub trait SessionParticipant {
    /// The surface was taken away; stop presenting without resolving.
    fn release_surface(&mut self);

    /// Forwards the player's choice.
    ///
    /// # Errors
    ///
    /// Whatever the zone rejects the choice with.
    fn submit_choice(&mut self, choice: usize) -> Result<Outcome, DomainError>;

    /// Forwards a hint request.
    ///
    /// # Errors
    ///
    /// Whatever the zone rejects the hint with.
    fn request_hint(
        &mut self,
        rng: &mut dyn DeterministicRng,
    ) -> Result<[usize; HINT_HIDES], DomainError>;

    /// Options currently hidden by a hint.
    fn hidden_options(&self) -> [bool; OPTION_COUNT];

    /// Whether choices are still taken.
    fn accepts_input(&self) -> bool;
}

/// Lookup from zone id to participant.
pub trait ZoneDirectory {
    /// Returns the participant with this id, if registered.
    fn participant_mut(&mut self, zone_id: ZoneId) -> Option<&mut dyn SessionParticipant>;
}

/// What the surface is currently showing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArbiterSession {
    /// The owning zone.
    pub owner: ZoneId,
    /// Prompt text.
    pub prompt: String,
    /// Options in display order.
    pub options: [String; OPTION_COUNT],
    /// Options hidden by a hint.
    pub hidden: [bool; OPTION_COUNT],
    /// Set once an answer is locked in or the countdown expired.
    pub locked: bool,
}

/// Owner of the single question surface.
#[derive(Debug, Default)]
pub struct PresentationArbiter {
    session: Option<ArbiterSession>,
}

impl PresentationArbiter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current session, if any.
    #[must_use]
    pub fn session(&self) -> Option<&ArbiterSession> {
        self.session.as_ref()
    }

    /// The zone owning the surface, if any.
    #[must_use]
    pub fn owner(&self) -> Option<ZoneId> {
        self.session.as_ref().map(|session| session.owner)
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    /// Shows `question` on behalf of `owner`.
    ///
    /// A different zone holding the surface is released first; its id is
    /// returned.
    pub fn open(
        &mut self,
        zones: &mut dyn ZoneDirectory,
        owner: ZoneId,
        question: &Question,
    ) -> Option<ZoneId> {
        let superseded = match self.session.take() {
            Some(previous) if previous.owner != owner => {
                warn!(
                    previous = %previous.owner,
                    next = %owner,
                    "surface superseded by another zone"
                );
                release_participant(zones, previous.owner);
                Some(previous.owner)
            }
            _ => None,
        };

        self.session = Some(ArbiterSession {
            owner,
            prompt: question.prompt().to_owned(),
            options: question.options().clone(),
            hidden: [false; OPTION_COUNT],
            locked: false,
        });
        info!(zone_id = %owner, "surface opened");
        superseded
    }

    /// Hides the surface and releases its owner. No-op without a session.
    pub fn close(&mut self, zones: &mut dyn ZoneDirectory) -> Option<ZoneId> {
        let session = self.session.take()?;
        release_participant(zones, session.owner);
        info!(zone_id = %session.owner, "surface closed");
        Some(session.owner)
    }

    /// Closes the surface only if `zone_id` owns it.
    pub fn release(&mut self, zones: &mut dyn ZoneDirectory, zone_id: ZoneId) -> bool {
        if self.owner() != Some(zone_id) {
            return false;
        }
        self.close(zones).is_some()
    }

    /// Forwards the player's choice to the owner.
    ///
    /// Returns `None` when nothing is shown.
    pub fn submit(
        &mut self,
        zones: &mut dyn ZoneDirectory,
        choice: usize,
    ) -> Option<Result<Outcome, DomainError>> {
        let Some(session) = self.session.as_mut() else {
            debug!(choice, "submission ignored: no session");
            return None;
        };
        let Some(zone) = zones.participant_mut(session.owner) else {
            return Some(Err(DomainError::UnknownZone(session.owner)));
        };
        let result = zone.submit_choice(choice);
        if result.is_ok() {
            session.locked = true;
        }
        Some(result)
    }

    /// Forwards a hint request to the owner and mirrors the hidden mask.
    ///
    /// Returns `None` when nothing is shown.
    pub fn hint(
        &mut self,
        zones: &mut dyn ZoneDirectory,
        rng: &mut dyn DeterministicRng,
    ) -> Option<Result<[usize; HINT_HIDES], DomainError>> {
        let Some(session) = self.session.as_mut() else {
            debug!("hint ignored: no session");
            return None;
        };
        let Some(zone) = zones.participant_mut(session.owner) else {
            return Some(Err(DomainError::UnknownZone(session.owner)));
        };
        let result = zone.request_hint(rng);
        if result.is_ok() {
            session.hidden = zone.hidden_options();
        }
        Some(result)
    }

    /// Re-reads the owner's hidden mask and lock state.
    pub fn refresh(&mut self, zones: &mut dyn ZoneDirectory) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if let Some(zone) = zones.participant_mut(session.owner) {
            session.hidden = zone.hidden_options();
            session.locked = !zone.accepts_input();
        }
    }

    /// Drops the session without notifying anyone (level reload).
    pub fn clear(&mut self) {
        self.session = None;
    }
}

fn release_participant(zones: &mut dyn ZoneDirectory, zone_id: ZoneId) {
    match zones.participant_mut(zone_id) {
        Some(zone) => zone.release_surface(),
        None => debug!(zone_id = %zone_id, "released zone is no longer registered"),
    }
}
