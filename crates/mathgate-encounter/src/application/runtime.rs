//! The frame-loop runtime.
//!
//! Owns every zone of a level plus the shared presentation arbiter, and
//! routes player input and frame ticks to them. Rejected inputs are logged
//! at `debug` and leave state unchanged.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use mathgate_core::clock::Clock;
use mathgate_core::collaborators::Collaborators;
use mathgate_core::error::DomainError;
use mathgate_core::id::ZoneId;
use mathgate_core::rng::DeterministicRng;
use tracing::{debug, info, instrument, warn};

use crate::domain::arbiter::PresentationArbiter;
use crate::domain::events::{EncounterEvent, Outcome};
use crate::domain::zone::{EncounterZone, HINT_HIDES, ZoneConfig, ZoneTransition};

/// Every zone of a level, the arbiter, and the RNG they draw from.
pub struct EncounterRuntime {
    zones: Vec<EncounterZone>,
    arbiter: PresentationArbiter,
    rng: Box<dyn DeterministicRng>,
    collaborators: Collaborators,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for EncounterRuntime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncounterRuntime")
            .field("zones", &self.zones)
            .field("arbiter", &self.arbiter)
            .finish_non_exhaustive()
    }
}

impl EncounterRuntime {
    /// Creates a runtime with no zones.
    #[must_use]
    pub fn new(
        collaborators: Collaborators,
        clock: Arc<dyn Clock>,
        rng: Box<dyn DeterministicRng>,
    ) -> Self {
        Self {
            zones: Vec::new(),
            arbiter: PresentationArbiter::new(),
            rng,
            collaborators,
            clock,
        }
    }

    /// Places a zone with a fresh id.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the zone's constraints are unusable.
    pub fn add_zone(&mut self, config: ZoneConfig) -> Result<ZoneId, DomainError> {
        self.push_zone(ZoneId::new(), config)
    }

    /// Places a zone with a caller-chosen id.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the id is already taken or the
    /// zone's constraints are unusable.
    pub fn add_zone_with_id(
        &mut self,
        zone_id: ZoneId,
        config: ZoneConfig,
    ) -> Result<ZoneId, DomainError> {
        if self.zone(zone_id).is_some() {
            return Err(DomainError::Validation(format!(
                "zone {zone_id} is already registered"
            )));
        }
        self.push_zone(zone_id, config)
    }

    fn push_zone(&mut self, zone_id: ZoneId, config: ZoneConfig) -> Result<ZoneId, DomainError> {
        config
            .validate()
            .inspect_err(|error| warn!(%error, zone = %config.name, "zone rejected"))?;
        debug!(zone_id = %zone_id, zone = %config.name, "zone placed");
        self.zones.push(EncounterZone::new(
            zone_id,
            config,
            self.collaborators.clone(),
            Arc::clone(&self.clock),
        ));
        Ok(zone_id)
    }

    /// The player stepped into a zone: activate it and give it the surface.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnknownZone` for an unregistered id, or the
    /// zone's own rejection (already presenting, already resolved).
    #[instrument(skip_all, fields(zone_id = %zone_id))]
    pub fn player_entered(&mut self, zone_id: ZoneId) -> Result<(), DomainError> {
        let index = self.index_of(zone_id)?;
        let question = self.zones[index]
            .enter(self.rng.as_mut())
            .inspect_err(|error| debug!(%error, "entry ignored"))?
            .clone();
        self.arbiter.open(&mut self.zones, zone_id, &question);
        Ok(())
    }

    /// The player left a zone: take the surface away if it still has it.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnknownZone` for an unregistered id.
    #[instrument(skip_all, fields(zone_id = %zone_id))]
    pub fn player_exited(&mut self, zone_id: ZoneId) -> Result<(), DomainError> {
        let index = self.index_of(zone_id)?;
        if !self.arbiter.release(&mut self.zones, zone_id) {
            self.zones[index].suspend();
        }
        Ok(())
    }

    /// Submits a choice to the zone owning the surface.
    ///
    /// Returns `None` when no question is shown.
    #[instrument(skip(self))]
    pub fn submit(&mut self, choice: usize) -> Option<Result<Outcome, DomainError>> {
        let result = self.arbiter.submit(&mut self.zones, choice)?;
        if let Err(error) = &result {
            debug!(%error, "submission ignored");
        }
        Some(result)
    }

    /// Buys a hint for the zone owning the surface.
    ///
    /// Returns `None` when no question is shown.
    #[instrument(skip(self))]
    pub fn use_hint(&mut self) -> Option<Result<[usize; HINT_HIDES], DomainError>> {
        let result = self.arbiter.hint(&mut self.zones, self.rng.as_mut())?;
        if let Err(error) = &result {
            debug!(%error, "hint ignored");
        }
        Some(result)
    }

    /// Advances every zone by one frame and settles the surface.
    pub fn tick(&mut self, dt: Duration) -> Vec<(ZoneId, ZoneTransition)> {
        let transitions: Vec<(ZoneId, ZoneTransition)> = self
            .zones
            .iter_mut()
            .filter_map(|zone| zone.tick(dt).map(|transition| (zone.id(), transition)))
            .collect();

        for &(zone_id, transition) in &transitions {
            if let ZoneTransition::Answered(_) = transition {
                self.arbiter.release(&mut self.zones, zone_id);
            }
        }
        self.arbiter.refresh(&mut self.zones);
        transitions
    }

    /// Returns every zone to Idle and clears the surface and the resolved
    /// registry.
    #[instrument(skip(self))]
    pub fn reload(&mut self) {
        self.arbiter.clear();
        for zone in &mut self.zones {
            zone.reset();
        }
        self.collaborators.proximity.reset();
        info!(zones = self.zones.len(), "level reloaded");
    }

    #[must_use]
    pub fn zone(&self, zone_id: ZoneId) -> Option<&EncounterZone> {
        self.zones.iter().find(|zone| zone.id() == zone_id)
    }

    #[must_use]
    pub fn zones(&self) -> &[EncounterZone] {
        &self.zones
    }

    #[must_use]
    pub fn arbiter(&self) -> &PresentationArbiter {
        &self.arbiter
    }

    /// Whether a question is on screen. The objective indicator hides
    /// while it is.
    #[must_use]
    pub fn surface_visible(&self) -> bool {
        self.arbiter.is_open()
    }

    /// The zone owning the surface.
    #[must_use]
    pub fn active_zone(&self) -> Option<&EncounterZone> {
        self.arbiter.owner().and_then(|owner| self.zone(owner))
    }

    /// Whether every zone has reached Answered.
    #[must_use]
    pub fn all_answered(&self) -> bool {
        self.zones.iter().all(EncounterZone::is_answered)
    }

    /// Collects the events every zone recorded since the last drain.
    pub fn drain_events(&mut self) -> Vec<EncounterEvent> {
        self.zones
            .iter_mut()
            .flat_map(EncounterZone::take_uncommitted_events)
            .collect()
    }

    fn index_of(&self, zone_id: ZoneId) -> Result<usize, DomainError> {
        self.zones
            .iter()
            .position(|zone| zone.id() == zone_id)
            .ok_or(DomainError::UnknownZone(zone_id))
    }
}
