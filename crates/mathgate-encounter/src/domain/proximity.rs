//! Resolved-zone registry and the nearest-objective query behind the
//! minimap arrow.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use glam::Vec3;
use mathgate_core::collaborators::ProximityIndicator;
use mathgate_core::id::ZoneId;
use serde::Serialize;

use super::zone::EncounterZone;

/// Where the objective indicator should point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Objective {
    /// The nearest zone still waiting for an answer.
    Zone { zone_id: ZoneId, position: Vec3 },
    /// Every zone is resolved; head for the finish line.
    Finish { position: Vec3 },
}

impl Objective {
    #[must_use]
    pub fn position(&self) -> Vec3 {
        match *self {
            Self::Zone { position, .. } | Self::Finish { position } => position,
        }
    }
}

/// In-memory `ProximityIndicator`.
#[derive(Debug, Default)]
pub struct ResolvedZones {
    resolved: Mutex<HashSet<ZoneId>>,
}

impl ResolvedZones {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of zones resolved so far.
    #[must_use]
    pub fn resolved_count(&self) -> usize {
        self.registry().len()
    }

    // Writes are single inserts or clears, so a poisoned set is still whole.
    fn registry(&self) -> MutexGuard<'_, HashSet<ZoneId>> {
        self.resolved.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Nearest unresolved zone to `player`, or the finish line once every
    /// zone is resolved. Ties go to the zone listed first.
    #[must_use]
    pub fn next_objective(&self, player: Vec3, zones: &[EncounterZone], finish: Vec3) -> Objective {
        zones
            .iter()
            .filter(|zone| !self.is_resolved(zone.id()))
            .map(|zone| (zone.id(), zone.config().position))
            .fold(None::<(ZoneId, Vec3, f32)>, |best, (zone_id, position)| {
                let distance = player.distance_squared(position);
                match best {
                    Some((_, _, nearest)) if nearest <= distance => best,
                    _ => Some((zone_id, position, distance)),
                }
            })
            .map_or(
                Objective::Finish { position: finish },
                |(zone_id, position, _)| Objective::Zone { zone_id, position },
            )
    }
}

impl ProximityIndicator for ResolvedZones {
    fn mark_resolved(&self, zone_id: ZoneId) {
        self.registry().insert(zone_id);
    }

    fn is_resolved(&self, zone_id: ZoneId) -> bool {
        self.registry().contains(&zone_id)
    }

    fn reset(&self) {
        self.registry().clear();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use mathgate_core::collaborators::{Collaborators, SilentCues};
    use mathgate_generator::GenerationConstraints;
    use mathgate_test_support::{FixedClock, RecordingLedger};

    use crate::domain::zone::ZoneConfig;

    fn zone(raw: u128, position: Vec3, proximity: &Arc<ResolvedZones>) -> EncounterZone {
        let collaborators = Collaborators::new(
            Arc::new(RecordingLedger::default()),
            Arc::new(SilentCues),
            proximity.clone(),
        );
        EncounterZone::new(
            ZoneId::from_u128(raw),
            ZoneConfig::generated("z", position, GenerationConstraints::default()),
            collaborators,
            Arc::new(FixedClock::default()),
        )
    }

    #[test]
    fn test_points_at_nearest_unresolved_zone() {
        let proximity = Arc::new(ResolvedZones::new());
        let zones = vec![
            zone(1, Vec3::new(10.0, 0.0, 0.0), &proximity),
            zone(2, Vec3::new(3.0, 0.0, 0.0), &proximity),
        ];

        let objective = proximity.next_objective(Vec3::ZERO, &zones, Vec3::new(50.0, 0.0, 0.0));

        assert_eq!(
            objective,
            Objective::Zone {
                zone_id: ZoneId::from_u128(2),
                position: Vec3::new(3.0, 0.0, 0.0),
            }
        );
    }

    #[test]
    fn test_skips_resolved_zones() {
        let proximity = Arc::new(ResolvedZones::new());
        let zones = vec![
            zone(1, Vec3::new(10.0, 0.0, 0.0), &proximity),
            zone(2, Vec3::new(3.0, 0.0, 0.0), &proximity),
        ];
        proximity.mark_resolved(ZoneId::from_u128(2));

        let objective = proximity.next_objective(Vec3::ZERO, &zones, Vec3::new(50.0, 0.0, 0.0));

        assert_eq!(objective.position(), Vec3::new(10.0, 0.0, 0.0));
        assert_eq!(proximity.resolved_count(), 1);
    }

    #[test]
    fn test_falls_back_to_finish_line() {
        let proximity = Arc::new(ResolvedZones::new());
        let zones = vec![zone(1, Vec3::ONE, &proximity)];
        proximity.mark_resolved(ZoneId::from_u128(1));
        let finish = Vec3::new(0.0, 0.0, 99.0);

        assert_eq!(
            proximity.next_objective(Vec3::ZERO, &zones, finish),
            Objective::Finish { position: finish }
        );
    }

    #[test]
    fn test_reset_forgets_resolved_zones() {
        let proximity = ResolvedZones::new();
        proximity.mark_resolved(ZoneId::from_u128(4));
        assert!(proximity.is_resolved(ZoneId::from_u128(4)));

        proximity.reset();

        assert!(!proximity.is_resolved(ZoneId::from_u128(4)));
    }

    #[test]
    fn test_poisoned_registry_still_records() {
        let proximity = ResolvedZones::new();
        let poisoned = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = proximity.resolved.lock().unwrap();
            panic!("poison the registry");
        }));
        assert!(poisoned.is_err());
        assert!(proximity.resolved.is_poisoned());

        proximity.mark_resolved(ZoneId::from_u128(5));

        assert!(proximity.is_resolved(ZoneId::from_u128(5)));
        assert_eq!(proximity.resolved_count(), 1);
    }
}
