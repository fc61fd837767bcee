//! Loading levels and turning them into runtimes.

use std::path::Path;
use std::sync::Arc;

use mathgate_core::clock::Clock;
use mathgate_core::collaborators::Collaborators;
use mathgate_core::id::ZoneId;
use mathgate_core::rng::SeededRng;
use mathgate_encounter::application::runtime::EncounterRuntime;
use tracing::{info, instrument};

use crate::domain::definition::LevelDefinition;
use crate::domain::error::LevelResult;
use crate::domain::fingerprint::LevelFingerprint;

/// A validated level together with the fingerprint of its source.
#[derive(Debug, Clone)]
pub struct LoadedLevel {
    pub definition: LevelDefinition,
    pub fingerprint: LevelFingerprint,
}

impl LoadedLevel {
    /// The seed to run with: the level's own, else one derived from the
    /// fingerprint.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.definition
            .seed
            .unwrap_or_else(|| self.fingerprint.seed())
    }

    /// Stable id of the zone at `index`.
    #[must_use]
    pub fn zone_id(&self, index: usize) -> Option<ZoneId> {
        let zone = self.definition.zones.get(index)?;
        Some(ZoneId::from_u128(
            self.fingerprint.zone_key(index, &zone.name),
        ))
    }
}

/// Parses and validates a level from YAML text.
///
/// # Errors
///
/// Returns `LevelError` if the YAML is malformed or the level is invalid.
pub fn parse_level(source: &str) -> LevelResult<LoadedLevel> {
    let definition = LevelDefinition::from_yaml(source)?;
    Ok(LoadedLevel {
        definition,
        fingerprint: LevelFingerprint::of(source),
    })
}

/// Reads, parses and validates a level file.
///
/// # Errors
///
/// Returns `LevelError::Io` if the file cannot be read, otherwise as
/// [`parse_level`].
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load_level(path: impl AsRef<Path>) -> LevelResult<LoadedLevel> {
    let source = std::fs::read_to_string(path.as_ref())?;
    let level = parse_level(&source)?;
    info!(
        level = %level.definition.name,
        zones = level.definition.zones.len(),
        fingerprint = %level.fingerprint,
        "level loaded"
    );
    Ok(level)
}

/// Builds a runtime with every zone of `level` placed under its stable id.
///
/// `seed` overrides the level's seed.
///
/// # Errors
///
/// Returns `LevelError` if a zone cannot be configured or registered.
pub fn build_runtime(
    level: &LoadedLevel,
    collaborators: Collaborators,
    clock: Arc<dyn Clock>,
    seed: Option<u64>,
) -> LevelResult<EncounterRuntime> {
    let seed = seed.unwrap_or_else(|| level.seed());
    let mut runtime = EncounterRuntime::new(
        collaborators,
        clock,
        Box::new(SeededRng::from_seed_u64(seed)),
    );

    let defaults = &level.definition.defaults;
    for (index, zone) in level.definition.zones.iter().enumerate() {
        let zone_id = ZoneId::from_u128(level.fingerprint.zone_key(index, &zone.name));
        runtime.add_zone_with_id(zone_id, zone.to_config(defaults)?)?;
    }

    info!(
        level = %level.definition.name,
        seed,
        zones = runtime.zones().len(),
        "runtime built"
    );
    Ok(runtime)
}
