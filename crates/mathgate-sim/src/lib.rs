//! Mathgate — headless level simulation.
//!
//! Loads a level, plays it with a scripted player on a fixed-step frame
//! loop and reports the ledger totals. Nothing is rendered.

pub mod config;
pub mod ledger;
pub mod player;
pub mod sound;

use std::sync::Arc;
use std::time::Duration;

use glam::Vec3;
use mathgate_core::clock::{Clock, FrameClock, SystemClock};
use mathgate_core::collaborators::Collaborators;
use mathgate_core::rng::SeededRng;
use mathgate_encounter::domain::events::Outcome;
use mathgate_encounter::domain::proximity::ResolvedZones;
use mathgate_encounter::domain::zone::EncounterZone;
use mathgate_level::{LevelError, LoadedLevel, build_runtime, load_level};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::SimConfig;
use crate::ledger::{SessionLedger, Totals};
use crate::player::{PlayerProfile, PlayerStatus, ScriptedPlayer};
use crate::sound::LoggedCues;

/// Errors that stop a simulation from running.
#[derive(Debug, Error)]
pub enum SimError {
    /// The level could not be loaded or built.
    #[error(transparent)]
    Level(#[from] LevelError),
}

/// Outcome of a simulation run.
#[derive(Debug, Clone, Serialize)]
pub struct SimReport {
    pub level: String,
    pub fingerprint: String,
    pub seed: u64,
    pub frames: u64,
    pub simulated_secs: f64,
    pub finished: bool,
    pub zones: usize,
    pub correct: usize,
    pub incorrect: usize,
    pub timed_out: usize,
    pub events: usize,
    pub totals: Totals,
}

/// Loads the configured level and plays it.
///
/// # Errors
///
/// Returns `SimError::Level` if the level cannot be loaded or built.
pub fn run(config: &SimConfig) -> Result<SimReport, SimError> {
    let level = load_level(&config.level_path)?;
    simulate(&level, config, PlayerProfile::default())
}

/// Plays an already loaded level.
///
/// # Errors
///
/// Returns `SimError::Level` if the runtime cannot be built.
pub fn simulate(
    level: &LoadedLevel,
    config: &SimConfig,
    profile: PlayerProfile,
) -> Result<SimReport, SimError> {
    let seed = config.seed.unwrap_or_else(|| level.seed());
    let ledger = Arc::new(SessionLedger::new(config.starting_currency));
    let proximity = Arc::new(ResolvedZones::new());
    let collaborators = Collaborators::new(ledger.clone(), Arc::new(LoggedCues), proximity.clone());
    let clock = Arc::new(FrameClock::starting_at(SystemClock.now()));
    let mut runtime = build_runtime(level, collaborators, clock.clone(), Some(seed))?;
    let mut player = ScriptedPlayer::new(
        Vec3::ZERO,
        profile,
        Box::new(SeededRng::from_seed_u64(seed.wrapping_add(1))),
    );

    let finish = level.definition.finish;
    let frame = config.frame();
    let mut elapsed = Duration::ZERO;
    let mut frames = 0u64;
    let mut events = 0usize;
    let mut finished = false;

    info!(
        level = %level.definition.name,
        seed,
        tick_hz = config.tick_hz,
        "simulation started"
    );
    while elapsed < config.max_duration {
        let status = player.step(&mut runtime, &proximity, finish, frame);
        runtime.tick(frame);
        clock.advance(frame);
        events += runtime.drain_events().len();
        elapsed += frame;
        frames += 1;
        if status == PlayerStatus::Finished {
            finished = true;
            break;
        }
    }
    if !finished {
        warn!(
            elapsed_secs = elapsed.as_secs_f64(),
            "simulation stopped before the finish line"
        );
    }

    let outcomes: Vec<Outcome> = runtime
        .zones()
        .iter()
        .filter_map(EncounterZone::outcome)
        .collect();
    let report = SimReport {
        level: level.definition.name.clone(),
        fingerprint: level.fingerprint.to_string(),
        seed,
        frames,
        simulated_secs: elapsed.as_secs_f64(),
        finished,
        zones: runtime.zones().len(),
        correct: count(&outcomes, |outcome| matches!(outcome, Outcome::Correct { .. })),
        incorrect: count(&outcomes, |outcome| matches!(outcome, Outcome::Incorrect { .. })),
        timed_out: count(&outcomes, |outcome| matches!(outcome, Outcome::TimedOut)),
        events,
        totals: ledger.totals(),
    };
    info!(
        score = report.totals.score,
        wrong_answers = report.totals.wrong_answers,
        finished,
        "simulation finished"
    );
    Ok(report)
}

fn count(outcomes: &[Outcome], predicate: impl Fn(&Outcome) -> bool) -> usize {
    outcomes.iter().filter(|outcome| predicate(*outcome)).count()
}
