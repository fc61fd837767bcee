//! A scripted player that follows the objective indicator through a level.

use std::time::Duration;

use glam::Vec3;
use mathgate_core::id::ZoneId;
use mathgate_core::rng::DeterministicRng;
use mathgate_encounter::application::runtime::EncounterRuntime;
use mathgate_encounter::domain::proximity::{Objective, ResolvedZones};
use mathgate_encounter::domain::zone::OPTION_COUNT;
use tracing::{debug, info};

/// Distance at which the player counts as inside a zone or at the finish.
pub const ARRIVAL_RADIUS: f32 = 1.5;

/// How the scripted player behaves.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerProfile {
    /// Units per second.
    pub speed: f32,
    /// Chance of knowing the answer.
    pub accuracy: f64,
    /// Chance of buying a hint on a question.
    pub hint_chance: f64,
    /// Chance of freezing until a timed question runs out.
    pub stall_chance: f64,
    /// Shortest time spent reading a question.
    pub min_think: Duration,
    /// Longest time spent reading a question.
    pub max_think: Duration,
}

impl Default for PlayerProfile {
    fn default() -> Self {
        Self {
            speed: 12.0,
            accuracy: 0.75,
            hint_chance: 0.3,
            stall_chance: 0.1,
            min_think: Duration::from_secs(1),
            max_think: Duration::from_secs(6),
        }
    }
}

/// What the player is doing after a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerStatus {
    Travelling,
    Answering(ZoneId),
    Finished,
}

#[derive(Debug)]
struct Attempt {
    zone_id: ZoneId,
    elapsed: Duration,
    hint_at: Option<Duration>,
    answer_at: Option<Duration>,
    knows_answer: bool,
}

/// Walks toward the current objective, answers what it meets.
pub struct ScriptedPlayer {
    position: Vec3,
    profile: PlayerProfile,
    rng: Box<dyn DeterministicRng>,
    attempt: Option<Attempt>,
}

impl std::fmt::Debug for ScriptedPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptedPlayer")
            .field("position", &self.position)
            .field("attempt", &self.attempt)
            .finish_non_exhaustive()
    }
}

impl ScriptedPlayer {
    #[must_use]
    pub fn new(start: Vec3, profile: PlayerProfile, rng: Box<dyn DeterministicRng>) -> Self {
        Self {
            position: start,
            profile,
            rng,
            attempt: None,
        }
    }

    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Advances the player by one frame.
    pub fn step(
        &mut self,
        runtime: &mut EncounterRuntime,
        objectives: &ResolvedZones,
        finish: Vec3,
        dt: Duration,
    ) -> PlayerStatus {
        if self.attempt.is_some() {
            return self.answer(runtime, dt);
        }

        let objective = objectives.next_objective(self.position, runtime.zones(), finish);
        let target = objective.position();
        let offset = target - self.position;
        let reach = self.profile.speed * dt.as_secs_f32();
        if offset.length() > reach {
            self.position += offset.normalize_or_zero() * reach;
        } else {
            self.position = target;
        }
        if self.position.distance(target) > ARRIVAL_RADIUS {
            return PlayerStatus::Travelling;
        }

        match objective {
            Objective::Finish { .. } => PlayerStatus::Finished,
            Objective::Zone { zone_id, .. } => match runtime.player_entered(zone_id) {
                Ok(()) => {
                    let timed = runtime
                        .zone(zone_id)
                        .is_some_and(|zone| !zone.config().time_limit.is_zero());
                    self.attempt = Some(self.plan(zone_id, timed));
                    PlayerStatus::Answering(zone_id)
                }
                Err(error) => {
                    debug!(%error, zone_id = %zone_id, "could not enter zone");
                    PlayerStatus::Travelling
                }
            },
        }
    }

    fn plan(&mut self, zone_id: ZoneId, timed: bool) -> Attempt {
        let think = self.roll_duration(self.profile.min_think, self.profile.max_think);
        let stalls = timed && self.rng.next_f64() < self.profile.stall_chance;
        let wants_hint = self.rng.next_f64() < self.profile.hint_chance;
        let knows_answer = self.rng.next_f64() < self.profile.accuracy;
        info!(
            zone_id = %zone_id,
            think_ms = u64::try_from(think.as_millis()).unwrap_or(u64::MAX),
            stalls,
            wants_hint,
            knows_answer,
            "player reached zone"
        );
        Attempt {
            zone_id,
            elapsed: Duration::ZERO,
            hint_at: wants_hint.then(|| think / 2),
            answer_at: (!stalls).then_some(think),
            knows_answer,
        }
    }

    fn answer(&mut self, runtime: &mut EncounterRuntime, dt: Duration) -> PlayerStatus {
        let Some(attempt) = self.attempt.as_mut() else {
            return PlayerStatus::Travelling;
        };
        let zone_id = attempt.zone_id;
        if runtime.zone(zone_id).is_none_or(|zone| zone.is_answered()) {
            if let Err(error) = runtime.player_exited(zone_id) {
                debug!(%error, zone_id = %zone_id, "could not leave zone");
            }
            self.attempt = None;
            return PlayerStatus::Travelling;
        }

        attempt.elapsed += dt;
        if attempt.hint_at.is_some_and(|at| attempt.elapsed >= at) {
            attempt.hint_at = None;
            runtime.use_hint();
        }
        if attempt.answer_at.is_some_and(|at| attempt.elapsed >= at) {
            attempt.answer_at = None;
            let knows_answer = attempt.knows_answer;
            if let Some(choice) = self.choose(runtime, zone_id, knows_answer) {
                runtime.submit(choice);
            }
        }
        PlayerStatus::Answering(zone_id)
    }

    fn choose(
        &mut self,
        runtime: &EncounterRuntime,
        zone_id: ZoneId,
        knows_answer: bool,
    ) -> Option<usize> {
        let zone = runtime.zone(zone_id)?;
        let correct = zone.question()?.correct_index();
        if knows_answer {
            return Some(correct);
        }
        let hidden = zone.hidden_options();
        let wrong: Vec<usize> = (0..OPTION_COUNT)
            .filter(|&index| index != correct && !hidden[index])
            .collect();
        let last = u32::try_from(wrong.len().checked_sub(1)?).ok()?;
        let pick = self.rng.next_u32_range(0, last) as usize;
        wrong.get(pick).copied()
    }

    fn roll_duration(&mut self, min: Duration, max: Duration) -> Duration {
        let low = u32::try_from(min.as_millis()).unwrap_or(u32::MAX);
        let high = u32::try_from(max.as_millis()).unwrap_or(u32::MAX).max(low);
        Duration::from_millis(u64::from(self.rng.next_u32_range(low, high)))
    }
}
