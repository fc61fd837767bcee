//! The encounter zone state machine.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use glam::Vec3;
use mathgate_core::clock::Clock;
use mathgate_core::collaborators::Collaborators;
use mathgate_core::error::DomainError;
use mathgate_core::event::EventMetadata;
use mathgate_core::id::ZoneId;
use mathgate_core::rng::DeterministicRng;
use mathgate_core::shuffle::sample_without_replacement;
use mathgate_generator::{GenerationConstraints, Question, generate};
use tracing::{debug, info};
use uuid::Uuid;

use super::arbiter::{SessionParticipant, ZoneDirectory};
use super::events::{
    ANSWER_SUBMITTED_EVENT_TYPE, AnswerSubmitted, EncounterEvent, EncounterEventKind,
    HINT_USED_EVENT_TYPE, HintUsed, Outcome, TIMED_OUT_EVENT_TYPE, ZONE_ACTIVATED_EVENT_TYPE,
    ZONE_ANSWERED_EVENT_TYPE, ZONE_SUSPENDED_EVENT_TYPE, ZoneActivated, ZoneAnswered,
};
use super::task::{TaskStatus, TimedTask};

pub use mathgate_generator::domain::question::OPTION_COUNT;

/// Wrong options a hint hides.
pub const HINT_HIDES: usize = 2;

/// Lifecycle of a zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZonePhase {
    /// Dormant until the player enters.
    Idle,
    /// A question is (or was last) shown and the countdown runs while presented.
    Active,
    /// An answer is locked in; feedback is playing.
    Resolving,
    /// Terminal.
    Answered,
}

impl ZonePhase {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Active => "Active",
            Self::Resolving => "Resolving",
            Self::Answered => "Answered",
        }
    }
}

/// Where a zone's question comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum QuestionSource {
    /// A fresh generated question on every activation.
    Generated(GenerationConstraints),
    /// The same authored question, reshuffled on every activation.
    Scripted(Question),
}

/// Level-authored settings for one zone.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneConfig {
    /// Display name.
    pub name: String,
    /// World position; recorded as checkpoint on activation.
    pub position: Vec3,
    /// Question source.
    pub source: QuestionSource,
    /// Countdown length; zero disables the countdown.
    pub time_limit: Duration,
    /// How long feedback shows before the zone is Answered.
    pub feedback_duration: Duration,
    /// Length of the hint reveal animation.
    pub hint_reveal_duration: Duration,
    /// Currency a hint costs.
    pub hint_cost: u32,
    /// Score awarded for a correct answer.
    pub score_bonus: u32,
}

impl ZoneConfig {
    pub const DEFAULT_TIME_LIMIT: Duration = Duration::from_secs(15);
    pub const DEFAULT_FEEDBACK: Duration = Duration::from_millis(1500);
    pub const DEFAULT_HINT_REVEAL: Duration = Duration::from_millis(350);
    pub const DEFAULT_HINT_COST: u32 = 20;
    pub const DEFAULT_SCORE_BONUS: u32 = 500;

    /// A zone generating questions from `constraints`, with default timings.
    #[must_use]
    pub fn generated(
        name: impl Into<String>,
        position: Vec3,
        constraints: GenerationConstraints,
    ) -> Self {
        Self {
            name: name.into(),
            position,
            source: QuestionSource::Generated(constraints),
            time_limit: Self::DEFAULT_TIME_LIMIT,
            feedback_duration: Self::DEFAULT_FEEDBACK,
            hint_reveal_duration: Self::DEFAULT_HINT_REVEAL,
            hint_cost: Self::DEFAULT_HINT_COST,
            score_bonus: Self::DEFAULT_SCORE_BONUS,
        }
    }

    /// A zone asking an authored question, with default timings.
    #[must_use]
    pub fn scripted(name: impl Into<String>, position: Vec3, question: Question) -> Self {
        Self {
            source: QuestionSource::Scripted(question),
            ..Self::generated(name, position, GenerationConstraints::default())
        }
    }

    /// Checks the constraints of a generated zone.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` when the constraints are unusable.
    pub fn validate(&self) -> Result<(), DomainError> {
        match &self.source {
            QuestionSource::Generated(constraints) => constraints.validate(),
            QuestionSource::Scripted(_) => Ok(()),
        }
    }
}

/// A phase change reported by `tick`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneTransition {
    /// Active → Resolving because the countdown expired.
    TimedOut,
    /// Resolving → Answered.
    Answered(Outcome),
}

/// One placed encounter zone.
pub struct EncounterZone {
    id: ZoneId,
    config: ZoneConfig,
    collaborators: Collaborators,
    clock: Arc<dyn Clock>,
    phase: ZonePhase,
    question: Option<Question>,
    hidden: [bool; OPTION_COUNT],
    hint_used: bool,
    presented: bool,
    outcome: Option<Outcome>,
    checkpoint_position: Option<Vec3>,
    countdown: Option<TimedTask>,
    feedback: Option<TimedTask>,
    hint_reveal: Option<TimedTask>,
    activations: u32,
    version: i64,
    uncommitted_events: Vec<EncounterEvent>,
}

impl fmt::Debug for EncounterZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncounterZone")
            .field("id", &self.id)
            .field("name", &self.config.name)
            .field("phase", &self.phase)
            .field("presented", &self.presented)
            .field("activations", &self.activations)
            .finish_non_exhaustive()
    }
}

impl EncounterZone {
    /// Creates an Idle zone.
    #[must_use]
    pub fn new(
        id: ZoneId,
        config: ZoneConfig,
        collaborators: Collaborators,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            id,
            config,
            collaborators,
            clock,
            phase: ZonePhase::Idle,
            question: None,
            hidden: [false; OPTION_COUNT],
            hint_used: false,
            presented: false,
            outcome: None,
            checkpoint_position: None,
            countdown: None,
            feedback: None,
            hint_reveal: None,
            activations: 0,
            version: 0,
            uncommitted_events: Vec::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> ZoneId {
        self.id
    }

    #[must_use]
    pub fn config(&self) -> &ZoneConfig {
        &self.config
    }

    #[must_use]
    pub fn phase(&self) -> ZonePhase {
        self.phase
    }

    /// The question of the current (or last) activation.
    #[must_use]
    pub fn question(&self) -> Option<&Question> {
        self.question.as_ref()
    }

    /// Which options a hint has hidden.
    #[must_use]
    pub fn hidden_options(&self) -> [bool; OPTION_COUNT] {
        self.hidden
    }

    #[must_use]
    pub fn hint_used(&self) -> bool {
        self.hint_used
    }

    /// Whether this zone currently holds the presentation surface.
    #[must_use]
    pub fn is_presented(&self) -> bool {
        self.presented
    }

    /// How many times the zone has been activated since the last reset.
    #[must_use]
    pub fn activations(&self) -> u32 {
        self.activations
    }

    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    #[must_use]
    pub fn is_answered(&self) -> bool {
        self.phase == ZonePhase::Answered
    }

    #[must_use]
    pub fn checkpoint_position(&self) -> Option<Vec3> {
        self.checkpoint_position
    }

    /// Countdown time left; the full limit before activation, zero once
    /// the countdown is gone.
    #[must_use]
    pub fn time_remaining(&self) -> Duration {
        match (self.phase, self.countdown) {
            (_, Some(task)) => task.remaining(),
            (ZonePhase::Idle, None) => self.config.time_limit,
            _ => Duration::ZERO,
        }
    }

    /// Progress of the hint reveal animation, if one is playing.
    #[must_use]
    pub fn hint_reveal_progress(&self) -> Option<f32> {
        self.hint_reveal.map(|task| task.progress())
    }

    /// Number of timers still scheduled for this zone.
    #[must_use]
    pub fn outstanding_timers(&self) -> usize {
        [self.countdown, self.feedback, self.hint_reveal]
            .iter()
            .filter(|task| task.is_some())
            .count()
    }

    /// Whether the zone accepts answers right now.
    #[must_use]
    pub fn accepts_input(&self) -> bool {
        self.phase == ZonePhase::Active && self.presented
    }

    /// Whether a hint could be bought now, ignoring the player's balance.
    #[must_use]
    pub fn hint_available(&self) -> bool {
        self.accepts_input() && !self.hint_used
    }

    /// Starts a fresh activation: checkpoint, new question, new countdown.
    ///
    /// Allowed from Idle, and from Active after the player left the zone.
    /// The question is complete before the phase changes.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the zone is already presenting,
    /// or `DomainError::NotActive` once it is Resolving or Answered.
    pub fn enter(&mut self, rng: &mut dyn DeterministicRng) -> Result<&Question, DomainError> {
        match self.phase {
            ZonePhase::Idle => {}
            ZonePhase::Active if !self.presented => {}
            ZonePhase::Active => {
                return Err(DomainError::Validation(format!(
                    "zone {} is already presenting",
                    self.id
                )));
            }
            ZonePhase::Resolving | ZonePhase::Answered => {
                return Err(DomainError::NotActive {
                    zone_id: self.id,
                    phase: self.phase.as_str(),
                });
            }
        }

        self.collaborators
            .ledger
            .record_checkpoint(self.config.position);
        self.checkpoint_position = Some(self.config.position);

        let fresh = match &self.config.source {
            QuestionSource::Generated(constraints) => generate(constraints, rng),
            QuestionSource::Scripted(question) => question.clone(),
        };
        let question = fresh.shuffled(rng);

        self.activations += 1;
        self.hidden = [false; OPTION_COUNT];
        self.hint_used = false;
        self.hint_reveal = None;
        self.outcome = None;
        self.countdown =
            (!self.config.time_limit.is_zero()).then(|| TimedTask::start(self.config.time_limit));
        self.presented = true;
        self.phase = ZonePhase::Active;

        info!(
            zone_id = %self.id,
            zone = %self.config.name,
            activation = self.activations,
            prompt = question.prompt(),
            "zone activated"
        );
        let payload = ZoneActivated {
            activation: self.activations,
            prompt: question.prompt().to_owned(),
            options: question.options().to_vec(),
            correct_index: question.correct_index(),
            time_limit_ms: millis(self.config.time_limit),
        };
        self.record(
            ZONE_ACTIVATED_EVENT_TYPE,
            EncounterEventKind::ZoneActivated(payload),
        );

        Ok(self.question.insert(question))
    }

    /// Takes the surface away from this zone without resolving it.
    ///
    /// An Active zone cancels its countdown and hint animation; re-entering
    /// starts a fresh activation. A Resolving zone keeps its feedback timer
    /// and still reaches Answered. Returns whether anything changed.
    pub fn suspend(&mut self) -> bool {
        if !self.presented {
            return false;
        }
        self.presented = false;
        if self.phase == ZonePhase::Active {
            self.countdown = None;
            self.hint_reveal = None;
            debug!(zone_id = %self.id, "zone suspended");
            self.record(ZONE_SUSPENDED_EVENT_TYPE, EncounterEventKind::ZoneSuspended);
        }
        true
    }

    /// Locks in the player's choice: Active → Resolving.
    ///
    /// # Errors
    ///
    /// - `DomainError::DoubleSubmission` once the zone has left Active.
    /// - `DomainError::NotActive` when the zone is Idle or not presented.
    /// - `DomainError::InvalidChoice` for an index outside `0..4` or one a
    ///   hint has hidden.
    pub fn submit(&mut self, choice: usize) -> Result<Outcome, DomainError> {
        match self.phase {
            ZonePhase::Resolving | ZonePhase::Answered => {
                return Err(DomainError::DoubleSubmission(self.id));
            }
            ZonePhase::Active if self.presented => {}
            ZonePhase::Idle | ZonePhase::Active => {
                return Err(DomainError::NotActive {
                    zone_id: self.id,
                    phase: self.phase.as_str(),
                });
            }
        }
        if choice >= OPTION_COUNT || self.hidden[choice] {
            return Err(DomainError::InvalidChoice(choice));
        }
        let Some(question) = &self.question else {
            return Err(DomainError::Validation(format!(
                "zone {} is active without a question",
                self.id
            )));
        };

        let correct = question.is_correct(choice);
        let outcome = if correct {
            Outcome::Correct { choice }
        } else {
            Outcome::Incorrect { choice }
        };
        let remaining_ms = millis(self.time_remaining());

        self.begin_resolving(outcome);
        info!(zone_id = %self.id, choice, correct, "answer submitted");
        self.record(
            ANSWER_SUBMITTED_EVENT_TYPE,
            EncounterEventKind::AnswerSubmitted(AnswerSubmitted {
                choice,
                correct,
                remaining_ms,
            }),
        );
        Ok(outcome)
    }

    /// Pays for a hint and hides two of the three wrong options.
    ///
    /// Returns the hidden indices.
    ///
    /// # Errors
    ///
    /// - `DomainError::NotActive` unless the zone is Active and presented.
    /// - `DomainError::HintUnavailable` if this activation already used one.
    /// - `DomainError::InsufficientCurrency` if the ledger refuses payment.
    ///
    /// Every error leaves the zone unchanged.
    pub fn use_hint(
        &mut self,
        rng: &mut dyn DeterministicRng,
    ) -> Result<[usize; HINT_HIDES], DomainError> {
        if !self.accepts_input() {
            return Err(DomainError::NotActive {
                zone_id: self.id,
                phase: self.phase.as_str(),
            });
        }
        if self.hint_used {
            return Err(DomainError::HintUnavailable("hint already used"));
        }
        let Some(question) = &self.question else {
            return Err(DomainError::HintUnavailable("no question to hint"));
        };
        let wrong: Vec<usize> = (0..OPTION_COUNT)
            .filter(|&index| !question.is_correct(index) && !self.hidden[index])
            .collect();
        if wrong.len() < HINT_HIDES {
            return Err(DomainError::HintUnavailable("too few options left"));
        }

        let cost = self.config.hint_cost;
        if !self.collaborators.ledger.deduct_currency(cost) {
            debug!(zone_id = %self.id, cost, "hint rejected: insufficient currency");
            return Err(DomainError::InsufficientCurrency { cost });
        }

        let picked = sample_without_replacement(&wrong, HINT_HIDES, rng);
        let hidden = [picked[0], picked[1]];
        for index in hidden {
            self.hidden[index] = true;
        }
        self.hint_used = true;
        self.hint_reveal = Some(TimedTask::start(self.config.hint_reveal_duration));

        info!(zone_id = %self.id, ?hidden, cost, "hint used");
        self.record(
            HINT_USED_EVENT_TYPE,
            EncounterEventKind::HintUsed(HintUsed {
                hidden: hidden.to_vec(),
                cost,
            }),
        );
        Ok(hidden)
    }

    /// Advances this zone's timers by one frame.
    ///
    /// At most one phase transition happens per call.
    pub fn tick(&mut self, dt: Duration) -> Option<ZoneTransition> {
        match self.phase {
            ZonePhase::Idle | ZonePhase::Answered => None,
            ZonePhase::Active => {
                if let Some(task) = self.hint_reveal.as_mut() {
                    if task.advance(dt) == TaskStatus::Finished {
                        self.hint_reveal = None;
                    }
                }
                let expired = self
                    .countdown
                    .as_mut()
                    .is_some_and(|task| task.advance(dt) == TaskStatus::Finished);
                if !expired {
                    return None;
                }
                self.begin_resolving(Outcome::TimedOut);
                self.collaborators.sound.on_timeout();
                info!(zone_id = %self.id, "countdown expired");
                self.record(TIMED_OUT_EVENT_TYPE, EncounterEventKind::TimedOut);
                Some(ZoneTransition::TimedOut)
            }
            ZonePhase::Resolving => {
                let done = self
                    .feedback
                    .as_mut()
                    .is_none_or(|task| task.advance(dt) == TaskStatus::Finished);
                if !done {
                    return None;
                }
                self.feedback = None;
                let outcome = self.finish();
                Some(ZoneTransition::Answered(outcome))
            }
        }
    }

    /// Returns the zone to Idle for a level reload.
    pub fn reset(&mut self) {
        self.phase = ZonePhase::Idle;
        self.question = None;
        self.hidden = [false; OPTION_COUNT];
        self.hint_used = false;
        self.presented = false;
        self.outcome = None;
        self.checkpoint_position = None;
        self.countdown = None;
        self.feedback = None;
        self.hint_reveal = None;
        self.activations = 0;
    }

    /// Events recorded since the last drain.
    #[must_use]
    pub fn uncommitted_events(&self) -> &[EncounterEvent] {
        &self.uncommitted_events
    }

    /// Hands over recorded events.
    pub fn take_uncommitted_events(&mut self) -> Vec<EncounterEvent> {
        self.version += i64::try_from(self.uncommitted_events.len()).unwrap_or(i64::MAX);
        std::mem::take(&mut self.uncommitted_events)
    }

    fn begin_resolving(&mut self, outcome: Outcome) {
        self.countdown = None;
        self.hint_reveal = None;
        self.outcome = Some(outcome);
        self.feedback = Some(TimedTask::start(self.config.feedback_duration));
        self.phase = ZonePhase::Resolving;
    }

    /// Resolving → Answered: settle with the ledger, cue audio, notify the
    /// indicator.
    fn finish(&mut self) -> Outcome {
        let outcome = self.outcome.unwrap_or(Outcome::TimedOut);
        let Collaborators {
            ledger,
            sound,
            proximity,
        } = &self.collaborators;

        let score_awarded = match outcome {
            Outcome::Correct { .. } => {
                ledger.add_score(self.config.score_bonus);
                sound.on_correct();
                self.config.score_bonus
            }
            Outcome::Incorrect { .. } => {
                ledger.increment_wrong_answer_count();
                sound.on_wrong();
                0
            }
            // The timeout cue already played when the countdown expired.
            Outcome::TimedOut => {
                ledger.increment_wrong_answer_count();
                0
            }
        };

        self.phase = ZonePhase::Answered;
        self.presented = false;
        proximity.mark_resolved(self.id);

        info!(zone_id = %self.id, ?outcome, score_awarded, "zone answered");
        self.record(
            ZONE_ANSWERED_EVENT_TYPE,
            EncounterEventKind::ZoneAnswered(ZoneAnswered {
                outcome,
                score_awarded,
            }),
        );
        outcome
    }

    #[allow(clippy::cast_possible_wrap)]
    fn next_sequence_number(&self) -> i64 {
        self.version + self.uncommitted_events.len() as i64 + 1
    }

    fn record(&mut self, event_type: &str, kind: EncounterEventKind) {
        let event = EncounterEvent {
            metadata: EventMetadata {
                event_id: Uuid::new_v4(),
                event_type: event_type.to_owned(),
                zone_id: self.id,
                sequence_number: self.next_sequence_number(),
                occurred_at: self.clock.now(),
            },
            kind,
        };
        self.uncommitted_events.push(event);
    }
}

#[allow(clippy::cast_possible_truncation)]
fn millis(duration: Duration) -> u64 {
    duration.as_millis() as u64
}

impl SessionParticipant for EncounterZone {
    fn release_surface(&mut self) {
        self.suspend();
    }

    fn submit_choice(&mut self, choice: usize) -> Result<Outcome, DomainError> {
        self.submit(choice)
    }

    fn request_hint(
        &mut self,
        rng: &mut dyn DeterministicRng,
    ) -> Result<[usize; HINT_HIDES], DomainError> {
        self.use_hint(rng)
    }

    fn hidden_options(&self) -> [bool; OPTION_COUNT] {
        self.hidden
    }

    fn accepts_input(&self) -> bool {
        self.phase == ZonePhase::Active && self.presented
    }
}

impl ZoneDirectory for Vec<EncounterZone> {
    fn participant_mut(&mut self, zone_id: ZoneId) -> Option<&mut dyn SessionParticipant> {
        self.iter_mut()
            .find(|zone| zone.id == zone_id)
            .map(|zone| zone as &mut dyn SessionParticipant)
    }
}
