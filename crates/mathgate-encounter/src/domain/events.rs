//! Domain events for encounter zones.

use mathgate_core::event::{DomainEvent, EventMetadata};
use serde::{Deserialize, Serialize};

/// Event type for `ZoneActivated`.
pub const ZONE_ACTIVATED_EVENT_TYPE: &str = "zone.activated";
/// Event type for `HintUsed`.
pub const HINT_USED_EVENT_TYPE: &str = "zone.hint_used";
/// Event type for `AnswerSubmitted`.
pub const ANSWER_SUBMITTED_EVENT_TYPE: &str = "zone.answer_submitted";
/// Event type for `TimedOut`.
pub const TIMED_OUT_EVENT_TYPE: &str = "zone.timed_out";
/// Event type for `ZoneSuspended`.
pub const ZONE_SUSPENDED_EVENT_TYPE: &str = "zone.suspended";
/// Event type for `ZoneAnswered`.
pub const ZONE_ANSWERED_EVENT_TYPE: &str = "zone.answered";

/// How an activation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum Outcome {
    /// The player picked the correct option.
    Correct { choice: usize },
    /// The player picked a wrong option.
    Incorrect { choice: usize },
    /// The countdown ran out.
    TimedOut,
}

impl Outcome {
    #[must_use]
    pub const fn is_correct(&self) -> bool {
        matches!(self, Self::Correct { .. })
    }
}

/// Emitted when a zone enters Active with a fresh question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneActivated {
    /// Activation count for this zone, starting at 1.
    pub activation: u32,
    /// The question prompt.
    pub prompt: String,
    /// Options in display order.
    pub options: Vec<String>,
    /// Index of the correct option.
    pub correct_index: usize,
    /// Countdown length in milliseconds (0 when untimed).
    pub time_limit_ms: u64,
}

/// Emitted when a hint hides two wrong options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HintUsed {
    /// Indices that were hidden.
    pub hidden: Vec<usize>,
    /// Currency paid.
    pub cost: u32,
}

/// Emitted when the player submits a choice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerSubmitted {
    /// The chosen index.
    pub choice: usize,
    /// Whether it was correct.
    pub correct: bool,
    /// Countdown time left in milliseconds.
    pub remaining_ms: u64,
}

/// Emitted when the zone reaches its terminal phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneAnswered {
    /// How the activation ended.
    pub outcome: Outcome,
    /// Score awarded (0 unless correct).
    pub score_awarded: u32,
}

/// Event payload variants for encounter zones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EncounterEventKind {
    ZoneActivated(ZoneActivated),
    HintUsed(HintUsed),
    AnswerSubmitted(AnswerSubmitted),
    /// The countdown expired without an answer.
    TimedOut,
    /// The surface was taken away while the zone was Active.
    ZoneSuspended,
    ZoneAnswered(ZoneAnswered),
}

/// Domain event envelope for encounter zones.
#[derive(Debug, Clone, PartialEq)]
pub struct EncounterEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: EncounterEventKind,
}

impl DomainEvent for EncounterEvent {
    fn event_type(&self) -> &'static str {
        match &self.kind {
            EncounterEventKind::ZoneActivated(_) => ZONE_ACTIVATED_EVENT_TYPE,
            EncounterEventKind::HintUsed(_) => HINT_USED_EVENT_TYPE,
            EncounterEventKind::AnswerSubmitted(_) => ANSWER_SUBMITTED_EVENT_TYPE,
            EncounterEventKind::TimedOut => TIMED_OUT_EVENT_TYPE,
            EncounterEventKind::ZoneSuspended => ZONE_SUSPENDED_EVENT_TYPE,
            EncounterEventKind::ZoneAnswered(_) => ZONE_ANSWERED_EVENT_TYPE,
        }
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("EncounterEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
