//! Domain error types.

use thiserror::Error;

use crate::id::ZoneId;

/// Top-level domain error type.
///
/// None of these are fatal: generation exhaustion is recovered inside the
/// generator, and the encounter runtime treats the rest as ignored inputs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// The generator ran out of retries before finding an in-bounds question.
    #[error("question generation exhausted after {attempts} attempts")]
    GenerationExhausted {
        /// Number of attempts made.
        attempts: u32,
    },

    /// The ledger refused to pay for a hint.
    #[error("insufficient currency: hint costs {cost}")]
    InsufficientCurrency {
        /// The hint cost that could not be paid.
        cost: u32,
    },

    /// A hint was requested when none may be used.
    #[error("hint unavailable: {0}")]
    HintUnavailable(&'static str),

    /// An answer arrived after the zone already left the Active phase.
    #[error("answer already submitted for zone {0}")]
    DoubleSubmission(ZoneId),

    /// An operation that needs an Active zone found it in another phase.
    #[error("zone {zone_id} is not active (phase {phase})")]
    NotActive {
        /// The zone that rejected the operation.
        zone_id: ZoneId,
        /// Name of the phase the zone was in.
        phase: &'static str,
    },

    /// The submitted choice index is outside `0..4` or currently hidden.
    #[error("invalid choice index {0}")]
    InvalidChoice(usize),

    /// No zone with this identifier is registered.
    #[error("unknown zone: {0}")]
    UnknownZone(ZoneId),

    /// A validation error in domain logic.
    #[error("validation error: {0}")]
    Validation(String),
}
