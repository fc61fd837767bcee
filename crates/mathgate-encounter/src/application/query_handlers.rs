//! Read-only views of the runtime for UI layers.

use glam::Vec3;
use mathgate_core::error::DomainError;
use mathgate_core::id::ZoneId;
use serde::Serialize;

use crate::application::runtime::EncounterRuntime;
use crate::domain::events::Outcome;
use crate::domain::zone::EncounterZone;

/// Read-only view of one zone.
#[derive(Debug, Serialize)]
pub struct ZoneView {
    /// The zone identifier.
    pub zone_id: ZoneId,
    /// Display name.
    pub name: String,
    /// World position.
    pub position: Vec3,
    /// Lifecycle phase as a string.
    pub phase: String,
    /// Whether the zone owns the surface.
    pub presented: bool,
    /// Activations since the last reset.
    pub activations: u32,
    /// Whether this activation bought a hint.
    pub hint_used: bool,
    /// Countdown time left in milliseconds.
    pub time_remaining_ms: u64,
    /// How the zone was resolved, once it was.
    pub outcome: Option<Outcome>,
}

/// One answer button.
#[derive(Debug, Serialize)]
pub struct OptionView {
    /// Button text.
    pub text: String,
    /// Hidden by a hint.
    pub hidden: bool,
}

/// What the question surface should render.
#[derive(Debug, Serialize)]
pub struct SurfaceView {
    /// The owning zone.
    pub zone_id: ZoneId,
    /// Prompt text.
    pub prompt: String,
    /// Answer buttons in display order.
    pub options: Vec<OptionView>,
    /// Whether the buttons accept input.
    pub accepting_input: bool,
    /// Whether the hint control is enabled.
    pub hint_enabled: bool,
    /// Countdown time left in milliseconds.
    pub time_remaining_ms: u64,
    /// Progress of the hint reveal animation, while it plays.
    pub hint_reveal_progress: Option<f32>,
}

#[allow(clippy::cast_possible_truncation)]
fn millis(zone: &EncounterZone) -> u64 {
    zone.time_remaining().as_millis() as u64
}

/// Builds the view of a single zone.
#[must_use]
pub fn zone_view(zone: &EncounterZone) -> ZoneView {
    ZoneView {
        zone_id: zone.id(),
        name: zone.config().name.clone(),
        position: zone.config().position,
        phase: zone.phase().as_str().to_owned(),
        presented: zone.is_presented(),
        activations: zone.activations(),
        hint_used: zone.hint_used(),
        time_remaining_ms: millis(zone),
        outcome: zone.outcome(),
    }
}

/// Looks up a zone by id.
///
/// # Errors
///
/// Returns `DomainError::UnknownZone` if no zone has this id.
pub fn get_zone(runtime: &EncounterRuntime, zone_id: ZoneId) -> Result<ZoneView, DomainError> {
    runtime
        .zone(zone_id)
        .map(zone_view)
        .ok_or(DomainError::UnknownZone(zone_id))
}

/// Views of every zone in placement order.
#[must_use]
pub fn list_zones(runtime: &EncounterRuntime) -> Vec<ZoneView> {
    runtime.zones().iter().map(zone_view).collect()
}

/// The surface contents, or `None` while nothing is shown.
#[must_use]
pub fn surface_view(runtime: &EncounterRuntime) -> Option<SurfaceView> {
    let session = runtime.arbiter().session()?;
    let zone = runtime.zone(session.owner)?;
    let accepting_input = !session.locked && zone.accepts_input();
    Some(SurfaceView {
        zone_id: session.owner,
        prompt: session.prompt.clone(),
        options: session
            .options
            .iter()
            .zip(session.hidden)
            .map(|(text, hidden)| OptionView {
                text: text.clone(),
                hidden,
            })
            .collect(),
        accepting_input,
        hint_enabled: accepting_input && zone.hint_available(),
        time_remaining_ms: millis(zone),
        hint_reveal_progress: zone.hint_reveal_progress(),
    })
}
