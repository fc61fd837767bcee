//! Mathgate — Encounter Zones.
//!
//! Responsible for the per-zone quiz state machine (Idle → Active →
//! Resolving → Answered), its countdown, feedback and hint timers, the single
//! shared presentation surface, and the frame-loop runtime that ties them to
//! the host's trigger volumes.

pub mod application;
pub mod domain;
