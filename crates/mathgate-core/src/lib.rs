//! Mathgate Core — shared domain abstractions.
//!
//! This crate defines the fundamental traits and types that the generator
//! and encounter crates depend on: deterministic randomness, time, domain
//! events, errors, and the collaborator seams the host game implements.
//! It contains no game-loop code.

pub mod clock;
pub mod collaborators;
pub mod error;
pub mod event;
pub mod id;
pub mod rng;
pub mod shuffle;
