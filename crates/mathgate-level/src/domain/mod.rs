//! Domain layer for level authoring.

pub mod definition;
pub mod error;
pub mod fingerprint;
