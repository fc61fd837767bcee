//! Mathgate — Level Authoring.
//!
//! Responsible for YAML level ingestion, validation, content fingerprinting
//! and building a ready-to-run encounter runtime from a level.

pub mod application;
pub mod domain;

pub use application::loader::{LoadedLevel, build_runtime, load_level, parse_level};
pub use domain::definition::{LevelDefinition, QuestionDefinition, ZoneDefinition};
pub use domain::error::LevelError;
pub use domain::fingerprint::LevelFingerprint;
