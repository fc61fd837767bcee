//! Level loading errors.

use mathgate_core::error::DomainError;
use thiserror::Error;

/// Errors that can occur when loading or validating a level.
#[derive(Debug, Error)]
pub enum LevelError {
    /// Failed to read the level file.
    #[error("failed to read level file: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse the level YAML.
    #[error("failed to parse level YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A required field is missing or blank.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// The level places no zones.
    #[error("level '{0}' has no zones")]
    NoZones(String),

    /// Two zones share a name.
    #[error("duplicate zone name: {0}")]
    DuplicateZone(String),

    /// A zone's settings are out of range.
    #[error("zone '{zone}': {reason}")]
    InvalidZone {
        /// The offending zone's name.
        zone: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A domain rule rejected part of the level.
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Result type for level operations.
pub type LevelResult<T> = Result<T, LevelError>;
