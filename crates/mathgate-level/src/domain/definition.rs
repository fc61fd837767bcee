//! Level definitions as authored in YAML.

use std::collections::HashSet;
use std::time::Duration;

use glam::Vec3;
use mathgate_encounter::domain::zone::{QuestionSource, ZoneConfig};
use mathgate_generator::{Difficulty, GenerationConstraints, Question, QuestionCategory};
use serde::{Deserialize, Serialize};

use super::error::{LevelError, LevelResult};

/// A whole level: where the zones are and how each one asks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDefinition {
    /// Level name.
    pub name: String,

    /// Fixed RNG seed. When absent the seed comes from the level fingerprint.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Where the objective indicator points once every zone is resolved.
    pub finish: Vec3,

    /// Timing and cost defaults for every zone.
    #[serde(default)]
    pub defaults: ZoneDefaults,

    /// Zones in placement order.
    #[serde(default)]
    pub zones: Vec<ZoneDefinition>,
}

/// Level-wide zone settings; each zone may override them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneDefaults {
    pub time_limit_secs: f64,
    pub feedback_secs: f64,
    pub hint_reveal_secs: f64,
    pub hint_cost: u32,
    pub score_bonus: u32,
}

impl Default for ZoneDefaults {
    fn default() -> Self {
        Self {
            time_limit_secs: ZoneConfig::DEFAULT_TIME_LIMIT.as_secs_f64(),
            feedback_secs: ZoneConfig::DEFAULT_FEEDBACK.as_secs_f64(),
            hint_reveal_secs: ZoneConfig::DEFAULT_HINT_REVEAL.as_secs_f64(),
            hint_cost: ZoneConfig::DEFAULT_HINT_COST,
            score_bonus: ZoneConfig::DEFAULT_SCORE_BONUS,
        }
    }
}

/// One placed zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneDefinition {
    /// Unique name within the level.
    pub name: String,

    /// World position.
    pub position: Vec3,

    /// Operator mix preset.
    #[serde(default)]
    pub category: QuestionCategory,

    /// Result range preset.
    #[serde(default)]
    pub difficulty: Difficulty,

    /// Explicit constraints, replacing the category/difficulty preset.
    #[serde(default)]
    pub constraints: Option<GenerationConstraints>,

    /// An authored question, replacing generation entirely.
    #[serde(default)]
    pub question: Option<QuestionDefinition>,

    #[serde(default)]
    pub time_limit_secs: Option<f64>,
    #[serde(default)]
    pub feedback_secs: Option<f64>,
    #[serde(default)]
    pub hint_reveal_secs: Option<f64>,
    #[serde(default)]
    pub hint_cost: Option<u32>,
    #[serde(default)]
    pub score_bonus: Option<u32>,
}

/// A hand-written question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDefinition {
    pub prompt: String,
    pub options: [String; 4],
    pub correct_index: usize,
}

impl LevelDefinition {
    /// Parses a level from YAML and validates it.
    ///
    /// # Errors
    ///
    /// Returns `LevelError::Yaml` on malformed input, or the first
    /// validation failure.
    pub fn from_yaml(yaml: &str) -> LevelResult<Self> {
        let level: Self = serde_yaml::from_str(yaml)?;
        level.validate()?;
        Ok(level)
    }

    /// Checks every zone can be turned into a `ZoneConfig`.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> LevelResult<()> {
        if self.name.trim().is_empty() {
            return Err(LevelError::MissingField("name".to_owned()));
        }
        if !self.finish.is_finite() {
            return Err(LevelError::InvalidZone {
                zone: "finish".to_owned(),
                reason: "position is not finite".to_owned(),
            });
        }
        if self.zones.is_empty() {
            return Err(LevelError::NoZones(self.name.clone()));
        }
        let mut names = HashSet::new();
        for zone in &self.zones {
            if !names.insert(zone.name.as_str()) {
                return Err(LevelError::DuplicateZone(zone.name.clone()));
            }
            zone.to_config(&self.defaults)?;
        }
        Ok(())
    }
}

impl ZoneDefinition {
    /// Resolves this zone against the level defaults.
    ///
    /// # Errors
    ///
    /// Returns `LevelError::MissingField` for a blank name,
    /// `LevelError::InvalidZone` for bad timings or position, or
    /// `LevelError::Domain` when the constraints or question are rejected.
    pub fn to_config(&self, defaults: &ZoneDefaults) -> LevelResult<ZoneConfig> {
        if self.name.trim().is_empty() {
            return Err(LevelError::MissingField("zones[].name".to_owned()));
        }
        if !self.position.is_finite() {
            return Err(self.invalid("position is not finite"));
        }

        let source = match &self.question {
            Some(authored) => QuestionSource::Scripted(Question::scripted(
                authored.prompt.clone(),
                authored.options.clone(),
                authored.correct_index,
            )?),
            None => {
                let constraints = self
                    .constraints
                    .unwrap_or_else(|| GenerationConstraints::preset(self.category, self.difficulty));
                constraints.validate()?;
                QuestionSource::Generated(constraints)
            }
        };

        Ok(ZoneConfig {
            name: self.name.clone(),
            position: self.position,
            source,
            time_limit: self.seconds(
                "time_limit_secs",
                self.time_limit_secs.unwrap_or(defaults.time_limit_secs),
            )?,
            feedback_duration: self.seconds(
                "feedback_secs",
                self.feedback_secs.unwrap_or(defaults.feedback_secs),
            )?,
            hint_reveal_duration: self.seconds(
                "hint_reveal_secs",
                self.hint_reveal_secs.unwrap_or(defaults.hint_reveal_secs),
            )?,
            hint_cost: self.hint_cost.unwrap_or(defaults.hint_cost),
            score_bonus: self.score_bonus.unwrap_or(defaults.score_bonus),
        })
    }

    fn seconds(&self, field: &str, value: f64) -> LevelResult<Duration> {
        Duration::try_from_secs_f64(value)
            .map_err(|_| self.invalid(&format!("{field} must be a non-negative number, got {value}")))
    }

    fn invalid(&self, reason: &str) -> LevelError {
        LevelError::InvalidZone {
            zone: self.name.clone(),
            reason: reason.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mathgate_core::error::DomainError;

    const LEVEL: &str = r#"
name: Canyon Run
finish: [0.0, 0.0, 120.0]
defaults:
  hint_cost: 25
zones:
  - name: First Gate
    position: [0.0, 0.0, 20.0]
    category: addition
    difficulty: easy
  - name: Bridge
    position: [4.0, 1.0, 60.0]
    constraints:
      min_result: 0
      max_result: 50
      advanced_probability: 0.0
      operator_weights: { "+": 0.5, "-": 0.5 }
    time_limit_secs: 20
    score_bonus: 800
  - name: Riddle
    position: [0.0, 2.0, 90.0]
    question:
      prompt: "What is 12 / 4?"
      options: ["3", "4", "8", "16"]
      correct_index: 0
"#;

    #[test]
    fn test_parses_valid_level() {
        let level = LevelDefinition::from_yaml(LEVEL).unwrap();

        assert_eq!(level.name, "Canyon Run");
        assert_eq!(level.seed, None);
        assert_eq!(level.finish, Vec3::new(0.0, 0.0, 120.0));
        assert_eq!(level.zones.len(), 3);
        assert_eq!(level.zones[0].category, QuestionCategory::Addition);
        assert_eq!(level.zones[0].difficulty, Difficulty::Easy);
    }

    #[test]
    fn test_zone_config_applies_defaults_and_overrides() {
        let level = LevelDefinition::from_yaml(LEVEL).unwrap();

        let first = level.zones[0].to_config(&level.defaults).unwrap();
        assert_eq!(first.time_limit, Duration::from_secs(15));
        assert_eq!(first.hint_cost, 25);
        assert_eq!(
            first.source,
            QuestionSource::Generated(GenerationConstraints::preset(
                QuestionCategory::Addition,
                Difficulty::Easy
            ))
        );

        let bridge = level.zones[1].to_config(&level.defaults).unwrap();
        assert_eq!(bridge.time_limit, Duration::from_secs(20));
        assert_eq!(bridge.score_bonus, 800);
        match bridge.source {
            QuestionSource::Generated(constraints) => {
                assert_eq!(constraints.max_result, 50);
                assert!((constraints.operator_weights.multiply).abs() < f64::EPSILON);
            }
            QuestionSource::Scripted(_) => panic!("expected generated source"),
        }

        let riddle = level.zones[2].to_config(&level.defaults).unwrap();
        match riddle.source {
            QuestionSource::Scripted(question) => assert_eq!(question.correct_option(), "3"),
            QuestionSource::Generated(_) => panic!("expected scripted source"),
        }
    }

    #[test]
    fn test_rejects_level_without_zones() {
        let result = LevelDefinition::from_yaml("name: Empty\nfinish: [0, 0, 0]\n");
        match result.unwrap_err() {
            LevelError::NoZones(name) => assert_eq!(name, "Empty"),
            other => panic!("expected NoZones, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_duplicate_zone_names() {
        let yaml = r"
name: Twins
finish: [0, 0, 0]
zones:
  - { name: A, position: [0, 0, 0] }
  - { name: A, position: [1, 0, 0] }
";
        match LevelDefinition::from_yaml(yaml).unwrap_err() {
            LevelError::DuplicateZone(name) => assert_eq!(name, "A"),
            other => panic!("expected DuplicateZone, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_negative_time_limit() {
        let yaml = r"
name: Rushed
finish: [0, 0, 0]
zones:
  - { name: A, position: [0, 0, 0], time_limit_secs: -1 }
";
        match LevelDefinition::from_yaml(yaml).unwrap_err() {
            LevelError::InvalidZone { zone, reason } => {
                assert_eq!(zone, "A");
                assert!(reason.contains("time_limit_secs"));
            }
            other => panic!("expected InvalidZone, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_inverted_constraints() {
        let yaml = r"
name: Upside Down
finish: [0, 0, 0]
zones:
  - name: A
    position: [0, 0, 0]
    constraints: { min_result: 10, max_result: 5, advanced_probability: 0.0 }
";
        match LevelDefinition::from_yaml(yaml).unwrap_err() {
            LevelError::Domain(DomainError::Validation(msg)) => {
                assert!(msg.contains("exceeds"));
            }
            other => panic!("expected Domain(Validation), got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_scripted_question_with_duplicate_options() {
        let yaml = r#"
name: Sloppy
finish: [0, 0, 0]
zones:
  - name: A
    position: [0, 0, 0]
    question: { prompt: "1 + 1", options: ["2", "2", "3", "4"], correct_index: 0 }
"#;
        assert!(matches!(
            LevelDefinition::from_yaml(yaml),
            Err(LevelError::Domain(DomainError::Validation(_)))
        ));
    }

    #[test]
    fn test_malformed_yaml_is_reported() {
        assert!(matches!(
            LevelDefinition::from_yaml("name: [unclosed"),
            Err(LevelError::Yaml(_))
        ));
    }
}
