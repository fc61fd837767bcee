//! Generation constraints: result bounds and operator weighting.

use mathgate_core::error::DomainError;
use serde::{Deserialize, Serialize};

use super::expression::Operator;

/// Options and results are clamped into `[-DISPLAY_BAND, DISPLAY_BAND]`.
pub const DISPLAY_BAND: i64 = 1_000;

const WEIGHT_TOLERANCE: f64 = 1e-6;

/// Probability of picking each operator for an operator slot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OperatorWeights {
    #[serde(rename = "+", default)]
    pub add: f64,
    #[serde(rename = "-", default)]
    pub subtract: f64,
    #[serde(rename = "*", default)]
    pub multiply: f64,
    #[serde(rename = "/", default)]
    pub divide: f64,
}

impl OperatorWeights {
    /// Mostly addition and subtraction, with occasional products and quotients.
    pub const MIXED: Self = Self {
        add: 0.45,
        subtract: 0.35,
        multiply: 0.10,
        divide: 0.10,
    };

    /// Every slot uses `operator`.
    #[must_use]
    pub const fn only(operator: Operator) -> Self {
        let mut weights = Self {
            add: 0.0,
            subtract: 0.0,
            multiply: 0.0,
            divide: 0.0,
        };
        match operator {
            Operator::Add => weights.add = 1.0,
            Operator::Subtract => weights.subtract = 1.0,
            Operator::Multiply => weights.multiply = 1.0,
            Operator::Divide => weights.divide = 1.0,
        }
        weights
    }

    /// Weight assigned to `operator`.
    #[must_use]
    pub const fn weight(&self, operator: Operator) -> f64 {
        match operator {
            Operator::Add => self.add,
            Operator::Subtract => self.subtract,
            Operator::Multiply => self.multiply,
            Operator::Divide => self.divide,
        }
    }

    /// Sum of all weights.
    #[must_use]
    pub fn total(&self) -> f64 {
        Operator::ALL.iter().map(|&op| self.weight(op)).sum()
    }

    /// Maps a uniform roll in `[0, 1)` to an operator.
    ///
    /// Zero-weight operators are never returned.
    #[must_use]
    pub fn pick(&self, roll: f64) -> Operator {
        let mut cumulative = 0.0;
        let mut last_positive = Operator::Add;
        for op in Operator::ALL {
            let weight = self.weight(op);
            if weight <= 0.0 {
                continue;
            }
            cumulative += weight;
            last_positive = op;
            if roll < cumulative {
                return op;
            }
        }
        // Rounding left the roll past the last boundary.
        last_positive
    }

    fn validate(&self) -> Result<(), DomainError> {
        if Operator::ALL
            .iter()
            .any(|&op| !self.weight(op).is_finite() || self.weight(op) < 0.0)
        {
            return Err(DomainError::Validation(
                "operator weights must be finite and non-negative".to_owned(),
            ));
        }
        let total = self.total();
        if (total - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(DomainError::Validation(format!(
                "operator weights must sum to 1, got {total}"
            )));
        }
        Ok(())
    }
}

impl Default for OperatorWeights {
    fn default() -> Self {
        Self::MIXED
    }
}

/// Which operators a zone asks about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionCategory {
    Addition,
    Subtraction,
    Multiplication,
    Division,
    #[default]
    Mixed,
}

impl QuestionCategory {
    /// The operator table for this category.
    #[must_use]
    pub const fn weights(self) -> OperatorWeights {
        match self {
            Self::Addition => OperatorWeights::only(Operator::Add),
            Self::Subtraction => OperatorWeights::only(Operator::Subtract),
            Self::Multiplication => OperatorWeights::only(Operator::Multiply),
            Self::Division => OperatorWeights::only(Operator::Divide),
            Self::Mixed => OperatorWeights::MIXED,
        }
    }
}

/// Result range and expression length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    const fn max_result(self) -> i64 {
        match self {
            Self::Easy => 20,
            Self::Normal => 100,
            Self::Hard => 500,
        }
    }

    const fn advanced_probability(self) -> f64 {
        match self {
            Self::Easy => 0.0,
            Self::Normal => 0.10,
            Self::Hard => 0.35,
        }
    }
}

/// Everything the generator needs to know about a zone's questions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationConstraints {
    /// Smallest acceptable result (inclusive).
    pub min_result: i64,
    /// Largest acceptable result (inclusive).
    pub max_result: i64,
    /// Chance of a two-operator expression.
    pub advanced_probability: f64,
    /// Operator selection table.
    #[serde(default)]
    pub operator_weights: OperatorWeights,
}

impl GenerationConstraints {
    /// Builds constraints from a category and difficulty preset.
    #[must_use]
    pub const fn preset(category: QuestionCategory, difficulty: Difficulty) -> Self {
        Self {
            min_result: 0,
            max_result: difficulty.max_result(),
            advanced_probability: difficulty.advanced_probability(),
            operator_weights: category.weights(),
        }
    }

    /// Checks bounds, probability and weights.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` describing the first violated rule.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.min_result > self.max_result {
            return Err(DomainError::Validation(format!(
                "min_result {} exceeds max_result {}",
                self.min_result, self.max_result
            )));
        }
        if self.min_result < -DISPLAY_BAND || self.max_result > DISPLAY_BAND {
            return Err(DomainError::Validation(format!(
                "result bounds must lie within ±{DISPLAY_BAND}"
            )));
        }
        if !(0.0..=1.0).contains(&self.advanced_probability) {
            return Err(DomainError::Validation(format!(
                "advanced_probability {} is outside [0, 1]",
                self.advanced_probability
            )));
        }
        self.operator_weights.validate()
    }

    /// Whether `value` lies inside the result bounds.
    #[must_use]
    pub fn contains(&self, value: i64) -> bool {
        (self.min_result..=self.max_result).contains(&value)
    }
}

impl Default for GenerationConstraints {
    fn default() -> Self {
        Self::preset(QuestionCategory::Mixed, Difficulty::Normal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_mixed_normal() {
        let constraints = GenerationConstraints::default();
        assert_eq!(constraints.min_result, 0);
        assert_eq!(constraints.max_result, 100);
        assert!((constraints.advanced_probability - 0.10).abs() < f64::EPSILON);
        assert_eq!(constraints.operator_weights, OperatorWeights::MIXED);
        assert!(constraints.validate().is_ok());
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let constraints = GenerationConstraints {
            min_result: 10,
            max_result: 5,
            ..GenerationConstraints::default()
        };
        match constraints.validate() {
            Err(DomainError::Validation(msg)) => assert!(msg.contains("exceeds")),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_bounds_outside_display_band_rejected() {
        let constraints = GenerationConstraints {
            max_result: 5_000,
            ..GenerationConstraints::default()
        };
        assert!(constraints.validate().is_err());
    }

    #[test]
    fn test_weights_must_sum_to_one() {
        let constraints = GenerationConstraints {
            operator_weights: OperatorWeights {
                add: 0.5,
                subtract: 0.2,
                multiply: 0.0,
                divide: 0.0,
            },
            ..GenerationConstraints::default()
        };
        assert!(constraints.validate().is_err());
    }

    #[test]
    fn test_probability_out_of_range_rejected() {
        let constraints = GenerationConstraints {
            advanced_probability: 1.5,
            ..GenerationConstraints::default()
        };
        assert!(constraints.validate().is_err());
    }

    #[test]
    fn test_pick_follows_cumulative_weights() {
        let weights = OperatorWeights::MIXED;
        assert_eq!(weights.pick(0.0), Operator::Add);
        assert_eq!(weights.pick(0.44), Operator::Add);
        assert_eq!(weights.pick(0.45), Operator::Subtract);
        assert_eq!(weights.pick(0.85), Operator::Multiply);
        assert_eq!(weights.pick(0.95), Operator::Divide);
    }

    #[test]
    fn test_pick_never_returns_zero_weight_operator() {
        let weights = OperatorWeights {
            add: 0.5,
            subtract: 0.5,
            multiply: 0.0,
            divide: 0.0,
        };
        for roll in [0.0, 0.25, 0.5, 0.75, 0.999_999, 1.0] {
            let op = weights.pick(roll);
            assert!(matches!(op, Operator::Add | Operator::Subtract), "{op:?}");
        }
    }

    #[test]
    fn test_category_presets() {
        let constraints =
            GenerationConstraints::preset(QuestionCategory::Division, Difficulty::Easy);
        assert_eq!(constraints.operator_weights.pick(0.3), Operator::Divide);
        assert_eq!(constraints.max_result, 20);
        assert!(constraints.advanced_probability.abs() < f64::EPSILON);
        assert!(constraints.validate().is_ok());
    }
}
