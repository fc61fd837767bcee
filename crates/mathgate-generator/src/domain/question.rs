//! The immutable question value.

use std::collections::HashSet;

use mathgate_core::error::DomainError;
use mathgate_core::rng::DeterministicRng;
use mathgate_core::shuffle::permutation;
use serde::{Deserialize, Serialize};

use super::expression::Expression;

/// Number of answer options on every question.
pub const OPTION_COUNT: usize = 4;

/// Where a question came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QuestionOrigin {
    /// Produced by the generator; `answer` is the exact value of `expression`.
    Arithmetic { expression: Expression, answer: i64 },
    /// Hand-authored for a specific zone.
    Scripted,
}

/// A prompt, four distinct options and the index of the correct one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    prompt: String,
    options: [String; OPTION_COUNT],
    correct_index: usize,
    origin: QuestionOrigin,
}

impl Question {
    /// Builds a hand-authored question.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the prompt is blank, the options
    /// are not pairwise distinct, or `correct_index` is out of range.
    pub fn scripted(
        prompt: impl Into<String>,
        options: [String; OPTION_COUNT],
        correct_index: usize,
    ) -> Result<Self, DomainError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(DomainError::Validation("question prompt is empty".to_owned()));
        }
        if correct_index >= OPTION_COUNT {
            return Err(DomainError::Validation(format!(
                "correct_index {correct_index} is out of range"
            )));
        }
        let unique: HashSet<&str> = options.iter().map(String::as_str).collect();
        if unique.len() != OPTION_COUNT {
            return Err(DomainError::Validation(
                "question options must be pairwise distinct".to_owned(),
            ));
        }
        Ok(Self {
            prompt,
            options,
            correct_index,
            origin: QuestionOrigin::Scripted,
        })
    }

    /// Assembles a generated question. The generator guarantees the invariants.
    pub(crate) fn arithmetic(
        expression: Expression,
        answer: i64,
        options: [String; OPTION_COUNT],
        correct_index: usize,
    ) -> Self {
        debug_assert_eq!(options[correct_index], answer.to_string());
        Self {
            prompt: expression.to_string(),
            options,
            correct_index,
            origin: QuestionOrigin::Arithmetic { expression, answer },
        }
    }

    /// Text shown above the options.
    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// The four options in display order.
    #[must_use]
    pub fn options(&self) -> &[String; OPTION_COUNT] {
        &self.options
    }

    /// Index of the correct option.
    #[must_use]
    pub fn correct_index(&self) -> usize {
        self.correct_index
    }

    /// The correct option's text.
    #[must_use]
    pub fn correct_option(&self) -> &str {
        &self.options[self.correct_index]
    }

    #[must_use]
    pub fn origin(&self) -> &QuestionOrigin {
        &self.origin
    }

    /// Whether choosing `index` answers the question.
    #[must_use]
    pub fn is_correct(&self, index: usize) -> bool {
        index == self.correct_index
    }

    /// Returns a copy with the options in a fresh random order.
    #[must_use]
    pub fn shuffled(&self, rng: &mut dyn DeterministicRng) -> Self {
        let order = permutation(OPTION_COUNT, rng);
        let options = std::array::from_fn(|slot| self.options[order[slot]].clone());
        let mut correct_index = self.correct_index;
        for (slot, &source) in order.iter().enumerate() {
            if source == self.correct_index {
                correct_index = slot;
            }
        }
        Self {
            prompt: self.prompt.clone(),
            options,
            correct_index,
            origin: self.origin.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mathgate_core::rng::SeededRng;

    fn options(values: [&str; 4]) -> [String; 4] {
        values.map(str::to_owned)
    }

    #[test]
    fn test_scripted_question_is_valid() {
        let question =
            Question::scripted("Capital of France?", options(["Paris", "Rome", "Oslo", "Bern"]), 0)
                .unwrap();
        assert_eq!(question.correct_option(), "Paris");
        assert_eq!(question.origin(), &QuestionOrigin::Scripted);
        assert!(question.is_correct(0));
        assert!(!question.is_correct(1));
    }

    #[test]
    fn test_scripted_rejects_duplicate_options() {
        let result = Question::scripted("2 + 2", options(["4", "4", "5", "6"]), 0);
        match result {
            Err(DomainError::Validation(msg)) => assert!(msg.contains("distinct")),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_scripted_rejects_out_of_range_index() {
        let result = Question::scripted("2 + 2", options(["4", "3", "5", "6"]), 4);
        assert!(result.is_err());
    }

    #[test]
    fn test_scripted_rejects_blank_prompt() {
        let result = Question::scripted("   ", options(["4", "3", "5", "6"]), 0);
        assert!(result.is_err());
    }

    #[test]
    fn test_shuffled_keeps_correct_option_and_leaves_original_untouched() {
        let original = Question::scripted("7 - 2", options(["5", "6", "7", "8"]), 0).unwrap();
        let mut rng = SeededRng::from_seed_u64(17);
        for _ in 0..50 {
            let shuffled = original.shuffled(&mut rng);
            assert_eq!(shuffled.correct_option(), "5");
            let mut sorted = shuffled.options().clone();
            sorted.sort();
            assert_eq!(sorted, options(["5", "6", "7", "8"]));
        }
        assert_eq!(original.options(), &options(["5", "6", "7", "8"]));
        assert_eq!(original.correct_index(), 0);
    }
}
