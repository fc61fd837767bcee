//! Constrained question generation.
//!
//! Expressions are built so that every division is exact and every product
//! uses small factors; the full expression is then evaluated and accepted
//! only if the result lies inside the constraint bounds. Exhausting the retry
//! budget falls back to a fixed, known-safe question.

use mathgate_core::error::DomainError;
use mathgate_core::rng::DeterministicRng;
use mathgate_core::shuffle::permutation;
use tracing::{debug, warn};

use crate::domain::constraints::{DISPLAY_BAND, GenerationConstraints};
use crate::domain::expression::{Expression, Operator};
use crate::domain::question::{OPTION_COUNT, Question};

/// Attempts for one-operator expressions.
pub const SIMPLE_ATTEMPTS: u32 = 200;
/// Attempts for two-operator expressions.
pub const ADVANCED_ATTEMPTS: u32 = 300;
/// Resamples of a factor pair before accepting an out-of-bounds product.
pub const FACTOR_RESAMPLES: u32 = 50;
/// Perturbation draws spent looking for distinct wrong options.
pub const OPTION_ATTEMPTS: u32 = 200;

const MAX_FACTOR: u32 = 10;
const MAX_DIVISOR: u32 = 10;
const MAX_PERTURBATION: i64 = 10;

/// Generates a question satisfying `constraints`. Never fails.
///
/// Invalid constraints and retry exhaustion are logged and answered with a
/// fallback question.
pub fn generate(constraints: &GenerationConstraints, rng: &mut dyn DeterministicRng) -> Question {
    match try_generate(constraints, rng) {
        Ok(question) => question,
        Err(err) => {
            warn!(error = %err, "falling back to safe question");
            fallback(constraints, rng)
        }
    }
}

/// Generates a question, reporting retry exhaustion instead of recovering.
///
/// # Errors
///
/// Returns `DomainError::Validation` for constraints that fail
/// `GenerationConstraints::validate`, and `DomainError::GenerationExhausted`
/// when no in-bounds expression was found within the retry budget.
pub fn try_generate(
    constraints: &GenerationConstraints,
    rng: &mut dyn DeterministicRng,
) -> Result<Question, DomainError> {
    constraints.validate()?;
    let advanced = rng.next_f64() < constraints.advanced_probability;
    let budget = if advanced {
        ADVANCED_ATTEMPTS
    } else {
        SIMPLE_ATTEMPTS
    };

    for attempt in 1..=budget {
        let expression = if advanced {
            advanced_expression(constraints, rng)
        } else {
            let operator = constraints.operator_weights.pick(rng.next_f64());
            simple_expression(operator, constraints, rng)
        };

        let answer = expression.evaluate_clamped();
        if constraints.contains(answer) {
            debug!(%expression, answer, attempt, "generated question");
            return Ok(build_question(expression, answer, rng));
        }
    }

    Err(DomainError::GenerationExhausted { attempts: budget })
}

/// Builds four distinct options around `correct` and shuffles them.
///
/// Returns the options in display order and the index of `correct`.
#[must_use]
pub fn generate_options(
    correct: i64,
    rng: &mut dyn DeterministicRng,
) -> ([String; OPTION_COUNT], usize) {
    let mut values = vec![correct];
    let mut attempts = 0;
    while values.len() < OPTION_COUNT && attempts < OPTION_ATTEMPTS {
        attempts += 1;
        let wrong = (correct + rng.next_i64_range(0, MAX_PERTURBATION))
            .clamp(-DISPLAY_BAND, DISPLAY_BAND);
        if !values.contains(&wrong) {
            values.push(wrong);
        }
    }

    // Fillers sit below the display band, so they can never collide with a
    // real option.
    let mut filler = -DISPLAY_BAND - 1;
    while values.len() < OPTION_COUNT {
        if !values.contains(&filler) {
            values.push(filler);
        }
        filler -= 1;
    }

    let order = permutation(OPTION_COUNT, rng);
    let options = std::array::from_fn(|slot| values[order[slot]].to_string());
    let correct_index = order.iter().position(|&source| source == 0).unwrap_or(0);
    (options, correct_index)
}

fn build_question(expression: Expression, answer: i64, rng: &mut dyn DeterministicRng) -> Question {
    let (options, correct_index) = generate_options(answer, rng);
    Question::arithmetic(expression, answer, options, correct_index)
}

fn sample_in_bounds(constraints: &GenerationConstraints, rng: &mut dyn DeterministicRng) -> i64 {
    rng.next_i64_range(constraints.min_result, constraints.max_result)
}

/// Small factors whose product lands in bounds when possible.
fn factor_pair(constraints: &GenerationConstraints, rng: &mut dyn DeterministicRng) -> (i64, i64) {
    let mut a = i64::from(rng.next_u32_range(0, MAX_FACTOR));
    let mut b = i64::from(rng.next_u32_range(0, MAX_FACTOR));
    let mut resamples = 0;
    while !constraints.contains(a * b) && resamples < FACTOR_RESAMPLES {
        a = i64::from(rng.next_u32_range(0, MAX_FACTOR));
        b = i64::from(rng.next_u32_range(0, MAX_FACTOR));
        resamples += 1;
    }
    (a, b)
}

/// A small factor multiplying `lhs` into bounds when possible.
fn factor_for(
    lhs: i64,
    constraints: &GenerationConstraints,
    rng: &mut dyn DeterministicRng,
) -> i64 {
    let mut factor = i64::from(rng.next_u32_range(0, MAX_FACTOR));
    let mut resamples = 0;
    while !lhs.checked_mul(factor).is_some_and(|p| constraints.contains(p))
        && resamples < FACTOR_RESAMPLES
    {
        factor = i64::from(rng.next_u32_range(0, MAX_FACTOR));
        resamples += 1;
    }
    factor
}

/// `divisor * quotient` and `divisor`, so the quotient is exact and in bounds.
fn exact_quotient(constraints: &GenerationConstraints, rng: &mut dyn DeterministicRng) -> (i64, i64) {
    let divisor = i64::from(rng.next_u32_range(1, MAX_DIVISOR));
    let quotient = sample_in_bounds(constraints, rng);
    (divisor * quotient, divisor)
}

/// A divisor in `1..=10` that divides `lhs` exactly.
#[allow(clippy::cast_possible_truncation)]
fn exact_divisor_of(lhs: i64, rng: &mut dyn DeterministicRng) -> i64 {
    let divisors: Vec<i64> = (1..=i64::from(MAX_DIVISOR))
        .filter(|d| lhs % d == 0)
        .collect();
    // 1 always divides, so the list is never empty.
    let pick = rng.next_u32_range(0, (divisors.len() - 1) as u32) as usize;
    divisors[pick.min(divisors.len() - 1)]
}

fn simple_expression(
    operator: Operator,
    constraints: &GenerationConstraints,
    rng: &mut dyn DeterministicRng,
) -> Expression {
    match operator {
        Operator::Add | Operator::Subtract => {
            let a = sample_in_bounds(constraints, rng);
            let b = sample_in_bounds(constraints, rng);
            Expression::binary(a, operator, b)
        }
        Operator::Multiply => {
            let (a, b) = factor_pair(constraints, rng);
            Expression::binary(a, operator, b)
        }
        Operator::Divide => {
            let (dividend, divisor) = exact_quotient(constraints, rng);
            Expression::binary(dividend, operator, divisor)
        }
    }
}

/// `(a op1 b) op2 c`, with `c` chosen against the intermediate value.
fn advanced_expression(
    constraints: &GenerationConstraints,
    rng: &mut dyn DeterministicRng,
) -> Expression {
    let first = constraints.operator_weights.pick(rng.next_f64());
    let second = constraints.operator_weights.pick(rng.next_f64());

    let head = simple_expression(first, constraints, rng);
    let intermediate = head.evaluate_clamped();
    let operand = match second {
        Operator::Add | Operator::Subtract => sample_in_bounds(constraints, rng),
        Operator::Multiply => factor_for(intermediate, constraints, rng),
        Operator::Divide => exact_divisor_of(intermediate, rng),
    };
    head.then(second, operand)
}

fn fallback(constraints: &GenerationConstraints, rng: &mut dyn DeterministicRng) -> Question {
    let triple = Expression::binary(1, Operator::Add, 2).then(Operator::Add, 3);
    let pair = Expression::binary(1, Operator::Add, 1);
    let expression = if constraints.advanced_probability > 0.0 && constraints.contains(6) {
        triple
    } else if constraints.contains(2) {
        pair
    } else {
        Expression::binary(constraints.min_result, Operator::Add, 0)
    };
    let answer = expression.evaluate_clamped();
    build_question(expression, answer, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mathgate_core::rng::SeededRng;
    use mathgate_test_support::{MockRng, SequenceRng};

    use crate::domain::constraints::OperatorWeights;
    use crate::domain::question::QuestionOrigin;

    fn constraints(min: i64, max: i64, advanced: f64, weights: OperatorWeights) -> GenerationConstraints {
        GenerationConstraints {
            min_result: min,
            max_result: max,
            advanced_probability: advanced,
            operator_weights: weights,
        }
    }

    fn answer_of(question: &Question) -> i64 {
        match question.origin() {
            QuestionOrigin::Arithmetic { answer, .. } => *answer,
            QuestionOrigin::Scripted => panic!("expected arithmetic question"),
        }
    }

    #[test]
    fn test_generate_options_are_distinct_and_contain_answer() {
        let mut rng = SeededRng::from_seed_u64(8);
        let (options, index) = generate_options(42, &mut rng);
        assert_eq!(options[index], "42");
        for i in 0..OPTION_COUNT {
            for j in i + 1..OPTION_COUNT {
                assert_ne!(options[i], options[j]);
            }
        }
    }

    #[test]
    fn test_generate_options_pads_with_fillers_when_perturbation_stalls() {
        // MockRng always perturbs by 0, so no wrong option is ever found.
        let (options, index) = generate_options(7, &mut MockRng);
        assert_eq!(options[index], "7");
        let mut sorted: Vec<i64> = options.iter().map(|o| o.parse().unwrap()).collect();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![-1003, -1002, -1001, 7]);
    }

    #[test]
    fn test_generate_options_at_top_of_display_band() {
        let mut rng = SeededRng::from_seed_u64(4);
        let (options, index) = generate_options(DISPLAY_BAND, &mut rng);
        assert_eq!(options[index], DISPLAY_BAND.to_string());
        let unique: std::collections::HashSet<&String> = options.iter().collect();
        assert_eq!(unique.len(), OPTION_COUNT);
    }

    #[test]
    fn test_division_only_is_exact() {
        let c = constraints(0, 100, 0.0, OperatorWeights::only(Operator::Divide));
        let mut rng = SeededRng::from_seed_u64(31);
        for _ in 0..200 {
            let question = generate(&c, &mut rng);
            let QuestionOrigin::Arithmetic { expression, answer } = question.origin() else {
                panic!("expected arithmetic question");
            };
            let divisor = expression.terms()[0].operand;
            assert!(divisor >= 1);
            assert_eq!(expression.head() % divisor, 0);
            assert_eq!(expression.head() / divisor, *answer);
        }
    }

    #[test]
    fn test_advanced_expressions_have_two_operators() {
        let c = constraints(0, 100, 1.0, OperatorWeights::MIXED);
        let mut rng = SeededRng::from_seed_u64(77);
        for _ in 0..200 {
            let question = generate(&c, &mut rng);
            let QuestionOrigin::Arithmetic { expression, answer } = question.origin() else {
                panic!("expected arithmetic question");
            };
            // Fallback `1 + 2 + 3` also has two operators.
            assert_eq!(expression.terms().len(), 2);
            assert_eq!(expression.evaluate(), Some(*answer));
            assert!(c.contains(*answer));
        }
    }

    #[test]
    fn test_impossible_constraints_exhaust_and_fall_back() {
        // No product of two factors in 0..=10 equals 97.
        let c = constraints(97, 97, 0.0, OperatorWeights::only(Operator::Multiply));
        let mut rng = SeededRng::from_seed_u64(3);

        let err = try_generate(&c, &mut rng).unwrap_err();
        assert_eq!(err, DomainError::GenerationExhausted { attempts: SIMPLE_ATTEMPTS });

        let question = generate(&c, &mut rng);
        assert_eq!(question.prompt(), "97 + 0");
        assert_eq!(answer_of(&question), 97);
        assert_eq!(question.correct_option(), "97");
    }

    #[test]
    fn test_inverted_bounds_fall_back_without_sampling() {
        let c = constraints(10, 5, 0.0, OperatorWeights::MIXED);
        let mut rng = SeededRng::from_seed_u64(6);

        let err = try_generate(&c, &mut rng).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let question = generate(&c, &mut rng);
        assert_eq!(question.prompt(), "10 + 0");
        assert_eq!(question.correct_option(), "10");
    }

    #[test]
    fn test_fallback_prefers_one_plus_one() {
        let c = constraints(0, 10, 0.0, OperatorWeights::only(Operator::Add));
        let question = fallback(&c, &mut SeededRng::from_seed_u64(1));
        assert_eq!(question.prompt(), "1 + 1");
        assert_eq!(question.correct_option(), "2");
    }

    #[test]
    fn test_fallback_advanced() {
        let c = constraints(0, 10, 0.5, OperatorWeights::MIXED);
        let question = fallback(&c, &mut SeededRng::from_seed_u64(1));
        assert_eq!(question.prompt(), "1 + 2 + 3");
        assert_eq!(question.correct_option(), "6");
    }

    #[test]
    fn test_scripted_sequence_builds_expected_addition() {
        // Floats: 0.9 keeps it simple, 0.0 picks `+`. Integers: operands 12
        // and 30, three perturbations, then the option permutation.
        let c = constraints(0, 100, 0.5, OperatorWeights::only(Operator::Add));
        let mut rng = SequenceRng::new(vec![12, 30, 1, 2, 3, 0, 0, 0])
            .with_floats(vec![0.9, 0.0]);

        let question = try_generate(&c, &mut rng).unwrap();

        assert_eq!(question.prompt(), "12 + 30");
        assert_eq!(answer_of(&question), 42);
        assert_eq!(question.correct_option(), "42");
    }

    #[test]
    fn test_exact_divisor_of_zero_accepts_any_divisor() {
        let mut rng = SeededRng::from_seed_u64(12);
        for _ in 0..50 {
            let d = exact_divisor_of(0, &mut rng);
            assert!((1..=10).contains(&d));
        }
    }

    #[test]
    fn test_exact_divisor_of_prime_is_one() {
        let mut rng = SeededRng::from_seed_u64(12);
        for _ in 0..20 {
            assert_eq!(exact_divisor_of(97, &mut rng), 1);
        }
    }
}
