//! Arithmetic expressions evaluated strictly left to right.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Evaluations are clamped into `[-SAFETY_BAND, SAFETY_BAND]`.
///
/// Constraint bounds always lie well inside this band, so a clamped value can
/// never pass the bounds check.
pub const SAFETY_BAND: i64 = 10_000;

/// One of the four supported operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Subtract,
    #[serde(rename = "*")]
    Multiply,
    #[serde(rename = "/")]
    Divide,
}

impl Operator {
    /// All operators, in weight-table order.
    pub const ALL: [Self; 4] = [Self::Add, Self::Subtract, Self::Multiply, Self::Divide];

    /// The symbol shown to the player.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
        }
    }

    const fn precedence(self) -> u8 {
        match self {
            Self::Add | Self::Subtract => 1,
            Self::Multiply | Self::Divide => 2,
        }
    }

    /// Applies the operator with overflow checks.
    ///
    /// Division operands are built so the quotient is exact; `None` only
    /// signals overflow or a zero divisor.
    #[must_use]
    pub fn apply(self, lhs: i64, rhs: i64) -> Option<i64> {
        match self {
            Self::Add => lhs.checked_add(rhs),
            Self::Subtract => lhs.checked_sub(rhs),
            Self::Multiply => lhs.checked_mul(rhs),
            Self::Divide => {
                debug_assert!(rhs == 0 || lhs % rhs == 0, "inexact division {lhs} / {rhs}");
                lhs.checked_div(rhs)
            }
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// An operator followed by its right-hand operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    /// Operator joining the running value and `operand`.
    pub operator: Operator,
    /// Right-hand operand.
    pub operand: i64,
}

/// `head op1 x1 op2 x2 ...`, evaluated left to right.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expression {
    head: i64,
    terms: Vec<Term>,
}

impl Expression {
    /// A single `lhs op rhs` expression.
    #[must_use]
    pub fn binary(lhs: i64, operator: Operator, rhs: i64) -> Self {
        Self {
            head: lhs,
            terms: vec![Term {
                operator,
                operand: rhs,
            }],
        }
    }

    /// Appends another operator and operand.
    #[must_use]
    pub fn then(mut self, operator: Operator, operand: i64) -> Self {
        self.terms.push(Term { operator, operand });
        self
    }

    /// The leftmost operand.
    #[must_use]
    pub fn head(&self) -> i64 {
        self.head
    }

    /// Operator/operand pairs after the head.
    #[must_use]
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Iterates over the operators in order.
    pub fn operators(&self) -> impl Iterator<Item = Operator> + '_ {
        self.terms.iter().map(|term| term.operator)
    }

    /// Exact left-to-right value, or `None` on overflow.
    #[must_use]
    pub fn evaluate(&self) -> Option<i64> {
        self.terms
            .iter()
            .try_fold(self.head, |acc, term| term.operator.apply(acc, term.operand))
    }

    /// Left-to-right value clamped into the safety band.
    ///
    /// Overflow saturates to the top of the band.
    #[must_use]
    pub fn evaluate_clamped(&self) -> i64 {
        self.evaluate()
            .map_or(SAFETY_BAND, |value| value.clamp(-SAFETY_BAND, SAFETY_BAND))
    }
}

fn write_operand(f: &mut fmt::Formatter<'_>, value: i64) -> fmt::Result {
    if value < 0 {
        write!(f, "({value})")
    } else {
        write!(f, "{value}")
    }
}

/// Renders the expression so conventional precedence reads the same as
/// left-to-right evaluation: `(3 + 4) * 2`, `8 - 2 - 1`.
impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let opens = self
            .terms
            .windows(2)
            .filter(|pair| pair[1].operator.precedence() > pair[0].operator.precedence())
            .count();
        for _ in 0..opens {
            f.write_str("(")?;
        }
        write_operand(f, self.head)?;

        let mut previous: Option<Operator> = None;
        for term in &self.terms {
            if previous.is_some_and(|prev| term.operator.precedence() > prev.precedence()) {
                f.write_str(")")?;
            }
            write!(f, " {} ", term.operator)?;
            write_operand(f, term.operand)?;
            previous = Some(term.operator);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluates_left_to_right() {
        let expr = Expression::binary(3, Operator::Add, 4).then(Operator::Multiply, 2);
        assert_eq!(expr.evaluate(), Some(14));
    }

    #[test]
    fn test_display_adds_parentheses_when_precedence_would_differ() {
        let expr = Expression::binary(3, Operator::Add, 4).then(Operator::Multiply, 2);
        assert_eq!(expr.to_string(), "(3 + 4) * 2");
    }

    #[test]
    fn test_display_plain_when_left_to_right_matches_precedence() {
        let expr = Expression::binary(8, Operator::Subtract, 2).then(Operator::Subtract, 1);
        assert_eq!(expr.to_string(), "8 - 2 - 1");

        let expr = Expression::binary(6, Operator::Multiply, 2).then(Operator::Add, 1);
        assert_eq!(expr.to_string(), "6 * 2 + 1");

        let expr = Expression::binary(12, Operator::Divide, 3).then(Operator::Multiply, 2);
        assert_eq!(expr.to_string(), "12 / 3 * 2");
    }

    #[test]
    fn test_display_wraps_negative_operands() {
        let expr = Expression::binary(-3, Operator::Subtract, -4);
        assert_eq!(expr.to_string(), "(-3) - (-4)");
        assert_eq!(expr.evaluate(), Some(1));
    }

    #[test]
    fn test_simple_display() {
        assert_eq!(Expression::binary(1, Operator::Add, 1).to_string(), "1 + 1");
    }

    #[test]
    fn test_exact_division() {
        let expr = Expression::binary(42, Operator::Divide, 7);
        assert_eq!(expr.evaluate(), Some(6));
    }

    #[test]
    fn test_overflow_saturates_to_safety_band() {
        let expr = Expression::binary(i64::MAX, Operator::Add, 1);
        assert_eq!(expr.evaluate(), None);
        assert_eq!(expr.evaluate_clamped(), SAFETY_BAND);
    }

    #[test]
    fn test_clamped_large_negative() {
        let expr = Expression::binary(0, Operator::Subtract, 50_000);
        assert_eq!(expr.evaluate_clamped(), -SAFETY_BAND);
    }

    #[test]
    fn test_operator_serializes_as_symbol() {
        let json = serde_json::to_string(&Operator::Multiply).unwrap();
        assert_eq!(json, "\"*\"");
    }
}
