//! Mathgate — Question Generation.
//!
//! Produces numerically valid arithmetic questions from constraint
//! parameters: an expression whose result lies inside the requested bounds,
//! four distinct answer options, and the index of the correct one.

pub mod application;
pub mod domain;

pub use application::generator::{generate, generate_options, try_generate};
pub use domain::constraints::{Difficulty, GenerationConstraints, OperatorWeights, QuestionCategory};
pub use domain::expression::{Expression, Operator};
pub use domain::question::{Question, QuestionOrigin};
