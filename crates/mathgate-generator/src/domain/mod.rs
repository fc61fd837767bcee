//! Domain layer for question generation.

pub mod constraints;
pub mod expression;
pub mod question;
