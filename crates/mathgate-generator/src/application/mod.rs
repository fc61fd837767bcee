//! Application layer for question generation.

pub mod generator;
