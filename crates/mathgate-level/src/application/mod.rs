//! Application layer for level authoring.

pub mod loader;
