//! Application layer for encounter zones.

pub mod query_handlers;
pub mod runtime;
