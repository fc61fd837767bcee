//! Domain layer for encounter zones.

pub mod arbiter;
pub mod events;
pub mod proximity;
pub mod task;
pub mod zone;
