//! Time sources for event timestamps.
//!
//! Gameplay timers never read a clock; they advance from the frame tick.
//! Clocks only stamp `EventMetadata::occurred_at`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};

/// Source of event timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Reads the system clock.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Level time: a start instant plus the frame time advanced so far.
///
/// Replaying a run with the same frames stamps the same times.
#[derive(Debug)]
pub struct FrameClock {
    start: DateTime<Utc>,
    elapsed_micros: AtomicU64,
}

impl FrameClock {
    #[must_use]
    pub fn starting_at(start: DateTime<Utc>) -> Self {
        Self {
            start,
            elapsed_micros: AtomicU64::new(0),
        }
    }

    /// Moves level time forward by one frame.
    pub fn advance(&self, dt: Duration) {
        let micros = u64::try_from(dt.as_micros()).unwrap_or(u64::MAX);
        let _ = self
            .elapsed_micros
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |total| {
                Some(total.saturating_add(micros))
            });
    }

    /// Frame time advanced since `start`.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        Duration::from_micros(self.elapsed_micros.load(Ordering::Relaxed))
    }
}

impl Clock for FrameClock {
    fn now(&self) -> DateTime<Utc> {
        let micros = i64::try_from(self.elapsed_micros.load(Ordering::Relaxed)).unwrap_or(i64::MAX);
        self.start
            .checked_add_signed(TimeDelta::microseconds(micros))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap()
    }

    #[test]
    fn test_frame_clock_starts_at_anchor() {
        let clock = FrameClock::starting_at(start());
        assert_eq!(clock.now(), start());
        assert_eq!(clock.elapsed(), Duration::ZERO);
    }

    #[test]
    fn test_frame_clock_accumulates_frames() {
        let clock = FrameClock::starting_at(start());
        for _ in 0..90 {
            clock.advance(Duration::from_micros(16_667));
        }

        assert_eq!(clock.elapsed(), Duration::from_micros(1_500_030));
        assert_eq!(clock.now(), start() + TimeDelta::microseconds(1_500_030));
    }
}
