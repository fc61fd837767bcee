//! Schedulable timed tasks advanced by the frame tick.
//!
//! A task is plain data: how long it runs and how much of that has elapsed.
//! Cancelling a task means dropping it.

use std::time::Duration;

/// Result of advancing a task by one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Running,
    Finished,
}

/// A countdown, feedback delay or animation in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimedTask {
    elapsed: Duration,
    total: Duration,
}

impl TimedTask {
    /// Starts a task lasting `total`.
    #[must_use]
    pub const fn start(total: Duration) -> Self {
        Self {
            elapsed: Duration::ZERO,
            total,
        }
    }

    /// Advances by `dt`, saturating at the total.
    pub fn advance(&mut self, dt: Duration) -> TaskStatus {
        self.elapsed = self.elapsed.saturating_add(dt).min(self.total);
        self.status()
    }

    /// Whether the task has run its full duration.
    #[must_use]
    pub fn status(&self) -> TaskStatus {
        if self.elapsed >= self.total {
            TaskStatus::Finished
        } else {
            TaskStatus::Running
        }
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    #[must_use]
    pub fn total(&self) -> Duration {
        self.total
    }

    /// Time left before the task finishes.
    #[must_use]
    pub fn remaining(&self) -> Duration {
        self.total.saturating_sub(self.elapsed)
    }

    /// Fraction complete in `[0, 1]`; zero-length tasks report 1.
    #[must_use]
    pub fn progress(&self) -> f32 {
        if self.total.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f32() / self.total.as_secs_f32()).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runs_until_total_elapsed() {
        let mut task = TimedTask::start(Duration::from_secs(3));
        assert_eq!(task.advance(Duration::from_secs(1)), TaskStatus::Running);
        assert_eq!(task.advance(Duration::from_secs(1)), TaskStatus::Running);
        assert_eq!(task.remaining(), Duration::from_secs(1));
        assert_eq!(task.advance(Duration::from_secs(1)), TaskStatus::Finished);
        assert_eq!(task.remaining(), Duration::ZERO);
    }

    #[test]
    fn test_overshoot_saturates() {
        let mut task = TimedTask::start(Duration::from_millis(500));
        assert_eq!(task.advance(Duration::from_secs(2)), TaskStatus::Finished);
        assert_eq!(task.elapsed(), Duration::from_millis(500));
        assert!((task.progress() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_zero_length_task_finishes_on_first_tick() {
        let mut task = TimedTask::start(Duration::ZERO);
        assert_eq!(task.status(), TaskStatus::Finished);
        assert_eq!(task.advance(Duration::ZERO), TaskStatus::Finished);
    }

    #[test]
    fn test_progress_midway() {
        let mut task = TimedTask::start(Duration::from_secs(4));
        task.advance(Duration::from_secs(1));
        assert!((task.progress() - 0.25).abs() < 1e-6);
    }
}
