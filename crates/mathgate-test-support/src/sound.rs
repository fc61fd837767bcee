//! Test sound player — records every cue in order.

use std::sync::Mutex;

use mathgate_core::collaborators::SoundCuePlayer;

/// A cue the core asked the host to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Correct,
    Wrong,
    Timeout,
}

/// A `SoundCuePlayer` that records cues instead of playing them.
#[derive(Debug, Default)]
pub struct RecordingSoundCues {
    cues: Mutex<Vec<Cue>>,
}

impl RecordingSoundCues {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the cues played so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn cues(&self) -> Vec<Cue> {
        self.cues.lock().unwrap().clone()
    }

    fn push(&self, cue: Cue) {
        self.cues.lock().unwrap().push(cue);
    }
}

impl SoundCuePlayer for RecordingSoundCues {
    fn on_correct(&self) {
        self.push(Cue::Correct);
    }

    fn on_wrong(&self) {
        self.push(Cue::Wrong);
    }

    fn on_timeout(&self) {
        self.push(Cue::Timeout);
    }
}
