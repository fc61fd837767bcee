//! Audio cues rendered as log lines.

use mathgate_core::collaborators::SoundCuePlayer;
use tracing::info;

/// Logs each cue instead of playing it.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggedCues;

impl SoundCuePlayer for LoggedCues {
    fn on_correct(&self) {
        info!(cue = "correct", "sound cue");
    }

    fn on_wrong(&self) {
        info!(cue = "wrong", "sound cue");
    }

    fn on_timeout(&self) {
        info!(cue = "timeout", "sound cue");
    }
}
