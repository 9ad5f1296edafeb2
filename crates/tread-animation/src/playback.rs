//! Per-clip looping playback

use crate::clip::ClipDesc;

/// Playback position of one looping clip
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClipPlayback {
    /// Current playback time in seconds, within [0, duration)
    pub time: f64,
    /// Whether the clip is currently playing
    pub playing: bool,
}

impl ClipPlayback {
    /// Start looping from the beginning
    pub fn start(&mut self) {
        self.time = 0.0;
        self.playing = true;
    }

    /// Stop and rewind
    pub fn stop(&mut self) {
        self.time = 0.0;
        self.playing = false;
    }

    /// Advance by `dt` seconds scaled by the clip's play rate, wrapping at the end
    pub fn advance(&mut self, clip: &ClipDesc, dt: f64) {
        if !self.playing {
            return;
        }

        self.time += dt * clip.play_rate;

        if clip.duration > 0.0 {
            self.time = self.time.rem_euclid(clip.duration);
            // rem_euclid rounds tiny negative times up to the divisor itself
            if self.time >= clip.duration {
                self.time = 0.0;
            }
        }
    }

    /// Fraction of the loop completed, in [0, 1)
    pub fn phase(&self, clip: &ClipDesc) -> f64 {
        if clip.duration > 0.0 {
            self.time / clip.duration
        } else {
            0.0
        }
    }
}
