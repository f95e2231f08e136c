use std::time::Instant;

use lectern_core::{PlaybackWidget, WidgetEvent};

/// Stand-in for the embeddable video player.
///
/// Advances the playhead with wall-clock time while playing. The clip
/// length starts at a default and is corrected once a timed transcript
/// reveals the real duration.
#[derive(Debug, Clone)]
pub struct SimulatedPlayer {
    position: f64,
    duration: f64,
    playing: bool,
    last_advance: Instant,
}

impl SimulatedPlayer {
    pub fn new(duration: f64) -> Self {
        Self {
            position: 0.0,
            duration: duration.max(1.0),
            playing: false,
            last_advance: Instant::now(),
        }
    }

    pub fn set_duration(&mut self, duration: f64) {
        if duration > 0.0 {
            self.duration = duration;
            self.position = self.position.min(duration);
        }
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    /// Moves the playhead forward by the elapsed wall-clock time. Returns
    /// `Ended` when the clip runs out.
    pub fn advance(&mut self, now: Instant) -> Option<WidgetEvent> {
        let elapsed = now.duration_since(self.last_advance).as_secs_f64();
        self.last_advance = now;
        if !self.playing {
            return None;
        }
        self.position = (self.position + elapsed).min(self.duration);
        if self.position >= self.duration {
            self.playing = false;
            return Some(WidgetEvent::Ended);
        }
        None
    }
}

impl PlaybackWidget for SimulatedPlayer {
    fn position(&self) -> f64 {
        self.position
    }

    fn seek(&mut self, seconds: f64) {
        self.position = seconds.clamp(0.0, self.duration);
    }

    fn play(&mut self) {
        self.playing = true;
        self.last_advance = Instant::now();
    }

    fn pause(&mut self) {
        self.playing = false;
    }
}
