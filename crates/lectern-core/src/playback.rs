/// Seam for the embeddable video player. The desktop app ships a simulated
/// implementation; a real embed would expose the same surface.
pub trait PlaybackWidget {
    /// Current playhead position in seconds.
    fn position(&self) -> f64;
    fn seek(&mut self, seconds: f64);
    fn play(&mut self);
    fn pause(&mut self);
}

/// State-change notifications raised by the player widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetEvent {
    Unstarted,
    Playing,
    Paused,
    Ended,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PlaybackState {
    #[default]
    Idle,
    Playing,
    Paused,
}

/// Tracks the playhead sampled from the player widget.
///
/// The poll timer itself lives in the UI shell as a subscription derived
/// from [`PlaybackClock::is_polling`]; the runtime diffs subscriptions, so
/// at most one timer exists at any moment. The clock only consumes the
/// sampled positions.
#[derive(Debug, Clone, Default)]
pub struct PlaybackClock {
    state: PlaybackState,
    position: f64,
    watched: f64,
}

impl PlaybackClock {
    /// Widget state changes drive the Idle/Playing/Paused transitions.
    /// Only `Playing` keeps the poll timer alive.
    pub fn on_widget_event(&mut self, event: WidgetEvent) {
        self.state = match event {
            WidgetEvent::Playing => PlaybackState::Playing,
            WidgetEvent::Paused => PlaybackState::Paused,
            WidgetEvent::Unstarted | WidgetEvent::Ended => PlaybackState::Idle,
        };
    }

    /// Records one sampled position. Watched time is the farthest position
    /// observed so far; seeking backward never shrinks it.
    pub fn tick(&mut self, position: f64) {
        self.position = position;
        if position > self.watched {
            self.watched = position;
        }
    }

    pub fn is_polling(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Precise position, used for segment matching.
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Rounded position for display.
    pub fn display_seconds(&self) -> u64 {
        self.position.max(0.0).floor() as u64
    }

    /// Whole seconds watched so far; scopes AI generation to the watched
    /// portion of the lecture.
    pub fn watched_seconds(&self) -> u64 {
        self.watched.max(0.0).floor() as u64
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widget_events_drive_state() {
        let mut clock = PlaybackClock::default();
        assert_eq!(clock.state(), PlaybackState::Idle);
        assert!(!clock.is_polling());

        clock.on_widget_event(WidgetEvent::Playing);
        assert!(clock.is_polling());

        clock.on_widget_event(WidgetEvent::Paused);
        assert_eq!(clock.state(), PlaybackState::Paused);
        assert!(!clock.is_polling());

        clock.on_widget_event(WidgetEvent::Ended);
        assert_eq!(clock.state(), PlaybackState::Idle);
    }

    #[test]
    fn test_watched_seconds_is_monotone() {
        let mut clock = PlaybackClock::default();
        clock.tick(4.2);
        clock.tick(9.8);
        clock.tick(3.0); // seek backward
        assert_eq!(clock.position(), 3.0);
        assert_eq!(clock.display_seconds(), 3);
        assert_eq!(clock.watched_seconds(), 9);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut clock = PlaybackClock::default();
        clock.on_widget_event(WidgetEvent::Playing);
        clock.tick(42.0);
        clock.reset();
        assert_eq!(clock.state(), PlaybackState::Idle);
        assert_eq!(clock.watched_seconds(), 0);
        assert_eq!(clock.position(), 0.0);
    }
}
