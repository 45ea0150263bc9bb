//! Playback position for the active episode.
//!
//! Video is shown outside the window, so the clock is the source of the
//! "current time" that editors read when filling start/end fields.

use std::time::Duration;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlaybackClock {
    position: f64,
    duration: Option<f64>,
    playing: bool,
}

impl PlaybackClock {
    /// Reset to the start of a media item of the given length.
    pub fn load(&mut self, duration: Option<f64>) {
        self.duration = duration.filter(|value| value.is_finite() && *value > 0.0);
        self.position = 0.0;
        self.playing = false;
    }

    pub fn duration(&self) -> Option<f64> {
        self.duration
    }

    /// Current position in seconds.
    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn seek(&mut self, seconds: f64) {
        if !seconds.is_finite() {
            return;
        }
        self.position = self.clamp(seconds);
    }

    /// Seek to a fraction of the duration; ignored when it is unknown.
    pub fn seek_fraction(&mut self, fraction: f64) {
        if let Some(duration) = self.duration {
            self.seek(fraction.clamp(0.0, 1.0) * duration);
        }
    }

    pub fn toggle(&mut self) {
        if self.playing {
            self.playing = false;
        } else {
            self.play();
        }
    }

    pub fn play(&mut self) {
        if self.duration.is_some_and(|duration| self.position >= duration) {
            self.position = 0.0;
        }
        self.playing = true;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Advance while playing; stops at the end of the media.
    pub fn advance(&mut self, elapsed: Duration) {
        if !self.playing {
            return;
        }
        self.position = self.clamp(self.position + elapsed.as_secs_f64());
        if self.duration.is_some_and(|duration| self.position >= duration) {
            self.playing = false;
        }
    }

    fn clamp(&self, seconds: f64) -> f64 {
        let lower = seconds.max(0.0);
        match self.duration {
            Some(duration) => lower.min(duration),
            None => lower,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seek_is_clamped_to_media() {
        let mut clock = PlaybackClock::default();
        clock.load(Some(10.0));
        clock.seek(12.0);
        assert_eq!(clock.position(), 10.0);
        clock.seek(-1.0);
        assert_eq!(clock.position(), 0.0);
        clock.seek_fraction(0.25);
        assert_eq!(clock.position(), 2.5);
    }

    #[test]
    fn playback_advances_and_stops_at_end() {
        let mut clock = PlaybackClock::default();
        clock.load(Some(1.0));
        clock.advance(Duration::from_millis(300));
        assert_eq!(clock.position(), 0.0);
        clock.play();
        clock.advance(Duration::from_millis(500));
        assert!((clock.position() - 0.5).abs() < 1e-9);
        clock.advance(Duration::from_secs(2));
        assert_eq!(clock.position(), 1.0);
        assert!(!clock.is_playing());
        clock.play();
        assert_eq!(clock.position(), 0.0);
    }

    #[test]
    fn typed_position_moves_a_running_clock() {
        let mut clock = PlaybackClock::default();
        clock.load(Some(10.0));
        clock.play();
        clock.seek(4.25);
        clock.advance(Duration::from_millis(500));
        assert!((clock.position() - 4.75).abs() < 1e-9);
        assert!(clock.is_playing());
        clock.seek(f64::NAN);
        assert!((clock.position() - 4.75).abs() < 1e-9);
    }

    #[test]
    fn unknown_duration_is_unbounded_and_ignores_fractions() {
        let mut clock = PlaybackClock::default();
        clock.load(Some(f64::NAN));
        assert_eq!(clock.duration(), None);
        clock.seek(42.0);
        clock.seek_fraction(0.5);
        assert_eq!(clock.position(), 42.0);
    }
}
