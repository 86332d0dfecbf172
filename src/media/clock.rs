//! Wall-clock driven media playback clock.

use web_time::Instant;

use super::MediaClock;

/// Playback clock that advances with real time while playing.
///
/// Time is tracked as a base position plus the time elapsed since
/// playback last started, clamped to the media duration.
#[derive(Debug)]
pub struct WallClock {
    duration: f64,
    /// Position when playback last started or was paused/seeked
    base_time: f64,
    /// When playback last started (None while paused)
    started_at: Option<Instant>,
}

impl WallClock {
    /// Create a paused clock at zero for media of the given duration.
    pub fn new(duration: f64) -> Self {
        Self {
            duration: duration.max(0.0),
            base_time: 0.0,
            started_at: None,
        }
    }
}

impl MediaClock for WallClock {
    fn duration(&self) -> f64 {
        self.duration
    }

    fn current_time(&self) -> f64 {
        let time = match self.started_at {
            Some(start) => self.base_time + start.elapsed().as_secs_f64(),
            None => self.base_time,
        };
        time.min(self.duration)
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.base_time = seconds.clamp(0.0, self.duration);
        if self.started_at.is_some() {
            self.started_at = Some(Instant::now());
        }
    }

    fn play(&mut self) {
        if self.is_ended() {
            // Playing from the end starts over
            self.base_time = 0.0;
            self.started_at = None;
        }
        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
        }
    }

    fn pause(&mut self) {
        self.base_time = self.current_time();
        self.started_at = None;
    }

    fn is_paused(&self) -> bool {
        self.started_at.is_none() || self.is_ended()
    }

    fn is_ended(&self) -> bool {
        self.current_time() >= self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let clock = WallClock::new(90.0);
        assert_eq!(clock.duration(), 90.0);
        assert_eq!(clock.current_time(), 0.0);
        assert!(clock.is_paused());
        assert!(!clock.is_ended());
    }

    #[test]
    fn test_seek_is_clamped() {
        let mut clock = WallClock::new(10.0);
        clock.set_current_time(4.5);
        assert_eq!(clock.current_time(), 4.5);
        clock.set_current_time(25.0);
        assert_eq!(clock.current_time(), 10.0);
        assert!(clock.is_ended());
        clock.set_current_time(-3.0);
        assert_eq!(clock.current_time(), 0.0);
    }

    #[test]
    fn test_play_pause_keeps_position() {
        let mut clock = WallClock::new(60.0);
        clock.set_current_time(5.0);
        clock.play();
        assert!(!clock.is_paused());
        clock.pause();
        assert!(clock.is_paused());
        let paused_at = clock.current_time();
        assert!(paused_at >= 5.0);
        assert_eq!(clock.current_time(), paused_at);
    }

    #[test]
    fn test_play_at_end_restarts() {
        let mut clock = WallClock::new(2.0);
        clock.set_current_time(2.0);
        assert!(clock.is_ended());
        clock.play();
        assert!(clock.current_time() < 2.0);
        assert!(!clock.is_paused());
    }
}
