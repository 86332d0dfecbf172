//! Playback engine: the loaded video, its position and the frame sync loop.

use thiserror::Error;

use super::FrameLoop;
use crate::media::MediaAsset;

/// Errors from playback operations that need a loaded video.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlaybackError {
    /// No video has been loaded yet
    #[error("No video loaded")]
    NoVideoLoaded,

    /// Scrub position outside 0..=100
    #[error("Progress {0} is outside 0..=100")]
    ProgressOutOfRange(f64),
}

/// Playback position. The three fields are always derived together.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlaybackPosition {
    pub current_time_seconds: f64,
    pub current_frame: u64,
    pub progress_percent: f64,
}

impl PlaybackPosition {
    /// Derive the position for a playback time.
    pub fn at(time_seconds: f64, duration: f64, frame_rate: f64) -> Self {
        let time = time_seconds.max(0.0);
        let progress_percent = if duration > 0.0 {
            time / duration * 100.0
        } else {
            0.0
        };
        Self {
            current_time_seconds: time,
            current_frame: (time * frame_rate).floor() as u64,
            progress_percent,
        }
    }
}

/// Owns the loaded video, the position derived from it and the frame loop
/// that keeps the position in sync while playing.
#[derive(Debug, Default)]
pub struct PlaybackEngine {
    asset: Option<MediaAsset>,
    position: PlaybackPosition,
    is_playing: bool,
    frames: FrameLoop,
}

impl PlaybackEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current video. The previous asset is released first.
    pub fn load(&mut self, asset: MediaAsset) {
        self.frames.cancel();
        if let Some(old) = self.asset.take() {
            log::info!("Replacing video {}", old.file.name);
        }
        log::info!(
            "Loaded video {} ({:.2}s at {} fps)",
            asset.file.name,
            asset.duration(),
            asset.frame_rate
        );
        self.asset = Some(asset);
        self.position = PlaybackPosition::default();
        self.is_playing = false;
    }

    /// The loaded video, if any.
    pub fn asset(&self) -> Option<&MediaAsset> {
        self.asset.as_ref()
    }

    /// Current position.
    pub fn position(&self) -> PlaybackPosition {
        self.position
    }

    /// Whether playback is running.
    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// Whether a frame sync is scheduled.
    pub fn is_syncing(&self) -> bool {
        self.frames.is_scheduled()
    }

    /// Start playback if paused, pause if playing. No-op without a video.
    pub fn toggle_play_pause(&mut self) {
        if self.asset.is_none() {
            log::debug!("Play/pause ignored: no video loaded");
            return;
        }
        if self.is_playing {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Start playback and the frame sync loop. No-op without a video or
    /// once the frame loop is disposed.
    pub fn play(&mut self) {
        let Some(asset) = self.asset.as_mut() else {
            log::debug!("Play ignored: no video loaded");
            return;
        };
        if self.frames.request().is_none() {
            return;
        }
        asset.clock.play();
        self.is_playing = true;
        log::info!("Playback started at {:.2}s", asset.clock.current_time());
    }

    /// Pause playback and cancel the frame sync loop.
    pub fn pause(&mut self) {
        if let Some(asset) = self.asset.as_mut() {
            asset.clock.pause();
        }
        self.frames.cancel();
        if self.is_playing {
            log::info!(
                "Playback paused at frame {}",
                self.position.current_frame
            );
        }
        self.is_playing = false;
    }

    /// Seek to a percentage of the duration and update the position now.
    pub fn scrub(&mut self, progress_percent: f64) -> Result<(), PlaybackError> {
        if !(0.0..=100.0).contains(&progress_percent) {
            return Err(PlaybackError::ProgressOutOfRange(progress_percent));
        }
        let asset = self.asset.as_mut().ok_or(PlaybackError::NoVideoLoaded)?;
        let duration = asset.duration();
        asset
            .clock
            .set_current_time(duration * progress_percent / 100.0);
        self.position =
            PlaybackPosition::at(asset.clock.current_time(), duration, asset.frame_rate);
        log::debug!(
            "Scrubbed to {:.1}% (frame {})",
            progress_percent,
            self.position.current_frame
        );
        Ok(())
    }

    /// Run the frame sync if one is due this frame.
    ///
    /// Returns true when the position changed.
    pub fn on_frame(&mut self) -> bool {
        if self.frames.take_due().is_none() {
            return false;
        }
        let Some(asset) = self.asset.as_ref() else {
            return false;
        };
        if !self.is_playing {
            return false;
        }

        self.position = PlaybackPosition::at(
            asset.clock.current_time(),
            asset.duration(),
            asset.frame_rate,
        );
        log::trace!(
            "Frame sync: t={:.3}s frame={}",
            self.position.current_time_seconds,
            self.position.current_frame
        );

        if asset.clock.is_ended() {
            self.is_playing = false;
            log::info!("Playback ended at frame {}", self.position.current_frame);
        } else if asset.clock.is_paused() {
            self.is_playing = false;
        } else {
            self.frames.request();
        }
        true
    }

    /// Stop syncing for good and release the video.
    pub fn dispose(&mut self) {
        self.frames.dispose();
        self.is_playing = false;
        self.asset = None;
    }
}
