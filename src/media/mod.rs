//! Video media: playback clocks and opening video files.
//!
//! Frames are never decoded. The editor needs a duration and a clock that
//! can be played, paused and seeked.

mod clock;
mod container;

use thiserror::Error;

use crate::model::FileHandle;

pub use clock::WallClock;
pub use container::FfmpegOpener;

/// Errors that can occur when opening a video file.
#[derive(Error, Debug)]
pub enum MediaError {
    /// FFmpeg could not open or demux the file
    #[error("FFmpeg error: {0}")]
    Ffmpeg(#[from] ffmpeg_next::Error),

    /// The container holds no video stream
    #[error("No video stream found")]
    NoVideoStream,

    /// The container does not report a usable duration
    #[error("Video duration is unknown")]
    UnknownDuration,
}

/// A playback clock for a loaded video.
///
/// Mirrors the subset of a media element the player relies on.
pub trait MediaClock {
    /// Total duration in seconds.
    fn duration(&self) -> f64;
    /// Current playback position in seconds.
    fn current_time(&self) -> f64;
    /// Seek to a position in seconds.
    fn set_current_time(&mut self, seconds: f64);
    /// Start or resume playback.
    fn play(&mut self);
    /// Pause playback, keeping the position.
    fn pause(&mut self);
    /// Whether playback is stopped (paused or ended).
    fn is_paused(&self) -> bool;
    /// Whether the position has reached the end.
    fn is_ended(&self) -> bool;
}

/// Opens video files into playback clocks.
pub trait MediaOpener {
    /// Open a video file. The caller has already checked the MIME type.
    fn open(&self, file: &FileHandle) -> Result<Box<dyn MediaClock>, MediaError>;
}

/// A video owned by the player for the length of its session.
pub struct MediaAsset {
    /// The file the asset was opened from
    pub file: FileHandle,
    /// Frames per second used for frame indexing
    pub frame_rate: f64,
    /// Live playback clock
    pub clock: Box<dyn MediaClock>,
}

impl MediaAsset {
    pub fn new(file: FileHandle, frame_rate: f64, clock: Box<dyn MediaClock>) -> Self {
        Self {
            file,
            frame_rate,
            clock,
        }
    }

    /// Total duration in seconds.
    pub fn duration(&self) -> f64 {
        self.clock.duration()
    }
}

impl std::fmt::Debug for MediaAsset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaAsset")
            .field("file", &self.file.name)
            .field("frame_rate", &self.frame_rate)
            .field("duration", &self.clock.duration())
            .finish()
    }
}

impl Drop for MediaAsset {
    fn drop(&mut self) {
        self.clock.pause();
        log::debug!("Released media asset {}", self.file.name);
    }
}
