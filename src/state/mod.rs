//! Application state management modules.

mod frame_loop;
mod playback;

pub use frame_loop::{FrameLoop, FrameRequestId};
pub use playback::{PlaybackEngine, PlaybackError, PlaybackPosition};

#[cfg(test)]
pub(crate) use playback::tests::ManualClock;
