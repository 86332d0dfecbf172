//! Opening video containers through FFmpeg.

use ffmpeg_next as ffmpeg;

use super::{MediaClock, MediaError, MediaOpener, WallClock};
use crate::model::FileHandle;

/// Opens any container FFmpeg can demux, reads its duration, then plays
/// it on a [`WallClock`].
#[derive(Debug, Default, Clone, Copy)]
pub struct FfmpegOpener;

impl FfmpegOpener {
    /// Read the duration of a video file in seconds.
    pub fn read_duration(file: &FileHandle) -> Result<f64, MediaError> {
        ffmpeg::init()?;
        let input = ffmpeg::format::input(&file.path)?;

        let stream = input
            .streams()
            .best(ffmpeg::media::Type::Video)
            .ok_or(MediaError::NoVideoStream)?;
        log::debug!(
            "{}: video stream {} ({:?} fps reported)",
            file.name,
            stream.index(),
            stream.avg_frame_rate()
        );

        // AV_NOPTS_VALUE and zero both mean the demuxer found no duration
        let duration = input.duration();
        if duration <= 0 {
            return Err(MediaError::UnknownDuration);
        }
        Ok(duration as f64 / f64::from(ffmpeg::ffi::AV_TIME_BASE))
    }
}

impl MediaOpener for FfmpegOpener {
    fn open(&self, file: &FileHandle) -> Result<Box<dyn MediaClock>, MediaError> {
        let duration = Self::read_duration(file)?;
        log::info!("Opened video {} ({:.2}s)", file.name, duration);
        Ok(Box::new(WallClock::new(duration)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_video(name: &str, bytes: &[u8]) -> (tempfile::TempDir, FileHandle) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(name);
        std::fs::File::create(&path)
            .unwrap()
            .write_all(bytes)
            .unwrap();
        (dir, FileHandle::from_path(path))
    }

    #[test]
    fn test_oversized_box_is_an_error() {
        // ftyp header, then an mdat whose 64-bit size runs past u64::MAX
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&8u32.to_be_bytes());
        bytes.extend_from_slice(b"ftyp");
        bytes.extend_from_slice(&1u32.to_be_bytes());
        bytes.extend_from_slice(b"mdat");
        bytes.extend_from_slice(&u64::MAX.to_be_bytes());

        let (_dir, file) = write_video("crafted.mp4", &bytes);
        assert!(FfmpegOpener.open(&file).is_err());
    }

    #[test]
    fn test_empty_and_missing_files_are_errors() {
        let (dir, empty) = write_video("empty.webm", b"");
        assert!(FfmpegOpener.open(&empty).is_err());

        let missing = FileHandle::from_path(dir.path().join("missing.mkv"));
        assert!(matches!(
            FfmpegOpener.open(&missing),
            Err(MediaError::Ffmpeg(_))
        ));
    }
}
