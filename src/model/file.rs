//! File handles as reported by a file picker.

use std::path::{Path, PathBuf};

use crate::constants::{CSV_MIME_TYPE, VIDEO_MIME_PREFIX};

/// Fallback MIME type for unknown extensions.
pub const UNKNOWN_MIME_TYPE: &str = "application/octet-stream";

/// Extension to MIME type table used when the picker gives no type.
const MIME_TYPES: &[(&str, &str)] = &[
    ("csv", CSV_MIME_TYPE),
    ("txt", "text/plain"),
    ("json", "application/json"),
    ("mp4", "video/mp4"),
    ("m4v", "video/x-m4v"),
    ("mov", "video/quicktime"),
    ("webm", "video/webm"),
    ("mkv", "video/x-matroska"),
    ("avi", "video/x-msvideo"),
    ("ogv", "video/ogg"),
];

/// Guess a MIME type from a file name's extension.
pub fn mime_type_for(name: &str) -> &'static str {
    let Some((_, ext)) = name.rsplit_once('.') else {
        return UNKNOWN_MIME_TYPE;
    };
    let ext = ext.to_lowercase();
    MIME_TYPES
        .iter()
        .find(|(known, _)| *known == ext)
        .map(|(_, mime)| *mime)
        .unwrap_or(UNKNOWN_MIME_TYPE)
}

/// Extensions the table maps to a `video/*` type.
pub fn video_extensions() -> Vec<&'static str> {
    MIME_TYPES
        .iter()
        .filter(|(_, mime)| mime.starts_with(VIDEO_MIME_PREFIX))
        .map(|(ext, _)| *ext)
        .collect()
}

/// A user-selected file: its display name, reported MIME type and location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle {
    /// File name shown to the user and sent as the multipart file name
    pub name: String,
    /// MIME type reported for the file
    pub mime_type: String,
    /// Location of the file contents
    pub path: PathBuf,
}

impl FileHandle {
    /// Create a handle with an explicit MIME type.
    pub fn new(path: impl Into<PathBuf>, mime_type: impl Into<String>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self {
            name,
            mime_type: mime_type.into(),
            path,
        }
    }

    /// Create a handle whose MIME type is guessed from the extension.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let mime = mime_type_for(&path.to_string_lossy());
        Self::new(path, mime)
    }

    /// Whether the file reports exactly `text/csv`.
    pub fn is_csv(&self) -> bool {
        self.mime_type == CSV_MIME_TYPE
    }

    /// Whether the file reports a `video/*` type.
    pub fn is_video(&self) -> bool {
        self.mime_type.starts_with(VIDEO_MIME_PREFIX)
    }

    /// Read the whole file into memory.
    pub fn read_bytes(&self) -> std::io::Result<Vec<u8>> {
        std::fs::read(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_guess() {
        assert_eq!(mime_type_for("sample.csv"), "text/csv");
        assert_eq!(mime_type_for("clip.MP4"), "video/mp4");
        assert_eq!(mime_type_for("notes.txt"), "text/plain");
        assert_eq!(mime_type_for("no_extension"), UNKNOWN_MIME_TYPE);
        assert_eq!(mime_type_for("archive.tar.gz"), UNKNOWN_MIME_TYPE);
    }

    #[test]
    fn test_video_extensions_all_map_to_video() {
        let exts = video_extensions();
        assert!(exts.contains(&"mp4"));
        assert!(exts.contains(&"webm"));
        assert!(exts.contains(&"mkv"));
        assert!(!exts.contains(&"csv"));
        for ext in exts {
            assert!(mime_type_for(&format!("clip.{}", ext)).starts_with("video/"));
        }
    }

    #[test]
    fn test_handle_classification() {
        let csv = FileHandle::from_path("/data/sample.csv");
        assert_eq!(csv.name, "sample.csv");
        assert!(csv.is_csv());
        assert!(!csv.is_video());

        let video = FileHandle::from_path("clip.webm");
        assert!(video.is_video());
        assert!(!video.is_csv());

        // A CSV reported with a non-CSV type is not a CSV
        let mislabeled = FileHandle::new("sample.csv", "application/vnd.ms-excel");
        assert!(!mislabeled.is_csv());
    }
}
