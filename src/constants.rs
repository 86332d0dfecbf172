//! Global constants for the TVAT application

use std::time::Duration;

/// Default playback frame rate used to map seconds to frame indices.
pub const DEFAULT_FRAME_RATE: f64 = 30.0;

/// Default backend base URL.
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:5000";

/// Default timeout for a single backend request, in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// File name used when saving the updated CSV.
pub const DOWNLOAD_FILE_NAME: &str = "updated_data.csv";

/// MIME type a CSV upload must report.
pub const CSV_MIME_TYPE: &str = "text/csv";

/// Prefix every accepted video MIME type starts with.
pub const VIDEO_MIME_PREFIX: &str = "video/";

/// Interval between editor ticks in the window event loop (~60 Hz).
pub const HOST_TICK_INTERVAL: Duration = Duration::from_millis(16);

/// Backend endpoint paths.
pub mod endpoints {
    /// Multipart CSV upload.
    pub const UPLOAD_CSV: &str = "/upload-csv";
    /// Multipart form field carrying the CSV file.
    pub const UPLOAD_CSV_FIELD: &str = "csvFile";
    /// Identifier rename for a frame.
    pub const UPDATE_ID: &str = "/update-id";
    /// Bounding box coordinate update.
    pub const UPDATE_BOUNDING_BOX: &str = "/update-bounding-box";
    /// Updated CSV artifact.
    pub const DOWNLOAD_UPDATED_CSV: &str = "/download-updated-csv";
    /// Header carrying the backend session id, when one was issued.
    pub const SESSION_HEADER: &str = "X-Session-Id";
}

/// User-facing alert texts.
pub mod alerts {
    pub const INVALID_CSV: &str = "Please upload a valid CSV file.";
    pub const CSV_UPLOAD_FAILED: &str = "Error uploading CSV file.";
    pub const INVALID_VIDEO: &str = "Please upload a valid video file.";
    pub const CSV_REQUIRED: &str = "Please upload a CSV file before editing.";
    pub const DOWNLOAD_FAILED: &str = "Error downloading the updated CSV file.";
    pub const BOUNDING_BOX_FAILED: &str = "Error saving the bounding box.";
}
