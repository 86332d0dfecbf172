//! Error taxonomy for editor operations.
//!
//! None of these escape [`crate::TvatApp::update`]: each handler turns its
//! failure into a user alert or a log record.

use thiserror::Error;

use crate::backend::BackendError;
use crate::media::MediaError;
use crate::state::PlaybackError;

/// Errors raised while handling an editor message.
#[derive(Error, Debug)]
pub enum EditorError {
    /// The selected file reports the wrong MIME type; nothing was sent
    #[error("Invalid file type '{found}', expected {expected}")]
    InvalidFileType {
        /// Accepted type or type family
        expected: &'static str,
        /// Type the file reported
        found: String,
    },

    /// The backend answered the upload with `success: false`
    #[error("Backend rejected the upload")]
    UploadRejected,

    /// Transport failure or non-2xx answer from the backend
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// An edit mode was requested before any CSV was uploaded
    #[error("A CSV file must be uploaded before editing")]
    EditingWithoutCsv,

    /// Playback operation failed
    #[error(transparent)]
    Playback(#[from] PlaybackError),

    /// The video could not be opened
    #[error("Failed to open video: {0}")]
    Media(#[from] MediaError),

    /// Writing the downloaded CSV failed
    #[error("Failed to save download: {0}")]
    Download(#[from] std::io::Error),
}

impl EditorError {
    /// Create an invalid file type error.
    pub fn invalid_file_type(expected: &'static str, found: impl Into<String>) -> Self {
        Self::InvalidFileType {
            expected,
            found: found.into(),
        }
    }
}
