//! Application message types for TVAT.
//!
//! All user input and backend results are represented as messages in the
//! Elm architecture style and applied through [`crate::TvatApp::update`].

use crate::backend::BackendResponse;
use crate::model::{EditMode, FileHandle, PointerEvent};

/// Messages that can be sent to update application state.
#[derive(Debug)]
pub enum Message {
    // Uploader
    /// A CSV file was picked for upload
    CsvSelected(FileHandle),

    // Video Player - Playback
    /// A video file was picked for playback
    VideoSelected(FileHandle),
    /// Play/Pause button pressed
    TogglePlayPause,
    /// Progress bar dragged to a percentage (0..=100)
    Scrub(f64),

    // Video Player - Editing
    /// Edit option picked from the selector
    EditOptionSelected(EditMode),
    /// Leave the active edit mode without saving
    ExitEditMode,
    /// The overlay surface moved; client coordinates of its top-left corner
    OverlayMoved { left: f32, top: f32 },
    /// Pointer event on the overlay, in client coordinates
    Pointer(PointerEvent),
    /// Identifier dialog: current ID field changed
    CurrentIdChanged(String),
    /// Identifier dialog: new ID field changed
    NewIdChanged(String),
    /// Identifier dialog: Save pressed
    SaveIdentifier,
    /// Identifier dialog: Close pressed
    CloseIdentifierDialog,
    /// Send the finished box as the new coordinates of a tracked object
    SubmitBoundingBox { track_id: u64, class_id: u64 },

    // Download
    /// Download the CSV with all edits applied
    DownloadUpdatedCsv,

    // Backend
    /// A backend request finished
    Backend(BackendResponse),
}
