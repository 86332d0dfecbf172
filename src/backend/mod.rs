//! Client side of the annotation storage backend.
//!
//! The backend owns the uploaded CSV and applies edits to it. This module
//! defines the wire payloads, the [`AnnotationBackend`] trait with its HTTP
//! implementation, and the executors that run requests off the event loop.

mod executor;
mod http;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::FileHandle;

pub use executor::{InlineExecutor, RequestExecutor, RequestWorker};
pub use http::HttpBackend;

/// Errors from backend calls.
#[derive(Error, Debug)]
pub enum BackendError {
    /// The request never produced a response (connection, DNS, timeout, ...)
    #[error("HTTP request failed: {0}")]
    Transport(String),

    /// The backend answered with a non-2xx status
    #[error("Backend error ({status}): {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Raw response body for debugging
        body: String,
    },

    /// Reading the file to upload failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The response body did not match the expected shape
    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        BackendError::Transport(err.to_string())
    }
}

/// Opaque session identifier issued by the backend on upload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Body of the `upload-csv` response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadReceipt {
    /// Whether the backend accepted the file
    pub success: bool,
    /// Session to reference in later calls, if the backend issues one
    #[serde(default)]
    pub session_id: Option<SessionId>,
}

/// Body of the `update-id` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentifierUpdate {
    pub current_frame: u64,
    pub current_id: String,
    pub new_id: String,
}

/// Body of the `update-bounding-box` request. Corners are min-first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundingBoxUpdate {
    pub frame_id: u64,
    pub track_id: u64,
    pub class_id: u64,
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

/// Operations offered by the annotation storage backend.
pub trait AnnotationBackend {
    /// Upload a CSV of tracked objects.
    fn upload_csv(&self, file: &FileHandle) -> Result<UploadReceipt, BackendError>;

    /// Rename an object identifier on a frame.
    fn update_id(
        &self,
        session: Option<&SessionId>,
        update: &IdentifierUpdate,
    ) -> Result<(), BackendError>;

    /// Replace the coordinates of a tracked object's box on a frame.
    fn update_bounding_box(
        &self,
        session: Option<&SessionId>,
        update: &BoundingBoxUpdate,
    ) -> Result<(), BackendError>;

    /// Fetch the CSV with all edits applied.
    fn download_updated_csv(&self, session: Option<&SessionId>) -> Result<Vec<u8>, BackendError>;
}

/// A backend call queued by the editor.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendRequest {
    UploadCsv {
        file: FileHandle,
    },
    UpdateId {
        session: Option<SessionId>,
        update: IdentifierUpdate,
    },
    UpdateBoundingBox {
        session: Option<SessionId>,
        update: BoundingBoxUpdate,
    },
    DownloadUpdatedCsv {
        session: Option<SessionId>,
    },
}

impl BackendRequest {
    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            BackendRequest::UploadCsv { .. } => "upload-csv",
            BackendRequest::UpdateId { .. } => "update-id",
            BackendRequest::UpdateBoundingBox { .. } => "update-bounding-box",
            BackendRequest::DownloadUpdatedCsv { .. } => "download-updated-csv",
        }
    }
}

/// Outcome of a [`BackendRequest`], delivered back to the editor.
#[derive(Debug)]
pub enum BackendResponse {
    CsvUploaded {
        file: FileHandle,
        result: Result<UploadReceipt, BackendError>,
    },
    IdUpdated(Result<(), BackendError>),
    BoundingBoxUpdated(Result<(), BackendError>),
    CsvDownloaded(Result<Vec<u8>, BackendError>),
}

/// Run one request against a backend.
pub fn execute<B: AnnotationBackend + ?Sized>(
    backend: &B,
    request: BackendRequest,
) -> BackendResponse {
    log::debug!("Executing backend request: {}", request.name());
    match request {
        BackendRequest::UploadCsv { file } => {
            let result = backend.upload_csv(&file);
            BackendResponse::CsvUploaded { file, result }
        }
        BackendRequest::UpdateId { session, update } => {
            BackendResponse::IdUpdated(backend.update_id(session.as_ref(), &update))
        }
        BackendRequest::UpdateBoundingBox { session, update } => BackendResponse::BoundingBoxUpdated(
            backend.update_bounding_box(session.as_ref(), &update),
        ),
        BackendRequest::DownloadUpdatedCsv { session } => {
            BackendResponse::CsvDownloaded(backend.download_updated_csv(session.as_ref()))
        }
    }
}
