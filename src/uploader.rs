//! CSV uploader.
//!
//! Validates the picked file, sends it to the backend and, once the
//! backend accepts it, yields the handle that unlocks editing.

use crate::backend::{BackendError, BackendRequest, RequestExecutor, SessionId, UploadReceipt};
use crate::constants::CSV_MIME_TYPE;
use crate::error::EditorError;
use crate::model::FileHandle;

/// A CSV the backend has accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedCsv {
    pub file: FileHandle,
    pub session: Option<SessionId>,
}

/// Tracks CSV uploads.
#[derive(Debug, Default)]
pub struct Uploader {
    in_flight: usize,
}

impl Uploader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and queue an upload. Nothing is sent for non-CSV files.
    pub fn submit_csv(
        &mut self,
        file: FileHandle,
        executor: &mut dyn RequestExecutor,
    ) -> Result<(), EditorError> {
        if !file.is_csv() {
            return Err(EditorError::invalid_file_type(CSV_MIME_TYPE, file.mime_type));
        }
        log::info!("Uploading CSV {}", file.name);
        executor.submit(BackendRequest::UploadCsv { file });
        self.in_flight += 1;
        Ok(())
    }

    /// Interpret the backend's answer to an upload.
    pub fn finish(
        &mut self,
        file: FileHandle,
        result: Result<UploadReceipt, BackendError>,
    ) -> Result<AcceptedCsv, EditorError> {
        self.in_flight = self.in_flight.saturating_sub(1);
        match result {
            Ok(receipt) if receipt.success => Ok(AcceptedCsv {
                file,
                session: receipt.session_id,
            }),
            Ok(_) => Err(EditorError::UploadRejected),
            Err(e) => Err(e.into()),
        }
    }

    /// Number of uploads waiting for an answer.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BackendResponse;
    use std::collections::VecDeque;

    #[derive(Default)]
    struct QueueOnly {
        submitted: Vec<BackendRequest>,
        responses: VecDeque<BackendResponse>,
    }

    impl RequestExecutor for QueueOnly {
        fn submit(&mut self, request: BackendRequest) {
            self.submitted.push(request);
        }
        fn try_next(&mut self) -> Option<BackendResponse> {
            self.responses.pop_front()
        }
        fn in_flight(&self) -> usize {
            self.submitted.len()
        }
    }

    #[test]
    fn test_non_csv_sends_nothing() {
        let mut uploader = Uploader::new();
        let mut exec = QueueOnly::default();
        for file in [
            FileHandle::from_path("notes.txt"),
            FileHandle::from_path("clip.mp4"),
            FileHandle::new("data.csv", "application/vnd.ms-excel"),
            FileHandle::new("data.csv", ""),
        ] {
            let err = uploader.submit_csv(file, &mut exec).unwrap_err();
            assert!(matches!(err, EditorError::InvalidFileType { .. }));
        }
        assert!(exec.submitted.is_empty());
        assert_eq!(uploader.in_flight(), 0);
    }

    #[test]
    fn test_csv_is_queued() {
        let mut uploader = Uploader::new();
        let mut exec = QueueOnly::default();
        let file = FileHandle::from_path("sample.csv");
        uploader.submit_csv(file.clone(), &mut exec).unwrap();
        assert_eq!(exec.submitted, vec![BackendRequest::UploadCsv { file }]);
        assert_eq!(uploader.in_flight(), 1);
    }

    #[test]
    fn test_finish_outcomes() {
        let mut uploader = Uploader::new();
        let file = FileHandle::from_path("sample.csv");

        let accepted = uploader
            .finish(
                file.clone(),
                Ok(UploadReceipt {
                    success: true,
                    session_id: Some(SessionId("s-1".to_string())),
                }),
            )
            .unwrap();
        assert_eq!(accepted.file, file);
        assert_eq!(accepted.session, Some(SessionId("s-1".to_string())));

        let rejected = uploader.finish(
            file.clone(),
            Ok(UploadReceipt {
                success: false,
                session_id: None,
            }),
        );
        assert!(matches!(rejected, Err(EditorError::UploadRejected)));

        let failed = uploader.finish(file, Err(BackendError::Transport("refused".into())));
        assert!(matches!(failed, Err(EditorError::Backend(_))));
    }
}
