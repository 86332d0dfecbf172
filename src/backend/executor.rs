//! Executors that run backend requests for the editor.
//!
//! [`RequestWorker`] owns the backend on a background thread so slow or
//! failing network calls never stall the event loop. [`InlineExecutor`]
//! runs requests immediately on the calling thread, which keeps tests
//! deterministic. Both hand results back through [`RequestExecutor::try_next`].

use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use super::{AnnotationBackend, BackendRequest, BackendResponse, execute};

/// Queue of backend requests with results collected later.
pub trait RequestExecutor {
    /// Queue a request.
    fn submit(&mut self, request: BackendRequest);

    /// Take the next finished response, if any.
    fn try_next(&mut self) -> Option<BackendResponse>;

    /// Number of requests submitted but not yet collected.
    fn in_flight(&self) -> usize;
}

/// Runs each request as soon as it is submitted.
pub struct InlineExecutor<B> {
    backend: B,
    completed: VecDeque<BackendResponse>,
}

impl<B: AnnotationBackend> InlineExecutor<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            completed: VecDeque::new(),
        }
    }
}

impl<B: AnnotationBackend> RequestExecutor for InlineExecutor<B> {
    fn submit(&mut self, request: BackendRequest) {
        let response = execute(&self.backend, request);
        self.completed.push_back(response);
    }

    fn try_next(&mut self) -> Option<BackendResponse> {
        self.completed.pop_front()
    }

    fn in_flight(&self) -> usize {
        self.completed.len()
    }
}

/// Message sent to the worker thread.
enum WorkerMessage {
    /// Run a request
    Request(BackendRequest),
    /// Shutdown the thread
    Shutdown,
}

/// Runs backend requests in order on a dedicated thread.
pub struct RequestWorker {
    /// Sender for requests to the background thread
    request_tx: Sender<WorkerMessage>,
    /// Receiver for results from the background thread
    result_rx: Receiver<BackendResponse>,
    /// Handle to the background thread (for joining on drop)
    thread_handle: Option<JoinHandle<()>>,
    /// Submitted requests whose results have not been collected
    in_flight: usize,
}

impl RequestWorker {
    /// Spawn the worker thread, moving the backend onto it.
    pub fn spawn<B>(backend: B) -> std::io::Result<Self>
    where
        B: AnnotationBackend + Send + 'static,
    {
        let (request_tx, request_rx) = mpsc::channel::<WorkerMessage>();
        let (result_tx, result_rx) = mpsc::channel::<BackendResponse>();

        let thread_handle = thread::Builder::new()
            .name("backend-requests".to_string())
            .spawn(move || {
                log::info!("Backend request thread started");
                Self::thread_loop(&backend, request_rx, result_tx);
                log::info!("Backend request thread exiting");
            })?;

        Ok(Self {
            request_tx,
            result_rx,
            thread_handle: Some(thread_handle),
            in_flight: 0,
        })
    }

    /// Background thread main loop.
    fn thread_loop<B: AnnotationBackend>(
        backend: &B,
        request_rx: Receiver<WorkerMessage>,
        result_tx: Sender<BackendResponse>,
    ) {
        loop {
            match request_rx.recv() {
                Ok(WorkerMessage::Request(request)) => {
                    let response = execute(backend, request);
                    if result_tx.send(response).is_err() {
                        log::warn!("Result channel closed, request thread exiting");
                        break;
                    }
                }
                Ok(WorkerMessage::Shutdown) => {
                    log::debug!("Received shutdown signal");
                    break;
                }
                Err(_) => {
                    log::debug!("Request channel closed, request thread exiting");
                    break;
                }
            }
        }
    }

    /// Block until the next response arrives or the timeout passes.
    pub fn wait_next(&mut self, timeout: Duration) -> Option<BackendResponse> {
        match self.result_rx.recv_timeout(timeout) {
            Ok(response) => {
                self.in_flight = self.in_flight.saturating_sub(1);
                Some(response)
            }
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => {
                log::error!("Backend request thread disconnected");
                None
            }
        }
    }
}

impl RequestExecutor for RequestWorker {
    fn submit(&mut self, request: BackendRequest) {
        let name = request.name();
        if self.request_tx.send(WorkerMessage::Request(request)).is_err() {
            log::error!("Backend request thread is gone, dropping {} request", name);
            return;
        }
        self.in_flight += 1;
        log::debug!("Queued {} request ({} in flight)", name, self.in_flight);
    }

    fn try_next(&mut self) -> Option<BackendResponse> {
        match self.result_rx.try_recv() {
            Ok(response) => {
                self.in_flight = self.in_flight.saturating_sub(1);
                Some(response)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                if self.in_flight > 0 {
                    log::error!(
                        "Backend request thread disconnected with {} requests in flight",
                        self.in_flight
                    );
                    self.in_flight = 0;
                }
                None
            }
        }
    }

    fn in_flight(&self) -> usize {
        self.in_flight
    }
}

impl Drop for RequestWorker {
    fn drop(&mut self) {
        let _ = self.request_tx.send(WorkerMessage::Shutdown);
        if let Some(handle) = self.thread_handle.take() {
            if handle.join().is_err() {
                log::error!("Backend request thread panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{
        BackendError, BoundingBoxUpdate, IdentifierUpdate, SessionId, UploadReceipt,
    };
    use crate::model::FileHandle;

    /// Backend answering every call with fixed results.
    struct CannedBackend;

    impl AnnotationBackend for CannedBackend {
        fn upload_csv(&self, _file: &FileHandle) -> Result<UploadReceipt, BackendError> {
            Ok(UploadReceipt {
                success: true,
                session_id: None,
            })
        }
        fn update_id(
            &self,
            _session: Option<&SessionId>,
            _update: &IdentifierUpdate,
        ) -> Result<(), BackendError> {
            Err(BackendError::Transport("connection refused".to_string()))
        }
        fn update_bounding_box(
            &self,
            _session: Option<&SessionId>,
            _update: &BoundingBoxUpdate,
        ) -> Result<(), BackendError> {
            Ok(())
        }
        fn download_updated_csv(
            &self,
            session: Option<&SessionId>,
        ) -> Result<Vec<u8>, BackendError> {
            Ok(session.map(|s| s.0.clone()).unwrap_or_default().into_bytes())
        }
    }

    #[test]
    fn test_inline_executor_preserves_order() {
        let mut exec = InlineExecutor::new(CannedBackend);
        exec.submit(BackendRequest::UploadCsv {
            file: FileHandle::from_path("a.csv"),
        });
        exec.submit(BackendRequest::DownloadUpdatedCsv {
            session: Some(SessionId("s1".to_string())),
        });
        assert_eq!(exec.in_flight(), 2);

        assert!(matches!(
            exec.try_next(),
            Some(BackendResponse::CsvUploaded { result: Ok(_), .. })
        ));
        match exec.try_next() {
            Some(BackendResponse::CsvDownloaded(Ok(bytes))) => assert_eq!(bytes, b"s1"),
            other => panic!("unexpected response: {:?}", other),
        }
        assert!(exec.try_next().is_none());
    }

    #[test]
    fn test_worker_runs_requests_off_thread() {
        let mut worker = RequestWorker::spawn(CannedBackend).unwrap();
        worker.submit(BackendRequest::UpdateId {
            session: None,
            update: IdentifierUpdate {
                current_frame: 1,
                current_id: "1".to_string(),
                new_id: "2".to_string(),
            },
        });
        assert_eq!(worker.in_flight(), 1);

        let response = worker.wait_next(Duration::from_secs(5));
        assert!(matches!(
            response,
            Some(BackendResponse::IdUpdated(Err(BackendError::Transport(_))))
        ));
        assert_eq!(worker.in_flight(), 0);
        assert!(worker.try_next().is_none());
    }
}
