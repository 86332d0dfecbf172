//! Native window front end.
//!
//! A winit event loop hosts the editor core. Pointer and keyboard input go
//! through [`input::InputRouter`], each frame is drawn from editor state by
//! [`scene::build`] and rendered with wgpu, and file selection and alerts use
//! native rfd dialogs.

mod dialogs;
mod gpu;
mod input;
mod layout;
mod scene;
mod shapes;
mod window;

use std::thread;
use std::time::Duration;

use thiserror::Error;
use winit::event_loop::{ControlFlow, EventLoop};

use crate::app::TvatApp;
use crate::backend::{BackendError, HttpBackend, RequestWorker};
use crate::config::AppConfig;
use crate::constants::HOST_TICK_INTERVAL;

use dialogs::DialogNotifier;
use window::EditorWindow;

pub use gpu::GpuError;

/// Errors that stop the window host.
#[derive(Error, Debug)]
pub enum GuiError {
    #[error("Failed to create backend client: {0}")]
    Backend(#[from] BackendError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("Failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("GPU error: {0}")]
    Gpu(#[from] GpuError),
}

/// Open the editor window against the configured backend and run until it
/// is closed.
pub fn run(config: AppConfig) -> Result<(), GuiError> {
    let backend = HttpBackend::new(&config.backend)?;
    log::info!("Using backend at {}", backend.base_url());
    let drain_timeout = Duration::from_secs(config.backend.request_timeout_secs);

    let worker = RequestWorker::spawn(backend)?;
    let app = TvatApp::new(config, Box::new(worker), Box::new(DialogNotifier));

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::wait_duration(HOST_TICK_INTERVAL));

    let mut window = EditorWindow::new(app, drain_timeout);
    event_loop.run_app(&mut window)?;
    match window.take_failure() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Keep ticking until every backend request has been answered.
fn drain(app: &mut TvatApp, timeout: Duration) {
    let started = web_time::Instant::now();
    while app.pending_requests() > 0 {
        if started.elapsed() > timeout {
            log::warn!(
                "Exiting with {} backend requests unanswered",
                app.pending_requests()
            );
            return;
        }
        app.tick();
        thread::sleep(HOST_TICK_INTERVAL);
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::input::UiAction;
    use crate::app::TvatApp;
    use crate::backend::{
        AnnotationBackend, BackendError, BoundingBoxUpdate, IdentifierUpdate, InlineExecutor,
        SessionId, UploadReceipt,
    };
    use crate::config::AppConfig;
    use crate::download::DownloadFolder;
    use crate::media::{MediaClock, MediaError, MediaOpener};
    use crate::message::Message;
    use crate::model::FileHandle;
    use crate::notify::LogNotifier;
    use crate::state::ManualClock;

    /// Backend accepting every call, recording which endpoints were hit.
    #[derive(Clone, Default)]
    struct OkBackend {
        calls: Rc<RefCell<Vec<&'static str>>>,
    }

    impl AnnotationBackend for OkBackend {
        fn upload_csv(&self, _file: &FileHandle) -> Result<UploadReceipt, BackendError> {
            self.calls.borrow_mut().push("upload-csv");
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
            self.calls.borrow_mut().push("update-id");
            Ok(())
        }
        fn update_bounding_box(
            &self,
            _session: Option<&SessionId>,
            _update: &BoundingBoxUpdate,
        ) -> Result<(), BackendError> {
            self.calls.borrow_mut().push("update-bounding-box");
            Ok(())
        }
        fn download_updated_csv(
            &self,
            _session: Option<&SessionId>,
        ) -> Result<Vec<u8>, BackendError> {
            self.calls.borrow_mut().push("download-updated-csv");
            Ok(b"frame,id\n".to_vec())
        }
    }

    struct StubOpener;

    impl MediaOpener for StubOpener {
        fn open(&self, _file: &FileHandle) -> Result<Box<dyn MediaClock>, MediaError> {
            Ok(Box::new(ManualClock::new(90.0)))
        }
    }

    /// An editor wired to in-process fakes.
    pub(crate) struct Editor {
        pub app: TvatApp,
        calls: Rc<RefCell<Vec<&'static str>>>,
    }

    impl Editor {
        /// Apply what the router asked for. Dialog actions are skipped.
        pub fn apply(&mut self, action: Option<UiAction>) {
            if let Some(UiAction::Send(message)) = action {
                self.send(message);
            }
        }

        pub fn send(&mut self, message: Message) {
            self.app.update(message);
            self.app.tick();
        }

        pub fn upload_csv(&mut self) {
            self.send(Message::CsvSelected(FileHandle::from_path("sample.csv")));
        }

        pub fn load_video(&mut self) {
            self.send(Message::VideoSelected(FileHandle::from_path("clip.mp4")));
        }

        pub fn calls(&self) -> Vec<&'static str> {
            self.calls.borrow().clone()
        }
    }

    pub(crate) fn editor(dir: &tempfile::TempDir) -> Editor {
        let backend = OkBackend::default();
        let calls = Rc::clone(&backend.calls);
        let app = TvatApp::new(
            AppConfig::default(),
            Box::new(InlineExecutor::new(backend)),
            Box::new(LogNotifier),
        )
        .with_opener(Box::new(StubOpener))
        .with_download_folder(DownloadFolder::new(dir.path()));
        Editor { app, calls }
    }
}
