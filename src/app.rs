//! TVAT Application - Tracked Video Annotation Tool
//!
//! Headless editor core:
//! - Uploader: sends the tracking CSV and unlocks editing
//! - Player: video playback with a per-frame position sync
//! - Editing: bounding box redraw and identifier rename on the paused frame
//! - Download: fetches the CSV with all edits applied
//!
//! Hosts feed [`Message`]s through [`TvatApp::update`] and call
//! [`TvatApp::tick`] once per display frame.

use crate::backend::{
    BackendRequest, BackendResponse, BoundingBoxUpdate, IdentifierUpdate, RequestExecutor,
    SessionId,
};
use crate::config::AppConfig;
use crate::constants::{DOWNLOAD_FILE_NAME, VIDEO_MIME_PREFIX, alerts};
use crate::download::DownloadFolder;
use crate::error::EditorError;
use crate::media::{FfmpegOpener, MediaAsset, MediaOpener};
use crate::message::Message;
use crate::model::{
    BoundingBox, BoxDrawing, EditMode, FileHandle, IdentifierEdit, OverlayRect, PointerEvent,
    PointerKind,
};
use crate::notify::Notifier;
use crate::state::{PlaybackEngine, PlaybackPosition};
use crate::uploader::{AcceptedCsv, Uploader};


/// The annotation editor.
pub struct TvatApp {
    config: AppConfig,
    notifier: Box<dyn Notifier>,
    executor: Box<dyn RequestExecutor>,
    opener: Box<dyn MediaOpener>,
    downloads: DownloadFolder,

    // Uploader
    uploader: Uploader,
    /// Last CSV the backend accepted
    csv_file: Option<FileHandle>,
    session: Option<SessionId>,

    // Player
    playback: PlaybackEngine,

    // Editing
    edit_mode: EditMode,
    /// Open identifier dialog, only while in EditIdentifier mode
    id_edit: Option<IdentifierEdit>,
    box_drawing: BoxDrawing,
    /// Client coordinates of the overlay's top-left corner
    overlay_origin: (f32, f32),

    disposed: bool,
}

impl TvatApp {
    /// Create the editor. Downloads go to the configured folder and
    /// videos are opened with [`FfmpegOpener`].
    pub fn new(
        config: AppConfig,
        executor: Box<dyn RequestExecutor>,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        let downloads = DownloadFolder::new(config.preferences.download_dir());
        Self {
            config,
            notifier,
            executor,
            opener: Box::new(FfmpegOpener),
            downloads,
            uploader: Uploader::new(),
            csv_file: None,
            session: None,
            playback: PlaybackEngine::new(),
            edit_mode: EditMode::None,
            id_edit: None,
            box_drawing: BoxDrawing::default(),
            overlay_origin: (0.0, 0.0),
            disposed: false,
        }
    }

    /// Replace how videos are opened.
    pub fn with_opener(mut self, opener: Box<dyn MediaOpener>) -> Self {
        self.opener = opener;
        self
    }

    /// Replace where downloads are saved.
    pub fn with_download_folder(mut self, downloads: DownloadFolder) -> Self {
        self.downloads = downloads;
        self
    }

    // ========================================================================
    // Read-only state for hosts
    // ========================================================================

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Whether the backend has accepted a CSV. Editing requires this.
    pub fn csv_uploaded(&self) -> bool {
        self.csv_file.is_some()
    }

    /// Whether a CSV upload is waiting for the backend.
    pub fn is_uploading(&self) -> bool {
        self.uploader.in_flight() > 0
    }

    /// The last accepted CSV.
    pub fn csv_file(&self) -> Option<&FileHandle> {
        self.csv_file.as_ref()
    }

    /// Backend session from the last accepted upload.
    pub fn session(&self) -> Option<&SessionId> {
        self.session.as_ref()
    }

    /// Name of the loaded video.
    pub fn video_name(&self) -> Option<&str> {
        self.playback.asset().map(|asset| asset.file.name.as_str())
    }

    pub fn position(&self) -> PlaybackPosition {
        self.playback.position()
    }

    pub fn is_playing(&self) -> bool {
        self.playback.is_playing()
    }

    /// Whether a frame sync is scheduled.
    pub fn is_syncing(&self) -> bool {
        self.playback.is_syncing()
    }

    pub fn edit_mode(&self) -> EditMode {
        self.edit_mode
    }

    /// Whether the player should be dimmed behind the edit UI.
    pub fn is_dimmed(&self) -> bool {
        self.edit_mode.is_editing()
    }

    /// The identifier dialog, if open.
    pub fn identifier_edit(&self) -> Option<&IdentifierEdit> {
        self.id_edit.as_ref()
    }

    /// The current or last drawn box.
    pub fn bounding_box(&self) -> Option<&BoundingBox> {
        self.box_drawing.bbox.as_ref()
    }

    /// Whether a box drag is in progress.
    pub fn is_drawing(&self) -> bool {
        self.box_drawing.drawing
    }

    /// Rectangle to render on the overlay, once the box has two corners.
    pub fn overlay_rect(&self) -> Option<OverlayRect> {
        self.box_drawing.bbox.and_then(|b| b.rect())
    }

    /// Backend requests not yet answered.
    pub fn pending_requests(&self) -> usize {
        self.executor.in_flight()
    }

    // ========================================================================
    // Update loop
    // ========================================================================

    /// Apply a message. Failures are reported through the notifier or the
    /// log and never returned. A disposed editor ignores every message.
    pub fn update(&mut self, message: Message) {
        if self.disposed {
            log::debug!("Editor disposed, ignoring {:?}", message);
            return;
        }
        match message {
            // Uploader
            Message::CsvSelected(file) => {
                if let Err(e) = self.uploader.submit_csv(file, self.executor.as_mut()) {
                    log::warn!("CSV rejected: {}", e);
                    self.notifier.alert(alerts::INVALID_CSV);
                }
            }

            // Video Player - Playback
            Message::VideoSelected(file) => {
                if let Err(e) = self.load_video(file) {
                    log::warn!("Video rejected: {}", e);
                    self.notifier.alert(alerts::INVALID_VIDEO);
                }
            }
            Message::TogglePlayPause => {
                self.playback.toggle_play_pause();
            }
            Message::Scrub(progress) => {
                if let Err(e) = self.playback.scrub(progress) {
                    log::warn!("Scrub ignored: {}", EditorError::from(e));
                }
            }

            // Video Player - Editing
            Message::EditOptionSelected(mode) => {
                if let Err(e) = self.enter_edit_mode(mode) {
                    log::warn!("Edit mode refused: {}", e);
                    self.notifier.alert(alerts::CSV_REQUIRED);
                }
            }
            Message::ExitEditMode => self.exit_edit_mode(),
            Message::OverlayMoved { left, top } => {
                self.overlay_origin = (left, top);
            }
            Message::Pointer(event) => self.handle_pointer(event),
            Message::CurrentIdChanged(value) => {
                if let Some(edit) = self.id_edit.as_mut() {
                    edit.current_id = value;
                }
            }
            Message::NewIdChanged(value) => {
                if let Some(edit) = self.id_edit.as_mut() {
                    edit.new_id = value;
                }
            }
            Message::SaveIdentifier => self.save_identifier(),
            Message::CloseIdentifierDialog => self.close_identifier_dialog(),
            Message::SubmitBoundingBox { track_id, class_id } => {
                self.submit_bounding_box(track_id, class_id);
            }

            // Download
            Message::DownloadUpdatedCsv => {
                log::info!("Requesting updated CSV");
                self.executor.submit(BackendRequest::DownloadUpdatedCsv {
                    session: self.session.clone(),
                });
            }

            // Backend
            Message::Backend(response) => self.handle_backend_response(response),
        }
    }

    /// Advance one display frame: apply finished backend requests, then
    /// run the frame sync if one is scheduled.
    ///
    /// Returns true when visible state changed.
    pub fn tick(&mut self) -> bool {
        if self.disposed {
            return false;
        }
        let mut changed = false;
        while let Some(response) = self.executor.try_next() {
            self.update(Message::Backend(response));
            changed = true;
        }
        if self.playback.on_frame() {
            changed = true;
        }
        changed
    }

    /// Stop the frame loop and release the video. Later messages and ticks
    /// do nothing.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.playback.dispose();
        self.box_drawing = BoxDrawing::default();
        log::debug!("Editor disposed");
    }

    // ========================================================================
    // Handlers
    // ========================================================================

    fn load_video(&mut self, file: FileHandle) -> Result<(), EditorError> {
        if !file.is_video() {
            return Err(EditorError::invalid_file_type(
                VIDEO_MIME_PREFIX,
                file.mime_type,
            ));
        }
        let clock = self.opener.open(&file)?;
        let asset = MediaAsset::new(file, self.config.playback.frame_rate, clock);
        self.playback.load(asset);
        Ok(())
    }

    fn enter_edit_mode(&mut self, mode: EditMode) -> Result<(), EditorError> {
        if !self.csv_uploaded() {
            return Err(EditorError::EditingWithoutCsv);
        }
        match mode {
            // Placeholder option in the selector
            EditMode::None => return Ok(()),
            EditMode::RedrawBoundingBox => {
                self.id_edit = None;
            }
            EditMode::EditIdentifier => {
                self.box_drawing.drawing = false;
                let frame = self.playback.position().current_frame;
                self.id_edit = Some(IdentifierEdit::for_frame(frame));
            }
        }
        self.playback.pause();
        self.edit_mode = mode;
        log::info!(
            "Entered {} mode at frame {}",
            mode.name(),
            self.playback.position().current_frame
        );
        Ok(())
    }

    fn exit_edit_mode(&mut self) {
        match self.edit_mode {
            EditMode::None => {}
            EditMode::EditIdentifier => self.close_identifier_dialog(),
            EditMode::RedrawBoundingBox => {
                self.box_drawing.drawing = false;
                self.edit_mode = EditMode::None;
                log::info!("Left {} mode", EditMode::RedrawBoundingBox.name());
            }
        }
    }

    /// Translate a client-coordinate pointer event onto the overlay.
    fn handle_pointer(&mut self, event: PointerEvent) {
        let x = event.client_x - self.overlay_origin.0;
        let y = event.client_y - self.overlay_origin.1;
        let redrawing = self.edit_mode == EditMode::RedrawBoundingBox;
        match event.kind {
            PointerKind::Down if redrawing => self.box_drawing.pointer_down(x, y),
            PointerKind::Move if redrawing => self.box_drawing.pointer_move(x, y),
            PointerKind::Up if self.box_drawing.drawing => self.box_drawing.pointer_up(),
            _ => {}
        }
    }

    /// Submit the identifier change, then close the dialog and resume
    /// playback whatever the backend answers.
    fn save_identifier(&mut self) {
        if self.edit_mode != EditMode::EditIdentifier {
            log::debug!("Save ignored: not in {} mode", EditMode::EditIdentifier.name());
            return;
        }
        if let Some(edit) = self.id_edit.take() {
            log::info!(
                "Renaming ID '{}' to '{}' at frame {}",
                edit.current_id,
                edit.new_id,
                edit.frame_index
            );
            self.executor.submit(BackendRequest::UpdateId {
                session: self.session.clone(),
                update: IdentifierUpdate {
                    current_frame: edit.frame_index,
                    current_id: edit.current_id,
                    new_id: edit.new_id,
                },
            });
        }
        self.edit_mode = EditMode::None;
        self.playback.play();
    }

    /// Discard the identifier dialog. Playback stays paused.
    fn close_identifier_dialog(&mut self) {
        if self.edit_mode != EditMode::EditIdentifier {
            return;
        }
        self.id_edit = None;
        self.edit_mode = EditMode::None;
        log::info!("Identifier dialog closed");
    }

    fn submit_bounding_box(&mut self, track_id: u64, class_id: u64) {
        if self.edit_mode != EditMode::RedrawBoundingBox {
            log::warn!(
                "Bounding box not sent: not in {} mode",
                EditMode::RedrawBoundingBox.name()
            );
            return;
        }
        let Some((x1, y1, x2, y2)) = self.box_drawing.finalized().and_then(|b| b.normalized())
        else {
            log::warn!("Bounding box not sent: no finished box");
            return;
        };
        let frame_id = self.playback.position().current_frame;
        log::info!(
            "Sending box for track {} at frame {}: ({:.1}, {:.1})-({:.1}, {:.1})",
            track_id,
            frame_id,
            x1,
            y1,
            x2,
            y2
        );
        self.executor.submit(BackendRequest::UpdateBoundingBox {
            session: self.session.clone(),
            update: BoundingBoxUpdate {
                frame_id,
                track_id,
                class_id,
                x1,
                y1,
                x2,
                y2,
            },
        });
    }

    fn handle_backend_response(&mut self, response: BackendResponse) {
        match response {
            BackendResponse::CsvUploaded { file, result } => {
                match self.uploader.finish(file, result) {
                    Ok(accepted) => self.on_csv_accepted(accepted),
                    Err(e) => {
                        log::error!("CSV upload failed: {}", e);
                        self.notifier.alert(alerts::CSV_UPLOAD_FAILED);
                    }
                }
            }
            BackendResponse::IdUpdated(result) => match result {
                Ok(()) => log::info!("Identifier updated"),
                Err(e) => log::error!("Failed to update identifier: {}", e),
            },
            BackendResponse::BoundingBoxUpdated(result) => match result {
                Ok(()) => log::info!("Bounding box saved"),
                Err(e) => {
                    log::error!("Failed to save bounding box: {}", e);
                    self.notifier.alert(alerts::BOUNDING_BOX_FAILED);
                }
            },
            BackendResponse::CsvDownloaded(result) => {
                let saved = result.map_err(EditorError::from).and_then(|bytes| {
                    self.downloads
                        .save(DOWNLOAD_FILE_NAME, &bytes)
                        .map_err(EditorError::from)
                });
                match saved {
                    Ok(path) => log::info!("Updated CSV saved to {}", path.display()),
                    Err(e) => {
                        log::error!("Failed to download updated CSV: {}", e);
                        self.notifier.alert(alerts::DOWNLOAD_FAILED);
                    }
                }
            }
        }
    }

    fn on_csv_accepted(&mut self, accepted: AcceptedCsv) {
        log::info!(
            "CSV {} accepted{}",
            accepted.file.name,
            accepted
                .session
                .as_ref()
                .map(|s| format!(" (session {})", s))
                .unwrap_or_default()
        );
        self.csv_file = Some(accepted.file);
        self.session = accepted.session;
    }
}

impl Drop for TvatApp {
    fn drop(&mut self) {
        self.dispose();
    }
}
