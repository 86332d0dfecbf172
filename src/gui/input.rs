//! Translates window input into editor messages.
//!
//! The router owns the transient UI state the editor core does not track:
//! cursor position, an in-progress scrubber drag, keyboard focus in the
//! identifier dialog and the track/class form used to submit a redrawn box.

use winit::keyboard::KeyCode;

use super::layout::{Layout, ToolbarButton};
use crate::app::TvatApp;
use crate::message::Message;
use crate::model::{EditMode, IdentifierEdit, PointerEvent, PointerKind};

/// Scrub distance of one arrow key press, in percent.
pub const SCRUB_STEP_PERCENT: f64 = 1.0;

/// What the window should do in response to input.
#[derive(Debug)]
pub enum UiAction {
    /// Forward a message to the editor
    Send(Message),
    /// Open the CSV file picker
    PickCsv,
    /// Open the video file picker
    PickVideo,
    /// Show the shortcut list
    ShowHelp,
}

/// Keyboard shortcuts, active when no text field has focus.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    pub open_csv: KeyCode,
    pub open_video: KeyCode,
    pub play_pause: KeyCode,
    pub redraw_box: KeyCode,
    pub edit_identifier: KeyCode,
    pub download: KeyCode,
    pub help: KeyCode,
    pub scrub_back: KeyCode,
    pub scrub_forward: KeyCode,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            open_csv: KeyCode::KeyC,
            open_video: KeyCode::KeyV,
            play_pause: KeyCode::Space,
            redraw_box: KeyCode::KeyR,
            edit_identifier: KeyCode::KeyI,
            download: KeyCode::KeyD,
            help: KeyCode::F1,
            scrub_back: KeyCode::ArrowLeft,
            scrub_forward: KeyCode::ArrowRight,
        }
    }
}

impl KeyBindings {
    /// Key for each toolbar button, in toolbar order.
    pub fn toolbar_keys(&self) -> [(KeyCode, ToolbarButton); 7] {
        [
            (self.open_csv, ToolbarButton::OpenCsv),
            (self.open_video, ToolbarButton::OpenVideo),
            (self.play_pause, ToolbarButton::PlayPause),
            (self.redraw_box, ToolbarButton::RedrawBox),
            (self.edit_identifier, ToolbarButton::EditIdentifier),
            (self.download, ToolbarButton::Download),
            (self.help, ToolbarButton::Help),
        ]
    }

    /// The toolbar button a key triggers, if any.
    pub fn button_for_key(&self, key: KeyCode) -> Option<ToolbarButton> {
        self.toolbar_keys()
            .into_iter()
            .find(|(bound, _)| *bound == key)
            .map(|(_, button)| button)
    }
}

/// Which identifier dialog field receives typed text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdField {
    #[default]
    Current,
    New,
}

/// Which box form field receives typed digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoxField {
    #[default]
    Track,
    Class,
}

/// Track and class identifiers typed while redrawing a box.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoxForm {
    pub track: String,
    pub class: String,
    pub focus: BoxField,
}

impl BoxForm {
    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            BoxField::Track => &mut self.track,
            BoxField::Class => &mut self.class,
        }
    }

    /// Both identifiers, once both parse.
    pub fn parsed(&self) -> Option<(u64, u64)> {
        Some((self.track.parse().ok()?, self.class.parse().ok()?))
    }
}

enum KeyOutcome {
    Consumed(Option<UiAction>),
    Unhandled,
}

/// Routes window input to [`UiAction`]s.
#[derive(Debug)]
pub struct InputRouter {
    bindings: KeyBindings,
    layout: Layout,
    cursor: (f32, f32),
    scrubbing: bool,
    id_focus: IdField,
    box_form: BoxForm,
}

impl InputRouter {
    pub fn new(bindings: KeyBindings, width: f32, height: f32) -> Self {
        Self {
            bindings,
            layout: Layout::new(width, height),
            cursor: (0.0, 0.0),
            scrubbing: false,
            id_focus: IdField::default(),
            box_form: BoxForm::default(),
        }
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn is_scrubbing(&self) -> bool {
        self.scrubbing
    }

    pub fn id_focus(&self) -> IdField {
        self.id_focus
    }

    pub fn box_form(&self) -> &BoxForm {
        &self.box_form
    }

    /// Recompute the layout. The editor is told where the overlay now sits.
    pub fn resize(&mut self, width: f32, height: f32) -> UiAction {
        self.layout = Layout::new(width, height);
        UiAction::Send(Message::OverlayMoved {
            left: self.layout.video.x,
            top: self.layout.video.y,
        })
    }

    pub fn cursor_moved(&mut self, x: f32, y: f32, app: &TvatApp) -> Option<UiAction> {
        self.cursor = (x, y);
        if self.scrubbing {
            return Some(UiAction::Send(Message::Scrub(self.layout.progress_at(x))));
        }
        if app.is_drawing() {
            let (x, y) = self.layout.video.clamp(x, y);
            return Some(pointer(PointerKind::Move, x, y));
        }
        None
    }

    /// Left button pressed at the last cursor position.
    pub fn mouse_pressed(&mut self, app: &TvatApp) -> Option<UiAction> {
        let (x, y) = self.cursor;

        // The identifier dialog is modal
        if app.identifier_edit().is_some() {
            let dialog = self.layout.dialog;
            if dialog.save.contains(x, y) {
                return Some(UiAction::Send(Message::SaveIdentifier));
            }
            if dialog.close.contains(x, y) {
                return Some(UiAction::Send(Message::CloseIdentifierDialog));
            }
            if dialog.current_field.contains(x, y) {
                self.id_focus = IdField::Current;
            } else if dialog.new_field.contains(x, y) {
                self.id_focus = IdField::New;
            }
            return None;
        }

        if let Some(button) = self.layout.button_at(x, y) {
            return self.button_action(button, app);
        }
        if self.layout.scrubber.contains(x, y) {
            self.scrubbing = true;
            return Some(UiAction::Send(Message::Scrub(self.layout.progress_at(x))));
        }
        if self.layout.video.contains(x, y) && app.edit_mode() == EditMode::RedrawBoundingBox {
            return Some(pointer(PointerKind::Down, x, y));
        }
        None
    }

    /// Left button released at the last cursor position.
    pub fn mouse_released(&mut self, app: &TvatApp) -> Option<UiAction> {
        if self.scrubbing {
            self.scrubbing = false;
            return None;
        }
        if app.is_drawing() {
            let (x, y) = self.layout.video.clamp(self.cursor.0, self.cursor.1);
            return Some(pointer(PointerKind::Up, x, y));
        }
        None
    }

    /// A key was pressed. `text` is what the key typed, if anything.
    pub fn key_pressed(
        &mut self,
        key: KeyCode,
        text: Option<&str>,
        app: &TvatApp,
    ) -> Option<UiAction> {
        if let Some(edit) = app.identifier_edit() {
            return self.identifier_key(key, text, edit);
        }
        if app.edit_mode() == EditMode::RedrawBoundingBox {
            if let KeyOutcome::Consumed(action) = self.box_form_key(key, text) {
                return action;
            }
        }

        if key == self.bindings.scrub_back || key == self.bindings.scrub_forward {
            app.video_name()?;
            let step = if key == self.bindings.scrub_back {
                -SCRUB_STEP_PERCENT
            } else {
                SCRUB_STEP_PERCENT
            };
            let target = (app.position().progress_percent + step).clamp(0.0, 100.0);
            return Some(UiAction::Send(Message::Scrub(target)));
        }
        let button = self.bindings.button_for_key(key)?;
        self.button_action(button, app)
    }

    fn button_action(&mut self, button: ToolbarButton, app: &TvatApp) -> Option<UiAction> {
        let action = match button {
            ToolbarButton::OpenCsv => UiAction::PickCsv,
            ToolbarButton::OpenVideo => UiAction::PickVideo,
            ToolbarButton::PlayPause => UiAction::Send(Message::TogglePlayPause),
            ToolbarButton::RedrawBox => {
                self.box_form = BoxForm::default();
                UiAction::Send(toggle_mode(app, EditMode::RedrawBoundingBox))
            }
            ToolbarButton::EditIdentifier => {
                self.id_focus = IdField::Current;
                UiAction::Send(toggle_mode(app, EditMode::EditIdentifier))
            }
            ToolbarButton::Download => UiAction::Send(Message::DownloadUpdatedCsv),
            ToolbarButton::Help => UiAction::ShowHelp,
        };
        Some(action)
    }

    fn identifier_key(
        &mut self,
        key: KeyCode,
        text: Option<&str>,
        edit: &IdentifierEdit,
    ) -> Option<UiAction> {
        let mut value = match self.id_focus {
            IdField::Current => edit.current_id.clone(),
            IdField::New => edit.new_id.clone(),
        };
        match key {
            KeyCode::Escape => return Some(UiAction::Send(Message::ExitEditMode)),
            KeyCode::Enter | KeyCode::NumpadEnter => {
                return Some(UiAction::Send(Message::SaveIdentifier));
            }
            KeyCode::Tab => {
                self.id_focus = match self.id_focus {
                    IdField::Current => IdField::New,
                    IdField::New => IdField::Current,
                };
                return None;
            }
            KeyCode::Backspace => {
                value.pop()?;
            }
            _ => {
                let typed = printable(text)?;
                value.push_str(&typed);
            }
        }
        let message = match self.id_focus {
            IdField::Current => Message::CurrentIdChanged(value),
            IdField::New => Message::NewIdChanged(value),
        };
        Some(UiAction::Send(message))
    }

    fn box_form_key(&mut self, key: KeyCode, text: Option<&str>) -> KeyOutcome {
        match key {
            KeyCode::Escape => KeyOutcome::Consumed(Some(UiAction::Send(Message::ExitEditMode))),
            KeyCode::Tab => {
                self.box_form.focus = match self.box_form.focus {
                    BoxField::Track => BoxField::Class,
                    BoxField::Class => BoxField::Track,
                };
                KeyOutcome::Consumed(None)
            }
            KeyCode::Backspace => {
                self.box_form.focused_mut().pop();
                KeyOutcome::Consumed(None)
            }
            KeyCode::Enter | KeyCode::NumpadEnter => {
                let Some((track_id, class_id)) = self.box_form.parsed() else {
                    log::warn!("Enter a track and class ID before submitting the box");
                    return KeyOutcome::Consumed(None);
                };
                self.box_form = BoxForm::default();
                KeyOutcome::Consumed(Some(UiAction::Send(Message::SubmitBoundingBox {
                    track_id,
                    class_id,
                })))
            }
            _ => match printable(text) {
                Some(digits) if digits.chars().all(|c| c.is_ascii_digit()) => {
                    self.box_form.focused_mut().push_str(&digits);
                    KeyOutcome::Consumed(None)
                }
                _ => KeyOutcome::Unhandled,
            },
        }
    }
}

fn pointer(kind: PointerKind, x: f32, y: f32) -> UiAction {
    UiAction::Send(Message::Pointer(PointerEvent::new(kind, x, y)))
}

/// Leave `mode` if it is active, otherwise enter it.
fn toggle_mode(app: &TvatApp, mode: EditMode) -> Message {
    if app.edit_mode() == mode {
        Message::ExitEditMode
    } else {
        Message::EditOptionSelected(mode)
    }
}

/// Typed text without control characters, if any remains.
fn printable(text: Option<&str>) -> Option<String> {
    let typed: String = text?.chars().filter(|c| !c.is_control()).collect();
    (!typed.is_empty()).then_some(typed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gui::test_support::{Editor, editor};

    const WIDTH: f32 = 1024.0;
    const HEIGHT: f32 = 768.0;

    fn router(editor: &mut Editor) -> InputRouter {
        let mut router = InputRouter::new(KeyBindings::default(), WIDTH, HEIGHT);
        let moved = router.resize(WIDTH, HEIGHT);
        editor.apply(Some(moved));
        router
    }

    fn center(rect: crate::gui::layout::Rect) -> (f32, f32) {
        (rect.x + rect.width / 2.0, rect.y + rect.height / 2.0)
    }

    fn click(router: &mut InputRouter, editor: &mut Editor, x: f32, y: f32) {
        let action = router.cursor_moved(x, y, &editor.app);
        editor.apply(action);
        let action = router.mouse_pressed(&editor.app);
        editor.apply(action);
        let action = router.mouse_released(&editor.app);
        editor.apply(action);
    }

    fn key(router: &mut InputRouter, editor: &mut Editor, key: KeyCode, text: Option<&str>) {
        let action = router.key_pressed(key, text, &editor.app);
        editor.apply(action);
    }

    fn type_text(router: &mut InputRouter, editor: &mut Editor, text: &str) {
        for c in text.chars() {
            let s = c.to_string();
            key(router, editor, KeyCode::KeyA, Some(&s));
        }
    }

    #[test]
    fn test_drag_on_video_draws_box_in_overlay_coordinates() {
        let dir = tempfile::tempdir().unwrap();
        let mut editor = editor(&dir);
        let mut router = router(&mut editor);
        editor.upload_csv();
        key(&mut router, &mut editor, KeyCode::KeyR, Some("r"));
        assert_eq!(editor.app.edit_mode(), EditMode::RedrawBoundingBox);

        let video = router.layout().video;
        let action = router.cursor_moved(video.x + 10.0, video.y + 20.0, &editor.app);
        editor.apply(action);
        let action = router.mouse_pressed(&editor.app);
        editor.apply(action);
        assert!(editor.app.is_drawing());

        let action = router.cursor_moved(video.x + 110.0, video.y + 70.0, &editor.app);
        editor.apply(action);
        let action = router.mouse_released(&editor.app);
        editor.apply(action);

        assert!(!editor.app.is_drawing());
        let rect = editor.app.overlay_rect().unwrap();
        assert_eq!(
            (rect.left, rect.top, rect.width, rect.height),
            (10.0, 20.0, 100.0, 50.0)
        );
    }

    #[test]
    fn test_drag_is_clamped_to_the_video() {
        let dir = tempfile::tempdir().unwrap();
        let mut editor = editor(&dir);
        let mut router = router(&mut editor);
        editor.upload_csv();
        key(&mut router, &mut editor, KeyCode::KeyR, Some("r"));

        let video = router.layout().video;
        let action = router.cursor_moved(video.x + 5.0, video.y + 5.0, &editor.app);
        editor.apply(action);
        let action = router.mouse_pressed(&editor.app);
        editor.apply(action);
        let action = router.cursor_moved(WIDTH + 500.0, -40.0, &editor.app);
        editor.apply(action);
        let action = router.mouse_released(&editor.app);
        editor.apply(action);

        let bbox = editor.app.bounding_box().unwrap();
        assert_eq!(bbox.x2, Some(video.width));
        assert_eq!(bbox.y2, Some(0.0));
    }

    #[test]
    fn test_pressing_video_outside_redraw_mode_does_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut editor = editor(&dir);
        let mut router = router(&mut editor);
        let (x, y) = center(router.layout().video);
        router.cursor_moved(x, y, &editor.app);
        assert!(router.mouse_pressed(&editor.app).is_none());
    }

    #[test]
    fn test_scrubber_drag_sends_progress() {
        let dir = tempfile::tempdir().unwrap();
        let mut editor = editor(&dir);
        let mut router = router(&mut editor);
        editor.load_video();

        let track = router.layout().scrubber;
        click(&mut router, &mut editor, track.x + track.width / 2.0, track.y + 1.0);
        assert_eq!(editor.app.position().progress_percent, 50.0);
        assert!(!router.is_scrubbing());

        let action = router.cursor_moved(track.x + 1.0, track.y + 1.0, &editor.app);
        editor.apply(action);
        let action = router.mouse_pressed(&editor.app);
        editor.apply(action);
        assert!(router.is_scrubbing());
        // Dragging past the end pins the thumb at 100%
        let action = router.cursor_moved(WIDTH * 2.0, 0.0, &editor.app);
        editor.apply(action);
        assert_eq!(editor.app.position().progress_percent, 100.0);
        router.mouse_released(&editor.app);
        assert!(!router.is_scrubbing());
    }

    #[test]
    fn test_arrow_keys_scrub_by_one_percent() {
        let dir = tempfile::tempdir().unwrap();
        let mut editor = editor(&dir);
        let mut router = router(&mut editor);

        // No video: nothing to scrub
        assert!(
            router
                .key_pressed(KeyCode::ArrowRight, None, &editor.app)
                .is_none()
        );

        editor.load_video();
        key(&mut router, &mut editor, KeyCode::ArrowRight, None);
        key(&mut router, &mut editor, KeyCode::ArrowRight, None);
        assert!((editor.app.position().progress_percent - 2.0).abs() < 1e-9);
        for _ in 0..5 {
            key(&mut router, &mut editor, KeyCode::ArrowLeft, None);
        }
        assert_eq!(editor.app.position().progress_percent, 0.0);
    }

    #[test]
    fn test_toolbar_buttons_map_to_actions() {
        let dir = tempfile::tempdir().unwrap();
        let mut editor = editor(&dir);
        let mut router = router(&mut editor);
        let layout = router.layout().clone();

        let mut press = |button: ToolbarButton| {
            let rect = layout
                .toolbar
                .iter()
                .find(|(b, _)| *b == button)
                .map(|(_, r)| *r)
                .unwrap();
            let (x, y) = center(rect);
            router.cursor_moved(x, y, &editor.app);
            router.mouse_pressed(&editor.app)
        };

        assert!(matches!(press(ToolbarButton::OpenCsv), Some(UiAction::PickCsv)));
        assert!(matches!(
            press(ToolbarButton::OpenVideo),
            Some(UiAction::PickVideo)
        ));
        assert!(matches!(press(ToolbarButton::Help), Some(UiAction::ShowHelp)));
        assert!(matches!(
            press(ToolbarButton::PlayPause),
            Some(UiAction::Send(Message::TogglePlayPause))
        ));
        assert!(matches!(
            press(ToolbarButton::Download),
            Some(UiAction::Send(Message::DownloadUpdatedCsv))
        ));
        assert!(matches!(
            press(ToolbarButton::RedrawBox),
            Some(UiAction::Send(Message::EditOptionSelected(
                EditMode::RedrawBoundingBox
            )))
        ));
    }

    #[test]
    fn test_identifier_dialog_typing_and_save() {
        let dir = tempfile::tempdir().unwrap();
        let mut editor = editor(&dir);
        let mut router = router(&mut editor);
        editor.upload_csv();
        key(&mut router, &mut editor, KeyCode::KeyI, Some("i"));
        assert_eq!(editor.app.edit_mode(), EditMode::EditIdentifier);

        // Shortcut letters are text while the dialog is open
        type_text(&mut router, &mut editor, "car7");
        key(&mut router, &mut editor, KeyCode::Backspace, None);
        key(&mut router, &mut editor, KeyCode::Tab, Some("\t"));
        type_text(&mut router, &mut editor, "9");

        let edit = editor.app.identifier_edit().unwrap();
        assert_eq!(edit.current_id, "car");
        assert_eq!(edit.new_id, "9");
        assert_eq!(editor.app.edit_mode(), EditMode::EditIdentifier);

        key(&mut router, &mut editor, KeyCode::Enter, Some("\r"));
        assert_eq!(editor.app.edit_mode(), EditMode::None);
        assert_eq!(editor.calls(), vec!["upload-csv", "update-id"]);
    }

    #[test]
    fn test_identifier_dialog_is_modal() {
        let dir = tempfile::tempdir().unwrap();
        let mut editor = editor(&dir);
        let mut router = router(&mut editor);
        editor.upload_csv();
        key(&mut router, &mut editor, KeyCode::KeyI, Some("i"));

        // Toolbar is blocked behind the dialog
        let (_, csv_button) = router.layout().toolbar[0];
        let (x, y) = center(csv_button);
        router.cursor_moved(x, y, &editor.app);
        assert!(router.mouse_pressed(&editor.app).is_none());

        let dialog = router.layout().dialog;
        let (x, y) = center(dialog.new_field);
        click(&mut router, &mut editor, x, y);
        assert_eq!(router.id_focus(), IdField::New);

        let (x, y) = center(dialog.close);
        click(&mut router, &mut editor, x, y);
        assert_eq!(editor.app.edit_mode(), EditMode::None);
        assert_eq!(editor.calls(), vec!["upload-csv"]);
    }

    #[test]
    fn test_box_form_submits_finished_box() {
        let dir = tempfile::tempdir().unwrap();
        let mut editor = editor(&dir);
        let mut router = router(&mut editor);
        editor.upload_csv();
        key(&mut router, &mut editor, KeyCode::KeyR, Some("r"));

        let video = router.layout().video;
        let action = router.cursor_moved(video.x + 10.0, video.y + 10.0, &editor.app);
        editor.apply(action);
        let action = router.mouse_pressed(&editor.app);
        editor.apply(action);
        let action = router.cursor_moved(video.x + 60.0, video.y + 40.0, &editor.app);
        editor.apply(action);
        let action = router.mouse_released(&editor.app);
        editor.apply(action);

        // Enter with an incomplete form sends nothing
        type_text(&mut router, &mut editor, "12");
        key(&mut router, &mut editor, KeyCode::Enter, Some("\r"));
        assert_eq!(editor.calls(), vec!["upload-csv"]);

        key(&mut router, &mut editor, KeyCode::Tab, Some("\t"));
        type_text(&mut router, &mut editor, "3");
        assert_eq!(router.box_form().parsed(), Some((12, 3)));
        key(&mut router, &mut editor, KeyCode::Enter, Some("\r"));

        assert_eq!(editor.calls(), vec!["upload-csv", "update-bounding-box"]);
        assert_eq!(router.box_form(), &BoxForm::default());
    }

    #[test]
    fn test_non_digit_keys_fall_through_to_shortcuts_while_redrawing() {
        let dir = tempfile::tempdir().unwrap();
        let mut editor = editor(&dir);
        let mut router = router(&mut editor);
        editor.upload_csv();
        key(&mut router, &mut editor, KeyCode::KeyR, Some("r"));
        assert_eq!(editor.app.edit_mode(), EditMode::RedrawBoundingBox);

        key(&mut router, &mut editor, KeyCode::KeyR, Some("r"));
        assert_eq!(editor.app.edit_mode(), EditMode::None);
        assert!(router.box_form().track.is_empty());
    }
}
