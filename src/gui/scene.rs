//! Builds the shapes for one frame from editor state.

use super::input::{BoxField, IdField, InputRouter};
use super::layout::{Layout, MARGIN, Rect, TOOLBAR_HEIGHT, ToolbarButton};
use super::shapes::{Color, ShapeBatch};
use crate::app::TvatApp;
use crate::model::EditMode;

pub const BACKGROUND: Color = [0.09, 0.09, 0.11, 1.0];
const PANEL: Color = [0.16, 0.16, 0.19, 1.0];
const BUTTON: Color = [0.26, 0.27, 0.31, 1.0];
const BUTTON_ACTIVE: Color = [0.22, 0.45, 0.78, 1.0];
const BUTTON_DISABLED: Color = [0.19, 0.19, 0.21, 1.0];
const VIDEO_EMPTY: Color = [0.03, 0.03, 0.04, 1.0];
const VIDEO_LOADED: Color = [0.12, 0.14, 0.16, 1.0];
const DIM: Color = [0.0, 0.0, 0.0, 0.45];
const BOX_DRAWING: Color = [1.0, 0.85, 0.2, 1.0];
const BOX_DONE: Color = [0.3, 0.9, 0.4, 1.0];
const TRACK: Color = [0.22, 0.22, 0.25, 1.0];
const PROGRESS: Color = [0.22, 0.45, 0.78, 1.0];
const THUMB: Color = [0.92, 0.92, 0.95, 1.0];
const THUMB_DRAGGED: Color = [1.0, 1.0, 1.0, 1.0];
const FIELD: Color = [0.08, 0.08, 0.1, 1.0];
const FOCUS: Color = [0.35, 0.6, 0.95, 1.0];
const GLYPH: Color = [0.85, 0.85, 0.88, 1.0];
const SAVE: Color = [0.2, 0.6, 0.3, 1.0];
const CLOSE: Color = [0.45, 0.25, 0.25, 1.0];

/// Marker color shown on each toolbar button.
fn accent(button: ToolbarButton) -> Color {
    match button {
        ToolbarButton::OpenCsv => [0.3, 0.75, 0.45, 1.0],
        ToolbarButton::OpenVideo => [0.85, 0.5, 0.2, 1.0],
        ToolbarButton::PlayPause => [0.9, 0.9, 0.9, 1.0],
        ToolbarButton::RedrawBox => BOX_DRAWING,
        ToolbarButton::EditIdentifier => [0.7, 0.45, 0.9, 1.0],
        ToolbarButton::Download => [0.3, 0.7, 0.9, 1.0],
        ToolbarButton::Help => [0.6, 0.6, 0.6, 1.0],
    }
}

fn is_active(button: ToolbarButton, app: &TvatApp) -> bool {
    match button {
        ToolbarButton::OpenCsv => app.csv_uploaded(),
        ToolbarButton::OpenVideo => app.video_name().is_some(),
        ToolbarButton::PlayPause => app.is_playing(),
        ToolbarButton::RedrawBox => app.edit_mode() == EditMode::RedrawBoundingBox,
        ToolbarButton::EditIdentifier => app.edit_mode() == EditMode::EditIdentifier,
        ToolbarButton::Download | ToolbarButton::Help => false,
    }
}

fn is_enabled(button: ToolbarButton, app: &TvatApp) -> bool {
    match button {
        ToolbarButton::PlayPause => app.video_name().is_some(),
        ToolbarButton::RedrawBox | ToolbarButton::EditIdentifier | ToolbarButton::Download => {
            app.csv_uploaded()
        }
        ToolbarButton::OpenCsv | ToolbarButton::OpenVideo | ToolbarButton::Help => true,
    }
}

/// Where the editor's overlay rectangle lands in window pixels.
pub fn overlay_on_screen(app: &TvatApp, layout: &Layout) -> Option<Rect> {
    let rect = app.overlay_rect()?;
    Some(Rect::new(
        layout.video.x + rect.left,
        layout.video.y + rect.top,
        rect.width,
        rect.height,
    ))
}

/// One block per character, left to right, clipped to the field.
fn text_blocks(batch: &mut ShapeBatch, field: Rect, text: &str) {
    const BLOCK_WIDTH: f32 = 7.0;
    const ADVANCE: f32 = 9.0;
    let inner = field.inset(MARGIN / 2.0);
    for (i, _) in text.chars().enumerate() {
        let x = inner.x + i as f32 * ADVANCE;
        if x + BLOCK_WIDTH > inner.right() {
            break;
        }
        batch.fill(Rect::new(x, inner.y, BLOCK_WIDTH, inner.height), GLYPH);
    }
}

fn text_field(batch: &mut ShapeBatch, field: Rect, text: &str, focused: bool) {
    batch.fill(field, FIELD);
    if focused {
        batch.stroke(field, FOCUS, 2.0);
    }
    text_blocks(batch, field, text);
}

/// Shapes for the whole window, back to front.
pub fn build(app: &TvatApp, router: &InputRouter) -> ShapeBatch {
    let layout = router.layout();
    let mut batch = ShapeBatch::new(layout.width, layout.height);

    // Toolbar
    batch.fill(Rect::new(0.0, 0.0, layout.width, TOOLBAR_HEIGHT), PANEL);
    for (button, rect) in &layout.toolbar {
        let color = if !is_enabled(*button, app) {
            BUTTON_DISABLED
        } else if is_active(*button, app) {
            BUTTON_ACTIVE
        } else {
            BUTTON
        };
        batch.fill(*rect, color);
        batch.fill(rect.inset(rect.width / 3.0), accent(*button));
    }
    if app.edit_mode() == EditMode::RedrawBoundingBox {
        let form = router.box_form();
        let (track, class) = layout.box_fields;
        text_field(&mut batch, track, &form.track, form.focus == BoxField::Track);
        text_field(&mut batch, class, &form.class, form.focus == BoxField::Class);
    }

    // Video
    let video_color = if app.video_name().is_some() {
        VIDEO_LOADED
    } else {
        VIDEO_EMPTY
    };
    batch.fill(layout.video, video_color);
    if app.is_dimmed() {
        batch.fill(layout.video, DIM);
    }
    if let Some(rect) = overlay_on_screen(app, layout) {
        let color = if app.is_drawing() { BOX_DRAWING } else { BOX_DONE };
        batch.stroke(rect, color, 2.0);
    }

    // Scrubber
    let progress = app.position().progress_percent;
    batch.fill(layout.scrubber, TRACK);
    if app.video_name().is_some() {
        batch.fill(layout.scrubber_fill(progress), PROGRESS);
        let thumb = if router.is_scrubbing() { THUMB_DRAGGED } else { THUMB };
        batch.fill(layout.scrubber_thumb(progress), thumb);
    }

    // Identifier dialog
    if let Some(edit) = app.identifier_edit() {
        let dialog = layout.dialog;
        batch.fill(dialog.panel, PANEL);
        batch.stroke(dialog.panel, BUTTON, 1.0);
        text_field(
            &mut batch,
            dialog.current_field,
            &edit.current_id,
            router.id_focus() == IdField::Current,
        );
        text_field(
            &mut batch,
            dialog.new_field,
            &edit.new_id,
            router.id_focus() == IdField::New,
        );
        batch.fill(dialog.close, CLOSE);
        batch.fill(dialog.save, SAVE);
    }

    batch
}

/// Status text for the window title bar.
pub fn window_title(app: &TvatApp, router: &InputRouter) -> String {
    let mut parts = vec![app.config().app_name.clone()];

    let csv = app.csv_file().map(|f| f.name.as_str()).unwrap_or("no CSV");
    if app.is_uploading() {
        parts.push(format!("{} (uploading)", csv));
    } else {
        parts.push(csv.to_string());
    }

    match app.video_name() {
        Some(name) => {
            let pos = app.position();
            parts.push(format!(
                "{} | Frame: {} | {:.2}s ({:.1}%) | {}",
                name,
                pos.current_frame,
                pos.current_time_seconds,
                pos.progress_percent,
                if app.is_playing() { "Playing" } else { "Paused" }
            ));
        }
        None => parts.push("no video".to_string()),
    }

    match app.edit_mode() {
        EditMode::None => {}
        EditMode::RedrawBoundingBox => {
            let form = router.box_form();
            let mut mode = EditMode::RedrawBoundingBox.name().to_string();
            if let Some(rect) = app.overlay_rect() {
                mode.push_str(&format!(" {:.0}x{:.0}", rect.width, rect.height));
            }
            mode.push_str(&format!(" track '{}' class '{}'", form.track, form.class));
            parts.push(mode);
        }
        EditMode::EditIdentifier => {
            if let Some(edit) = app.identifier_edit() {
                parts.push(format!(
                    "{} frame {}: '{}' -> '{}'",
                    EditMode::EditIdentifier.name(),
                    edit.frame_index,
                    edit.current_id,
                    edit.new_id
                ));
            }
        }
    }

    if app.pending_requests() > 0 {
        parts.push(format!("pending: {}", app.pending_requests()));
    }
    parts.push("F1: help".to_string());
    parts.join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gui::input::KeyBindings;
    use crate::gui::test_support::editor;
    use crate::message::Message;
    use crate::model::{PointerEvent, PointerKind};

    fn router() -> InputRouter {
        InputRouter::new(KeyBindings::default(), 1024.0, 768.0)
    }

    #[test]
    fn test_overlay_rect_is_drawn_at_video_offset() {
        let dir = tempfile::tempdir().unwrap();
        let mut editor = editor(&dir);
        let mut router = router();
        editor.apply(Some(router.resize(1024.0, 768.0)));
        editor.upload_csv();
        editor.send(Message::EditOptionSelected(EditMode::RedrawBoundingBox));

        let video = router.layout().video;
        let empty = build(&editor.app, &router).vertices().len();

        for (kind, x, y) in [
            (PointerKind::Down, 20.0, 30.0),
            (PointerKind::Move, 70.0, 90.0),
        ] {
            editor.send(Message::Pointer(PointerEvent::new(
                kind,
                video.x + x,
                video.y + y,
            )));
        }

        let on_screen = overlay_on_screen(&editor.app, router.layout()).unwrap();
        assert_eq!(on_screen, Rect::new(video.x + 20.0, video.y + 30.0, 50.0, 60.0));
        // Stroke is four edge rectangles
        assert_eq!(build(&editor.app, &router).vertices().len(), empty + 16);
    }

    #[test]
    fn test_idle_editor_has_no_overlay() {
        let dir = tempfile::tempdir().unwrap();
        let editor = editor(&dir);
        assert!(overlay_on_screen(&editor.app, router().layout()).is_none());
        assert!(!build(&editor.app, &router()).is_empty());
    }

    #[test]
    fn test_dialog_drawn_only_while_editing_identifier() {
        let dir = tempfile::tempdir().unwrap();
        let mut editor = editor(&dir);
        let router = router();
        editor.upload_csv();
        let closed = build(&editor.app, &router).vertices().len();

        editor.send(Message::EditOptionSelected(EditMode::EditIdentifier));
        let open = build(&editor.app, &router).vertices().len();
        assert!(open > closed);

        editor.send(Message::CurrentIdChanged("abc".to_string()));
        let typed = build(&editor.app, &router).vertices().len();
        // One block per character
        assert_eq!(typed, open + 3 * 4);
    }

    #[test]
    fn test_title_reports_playback_and_mode() {
        let dir = tempfile::tempdir().unwrap();
        let mut editor = editor(&dir);
        let router = router();

        let title = window_title(&editor.app, &router);
        assert!(title.starts_with("TVAT"));
        assert!(title.contains("no CSV"));
        assert!(title.contains("no video"));

        editor.upload_csv();
        editor.load_video();
        editor.send(Message::Scrub(50.0));
        editor.send(Message::EditOptionSelected(EditMode::EditIdentifier));
        let title = window_title(&editor.app, &router);
        assert!(title.contains("sample.csv"));
        assert!(title.contains("clip.mp4 | Frame: 1350 | 45.00s (50.0%) | Paused"));
        assert!(title.contains("Edit ID frame 1350"));
    }
}
