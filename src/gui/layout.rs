//! Screen layout of the editor window.
//!
//! Everything is in physical pixels with the origin at the top-left corner
//! of the window. The layout is recomputed on every resize.

/// Height of the toolbar strip along the top edge.
pub const TOOLBAR_HEIGHT: f32 = 44.0;
/// Side length of a toolbar button.
pub const BUTTON_SIZE: f32 = 28.0;
/// Gap between panels and around the window edge.
pub const MARGIN: f32 = 8.0;
/// Height of the scrubber track.
pub const SCRUBBER_HEIGHT: f32 = 20.0;
/// Width of the scrubber thumb.
pub const THUMB_WIDTH: f32 = 8.0;

const DIALOG_WIDTH: f32 = 320.0;
const DIALOG_HEIGHT: f32 = 140.0;
const FIELD_HEIGHT: f32 = 28.0;
const DIALOG_BUTTON_WIDTH: f32 = 72.0;
const DIALOG_PADDING: f32 = 14.0;
const FORM_FIELD_WIDTH: f32 = 96.0;

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Whether a point lies inside. The right and bottom edges are outside.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Move a point onto the nearest position inside the rectangle.
    pub fn clamp(&self, x: f32, y: f32) -> (f32, f32) {
        (
            x.clamp(self.x, self.right().max(self.x)),
            y.clamp(self.y, self.bottom().max(self.y)),
        )
    }

    /// Shrink by `by` on every side.
    pub fn inset(&self, by: f32) -> Self {
        Self::new(
            self.x + by,
            self.y + by,
            (self.width - 2.0 * by).max(0.0),
            (self.height - 2.0 * by).max(0.0),
        )
    }
}

/// Buttons in the toolbar, left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarButton {
    OpenCsv,
    OpenVideo,
    PlayPause,
    RedrawBox,
    EditIdentifier,
    Download,
    Help,
}

impl ToolbarButton {
    pub const ALL: [ToolbarButton; 7] = [
        ToolbarButton::OpenCsv,
        ToolbarButton::OpenVideo,
        ToolbarButton::PlayPause,
        ToolbarButton::RedrawBox,
        ToolbarButton::EditIdentifier,
        ToolbarButton::Download,
        ToolbarButton::Help,
    ];

    /// Name shown in the help dialog.
    pub fn label(self) -> &'static str {
        match self {
            ToolbarButton::OpenCsv => "Upload CSV",
            ToolbarButton::OpenVideo => "Load video",
            ToolbarButton::PlayPause => "Play / pause",
            ToolbarButton::RedrawBox => "Redraw bounding box",
            ToolbarButton::EditIdentifier => "Edit identifier",
            ToolbarButton::Download => "Download updated CSV",
            ToolbarButton::Help => "Help",
        }
    }
}

/// The identifier dialog, centered over the video.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DialogLayout {
    pub panel: Rect,
    pub current_field: Rect,
    pub new_field: Rect,
    pub close: Rect,
    pub save: Rect,
}

impl DialogLayout {
    fn centered_in(area: Rect) -> Self {
        let width = DIALOG_WIDTH.min(area.width);
        let height = DIALOG_HEIGHT.min(area.height);
        let panel = Rect::new(
            area.x + (area.width - width) / 2.0,
            area.y + (area.height - height) / 2.0,
            width,
            height,
        );

        let field_width = (panel.width - 2.0 * DIALOG_PADDING).max(0.0);
        let current_field = Rect::new(
            panel.x + DIALOG_PADDING,
            panel.y + DIALOG_PADDING,
            field_width,
            FIELD_HEIGHT,
        );
        let new_field = Rect::new(
            current_field.x,
            current_field.bottom() + MARGIN,
            field_width,
            FIELD_HEIGHT,
        );

        let buttons_y = panel.bottom() - DIALOG_PADDING - FIELD_HEIGHT;
        let save = Rect::new(
            panel.right() - DIALOG_PADDING - DIALOG_BUTTON_WIDTH,
            buttons_y,
            DIALOG_BUTTON_WIDTH,
            FIELD_HEIGHT,
        );
        let close = Rect::new(
            save.x - MARGIN - DIALOG_BUTTON_WIDTH,
            buttons_y,
            DIALOG_BUTTON_WIDTH,
            FIELD_HEIGHT,
        );

        Self {
            panel,
            current_field,
            new_field,
            close,
            save,
        }
    }
}

/// Positions of every interactive area for one window size.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub width: f32,
    pub height: f32,
    pub toolbar: Vec<(ToolbarButton, Rect)>,
    /// The video surface; the overlay covers it exactly
    pub video: Rect,
    pub scrubber: Rect,
    pub dialog: DialogLayout,
    /// Track and class fields shown in the toolbar while redrawing a box
    pub box_fields: (Rect, Rect),
}

impl Layout {
    pub fn new(width: f32, height: f32) -> Self {
        let button_y = (TOOLBAR_HEIGHT - BUTTON_SIZE) / 2.0;
        let toolbar = ToolbarButton::ALL
            .iter()
            .enumerate()
            .map(|(i, button)| {
                let x = MARGIN + i as f32 * (BUTTON_SIZE + MARGIN);
                (*button, Rect::new(x, button_y, BUTTON_SIZE, BUTTON_SIZE))
            })
            .collect::<Vec<_>>();

        let form_x = toolbar
            .last()
            .map(|(_, rect)| rect.right())
            .unwrap_or(0.0)
            + 3.0 * MARGIN;
        let track_field = Rect::new(form_x, button_y, FORM_FIELD_WIDTH, BUTTON_SIZE);
        let class_field = Rect::new(
            track_field.right() + MARGIN,
            button_y,
            FORM_FIELD_WIDTH,
            BUTTON_SIZE,
        );

        let content_width = (width - 2.0 * MARGIN).max(0.0);
        let video_height = (height - TOOLBAR_HEIGHT - SCRUBBER_HEIGHT - 2.0 * MARGIN).max(0.0);
        let video = Rect::new(MARGIN, TOOLBAR_HEIGHT, content_width, video_height);
        let scrubber = Rect::new(
            MARGIN,
            video.bottom() + MARGIN,
            content_width,
            SCRUBBER_HEIGHT,
        );

        Self {
            width,
            height,
            toolbar,
            video,
            scrubber,
            dialog: DialogLayout::centered_in(video),
            box_fields: (track_field, class_field),
        }
    }

    /// The toolbar button under a point.
    pub fn button_at(&self, x: f32, y: f32) -> Option<ToolbarButton> {
        self.toolbar
            .iter()
            .find(|(_, rect)| rect.contains(x, y))
            .map(|(button, _)| *button)
    }

    /// Scrub position for a horizontal pointer position, in 0..=100.
    pub fn progress_at(&self, x: f32) -> f64 {
        if self.scrubber.width <= 0.0 {
            return 0.0;
        }
        let fraction = (x - self.scrubber.x) / self.scrubber.width;
        (f64::from(fraction) * 100.0).clamp(0.0, 100.0)
    }

    /// Filled part of the scrubber track for a progress value.
    pub fn scrubber_fill(&self, progress_percent: f64) -> Rect {
        let fraction = (progress_percent / 100.0).clamp(0.0, 1.0) as f32;
        Rect::new(
            self.scrubber.x,
            self.scrubber.y,
            self.scrubber.width * fraction,
            self.scrubber.height,
        )
    }

    /// Thumb centered on the current progress.
    pub fn scrubber_thumb(&self, progress_percent: f64) -> Rect {
        let fill = self.scrubber_fill(progress_percent);
        let x = (fill.right() - THUMB_WIDTH / 2.0)
            .clamp(self.scrubber.x, (self.scrubber.right() - THUMB_WIDTH).max(self.scrubber.x));
        Rect::new(x, self.scrubber.y, THUMB_WIDTH, self.scrubber.height)
    }
}
