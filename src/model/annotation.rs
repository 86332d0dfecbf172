//! Bounding box drawing on the video overlay.

/// Pointer event kinds delivered by the overlay surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    /// Button pressed
    Down,
    /// Pointer moved (with or without a button held)
    Move,
    /// Button released
    Up,
}

/// A pointer event in client (window) coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub client_x: f32,
    pub client_y: f32,
}

impl PointerEvent {
    pub fn new(kind: PointerKind, client_x: f32, client_y: f32) -> Self {
        Self {
            kind,
            client_x,
            client_y,
        }
    }
}

/// Axis-aligned rectangle ready for rendering, in overlay pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

/// A bounding box as dragged by the user, in overlay pixel coordinates.
///
/// The corners are kept exactly as dragged: `x1` may exceed `x2`. Use
/// [`BoundingBox::rect`] or [`BoundingBox::normalized`] when an ordered
/// rectangle is needed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub x1: f32,
    pub y1: f32,
    /// Second corner, unset until the pointer moves
    pub x2: Option<f32>,
    pub y2: Option<f32>,
}

impl BoundingBox {
    /// Start a box at the given corner.
    pub fn begin(x: f32, y: f32) -> Self {
        Self {
            x1: x,
            y1: y,
            x2: None,
            y2: None,
        }
    }

    /// Move the second corner.
    pub fn set_corner(&mut self, x: f32, y: f32) {
        self.x2 = Some(x);
        self.y2 = Some(y);
    }

    /// Whether both corners are known.
    pub fn is_complete(&self) -> bool {
        self.x2.is_some() && self.y2.is_some()
    }

    /// Rectangle to render, or None while the second corner is unset.
    pub fn rect(&self) -> Option<OverlayRect> {
        let (x2, y2) = (self.x2?, self.y2?);
        Some(OverlayRect {
            left: self.x1.min(x2),
            top: self.y1.min(y2),
            width: (x2 - self.x1).abs(),
            height: (y2 - self.y1).abs(),
        })
    }

    /// Corners ordered as `(min_x, min_y, max_x, max_y)`.
    pub fn normalized(&self) -> Option<(f32, f32, f32, f32)> {
        self.rect()
            .map(|r| (r.left, r.top, r.left + r.width, r.top + r.height))
    }
}

/// Drag state for the redraw tool.
///
/// The last box survives the end of a drag so it can be shown and,
/// on request, sent to the backend.
#[derive(Debug, Clone, Default)]
pub struct BoxDrawing {
    /// The current (or last finished) box
    pub bbox: Option<BoundingBox>,
    /// Whether a drag is in progress
    pub drawing: bool,
}

impl BoxDrawing {
    /// Begin a new box, discarding the previous one.
    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.bbox = Some(BoundingBox::begin(x, y));
        self.drawing = true;
        log::debug!("BoundingBox: STARTED at ({:.1}, {:.1})", x, y);
    }

    /// Update the second corner. Ignored when no drag is active.
    pub fn pointer_move(&mut self, x: f32, y: f32) {
        if !self.drawing {
            return;
        }
        if let Some(bbox) = self.bbox.as_mut() {
            bbox.set_corner(x, y);
            log::trace!("BoundingBox: MOVE to ({:.1}, {:.1})", x, y);
        }
    }

    /// Finish the drag. The box is kept.
    pub fn pointer_up(&mut self) {
        self.drawing = false;
        log::info!("BoundingBox: finished {:?}", self.bbox);
    }

    /// The box once its drag has finished and both corners are set.
    pub fn finalized(&self) -> Option<&BoundingBox> {
        if self.drawing {
            return None;
        }
        self.bbox.as_ref().filter(|b| b.is_complete())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drag_produces_box() {
        let mut drawing = BoxDrawing::default();
        drawing.pointer_down(10.0, 10.0);
        assert!(drawing.drawing);
        assert!(drawing.finalized().is_none());

        drawing.pointer_move(50.0, 30.0);
        drawing.pointer_move(110.0, 60.0);
        drawing.pointer_up();

        let bbox = drawing.finalized().copied().unwrap();
        assert_eq!(
            bbox,
            BoundingBox {
                x1: 10.0,
                y1: 10.0,
                x2: Some(110.0),
                y2: Some(60.0)
            }
        );
        let rect = bbox.rect().unwrap();
        assert_eq!(rect.width, 100.0);
        assert_eq!(rect.height, 50.0);
    }

    #[test]
    fn test_reversed_drag_is_not_normalized() {
        let mut bbox = BoundingBox::begin(110.0, 60.0);
        bbox.set_corner(10.0, 10.0);
        assert_eq!(bbox.x1, 110.0);

        let rect = bbox.rect().unwrap();
        assert_eq!((rect.left, rect.top), (10.0, 10.0));
        assert_eq!((rect.width, rect.height), (100.0, 50.0));
        assert_eq!(bbox.normalized(), Some((10.0, 10.0, 110.0, 60.0)));
    }

    #[test]
    fn test_move_without_drag_is_ignored() {
        let mut drawing = BoxDrawing::default();
        drawing.pointer_move(5.0, 5.0);
        assert!(drawing.bbox.is_none());

        drawing.pointer_down(1.0, 2.0);
        drawing.pointer_up();
        drawing.pointer_move(40.0, 40.0);
        assert_eq!(drawing.bbox.unwrap().x2, None);
    }

    #[test]
    fn test_click_without_move_has_no_rect() {
        let mut drawing = BoxDrawing::default();
        drawing.pointer_down(3.0, 4.0);
        drawing.pointer_up();
        assert!(drawing.bbox.unwrap().rect().is_none());
        assert!(drawing.finalized().is_none());
    }
}
