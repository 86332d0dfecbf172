//! Edit modes and the identifier edit form.

/// Mutually exclusive editing state of the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditMode {
    /// Not editing; playback controls are active
    #[default]
    None,
    /// Dragging a replacement bounding box on the overlay
    RedrawBoundingBox,
    /// Renaming an object identifier for the current frame
    EditIdentifier,
}

impl EditMode {
    /// Get the display name for this mode.
    pub fn name(&self) -> &'static str {
        match self {
            EditMode::None => "None",
            EditMode::RedrawBoundingBox => "Redraw Bounding Boxes",
            EditMode::EditIdentifier => "Edit ID",
        }
    }

    /// Check if this is an editing mode (not None).
    pub fn is_editing(&self) -> bool {
        !matches!(self, EditMode::None)
    }
}

/// Form state of the identifier dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentifierEdit {
    /// Frame shown when the dialog was opened
    pub frame_index: u64,
    /// Identifier as it currently appears in the CSV
    pub current_id: String,
    /// Replacement identifier
    pub new_id: String,
}

impl IdentifierEdit {
    /// Open an empty form for a frame.
    pub fn for_frame(frame_index: u64) -> Self {
        Self {
            frame_index,
            ..Self::default()
        }
    }
}
