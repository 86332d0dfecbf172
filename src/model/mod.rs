//! Data models for TVAT.

mod annotation;
mod edit;
mod file;

pub use annotation::{BoundingBox, BoxDrawing, OverlayRect, PointerEvent, PointerKind};
pub use edit::{EditMode, IdentifierEdit};
pub use file::{FileHandle, UNKNOWN_MIME_TYPE, mime_type_for, video_extensions};
