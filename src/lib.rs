//! TVAT - Tracked Video Annotation Tool
//!
//! Editor for correcting object-tracking output on a video: upload the
//! tracking CSV, scrub to a frame, redraw a bounding box or rename an object
//! identifier, then download the corrected CSV from the backend.
//!
//! [`TvatApp`] is the headless editor core; [`gui`] hosts it in a native
//! window.

mod app;
pub mod backend;
pub mod config;
pub mod constants;
pub mod download;
pub mod error;
pub mod gui;
pub mod media;
mod message;
pub mod model;
pub mod notify;
pub mod state;
mod uploader;

pub use app::TvatApp;
pub use config::AppConfig;
pub use error::EditorError;
pub use message::Message;
pub use uploader::{AcceptedCsv, Uploader};
