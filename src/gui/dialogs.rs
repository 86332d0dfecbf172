//! Native file pickers and message boxes.

use rfd::{FileDialog, MessageButtons, MessageDialog, MessageLevel};

use super::input::KeyBindings;
use crate::model::{FileHandle, video_extensions};
use crate::notify::Notifier;

/// Ask the user for a tracking CSV.
pub fn pick_csv() -> Option<FileHandle> {
    FileDialog::new()
        .set_title("Upload CSV")
        .add_filter("CSV files", &["csv"])
        .add_filter("All files", &["*"])
        .pick_file()
        .map(FileHandle::from_path)
}

/// Ask the user for a video.
pub fn pick_video() -> Option<FileHandle> {
    FileDialog::new()
        .set_title("Load video")
        .add_filter("Videos", &video_extensions())
        .add_filter("All files", &["*"])
        .pick_file()
        .map(FileHandle::from_path)
}

/// Shortcut list shown by the help button.
pub fn help_text(bindings: &KeyBindings) -> String {
    let mut lines: Vec<String> = bindings
        .toolbar_keys()
        .into_iter()
        .map(|(key, button)| format!("{:?}: {}", key, button.label()))
        .collect();

    lines.push(format!(
        "{:?} / {:?}: Scrub",
        bindings.scrub_back, bindings.scrub_forward
    ));
    lines.push(String::new());
    lines.push(
        "Redraw: drag on the video, type the track ID, Tab, the class ID, then Enter."
            .to_string(),
    );
    lines.push("Edit ID: type the current ID, Tab, the new ID, then Enter to save.".to_string());
    lines.push("Esc leaves the active edit mode.".to_string());
    lines.join("\n")
}

pub fn show_help(bindings: &KeyBindings) {
    MessageDialog::new()
        .set_level(MessageLevel::Info)
        .set_title("TVAT shortcuts")
        .set_description(help_text(bindings))
        .set_buttons(MessageButtons::Ok)
        .show();
}

/// Shows alerts in a blocking message box.
#[derive(Debug, Default, Clone, Copy)]
pub struct DialogNotifier;

impl Notifier for DialogNotifier {
    fn alert(&mut self, message: &str) {
        log::warn!("Alert: {}", message);
        MessageDialog::new()
            .set_level(MessageLevel::Warning)
            .set_title("TVAT")
            .set_description(message)
            .set_buttons(MessageButtons::Ok)
            .show();
    }
}
