//! User-facing notifications.

/// Receives blocking, user-facing alerts from the editor.
pub trait Notifier {
    /// Show an alert to the user.
    fn alert(&mut self, message: &str);
}

/// Notifier that only writes alerts to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn alert(&mut self, message: &str) {
        log::warn!("Alert: {}", message);
    }
}

#[cfg(test)]
pub(crate) use recording::RecordingNotifier;
